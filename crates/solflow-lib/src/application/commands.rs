//! Command execution handlers
//!
//! Session-based architecture for command execution: every handler takes a
//! `&dyn Session` and reaches the outside world only through its providers.

use crate::application::session::{CommandSession, Session};
use crate::application::{CliConfig, Commands};
use crate::dataverse::{AuthError, DataverseError, SolutionDirectory};
use crate::display::DisplayProvider;
use crate::pac::{PacCli, PacError};
use crate::primitives::{AuthMethod, ConfigError, IncrementPolicy};
use crate::solution::{
    ConsoleReporter, DecisionFlags, ExportError, ExportManager, FlagsThenPrompt, JsonReportWriter,
    MigrationError, MigrationObserver, MigrationOrchestrator, PromptConfirmation,
};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{debug, warn};

const PAC_INSTALL_HINT: &str =
    "   Install with: dotnet tool install --global Microsoft.PowerApps.CLI.Tool";
const AZ_INSTALL_HINT: &str =
    "   Install from: https://learn.microsoft.com/cli/azure/install-azure-cli";

/// Execute CLI commands using the session-based architecture
pub fn execute_command(config: CliConfig) -> Result<()> {
    // Create command session (owns all ephemeral state)
    let session = CommandSession::new(config.app_config);

    let command = match config.command {
        Some(cmd) => cmd,
        None => {
            session
                .display()
                .status()
                .message("solflow - Power Platform solution lifecycle automation");
            session
                .display()
                .status()
                .subtle("Run 'solflow --help' for usage information");
            return Ok(());
        }
    };

    execute_command_with_session(command, &session).inspect_err(|error| {
        render_failure(session.display(), error);
    })
}

/// Execute a specific command with a provided session (for testing)
pub fn execute_command_with_session(command: Commands, session: &dyn Session) -> Result<()> {
    match command {
        Commands::Requirements => handle_requirements(session),
        Commands::Whoami => handle_whoami(session),
        Commands::Components { solution } => handle_components(session, solution),
        Commands::Bump {
            solution,
            increment,
            dry_run,
        } => handle_bump(session, solution, increment, dry_run),
        Commands::Export {
            solution,
            increment,
        } => handle_export(session, solution, increment),
        Commands::Migrate {
            source,
            proceed,
            export,
            delete_source,
            report,
        } => handle_migrate(
            session,
            source,
            DecisionFlags {
                proceed,
                export,
                delete_source,
            },
            report,
        ),
    }
}

/// Troubleshooting checklist for the first structured error in the chain
pub fn failure_hints(error: &anyhow::Error) -> Vec<&'static str> {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<MigrationError>() {
            return e.hints();
        }
        if let Some(e) = cause.downcast_ref::<ExportError>() {
            return e.hints();
        }
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            return e.hints();
        }
        if let Some(e) = cause.downcast_ref::<AuthError>() {
            return e.hints();
        }
        if let Some(e) = cause.downcast_ref::<DataverseError>() {
            return e.hints();
        }
        if let Some(e) = cause.downcast_ref::<PacError>() {
            return e.hints();
        }
    }
    Vec::new()
}

fn render_failure(display: &dyn DisplayProvider, error: &anyhow::Error) {
    let status = display.status();
    status.error("Failed", &format!("{:#}", error));
    let hints = failure_hints(error);
    if !hints.is_empty() {
        status.subtle("Troubleshooting:");
        status.list(&hints);
    }
}

fn pac_cli(session: &dyn Session) -> Result<PacCli<'_>> {
    let workdir = session.workdir()?;
    Ok(PacCli::new(
        session.process(),
        &session.config().app_config().pac_program,
        workdir,
    ))
}

/// Acquire a token with the configured flow and open the solution directory
fn connect(session: &dyn Session) -> Result<Box<dyn SolutionDirectory>> {
    let config = session.config().app_config();
    let environment_url = config.require_environment_url()?;

    let provider =
        session
            .network()
            .token_provider(config, session.process(), session.display())?;
    let token = provider
        .access_token()
        .with_context(|| format!("Failed to sign in to {}", environment_url))?;
    debug!(flow = provider.flow_name(), "Access token acquired");

    session.network().solution_directory(config, token)
}

/// Solution name from the argument, else prompted for when a human is present
fn resolve_solution(session: &dyn Session, argument: Option<String>, what: &str) -> Result<String> {
    if let Some(name) = argument
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
    {
        return Ok(name);
    }

    if !session.interactive().is_interactive() {
        return Err(ConfigError::ValidationFailed {
            reason: format!("{} is required when not running interactively", what),
        }
        .into());
    }

    let name = session
        .interactive()
        .text_input(&format!("{} unique name", what), String::new())?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ConfigError::ValidationFailed {
            reason: format!("{} cannot be empty", what),
        }
        .into());
    }
    Ok(name.to_string())
}

fn handle_requirements(session: &dyn Session) -> Result<()> {
    let status = session.display().status();
    status.section("Checking tool dependencies");

    let pac = pac_cli(session)?;
    let pac_result = pac.ensure_available();
    match &pac_result {
        Ok(version) => status.success("pac", version),
        Err(e) => {
            status.error("pac", &e.to_string());
            status.subtle(PAC_INSTALL_HINT);
        }
    }

    let needs_az = session.config().app_config().auth == AuthMethod::Interactive;
    match session.process().find_program("az") {
        Some(path) => status.success("az", &path.display().to_string()),
        None if needs_az => {
            status.error("az", "not found (required for --auth interactive)");
            status.subtle(AZ_INSTALL_HINT);
        }
        None => status.info("az not found (only needed for --auth interactive)"),
    }

    pac_result?;
    Ok(())
}

fn handle_whoami(session: &dyn Session) -> Result<()> {
    let directory = connect(session)?;
    let identity = directory.who_am_i()?;
    let environment_url = session.config().app_config().require_environment_url()?;

    session.display().status().success("Connected", environment_url);
    session.display().table().properties(&[
        ("User", identity.user_id.as_str()),
        ("Business unit", identity.business_unit_id.as_str()),
        ("Organization", identity.organization_id.as_str()),
    ]);

    Ok(())
}

fn handle_components(session: &dyn Session, solution: Option<String>) -> Result<()> {
    let name = resolve_solution(session, solution, "Solution")?;
    let directory = connect(session)?;
    let pac = pac_cli(session)?;

    let reporter = ConsoleReporter::new(session.display());
    MigrationOrchestrator::new(&*directory, &pac)
        .with_observer(&reporter)
        .discover(&name)?;

    Ok(())
}

fn handle_bump(
    session: &dyn Session,
    solution: Option<String>,
    increment: IncrementPolicy,
    dry_run: bool,
) -> Result<()> {
    let name = resolve_solution(session, solution, "Solution")?;
    let directory = connect(session)?;
    let pac = pac_cli(session)?;
    let manager = ExportManager::new(
        &*directory,
        &pac,
        session.filesystem(),
        session.config().app_config().output_path(),
    );

    let bump = manager.bump_version(&name, increment, dry_run)?;
    let change = format!("{} -> {}", bump.previous, bump.next);
    if dry_run {
        session
            .display()
            .status()
            .info(&format!("{}: {} (dry run, nothing written)", name, change));
    } else {
        session.display().status().success(&name, &change);
    }

    Ok(())
}

fn handle_export(
    session: &dyn Session,
    solution: Option<String>,
    increment: IncrementPolicy,
) -> Result<()> {
    let name = resolve_solution(session, solution, "Solution")?;
    let pac = pac_cli(session)?;
    pac.ensure_available()?;
    let directory = connect(session)?;

    let manager = ExportManager::new(
        &*directory,
        &pac,
        session.filesystem(),
        session.config().app_config().output_path(),
    );

    session
        .display()
        .status()
        .section(&format!("Exporting '{}'", name));
    let result = manager.export_solution(&name, increment);
    ConsoleReporter::new(session.display()).target_exported(&name, &result);
    let report = result?;

    for variant in report.variants.iter().filter(|v| v.is_success()) {
        session.display().status().subtle(&format!(
            "   {}: {}",
            variant.package,
            variant.directory.display()
        ));
    }

    if !report.is_success() {
        anyhow::bail!(
            "{} of {} package variant(s) of '{}' failed",
            report.failed_variants().len(),
            report.variants.len(),
            name
        );
    }
    Ok(())
}

fn handle_migrate(
    session: &dyn Session,
    source: Option<String>,
    flags: DecisionFlags,
    report_path: Option<PathBuf>,
) -> Result<()> {
    let name = resolve_solution(session, source, "Source solution")?;
    let pac = pac_cli(session)?;
    pac.ensure_available()?;
    let directory = connect(session)?;

    let config = session.config().app_config();
    let manager = ExportManager::new(&*directory, &pac, session.filesystem(), config.output_path());
    let confirmation = FlagsThenPrompt::new(flags, PromptConfirmation::new(session.interactive()));

    let console = ConsoleReporter::new(session.display());
    let json = JsonReportWriter::new();
    let mut orchestrator = MigrationOrchestrator::new(&*directory, &pac).with_observer(&console);
    if report_path.is_some() {
        orchestrator = orchestrator.with_observer(&json);
    }

    let result = orchestrator.run(&name, &confirmation, &manager);

    if let Some(path) = report_path {
        let path = if path.is_relative() {
            session.workdir()?.join(path)
        } else {
            path
        };
        match json.save(session.filesystem(), &path) {
            Ok(()) => session
                .display()
                .status()
                .info(&format!("Report written to {}", path.display())),
            Err(e) if result.is_err() => warn!(error = %e, "Report could not be written"),
            Err(e) => return Err(e),
        }
    }

    let run = result?;
    if !run.proceeded {
        session.display().status().info("No components were moved");
    } else if run.failed_exports() > 0 {
        session.display().status().warning(&format!(
            "{} affected solution(s) were not fully exported",
            run.failed_exports()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    include!("commands.test.rs");
}

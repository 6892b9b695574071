//! Power Platform CLI (`pac`) integration
//!
//! Component moves and package export/unpack run as `pac solution ...`
//! subprocesses through the session's [`ProcessProvider`].

use crate::application::session::ProcessProvider;
use crate::primitives::PackageType;
use crate::solution::ComponentTypeSelector;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, instrument};

const INSTALL_HINT: &str = "Install with 'dotnet tool install --global Microsoft.PowerApps.CLI.Tool'";

#[derive(Debug, Clone, Error)]
pub enum PacError {
    #[error("Power Platform CLI '{program}' not found on PATH")]
    NotAvailable { program: String },

    #[error("Failed to run '{command}': {reason}")]
    ProcessFailed { command: String, reason: String },

    #[error("'{command}' failed: {output}")]
    CommandFailed { command: String, output: String },

    #[error("Invalid path: {reason}")]
    InvalidPath { reason: String },
}

impl PacError {
    pub fn hints(&self) -> Vec<&'static str> {
        match self {
            PacError::NotAvailable { .. } => vec![
                INSTALL_HINT,
                "Or point --pac / SOLFLOW_PAC at the executable",
                "Run 'solflow requirements' to re-check the toolchain",
            ],
            PacError::CommandFailed { .. } => vec![
                "Run 'pac auth list' and make sure the active profile targets the same environment",
                "Re-run with --log-level 3 to see the exact pac invocation",
            ],
            _ => vec!["Run 'solflow requirements' to re-check the toolchain"],
        }
    }
}

/// Adds a component to a target solution
pub trait ComponentMover {
    fn move_component(
        &self,
        selector: ComponentTypeSelector,
        target_solution: &str,
        object_id: &str,
    ) -> Result<(), PacError>;
}

/// Exports solution packages and unpacks them into source folders
pub trait PackageExporter {
    fn export(&self, solution: &str, package: PackageType, archive: &Path) -> Result<(), PacError>;

    fn unpack(
        &self,
        archive: &Path,
        destination: &Path,
        package: PackageType,
    ) -> Result<(), PacError>;
}

/// `pac` CLI wrapper
pub struct PacCli<'a> {
    process: &'a dyn ProcessProvider,
    program: String,
    workdir: PathBuf,
    availability: OnceCell<Result<String, PacError>>,
}

impl<'a> PacCli<'a> {
    pub fn new(process: &'a dyn ProcessProvider, program: &str, workdir: PathBuf) -> Self {
        Self {
            process,
            program: program.to_string(),
            workdir,
            availability: OnceCell::new(),
        }
    }

    /// Check that `pac` is on PATH and report its version (cached check)
    pub fn ensure_available(&self) -> Result<String, PacError> {
        self.availability
            .get_or_init(|| self.probe())
            .clone()
    }

    fn probe(&self) -> Result<String, PacError> {
        if self.process.find_program(&self.program).is_none() {
            return Err(PacError::NotAvailable {
                program: self.program.clone(),
            });
        }

        let version = self
            .process
            .execute(&self.program, &["help"], &self.workdir)
            .ok()
            .and_then(|output| parse_version(&output.stdout))
            .unwrap_or_else(|| "unknown".to_string());

        debug!(program = %self.program, %version, "pac CLI available");
        Ok(version)
    }

    fn run(&self, args: &[&str]) -> Result<(), PacError> {
        self.ensure_available()?;

        let command = format!("{} {}", self.program, args.join(" "));
        debug!(%command, "Running pac");

        let output = self
            .process
            .execute(&self.program, args, &self.workdir)
            .map_err(|e| PacError::ProcessFailed {
                command: command.clone(),
                reason: e.to_string(),
            })?;

        if output.success {
            Ok(())
        } else {
            // pac writes most errors to stdout
            let detail = if output.stderr.trim().is_empty() {
                output.stdout.trim()
            } else {
                output.stderr.trim()
            };
            Err(PacError::CommandFailed {
                command,
                output: detail.to_string(),
            })
        }
    }
}

impl ComponentMover for PacCli<'_> {
    #[instrument(skip(self))]
    fn move_component(
        &self,
        selector: ComponentTypeSelector,
        target_solution: &str,
        object_id: &str,
    ) -> Result<(), PacError> {
        let component_type = selector.to_string();
        self.run(&[
            "solution",
            "add-solution-component",
            "--solutionUniqueName",
            target_solution,
            "--component",
            object_id,
            "--componentType",
            component_type.as_str(),
        ])
    }
}

impl PackageExporter for PacCli<'_> {
    #[instrument(skip(self))]
    fn export(&self, solution: &str, package: PackageType, archive: &Path) -> Result<(), PacError> {
        let archive = path_arg(archive)?;
        let managed = if package.is_managed() { "true" } else { "false" };
        self.run(&[
            "solution",
            "export",
            "--name",
            solution,
            "--path",
            archive,
            "--managed",
            managed,
            "--overwrite",
        ])
    }

    #[instrument(skip(self))]
    fn unpack(
        &self,
        archive: &Path,
        destination: &Path,
        package: PackageType,
    ) -> Result<(), PacError> {
        self.run(&[
            "solution",
            "unpack",
            "--zipfile",
            path_arg(archive)?,
            "--folder",
            path_arg(destination)?,
            "--packagetype",
            package.pac_name(),
        ])
    }
}

fn path_arg(path: &Path) -> Result<&str, PacError> {
    path.to_str().ok_or_else(|| PacError::InvalidPath {
        reason: format!("non UTF-8 path: {}", path.display()),
    })
}

/// Version from the `Version: x.y.z` line of the pac banner
fn parse_version(banner: &str) -> Option<String> {
    banner.lines().find_map(|line| {
        line.trim()
            .strip_prefix("Version:")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    })
}

#[cfg(test)]
mod tests {
    include!("pac.test.rs");
}

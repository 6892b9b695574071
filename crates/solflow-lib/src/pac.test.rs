use super::*;
use crate::application::session::ProcessOutput;
use crate::application::session_mocks::MockProcessProvider;

fn ok(stdout: &str) -> Result<ProcessOutput, String> {
    Ok(ProcessOutput {
        stdout: stdout.to_string(),
        stderr: String::new(),
        success: true,
    })
}

fn failed(stdout: &str, stderr: &str) -> Result<ProcessOutput, String> {
    Ok(ProcessOutput {
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        success: false,
    })
}

#[test]
fn test_move_component_passes_numeric_type() {
    let process = MockProcessProvider::new().with_program("pac");
    let pac = PacCli::new(&process, "pac", PathBuf::from("/work"));

    pac.move_component(ComponentTypeSelector::Code(29), "flows", "f-1")
        .unwrap();

    assert!(process.verify_call(
        "pac",
        &[
            "solution",
            "add-solution-component",
            "--solutionUniqueName",
            "flows",
            "--component",
            "f-1",
            "--componentType",
            "29",
        ],
        Path::new("/work"),
    ));
}

#[test]
fn test_move_component_passes_symbolic_type_for_connection_references() {
    let process = MockProcessProvider::new().with_program("pac");
    let pac = PacCli::new(&process, "pac", PathBuf::from("/work"));

    pac.move_component(
        ComponentTypeSelector::for_type(10112),
        "connectionreference",
        "cr-1",
    )
    .unwrap();

    let moves = process.get_calls_for_command("pac");
    let last = moves.last().unwrap();
    assert_eq!(last.args.last().map(String::as_str), Some("ConnectionReference"));
}

#[test]
fn test_missing_pac_is_reported_once_without_running_commands() {
    let process = MockProcessProvider::new();
    let pac = PacCli::new(&process, "pac", PathBuf::from("/work"));

    let first = pac.move_component(ComponentTypeSelector::Code(1), "main", "id");
    let second = pac.ensure_available();

    assert!(matches!(first, Err(PacError::NotAvailable { .. })));
    assert!(matches!(second, Err(PacError::NotAvailable { .. })));
    assert!(process.get_calls().is_empty());
    assert_eq!(process.lookup_count("pac"), 1);
}

#[test]
fn test_availability_check_reads_banner_version_once() {
    let process = MockProcessProvider::new()
        .with_program("pac")
        .with_result(
            "pac",
            &["help"],
            ok("Microsoft PowerPlatform CLI\nVersion: 1.35.1+g3c1b9a2\nOnline documentation: https://aka.ms/PowerPlatformCLI\n"),
        );
    let pac = PacCli::new(&process, "pac", PathBuf::from("/work"));

    assert_eq!(pac.ensure_available().unwrap(), "1.35.1+g3c1b9a2");
    pac.move_component(ComponentTypeSelector::Code(1), "main", "id")
        .unwrap();

    let help_calls = process
        .get_calls()
        .into_iter()
        .filter(|c| c.args == ["help"])
        .count();
    assert_eq!(help_calls, 1);
}

#[test]
fn test_failed_command_prefers_stderr_then_stdout() {
    let args = [
        "solution",
        "add-solution-component",
        "--solutionUniqueName",
        "main",
        "--component",
        "bad",
        "--componentType",
        "1",
    ];
    let process = MockProcessProvider::new()
        .with_program("pac")
        .with_result("pac", &args, failed("Error: component does not exist", ""));
    let pac = PacCli::new(&process, "pac", PathBuf::from("/work"));

    let err = pac
        .move_component(ComponentTypeSelector::Code(1), "main", "bad")
        .unwrap_err();
    assert!(err.to_string().contains("component does not exist"), "{err}");

    let process = MockProcessProvider::new()
        .with_program("pac")
        .with_result("pac", &args, failed("noise", "real cause"));
    let pac = PacCli::new(&process, "pac", PathBuf::from("/work"));
    let err = pac
        .move_component(ComponentTypeSelector::Code(1), "main", "bad")
        .unwrap_err();
    assert!(err.to_string().ends_with("real cause"), "{err}");
}

#[test]
fn test_export_and_unpack_arguments() {
    let process = MockProcessProvider::new().with_program("pac");
    let pac = PacCli::new(&process, "pac", PathBuf::from("/work"));

    pac.export("flows", PackageType::Managed, Path::new("out/flows_managed.zip"))
        .unwrap();
    pac.unpack(
        Path::new("out/flows_managed.zip"),
        Path::new("out/flows/managed"),
        PackageType::Managed,
    )
    .unwrap();

    assert!(process.verify_call(
        "pac",
        &[
            "solution",
            "export",
            "--name",
            "flows",
            "--path",
            "out/flows_managed.zip",
            "--managed",
            "true",
            "--overwrite",
        ],
        Path::new("/work"),
    ));
    assert!(process.verify_call(
        "pac",
        &[
            "solution",
            "unpack",
            "--zipfile",
            "out/flows_managed.zip",
            "--folder",
            "out/flows/managed",
            "--packagetype",
            "Managed",
        ],
        Path::new("/work"),
    ));
}

#[test]
fn test_process_spawn_failure_is_process_failed() {
    let process = MockProcessProvider::new()
        .with_program("pac")
        .with_default_result(Err("permission denied".to_string()));
    let pac = PacCli::new(&process, "pac", PathBuf::from("/work"));

    let err = pac
        .export("main", PackageType::Unmanaged, Path::new("main.zip"))
        .unwrap_err();
    assert!(matches!(err, PacError::ProcessFailed { .. }), "{err}");
}

#[test]
fn test_parse_version() {
    assert_eq!(parse_version("Version: 1.2.3"), Some("1.2.3".to_string()));
    assert_eq!(parse_version("  Version:   9 \n"), Some("9".to_string()));
    assert_eq!(parse_version("Version:"), None);
    assert_eq!(parse_version("no banner"), None);
}

#[test]
fn test_not_available_hints_point_at_install() {
    let err = PacError::NotAvailable {
        program: "pac".to_string(),
    };
    assert!(err.hints()[0].contains("dotnet tool install"));
}

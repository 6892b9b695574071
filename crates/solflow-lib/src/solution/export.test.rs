use super::*;
use crate::application::session_mocks::{
    MockFileSystemProvider, MockPackageTool, MockSolutionDirectory,
};

fn directory() -> MockSolutionDirectory {
    MockSolutionDirectory::new().with_solution("flows", SolutionVersion::new(1, 2, 3, 4), vec![])
}

#[test]
fn test_bump_pushes_each_policy() {
    for (policy, expected) in [
        (IncrementPolicy::Patch, SolutionVersion::new(1, 2, 3, 5)),
        (IncrementPolicy::Minor, SolutionVersion::new(1, 3, 0, 0)),
        (IncrementPolicy::Major, SolutionVersion::new(2, 0, 0, 0)),
    ] {
        let directory = directory();
        let tool = MockPackageTool::new();
        let filesystem = MockFileSystemProvider::new();
        let manager = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));

        let bump = manager.bump_version("flows", policy, false).unwrap();

        assert_eq!(bump.previous, SolutionVersion::new(1, 2, 3, 4));
        assert_eq!(bump.next, expected);
        assert_eq!(directory.version_of("flows"), Some(expected));
    }
}

#[test]
fn test_dry_run_leaves_version() {
    let directory = directory();
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new();
    let manager = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));

    let bump = manager
        .bump_version("flows", IncrementPolicy::Minor, true)
        .unwrap();

    assert_eq!(bump.next, SolutionVersion::new(1, 3, 0, 0));
    assert_eq!(
        directory.version_of("flows"),
        Some(SolutionVersion::new(1, 2, 3, 4))
    );
    assert!(!directory.calls().iter().any(|c| c.starts_with("set_version")));
}

#[test]
fn test_missing_solution_is_not_found() {
    let directory = directory();
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new();
    let manager = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));

    let error = manager
        .export_solution("ghost", IncrementPolicy::Patch)
        .unwrap_err();

    assert!(matches!(error, ExportError::NotFound { ref solution } if solution == "ghost"));
    assert!(tool.exports().is_empty());
}

#[test]
fn test_version_push_failure_stops_before_packaging() {
    let directory = directory().with_api_error("set_version", 403, "no write access");
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new();
    let manager = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));

    let error = manager
        .export_solution("flows", IncrementPolicy::Patch)
        .unwrap_err();

    match &error {
        ExportError::VersionUpdate { version, .. } => {
            assert_eq!(*version, SolutionVersion::new(1, 2, 3, 5))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!error.hints().is_empty());
    assert!(tool.exports().is_empty());
}

#[test]
fn test_exports_both_flavors_into_layout() {
    let directory = directory();
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new();
    let manager = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));

    let report = manager
        .export_solution("flows", IncrementPolicy::Patch)
        .unwrap();

    assert!(report.is_success());
    assert_eq!(report.version, SolutionVersion::new(1, 2, 3, 5));
    assert_eq!(
        tool.exports(),
        vec![
            ("flows".to_string(), PackageType::Unmanaged),
            ("flows".to_string(), PackageType::Managed),
        ]
    );

    let unpacks = tool.unpacks();
    assert_eq!(unpacks.len(), 2);
    assert_eq!(unpacks[0].archive, PathBuf::from("/out/flows_unmanaged.zip"));
    assert_eq!(unpacks[0].destination, PathBuf::from("/out/flows/unmanaged"));
    assert_eq!(unpacks[1].destination, PathBuf::from("/out/flows/managed"));
    assert_eq!(unpacks[1].package, PackageType::Managed);
    assert!(filesystem.created_dirs().contains(&PathBuf::from("/out")));
}

#[test]
fn test_clears_stale_directory_and_removes_archive() {
    let directory = directory();
    let tool = MockPackageTool::new();
    let filesystem = MockFileSystemProvider::new()
        .with_dir("/out/flows/managed")
        .with_file("/out/flows_managed.zip", "");
    let manager = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));

    manager
        .export_solution("flows", IncrementPolicy::Patch)
        .unwrap();

    let removed = filesystem.removed_paths();
    assert!(removed.contains(&PathBuf::from("/out/flows/managed")));
    assert!(removed.contains(&PathBuf::from("/out/flows_managed.zip")));
    assert!(!removed.contains(&PathBuf::from("/out/flows/unmanaged")));
}

#[test]
fn test_failed_flavor_does_not_skip_the_other() {
    let directory = directory();
    let tool = MockPackageTool::new().with_export_failure("flows", PackageType::Unmanaged, "timeout");
    let filesystem = MockFileSystemProvider::new();
    let manager = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));

    let report = manager
        .export_solution("flows", IncrementPolicy::Patch)
        .unwrap();

    assert!(!report.is_success());
    let failed = report.failed_variants();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].package, PackageType::Unmanaged);
    assert!(failed[0].error.as_deref().unwrap_or_default().contains("timeout"));
    assert_eq!(tool.unpacks().len(), 1);
    assert_eq!(tool.unpacks()[0].package, PackageType::Managed);
}

#[test]
fn test_unpack_failure_still_removes_archive() {
    let directory = directory();
    let tool = MockPackageTool::new().with_unpack_failure(PackageType::Managed, "corrupt archive");
    let filesystem = MockFileSystemProvider::new().with_file("/out/flows_managed.zip", "");
    let manager = ExportManager::new(&directory, &tool, &filesystem, PathBuf::from("/out"));

    let report = manager
        .export_solution("flows", IncrementPolicy::Patch)
        .unwrap();

    assert_eq!(report.failed_variants().len(), 1);
    assert!(filesystem
        .removed_paths()
        .contains(&PathBuf::from("/out/flows_managed.zip")));
}

//! Export/version manager
//!
//! Bumps a solution's version in the environment, then exports both
//! package flavors and unpacks each into `<output>/<solution>/<flavor>`.

use super::version::SolutionVersion;
use crate::application::session::FileSystemProvider;
use crate::dataverse::{DataverseError, SolutionDirectory};
use crate::pac::PackageExporter;
use crate::primitives::{IncrementPolicy, PackageType};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument, warn};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Solution '{solution}' was not found in the environment")]
    NotFound { solution: String },

    #[error("Failed to read the version of '{solution}': {source}")]
    VersionFetch {
        solution: String,
        #[source]
        source: DataverseError,
    },

    #[error("Failed to set '{solution}' to version {version}: {source}")]
    VersionUpdate {
        solution: String,
        version: SolutionVersion,
        #[source]
        source: DataverseError,
    },

    #[error("Cannot prepare output directory {}: {reason}", path.display())]
    OutputDirectory { path: PathBuf, reason: String },
}

impl ExportError {
    pub fn hints(&self) -> Vec<&'static str> {
        match self {
            ExportError::NotFound { .. } => vec![
                "Use the solution's unique name, not its display name",
                "Run 'solflow whoami' to confirm which environment you are connected to",
            ],
            ExportError::VersionFetch { source, .. } => source.hints(),
            ExportError::VersionUpdate { .. } => vec![
                "The identity needs write access to the solution record",
                "Managed solutions cannot be re-versioned in the target environment",
            ],
            ExportError::OutputDirectory { .. } => vec![
                "Check that --output-dir is writable",
                "Close editors or shells holding files under the output directory",
            ],
        }
    }
}

/// Version change applied (or planned) for one solution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersionBump {
    pub previous: SolutionVersion,
    pub next: SolutionVersion,
}

/// Result of exporting and unpacking one package flavor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantOutcome {
    pub package: PackageType,
    pub directory: PathBuf,
    pub error: Option<String>,
}

impl VariantOutcome {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything one `export_solution` call did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportReport {
    pub solution: String,
    pub previous_version: SolutionVersion,
    pub version: SolutionVersion,
    pub variants: Vec<VariantOutcome>,
}

impl ExportReport {
    pub fn is_success(&self) -> bool {
        self.variants.iter().all(VariantOutcome::is_success)
    }

    pub fn failed_variants(&self) -> Vec<&VariantOutcome> {
        self.variants.iter().filter(|v| !v.is_success()).collect()
    }
}

pub struct ExportManager<'a> {
    directory: &'a dyn SolutionDirectory,
    exporter: &'a dyn PackageExporter,
    filesystem: &'a dyn FileSystemProvider,
    output_dir: PathBuf,
}

impl<'a> ExportManager<'a> {
    pub fn new(
        directory: &'a dyn SolutionDirectory,
        exporter: &'a dyn PackageExporter,
        filesystem: &'a dyn FileSystemProvider,
        output_dir: PathBuf,
    ) -> Self {
        Self {
            directory,
            exporter,
            filesystem,
            output_dir,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Read the current version and push its increment. With `dry_run` the
    /// new version is computed but not written.
    #[instrument(skip(self))]
    pub fn bump_version(
        &self,
        solution: &str,
        policy: IncrementPolicy,
        dry_run: bool,
    ) -> Result<VersionBump, ExportError> {
        let previous = self.directory.get_version(solution).map_err(|e| {
            if e.is_not_found() {
                ExportError::NotFound {
                    solution: solution.to_string(),
                }
            } else {
                ExportError::VersionFetch {
                    solution: solution.to_string(),
                    source: e,
                }
            }
        })?;
        let next = previous.increment(policy);

        if dry_run {
            info!(%previous, %next, "Dry run, version left unchanged");
        } else {
            self.directory
                .set_version(solution, next)
                .map_err(|e| ExportError::VersionUpdate {
                    solution: solution.to_string(),
                    version: next,
                    source: e,
                })?;
            info!(%previous, %next, "Solution version updated");
        }

        Ok(VersionBump { previous, next })
    }

    /// Bump the version, then export and unpack both flavors.
    ///
    /// Fails only on version or output-directory errors; a flavor that
    /// fails to export or unpack is recorded in the report and the other
    /// flavor still runs.
    #[instrument(skip(self))]
    pub fn export_solution(
        &self,
        solution: &str,
        policy: IncrementPolicy,
    ) -> Result<ExportReport, ExportError> {
        let bump = self.bump_version(solution, policy, false)?;

        self.filesystem
            .create_dir_all(&self.output_dir)
            .map_err(|e| ExportError::OutputDirectory {
                path: self.output_dir.clone(),
                reason: e.to_string(),
            })?;

        let variants: Vec<VariantOutcome> = PackageType::ALL
            .iter()
            .map(|package| self.export_variant(solution, *package))
            .collect();

        let report = ExportReport {
            solution: solution.to_string(),
            previous_version: bump.previous,
            version: bump.next,
            variants,
        };

        if report.is_success() {
            info!(version = %report.version, "Solution exported");
        } else {
            warn!(
                version = %report.version,
                failed = report.failed_variants().len(),
                "Solution export incomplete"
            );
        }
        Ok(report)
    }

    fn export_variant(&self, solution: &str, package: PackageType) -> VariantOutcome {
        let archive = self
            .output_dir
            .join(format!("{}_{}.zip", solution, package.dir_name()));
        let directory = self.output_dir.join(solution).join(package.dir_name());

        let result = self.package(solution, package, &archive, &directory);
        if let Err(reason) = &result {
            warn!(%package, %reason, "Package variant failed");
        }

        VariantOutcome {
            package,
            directory,
            error: result.err(),
        }
    }

    fn package(
        &self,
        solution: &str,
        package: PackageType,
        archive: &Path,
        directory: &Path,
    ) -> Result<(), String> {
        self.exporter
            .export(solution, package, archive)
            .map_err(|e| e.to_string())?;

        if self.filesystem.exists(directory) {
            self.filesystem
                .remove_dir_all(directory)
                .map_err(|e| format!("Failed to clear {}: {}", directory.display(), e))?;
        }

        let unpacked = self
            .exporter
            .unpack(archive, directory, package)
            .map_err(|e| e.to_string());

        if self.filesystem.exists(archive) {
            if let Err(e) = self.filesystem.remove_file(archive) {
                warn!(archive = %archive.display(), error = %e, "Failed to remove package archive");
            }
        }

        unpacked
    }
}

#[cfg(test)]
mod tests {
    include!("export.test.rs");
}

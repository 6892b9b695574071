//! Four-part solution versions

use crate::primitives::IncrementPolicy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// `major.minor.build.revision`, ordered with `major` most significant
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SolutionVersion {
    pub major: u32,
    pub minor: u32,
    pub build: u32,
    pub revision: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid solution version '{value}': {reason}")]
    Malformed { value: String, reason: String },
}

impl SolutionVersion {
    pub const fn new(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Next version under `policy`. A part already at `u32::MAX` cannot
    /// grow, so the version is returned unchanged instead of resetting the
    /// lower parts; the result is never lower than `self`.
    pub fn increment(&self, policy: IncrementPolicy) -> Self {
        match policy {
            IncrementPolicy::Patch => Self {
                revision: self.revision.saturating_add(1),
                ..*self
            },
            IncrementPolicy::Minor => match self.minor.checked_add(1) {
                Some(minor) => Self::new(self.major, minor, 0, 0),
                None => *self,
            },
            IncrementPolicy::Major => match self.major.checked_add(1) {
                Some(major) => Self::new(major, 0, 0, 0),
                None => *self,
            },
        }
    }
}

impl fmt::Display for SolutionVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

/// Accepts two to four dot-separated parts; missing trailing parts are zero
impl FromStr for SolutionVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &str| VersionError::Malformed {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = s.trim().split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(malformed("expected 2 to 4 dot-separated numbers"));
        }

        let mut numbers = [0u32; 4];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse::<u32>()
                .map_err(|_| malformed("every part must be a non-negative integer"))?;
        }

        let [major, minor, build, revision] = numbers;
        Ok(Self::new(major, minor, build, revision))
    }
}

#[cfg(test)]
mod tests {
    include!("version.test.rs");
}

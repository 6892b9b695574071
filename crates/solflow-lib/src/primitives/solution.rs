use super::impl_fromstr_for_value_enum;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Version increment policy applied before an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IncrementPolicy {
    /// revision + 1
    #[value(aliases = ["revision", "fix"])]
    Patch,

    /// minor + 1, build and revision reset
    #[value(alias = "feature")]
    Minor,

    /// major + 1, everything below reset
    #[value(alias = "breaking")]
    Major,
}

/// Credential flow used to obtain the Dataverse bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMethod {
    /// Delegated login through the Azure CLI session
    #[value(aliases = ["az", "azure-cli"])]
    Interactive,

    /// OAuth device authorization grant
    #[value(alias = "device")]
    DeviceCode,

    /// Service principal (client credentials grant)
    #[value(aliases = ["service-principal", "spn"])]
    ClientSecret,
}

/// Export flavor of a solution package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    Unmanaged,
    Managed,
}

impl PackageType {
    /// Both flavors in the order they are exported
    pub const ALL: [PackageType; 2] = [PackageType::Unmanaged, PackageType::Managed];

    pub fn is_managed(&self) -> bool {
        matches!(self, PackageType::Managed)
    }

    /// Value accepted by `pac solution unpack --packagetype`
    pub fn pac_name(&self) -> &'static str {
        match self {
            PackageType::Unmanaged => "Unmanaged",
            PackageType::Managed => "Managed",
        }
    }

    /// Directory / file-name segment for this flavor
    pub fn dir_name(&self) -> &'static str {
        match self {
            PackageType::Unmanaged => "unmanaged",
            PackageType::Managed => "managed",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl fmt::Display for IncrementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IncrementPolicy::Patch => "patch",
            IncrementPolicy::Minor => "minor",
            IncrementPolicy::Major => "major",
        };
        f.write_str(name)
    }
}

impl fmt::Display for AuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AuthMethod::Interactive => "interactive",
            AuthMethod::DeviceCode => "device-code",
            AuthMethod::ClientSecret => "client-secret",
        };
        f.write_str(name)
    }
}

impl_fromstr_for_value_enum!(IncrementPolicy, "invalid increment policy");
impl_fromstr_for_value_enum!(AuthMethod, "invalid auth method");

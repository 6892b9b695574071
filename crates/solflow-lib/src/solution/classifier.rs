//! Component type to target solution mapping

use std::fmt;

/// Component type code of a connection reference
pub const CONNECTION_REFERENCE_TYPE: i32 = 10112;

/// Symbolic selector the packaging CLI expects for connection references
pub const CONNECTION_REFERENCE_SELECTOR: &str = "ConnectionReference";

/// Target for every type without an explicit mapping
pub const DEFAULT_TARGET: &str = "main";

const TYPE_TARGETS: &[(i32, &str)] = &[
    (CONNECTION_REFERENCE_TYPE, "connectionreference"),
    (29, "flows"),
    (61, "webresources"),
    (91, "plugins"),
    (92, "plugins"),
];

/// Target solution for a component type code. Total: unknown codes map to `main`.
pub fn classify(component_type: i32) -> &'static str {
    TYPE_TARGETS
        .iter()
        .find(|(code, _)| *code == component_type)
        .map(|(_, target)| *target)
        .unwrap_or(DEFAULT_TARGET)
}

/// How a component type is named on the packaging CLI command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentTypeSelector {
    Code(i32),
    Symbolic(&'static str),
}

impl ComponentTypeSelector {
    pub fn for_type(component_type: i32) -> Self {
        if component_type == CONNECTION_REFERENCE_TYPE {
            ComponentTypeSelector::Symbolic(CONNECTION_REFERENCE_SELECTOR)
        } else {
            ComponentTypeSelector::Code(component_type)
        }
    }
}

impl fmt::Display for ComponentTypeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComponentTypeSelector::Code(code) => write!(f, "{}", code),
            ComponentTypeSelector::Symbolic(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    include!("classifier.test.rs");
}

//! Solution component records

use serde::{Deserialize, Serialize};

/// Object ids Dataverse reports for components that cannot be addressed
const PLACEHOLDER_IDS: &[&str] = &["n/a", "null", "none", "00000000-0000-0000-0000-000000000000"];

/// A solution component as reported by the component summary endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    pub display_name: String,
    pub schema_name: String,
    pub component_type: i32,
    pub component_type_name: String,
    pub object_id: String,
}

impl Component {
    /// Best human-readable name: display name, then schema name, then object id
    pub fn label(&self) -> &str {
        [&self.display_name, &self.schema_name, &self.object_id]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty() && !is_placeholder(s))
            .unwrap_or("(unnamed)")
    }

    /// True when the object id can be passed to a move operation
    pub fn is_addressable(&self) -> bool {
        let id = self.object_id.trim();
        !id.is_empty() && !is_placeholder(id)
    }
}

fn is_placeholder(value: &str) -> bool {
    PLACEHOLDER_IDS
        .iter()
        .any(|placeholder| value.eq_ignore_ascii_case(placeholder))
}

#[cfg(test)]
mod tests {
    include!("component.test.rs");
}

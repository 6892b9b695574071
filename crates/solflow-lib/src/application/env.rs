//! Conventional colour and CI variables (`NO_COLOR`, `FORCE_COLOR`,
//! `CLICOLOR`, `CI`) folded into the configured colour intent.

use crate::primitives::{ColorIntent, ConfigError};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StandardEnv {
    pub no_color: Option<String>,
    pub force_color: Option<String>,
    pub clicolor: Option<String>,
    pub ci: Option<String>,
}

impl StandardEnv {
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars())
    }

    /// Read from explicit pairs; envy matches names case-insensitively
    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars).map_err(|e| ConfigError::EnvironmentParsingFailed { source: e })
    }

    /// `CI` set to anything except empty, `false` or `0`
    pub fn is_ci(&self) -> bool {
        !matches!(self.ci.as_deref(), None | Some("" | "false" | "0"))
    }

    /// Resolve the colour intent. CI always disables colour; otherwise
    /// FORCE_COLOR beats NO_COLOR, which beats CLICOLOR=0, which beats the
    /// configured value.
    pub fn apply_color_config(&self, configured: ColorIntent) -> ColorIntent {
        if self.is_ci() {
            return ColorIntent::Never;
        }
        self.forced()
            .or_else(|| self.disabled().then_some(ColorIntent::Never))
            .unwrap_or(configured)
    }

    fn forced(&self) -> Option<ColorIntent> {
        match self.force_color.as_deref()? {
            "0" | "false" => Some(ColorIntent::Never),
            "1" | "2" | "3" | "true" => Some(ColorIntent::Always),
            _ => None,
        }
    }

    fn disabled(&self) -> bool {
        let no_color = self.no_color.as_deref().is_some_and(|v| !v.is_empty());
        no_color || self.clicolor.as_deref() == Some("0")
    }
}

#[cfg(test)]
mod tests {
    include!("env.test.rs");
}

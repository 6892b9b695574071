//! Decision points and where their answers come from

use crate::application::session::InteractiveProvider;
use std::fmt;

/// The three places a migration run stops for a yes/no decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DecisionPoint {
    Proceed,
    Export,
    DeleteSource,
}

impl DecisionPoint {
    /// Answer taken when nobody is asked (`--yes`, no TTY)
    pub fn default_answer(&self) -> bool {
        match self {
            DecisionPoint::Proceed | DecisionPoint::Export => true,
            DecisionPoint::DeleteSource => false,
        }
    }
}

impl fmt::Display for DecisionPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecisionPoint::Proceed => "proceed",
            DecisionPoint::Export => "export",
            DecisionPoint::DeleteSource => "delete-source",
        };
        f.write_str(name)
    }
}

/// Pre-supplied answers, one optional flag per decision point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecisionFlags {
    pub proceed: Option<bool>,
    pub export: Option<bool>,
    pub delete_source: Option<bool>,
}

impl DecisionFlags {
    pub fn get(&self, point: DecisionPoint) -> Option<bool> {
        match point {
            DecisionPoint::Proceed => self.proceed,
            DecisionPoint::Export => self.export,
            DecisionPoint::DeleteSource => self.delete_source,
        }
    }
}

/// Source of answers for decision points
pub trait ConfirmationSource {
    fn confirm(&self, point: DecisionPoint, question: &str) -> anyhow::Result<bool>;
}

/// Ask a human through the session's interactive provider
pub struct PromptConfirmation<'a> {
    interactive: &'a dyn InteractiveProvider,
}

impl<'a> PromptConfirmation<'a> {
    pub fn new(interactive: &'a dyn InteractiveProvider) -> Self {
        Self { interactive }
    }
}

impl ConfirmationSource for PromptConfirmation<'_> {
    fn confirm(&self, point: DecisionPoint, question: &str) -> anyhow::Result<bool> {
        self.interactive.confirm(question, point.default_answer())
    }
}

/// Answer from flags only; unset flags take the point's default
pub struct PresetConfirmation {
    flags: DecisionFlags,
}

impl PresetConfirmation {
    pub fn new(flags: DecisionFlags) -> Self {
        Self { flags }
    }
}

impl ConfirmationSource for PresetConfirmation {
    fn confirm(&self, point: DecisionPoint, _question: &str) -> anyhow::Result<bool> {
        Ok(self.flags.get(point).unwrap_or(point.default_answer()))
    }
}

/// Flag when given, otherwise fall through to another source
pub struct FlagsThenPrompt<S> {
    flags: DecisionFlags,
    fallback: S,
}

impl<S: ConfirmationSource> FlagsThenPrompt<S> {
    pub fn new(flags: DecisionFlags, fallback: S) -> Self {
        Self { flags, fallback }
    }
}

impl<S: ConfirmationSource> ConfirmationSource for FlagsThenPrompt<S> {
    fn confirm(&self, point: DecisionPoint, question: &str) -> anyhow::Result<bool> {
        match self.flags.get(point) {
            Some(answer) => {
                tracing::debug!(%point, answer, "Decision taken from flag");
                Ok(answer)
            }
            None => self.fallback.confirm(point, question),
        }
    }
}

#[cfg(test)]
mod tests {
    include!("confirm.test.rs");
}

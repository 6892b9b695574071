//! User-facing output
//!
//! Status lines, progress bars and tables go to stdout through the
//! provider traits; tracing output stays on its own channel.

use crate::primitives::ConfigError;
use crate::terminal::TerminalCapabilities;
use std::sync::OnceLock;

pub mod live;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod providers;
pub mod status;
pub mod structured;
pub mod styling;

pub use live::LiveDisplayProvider;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::{DisplayCall, MockDisplayProvider};
pub use providers::{
    BatchSummary, DisplayProvider, DisplayProviderExt, ProgressProvider, ProgressTracker,
    StatusProvider, StructuredProvider,
};

static GLOBAL_DISPLAY: OnceLock<Display> = OnceLock::new();

/// Styling and terminal facts shared by every display surface
pub struct Display {
    capabilities: TerminalCapabilities,
    styling: styling::StyleManager,
}

impl Display {
    fn new(capabilities: TerminalCapabilities) -> Self {
        let styling = styling::StyleManager::new(&capabilities);
        Self {
            capabilities,
            styling,
        }
    }

    /// Install the process-wide display; fails if one is already set
    pub fn init(capabilities: TerminalCapabilities) -> Result<&'static Self, ConfigError> {
        GLOBAL_DISPLAY
            .set(Display::new(capabilities))
            .map_err(|_| ConfigError::AlreadyInitialized)?;
        Ok(Self::global())
    }

    /// Global display; falls back to plain ASCII output if `init` never ran
    pub fn global() -> &'static Self {
        GLOBAL_DISPLAY.get_or_init(|| Display::new(TerminalCapabilities::default()))
    }

    pub fn status() -> status::StatusDisplay<'static> {
        status::StatusDisplay::new(&Self::global().styling)
    }

    pub fn table() -> structured::StructuredDisplay<'static> {
        let display = Self::global();
        structured::StructuredDisplay::new(&display.styling, &display.capabilities)
    }

    pub fn capabilities() -> &'static TerminalCapabilities {
        &Self::global().capabilities
    }
}

//! Terminal capability detection
//!
//! Decides colour depth, unicode support, and width once per process so the
//! display and logging layers can render consistently.

pub mod capabilities;

pub use capabilities::TerminalCapabilities;

//! Report data structures for commands.
//!
//! Commands collect what they want to show into a report, then render it to
//! an [`Output`] target.

mod check;
mod output;

pub use check::CheckReport;
pub use output::{Report, TerminalOutput};

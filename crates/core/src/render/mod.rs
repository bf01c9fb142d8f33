//! Stand-alone rendering primitives: spinner, progress bar and table.
//!
//! Like the prompts, these only produce styled [`Line`](crate::style::Line)s;
//! drawing them is up to the caller.

pub mod progress;
pub mod spinner;
pub mod table;

pub use progress::ProgressBar;
pub use spinner::Spinner;
pub use table::Table;

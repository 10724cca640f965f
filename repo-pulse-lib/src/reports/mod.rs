//! Rendering of finished activity reports
//!
//! Two generators are provided, both operating on a complete
//! [`ActivityReport`](crate::activity::ActivityReport):
//! - **Console**: Plain-text tables, optionally colored
//! - **JSON**: Machine-readable structured data
//!
//! A report that failed is rendered as its error message in place of its data, so one
//! failing section never hides the others.

mod console;
mod json;

pub use console::generate as generate_console;
pub use json::generate as generate_json;

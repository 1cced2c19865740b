//! Widget components for the GUI
//!
//! - `LogList` - transfer log with status glyphs and explorer links

mod log_list;

pub use log_list::LogList;

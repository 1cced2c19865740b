//! GUI module for Holdsend
//!
//! The graphical user interface built with egui/eframe.
//!
//! ## Module Structure
//!
//! - `app` - GuiApp state, job polling and the frame loop
//! - `async_job` - one-shot background jobs polled from the GUI thread
//! - `theme` - colors, spacing and styled widget factories (AppTheme)
//! - `helpers` - status glyphs and label formatting
//! - `notifications` - timestamped entries for the error banner
//! - `views` - wallet connection and transfer form
//! - `widgets` - the transfer log list
//!
//! ## Usage
//!
//! ```no_run
//! use holdsend::config::Config;
//! use holdsend::gui;
//!
//! let config = Config::from_env().expect("invalid configuration");
//! gui::launch(config).expect("Failed to launch GUI");
//! ```

mod app;
pub mod async_job;
pub mod helpers;
pub mod notifications;
pub mod theme;
pub mod views;
pub mod widgets;

pub use app::{launch, GuiApp};

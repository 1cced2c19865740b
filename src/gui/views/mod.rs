//! View modules for the GUI
//!
//! Each submodule adds rendering methods on `GuiApp`, called from `App::update`.
//!
//! - `connection` - wallet backend, account and connect button
//! - `transfer` - recipient/token/amount form and the hold-to-send button

pub mod connection;
pub mod transfer;

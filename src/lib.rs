//! Holdsend: keep sending an ERC20 transfer to a fixed set of recipients
//! for as long as a button is held.

pub mod config;
pub mod dispatcher;
pub mod form;
pub mod gui;
pub mod hold;
pub mod log_store;
pub mod token;
pub mod utils;
pub mod wallet;

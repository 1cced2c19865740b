//! Formatting helpers for the GUI
//!
//! Status glyphs, colors and the short labels shown in the banner and log rows.

use super::theme::AppTheme;
use crate::log_store::LogStatus;
use crate::utils;
use chrono::{DateTime, Local};
use eframe::egui;
use ethers::types::Address;

/// ASCII status indicator for a log entry
pub fn status_glyph(status: LogStatus) -> &'static str {
    match status {
        LogStatus::Idle => "[ ]",
        LogStatus::Pending => "[..]",
        LogStatus::Success => "[OK]",
        LogStatus::Error => "[!!]",
    }
}

pub fn status_color(status: LogStatus, theme: &AppTheme) -> egui::Color32 {
    match status {
        LogStatus::Idle => theme.text_secondary,
        LogStatus::Pending => theme.warning,
        LogStatus::Success => theme.success,
        LogStatus::Error => theme.error,
    }
}

/// Wall-clock time of a log entry, e.g. `14:03:27`
pub fn format_timestamp(timestamp: &DateTime<Local>) -> String {
    timestamp.format("%H:%M:%S").to_string()
}

/// Banner text for the connection state
pub fn connection_label(account: Option<&Address>, chain_id: Option<u64>) -> String {
    match (account, chain_id) {
        (Some(account), Some(chain_id)) => {
            format!("Connected: {} (chain {})", utils::short_address(account), chain_id)
        }
        (Some(account), None) => format!("Connected: {}", utils::short_address(account)),
        (None, _) => "Not connected".to_string(),
    }
}

pub fn hold_button_label(holding: bool) -> &'static str {
    if holding {
        "[>>] SENDING... release to stop"
    } else {
        "[>] HOLD TO SEND"
    }
}

/// Hover hint explaining why the hold button is disabled, if it is
pub fn hold_disabled_reason(connected: bool, submittable: bool) -> Option<&'static str> {
    if !connected {
        Some("Connect a wallet first")
    } else if !submittable {
        Some("Enter at least one recipient, a token address and an amount")
    } else {
        None
    }
}

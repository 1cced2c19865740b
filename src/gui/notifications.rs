//! Timestamped message shown in the top-level error banner

/// A message with the time it was raised
#[derive(Clone, Debug)]
pub struct NotificationEntry {
    pub message: String,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl NotificationEntry {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timestamp: chrono::Local::now(),
        }
    }

    pub fn time_ago(&self) -> String {
        let now = chrono::Local::now();
        let duration = now.signed_duration_since(self.timestamp);
        if duration.num_seconds() < 60 {
            "just now".to_string()
        } else if duration.num_minutes() < 60 {
            format!("{}m ago", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h ago", duration.num_hours())
        } else {
            self.timestamp.format("%m/%d %H:%M").to_string()
        }
    }
}

// Utility functions for the admin console

use chrono::{DateTime, Utc};

/// Format datetime for API responses
pub fn format_datetime(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Format an optional upstream timestamp, `N/A` when absent
pub fn format_optional_datetime(dt: Option<DateTime<Utc>>) -> String {
    dt.map(format_datetime).unwrap_or_else(|| "N/A".to_string())
}

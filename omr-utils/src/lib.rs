//! Shared utility functions for OMR crates.

/// Date utility functions
pub mod dates {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Cadence of DSM2 tidefile output: one sample every 15 minutes.
    pub const QUARTER_HOUR_MINUTES: i64 = 15;

    /// Format a NaiveDate as "YYYY-MM-DD"
    pub fn format_date(date: &NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }

    /// Parse a date string in "YYYY-MM-DD" format
    pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y-%m-%d")?)
    }

    /// Parse a date string in "YYYYMMDD" format (run-id compact format)
    pub fn parse_date_compact(s: &str) -> anyhow::Result<NaiveDate> {
        Ok(NaiveDate::parse_from_str(s, "%Y%m%d")?)
    }

    /// Parse a timestamp string in "YYYY-MM-DD HH:MM:SS" format, also
    /// accepting the short "YYYY-MM-DD HH:MM" form seen in exported CSVs.
    pub fn parse_datetime(s: &str) -> anyhow::Result<NaiveDateTime> {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(dt);
        }
        Ok(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")?)
    }

}

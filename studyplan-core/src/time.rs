//! Date utilities: deadline parsing and "today" resolution.

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;

/// Parse an ISO-8601 calendar date like "2026-02-20".
pub fn parse_deadline(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date '{s}'"))
}

/// Current calendar date, either on the local clock or in an IANA timezone like
/// "America/Chicago".
pub fn today_in(tz: Option<&str>) -> Result<NaiveDate> {
    match tz {
        None => Ok(Local::now().date_naive()),
        Some(name) => {
            let tz: Tz = name
                .parse()
                .map_err(|_| anyhow::anyhow!("invalid timezone: {name}"))?;
            Ok(Utc::now().with_timezone(&tz).date_naive())
        }
    }
}

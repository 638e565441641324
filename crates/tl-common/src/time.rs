//! Monthly climatology timestamps.

use crate::error::{TlError, TlResult};
use chrono::{DateTime, TimeZone, Utc};

/// Number of climatological values per grid cell.
pub const MONTHS_PER_YEAR: usize = 12;

/// Reference year for month timestamps. Only the month is meaningful.
pub const DEFAULT_REFERENCE_YEAR: i32 = 2000;

/// First instant (00:00 UTC) of each month of `year`, January first.
pub fn climatology_months(year: i32) -> TlResult<Vec<DateTime<Utc>>> {
    (1..=MONTHS_PER_YEAR as u32)
        .map(|month| {
            Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
                .single()
                .ok_or_else(|| TlError::Config(format!("no month start for {}-{:02}", year, month)))
        })
        .collect()
}

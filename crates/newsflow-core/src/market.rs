//! US equity market session check.

use chrono::{DateTime, Datelike, NaiveTime, Utc, Weekday};
use chrono_tz::America::New_York;

/// Whether `now` falls inside the NYSE regular session (09:30-16:00
/// America/New_York, Monday to Friday). Exchange holidays are not modelled.
pub fn is_us_market_open(now: DateTime<Utc>) -> bool {
    let local = now.with_timezone(&New_York);
    if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return false;
    }

    let open = NaiveTime::from_hms_opt(9, 30, 0);
    let close = NaiveTime::from_hms_opt(16, 0, 0);
    match (open, close) {
        (Some(open), Some(close)) => {
            let time = local.time();
            time >= open && time < close
        }
        _ => false,
    }
}

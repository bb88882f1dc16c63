use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Returns the current time in the configured timezone.
pub fn now_in_timezone(tz: &Tz) -> DateTime<Tz> {
    Utc::now().with_timezone(tz)
}

/// Returns today's date in the configured timezone.
pub fn today_local(tz: &Tz) -> NaiveDate {
    now_in_timezone(tz).date_naive()
}

/// UTC bounds `[start, end)` of a local calendar day.
pub fn day_bounds_utc(date: NaiveDate, tz: &Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
    let start = tz
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&midnight));
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_in_timezone_returns_datetime_in_tz() {
        let tz = chrono_tz::Asia::Tokyo;
        let result = now_in_timezone(&tz);
        assert_eq!(result.timezone(), tz);
    }

    #[test]
    fn today_local_matches_utc_date_for_utc_zone() {
        let tz = chrono_tz::UTC;
        let diff = (today_local(&tz) - Utc::now().date_naive()).num_days().abs();
        assert!(diff <= 1);
    }

    #[test]
    fn day_bounds_follow_the_local_offset() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let (start, end) = day_bounds_utc(date, &chrono_tz::Asia::Tokyo);
        assert_eq!(start.to_rfc3339(), "2024-02-29T15:00:00+00:00");
        assert_eq!(end - start, Duration::days(1));
    }
}

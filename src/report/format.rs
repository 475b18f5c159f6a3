use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Interpret a PostgREST timestamp in the report timezone.
///
/// `timestamptz` values carry an offset. Bare `timestamp` values are stored
/// as UTC. Bare `date` values are calendar days, taken as local midnight.
pub fn to_local(raw: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&tz));
    }
    // "2024-05-01 10:00:00+00" style offsets
    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&tz));
        }
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive).with_timezone(&tz));
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    tz.from_local_datetime(&date.and_hms_opt(0, 0, 0)?).earliest()
}

/// `DD/MM/YYYY`
pub fn format_date(raw: Option<&str>, tz: Tz) -> String {
    raw.and_then(|r| to_local(r, tz))
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_default()
}

/// `HH:MM`
pub fn format_hour(raw: Option<&str>, tz: Tz) -> String {
    raw.and_then(|r| to_local(r, tz))
        .map(|dt| dt.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Decimal hours as `HH:MM`.
pub fn format_duration(hours: Option<f64>) -> String {
    let Some(hours) = hours else {
        return String::new();
    };
    let mut whole = hours.floor() as i64;
    let mut minutes = ((hours - hours.floor()) * 60.0).round() as i64;
    if minutes == 60 {
        whole += 1;
        minutes = 0;
    }
    format!("{:02}:{:02}", whole, minutes)
}

/// `$X.XX`
pub fn format_money(value: f64) -> String {
    format!("${:.2}", value)
}

pub fn format_money_opt(value: Option<f64>) -> String {
    value.map(format_money).unwrap_or_default()
}

/// `MM-YYYY` stamp used in liquidation codes.
pub fn month_stamp<T: TimeZone>(now: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    now.format("%m-%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::Guayaquil;

    #[test]
    fn formats_timestamptz_in_local_time() {
        // 03:30 UTC is still the previous day in Guayaquil (UTC-5)
        let raw = Some("2024-05-02T03:30:00+00:00");
        assert_eq!(format_date(raw, Guayaquil), "01/05/2024");
        assert_eq!(format_hour(raw, Guayaquil), "22:30");
    }

    #[test]
    fn formats_postgres_short_offset() {
        assert_eq!(format_hour(Some("2024-05-01 15:05:00+00"), Guayaquil), "10:05");
    }

    #[test]
    fn bare_timestamp_is_utc() {
        assert_eq!(format_hour(Some("2024-05-01T15:00:00"), Guayaquil), "10:00");
        assert_eq!(format_hour(Some("2024-05-01T15:00:00.123456"), Guayaquil), "10:00");
    }

    #[test]
    fn bare_date_keeps_calendar_day() {
        assert_eq!(format_date(Some("2024-05-01"), Guayaquil), "01/05/2024");
    }

    #[test]
    fn missing_or_garbage_is_blank() {
        assert_eq!(format_date(None, Guayaquil), "");
        assert_eq!(format_date(Some("mañana"), Guayaquil), "");
    }

    #[test]
    fn duration_as_hours_and_minutes() {
        assert_eq!(format_duration(Some(1.5)), "01:30");
        assert_eq!(format_duration(Some(0.25)), "00:15");
        assert_eq!(format_duration(Some(12.0)), "12:00");
        assert_eq!(format_duration(Some(2.999)), "03:00");
        assert_eq!(format_duration(None), "");
    }

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(format_money(12.5), "$12.50");
        assert_eq!(format_money(0.0), "$0.00");
        assert_eq!(format_money_opt(None), "");
    }

    #[test]
    fn month_stamp_is_zero_padded() {
        let now = Guayaquil.with_ymd_and_hms(2024, 3, 9, 12, 0, 0).unwrap();
        assert_eq!(month_stamp(&now), "03-2024");
    }
}

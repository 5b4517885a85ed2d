//! Date and time parsing for calendar requests and responses.

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};

use crate::error::{Error, Result};

/// Formats Graph uses in `dateTimeTimeZone.dateTime`, tried in order.
const GRAPH_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S"];

/// Naive input formats accepted for `--start` / `--end`, read as UTC.
const INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Parses a Graph `dateTime` in zone `tz`.
///
/// Requests ask Graph for UTC, so only `UTC` (or an empty zone) is expected;
/// other zones are read as UTC as well. Returns `None` if unparseable.
#[must_use]
pub fn parse_date_time(dt: &str, tz: &str) -> Option<DateTime<Utc>> {
    let dt = dt.trim();
    if dt.is_empty() {
        return None;
    }
    if !tz.is_empty() && !tz.eq_ignore_ascii_case("UTC") {
        tracing::debug!(%tz, "non-UTC event time zone, reading as UTC");
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(dt) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = dt.strip_suffix('Z').unwrap_or(dt);
    GRAPH_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(naive, f).ok())
        .map(|n| n.and_utc())
}

/// Formats `dt` the way event create requests expect (zone sent separately).
#[must_use]
pub fn to_graph_date_time(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// `TimeDelta` holds at most `i64::MAX` milliseconds.
#[allow(clippy::cast_precision_loss)]
const MAX_DURATION_MS: f64 = i64::MAX as f64;

/// Interprets a wall-clock time in the local zone.
///
/// In a DST gap the time is shifted forward by the gap; in an overlap the
/// earlier instant wins.
fn local_to_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| Local.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map_or_else(|| naive.and_utc(), |t| t.with_timezone(&Utc))
}

fn local_midnight(date: NaiveDate) -> DateTime<Utc> {
    local_to_utc(date.and_time(NaiveTime::MIN))
}

/// `[midnight today, midnight today + days)` in local time, as UTC.
#[must_use]
pub fn days_window(today: NaiveDate, days: u32) -> (DateTime<Utc>, DateTime<Utc>) {
    let end = today
        .checked_add_days(chrono::Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX);
    (local_midnight(today), local_midnight(end))
}

/// The local calendar day containing `today`.
#[must_use]
pub fn today_window(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    days_window(today, 1)
}

/// Monday through Sunday of the week containing `today`.
#[must_use]
pub fn week_window(today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    days_window(monday, 7)
}

/// Parses an all-day start date (`YYYY-MM-DD`) as UTC midnight.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for anything else.
pub fn parse_all_day(input: &str) -> Result<DateTime<Utc>> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
        .map_err(|e| {
            Error::InvalidInput(format!(
                "invalid start date (use YYYY-MM-DD for all-day events): {e}"
            ))
        })
}

/// Parses a start or end time: RFC 3339, or a naive time read as UTC.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if no format matches.
pub fn parse_time_input(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }
    INPUT_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(input, f).ok())
        .map(|n| n.and_utc())
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "invalid time {input:?} (use RFC3339 or YYYY-MM-DDTHH:MM:SS in UTC)"
            ))
        })
}

/// Parses a duration like `30m`, `1h`, `2h30m`, `1.5h` or `90s`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for empty input, missing units, unknown
/// units or a non-positive total.
pub fn parse_duration(input: &str) -> Result<Duration> {
    let invalid = || Error::InvalidInput(format!("invalid duration: {input:?}"));
    let mut rest = input.trim();
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total_ms: f64 = 0.0;
    while !rest.is_empty() {
        let num_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(invalid)?;
        if num_len == 0 {
            return Err(invalid());
        }
        let value: f64 = rest[..num_len].parse().map_err(|_| invalid())?;
        rest = &rest[num_len..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let factor = match &rest[..unit_len] {
            "h" => 3_600_000.0,
            "m" => 60_000.0,
            "s" => 1_000.0,
            "ms" => 1.0,
            _ => return Err(invalid()),
        };
        rest = &rest[unit_len..];
        total_ms += value * factor;
    }

    if total_ms <= 0.0 || !total_ms.is_finite() {
        return Err(invalid());
    }
    let out_of_range = || Error::InvalidInput(format!("duration out of range: {input:?}"));
    if total_ms.round() >= MAX_DURATION_MS {
        return Err(out_of_range());
    }
    #[allow(clippy::cast_possible_truncation)]
    let ms = total_ms.round() as i64;
    Duration::try_milliseconds(ms).ok_or_else(out_of_range)
}

fn add(start: DateTime<Utc>, length: Duration) -> Result<DateTime<Utc>> {
    start
        .checked_add_signed(length)
        .ok_or_else(|| Error::InvalidInput("event end is out of range".to_string()))
}

/// Resolves the start and end of a new event from command-line input.
///
/// All-day events take a `YYYY-MM-DD` start and default to one day. Timed
/// events use `end` when given, else `start + duration`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if any value is malformed or the end is
/// not after the start.
pub fn resolve_event_times(
    start: &str,
    end: Option<&str>,
    duration: &str,
    all_day: bool,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let start_at = if all_day {
        parse_all_day(start)?
    } else {
        parse_time_input(start)?
    };

    let end_at = match end.map(str::trim).filter(|e| !e.is_empty()) {
        Some(end) if all_day => parse_all_day(end)
            .or_else(|_| parse_time_input(end))
            .map_err(|_| Error::InvalidInput(format!("invalid end time: {end:?}")))?,
        Some(end) => parse_time_input(end)
            .map_err(|_| Error::InvalidInput(format!("invalid end time: {end:?}")))?,
        None if all_day => add(start_at, Duration::days(1))?,
        None => add(start_at, parse_duration(duration)?)?,
    };

    if end_at <= start_at {
        return Err(Error::InvalidInput(
            "event end must be after its start".to_string(),
        ));
    }
    Ok((start_at, end_at))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_parse_date_time_formats() {
        let want = utc(2024, 1, 15, 10, 0, 0);
        assert_eq!(parse_date_time("2024-01-15T10:00:00.0000000", "UTC"), Some(want));
        assert_eq!(parse_date_time("2024-01-15T10:00:00", "UTC"), Some(want));
        assert_eq!(parse_date_time("2024-01-15T10:00:00Z", ""), Some(want));
        assert_eq!(parse_date_time("2024-01-15T11:00:00+01:00", "UTC"), Some(want));
        assert_eq!(parse_date_time("not a date", "UTC"), None);
        assert_eq!(parse_date_time("", "UTC"), None);
    }

    #[test]
    fn test_to_graph_date_time() {
        assert_eq!(
            to_graph_date_time(utc(2024, 1, 15, 14, 5, 9)),
            "2024-01-15T14:05:09"
        );
    }

    #[test]
    fn test_windows() {
        // Wednesday
        let today = NaiveDate::from_ymd_opt(2024, 1, 17).unwrap();

        let (start, end) = today_window(today);
        assert_eq!(start.with_timezone(&Local).date_naive(), today);
        assert_eq!(
            end.with_timezone(&Local).date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 18).unwrap()
        );

        let (start, end) = week_window(today);
        assert_eq!(
            start.with_timezone(&Local).date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert_eq!(
            end.with_timezone(&Local).date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 22).unwrap()
        );

        let (start, end) = days_window(today, 7);
        assert_eq!(end - start, Duration::days(7));
    }

    #[test]
    fn test_week_window_on_sunday() {
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 21).unwrap();
        let (start, _) = week_window(sunday);
        assert_eq!(
            start.with_timezone(&Local).date_naive(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("30m").unwrap(), Duration::minutes(30));
        assert_eq!(parse_duration("1h").unwrap(), Duration::hours(1));
        assert_eq!(parse_duration("2h30m").unwrap(), Duration::minutes(150));
        assert_eq!(parse_duration("1.5h").unwrap(), Duration::minutes(90));
        assert_eq!(parse_duration("90s").unwrap(), Duration::seconds(90));
        for bad in ["", "h", "10", "5d", "0m", "1h-2m"] {
            assert!(parse_duration(bad).is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_parse_time_input() {
        assert_eq!(
            parse_time_input("2024-01-15T14:00:00Z").unwrap(),
            utc(2024, 1, 15, 14, 0, 0)
        );
        assert_eq!(
            parse_time_input("2024-01-15T14:00:00").unwrap(),
            utc(2024, 1, 15, 14, 0, 0)
        );
        assert_eq!(
            parse_time_input("2024-01-15 14:00").unwrap(),
            utc(2024, 1, 15, 14, 0, 0)
        );
        assert_eq!(
            parse_time_input("2024-01-15T16:00:00+02:00").unwrap(),
            utc(2024, 1, 15, 14, 0, 0)
        );
        assert!(parse_time_input("tomorrow").is_err());
    }

    #[test]
    fn test_parse_duration_out_of_range() {
        assert!(parse_duration("99999999999999999999ms").is_err());
        assert!(parse_duration("9999999999999999h").is_err());
        assert_eq!(
            parse_duration("9007199254740ms").unwrap(),
            Duration::milliseconds(9_007_199_254_740)
        );
    }

    #[test]
    fn test_resolve_event_times_rejects_overflowing_end() {
        assert!(resolve_event_times("2024-01-15T10:00:00Z", None, "9999999999h", false).is_err());
        assert!(
            resolve_event_times("2024-01-15T10:00:00Z", None, "2562047788015h", false).is_err()
        );
    }

    #[test]
    fn test_resolve_event_times() {
        let (start, end) =
            resolve_event_times("2024-01-15T10:00:00Z", None, "30m", false).unwrap();
        assert_eq!(end - start, Duration::minutes(30));

        let (start, end) = resolve_event_times(
            "2024-01-15T10:00:00Z",
            Some("2024-01-15T12:00:00Z"),
            "30m",
            false,
        )
        .unwrap();
        assert_eq!(end - start, Duration::hours(2));

        let (start, end) = resolve_event_times("2024-01-20", None, "1h", true).unwrap();
        assert_eq!(start, utc(2024, 1, 20, 0, 0, 0));
        assert_eq!(end, utc(2024, 1, 21, 0, 0, 0));

        assert!(resolve_event_times("2024-01-20T10:00:00", None, "1h", true).is_err());
        assert!(
            resolve_event_times(
                "2024-01-15T10:00:00Z",
                Some("2024-01-15T09:00:00Z"),
                "1h",
                false
            )
            .is_err()
        );
    }
}

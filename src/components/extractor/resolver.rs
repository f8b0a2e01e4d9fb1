use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone};
use chrono_english::{parse_date_string, Dialect};
use chrono_tz::Tz;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref FILLER_AT: Regex = Regex::new(r"(?i)\s+at\s+(\d)").expect("filler pattern is valid");
    static ref OFFSET: Regex =
        Regex::new(r"(?i)^in\s+(?P<count>\d+|an?|one)\s+(?P<unit>minute|min|hour|hr|day|week)s?$")
            .expect("offset pattern is valid");
    static ref DAY_OF_MONTH: Regex = Regex::new(
        r"(?i)^(?:the\s+(?P<day>\d{1,2})(?:st|nd|rd|th)?|(?P<ordinal>\d{1,2})(?:st|nd|rd|th))(?:\s+(?P<time>.+))?$"
    )
    .expect("day-of-month pattern is valid");
    static ref DAY_AND_TIME: Regex =
        Regex::new(r"(?i)^(?P<day>.+?)\s+(?P<time>\d{1,2}(?::\d{2})?\s*(?:am|pm)?)$")
            .expect("day-and-time pattern is valid");
    static ref TIME_OF_DAY: Regex =
        Regex::new(r"(?i)^(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?\s*(?P<meridiem>am|pm)?$")
            .expect("time-of-day pattern is valid");
    static ref NEXT_WEEKDAY: Regex =
        Regex::new(r"(?i)^next\s+(?:mon|tues|wednes|thurs|fri|satur|sun)day\b")
            .expect("next-weekday pattern is valid");
}

/// Resolve a natural-language time phrase relative to `now`
///
/// Handles relative expressions ("tomorrow at 3pm", "next friday 8pm",
/// "in 2 hours"), days of the month ("the 20th") and absolute dates.
/// Ambiguous numeric dates are read month first. Returns `None` when the
/// phrase cannot be resolved.
pub fn resolve(phrase: &str, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let phrase = normalize(phrase);
    if phrase.is_empty() {
        return None;
    }

    if let Some(resolved) = resolve_offset(&phrase, now) {
        return Some(resolved);
    }

    if let Some(resolved) = resolve_day_of_month(&phrase, now) {
        return Some(resolved);
    }

    let resolved = match parse_date_string(&phrase, now, Dialect::Us) {
        Ok(resolved) => resolved,
        Err(e) => {
            debug!("Could not resolve time phrase {:?} directly: {}", phrase, e);
            resolve_day_and_time(&phrase, now)?
        }
    };

    Some(push_past_today(&phrase, resolved, now))
}

/// Collapse whitespace and drop the filler "at" before a time
fn normalize(phrase: &str) -> String {
    let collapsed = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
    FILLER_AT.replace_all(&collapsed, " ${1}").into_owned()
}

/// "in 2 hours", "in a day"
fn resolve_offset(phrase: &str, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let caps = OFFSET.captures(phrase)?;

    let count = match caps["count"].to_ascii_lowercase().as_str() {
        "a" | "an" | "one" => 1,
        digits => digits.parse::<i64>().ok()?,
    };

    let offset = match caps["unit"].to_ascii_lowercase().as_str() {
        "minute" | "min" => Duration::try_minutes(count)?,
        "hour" | "hr" => Duration::try_hours(count)?,
        "day" => Duration::try_days(count)?,
        "week" => Duration::try_weeks(count)?,
        _ => return None,
    };

    now.checked_add_signed(offset)
}

/// "the 20th", "21st at 3pm": the next such day, today included
fn resolve_day_of_month(phrase: &str, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let caps = DAY_OF_MONTH.captures(phrase)?;

    let day = caps
        .name("day")
        .or_else(|| caps.name("ordinal"))?
        .as_str()
        .parse::<u32>()
        .ok()?;

    let time = match caps.name("time") {
        Some(time) => parse_time_of_day(time.as_str())?,
        None => NaiveTime::MIN,
    };

    let today = now.date_naive();
    let mut year = today.year();
    let mut month = today.month();

    // Months without that day are skipped
    for _ in 0..12 {
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            if date >= today {
                return at_local(date, time, now.timezone());
            }
        }
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    None
}

/// "tomorrow 3pm" when the resolver only understands the day part
fn resolve_day_and_time(phrase: &str, now: DateTime<Tz>) -> Option<DateTime<Tz>> {
    let caps = DAY_AND_TIME.captures(phrase)?;

    let time = parse_time_of_day(&caps["time"])?;
    let day = parse_date_string(&caps["day"], now, Dialect::Us).ok()?;

    at_local(day.date_naive(), time, now.timezone())
}

/// Parse "3pm", "10:30", "8:15 am"
pub fn parse_time_of_day(text: &str) -> Option<NaiveTime> {
    let caps = TIME_OF_DAY.captures(text.trim())?;

    let mut hour = caps["hour"].parse::<u32>().ok()?;
    let minute = match caps.name("minute") {
        Some(minute) => minute.as_str().parse::<u32>().ok()?,
        None => 0,
    };

    if let Some(meridiem) = caps.name("meridiem") {
        if hour == 0 || hour > 12 {
            return None;
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }

    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// "next <weekday>" always lands after today
fn push_past_today(phrase: &str, resolved: DateTime<Tz>, now: DateTime<Tz>) -> DateTime<Tz> {
    if !NEXT_WEEKDAY.is_match(phrase) || resolved.date_naive() > now.date_naive() {
        return resolved;
    }

    let next_week = resolved.naive_local() + Duration::days(7);
    now.timezone()
        .from_local_datetime(&next_week)
        .earliest()
        .unwrap_or(resolved + Duration::days(7))
}

fn at_local(date: NaiveDate, time: NaiveTime, tz: Tz) -> Option<DateTime<Tz>> {
    tz.from_local_datetime(&date.and_time(time)).earliest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Timelike, Weekday};

    fn reference_now() -> DateTime<Tz> {
        // Friday, 2026-10-16 at 09:00
        chrono_tz::UTC.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap()
    }

    fn ymd_hm(dt: DateTime<Tz>) -> (i32, u32, u32, u32, u32) {
        (dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute())
    }

    #[test]
    fn test_resolve_relative_day() {
        let now = reference_now();
        let resolved = resolve("tomorrow", now).unwrap();

        assert_eq!(resolved.date_naive(), (now + Duration::days(1)).date_naive());
    }

    #[test]
    fn test_resolve_offsets() {
        let now = reference_now();

        assert_eq!(resolve("in 2 hours", now), Some(now + Duration::hours(2)));
        assert_eq!(resolve("In an hour", now), Some(now + Duration::hours(1)));
        assert_eq!(resolve("in 45 minutes", now), Some(now + Duration::minutes(45)));
        assert_eq!(resolve("in 3 days", now), Some(now + Duration::days(3)));
        assert_eq!(resolve("in 1 week", now), Some(now + Duration::weeks(1)));
    }

    #[test]
    fn test_resolve_day_with_time() {
        let now = reference_now();

        let resolved = resolve("tomorrow at 3pm", now).unwrap();
        assert_eq!(ymd_hm(resolved), (2026, 10, 17, 15, 0));

        let resolved = resolve("tomorrow 10:30", now).unwrap();
        assert_eq!(ymd_hm(resolved), (2026, 10, 17, 10, 30));
    }

    #[test]
    fn test_resolve_next_weekday_on_that_weekday() {
        let now = reference_now();
        assert_eq!(now.weekday(), Weekday::Fri);

        let resolved = resolve("next Friday 3pm", now).unwrap();
        assert_eq!(ymd_hm(resolved), (2026, 10, 23, 15, 0));

        let resolved = resolve("next friday at 3pm", now).unwrap();
        assert_eq!(ymd_hm(resolved), (2026, 10, 23, 15, 0));
    }

    #[test]
    fn test_resolve_next_weekday_after_today() {
        let now = reference_now();

        let resolved = resolve("next Monday 9am", now).unwrap();
        assert!(resolved.date_naive() > now.date_naive());
        assert_eq!(resolved.weekday(), Weekday::Mon);
        assert_eq!(resolved.hour(), 9);
    }

    #[test]
    fn test_resolve_day_of_month() {
        let now = reference_now();

        assert_eq!(ymd_hm(resolve("the 20th", now).unwrap()), (2026, 10, 20, 0, 0));
        assert_eq!(ymd_hm(resolve("the 16th", now).unwrap()), (2026, 10, 16, 0, 0));
        assert_eq!(ymd_hm(resolve("the 10th", now).unwrap()), (2026, 11, 10, 0, 0));
        assert_eq!(ymd_hm(resolve("21st at 3pm", now).unwrap()), (2026, 10, 21, 15, 0));

        // November has no 31st
        let november = chrono_tz::UTC.with_ymd_and_hms(2026, 11, 5, 9, 0, 0).unwrap();
        assert_eq!(ymd_hm(resolve("the 31st", november).unwrap()), (2026, 12, 31, 0, 0));

        assert_eq!(resolve("the 32nd", now), None);
    }

    #[test]
    fn test_resolve_respects_timezone() {
        let helsinki = chrono_tz::Europe::Helsinki;
        let now = helsinki.with_ymd_and_hms(2026, 10, 16, 9, 0, 0).unwrap();

        let resolved = resolve("tomorrow at 3pm", now).unwrap();
        assert_eq!(ymd_hm(resolved), (2026, 10, 17, 15, 0));
        assert_eq!(resolved.timezone(), helsinki);
    }

    #[test]
    fn test_parse_time_of_day() {
        assert_eq!(parse_time_of_day("3pm"), NaiveTime::from_hms_opt(15, 0, 0));
        assert_eq!(parse_time_of_day("12am"), NaiveTime::from_hms_opt(0, 0, 0));
        assert_eq!(parse_time_of_day("12 PM"), NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(parse_time_of_day("8:15 am"), NaiveTime::from_hms_opt(8, 15, 0));
        assert_eq!(parse_time_of_day("23:45"), NaiveTime::from_hms_opt(23, 45, 0));

        assert_eq!(parse_time_of_day("13pm"), None);
        assert_eq!(parse_time_of_day("24:00"), None);
        assert_eq!(parse_time_of_day("noonish"), None);
    }

    #[test]
    fn test_resolve_ignores_surrounding_whitespace() {
        let now = reference_now();
        assert_eq!(resolve("  tomorrow \t", now), resolve("tomorrow", now));
    }

    #[test]
    fn test_resolve_failures() {
        let now = reference_now();
        assert_eq!(resolve("", now), None);
        assert_eq!(resolve("   ", now), None);
        assert_eq!(resolve("asdkjasd", now), None);
    }
}

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::calendar::{parse_date_key, DateError};

/// Resolves a user supplied date: `YYYY-MM-DD`, `today`, `tomorrow`,
/// `yesterday`, a weekday name (next occurrence), or `+N` followed by `d`, `w` or `m`.
pub fn parse_date_spec(spec: &str, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let trimmed = spec.trim();
    if trimmed.is_empty() {
        return Err(DateError::Unrecognized(
            "Date specification cannot be empty".into(),
        ));
    }

    let lower = trimmed.to_ascii_lowercase();
    match lower.as_str() {
        "today" => return Ok(today),
        "tomorrow" => return offset_days(today, 1, spec),
        "yesterday" => return offset_days(today, -1, spec),
        _ => {}
    }

    if lower.starts_with('+') {
        return parse_relative_spec(&lower, today);
    }

    if let Some(weekday) = parse_weekday(&lower) {
        let mut days_ahead = (weekday.num_days_from_monday() as i64
            - today.weekday().num_days_from_monday() as i64)
            .rem_euclid(7);
        if days_ahead == 0 {
            days_ahead = 7;
        }
        return offset_days(today, days_ahead, spec);
    }

    parse_date_key(trimmed).map_err(|_| {
        DateError::Unrecognized(format!(
            "Unrecognized date specification '{}'. Try YYYY-MM-DD, today, tomorrow, +3d, mon",
            spec
        ))
    })
}

fn offset_days(today: NaiveDate, days: i64, spec: &str) -> Result<NaiveDate, DateError> {
    let shifted = if days >= 0 {
        today.checked_add_days(Days::new(days as u64))
    } else {
        today.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.ok_or_else(|| DateError::Unrecognized(format!("Date '{}' is out of range", spec)))
}

fn parse_relative_spec(spec: &str, today: NaiveDate) -> Result<NaiveDate, DateError> {
    let body = &spec[1..];
    let Some((unit_start, _)) = body.char_indices().next_back() else {
        return Err(DateError::Unrecognized(format!(
            "Relative date '{}' is too short",
            spec
        )));
    };
    let (number_part, unit) = body.split_at(unit_start);
    if number_part.is_empty() {
        return Err(DateError::Unrecognized(format!(
            "Relative date '{}' is too short",
            spec
        )));
    }
    let value: u32 = number_part
        .parse()
        .map_err(|_| DateError::Unrecognized(format!("Invalid relative offset '{}'", spec)))?;
    match unit {
        "d" => offset_days(today, value.into(), spec),
        "w" => offset_days(today, i64::from(value) * 7, spec),
        "m" => today
            .checked_add_months(Months::new(value))
            .ok_or_else(|| DateError::Unrecognized(format!("Date '{}' is out of range", spec))),
        other => Err(DateError::Unrecognized(format!(
            "Unsupported relative unit '{}'. Use d, w, or m.",
            other
        ))),
    }
}

fn parse_weekday(label: &str) -> Option<Weekday> {
    match label {
        "mon" | "monday" => Some(Weekday::Mon),
        "tue" | "tuesday" => Some(Weekday::Tue),
        "wed" | "wednesday" => Some(Weekday::Wed),
        "thu" | "thursday" => Some(Weekday::Thu),
        "fri" | "friday" => Some(Weekday::Fri),
        "sat" | "saturday" => Some(Weekday::Sat),
        "sun" | "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

//! Display formatting for dashboard values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Placeholder shown for unknown values.
pub const PLACEHOLDER: &str = "—";

/// Parse the date forms the backend emits: `YYYY-MM-DD`, RFC 3339, or a
/// naive `YYYY-MM-DDTHH:MM:SS[.f]` timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|dt| dt.date())
        })
}

/// `"Mar 05, 2026"`; the raw text when unparseable; placeholder when absent.
pub fn format_date(value: Option<&str>) -> String {
    match value {
        None | Some("") => PLACEHOLDER.to_string(),
        Some(raw) => match parse_date(raw) {
            Some(date) => date.format("%b %d, %Y").to_string(),
            None => raw.to_string(),
        },
    }
}

/// Group an integer with `,` thousands separators.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `"12,000 km"` or the placeholder.
pub fn format_mileage(value: Option<i64>) -> String {
    value
        .map(|km| format!("{} km", group_thousands(km)))
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// `"$1,250.5"` (up to three decimals, trailing zeros dropped) or the
/// placeholder.
pub fn format_cost(value: Option<f64>) -> String {
    let Some(cost) = value.filter(|c| c.is_finite()) else {
        return PLACEHOLDER.to_string();
    };
    let rounded = format!("{:.3}", cost.abs());
    let (int_part, frac_part) = rounded.split_once('.').unwrap_or((rounded.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');
    let sign = if cost < 0.0 { "-" } else { "" };
    let int_part = int_part.parse::<i64>().map(group_thousands).unwrap_or_else(|_| int_part.to_string());
    if frac_part.is_empty() {
        format!("{sign}${int_part}")
    } else {
        format!("{sign}${int_part}.{frac_part}")
    }
}

/// Badge text for the overdue flag.
pub fn overdue_badge(overdue: bool) -> &'static str {
    if overdue {
        "OVERDUE"
    } else {
        "OK"
    }
}

/// Optional text or the placeholder.
pub fn or_placeholder(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

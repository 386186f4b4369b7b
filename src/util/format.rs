//! Display helpers; all rounding happens here, never in the domain layer.

use std::time::SystemTime;

use time::{format_description::FormatItem, macros::format_description, OffsetDateTime};

const CLOCK: &[FormatItem<'static>] = format_description!("[hour]:[minute] UTC");

/// Rounds to whole units and groups thousands with commas.
pub fn thousands(value: f64) -> String {
    if !value.is_finite() {
        return "—".to_string();
    }
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn euro(value: f64) -> String {
    format!("€{}", thousands(value))
}

pub fn dollar(value: f64) -> String {
    format!("${}", thousands(value))
}

pub fn rate(value: f64) -> String {
    format!("{value:.4}")
}

pub fn clock(at: SystemTime) -> String {
    OffsetDateTime::from(at)
        .format(CLOCK)
        .unwrap_or_else(|_| "--:--".to_string())
}

pub fn humanize_age(updated_at: SystemTime) -> String {
    let age = SystemTime::now()
        .duration_since(updated_at)
        .unwrap_or_default()
        .as_secs();
    if age < 60 {
        format!("{age}s ago")
    } else if age < 3_600 {
        format!("{}m ago", age / 60)
    } else if age < 86_400 {
        format!("{}h ago", age / 3_600)
    } else {
        format!("{}d ago", age / 86_400)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(thousands(0.0), "0");
        assert_eq!(thousands(999.4), "999");
        assert_eq!(thousands(1_000.0), "1,000");
        assert_eq!(thousands(55_325.6), "55,326");
        assert_eq!(thousands(1_234_567.0), "1,234,567");
        assert_eq!(thousands(-4_674.4), "-4,674");
        assert_eq!(thousands(f64::NAN), "—");
    }

    #[test]
    fn currency_prefixes() {
        assert_eq!(euro(60_000.0), "€60,000");
        assert_eq!(dollar(40_000.0), "$40,000");
        assert_eq!(rate(0.92), "0.9200");
    }

    #[test]
    fn clock_formats_utc() {
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(3_600 + 5 * 60);
        assert_eq!(clock(at), "01:05 UTC");
    }

    #[test]
    fn ages_are_humanized() {
        let now = SystemTime::now();
        assert_eq!(humanize_age(now + Duration::from_secs(30)), "0s ago");
        assert_eq!(humanize_age(now - Duration::from_secs(2 * 3_600 + 5)), "2h ago");
    }
}

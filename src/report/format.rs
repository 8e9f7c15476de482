//! Terminal formatting for the earthquake list.
//!
//! Formatting lives here so output changes stay localized and the fetch/parse
//! code never needs to know about time zones or colors.

use std::fmt::Display;

use chrono::{DateTime, TimeZone};
use crossterm::style::Stylize;

use crate::domain::{EarthquakeRecord, QueryParams};
use crate::report::{MagnitudeBucket, split_location};

/// Shown instead of a table when a request produced no records.
pub const EMPTY_MESSAGE: &str = "No earthquakes found.";

/// One decimal place, e.g. `4.2`, `7.0`.
pub fn format_magnitude(magnitude: f64) -> String {
    format!("{magnitude:.1}")
}

fn to_local<Tz: TimeZone>(occurred_at_ms: i64, tz: &Tz) -> Option<DateTime<Tz>> {
    tz.timestamp_millis_opt(occurred_at_ms).single()
}

/// `Nov 14, 2023`; `-` when the timestamp is out of range.
pub fn format_date<Tz>(occurred_at_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    to_local(occurred_at_ms, tz)
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// `10:13 PM`; `-` when the timestamp is out of range.
pub fn format_time<Tz>(occurred_at_ms: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    to_local(occurred_at_ms, tz)
        .map(|dt| dt.format("%-I:%M %p").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Single-line description of the active filters.
pub fn format_query_summary(params: &QueryParams) -> String {
    format!(
        "Magnitude {}-{}, {}, up to {} events",
        params.min_magnitude,
        params.max_magnitude,
        params.order.display_name(),
        params.limit
    )
}

/// Render one row: magnitude, qualifier, primary place, date, time.
pub fn format_row<Tz>(record: &EarthquakeRecord, tz: &Tz, colored: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mag = format!("{:>5}", format_magnitude(record.magnitude()));
    let mag = if colored {
        let color = MagnitudeBucket::from_magnitude(record.magnitude()).color();
        mag.with(color).bold().to_string()
    } else {
        mag
    };
    let (qualifier, primary) = split_location(record.location());
    format!(
        "{mag}  {:<24} {:<32} {:>12} {:>8}",
        qualifier.trim(),
        primary.trim(),
        format_date(record.occurred_at_ms(), tz),
        format_time(record.occurred_at_ms(), tz),
    )
}

/// Indented link to the event page, printed under each row.
pub fn format_details_line(record: &EarthquakeRecord) -> String {
    format!("{:>7}{}", "", record.details_url())
}

/// Render the full list, or the empty-state message.
pub fn format_feed<Tz>(records: &[EarthquakeRecord], tz: &Tz, colored: bool) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if records.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let mut out = String::new();
    out.push_str(&format!(
        "{:>5}  {:<24} {:<32} {:>12} {:>8}\n",
        "MAG", "OFFSET", "LOCATION", "DATE", "TIME"
    ));
    for record in records {
        out.push_str(&format_row(record, tz, colored));
        out.push('\n');
        out.push_str(&format_details_line(record));
        out.push('\n');
    }
    out.push_str(&format!("{} earthquake(s)", records.len()));
    out
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::data::fixtures::SAMPLE;
    use crate::domain::SortOrder;

    #[test]
    fn magnitude_has_one_decimal() {
        assert_eq!(format_magnitude(4.2), "4.2");
        assert_eq!(format_magnitude(7.0), "7.0");
        assert_eq!(format_magnitude(0.04), "0.0");
    }

    #[test]
    fn date_and_time_in_utc() {
        // 2023-11-14T22:13:20Z
        let ms = 1_700_000_000_000;
        assert_eq!(format_date(ms, &Utc), "Nov 14, 2023");
        assert_eq!(format_time(ms, &Utc), "10:13 PM");
        assert_eq!(format_time(0, &Utc), "12:00 AM");
        assert_eq!(format_date(i64::MAX, &Utc), "-");
    }

    #[test]
    fn feed_table_lists_rows_in_order() {
        let records = crate::data::parse(SAMPLE);
        let text = format_feed(&records, &Utc, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 8);
        assert!(lines[0].contains("MAG"));
        assert!(lines[1].trim_start().starts_with("4.2"));
        assert!(lines[1].contains("5km NW of Reno"));
        assert!(lines[1].contains("NV"));
        assert!(lines[3].contains("Near the"));
        assert!(lines[3].contains("Fiji region"));
        assert!(lines[5].trim_start().starts_with("2.1"));
        assert_eq!(lines[7], "3 earthquake(s)");
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn feed_table_links_each_event_page() {
        let records = crate::data::parse(SAMPLE);
        let text = format_feed(&records, &Utc, false);
        let lines: Vec<&str> = text.lines().collect();
        assert!(text.contains("eventpage/a1"));
        assert_eq!(lines[2].trim(), "https://earthquake.usgs.gov/earthquakes/eventpage/a1");
        assert_eq!(lines[4].trim(), "https://earthquake.usgs.gov/earthquakes/eventpage/a2");
        assert_eq!(lines[6].trim(), "https://earthquake.usgs.gov/earthquakes/eventpage/a3");
        assert!(lines[2].starts_with("       https://"));
    }

    #[test]
    fn colored_rows_carry_ansi_codes() {
        let record = EarthquakeRecord::new(6.8, "Fiji region", 1, "u");
        assert!(format_row(&record, &Utc, true).contains('\u{1b}'));
    }

    #[test]
    fn empty_feed_shows_message() {
        assert_eq!(format_feed(&[], &Utc, false), EMPTY_MESSAGE);
    }

    #[test]
    fn query_summary_names_order() {
        let params = QueryParams {
            min_magnitude: 2,
            max_magnitude: 7,
            order: SortOrder::MagnitudeAscending,
            limit: 300,
        };
        assert_eq!(
            format_query_summary(&params),
            "Magnitude 2-7, Ascending Magnitude, up to 300 events"
        );
    }
}

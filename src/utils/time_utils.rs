use chrono::{Datelike, Months, NaiveDate};

pub struct TimeUtils;

impl TimeUtils {
    pub const MONTHS_IN_YEAR: u32 = 12;
    pub const STANDARD_MONTH_FORMAT: &str = "%Y-%m";

    /// Formats tried in order when a source does not pin down its date format.
    /// Formats without a day component are parsed as the first of the month.
    pub const FLEXIBLE_DATE_FORMATS: &[&str] = &[
        "%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d", "%Y-%m", "%b-%y", "%b-%Y", "%B %Y",
    ];

    /// Display helper e.g. "2022-07"
    pub fn month_to_string(month: NaiveDate) -> String {
        month.format(Self::STANDARD_MONTH_FORMAT).to_string()
    }
}

/// Normalize any date to the first day of its month.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Build the first day of `year`-`month`, if the pair is a real calendar month.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Absolute month number, so that consecutive months differ by exactly 1.
pub fn month_index(date: NaiveDate) -> i64 {
    date.year() as i64 * TimeUtils::MONTHS_IN_YEAR as i64 + date.month0() as i64
}

/// Signed number of whole months from `from` to `to` (days are ignored).
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    month_index(to) - month_index(from)
}

/// Contiguous monthly axis of `count` months starting the month after `after`.
/// `None` when the axis would run past the calendar chrono can represent.
pub fn months_after(after: NaiveDate, count: usize) -> Option<Vec<NaiveDate>> {
    let anchor = first_of_month(after);
    (1..=count)
        .map(|offset| {
            let offset = u32::try_from(offset).ok()?;
            anchor.checked_add_months(Months::new(offset))
        })
        .collect()
}

/// Parse a date token against `formats` (in order) and normalize it to its month.
/// Tokens carrying a time part ("2020-01-01 00:00:00", "2020-01-01T00:00") are cut at the
/// first separator before parsing.
pub fn parse_month(token: &str, formats: &[&str]) -> Option<NaiveDate> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    let date_part = token
        .split(|c: char| c == 'T' || c.is_whitespace())
        .next()
        .unwrap_or(token);

    for candidate in [token, date_part] {
        for format in formats {
            if let Some(date) = parse_with_format(candidate, format) {
                return Some(first_of_month(date));
            }
        }
    }
    None
}

fn parse_with_format(token: &str, format: &str) -> Option<NaiveDate> {
    if format.contains("%d") {
        return NaiveDate::parse_from_str(token, format).ok();
    }
    // chrono needs a day to build a NaiveDate
    NaiveDate::parse_from_str(&format!("{token}|01"), &format!("{format}|%d")).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> NaiveDate {
        month_start(year, month).unwrap()
    }

    #[test]
    fn test_parse_month_formats() {
        let formats = TimeUtils::FLEXIBLE_DATE_FORMATS;
        assert_eq!(parse_month("2020-03-15", formats), Some(ym(2020, 3)));
        assert_eq!(parse_month("03/01/2020", formats), Some(ym(2020, 3)));
        assert_eq!(parse_month("2020-03", formats), Some(ym(2020, 3)));
        assert_eq!(parse_month("Jan-95", formats), Some(ym(1995, 1)));
        assert_eq!(parse_month("Dec-2023", formats), Some(ym(2023, 12)));
        assert_eq!(parse_month("2021-06-01 00:00:00", formats), Some(ym(2021, 6)));
        assert_eq!(parse_month("not a date", formats), None);
        assert_eq!(parse_month("  ", formats), None);
    }

    #[test]
    fn test_month_arithmetic() {
        assert_eq!(months_between(ym(2022, 6), ym(2022, 12)), 6);
        assert_eq!(months_between(ym(2022, 11), ym(2023, 2)), 3);
        assert_eq!(months_between(ym(2023, 2), ym(2022, 11)), -3);

        let axis = months_after(NaiveDate::from_ymd_opt(2022, 11, 20).unwrap(), 3);
        assert_eq!(axis, Some(vec![ym(2022, 12), ym(2023, 1), ym(2023, 2)]));
        assert_eq!(months_after(ym(2022, 1), 0), Some(vec![]));
    }

    #[test]
    fn test_months_after_past_calendar_end() {
        // chrono stops at year 262142; nothing gets silently dropped
        assert_eq!(months_after(ym(2022, 1), 3_200_000), None);
        assert_eq!(months_after(NaiveDate::MAX, 1), None);
    }

    #[test]
    fn test_month_to_string() {
        assert_eq!(TimeUtils::month_to_string(ym(2022, 7)), "2022-07");
    }
}

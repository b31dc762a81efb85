//! Display helpers shared by views, route summaries and notification emails.

use chrono::{DateTime, NaiveDate, TimeZone};

/// US-dollar amount with thousands separators, e.g. `$1,234.50`.
pub fn format_currency(amount: f64) -> String {
    let total_cents = (amount.abs() * 100.0).round() as u64;
    let dollars = (total_cents / 100).to_string();
    let cents = total_cents % 100;

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, digit) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && total_cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{cents:02}")
}

pub fn format_distance(km: f64) -> String {
    format!("{km:.1} km")
}

/// Twelve-hour clock time, e.g. `1:05 PM`.
pub fn format_time<Tz>(at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    at.format("%-I:%M %p").to_string()
}

/// Long-form date, e.g. `March 1, 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::{format_currency, format_date, format_distance, format_time};

    #[test]
    fn currency_has_two_decimals_and_grouping() {
        assert_eq!(format_currency(8.5), "$8.50");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-5.0), "-$5.00");
    }

    #[test]
    fn distance_has_one_decimal() {
        assert_eq!(format_distance(4.2), "4.2 km");
        assert_eq!(format_distance(12.0), "12.0 km");
    }

    #[test]
    fn time_uses_twelve_hour_clock() {
        let afternoon = Utc.with_ymd_and_hms(2024, 3, 2, 13, 5, 0).unwrap();
        assert_eq!(format_time(&afternoon), "1:05 PM");

        let morning = Utc.with_ymd_and_hms(2024, 3, 2, 9, 30, 0).unwrap();
        assert_eq!(format_time(&morning), "9:30 AM");
    }

    #[test]
    fn date_is_long_form() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(format_date(date), "March 1, 2024");
    }
}

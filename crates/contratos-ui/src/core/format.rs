//! pt-BR number, currency and date formatting.

use chrono::{Datelike, NaiveDate};

const MONTHS_PT: [&str; 12] = [
    "janeiro",
    "fevereiro",
    "março",
    "abril",
    "maio",
    "junho",
    "julho",
    "agosto",
    "setembro",
    "outubro",
    "novembro",
    "dezembro",
];

/// Format with `.` thousands separators and a `,` decimal mark.
#[must_use]
pub fn format_decimal_br(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return format!("{:.*}", decimals, 0.0).replace('.', ",");
    }
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (index, digit) in int_part.chars().enumerate() {
        if index > 0 && (int_part.len() - index) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let sign = if negative { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped},{frac_part}")
    }
}

/// Brazilian real, two decimals.
#[must_use]
pub fn format_brl(value: f64) -> String {
    format!("R$ {}", format_decimal_br(value, 2))
}

/// Parse the date part of an ISO timestamp.
#[must_use]
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let date_part = value.trim().get(..10)?;
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

/// `dd/mm/yyyy`, or the input unchanged when it is not an ISO date.
#[must_use]
pub fn format_date_br(value: &str) -> String {
    parse_iso_date(value).map_or_else(
        || value.to_string(),
        |date| date.format("%d/%m/%Y").to_string(),
    )
}

/// Day of month of an ISO date.
#[must_use]
pub fn day_of_month(value: &str) -> Option<u32> {
    parse_iso_date(value).map(|date| date.day())
}

/// "maio de 2024" style header.
#[must_use]
pub fn month_year_pt(date: NaiveDate) -> String {
    let month = MONTHS_PT
        .get(date.month0() as usize)
        .copied()
        .unwrap_or_default();
    format!("{month} de {}", date.year())
}

/// `part / total` as a percentage, 0 when `total` is not positive.
#[must_use]
pub fn percent(part: f64, total: f64) -> f64 {
    if total > 0.0 && part.is_finite() {
        part / total * 100.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_grouping_follows_pt_br() {
        assert_eq!(format_decimal_br(1_234_567.891, 2), "1.234.567,89");
        assert_eq!(format_decimal_br(999.0, 2), "999,00");
        assert_eq!(format_decimal_br(0.0, 1), "0,0");
        assert_eq!(format_decimal_br(-1500.5, 2), "-1.500,50");
        assert_eq!(format_decimal_br(-0.001, 2), "0,00");
    }

    #[test]
    fn brl_prefixes_symbol() {
        assert_eq!(format_brl(1500.5), "R$ 1.500,50");
    }

    #[test]
    fn dates_do_not_shift_across_timezones() {
        assert_eq!(format_date_br("2024-03-01"), "01/03/2024");
        assert_eq!(format_date_br("2024-03-01T23:59:00"), "01/03/2024");
        assert_eq!(format_date_br("ontem"), "ontem");
        assert_eq!(day_of_month("2024-12-25"), Some(25));
    }

    #[test]
    fn month_header_is_portuguese() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).expect("date");
        assert_eq!(month_year_pt(date), "março de 2024");
    }

    #[test]
    fn percent_guards_zero_total() {
        assert!((percent(3.0, 4.0) - 75.0).abs() < f64::EPSILON);
        assert!(percent(3.0, 0.0).abs() < f64::EPSILON);
    }
}

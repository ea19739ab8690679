use chrono::NaiveDate;

use crate::finance::form::DATE_FORMAT;

/// Format a transaction amount with sign and two decimals, grouping
/// thousands: `+2,000.00`, `-12.50`.
pub fn format_amount(amount: f64, is_income: bool) -> String {
    let sign = if is_income { '+' } else { '-' };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    format!("{}{}.{:02}", sign, grouped, cents % 100)
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// One `*` per character, capped at `max_len`
pub fn mask(s: &str, max_len: usize) -> String {
    "*".repeat(s.chars().count().min(max_len))
}

/// Format a stored `YYYY-MM-DD` date for display; anything else is shown as-is
pub fn format_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, DATE_FORMAT) {
        Ok(d) => d.format("%b %d, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

//! Amount formatting for display.

pub const CURRENCY_SYMBOL: char = '₫';
const GROUP_SEPARATOR: char = '.';

/// Groups digits by thousands with `.` and appends `₫`, e.g. `1.250.000₫`.
pub fn format_vnd(amount: i64) -> String {
    let mut formatted = group_thousands(amount);
    formatted.push(CURRENCY_SYMBOL);
    formatted
}

pub fn group_thousands(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        grouped.push('-');
    }
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }
    grouped
}

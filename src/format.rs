//! Display formatting for monetary and count fields. Presentation code only; the
//! calculations never format.

/// `₹1,200,000` style: symbol, whole units, comma thousands separators.
pub fn format_currency(value: f64, symbol: &str) -> String {
    let rounded = value.round_ties_even();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{symbol}{}", format_number(rounded.abs()))
}

/// Whole number with comma thousands separators.
pub fn format_number(value: f64) -> String {
    let rounded = value.round_ties_even();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{}", group_thousands(rounded.abs()))
}

pub fn format_count(value: u64) -> String {
    format_number(value as f64)
}

/// `25%`, or `12.5%` when the percentage is fractional.
pub fn format_percent(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}%")
    } else {
        format!("{value}%")
    }
}

fn group_thousands(value: f64) -> String {
    let digits = format!("{value:.0}");
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

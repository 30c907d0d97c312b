//! Number formatting for console and text reports

/// Group the digits of a non-negative integer in thousands
fn group_thousands(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format an amount with thousands separators and two decimals
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let rounded = format!("{:.2}", value.abs());
    let (whole, cents) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let sign = if value < 0.0 && rounded != "0.00" { "-" } else { "" };
    format!("{sign}{}.{cents}", group_thousands(whole))
}

/// Format a fraction as a percentage (`0.0523` -> `5.23 %`)
pub fn format_percentage(value: f64) -> String {
    format!("{:.2} %", value * 100.0)
}

/// Format a fraction as a percentage with four decimals
pub fn format_percentage_precise(value: f64) -> String {
    format!("{:.4} %", value * 100.0)
}

/// Format a number for a delimited file, NaN and infinities as an empty cell
pub fn format_cell(value: f64, decimals: usize) -> String {
    if value.is_finite() {
        format!("{value:.decimals$}")
    } else {
        String::new()
    }
}

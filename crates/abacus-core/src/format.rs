//! Display formatting and operand parsing.

use crate::constants::{
    ERROR_DISPLAY, EXPONENTIAL_DIGITS, EXPONENTIAL_LOWER, EXPONENTIAL_UPPER, GROUPING_THRESHOLD,
    SIGNIFICANT_DIGITS,
};
use crate::error::{CalcError, Result};

/// Format a result for the display.
///
/// - NaN and infinities become `"Error"`.
/// - `|n| >= 1e15` or `0 < |n| < 1e-10` use exponential notation
///   (`1.0000000000e+16`).
/// - Otherwise round to 12 significant digits, drop trailing zeros, and
///   group thousands once `|n| >= 1000`.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return ERROR_DISPLAY.to_string();
    }

    let abs = n.abs();
    if abs >= EXPONENTIAL_UPPER || (abs < EXPONENTIAL_LOWER && n != 0.0) {
        return to_exponential(n, EXPONENTIAL_DIGITS);
    }

    let rounded = round_significant(n, SIGNIFICANT_DIGITS);
    // -0 prints as "0"
    let plain = if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    };

    if abs >= GROUPING_THRESHOLD {
        group_thousands(&plain)
    } else {
        plain
    }
}

/// Parse display text back into an operand. Thousands separators are
/// ignored; the error marker and non-finite values are rejected.
pub fn parse_operand(text: &str) -> Result<f64> {
    let cleaned: String = text.chars().filter(|c| *c != ',').collect();
    match cleaned.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CalcError::InvalidNumericInput(text.to_string())),
    }
}

fn to_exponential(n: f64, digits: usize) -> String {
    let s = format!("{n:.digits$e}");
    match s.split_once('e') {
        Some((mantissa, exp)) if exp.starts_with('-') => format!("{mantissa}e{exp}"),
        Some((mantissa, exp)) => format!("{mantissa}e+{exp}"),
        None => s,
    }
}

fn round_significant(n: f64, digits: usize) -> f64 {
    let precision = digits.saturating_sub(1);
    format!("{n:.precision$e}").parse().unwrap_or(n)
}

fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

//! Single-variable linear equations of the form `ax + b = c`.

use regex::Regex;

use crate::error::{CalcError, Result};
use crate::format::parse_operand;

/// Solve `<coef><var> [+- offset] = <value>` for the variable.
///
/// The coefficient may be omitted (`x`, `-x`); the offset and the right
/// side are plain numbers. Anything else is `InvalidEquationFormat`.
pub fn solve_linear(equation: &str, variable: &str) -> Result<f64> {
    let invalid = || CalcError::InvalidEquationFormat(equation.to_string());

    let (left, right) = equation.split_once('=').ok_or_else(invalid)?;
    if right.contains('=') || variable.trim().is_empty() {
        return Err(invalid());
    }
    let value = parse_operand(right).map_err(|_| invalid())?;

    let pattern = format!(
        r"^\s*([+-]?\s*(?:\d+(?:\.\d+)?)?)\s*\*?\s*{}\s*([+-]\s*\d+(?:\.\d+)?)?\s*$",
        regex::escape(variable.trim())
    );
    let re = Regex::new(&pattern).map_err(|_| invalid())?;
    let caps = re.captures(left).ok_or_else(invalid)?;

    let coef_text: String = caps[1].split_whitespace().collect();
    let coefficient = match coef_text.as_str() {
        "" | "+" => 1.0,
        "-" => -1.0,
        text => text.parse::<f64>().map_err(|_| invalid())?,
    };
    let constant = match caps.get(2) {
        Some(m) => m
            .as_str()
            .split_whitespace()
            .collect::<String>()
            .parse::<f64>()
            .map_err(|_| invalid())?,
        None => 0.0,
    };

    if coefficient == 0.0 {
        return Err(CalcError::NoSolutionExists);
    }
    Ok((value - constant) / coefficient)
}

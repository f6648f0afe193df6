//! Unary functions of the scientific panel.
//!
//! Trigonometry works in degrees here; the expression parser uses radians.

use std::str::FromStr;

use crate::constants::FACTORIAL_MAX;
use crate::error::{CalcError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScientificFn {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Ln,
    Log,
    Sqrt,
    Square,
    Cube,
    Factorial,
    Reciprocal,
    Abs,
    Exp,
}

impl ScientificFn {
    pub const ALL: [ScientificFn; 15] = [
        ScientificFn::Sin,
        ScientificFn::Cos,
        ScientificFn::Tan,
        ScientificFn::Asin,
        ScientificFn::Acos,
        ScientificFn::Atan,
        ScientificFn::Ln,
        ScientificFn::Log,
        ScientificFn::Sqrt,
        ScientificFn::Square,
        ScientificFn::Cube,
        ScientificFn::Factorial,
        ScientificFn::Reciprocal,
        ScientificFn::Abs,
        ScientificFn::Exp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScientificFn::Sin => "sin",
            ScientificFn::Cos => "cos",
            ScientificFn::Tan => "tan",
            ScientificFn::Asin => "asin",
            ScientificFn::Acos => "acos",
            ScientificFn::Atan => "atan",
            ScientificFn::Ln => "ln",
            ScientificFn::Log => "log",
            ScientificFn::Sqrt => "sqrt",
            ScientificFn::Square => "square",
            ScientificFn::Cube => "cube",
            ScientificFn::Factorial => "factorial",
            ScientificFn::Reciprocal => "reciprocal",
            ScientificFn::Abs => "abs",
            ScientificFn::Exp => "exp",
        }
    }

    pub fn apply(self, value: f64) -> Result<f64> {
        let result = match self {
            ScientificFn::Sin => value.to_radians().sin(),
            ScientificFn::Cos => value.to_radians().cos(),
            ScientificFn::Tan => value.to_radians().tan(),
            ScientificFn::Asin => value.asin().to_degrees(),
            ScientificFn::Acos => value.acos().to_degrees(),
            ScientificFn::Atan => value.atan().to_degrees(),
            ScientificFn::Ln => value.ln(),
            ScientificFn::Log => value.log10(),
            ScientificFn::Sqrt => value.sqrt(),
            ScientificFn::Square => value * value,
            ScientificFn::Cube => value * value * value,
            ScientificFn::Factorial => factorial(value)?,
            ScientificFn::Reciprocal => {
                if value == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                1.0 / value
            }
            ScientificFn::Abs => value.abs(),
            ScientificFn::Exp => value.exp(),
        };
        Ok(result)
    }
}

impl FromStr for ScientificFn {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let alias = match lower.as_str() {
            "√" => "sqrt",
            "x²" => "square",
            "x³" => "cube",
            "x!" | "!" => "factorial",
            "1/x" => "reciprocal",
            "|x|" => "abs",
            "eˣ" => "exp",
            other => other,
        };
        ScientificFn::ALL
            .into_iter()
            .find(|f| f.name() == alias)
            .ok_or_else(|| CalcError::InvalidExpression(format!("unknown function '{s}'")))
    }
}

/// n! for non-negative integers. Past 170 the product overflows to infinity.
pub fn factorial(n: f64) -> Result<f64> {
    if n < 0.0 || n.fract() != 0.0 || n.is_nan() {
        return Err(CalcError::InvalidFactorialInput(n));
    }
    if n > FACTORIAL_MAX {
        return Ok(f64::INFINITY);
    }
    Ok((2..=n as u64).fold(1.0, |acc, k| acc * k as f64))
}

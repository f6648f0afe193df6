use std::fmt;
use std::str::FromStr;

use crate::error::{CalcError, Result};

/// Binary operators understood by the engine and the expression parser.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
    Root,
}

impl Operator {
    /// Display symbol, as written into history expressions.
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "×",
            Operator::Divide => "÷",
            Operator::Modulo => "%",
            Operator::Power => "^",
            Operator::Root => "root",
        }
    }

    /// Accepts display symbols and their ASCII aliases (`*`, `/`, `**`).
    pub fn from_symbol(s: &str) -> Option<Self> {
        match s {
            "+" => Some(Operator::Add),
            "-" | "−" => Some(Operator::Subtract),
            "×" | "*" => Some(Operator::Multiply),
            "÷" | "/" => Some(Operator::Divide),
            "%" => Some(Operator::Modulo),
            "^" | "**" => Some(Operator::Power),
            "root" => Some(Operator::Root),
            _ => None,
        }
    }

    /// Apply `a <op> b`.
    ///
    /// Only division checks its operand; every other failure mode (NaN from
    /// `x % 0`, overflow) is left to the formatter.
    pub fn apply(self, a: f64, b: f64) -> Result<f64> {
        match self {
            Operator::Add => Ok(a + b),
            Operator::Subtract => Ok(a - b),
            Operator::Multiply => Ok(a * b),
            Operator::Divide => {
                if b == 0.0 {
                    return Err(CalcError::DivisionByZero);
                }
                Ok(a / b)
            }
            Operator::Modulo => Ok(a % b),
            Operator::Power => Ok(a.powf(b)),
            Operator::Root => Ok(a.powf(1.0 / b)),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        Operator::from_symbol(s.trim())
            .ok_or_else(|| CalcError::InvalidExpression(format!("unknown operator '{s}'")))
    }
}

/// `eval(a, b, op)` over a textual operator symbol.
pub fn evaluate(a: f64, b: f64, op: &str) -> Result<f64> {
    op.parse::<Operator>()?.apply(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_arithmetic() {
        assert_eq!(evaluate(2.0, 3.0, "+").unwrap(), 5.0);
        assert_eq!(evaluate(2.0, 3.0, "-").unwrap(), -1.0);
        assert_eq!(evaluate(2.0, 3.0, "×").unwrap(), 6.0);
        assert_eq!(evaluate(2.0, 3.0, "*").unwrap(), 6.0);
        assert_eq!(evaluate(3.0, 2.0, "÷").unwrap(), 1.5);
        assert_eq!(evaluate(3.0, 2.0, "/").unwrap(), 1.5);
        assert_eq!(evaluate(7.0, 3.0, "%").unwrap(), 1.0);
        assert_eq!(evaluate(2.0, 10.0, "^").unwrap(), 1024.0);
        assert_eq!(evaluate(2.0, 10.0, "**").unwrap(), 1024.0);
        assert_eq!(evaluate(27.0, 3.0, "root").unwrap().round(), 3.0);
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(evaluate(1.0, 0.0, "÷"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate(0.0, -0.0, "/"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_modulo_keeps_sign_of_dividend() {
        assert_eq!(Operator::Modulo.apply(-7.0, 3.0).unwrap(), -1.0);
        assert!(Operator::Modulo.apply(1.0, 0.0).unwrap().is_nan());
    }

    #[test]
    fn test_unknown_operator() {
        assert!(matches!(
            evaluate(1.0, 2.0, "&"),
            Err(CalcError::InvalidExpression(_))
        ));
    }

    #[test]
    fn test_symbol_roundtrip() {
        for op in [
            Operator::Add,
            Operator::Subtract,
            Operator::Multiply,
            Operator::Divide,
            Operator::Modulo,
            Operator::Power,
            Operator::Root,
        ] {
            assert_eq!(Operator::from_symbol(op.symbol()), Some(op));
        }
    }
}

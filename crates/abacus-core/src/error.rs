use std::fmt;

/// Failures raised by calculator computations.
///
/// The state machine never surfaces these: it turns them into the
/// `"Error"` display. Converters, the solver, and date arithmetic return
/// them to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    DivisionByZero,
    InvalidNumericInput(String),
    UnsupportedCurrency(String),
    InvalidDateFormat(String),
    InvalidEquationFormat(String),
    NoSolutionExists,
    InvalidFactorialInput(f64),
    InvalidExpression(String),
    UnknownUnit(String),
    InvalidPlotRange,
    InvalidThemeColor(String),
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalcError::DivisionByZero => write!(f, "division by zero"),
            CalcError::InvalidNumericInput(s) => write!(f, "not a number: '{s}'"),
            CalcError::UnsupportedCurrency(code) => write!(f, "currency not supported: {code}"),
            CalcError::InvalidDateFormat(s) => write!(f, "invalid date format: '{s}'"),
            CalcError::InvalidEquationFormat(s) => write!(f, "invalid equation format: '{s}'"),
            CalcError::NoSolutionExists => write!(f, "no solution exists"),
            CalcError::InvalidFactorialInput(n) => write!(f, "invalid input for factorial: {n}"),
            CalcError::InvalidExpression(msg) => write!(f, "invalid expression: {msg}"),
            CalcError::UnknownUnit(u) => write!(f, "unknown unit: {u}"),
            CalcError::InvalidPlotRange => write!(f, "x range must satisfy min < max"),
            CalcError::InvalidThemeColor(c) => write!(f, "invalid theme color: '{c}'"),
        }
    }
}

impl std::error::Error for CalcError {}

pub type Result<T> = std::result::Result<T, CalcError>;

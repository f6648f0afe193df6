/// Literal shown in the display when a computation fails.
pub const ERROR_DISPLAY: &str = "Error";

/// Maximum number of history entries kept, newest first.
pub const HISTORY_LIMIT: usize = 100;

/// Default depth of each undo/redo stack.
pub const DEFAULT_UNDO_DEPTH: usize = 500;

/// Significant digits kept when formatting a result.
pub const SIGNIFICANT_DIGITS: usize = 12;

/// Magnitudes at or above this switch to exponential notation.
pub const EXPONENTIAL_UPPER: f64 = 1e15;

/// Non-zero magnitudes below this switch to exponential notation.
pub const EXPONENTIAL_LOWER: f64 = 1e-10;

/// Fraction digits in exponential notation.
pub const EXPONENTIAL_DIGITS: usize = 10;

/// Magnitudes at or above this get thousands separators.
pub const GROUPING_THRESHOLD: f64 = 1000.0;

/// Samples taken across the x-range when plotting a function.
pub const PLOT_SAMPLES: usize = 1000;

/// Deepest parenthesis/unary/exponent nesting the expression parser accepts.
pub const MAX_EXPRESSION_DEPTH: usize = 64;

/// Longest expression, in tokens, the parser accepts. Bounds the depth of
/// the parsed tree for flat chains like `1+1+...`.
pub const MAX_EXPRESSION_TOKENS: usize = 1024;

/// Largest n whose factorial is finite in f64.
pub const FACTORIAL_MAX: f64 = 170.0;

/// Base currency of the mock rate table.
pub const BASE_CURRENCY: &str = "USD";

/// Relative spread applied by the mock rate fetch (±5%).
pub const RATE_JITTER: f64 = 0.1;

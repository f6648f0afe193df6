//! Infix expression parser for `eval` and plotting.
//!
//! Grammar, loosest to tightest:
//!
//! ```text
//! sum     := product (('+' | '-') product)*
//! product := unary (('*' | '/' | '%') unary | <implicit> power)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('^' unary)?
//! primary := number | constant | variable | func '(' sum ')' | '(' sum ')'
//! ```
//!
//! `×`, `÷` and `**` are accepted as aliases; commas are ignored so
//! formatted display values parse. Trigonometry is in radians.

use std::fmt;
use std::iter::Peekable;
use std::str::{Chars, FromStr};

use crate::constants::{MAX_EXPRESSION_DEPTH, MAX_EXPRESSION_TOKENS};
use crate::error::{CalcError, Result};
use crate::operator::Operator;

pub const DEFAULT_VARIABLE: &str = "x";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Log,
    Ln,
    Sqrt,
    Abs,
}

impl Function {
    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Log => "log",
            Function::Ln => "ln",
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
        }
    }

    pub fn apply(self, v: f64) -> f64 {
        match self {
            Function::Sin => v.sin(),
            Function::Cos => v.cos(),
            Function::Tan => v.tan(),
            Function::Log => v.log10(),
            Function::Ln => v.ln(),
            Function::Sqrt => v.sqrt(),
            Function::Abs => v.abs(),
        }
    }
}

impl FromStr for Function {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sin" => Ok(Function::Sin),
            "cos" => Ok(Function::Cos),
            "tan" => Ok(Function::Tan),
            "log" => Ok(Function::Log),
            "ln" => Ok(Function::Ln),
            "sqrt" => Ok(Function::Sqrt),
            "abs" => Ok(Function::Abs),
            _ => Err(CalcError::InvalidExpression(format!("unknown function '{s}'"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable,
    Neg(Box<Expr>),
    Binary {
        op: Operator,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        func: Function,
        arg: Box<Expr>,
    },
}

impl Expr {
    /// Parse with `x` as the free variable.
    pub fn parse(text: &str) -> Result<Expr> {
        Self::parse_with_variable(text, DEFAULT_VARIABLE)
    }

    pub fn parse_with_variable(text: &str, variable: &str) -> Result<Expr> {
        let tokens = tokenize(text)?;
        if tokens.is_empty() {
            return Err(CalcError::InvalidExpression("empty expression".to_string()));
        }
        if tokens.len() > MAX_EXPRESSION_TOKENS {
            return Err(CalcError::InvalidExpression(
                "expression too long".to_string(),
            ));
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            depth: 0,
            variable,
        };
        let expr = parser.sum()?;
        match parser.peek() {
            None => Ok(expr),
            Some(tok) => Err(CalcError::InvalidExpression(format!(
                "unexpected '{tok}'"
            ))),
        }
    }

    /// Evaluate with the free variable bound to `x`.
    pub fn eval(&self, x: f64) -> Result<f64> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Variable => Ok(x),
            Expr::Neg(inner) => Ok(-inner.eval(x)?),
            Expr::Binary { op, lhs, rhs } => op.apply(lhs.eval(x)?, rhs.eval(x)?),
            Expr::Call { func, arg } => Ok(func.apply(arg.eval(x)?)),
        }
    }

    pub fn has_variable(&self) -> bool {
        match self {
            Expr::Number(_) => false,
            Expr::Variable => true,
            Expr::Neg(inner) => inner.has_variable(),
            Expr::Binary { lhs, rhs, .. } => lhs.has_variable() || rhs.has_variable(),
            Expr::Call { arg, .. } => arg.has_variable(),
        }
    }
}

/// Evaluate a constant expression. A free variable is an error.
pub fn evaluate_expression(text: &str) -> Result<f64> {
    let expr = Expr::parse(text)?;
    if expr.has_variable() {
        return Err(CalcError::InvalidExpression(format!(
            "'{text}' contains a variable"
        )));
    }
    expr.eval(0.0)
}

// ---------------------------------------------------------------------------
// Tokenizer
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(char),
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "{n}"),
            Token::Ident(s) => f.write_str(s),
            Token::Op(c) => write!(f, "{c}"),
            Token::LParen => f.write_str("("),
            Token::RParen => f.write_str(")"),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() || c == ',' => {
                chars.next();
            }
            '0'..='9' | '.' => tokens.push(Token::Number(read_number(&mut chars)?)),
            c if c.is_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident.to_lowercase()));
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '*' => {
                chars.next();
                if chars.peek() == Some(&'*') {
                    chars.next();
                    tokens.push(Token::Op('^'));
                } else {
                    tokens.push(Token::Op('*'));
                }
            }
            '+' | '-' | '/' | '%' | '^' => {
                chars.next();
                tokens.push(Token::Op(c));
            }
            '×' => {
                chars.next();
                tokens.push(Token::Op('*'));
            }
            '÷' => {
                chars.next();
                tokens.push(Token::Op('/'));
            }
            '−' => {
                chars.next();
                tokens.push(Token::Op('-'));
            }
            other => {
                return Err(CalcError::InvalidExpression(format!(
                    "unexpected character '{other}'"
                )));
            }
        }
    }
    Ok(tokens)
}

/// Digits with an optional fraction and an optional `e[+-]digits`
/// exponent. A bare trailing `e` is left for the identifier lexer.
fn read_number(chars: &mut Peekable<Chars<'_>>) -> Result<f64> {
    let mut text = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() || c == '.' {
            text.push(c);
            chars.next();
        } else if c == ',' {
            chars.next();
        } else {
            break;
        }
    }

    if matches!(chars.peek(), Some('e' | 'E')) {
        let mut lookahead = chars.clone();
        lookahead.next();
        let mut exponent = String::from("e");
        if let Some(&sign) = lookahead.peek()
            && (sign == '+' || sign == '-')
        {
            exponent.push(sign);
            lookahead.next();
        }
        if lookahead.peek().is_some_and(|c| c.is_ascii_digit()) {
            while let Some(&c) = lookahead.peek() {
                if !c.is_ascii_digit() {
                    break;
                }
                exponent.push(c);
                lookahead.next();
            }
            text.push_str(&exponent);
            *chars = lookahead;
        }
    }

    text.parse()
        .map_err(|_| CalcError::InvalidExpression(format!("malformed number '{text}'")))
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    /// Active `unary` frames. Every nesting path (parentheses, function
    /// arguments, exponents, sign runs) passes through `unary`.
    depth: usize,
    variable: &'a str,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        tok
    }

    fn expect_rparen(&mut self) -> Result<()> {
        match self.next() {
            Some(Token::RParen) => Ok(()),
            _ => Err(CalcError::InvalidExpression("missing ')'".to_string())),
        }
    }

    fn sum(&mut self) -> Result<Expr> {
        let mut lhs = self.product()?;
        while let Some(Token::Op(c @ ('+' | '-'))) = self.peek() {
            let op = if *c == '+' {
                Operator::Add
            } else {
                Operator::Subtract
            };
            self.pos += 1;
            let rhs = self.product()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn product(&mut self) -> Result<Expr> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Op('*')) => Operator::Multiply,
                Some(Token::Op('/')) => Operator::Divide,
                Some(Token::Op('%')) => Operator::Modulo,
                // implicit multiplication: 2x, 3(x+1), 2pi
                Some(Token::Number(_) | Token::Ident(_) | Token::LParen) => {
                    let rhs = self.power()?;
                    lhs = binary(Operator::Multiply, lhs, rhs);
                    continue;
                }
                _ => break,
            };
            self.pos += 1;
            let rhs = self.unary()?;
            lhs = binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.depth >= MAX_EXPRESSION_DEPTH {
            return Err(CalcError::InvalidExpression(
                "expression nested too deeply".to_string(),
            ));
        }
        self.depth += 1;
        let expr = self.signed();
        self.depth -= 1;
        expr
    }

    fn signed(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Op('-')) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.unary()?)))
            }
            Some(Token::Op('+')) => {
                self.pos += 1;
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Expr> {
        let base = self.primary()?;
        if let Some(Token::Op('^')) = self.peek() {
            self.pos += 1;
            let exponent = self.unary()?;
            return Ok(binary(Operator::Power, base, exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.next() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                let inner = self.sum()?;
                self.expect_rparen()?;
                Ok(inner)
            }
            Some(Token::Ident(name)) => self.identifier(&name),
            Some(tok) => Err(CalcError::InvalidExpression(format!(
                "unexpected '{tok}'"
            ))),
            None => Err(CalcError::InvalidExpression(
                "unexpected end of expression".to_string(),
            )),
        }
    }

    fn identifier(&mut self, name: &str) -> Result<Expr> {
        if name == self.variable {
            return Ok(Expr::Variable);
        }
        match name {
            "pi" | "π" => return Ok(Expr::Number(std::f64::consts::PI)),
            "e" => return Ok(Expr::Number(std::f64::consts::E)),
            _ => {}
        }

        let func: Function = name.parse()?;
        match self.next() {
            Some(Token::LParen) => {}
            _ => {
                return Err(CalcError::InvalidExpression(format!(
                    "expected '(' after {name}"
                )));
            }
        }
        let arg = self.sum()?;
        self.expect_rparen()?;
        Ok(Expr::Call {
            func,
            arg: Box::new(arg),
        })
    }
}

fn binary(op: Operator, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

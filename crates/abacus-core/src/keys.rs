//! Keyboard surface: key names to calculator actions.

use crate::engine::Calculator;
use crate::error::{CalcError, Result};
use crate::operator::Operator;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Digit(char),
    Decimal,
    Operation(Operator),
    Calculate,
    Clear,
    Backspace,
    Undo,
    Redo,
    ToggleTheme,
}

/// Map a key event (DOM-style key name plus modifiers) to an action.
/// Unmapped keys return `None`.
pub fn map_key(key: &str, ctrl: bool, shift: bool) -> Option<KeyAction> {
    if ctrl {
        return match key.to_lowercase().as_str() {
            "z" if shift => Some(KeyAction::Redo),
            "z" => Some(KeyAction::Undo),
            "t" => Some(KeyAction::ToggleTheme),
            _ => None,
        };
    }

    match key {
        "Enter" => return Some(KeyAction::Calculate),
        "Escape" => return Some(KeyAction::Clear),
        "Backspace" => return Some(KeyAction::Backspace),
        _ => {}
    }

    let mut chars = key.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else {
        return None;
    };
    let action = match c {
        '0'..='9' => KeyAction::Digit(c),
        '.' => KeyAction::Decimal,
        '+' => KeyAction::Operation(Operator::Add),
        '-' => KeyAction::Operation(Operator::Subtract),
        '*' | '×' => KeyAction::Operation(Operator::Multiply),
        '/' | '÷' => KeyAction::Operation(Operator::Divide),
        '%' => KeyAction::Operation(Operator::Modulo),
        '^' => KeyAction::Operation(Operator::Power),
        '=' => KeyAction::Calculate,
        'c' | 'C' => KeyAction::Clear,
        _ => return None,
    };
    Some(action)
}

/// Parse a chord such as `ctrl+shift+z`, `enter` or `7`.
pub fn parse_chord(token: &str) -> Option<KeyAction> {
    let lower = token.trim().to_lowercase();
    let mut rest = lower.as_str();
    let (mut ctrl, mut shift) = (false, false);
    loop {
        if let Some(r) = rest.strip_prefix("ctrl+") {
            ctrl = true;
            rest = r;
        } else if let Some(r) = rest.strip_prefix("shift+") {
            shift = true;
            rest = r;
        } else {
            break;
        }
    }

    let key = match rest {
        "enter" | "return" => "Enter",
        "esc" | "escape" => "Escape",
        "backspace" | "bs" => "Backspace",
        other => other,
    };
    map_key(key, ctrl, shift)
}

/// Parse a whitespace-separated key sequence. Tokens that are not a chord
/// are split into single keys, so `12.5+3=` works without spaces.
pub fn parse_key_sequence(input: &str) -> Result<Vec<KeyAction>> {
    let mut actions = Vec::new();
    for token in input.split_whitespace() {
        if let Some(action) = parse_chord(token) {
            actions.push(action);
            continue;
        }
        for c in token.chars() {
            let action = map_key(c.encode_utf8(&mut [0; 4]), false, false)
                .ok_or_else(|| CalcError::InvalidExpression(format!("unrecognized key '{token}'")))?;
            actions.push(action);
        }
    }
    Ok(actions)
}

impl Calculator {
    pub fn apply(&mut self, action: KeyAction) {
        match action {
            KeyAction::Digit(d) => self.input_digit(d),
            KeyAction::Decimal => self.input_decimal_point(),
            KeyAction::Operation(op) => self.input_operation(op),
            KeyAction::Calculate => self.calculate(),
            KeyAction::Clear => self.clear(),
            KeyAction::Backspace => self.backspace(),
            KeyAction::Undo => self.undo(),
            KeyAction::Redo => self.redo(),
            KeyAction::ToggleTheme => self.toggle_theme(),
        }
    }

    /// Feed a key event; returns whether it was mapped.
    pub fn press_key(&mut self, key: &str, ctrl: bool, shift: bool) -> bool {
        match map_key(key, ctrl, shift) {
            Some(action) => {
                self.apply(action);
                true
            }
            None => false,
        }
    }
}

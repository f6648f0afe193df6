//! Standard-mode calculator state machine.
//!
//! Input is accumulated into `display`; a binary operation is held pending
//! until the next operator or `=` (left-to-right, no precedence). Every
//! digit, decimal, operator and `=` input records a pre-mutation snapshot
//! for undo. Arithmetic failures never escape: they leave the `"Error"`
//! marker in the display and the next digit starts over.
//!
//! Side effects (sounds, theme styling) are not performed here. They are
//! queued as [`Effect`]s for the host to drain and interpret.

use std::f64::consts::PI;

use crate::constants::{DEFAULT_UNDO_DEPTH, ERROR_DISPLAY};
use crate::format::{format_number, parse_operand};
use crate::history::{History, HistoryEntry};
use crate::memory::MemoryRegister;
use crate::operator::Operator;
use crate::persist::{Mode, PersistedState};
use crate::scientific::ScientificFn;
use crate::theme::Theme;
use crate::time::now_unix_millis;
use crate::undo::{Snapshot, UndoHistory};

/// Audible feedback requested by an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SoundCue {
    Click,
    Equals,
    Clear,
    Memory,
}

impl SoundCue {
    /// (frequency in Hz, duration in ms)
    pub fn tone(self) -> (u32, u32) {
        match self {
            SoundCue::Click => (800, 50),
            SoundCue::Equals => (1000, 100),
            SoundCue::Clear => (600, 100),
            SoundCue::Memory => (1200, 75),
        }
    }
}

/// Side effect for the host to carry out.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    Sound(SoundCue),
    ThemeApplied(Theme),
}

pub struct Calculator {
    display: String,
    previous_value: String,
    operation: Option<Operator>,
    waiting_for_value: bool,
    memory: MemoryRegister,
    history: History,
    theme: Theme,
    mode: Mode,
    is_scientific: bool,
    undo: UndoHistory,
    effects: Vec<Effect>,
    persist_dirty: bool,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self::with_undo_depth(DEFAULT_UNDO_DEPTH)
    }

    pub fn with_undo_depth(depth: usize) -> Self {
        Self::restore(PersistedState::default(), depth)
    }

    /// Start a session from previously persisted fields. Transient fields
    /// (display, pending operation, undo stacks) always start fresh.
    pub fn restore(state: PersistedState, undo_depth: usize) -> Self {
        Self {
            display: "0".to_string(),
            previous_value: String::new(),
            operation: None,
            waiting_for_value: false,
            memory: MemoryRegister::new(state.memory),
            history: state.history,
            theme: state.theme,
            mode: state.mode,
            is_scientific: state.is_scientific,
            undo: UndoHistory::new(undo_depth),
            effects: Vec::new(),
            persist_dirty: false,
        }
    }

    // --- Accessors ---

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn previous_value(&self) -> &str {
        &self.previous_value
    }

    pub fn operation(&self) -> Option<Operator> {
        self.operation
    }

    pub fn is_waiting_for_value(&self) -> bool {
        self.waiting_for_value
    }

    pub fn memory(&self) -> f64 {
        self.memory.recall()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_scientific(&self) -> bool {
        self.is_scientific
    }

    pub fn can_undo(&self) -> bool {
        self.undo.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.undo.can_redo()
    }

    pub fn undo_history(&self) -> &UndoHistory {
        &self.undo
    }

    /// Text placed on the clipboard by "copy".
    pub fn clipboard_text(&self) -> &str {
        &self.display
    }

    /// Numeric value of the display, if it holds one.
    pub fn current_value(&self) -> Option<f64> {
        parse_operand(&self.display).ok()
    }

    /// Expression line shown above the display while an operation is pending.
    pub fn pending_expression(&self) -> Option<String> {
        self.operation
            .map(|op| format!("{} {}", self.previous_value, op.symbol()))
    }

    pub fn drain_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.effects)
    }

    // --- Persistence ---

    pub fn persisted(&self) -> PersistedState {
        PersistedState {
            memory: self.memory.recall(),
            history: self.history.clone(),
            theme: self.theme.clone(),
            mode: self.mode,
            is_scientific: self.is_scientific,
        }
    }

    /// The persisted subset, if any of it changed since the last call.
    pub fn take_persisted(&mut self) -> Option<PersistedState> {
        if !self.persist_dirty {
            return None;
        }
        self.persist_dirty = false;
        Some(self.persisted())
    }

    pub fn mark_dirty(&mut self) {
        self.persist_dirty = true;
    }

    // --- Input accumulation ---

    pub fn input_digit(&mut self, digit: char) {
        if !digit.is_ascii_digit() {
            return;
        }
        self.emit(Effect::Sound(SoundCue::Click));
        self.checkpoint();

        if self.waiting_for_value || self.shows_error() {
            self.display = digit.to_string();
            self.waiting_for_value = false;
        } else if self.display == "0" {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
    }

    pub fn input_decimal_point(&mut self) {
        self.emit(Effect::Sound(SoundCue::Click));
        if self.display.contains('.') {
            return;
        }
        self.checkpoint();

        if self.waiting_for_value || self.shows_error() {
            self.display = "0.".to_string();
            self.waiting_for_value = false;
        } else {
            self.display.push('.');
        }
    }

    /// Delete the last display character; a lone remaining character
    /// resets to `"0"`. Not recorded for undo.
    pub fn backspace(&mut self) {
        if self.shows_error() {
            self.display = "0".to_string();
            return;
        }
        let mut text: String = self.display.chars().filter(|c| *c != ',').collect();
        text.pop();
        let trimmed = text.trim_end_matches(['e', 'E', '+', '-']);
        self.display = if trimmed.is_empty() {
            "0".to_string()
        } else {
            trimmed.to_string()
        };
    }

    // --- Operation sequencing ---

    pub fn input_operation(&mut self, op: Operator) {
        self.emit(Effect::Sound(SoundCue::Click));
        if self.shows_error() {
            return;
        }
        self.checkpoint();

        if self.previous_value.is_empty() || self.waiting_for_value {
            self.previous_value = self.display.clone();
            self.operation = Some(op);
            self.waiting_for_value = true;
            return;
        }

        match self.evaluate_pending() {
            Some(result) => {
                self.display = result.clone();
                self.previous_value = result;
                self.operation = Some(op);
                self.waiting_for_value = true;
            }
            None => self.fail(),
        }
    }

    /// `=`: evaluate the pending operation and log it to history.
    pub fn calculate(&mut self) {
        self.emit(Effect::Sound(SoundCue::Equals));
        let Some(op) = self.operation else {
            return;
        };
        if self.waiting_for_value || self.shows_error() {
            return;
        }
        self.checkpoint();

        match self.evaluate_pending() {
            Some(result) => {
                let expression =
                    format!("{} {} {}", self.previous_value, op.symbol(), self.display);
                self.history.push(HistoryEntry::new(&expression, &result));
                self.persist_dirty = true;

                self.display = result;
                self.previous_value.clear();
                self.operation = None;
                self.waiting_for_value = true;
            }
            None => self.fail(),
        }
    }

    /// Reset the entry state. Memory, history and undo stacks survive, and
    /// the clear itself is not undoable.
    pub fn clear(&mut self) {
        self.emit(Effect::Sound(SoundCue::Clear));
        self.display = "0".to_string();
        self.previous_value.clear();
        self.operation = None;
        self.waiting_for_value = false;
    }

    // --- Undo / redo ---

    pub fn undo(&mut self) {
        let current = self.snapshot();
        if let Some(previous) = self.undo.undo(current) {
            self.apply_snapshot(previous);
        }
    }

    pub fn redo(&mut self) {
        let current = self.snapshot();
        if let Some(next) = self.undo.redo(current) {
            self.apply_snapshot(next);
        }
    }

    // --- Memory register ---

    pub fn memory_add(&mut self, value: f64) {
        let mut next = self.memory;
        next.add(value);
        self.update_memory(next);
    }

    pub fn memory_subtract(&mut self, value: f64) {
        let mut next = self.memory;
        next.subtract(value);
        self.update_memory(next);
    }

    pub fn memory_store(&mut self, value: f64) {
        self.update_memory(MemoryRegister::new(value));
    }

    pub fn memory_clear(&mut self) {
        self.emit(Effect::Sound(SoundCue::Memory));
        self.memory.clear();
        self.persist_dirty = true;
    }

    pub fn memory_recall(&mut self) -> f64 {
        self.emit(Effect::Sound(SoundCue::Memory));
        self.memory.recall()
    }

    /// MR on the keypad: show the register as a fresh operand.
    pub fn recall_memory_to_display(&mut self) {
        let value = self.memory_recall();
        self.display = format_number(value);
        self.waiting_for_value = true;
    }

    // --- Scientific panel ---

    /// Replace the display with `f(display)`.
    pub fn apply_function(&mut self, f: ScientificFn) {
        self.emit(Effect::Sound(SoundCue::Click));
        let formatted = self
            .current_value()
            .and_then(|v| f.apply(v).ok())
            .map(format_number);

        match formatted {
            Some(result) if result != ERROR_DISPLAY => {
                self.display = result;
                self.waiting_for_value = true;
            }
            _ => self.fail(),
        }
    }

    pub fn insert_pi(&mut self) {
        self.emit(Effect::Sound(SoundCue::Click));
        self.display = PI.to_string();
        self.waiting_for_value = true;
    }

    // --- History ---

    /// Log a result computed outside the state machine.
    pub fn record_history(&mut self, expression: &str, result: &str) {
        self.history.push(HistoryEntry::new(expression, result));
        self.persist_dirty = true;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.persist_dirty = true;
    }

    // --- Mode and theme ---

    pub fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            self.mode = mode;
            self.persist_dirty = true;
        }
    }

    pub fn toggle_scientific(&mut self) {
        self.is_scientific = !self.is_scientific;
        self.persist_dirty = true;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.emit(Effect::ThemeApplied(theme.clone()));
        self.theme = theme;
        self.persist_dirty = true;
    }

    pub fn toggle_theme(&mut self) {
        self.set_theme(self.theme.toggled());
    }

    // --- Internals ---

    fn emit(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Commit a new register value. A non-finite result leaves the register
    /// untouched and shows the error marker instead.
    fn update_memory(&mut self, next: MemoryRegister) {
        self.emit(Effect::Sound(SoundCue::Memory));
        if !next.recall().is_finite() {
            self.fail();
            return;
        }
        self.memory = next;
        self.persist_dirty = true;
    }

    fn shows_error(&self) -> bool {
        self.display == ERROR_DISPLAY
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            display: self.display.clone(),
            previous_value: self.previous_value.clone(),
            operation: self.operation,
            memory: self.memory.recall(),
            waiting_for_value: self.waiting_for_value,
            timestamp: now_unix_millis(),
        }
    }

    fn checkpoint(&mut self) {
        let snapshot = self.snapshot();
        self.undo.record(snapshot);
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        if snapshot.memory != self.memory.recall() {
            self.persist_dirty = true;
        }
        self.display = snapshot.display;
        self.previous_value = snapshot.previous_value;
        self.operation = snapshot.operation;
        self.waiting_for_value = snapshot.waiting_for_value;
        self.memory.store(snapshot.memory);
    }

    /// `previous_value <op> display`, formatted. `None` on any failure,
    /// including results that only format to the error marker.
    fn evaluate_pending(&self) -> Option<String> {
        let op = self.operation?;
        let a = parse_operand(&self.previous_value).ok()?;
        let b = parse_operand(&self.display).ok()?;
        let formatted = format_number(op.apply(a, b).ok()?);
        (formatted != ERROR_DISPLAY).then_some(formatted)
    }

    fn fail(&mut self) {
        self.display = ERROR_DISPLAY.to_string();
        self.previous_value.clear();
        self.operation = None;
        self.waiting_for_value = true;
    }
}

//! One CLI invocation's view of a profile: load, mutate, settle.

use std::io::{IsTerminal, Write};
use std::path::Path;
use std::str::FromStr;

use abacus_core::{
    Calculator, Effect, KeyAction, Operator, PersistedState, ScientificFn, ThemeCatalog,
    parse_key_sequence,
};
use abacus_store::profile::resolve_profile;
use abacus_store::{ProfileStore, Settings};
use anyhow::{Context, Result};

/// A keypad press: keyboard keys plus the panel buttons that have no key.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PadInput {
    Key(KeyAction),
    Function(ScientificFn),
    Pi,
    MemoryAdd,
    MemorySubtract,
    MemoryStore,
    MemoryClear,
    MemoryRecall,
}

fn parse_button(token: &str) -> Option<PadInput> {
    let input = match token.to_lowercase().as_str() {
        "pi" | "π" => PadInput::Pi,
        "m+" => PadInput::MemoryAdd,
        "m-" => PadInput::MemorySubtract,
        "ms" => PadInput::MemoryStore,
        "mc" => PadInput::MemoryClear,
        "mr" => PadInput::MemoryRecall,
        "x" => PadInput::Key(KeyAction::Operation(Operator::Multiply)),
        _ => PadInput::Function(ScientificFn::from_str(token).ok()?),
    };
    Some(input)
}

/// Parse whitespace-separated pad tokens. Panel buttons (`sqrt`, `x²`,
/// `m+`, `pi`, `x` for multiply, ...) are matched first; everything else goes through the
/// keyboard parser.
pub fn parse_pad(input: &str) -> Result<Vec<PadInput>> {
    let mut inputs = Vec::new();
    for token in input.split_whitespace() {
        match parse_button(token) {
            Some(button) => inputs.push(button),
            None => inputs.extend(
                parse_key_sequence(token)
                    .with_context(|| format!("cannot parse key '{token}'"))?
                    .into_iter()
                    .map(PadInput::Key),
            ),
        }
    }
    Ok(inputs)
}

pub struct Session {
    store: ProfileStore,
    settings: Settings,
    calc: Calculator,
    themes: ThemeCatalog,
    themes_dirty: bool,
    bell: bool,
}

impl Session {
    pub fn open(profile: Option<&str>, base_dir: &Path) -> Result<Self> {
        let settings = Settings::load(base_dir).context("failed to load settings")?;
        let name = resolve_profile(profile, &settings);
        let store = ProfileStore::open(&name, base_dir).context("failed to open profile store")?;

        let state = store.store().load_state().unwrap_or_else(|e| {
            tracing::warn!("failed to load calculator state: {e}");
            PersistedState::default()
        });
        let themes = store.store().load_custom_themes().unwrap_or_else(|e| {
            tracing::warn!("failed to load custom themes: {e}");
            ThemeCatalog::new()
        });
        let calc = Calculator::restore(state, settings.undo_depth);
        let bell = settings.sound && std::io::stderr().is_terminal();

        Ok(Self {
            store,
            settings,
            calc,
            themes,
            themes_dirty: false,
            bell,
        })
    }

    pub fn calc(&self) -> &Calculator {
        &self.calc
    }

    pub fn calc_mut(&mut self) -> &mut Calculator {
        &mut self.calc
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    pub fn themes(&self) -> &ThemeCatalog {
        &self.themes
    }

    pub fn themes_mut(&mut self) -> &mut ThemeCatalog {
        self.themes_dirty = true;
        &mut self.themes
    }

    pub fn press(&mut self, input: PadInput) {
        tracing::debug!(?input, "press");
        let calc = &mut self.calc;
        match input {
            PadInput::Key(action) => calc.apply(action),
            PadInput::Function(f) => calc.apply_function(f),
            PadInput::Pi => calc.insert_pi(),
            PadInput::MemoryRecall => calc.recall_memory_to_display(),
            PadInput::MemoryClear => calc.memory_clear(),
            PadInput::MemoryAdd | PadInput::MemorySubtract | PadInput::MemoryStore => {
                let Some(value) = calc.current_value() else {
                    tracing::warn!("display '{}' is not a number", calc.display());
                    return;
                };
                match input {
                    PadInput::MemoryAdd => calc.memory_add(value),
                    PadInput::MemorySubtract => calc.memory_subtract(value),
                    _ => calc.memory_store(value),
                }
            }
        }
    }

    /// Carry out queued effects and persist whatever changed. Storage
    /// failures are logged and otherwise ignored.
    pub fn settle(&mut self) {
        for effect in self.calc.drain_effects() {
            match effect {
                Effect::Sound(cue) => {
                    let (hz, ms) = cue.tone();
                    tracing::trace!(?cue, hz, ms, "sound");
                    if self.bell {
                        let _ = std::io::stderr().write_all(b"\x07");
                    }
                }
                Effect::ThemeApplied(theme) => {
                    tracing::debug!(theme = %theme.name, dark = theme.is_dark, "theme applied");
                }
            }
        }

        if let Some(state) = self.calc.take_persisted()
            && let Err(e) = self.store.store().save_state(&state)
        {
            tracing::warn!("failed to save calculator state: {e}");
        }

        if self.themes_dirty {
            self.themes_dirty = false;
            if let Err(e) = self.store.store().save_custom_themes(&self.themes) {
                tracing::warn!("failed to save custom themes: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pad_mixes_buttons_and_keys() {
        let inputs = parse_pad("16 sqrt m+ 2 * pi =").unwrap();
        assert_eq!(
            inputs,
            vec![
                PadInput::Key(KeyAction::Digit('1')),
                PadInput::Key(KeyAction::Digit('6')),
                PadInput::Function(ScientificFn::Sqrt),
                PadInput::MemoryAdd,
                PadInput::Key(KeyAction::Digit('2')),
                PadInput::Key(KeyAction::Operation(Operator::Multiply)),
                PadInput::Pi,
                PadInput::Key(KeyAction::Calculate),
            ]
        );
    }

    #[test]
    fn test_parse_pad_letter_x_multiplies() {
        let inputs = parse_pad("3 x 4 X 2").unwrap();
        assert_eq!(inputs[1], PadInput::Key(KeyAction::Operation(Operator::Multiply)));
        assert_eq!(inputs[3], PadInput::Key(KeyAction::Operation(Operator::Multiply)));
        assert_eq!(parse_pad("x²").unwrap(), vec![PadInput::Function(ScientificFn::Square)]);
    }

    #[test]
    fn test_parse_pad_keeps_clear_key() {
        assert_eq!(parse_pad("c").unwrap(), vec![PadInput::Key(KeyAction::Clear)]);
        assert!(parse_pad("bogus").is_err());
    }

    #[test]
    fn test_session_persists_on_settle() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut session = Session::open(Some("t"), dir.path()).unwrap();
            for input in parse_pad("9 ms c 3 + 4 =").unwrap() {
                session.press(input);
            }
            assert_eq!(session.calc().display(), "7");
            session.settle();
        }

        let session = Session::open(Some("t"), dir.path()).unwrap();
        assert_eq!(session.calc().memory(), 9.0);
        assert_eq!(session.calc().history().len(), 1);
        assert_eq!(session.calc().display(), "0");
    }
}

//! JSON serde for the persisted subset of a calculator session.
//!
//! The wire format uses camelCase field names:
//! `{memory, history, theme, mode, isScientific}`. Missing fields fall back
//! to the fresh-session defaults so partial payloads still load.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CalcError;
use crate::history::History;
use crate::theme::Theme;

/// Storage key the persisted subset lives under.
pub const STATE_KEY: &str = "calculatorState";

/// Storage key for the custom theme catalog.
pub const CUSTOM_THEMES_KEY: &str = "customThemes";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Standard,
    Scientific,
    Unit,
    Currency,
    Date,
    Equation,
    Graph,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Standard,
        Mode::Scientific,
        Mode::Unit,
        Mode::Currency,
        Mode::Date,
        Mode::Equation,
        Mode::Graph,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Standard => "standard",
            Mode::Scientific => "scientific",
            Mode::Unit => "unit",
            Mode::Currency => "currency",
            Mode::Date => "date",
            Mode::Equation => "equation",
            Mode::Graph => "graph",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str() == lower)
            .ok_or_else(|| CalcError::InvalidExpression(format!("unknown mode '{s}'")))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(deserialize_with = "finite_or_zero")]
    pub memory: f64,
    pub history: History,
    pub theme: Theme,
    pub mode: Mode,
    pub is_scientific: bool,
}

/// `null` (how serde_json writes a non-finite float) loads as zero so one
/// bad field cannot discard the rest of the payload.
fn finite_or_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<f64>::deserialize(deserializer)?;
    Ok(value.filter(|v| v.is_finite()).unwrap_or(0.0))
}

impl PersistedState {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

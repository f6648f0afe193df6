//! Color palettes and the custom theme catalog.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CalcError, Result};

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").unwrap());

/// Active palette. The wire form uses `isDark`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
    #[serde(rename = "isDark")]
    pub is_dark: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Theme::light()
    }
}

impl Theme {
    #[allow(clippy::too_many_arguments)]
    fn palette(
        name: &str,
        primary: &str,
        secondary: &str,
        accent: &str,
        background: &str,
        surface: &str,
        text: &str,
        is_dark: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            accent: accent.to_string(),
            background: background.to_string(),
            surface: surface.to_string(),
            text: text.to_string(),
            is_dark,
        }
    }

    pub fn light() -> Self {
        Self::palette(
            "light", "#3B82F6", "#14B8A6", "#F97316", "#F8FAFC", "#FFFFFF", "#1F2937", false,
        )
    }

    pub fn dark() -> Self {
        Self::palette(
            "dark", "#60A5FA", "#2DD4BF", "#FB923C", "#0F172A", "#1E293B", "#F1F5F9", true,
        )
    }

    pub fn ocean() -> Self {
        Self::palette(
            "ocean", "#0EA5E9", "#06B6D4", "#8B5CF6", "#0C4A6E", "#075985", "#E0F2FE", true,
        )
    }

    pub fn forest() -> Self {
        Self::palette(
            "forest", "#10B981", "#059669", "#F59E0B", "#064E3B", "#065F46", "#D1FAE5", true,
        )
    }

    /// Dark themes toggle to `light`, light themes to `dark`.
    pub fn toggled(&self) -> Self {
        if self.is_dark {
            Theme::light()
        } else {
            Theme::dark()
        }
    }

    /// Variable/value pairs a host can apply as style properties.
    pub fn css_variables(&self) -> [(&'static str, &str); 6] {
        [
            ("--primary", self.primary.as_str()),
            ("--secondary", self.secondary.as_str()),
            ("--accent", self.accent.as_str()),
            ("--background", self.background.as_str()),
            ("--surface", self.surface.as_str()),
            ("--text", self.text.as_str()),
        ]
    }
}

pub fn builtin_themes() -> Vec<Theme> {
    vec![Theme::light(), Theme::dark(), Theme::ocean(), Theme::forest()]
}

pub fn find_builtin(name: &str) -> Option<Theme> {
    builtin_themes()
        .into_iter()
        .find(|t| t.name.eq_ignore_ascii_case(name))
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub surface: String,
    pub text: String,
}

impl ThemeColors {
    pub fn validate(&self) -> Result<()> {
        for color in [
            &self.primary,
            &self.secondary,
            &self.accent,
            &self.background,
            &self.surface,
            &self.text,
        ] {
            if !HEX_COLOR.is_match(color) {
                return Err(CalcError::InvalidThemeColor(color.clone()));
            }
        }
        Ok(())
    }
}

/// User-defined palette from the theme editor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTheme {
    pub id: String,
    pub name: String,
    pub colors: ThemeColors,
    #[serde(rename = "isDark")]
    pub is_dark: bool,
}

impl CustomTheme {
    pub fn new(name: &str, colors: ThemeColors, is_dark: bool) -> Result<Self> {
        colors.validate()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            colors,
            is_dark,
        })
    }

    pub fn to_theme(&self) -> Theme {
        Theme {
            name: self.name.clone(),
            primary: self.colors.primary.clone(),
            secondary: self.colors.secondary.clone(),
            accent: self.colors.accent.clone(),
            background: self.colors.background.clone(),
            surface: self.colors.surface.clone(),
            text: self.colors.text.clone(),
            is_dark: self.is_dark,
        }
    }
}

/// Custom themes saved by the user. Serializes as a bare array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeCatalog {
    themes: Vec<CustomTheme>,
}

impl ThemeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self, theme: CustomTheme) {
        self.themes.push(theme);
    }

    /// Remove by id. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.themes.len();
        self.themes.retain(|t| t.id != id);
        self.themes.len() != before
    }

    pub fn themes(&self) -> &[CustomTheme] {
        &self.themes
    }

    /// Resolve a name against built-ins first, then custom themes.
    pub fn resolve(&self, name: &str) -> Option<Theme> {
        find_builtin(name).or_else(|| {
            self.themes
                .iter()
                .find(|t| t.name.eq_ignore_ascii_case(name))
                .map(CustomTheme::to_theme)
        })
    }
}

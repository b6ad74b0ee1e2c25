use std::path::PathBuf;

use crate::error::{PaneletError, PaneletResult};

/// Which half of the panel a character (and their dialogue) belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Accepted storyboard spellings for a side segment.
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias.to_ascii_lowercase().as_str() {
            "left" | "l" => Some(Side::Left),
            "right" | "r" => Some(Side::Right),
            _ => None,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Character category a persona alias maps to. Doubles as the name of the
/// sprite subdirectory that holds the category's images.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    Male,
    Female,
}

impl Persona {
    pub const ALL: [Persona; 2] = [Persona::Male, Persona::Female];

    /// Accepted storyboard spellings for a persona segment.
    pub fn from_alias(alias: &str) -> Option<Self> {
        match alias.to_ascii_lowercase().as_str() {
            "guy" | "male" | "man" | "boy" | "dude" | "bro" => Some(Persona::Male),
            "girl" | "female" | "woman" | "lady" | "gal" => Some(Persona::Female),
            _ => None,
        }
    }

    /// Sprite subdirectory name for this category.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Persona::Male => "male",
            Persona::Female => "female",
        }
    }
}

impl std::fmt::Display for Persona {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// One spoken line, in declaration order within its panel.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DialogueLine {
    pub side: Side,
    pub text: String,
}

/// The sprite a side ends up showing. The storyboard parser keeps the sprite
/// of the most recent dialogue line for the side, so expressions can change
/// mid-panel while only the final one renders.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CharacterSlot {
    pub persona: Persona,
    pub expression: String,
    pub sprite_path: PathBuf,
}

/// Per-panel `key = value` overrides. `None` falls back to the global value.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct PanelOverrides {
    pub background: Option<String>,
    pub margin: Option<u32>,
    pub dialogue_height: Option<u32>,
    pub sprite_scale: Option<f64>,
    pub font_size: Option<u32>,
    pub font_family: Option<String>,
    pub font_color: Option<String>,
    pub flip_left: Option<bool>,
    pub flip_right: Option<bool>,
}

/// One fully parsed panel: both character slots resolved, dialogue in order.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Panel {
    /// 1-based position in the document, used for output naming and errors.
    pub index: usize,
    pub title: Option<String>,
    pub left: CharacterSlot,
    pub right: CharacterSlot,
    pub dialogue: Vec<DialogueLine>,
    pub overrides: PanelOverrides,
}

/// Global settings from the storyboard preamble. Immutable once parsed;
/// every panel falls back to these values.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GlobalSettings {
    pub panel_width: u32,
    pub panel_height: u32,
    pub sprite_scale: f64,
    pub font_family: String,
    pub font_size: u32,
    pub font_color: String,
    pub font_path: Option<PathBuf>,
    pub background: String,
    pub margin: u32,
    pub dialogue_height: u32,
    pub output_extension: String,
    pub sprite_root: PathBuf,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            panel_width: 800,
            panel_height: 600,
            sprite_scale: 1.0,
            font_family: "sans-serif".to_string(),
            font_size: 20,
            font_color: "#222222".to_string(),
            font_path: None,
            background: "#ffffff".to_string(),
            margin: 20,
            dialogue_height: 200,
            output_extension: "svg".to_string(),
            sprite_root: PathBuf::from("output"),
        }
    }
}

impl GlobalSettings {
    pub fn validate(&self) -> PaneletResult<()> {
        if self.panel_width == 0 || self.panel_height == 0 {
            return Err(PaneletError::config("panel width/height must be > 0"));
        }
        if self.dialogue_height >= self.panel_height {
            return Err(PaneletError::config(format!(
                "dialogueHeight ({}) must be smaller than panelHeight ({})",
                self.dialogue_height, self.panel_height
            )));
        }
        if !(self.sprite_scale > 0.0 && self.sprite_scale <= 1.0) {
            return Err(PaneletError::config("spriteScale must be in (0, 1]"));
        }
        if self.font_size == 0 {
            return Err(PaneletError::config("fontSize must be > 0"));
        }
        if self.font_family.trim().is_empty() {
            return Err(PaneletError::config("fontFamily must be non-empty"));
        }
        if self.output_extension.is_empty()
            || !self
                .output_extension
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(PaneletError::config(format!(
                "outputExtension '{}' may only contain alphanumerics, '-' and '_'",
                self.output_extension
            )));
        }
        Ok(())
    }

    /// Merge a panel's overrides over the globals. Pure; the result feeds the
    /// layout engine.
    pub fn effective(&self, overrides: &PanelOverrides) -> EffectiveSettings {
        EffectiveSettings {
            panel_width: self.panel_width,
            panel_height: self.panel_height,
            sprite_scale: overrides.sprite_scale.unwrap_or(self.sprite_scale),
            font_family: overrides
                .font_family
                .clone()
                .unwrap_or_else(|| self.font_family.clone()),
            font_size: overrides.font_size.unwrap_or(self.font_size),
            font_color: overrides
                .font_color
                .clone()
                .unwrap_or_else(|| self.font_color.clone()),
            background: overrides
                .background
                .clone()
                .unwrap_or_else(|| self.background.clone()),
            margin: overrides.margin.unwrap_or(self.margin),
            dialogue_height: overrides.dialogue_height.unwrap_or(self.dialogue_height),
            // Right-side characters face inward by default; either default can
            // be overridden per panel.
            mirror_left: overrides.flip_left.unwrap_or(false),
            mirror_right: overrides.flip_right.unwrap_or(true),
        }
    }
}

/// Panel-override-or-global values, resolved once per panel.
#[derive(Clone, Debug, serde::Serialize)]
pub struct EffectiveSettings {
    pub panel_width: u32,
    pub panel_height: u32,
    pub sprite_scale: f64,
    pub font_family: String,
    pub font_size: u32,
    pub font_color: String,
    pub background: String,
    pub margin: u32,
    pub dialogue_height: u32,
    pub mirror_left: bool,
    pub mirror_right: bool,
}

impl EffectiveSettings {
    /// Vertical pixels above the dialogue area available to sprites.
    pub fn sprite_area_height(&self) -> f64 {
        f64::from(self.panel_height) - f64::from(self.dialogue_height)
    }
}

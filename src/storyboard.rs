use std::path::Path;

use crate::{
    catalogue::SpriteCatalogue,
    error::{PaneletError, PaneletResult, PanelRef},
    model::{CharacterSlot, DialogueLine, GlobalSettings, Panel, PanelOverrides, Side},
    token,
};

/// Info-string word that opens a panel fence.
pub const PANEL_FENCE_MARKER: &str = "comic";

/// A parsed storyboard document: immutable global settings plus the panels
/// in document order.
#[derive(Clone, Debug)]
pub struct Storyboard {
    pub settings: GlobalSettings,
    pub panels: Vec<Panel>,
}

/// Parse a storyboard document, building the sprite catalogue from the
/// sprite root named in the preamble (resolved relative to `doc_dir`).
pub fn parse(text: &str, doc_dir: &Path) -> PaneletResult<Storyboard> {
    let settings = parse_preamble(text, doc_dir)?;
    let catalogue = SpriteCatalogue::scan(&settings.sprite_root)?;
    parse_with_catalogue(text, settings, &catalogue)
}

/// Parse the preamble: every `key: value` line before the first panel fence.
/// Unrecognized keys are ignored so documents can carry stray notes;
/// recognized keys are validated strictly. Fenced non-panel blocks (e.g.
/// other diagram languages) are skipped wholesale.
pub fn parse_preamble(text: &str, doc_dir: &Path) -> PaneletResult<GlobalSettings> {
    let mut settings = GlobalSettings::default();
    let mut in_foreign_fence = false;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if let Some(info) = fence_info(line) {
            if in_foreign_fence {
                in_foreign_fence = false;
            } else if comic_fence_title(info).is_some() {
                break;
            } else {
                in_foreign_fence = true;
            }
            continue;
        }
        if in_foreign_fence {
            continue;
        }

        let Some((key, value)) = split_setting(line) else {
            continue;
        };
        apply_global_setting(&mut settings, key, value, line_no)?;
    }

    settings.sprite_root = doc_dir.join(&settings.sprite_root);
    if let Some(font_path) = settings.font_path.take() {
        settings.font_path = Some(doc_dir.join(font_path));
    }
    settings.validate()?;
    Ok(settings)
}

/// Parse panels against an already-built catalogue. Tests use this with a
/// synthetic catalogue; `parse` feeds it the filesystem-scanned one.
pub fn parse_with_catalogue(
    text: &str,
    settings: GlobalSettings,
    catalogue: &SpriteCatalogue,
) -> PaneletResult<Storyboard> {
    enum State {
        Outside,
        ForeignFence,
        InPanel(PanelDraft),
    }

    let mut panels: Vec<Panel> = Vec::new();
    let mut state = State::Outside;
    let mut saw_panel_fence = false;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();

        if let Some(info) = fence_info(line) {
            state = match state {
                State::Outside => match comic_fence_title(info) {
                    Some(title) => {
                        saw_panel_fence = true;
                        State::InPanel(PanelDraft::new(panels.len() + 1, title, &settings))
                    }
                    None => State::ForeignFence,
                },
                State::ForeignFence => State::Outside,
                State::InPanel(draft) => {
                    panels.push(draft.finish()?);
                    State::Outside
                }
            };
            continue;
        }

        if let State::InPanel(draft) = &mut state {
            draft.body_line(line, line_no, catalogue)?;
        }
    }

    // An unclosed final fence runs to end of document.
    if let State::InPanel(draft) = state {
        panels.push(draft.finish()?);
    }

    if !saw_panel_fence || panels.is_empty() {
        return Err(PaneletError::document(format!(
            "document contains no ```{PANEL_FENCE_MARKER} panels"
        )));
    }

    tracing::debug!(panels = panels.len(), "storyboard parsed");
    Ok(Storyboard { settings, panels })
}

/// Accumulates one fenced panel body, then validates structure on `finish`.
struct PanelDraft {
    index: usize,
    title: Option<String>,
    overrides: PanelOverrides,
    left: Option<CharacterSlot>,
    right: Option<CharacterSlot>,
    dialogue: Vec<DialogueLine>,
    panel_height: u32,
}

impl PanelDraft {
    fn new(index: usize, title: Option<String>, settings: &GlobalSettings) -> Self {
        Self {
            index,
            title,
            overrides: PanelOverrides::default(),
            left: None,
            right: None,
            dialogue: Vec::new(),
            panel_height: settings.panel_height,
        }
    }

    fn panel_ref(&self) -> PanelRef {
        PanelRef::new(self.index, self.title.clone())
    }

    fn body_line(
        &mut self,
        line: &str,
        line_no: usize,
        catalogue: &SpriteCatalogue,
    ) -> PaneletResult<()> {
        if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
            return Ok(());
        }

        let eq = line.find('=');
        let colon = line.find(':');
        if let Some(eq) = eq
            && colon.is_none_or(|c| eq < c)
        {
            return self.assignment(&line[..eq], &line[eq + 1..], line_no);
        }

        if let Some(colon) = colon {
            let raw_token = line[..colon].trim();
            if token::looks_like_dialogue_token(raw_token) {
                let resolved = token::resolve_token(raw_token, catalogue)
                    .map_err(|e| PaneletError::parse(self.panel_ref(), line_no, e.to_string()))?;
                let slot = CharacterSlot {
                    persona: resolved.persona,
                    expression: resolved.expression,
                    sprite_path: resolved.sprite_path,
                };
                // Last reference wins: a later line re-naming the side
                // replaces the sprite shown for it.
                match resolved.side {
                    Side::Left => self.left = Some(slot),
                    Side::Right => self.right = Some(slot),
                }
                self.dialogue.push(DialogueLine {
                    side: resolved.side,
                    text: line[colon + 1..].trim().to_string(),
                });
                return Ok(());
            }
        }

        // Anything else is stray prose; the format stays forgiving.
        Ok(())
    }

    fn assignment(&mut self, key: &str, value: &str, line_no: usize) -> PaneletResult<()> {
        let key = key.trim();
        let value = value.trim();
        let panel_ref = self.panel_ref();
        let wrap = |msg: String| PaneletError::parse(panel_ref.clone(), line_no, msg);

        match canonical_key(key).as_str() {
            "title" => {
                self.title = (!value.is_empty()).then(|| value.to_string());
            }
            "flipleft" => {
                self.overrides.flip_left =
                    Some(bool_value(value).map_err(|m| wrap(format!("{key}: {m}")))?);
            }
            "flipright" => {
                self.overrides.flip_right =
                    Some(bool_value(value).map_err(|m| wrap(format!("{key}: {m}")))?);
            }
            "background" => {
                self.overrides.background =
                    Some(non_empty(value).map_err(|m| wrap(format!("{key}: {m}")))?);
            }
            "margin" => {
                self.overrides.margin =
                    Some(u32_value(value).map_err(|m| wrap(format!("{key}: {m}")))?);
            }
            "dialogueheight" => {
                let height = positive_u32(value).map_err(|m| wrap(format!("{key}: {m}")))?;
                if height >= self.panel_height {
                    return Err(wrap(format!(
                        "{key}: {height} must be smaller than the panel height ({})",
                        self.panel_height
                    )));
                }
                self.overrides.dialogue_height = Some(height);
            }
            "spritescale" => {
                self.overrides.sprite_scale =
                    Some(scale_value(value).map_err(|m| wrap(format!("{key}: {m}")))?);
            }
            "fontsize" => {
                self.overrides.font_size =
                    Some(positive_u32(value).map_err(|m| wrap(format!("{key}: {m}")))?);
            }
            "fontfamily" => {
                self.overrides.font_family =
                    Some(non_empty(value).map_err(|m| wrap(format!("{key}: {m}")))?);
            }
            "fontcolor" => {
                self.overrides.font_color =
                    Some(non_empty(value).map_err(|m| wrap(format!("{key}: {m}")))?);
            }
            _ => {
                return Err(wrap(format!("unknown panel setting '{key}'")));
            }
        }
        Ok(())
    }

    fn finish(self) -> PaneletResult<Panel> {
        let panel_ref = self.panel_ref();
        if self.dialogue.is_empty() {
            return Err(PaneletError::structure(panel_ref, "panel has no dialogue lines"));
        }
        let Some(left) = self.left else {
            return Err(PaneletError::structure(
                panel_ref,
                "panel has no left-side dialogue (needs at least one left_* line)",
            ));
        };
        let Some(right) = self.right else {
            return Err(PaneletError::structure(
                panel_ref,
                "panel has no right-side dialogue (needs at least one right_* line)",
            ));
        };

        Ok(Panel {
            index: self.index,
            title: self.title,
            left,
            right,
            dialogue: self.dialogue,
            overrides: self.overrides,
        })
    }
}

fn fence_info(line: &str) -> Option<&str> {
    line.strip_prefix("```").map(str::trim)
}

/// `Some(title)` when a fence info-string opens a panel: the literal marker,
/// optionally followed by whitespace and a title.
fn comic_fence_title(info: &str) -> Option<Option<String>> {
    let rest = info.strip_prefix(PANEL_FENCE_MARKER)?;
    if rest.is_empty() {
        return Some(None);
    }
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let title = rest.trim();
    Some((!title.is_empty()).then(|| title.to_string()))
}

/// `key: value` with an identifier key; anything else is not a setting line.
fn split_setting(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    let key = key.trim();
    let mut chars = key.chars();
    if !chars.next()?.is_ascii_alphabetic() {
        return None;
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some((key, value.trim()))
}

fn apply_global_setting(
    settings: &mut GlobalSettings,
    key: &str,
    value: &str,
    line_no: usize,
) -> PaneletResult<()> {
    let wrap = |msg: String| PaneletError::preamble(line_no, format!("{key}: {msg}"));

    match key {
        "panelWidth" => settings.panel_width = positive_u32(value).map_err(wrap)?,
        "panelHeight" => settings.panel_height = positive_u32(value).map_err(wrap)?,
        "spriteScale" => settings.sprite_scale = scale_value(value).map_err(wrap)?,
        "fontFamily" => settings.font_family = non_empty(value).map_err(wrap)?,
        "fontSize" => settings.font_size = positive_u32(value).map_err(wrap)?,
        "fontColor" => settings.font_color = non_empty(value).map_err(wrap)?,
        "fontPath" => settings.font_path = Some(non_empty(value).map_err(wrap)?.into()),
        "background" => settings.background = non_empty(value).map_err(wrap)?,
        "margin" => settings.margin = u32_value(value).map_err(wrap)?,
        "dialogueHeight" => settings.dialogue_height = positive_u32(value).map_err(wrap)?,
        "outputExtension" => settings.output_extension = non_empty(value).map_err(wrap)?,
        "spriteRoot" => settings.sprite_root = non_empty(value).map_err(wrap)?.into(),
        // Preamble keys we do not recognize stay ignored so documents can
        // carry front-matter meant for other tools.
        _ => {}
    }
    Ok(())
}

/// Panel setting keys match case- and separator-insensitively:
/// `flipLeft`, `flip-left`, and `flip_left` are the same key.
fn canonical_key(key: &str) -> String {
    key.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn positive_u32(value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .ok()
        .filter(|v| *v > 0)
        .ok_or_else(|| format!("expected a positive integer, got '{value}'"))
}

fn u32_value(value: &str) -> Result<u32, String> {
    value
        .parse::<u32>()
        .map_err(|_| format!("expected a non-negative integer, got '{value}'"))
}

fn scale_value(value: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .ok()
        .filter(|v| *v > 0.0 && *v <= 1.0)
        .ok_or_else(|| format!("expected a scale in (0, 1], got '{value}'"))
}

fn bool_value(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(format!("expected a boolean (true/false/yes/no/on/off/1/0), got '{value}'")),
    }
}

fn non_empty(value: &str) -> Result<String, String> {
    if value.is_empty() {
        Err("expected a non-empty value".to_string())
    } else {
        Ok(value.to_string())
    }
}

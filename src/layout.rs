use crate::model::{EffectiveSettings, Panel, Side};

/// Fraction of the panel width one dialogue block may occupy before wrapping.
const WRAP_WIDTH_FACTOR: f64 = 0.38;
/// Estimated average glyph width as a fraction of the font size.
const CHAR_WIDTH_FACTOR: f64 = 0.6;
/// Line height as a fraction of the font size.
const LINE_HEIGHT_FACTOR: f64 = 1.35;
/// Vertical gap appended after each dialogue block, as a fraction of the
/// font size.
const BLOCK_GAP_FACTOR: f64 = 0.8;

/// Placement of one sprite on the canvas, in final display pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SpriteGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub mirrored: bool,
}

/// One dialogue line wrapped and anchored. Left speakers start-anchor at the
/// margin; right speakers end-anchor at the opposite margin.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextBlockGeometry {
    pub side: Side,
    pub anchor_x: f64,
    pub first_line_y: f64,
    pub line_height: f64,
    pub lines: Vec<String>,
}

/// Effective text styling shared by every block in a panel.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FontSpec {
    pub family: String,
    pub size: u32,
    pub color: String,
}

/// Complete geometry for one panel, ready for the SVG emitter. A pure
/// function of (panel, effective settings, sprite dimensions); identical
/// inputs always produce identical geometry.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct PanelGeometry {
    pub width: u32,
    pub height: u32,
    pub background: String,
    pub left: SpriteGeometry,
    pub right: SpriteGeometry,
    pub blocks: Vec<TextBlockGeometry>,
    pub font: FontSpec,
}

/// Compute sprite and dialogue placement for one panel.
///
/// Sprites scale by `sprite_scale * min(1, sprite_area / native_height)`, so
/// an oversized source can never spill out of the region reserved above the
/// dialogue area. Both sprites hang from a shared top edge at
/// `panel_height - margin - max(display heights)`; the left sprite's left
/// edge sits at the margin, the right sprite's right edge at the opposite
/// margin.
pub fn lay_out_panel(
    panel: &Panel,
    fx: &EffectiveSettings,
    left_native: (u32, u32),
    right_native: (u32, u32),
) -> PanelGeometry {
    let width = f64::from(fx.panel_width);
    let height = f64::from(fx.panel_height);
    let margin = f64::from(fx.margin);
    let font_size = f64::from(fx.font_size);
    let sprite_area = fx.sprite_area_height();

    let fit = |native: (u32, u32)| -> (f64, f64) {
        let (w, h) = (f64::from(native.0), f64::from(native.1));
        let scale = fx.sprite_scale * (sprite_area / h).min(1.0);
        (w * scale, h * scale)
    };
    let (left_w, left_h) = fit(left_native);
    let (right_w, right_h) = fit(right_native);

    let sprite_top = height - margin - left_h.max(right_h);
    let left = SpriteGeometry {
        x: margin,
        y: sprite_top,
        width: left_w,
        height: left_h,
        mirrored: fx.mirror_left,
    };
    let right = SpriteGeometry {
        x: width - margin - right_w,
        y: sprite_top,
        width: right_w,
        height: right_h,
        mirrored: fx.mirror_right,
    };

    let wrap_width = WRAP_WIDTH_FACTOR * width;
    let char_width = CHAR_WIDTH_FACTOR * font_size;
    let line_height = LINE_HEIGHT_FACTOR * font_size;

    let mut blocks = Vec::with_capacity(panel.dialogue.len());
    let mut cursor_y = margin + font_size;
    for line in &panel.dialogue {
        let lines = wrap_text(&line.text, wrap_width, char_width);
        let anchor_x = match line.side {
            Side::Left => margin,
            Side::Right => width - margin,
        };
        let advance = lines.len() as f64 * line_height + BLOCK_GAP_FACTOR * font_size;
        blocks.push(TextBlockGeometry {
            side: line.side,
            anchor_x,
            first_line_y: cursor_y,
            line_height,
            lines,
        });
        cursor_y += advance;
    }

    PanelGeometry {
        width: fx.panel_width,
        height: fx.panel_height,
        background: fx.background.clone(),
        left,
        right,
        blocks,
        font: FontSpec {
            family: fx.font_family.clone(),
            size: fx.font_size,
            color: fx.font_color.clone(),
        },
    }
}

/// Greedy word wrap against an estimated line width. Words are never split;
/// a word longer than the budget still gets a line of its own, so wrapping
/// always makes progress. Empty text yields a single empty line.
pub fn wrap_text(text: &str, max_width: f64, char_width: f64) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    for word in words {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate_chars = current.chars().count() + 1 + word.chars().count();
        if candidate_chars as f64 * char_width <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    lines.push(current);
    lines
}

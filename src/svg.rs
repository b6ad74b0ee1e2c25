use crate::{
    layout::{PanelGeometry, SpriteGeometry},
    sprite::{EmbeddedFont, ResolvedSprite},
};

/// Corner radius of the background rect.
const BACKGROUND_RADIUS: f64 = 12.0;

/// Serialize one panel's geometry into a self-contained SVG document.
///
/// Everything is inlined: sprite bytes as `data:image/png;base64` URIs and,
/// when a font was declared, a `@font-face` rule carrying the font bytes.
/// Output is a pure function of its inputs; no ids, timestamps, or other
/// nondeterminism.
pub fn emit_panel_svg(
    geom: &PanelGeometry,
    left: &ResolvedSprite,
    right: &ResolvedSprite,
    font: Option<&EmbeddedFont>,
) -> String {
    let mut out = String::with_capacity(left.base64.len() + right.base64.len() + 4096);
    let (w, h) = (geom.width, geom.height);

    out.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n"
    ));

    if let Some(font) = font {
        out.push_str(&format!(
            "<style>@font-face{{font-family:\"{}\";src:url(data:font/ttf;base64,{}) format(\"truetype\");}}</style>\n",
            escape_xml(&geom.font.family),
            font.base64
        ));
    }

    out.push_str(&format!(
        "<rect width=\"{w}\" height=\"{h}\" rx=\"{}\" fill=\"{}\"/>\n",
        fmt_px(BACKGROUND_RADIUS),
        escape_xml(&geom.background)
    ));

    push_image(&mut out, &geom.left, &left.base64);
    push_image(&mut out, &geom.right, &right.base64);

    for block in &geom.blocks {
        let anchor = match block.side {
            crate::model::Side::Left => "start",
            crate::model::Side::Right => "end",
        };
        out.push_str(&format!(
            "<text x=\"{}\" y=\"{}\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\" text-anchor=\"{anchor}\">",
            fmt_px(block.anchor_x),
            fmt_px(block.first_line_y),
            escape_xml(&geom.font.family),
            geom.font.size,
            escape_xml(&geom.font.color)
        ));
        for (i, line) in block.lines.iter().enumerate() {
            if i == 0 {
                out.push_str(&format!(
                    "<tspan x=\"{}\">{}</tspan>",
                    fmt_px(block.anchor_x),
                    escape_xml(line)
                ));
            } else {
                out.push_str(&format!(
                    "<tspan x=\"{}\" dy=\"{}\">{}</tspan>",
                    fmt_px(block.anchor_x),
                    fmt_px(block.line_height),
                    escape_xml(line)
                ));
            }
        }
        out.push_str("</text>\n");
    }

    out.push_str("</svg>\n");
    out
}

/// Mirrored images draw at the origin under a flip transform that lands them
/// in the same box as the unmirrored placement, flipped about their own
/// right edge. Unmirrored images just get x/y attributes.
fn push_image(out: &mut String, sprite: &SpriteGeometry, base64: &str) {
    if sprite.mirrored {
        out.push_str(&format!(
            "<image x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" transform=\"translate({} {}) scale(-1 1)\" href=\"data:image/png;base64,{}\"/>\n",
            fmt_px(sprite.width),
            fmt_px(sprite.height),
            fmt_px(sprite.x + sprite.width),
            fmt_px(sprite.y),
            base64
        ));
    } else {
        out.push_str(&format!(
            "<image x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" href=\"data:image/png;base64,{}\"/>\n",
            fmt_px(sprite.x),
            fmt_px(sprite.y),
            fmt_px(sprite.width),
            fmt_px(sprite.height),
            base64
        ));
    }
}

/// Escape text for element content and attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Fixed two-decimal formatting with trailing zeros trimmed: `12` not
/// `12.00`, `12.5` not `12.50`. Keeps output byte-stable across runs.
pub fn fmt_px(v: f64) -> String {
    let s = format!("{v:.2}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

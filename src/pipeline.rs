use std::path::{Path, PathBuf};

use crate::{
    error::{PaneletError, PaneletResult},
    layout,
    sprite,
    storyboard::{self, Storyboard},
    svg,
};

/// Default output directory when the CLI is not given one.
pub const DEFAULT_OUT_DIR: &str = "panels";

/// One panel carried through layout and emission, ready to write.
#[derive(Clone, Debug)]
pub struct ComposedPanel {
    pub index: usize,
    pub title: Option<String>,
    pub geometry: layout::PanelGeometry,
    pub svg: String,
}

/// Lay out and emit every panel of a parsed storyboard. Panels are
/// independent; any failure aborts the whole run before anything is
/// written.
#[tracing::instrument(skip_all)]
pub fn compose(storyboard: &Storyboard) -> PaneletResult<Vec<ComposedPanel>> {
    let settings = &storyboard.settings;
    settings.validate()?;

    let font = settings
        .font_path
        .as_deref()
        .map(sprite::load_font)
        .transpose()?;

    let mut composed = Vec::with_capacity(storyboard.panels.len());
    for panel in &storyboard.panels {
        let fx = settings.effective(&panel.overrides);
        let left = sprite::load_sprite(&panel.left.sprite_path)?;
        let right = sprite::load_sprite(&panel.right.sprite_path)?;
        let geometry = layout::lay_out_panel(
            panel,
            &fx,
            (left.width, left.height),
            (right.width, right.height),
        );
        let svg = svg::emit_panel_svg(&geometry, &left, &right, font.as_ref());
        tracing::debug!(panel = panel.index, bytes = svg.len(), "panel composed");
        composed.push(ComposedPanel {
            index: panel.index,
            title: panel.title.clone(),
            geometry,
            svg,
        });
    }
    Ok(composed)
}

/// Write composed panels as `panel-01.<ext>`, `panel-02.<ext>`, … in
/// document order, creating the output directory (and parents) as needed.
pub fn write_panels(
    panels: &[ComposedPanel],
    extension: &str,
    out_dir: &Path,
) -> PaneletResult<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir).map_err(|e| PaneletError::io(out_dir, e))?;

    let mut written = Vec::with_capacity(panels.len());
    for panel in panels {
        let path = out_dir.join(panel_file_name(panel.index, extension));
        std::fs::write(&path, &panel.svg).map_err(|e| PaneletError::io(&path, e))?;
        tracing::info!(path = %path.display(), "panel written");
        written.push(path);
    }
    Ok(written)
}

/// End-to-end convenience: read and parse the storyboard (building the
/// sprite catalogue from its preamble), compose every panel, write the
/// files.
pub fn run(storyboard_path: &Path, out_dir: &Path) -> PaneletResult<Vec<PathBuf>> {
    let text = std::fs::read_to_string(storyboard_path)
        .map_err(|e| PaneletError::io(storyboard_path, e))?;
    let doc_dir = match storyboard_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let storyboard = storyboard::parse(&text, doc_dir)?;
    let composed = compose(&storyboard)?;
    write_panels(&composed, &storyboard.settings.output_extension, out_dir)
}

fn panel_file_name(index: usize, extension: &str) -> String {
    format!("panel-{index:02}.{extension}")
}

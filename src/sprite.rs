use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::error::{PaneletError, PaneletResult};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// A sprite file read off disk and prepared for embedding: native pixel
/// dimensions from the header plus the raw bytes base64-encoded for a data
/// URI. Recomputed per reference; panels share nothing mutable.
#[derive(Clone, Debug)]
pub struct ResolvedSprite {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub base64: String,
}

/// Font bytes prepared for an embedded `@font-face` rule. The bytes are
/// embedded verbatim; no font internals are validated.
#[derive(Clone, Debug)]
pub struct EmbeddedFont {
    pub path: PathBuf,
    pub base64: String,
}

/// Read PNG dimensions from the fixed IHDR offsets (width at byte 16, height
/// at byte 20, both big-endian). Returns `None` unless the signature and the
/// IHDR chunk tag check out.
pub fn png_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    if bytes.len() < 24 || bytes[..8] != PNG_SIGNATURE || &bytes[12..16] != b"IHDR" {
        return None;
    }
    let width = u32::from_be_bytes(bytes[16..20].try_into().ok()?);
    let height = u32::from_be_bytes(bytes[20..24].try_into().ok()?);
    Some((width, height))
}

pub fn load_sprite(path: &Path) -> PaneletResult<ResolvedSprite> {
    let bytes = std::fs::read(path).map_err(|e| PaneletError::io(path, e))?;
    let Some((width, height)) = png_dimensions(&bytes) else {
        return Err(PaneletError::io(
            path,
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "not a valid PNG (bad signature or header)",
            ),
        ));
    };
    if width == 0 || height == 0 {
        return Err(PaneletError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidData, "PNG has zero dimensions"),
        ));
    }

    Ok(ResolvedSprite {
        path: path.to_path_buf(),
        width,
        height,
        base64: BASE64.encode(&bytes),
    })
}

/// Load the declared font file for embedding. A declared-but-missing font is
/// a configuration error; the run aborts before any panel is written.
pub fn load_font(path: &Path) -> PaneletResult<EmbeddedFont> {
    if !path.is_file() {
        return Err(PaneletError::config(format!(
            "declared font file '{}' does not exist",
            path.display()
        )));
    }
    let bytes = std::fs::read(path).map_err(|e| PaneletError::io(path, e))?;
    Ok(EmbeddedFont {
        path: path.to_path_buf(),
        base64: BASE64.encode(&bytes),
    })
}

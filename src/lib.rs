#![forbid(unsafe_code)]

//! Comic-strip panel compositor.
//!
//! A storyboard document declares global settings, then one or more fenced
//! `comic` panels of `token: dialogue` lines. Each panel composes two
//! character sprites (resolved against a filesystem-scanned catalogue) and
//! the wrapped dialogue onto a fixed canvas, emitted as one self-contained
//! SVG per panel. The whole pipeline is deterministic: the same document and
//! catalogue always produce byte-identical output.

pub mod catalogue;
pub mod error;
pub mod layout;
pub mod model;
pub mod pipeline;
pub mod sprite;
pub mod storyboard;
pub mod svg;
pub mod token;

pub use catalogue::SpriteCatalogue;
pub use error::{PaneletError, PaneletResult, PanelRef};
pub use layout::{PanelGeometry, lay_out_panel};
pub use model::{
    DialogueLine, EffectiveSettings, GlobalSettings, Panel, PanelOverrides, Persona, Side,
};
pub use pipeline::{ComposedPanel, DEFAULT_OUT_DIR, compose, run, write_panels};
pub use sprite::{EmbeddedFont, ResolvedSprite};
pub use storyboard::{Storyboard, parse_preamble, parse_with_catalogue};
pub use token::{ResolvedToken, TokenError, resolve_token};

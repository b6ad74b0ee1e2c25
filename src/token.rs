use std::path::PathBuf;

use crate::{
    catalogue::{SpriteCatalogue, normalize_expression},
    model::{Persona, Side},
};

/// Failure to map a dialogue token onto a catalogue sprite. The storyboard
/// parser wraps these with panel and line context.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("token '{0}' needs side, persona, and expression segments")]
    TooFewSegments(String),

    #[error("unknown side alias '{0}' (expected left/l or right/r)")]
    UnknownSide(String),

    #[error("unknown persona alias '{0}' (try guy/girl)")]
    UnknownPersona(String),

    #[error("no '{}' sprite for {}; available: {}", .expression, .persona, .available.join(", "))]
    UnknownExpression {
        persona: Persona,
        expression: String,
        available: Vec<String>,
    },
}

/// A dialogue token mapped to a concrete sprite.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedToken {
    pub side: Side,
    pub persona: Persona,
    /// The catalogue key that matched (after normalization and, possibly,
    /// the loose underscore-stripped retry).
    pub expression: String,
    pub sprite_path: PathBuf,
}

/// Split a token into its segments. `_`, `-`, and spaces all separate, and
/// runs of separators collapse, so `LEFT_Guy-Smile` and `left guy smile`
/// yield the same segments.
pub fn split_segments(raw: &str) -> Vec<&str> {
    raw.split(['_', '-', ' '])
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether a body line's pre-colon token is plausibly dialogue: its first
/// segment names a side. Anything else is treated as stray prose and skipped
/// by the parser rather than rejected.
pub fn looks_like_dialogue_token(raw: &str) -> bool {
    split_segments(raw)
        .first()
        .is_some_and(|seg| Side::from_alias(seg).is_some())
}

/// Resolve `side_persona_expression` against the catalogue.
pub fn resolve_token(
    raw: &str,
    catalogue: &SpriteCatalogue,
) -> Result<ResolvedToken, TokenError> {
    let segments = split_segments(raw);
    if segments.len() < 3 {
        return Err(TokenError::TooFewSegments(raw.to_string()));
    }

    let side = Side::from_alias(segments[0])
        .ok_or_else(|| TokenError::UnknownSide(segments[0].to_string()))?;
    let persona = Persona::from_alias(segments[1])
        .ok_or_else(|| TokenError::UnknownPersona(segments[1].to_string()))?;

    let expression = normalize_expression(&segments[2..].join("_"));
    let Some((key, path)) = catalogue.resolve(persona, &expression) else {
        return Err(TokenError::UnknownExpression {
            persona,
            expression,
            available: catalogue
                .expressions(persona)
                .into_iter()
                .map(str::to_string)
                .collect(),
        });
    };

    Ok(ResolvedToken {
        side,
        persona,
        expression: key.to_string(),
        sprite_path: path.to_path_buf(),
    })
}

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{
    error::{PaneletError, PaneletResult},
    model::Persona,
};

/// Image extensions the catalogue scanner recognizes (case-insensitive).
pub const SPRITE_EXTENSIONS: [&str; 2] = ["png", "webp"];

/// Normalize a raw expression spelling into a catalogue key: lowercase, runs
/// of non-alphanumerics collapse to a single underscore, no leading/trailing
/// underscore. `"Big Smile!"` and `"big--smile"` both become `"big_smile"`.
pub fn normalize_expression(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}

/// Lookup table from character category and expression key to sprite file.
/// Built once per run by scanning the sprite root; read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct SpriteCatalogue {
    entries: BTreeMap<Persona, BTreeMap<String, PathBuf>>,
}

impl SpriteCatalogue {
    /// Scan `root` for `male/` and `female/` subdirectories and index every
    /// recognized image file. A `<category>_` filename prefix is stripped
    /// before key normalization, so `male/male_smile.png` and
    /// `male/smile.png` both index as `smile`. The first file claiming a key
    /// wins; enumeration is sorted by filename so the winner is stable across
    /// platforms. An entirely empty catalogue is a configuration error.
    pub fn scan(root: &Path) -> PaneletResult<Self> {
        let mut entries: BTreeMap<Persona, BTreeMap<String, PathBuf>> = BTreeMap::new();

        for persona in Persona::ALL {
            let dir = root.join(persona.dir_name());
            if !dir.is_dir() {
                continue;
            }

            let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
                .map_err(|e| PaneletError::io(&dir, e))?
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| PaneletError::io(&dir, e))?
                .into_iter()
                .map(|entry| entry.path())
                .filter(|path| has_sprite_extension(path))
                .collect();
            files.sort();

            let keyed = entries.entry(persona).or_default();
            for path in files {
                let Some(key) = expression_key_for(persona, &path) else {
                    continue;
                };
                keyed.entry(key).or_insert(path);
            }
        }

        let catalogue = Self { entries };
        if catalogue.is_empty() {
            return Err(PaneletError::config(format!(
                "sprite catalogue is empty: no male/ or female/ sprites under '{}'",
                root.display()
            )));
        }

        tracing::debug!(
            male = catalogue.expressions(Persona::Male).len(),
            female = catalogue.expressions(Persona::Female).len(),
            "sprite catalogue built"
        );
        Ok(catalogue)
    }

    /// Build a catalogue from explicit entries, bypassing the filesystem.
    /// Keys are normalized the same way the scanner normalizes filenames.
    pub fn from_entries<I, K, P>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Persona, K, P)>,
        K: AsRef<str>,
        P: Into<PathBuf>,
    {
        let mut map: BTreeMap<Persona, BTreeMap<String, PathBuf>> = BTreeMap::new();
        for (persona, key, path) in entries {
            map.entry(persona)
                .or_default()
                .entry(normalize_expression(key.as_ref()))
                .or_insert_with(|| path.into());
        }
        Self { entries: map }
    }

    /// Exact lookup by normalized expression key.
    pub fn get(&self, persona: Persona, key: &str) -> Option<&Path> {
        self.entries
            .get(&persona)?
            .get(key)
            .map(PathBuf::as_path)
    }

    /// Exact lookup, then a loose retry comparing keys with all underscores
    /// stripped from both sides (`bigsmile` matches `big_smile`). Returns the
    /// matched catalogue key alongside the path.
    pub fn resolve(&self, persona: Persona, key: &str) -> Option<(&str, &Path)> {
        let keyed = self.entries.get(&persona)?;
        if let Some((k, path)) = keyed.get_key_value(key) {
            return Some((k.as_str(), path.as_path()));
        }

        let wanted = strip_underscores(key);
        keyed
            .iter()
            .find(|(k, _)| strip_underscores(k) == wanted)
            .map(|(k, path)| (k.as_str(), path.as_path()))
    }

    /// All expression keys for a category, sorted. Used for error hints.
    pub fn expressions(&self, persona: Persona) -> Vec<&str> {
        self.entries
            .get(&persona)
            .map(|keyed| keyed.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }
}

fn has_sprite_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SPRITE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn expression_key_for(persona: Persona, path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let prefix = format!("{}_", persona.dir_name());
    let stripped = match stem.get(..prefix.len()) {
        Some(head) if stem.len() > prefix.len() && head.eq_ignore_ascii_case(&prefix) => {
            &stem[prefix.len()..]
        }
        _ => stem,
    };
    let key = normalize_expression(stripped);
    if key.is_empty() { None } else { Some(key) }
}

fn strip_underscores(key: &str) -> String {
    key.chars().filter(|c| *c != '_').collect()
}

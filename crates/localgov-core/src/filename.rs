//! Attachment filename handling
//!
//! Client-supplied filenames are untrusted: they may carry directory
//! components, reserved characters, or collide with names already stored
//! for an issue. `sanitize_file_name` turns a raw name into a safe on-disk
//! base name (empty result means "reject this file"), and
//! `unique_file_name` resolves collisions with a deterministic numeric
//! suffix. Both are pure; the caller owns the `NameRegistry` and inserts
//! accepted names into it.

use std::collections::HashSet;

/// Maximum length of a stored filename, extension included.
pub const MAX_FILE_NAME_LEN: usize = 255;

/// Characters rejected in stored filenames, plus all control characters.
const RESERVED_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

fn replace_reserved(c: char) -> char {
    if c.is_control() || RESERVED_CHARS.contains(&c) {
        '_'
    } else {
        c
    }
}

/// Split a filename into (base, extension); the extension keeps its dot.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) => name.split_at(idx),
        None => (name, ""),
    }
}

/// Sanitize an untrusted client filename into a safe on-disk name.
///
/// Directory components are stripped (both separator styles), reserved
/// characters become `_`, and the base is clamped so the whole name stays
/// within [`MAX_FILE_NAME_LEN`] characters with the extension preserved in
/// full. Returns an empty string when nothing usable remains; callers must
/// treat that as a rejected file.
pub fn sanitize_file_name(raw: &str) -> String {
    let name = raw.rsplit(['/', '\\']).next().unwrap_or("").trim();

    if name.is_empty() || name.chars().all(|c| c == '.') {
        return String::new();
    }

    let (base, ext) = split_extension(name);
    let base: String = base.chars().map(replace_reserved).collect();
    let ext: String = ext.chars().map(replace_reserved).collect();

    let max_base_len = MAX_FILE_NAME_LEN.saturating_sub(ext.chars().count()).max(1);
    let base: String = base.chars().take(max_base_len).collect();

    let sanitized = format!("{}{}", base, ext);
    if sanitized.trim().is_empty() || sanitized.chars().all(|c| c == '.') {
        return String::new();
    }

    sanitized
}

/// Resolve a candidate name against the names already in use.
///
/// Returns the candidate unchanged when free; otherwise probes
/// `"base (1).ext"`, `"base (2).ext"`, … and returns the first free form.
/// Deterministic and side-effect-free: the caller inserts the returned
/// name into `used`.
pub fn unique_file_name(used: &NameRegistry, candidate: &str) -> String {
    if !used.contains(candidate) {
        return candidate.to_string();
    }

    let (base, ext) = split_extension(candidate);
    let mut attempt: u32 = 1;
    loop {
        let probe = format!("{} ({}){}", base, attempt, ext);
        if !used.contains(&probe) {
            return probe;
        }
        attempt += 1;
    }
}

/// Case-insensitive set of filenames in use for one submission.
///
/// Seeded from the destination listing before planning starts and mutated
/// only during the sequential planning phase; workers never touch it.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    names: HashSet<String>,
}

impl NameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded<I>(names: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Self {
            names: names
                .into_iter()
                .map(|n| n.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    /// Returns false if the name was already registered.
    pub fn insert(&mut self, name: &str) -> bool {
        self.names.insert(name.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#![warn(clippy::doc_markdown, clippy::use_self, clippy::use_debug)]

//! Interned identifiers. The lexer interns every identifier of a source
//! file once, so that names compare and hash by address from then on.

use std::{
    collections::HashSet,
    fmt,
    hash::{Hash, Hasher},
};

/// Names further apart than this are never suggested as a replacement for
/// an unknown name.
pub const MAX_SUGGESTION_DISTANCE: usize = 2;

/// The candidate with the smallest edit distance to `wanted`, provided it is
/// at most [`MAX_SUGGESTION_DISTANCE`]. Of equally close candidates, the
/// first one wins. `wanted` itself is never suggested.
pub fn closest_match<'f, I>(wanted: &Symbol<'f>, candidates: I) -> Option<Symbol<'f>>
where
    I: IntoIterator<Item = Symbol<'f>>,
{
    let mut best: Option<(usize, Symbol<'f>)> = None;
    for candidate in candidates {
        let distance = levenshtein::levenshtein(wanted.0, candidate.0);
        if distance == 0 || distance > MAX_SUGGESTION_DISTANCE {
            continue;
        }
        match best {
            Some((best_distance, _)) if best_distance <= distance => {}
            _ => best = Some((distance, candidate)),
        }
    }
    best.map(|(_, candidate)| candidate)
}

#[derive(Debug, Clone, Copy, Eq, PartialOrd, Ord)]
pub struct Symbol<'f>(&'f str);

impl<'f> Symbol<'f> {
    fn address(self) -> usize {
        self.0.as_ptr() as usize
    }

    pub fn as_str(&self) -> &'f str {
        self.0
    }
}

impl Hash for Symbol<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.address().hash(state);
        self.0.len().hash(state);
    }
}

impl PartialEq for Symbol<'_> {
    fn eq(&self, other: &Symbol<'_>) -> bool {
        self.address() == other.address() && self.0.len() == other.0.len()
    }
}

impl PartialEq<str> for Symbol<'_> {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for Symbol<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Borrows every interned string from the source file, nothing is copied.
#[derive(Debug, Default)]
pub struct StringTable<'f> {
    entries: HashSet<&'f str>,
}

impl<'f> StringTable<'f> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, value: &'f str) -> Symbol<'f> {
        if let Some(interned) = self.entries.get(value) {
            return Symbol(interned);
        }
        self.entries.insert(value);
        Symbol(value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

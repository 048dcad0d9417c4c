use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use std::fmt;

static ONSETS: &[&str] = &[
    "b", "br", "c", "cl", "d", "dr", "f", "g", "gl", "h", "k", "l", "m", "n", "p", "ph", "qu",
    "r", "s", "st", "t", "th", "tr", "v", "x", "z",
];

static NUCLEI: &[&str] = &["a", "e", "i", "o", "u", "ae", "io", "y"];

static CODAS: &[&str] = &["", "", "n", "r", "s", "x", "m", "l", "th"];

static ENDINGS: &[&str] = &["us", "a", "um", "is", "ax", "ix", "on", "ea"];

/// Display color of a species, as 8-bit RGB channels.
///
/// Colors are chosen once when a species is born and
/// passed on unchanged to every successor species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Returns a random color, avoiding channels
    /// too dark to stand out on a dark background.
    pub(super) fn random<R: Rng + ?Sized>(rng: &mut R) -> Color {
        Color(
            rng.gen_range(48..=255),
            rng.gen_range(48..=255),
            rng.gen_range(48..=255),
        )
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Returns a pronounceable, capitalized pseudo-latin name
/// of two or three syllables.
pub(super) fn species_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let syllables = rng.gen_range(1..=2);
    let mut name = String::new();
    for _ in 0..syllables {
        name.push_str(pick(ONSETS, rng));
        name.push_str(pick(NUCLEI, rng));
        name.push_str(pick(CODAS, rng));
    }
    name.push_str(pick(ONSETS, rng));
    name.push_str(pick(ENDINGS, rng));

    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

fn pick<R: Rng + ?Sized>(parts: &'static [&'static str], rng: &mut R) -> &'static str {
    parts.choose(rng).copied().unwrap_or_default()
}

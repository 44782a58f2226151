use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::audio::catalog::Track;

/// Background music choice made by the caller.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MusicChoice {
    /// Voice only.
    NoMusic,
    /// Uniformly random catalog track.
    Random,
    /// Catalog track whose name matches exactly.
    Named(String),
}

impl FromStr for MusicChoice {
    type Err = std::convert::Infallible;

    /// `"no music"`, `"none"` and `""` map to [`MusicChoice::NoMusic`], `"random"` to
    /// [`MusicChoice::Random`] (ASCII case-insensitive, trimmed); anything else is a track name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("no music")
            || trimmed.eq_ignore_ascii_case("none")
        {
            return Ok(Self::NoMusic);
        }
        if trimmed.eq_ignore_ascii_case("random") {
            return Ok(Self::Random);
        }
        Ok(Self::Named(s.to_string()))
    }
}

impl fmt::Display for MusicChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoMusic => f.write_str("no music"),
            Self::Random => f.write_str("random"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// Resolve `choice` against `catalog`.
///
/// Never fails: an empty catalog or an unknown name resolves to no music.
pub fn select<R: Rng + ?Sized>(
    choice: &MusicChoice,
    catalog: &[Track],
    rng: &mut R,
) -> Option<Track> {
    if catalog.is_empty() {
        return None;
    }
    match choice {
        MusicChoice::NoMusic => None,
        MusicChoice::Random => catalog.choose(rng).cloned(),
        MusicChoice::Named(name) => {
            let found = catalog.iter().find(|t| t.name == *name).cloned();
            if found.is_none() {
                tracing::debug!(track = %name, "requested track not in catalog, using no music");
            }
            found
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/select.rs"]
mod tests;

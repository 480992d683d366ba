use regex::{Captures, Regex};

use crate::analysis::features::compile;

/// Candidate patterns tried in priority order; the first that matches wins.
pub(crate) struct PatternList {
    patterns: Vec<Regex>,
}

impl PatternList {
    pub(crate) fn new<I, S>(sources: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            patterns: sources
                .into_iter()
                .map(|source| compile(source.as_ref()))
                .collect(),
        }
    }

    /// Captures of the first pattern that matches anywhere in `text`.
    pub(crate) fn first_match<'t>(&self, text: &'t str) -> Option<Captures<'t>> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.captures(text))
    }

    /// Like [`first_match`](Self::first_match), but a pattern whose captures the
    /// handler rejects falls through to the next candidate.
    pub(crate) fn first_with<'t, T>(
        &self,
        text: &'t str,
        mut handler: impl FnMut(&Captures<'t>) -> Option<T>,
    ) -> Option<T> {
        self.patterns
            .iter()
            .filter_map(|pattern| pattern.captures(text))
            .find_map(|caps| handler(&caps))
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.patterns.len()
    }
}

/// First non-empty capture group, for patterns written as `a(\d+)|b(\d+)`.
pub(crate) fn first_group<'t>(caps: &Captures<'t>) -> Option<regex::Match<'t>> {
    caps.iter().skip(1).flatten().next()
}

/// Magnitude words that may trail a figure, e.g. "5 lakh".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UnitMultiplier {
    Lakh,
    Crore,
    Million,
    Thousand,
}

impl UnitMultiplier {
    const WINDOW_CHARS: usize = 10;

    pub(crate) const fn factor(self) -> f64 {
        match self {
            UnitMultiplier::Lakh => 100_000.0,
            UnitMultiplier::Crore => 10_000_000.0,
            UnitMultiplier::Million => 1_000_000.0,
            UnitMultiplier::Thousand => 1_000.0,
        }
    }

    /// Looks for a unit word within the ten characters after byte offset `end`.
    pub(crate) fn following(text: &str, end: usize) -> Option<Self> {
        let window: String = text
            .get(end..)
            .unwrap_or_default()
            .chars()
            .take(Self::WINDOW_CHARS)
            .collect();

        [
            ("lakh", UnitMultiplier::Lakh),
            ("lac", UnitMultiplier::Lakh),
            ("crore", UnitMultiplier::Crore),
            ("million", UnitMultiplier::Million),
            ("thousand", UnitMultiplier::Thousand),
        ]
        .into_iter()
        .filter_map(|(word, unit)| window.find(word).map(|position| (position, unit)))
        .min_by_key(|(position, _)| *position)
        .map(|(_, unit)| unit)
    }
}

/// A figure lifted from text, with any trailing magnitude word applied.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ScaledAmount {
    digits: String,
    scaled: Option<f64>,
}

impl ScaledAmount {
    /// Reads the figure in `group` and applies a unit word found after it.
    pub(crate) fn from_match(text: &str, group: regex::Match<'_>) -> Option<Self> {
        let digits = strip_separators(group.as_str());
        let value: f64 = digits.parse().ok()?;
        let scaled =
            UnitMultiplier::following(text, group.end()).map(|unit| value * unit.factor());
        Some(Self { digits, scaled })
    }

    /// Comma-stripped digits when unscaled, shortest float form when scaled.
    pub(crate) fn display(&self) -> String {
        match self.scaled {
            Some(value) => format!("{value:?}"),
            None => self.digits.clone(),
        }
    }

    /// Whole currency units.
    pub(crate) fn whole_units(&self) -> Option<u64> {
        match self.scaled {
            Some(value) if value.is_finite() && value >= 0.0 => Some(value.trunc() as u64),
            Some(_) => None,
            None => self
                .digits
                .split('.')
                .next()
                .and_then(|whole| whole.parse().ok()),
        }
    }
}

pub(crate) fn strip_separators(value: &str) -> String {
    value.replace(',', "")
}

//! Canonical action names
//!
//! Graph renderers, planners and landmark extractors each decorate action
//! names differently (quotes, wrapping parentheses, cost annotations, casing).
//! [`ActionLabel::normalize`] is the single place where that is undone.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Borrow;
use std::fmt::{self, Display, Formatter};

static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^()]*\)").expect("annotation pattern is valid"));

/// Normalized action name
///
/// Invariant: non-empty, lowercase, single-spaced, free of quotes and
/// parenthetical annotations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionLabel(String);

impl ActionLabel {
    /// Normalize a raw action name
    ///
    /// `"\"(Pick Ball1  roomA left)\""` and `"pick ball1 rooma left (1)"` both
    /// become `pick ball1 rooma left`.
    ///
    /// # Errors
    /// Returns [`LabelError::Empty`] if nothing is left after normalization
    pub fn normalize(raw: &str) -> Result<Self, LabelError> {
        let mut text = raw.trim().trim_matches('"').trim().to_string();

        if let Some(close) = leading_group_end(&text) {
            let rest = ANNOTATION.replace_all(&text[close + 1..], "");
            if rest.trim().is_empty() {
                text = text[1..close].to_string();
            }
        }

        loop {
            let stripped = ANNOTATION.replace_all(&text, " ").into_owned();
            if stripped == text {
                break;
            }
            text = stripped;
        }

        let cleaned = text
            .replace('"', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        if cleaned.is_empty() {
            return Err(LabelError::Empty(raw.to_string()));
        }
        Ok(Self(cleaned))
    }

    /// Borrow the canonical text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Byte index of the parenthesis closing the one at index 0, if any
fn leading_group_end(text: &str) -> Option<usize> {
    if !text.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

impl Display for ActionLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ActionLabel {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ActionLabel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ActionLabel {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::normalize(&value)
    }
}

impl TryFrom<&str> for ActionLabel {
    type Error = LabelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::normalize(value)
    }
}

impl From<ActionLabel> for String {
    fn from(label: ActionLabel) -> Self {
        label.0
    }
}

/// Label normalization errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelError {
    /// Nothing remained after stripping decorations
    #[error("action label is empty after normalization: {0:?}")]
    Empty(String),
}

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// One candidate replacement for a checked word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordGuess {
    pub text: SmolStr,
    /// Proposed by the spell checker rather than a shortcut.
    pub is_spelling_correction: bool,
    /// Produced by an auto-replace shortcut.
    pub is_auto_replace: bool,
    /// The keyboard may apply this guess without asking.
    pub is_auto_accept: bool,
}

impl WordGuess {
    /// The word as typed, offered alongside a case-only replacement.
    pub fn verbatim(text: impl Into<SmolStr>) -> WordGuess {
        WordGuess {
            text: text.into(),
            is_spelling_correction: false,
            is_auto_replace: false,
            is_auto_accept: false,
        }
    }

    pub fn auto_replace(text: impl Into<SmolStr>) -> WordGuess {
        WordGuess {
            text: text.into(),
            is_spelling_correction: false,
            is_auto_replace: true,
            is_auto_accept: true,
        }
    }

    pub fn correction(text: impl Into<SmolStr>, is_auto_accept: bool) -> WordGuess {
        WordGuess {
            text: text.into(),
            is_spelling_correction: true,
            is_auto_replace: false,
            is_auto_accept,
        }
    }
}

/// Outcome of checking one word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellCheckResult {
    pub in_dictionary: bool,
    pub guesses: Vec<WordGuess>,
}

impl SpellCheckResult {
    pub fn known() -> SpellCheckResult {
        SpellCheckResult {
            in_dictionary: true,
            guesses: vec![],
        }
    }

    pub fn guess_texts(&self) -> Vec<&str> {
        self.guesses.iter().map(|g| g.text.as_str()).collect()
    }
}

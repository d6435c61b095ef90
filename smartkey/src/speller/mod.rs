//! The spelling oracle consulted after every local dictionary.
use std::sync::Arc;

use self::index::{EditDistanceIndex, WordIndex};
use self::suggestion::Suggestion;

pub mod index;
pub mod suggestion;
mod wordlist;

pub use self::wordlist::WordListSpeller;

/// A dictionary-backed spell checker with ranked suggestions.
pub trait Speller: Send + Sync {
    fn is_correct(self: Arc<Self>, word: &str) -> bool;

    /// At most `max` corrections for `word`, best first.
    fn suggest(self: Arc<Self>, word: &str, max: usize) -> Vec<Suggestion>;

    /// Switches to the dictionary for a `lang_country` locale. Returns false
    /// if no dictionary could be loaded; the speller keeps working with
    /// whatever it had before.
    fn reload(&self, locale: &str) -> bool;

    /// A fresh fuzzy index for about `capacity` words, used to suggest
    /// contact names.
    fn word_index(&self, capacity: usize) -> Option<Box<dyn WordIndex>> {
        Some(Box::new(EditDistanceIndex::with_capacity(capacity)))
    }
}

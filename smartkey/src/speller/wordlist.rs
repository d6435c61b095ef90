use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::RwLock;

use super::suggestion::Suggestion;
use super::Speller;
use crate::store::{LineFormat, Persistable, WordLookup, WordSetStore};
use crate::tokenizer::case_handling::{lower_case, match_case, word_variants};

const WORDS_FILE: &str = "words";
const MAX_DISTANCE: usize = 2;

/// A speller over a plain word list per locale, ranking suggestions by edit
/// distance.
///
/// Lists live at `<root>/<lang_country>/words`, one word per line, with `#`
/// comment lines.
pub struct WordListSpeller {
    root: Option<PathBuf>,
    words: RwLock<WordSetStore>,
}

impl WordListSpeller {
    pub fn open(root: impl Into<PathBuf>) -> WordListSpeller {
        WordListSpeller {
            root: Some(root.into()),
            words: RwLock::new(WordSetStore::with_format(LineFormat::Commented)),
        }
    }

    /// A fixed in-memory list; [`Speller::reload`] leaves it untouched.
    pub fn from_words<I, S>(words: I) -> WordListSpeller
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        WordListSpeller {
            root: None,
            words: RwLock::new(words.into_iter().collect()),
        }
    }
}

impl Speller for WordListSpeller {
    fn is_correct(self: Arc<Self>, word: &str) -> bool {
        let words = self.words.read();
        word_variants(word).iter().any(|w| words.contains(w))
    }

    fn suggest(self: Arc<Self>, word: &str, max: usize) -> Vec<Suggestion> {
        let query = lower_case(word);
        let words = self.words.read();

        let mut suggestions: Vec<Suggestion> = words
            .iter()
            .filter_map(|candidate| {
                let distance = strsim::damerau_levenshtein(&query, &lower_case(candidate));
                if distance == 0 || distance > MAX_DISTANCE {
                    return None;
                }
                Some(Suggestion::new(match_case(word, candidate), distance as f32))
            })
            .collect();
        suggestions.sort();
        suggestions.dedup_by(|a, b| a.value == b.value);
        suggestions.truncate(max);
        suggestions
    }

    fn reload(&self, locale: &str) -> bool {
        let root = match self.root.as_ref() {
            Some(root) => root,
            None => return true,
        };

        let path = root.join(locale).join(WORDS_FILE);
        let mut store = WordSetStore::with_format(LineFormat::Commented);
        match store.load(&path) {
            Ok(()) if store.is_initialized() => {
                log::debug!("word list for {}: {} words", locale, store.len());
                *self.words.write() = store;
                true
            }
            Ok(()) => {
                log::warn!("no word list for {} at {}", locale, path.display());
                false
            }
            Err(e) => {
                log::warn!("{}", e);
                false
            }
        }
    }
}

impl std::fmt::Debug for WordListSpeller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordListSpeller")
            .field("root", &self.root)
            .field("words", &self.words.read().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smol_str::SmolStr;

    #[test]
    fn checks_case_variants() {
        let speller = Arc::new(WordListSpeller::from_words(["hello", "Oulu"]));
        assert!(speller.clone().is_correct("hello"));
        assert!(speller.clone().is_correct("Hello"));
        assert!(speller.clone().is_correct("HELLO"));
        assert!(speller.clone().is_correct("Oulu"));
        assert!(!speller.clone().is_correct("oulu"));
        assert!(!speller.is_correct("helo"));
    }

    #[test]
    fn suggests_nearest_first() {
        let speller = Arc::new(WordListSpeller::from_words(["bull", "full", "null", "oulu", "dull"]));
        let values: Vec<SmolStr> = speller
            .clone()
            .suggest("oull", 3)
            .into_iter()
            .map(|s| s.value)
            .collect();
        assert_eq!(values, vec!["bull", "dull", "full"]);

        let values: Vec<SmolStr> = speller.suggest("Oull", 10).into_iter().map(|s| s.value).collect();
        assert_eq!(values, vec!["Bull", "Dull", "Full", "Null", "Oulu"]);
    }

    #[test]
    fn reloads_per_locale() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("en_us")).unwrap();
        std::fs::write(dir.path().join("en_us").join("words"), "# en\ncolor\n").unwrap();

        let speller = Arc::new(WordListSpeller::open(dir.path()));
        assert!(speller.reload("en_us"));
        assert!(speller.clone().is_correct("color"));
        assert!(!speller.reload("en_gb"));
        assert!(speller.is_correct("color"));
    }
}

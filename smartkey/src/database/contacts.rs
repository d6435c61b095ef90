use std::sync::Arc;

use hashbrown::{HashMap, HashSet};
use serde::Serialize;
use smol_str::SmolStr;

use crate::error::SmartKeyError;
use crate::paths::{find_resource, MANUFACTURER_DIR, MANUFACTURER_FILE};
use crate::settings::{LocaleSettings, Settings};
use crate::speller::index::WordIndex;
use crate::speller::Speller;
use crate::store::{load_or_empty, LineFormat, Persistable, WordSetStore};
use crate::tokenizer::case_handling::lower_case;

const DEFAULT_EXPECTED_COUNT: usize = 500;
const MIN_CAPACITY: usize = 1000;
/// The fuzzy index is dropped once it holds this many times its capacity.
const OVERFILL_FACTOR: usize = 5;

/// Reference-counted contact names plus shipped brand names, with fuzzy
/// lookup.
///
/// A word learned `n` times stays known until it has been forgotten `n`
/// times. Shipped words (universal and per-locale stock) are always known and
/// cannot be forgotten. Fuzzy queries go through a [`WordIndex`] obtained from
/// the speller, built on first use and rebuilt when it outgrows its capacity.
pub struct ContactIndex {
    speller: Arc<dyn Speller>,
    words: HashMap<SmolStr, u32>,
    universal_words: HashSet<SmolStr>,
    stock_words: HashSet<SmolStr>,
    expected_count: usize,
    index: Option<Box<dyn WordIndex>>,
    last_query: Option<(SmolStr, Vec<SmolStr>)>,
    learned: usize,
}

/// Summary of the indexed words, for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContactStats {
    pub words: usize,
    pub total_references: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub average_length: f32,
    pub min_references: u32,
    pub max_references: u32,
    pub average_references: f32,
}

impl ContactIndex {
    /// An index holding the shipped words that apply to every locale.
    pub fn new(settings: &Settings, speller: Arc<dyn Speller>) -> ContactIndex {
        let mut contacts = ContactIndex {
            speller,
            words: HashMap::new(),
            universal_words: HashSet::new(),
            stock_words: HashSet::new(),
            expected_count: DEFAULT_EXPECTED_COUNT,
            index: None,
            last_query: None,
            learned: 0,
        };

        let mut universal = WordSetStore::with_format(LineFormat::Commented);
        load_or_empty(
            &mut universal,
            &settings.read_only(MANUFACTURER_DIR).join(MANUFACTURER_FILE),
        );
        contacts.universal_words = universal.iter().cloned().collect();

        contacts
    }

    /// The shipped words for one locale.
    pub fn read_stock_words(settings: &Settings, locale: &LocaleSettings) -> Vec<SmolStr> {
        let mut store = WordSetStore::with_format(LineFormat::Commented);
        if let Some(path) = find_resource(settings.read_only(MANUFACTURER_DIR), "/man-db-entries", locale) {
            load_or_empty(&mut store, &path);
        }
        store.export_all()
    }

    /// Replaces the previous locale's shipped words with `words`.
    pub fn replace_stock_words(&mut self, words: Vec<SmolStr>) {
        let previous = std::mem::replace(&mut self.stock_words, words.into_iter().collect());
        self.last_query = None;

        if let Some(mut index) = self.index.take() {
            for word in previous.iter().filter(|word| !self.contains(word)) {
                index.remove(word);
            }
            for word in self.stock_words.iter() {
                index.insert(word);
            }
            self.index = Some(index);
        }
        self.drop_overfilled_index();

        log::debug!(
            "contact index: {} stock words, {} words in total",
            self.stock_words.len(),
            self.len()
        );
    }

    fn is_shipped(&self, word: &str) -> bool {
        self.universal_words.contains(word) || self.stock_words.contains(word)
    }

    /// Every known word once: learned words, then shipped words not learned.
    fn all_words(&self) -> impl Iterator<Item = &SmolStr> {
        let shipped = self
            .universal_words
            .iter()
            .chain(self.stock_words.difference(&self.universal_words))
            .filter(move |word| !self.words.contains_key(*word));
        self.words.keys().chain(shipped)
    }

    /// Learns a word given as raw text, which must be valid UTF-8.
    pub fn learn_word<W: AsRef<[u8]>>(&mut self, word: W) -> Result<(), SmartKeyError> {
        let word = std::str::from_utf8(word.as_ref()).map_err(|e| {
            log::warn!("refusing to learn contact word: {}", e);
            SmartKeyError::Failure
        })?;
        if word.is_empty() {
            return Err(SmartKeyError::BadParam);
        }

        self.learn(word);
        Ok(())
    }

    /// Forgets one learning of `word`. Shipped words are unaffected.
    pub fn forget_word(&mut self, word: &str) -> Result<(), SmartKeyError> {
        if self.forget(word) {
            Ok(())
        } else {
            Err(SmartKeyError::NoMatchingWords)
        }
    }

    fn learn(&mut self, word: &str) {
        let count = self.words.entry(SmolStr::new(word)).or_insert(0);
        *count += 1;

        if *count == 1 && !self.is_shipped(word) {
            self.last_query = None;
            if let Some(index) = self.index.as_mut() {
                index.insert(word);
            }
            self.drop_overfilled_index();
        }

        self.learned += 1;
        if self.learned % 1000 == 0 {
            log::debug!("learned {} contact words", self.learned);
        }
    }

    fn drop_overfilled_index(&mut self) {
        if let Some(capacity) = self.index.as_ref().map(|index| index.capacity()) {
            let len = self.words.len() + self.universal_words.len() + self.stock_words.len();
            if len > capacity * OVERFILL_FACTOR {
                log::debug!(
                    "contact index outgrew capacity {} with {} words; dropping it",
                    capacity,
                    len
                );
                self.index = None;
            }
        }
    }

    fn forget(&mut self, word: &str) -> bool {
        let count = match self.words.get_mut(word) {
            Some(count) => count,
            None => return false,
        };

        *count -= 1;
        if *count == 0 {
            self.words.remove(word);
            if !self.is_shipped(word) {
                self.last_query = None;
                if let Some(index) = self.index.as_mut() {
                    index.remove(word);
                }
            }
        }
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains_key(word) || self.is_shipped(word)
    }

    /// How many times `word` has been learned and not yet forgotten.
    pub fn references(&self, word: &str) -> u32 {
        self.words.get(word).copied().unwrap_or(0)
    }

    /// Number of distinct known words, learned or shipped.
    pub fn len(&self) -> usize {
        self.all_words().count()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty() && self.universal_words.is_empty() && self.stock_words.is_empty()
    }

    pub fn find_by_prefix(&self, prefix: &str) -> Option<SmolStr> {
        self.all_words()
            .filter(|word| word.starts_with(prefix))
            .min()
            .cloned()
    }

    /// Raises the number of words the index should expect and resizes the
    /// fuzzy index to match.
    pub fn set_expected_count(&mut self, count: usize) {
        self.expected_count = std::cmp::max(self.expected_count, count);
        let capacity = self.capacity();
        if self.index.as_ref().map(|index| index.capacity()) != Some(capacity) {
            self.rebuild_index(capacity);
        }
    }

    pub fn capacity(&self) -> usize {
        [
            self.expected_count * 17 / 10 + 100,
            MIN_CAPACITY,
            self.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(MIN_CAPACITY)
    }

    fn rebuild_index(&mut self, capacity: usize) {
        self.last_query = None;
        let index = self.speller.word_index(capacity).map(|mut index| {
            for word in self.all_words() {
                index.insert(word);
            }
            index
        });
        self.index = index;
        log::debug!(
            "rebuilt contact index: {} words, capacity {}",
            self.len(),
            capacity
        );
    }

    /// Fuzzy matches for `text`. Repeating the previous query is answered
    /// from cache as long as no word was added or removed in between.
    pub fn query(&mut self, text: &str) -> Vec<SmolStr> {
        if let Some((query, result)) = self.last_query.as_ref() {
            if query == text {
                return result.clone();
            }
        }

        if self.index.is_none() {
            self.rebuild_index(self.capacity());
        }

        let result = match self.index.as_ref() {
            Some(index) => index.suggest(text),
            None => vec![],
        };
        self.last_query = Some((SmolStr::new(text), result.clone()));
        result
    }

    /// The indexed word equal to the last query apart from case.
    pub fn exact_match(&self) -> Option<SmolStr> {
        let (query, result) = self.last_query.as_ref()?;
        let query = lower_case(query);
        result.iter().find(|word| lower_case(word) == query).cloned()
    }

    /// Statistics over learned words; shipped words carry no references.
    pub fn statistics(&self) -> ContactStats {
        if self.words.is_empty() {
            return ContactStats::default();
        }

        let lengths = || self.words.keys().map(|word| word.chars().count());
        let references = || self.words.values().copied();
        let count = self.words.len();
        let total_references: usize = references().map(|n| n as usize).sum();

        ContactStats {
            words: count,
            total_references,
            min_length: lengths().min().unwrap_or(0),
            max_length: lengths().max().unwrap_or(0),
            average_length: lengths().sum::<usize>() as f32 / count as f32,
            min_references: references().min().unwrap_or(0),
            max_references: references().max().unwrap_or(0),
            average_references: total_references as f32 / count as f32,
        }
    }

    pub fn log_statistics(&self) {
        let stats = self.statistics();
        log::debug!(
            "contact index: {} words, {} references, length {}..{} (avg {:.1}), references {}..{} (avg {:.1})",
            stats.words,
            stats.total_references,
            stats.min_length,
            stats.max_length,
            stats.average_length,
            stats.min_references,
            stats.max_references,
            stats.average_references
        );
    }
}

impl std::fmt::Debug for ContactIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContactIndex")
            .field("words", &self.words.len())
            .field("universal_words", &self.universal_words.len())
            .field("stock_words", &self.stock_words.len())
            .field("expected_count", &self.expected_count)
            .field("indexed", &self.index.is_some())
            .finish()
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use smol_str::SmolStr;

use super::{paginate, validate_word};
use crate::error::{SmartKeyError, StoreError};
use crate::paths::{USER_USAGE_FILE, USER_WORDS_FILE};
use crate::settings::Settings;
use crate::store::{load_or_empty, PairStore, Persistable, ShortcutLookup, WordLookup, WordSetStore};
use crate::tokenizer::compare_folded;

/// Words the user taught the keyboard, plus transient context words such as
/// names from the current conversation. Only learned words are saved, and
/// only they carry usage counts.
#[derive(Debug)]
pub struct UserDatabase {
    settings: Arc<Settings>,
    learned: WordSetStore,
    usage: PairStore,
    context: WordSetStore,
}

impl UserDatabase {
    pub fn new(settings: Arc<Settings>) -> UserDatabase {
        let mut learned = WordSetStore::new();
        load_or_empty(&mut learned, &settings.read_write(USER_WORDS_FILE));
        let mut usage = PairStore::new();
        load_or_empty(&mut usage, &settings.read_write(USER_USAGE_FILE));

        UserDatabase {
            settings,
            learned,
            usage,
            context: WordSetStore::new(),
        }
    }

    fn words_path(&self) -> PathBuf {
        self.settings.read_write(USER_WORDS_FILE)
    }

    fn usage_path(&self) -> PathBuf {
        self.settings.read_write(USER_USAGE_FILE)
    }

    pub fn learn_word(&mut self, word: &str) -> Result<(), SmartKeyError> {
        validate_word(word)?;
        if self.learned.add(word) {
            Ok(())
        } else {
            Err(SmartKeyError::WordExists)
        }
    }

    pub fn forget_word(&mut self, word: &str) -> Result<(), SmartKeyError> {
        if word.is_empty() {
            return Err(SmartKeyError::BadParam);
        }
        if !self.learned.remove(word) {
            return Err(SmartKeyError::NoMatchingWords);
        }
        self.usage.remove(word);
        Ok(())
    }

    pub fn learn_context_word(&mut self, word: &str) -> Result<(), SmartKeyError> {
        validate_word(word)?;
        self.context.add(word);
        Ok(())
    }

    pub fn forget_context_word(&mut self, word: &str) -> Result<(), SmartKeyError> {
        if word.is_empty() {
            return Err(SmartKeyError::BadParam);
        }
        if self.context.remove(word) {
            Ok(())
        } else {
            Err(SmartKeyError::NoMatchingWords)
        }
    }

    /// Counts one more use of a learned word.
    pub fn update_word_usage(&mut self, word: &str) -> Result<u32, SmartKeyError> {
        if word.is_empty() {
            return Err(SmartKeyError::BadParam);
        }
        if !self.learned.contains(word) {
            return Err(SmartKeyError::NoMatchingWords);
        }

        let count = self.usage(word) + 1;
        self.usage.add(word, &count.to_string())?;
        Ok(count)
    }

    pub fn usage(&self, word: &str) -> u32 {
        self.usage
            .find(word)
            .and_then(|count| count.parse().ok())
            .unwrap_or(0)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.learned.contains(word) || self.context.contains(word)
    }

    pub fn find_by_prefix(&self, prefix: &str) -> Option<SmolStr> {
        let a = self.learned.find_by_prefix(prefix);
        let b = self.context.find_by_prefix(prefix);
        a.into_iter().chain(b).min()
    }

    /// Learned words in display order.
    pub fn entries(&self, offset: usize, limit: usize) -> Vec<SmolStr> {
        let mut words = self.learned.export_all();
        words.sort_by(|a, b| compare_folded(a, b));
        paginate(words, offset, limit)
    }

    pub fn num_entries(&self) -> usize {
        self.learned.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.learned.is_dirty() || self.usage.is_dirty()
    }

    /// Saves learned words and usage counts. Both are attempted; the first
    /// error is returned.
    pub fn save(&mut self) -> Result<(), StoreError> {
        let words_path = self.words_path();
        let usage_path = self.usage_path();
        let words = self.learned.save(&words_path);
        let usage = self.usage.save(&usage_path);
        words.and(usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database(dir: &std::path::Path) -> UserDatabase {
        UserDatabase::new(Arc::new(Settings::with_dirs(dir.join("ro"), dir.join("rw"))))
    }

    #[test]
    fn learn_and_forget() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = database(dir.path());

        assert_eq!(db.learn_word("oulu"), Ok(()));
        assert_eq!(db.learn_word("oulu"), Err(SmartKeyError::WordExists));
        assert_eq!(db.learn_word(""), Err(SmartKeyError::BadParam));
        assert_eq!(db.learn_word("!!"), Err(SmartKeyError::BadWord));
        assert_eq!(db.learn_word("and|or"), Err(SmartKeyError::BadWord));
        assert!(!db.contains("and|or"));
        assert!(db.contains("oulu"));

        assert_eq!(db.forget_word("oulu"), Ok(()));
        assert_eq!(db.forget_word("oulu"), Err(SmartKeyError::NoMatchingWords));
        assert!(!db.contains("oulu"));
    }

    #[test]
    fn context_words_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = database(dir.path());
        db.learn_context_word("Aino").unwrap();
        db.learn_word("kalsarikänni").unwrap();
        assert!(db.contains("Aino"));
        assert_eq!(db.update_word_usage("Aino"), Err(SmartKeyError::NoMatchingWords));
        db.save().unwrap();

        let db = database(dir.path());
        assert!(!db.contains("Aino"));
        assert!(db.contains("kalsarikänni"));
    }

    #[test]
    fn usage_is_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = database(dir.path());
        db.learn_word("sisu").unwrap();
        assert_eq!(db.update_word_usage("sisu"), Ok(1));
        assert_eq!(db.update_word_usage("sisu"), Ok(2));
        db.save().unwrap();
        assert!(!db.is_dirty());

        let mut db = database(dir.path());
        assert_eq!(db.usage("sisu"), 2);
        db.forget_word("sisu").unwrap();
        assert_eq!(db.usage("sisu"), 0);
    }

    #[test]
    fn entries_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = database(dir.path());
        for word in ["zeta", "Äiti", "beta", "alpha"] {
            db.learn_word(word).unwrap();
        }

        assert_eq!(db.entries(0, 2), vec!["Äiti", "alpha"]);
        assert_eq!(db.entries(2, 2), vec!["beta", "zeta"]);
        assert_eq!(db.num_entries(), 4);
    }

    #[test]
    fn prefix_across_collections() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = database(dir.path());
        db.learn_word("sauna").unwrap();
        db.learn_context_word("Satu").unwrap();
        assert_eq!(db.find_by_prefix("Sa"), Some("Satu".into()));
        assert_eq!(db.find_by_prefix("sa"), Some("sauna".into()));
    }
}

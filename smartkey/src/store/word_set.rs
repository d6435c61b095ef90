use std::path::Path;

use hashbrown::HashSet;
use smol_str::SmolStr;

use super::{file, Persistable, WordLookup};
use crate::error::StoreError;

/// How words are laid out on disk, one per line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    Plain,
    /// Lines starting with `#` are skipped.
    Commented,
    /// Every byte of a word is stored one higher than its value.
    Scrambled,
}

impl Default for LineFormat {
    fn default() -> Self {
        LineFormat::Plain
    }
}

impl LineFormat {
    fn decode(self, line: &[u8]) -> Option<SmolStr> {
        match self {
            LineFormat::Plain => Some(SmolStr::new(String::from_utf8_lossy(line))),
            LineFormat::Commented if line.starts_with(b"#") => None,
            LineFormat::Commented => Some(SmolStr::new(String::from_utf8_lossy(line))),
            LineFormat::Scrambled => {
                let bytes: Vec<u8> = line.iter().map(|b| b.wrapping_sub(1)).collect();
                Some(SmolStr::new(String::from_utf8_lossy(&bytes)))
            }
        }
    }

    fn encode(self, word: &str) -> Vec<u8> {
        match self {
            LineFormat::Scrambled => word.bytes().map(|b| b.wrapping_add(1)).collect(),
            _ => word.as_bytes().to_vec(),
        }
    }
}

/// A set of words, one per line on disk.
#[derive(Debug, Default, Clone)]
pub struct WordSetStore {
    words: HashSet<SmolStr>,
    format: LineFormat,
    initialized: bool,
    dirty: bool,
}

impl WordSetStore {
    pub fn new() -> WordSetStore {
        WordSetStore::default()
    }

    pub fn with_format(format: LineFormat) -> WordSetStore {
        WordSetStore {
            format,
            ..WordSetStore::default()
        }
    }

    /// Returns whether the word was newly added.
    pub fn add(&mut self, word: &str) -> bool {
        let added = self.words.insert(SmolStr::new(word));
        self.dirty |= added;
        added
    }

    /// Returns whether the word was present.
    pub fn remove(&mut self, word: &str) -> bool {
        let removed = self.words.remove(word);
        self.dirty |= removed;
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &SmolStr> {
        self.words.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for WordSetStore {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        WordSetStore {
            words: iter.into_iter().map(|w| SmolStr::new(w.as_ref())).collect(),
            ..WordSetStore::default()
        }
    }
}

impl Persistable for WordSetStore {
    type Item = SmolStr;

    fn load(&mut self, path: &Path) -> Result<(), StoreError> {
        self.words.clear();
        self.initialized = false;
        self.dirty = false;

        let bytes = match file::read(path)? {
            Some(bytes) => bytes,
            None => return Ok(()),
        };

        let format = self.format;
        self.words
            .extend(file::lines(&bytes).filter_map(|line| format.decode(line)));
        self.initialized = true;
        log::debug!("loaded {} words from {}", self.words.len(), path.display());
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }

        let mut words: Vec<&SmolStr> = self.words.iter().collect();
        words.sort();
        let format = self.format;
        file::write_lines(path, words.into_iter().map(|w| format.encode(w)))?;

        self.dirty = false;
        log::debug!("saved {} words to {}", self.words.len(), path.display());
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.initialized
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn len(&self) -> usize {
        self.words.len()
    }

    fn export_all(&self) -> Vec<SmolStr> {
        self.words.iter().cloned().collect()
    }
}

impl WordLookup for WordSetStore {
    fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    fn find_by_prefix(&self, prefix: &str) -> Option<SmolStr> {
        self.words
            .iter()
            .filter(|w| w.starts_with(prefix))
            .min()
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_remove_marks_dirty() {
        let mut store = WordSetStore::new();
        assert!(!store.is_dirty());
        assert!(store.add("oulu"));
        assert!(!store.add("oulu"));
        assert!(store.is_dirty());
        assert_eq!(store.len(), 1);
        assert!(store.contains("oulu"));
        assert!(!store.contains("Oulu"));
        assert!(store.remove("oulu"));
        assert!(!store.remove("oulu"));
        assert!(store.is_empty());
    }

    #[test]
    fn prefix_picks_smallest() {
        let store: WordSetStore = ["helsinki", "hello", "help", "world"].iter().collect();
        assert_eq!(store.find_by_prefix("hel"), Some("hello".into()));
        assert_eq!(store.find_by_prefix("wo"), Some("world".into()));
        assert_eq!(store.find_by_prefix("x"), None);
    }

    #[test]
    fn save_only_when_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user-words");

        let mut store = WordSetStore::new();
        store.save(&path).unwrap();
        assert!(!path.exists());

        store.add("beta");
        store.add("alpha");
        store.save(&path).unwrap();
        assert!(!store.is_dirty());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "alpha\nbeta\n");

        store.remove("alpha");
        store.remove("beta");
        store.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");

        let mut reloaded = WordSetStore::new();
        reloaded.load(&path).unwrap();
        assert!(reloaded.is_initialized());
        assert!(reloaded.is_empty());
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = WordSetStore::new();
        store.add("stale");
        store.load(&dir.path().join("missing")).unwrap();
        assert!(store.is_empty());
        assert!(!store.is_initialized());
        assert!(!store.is_dirty());
    }

    #[test]
    fn formats() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("list");
        std::fs::write(&path, "# comment\nfoo\r\n\nbar\n").unwrap();

        let mut plain = WordSetStore::new();
        plain.load(&path).unwrap();
        assert!(plain.contains("# comment"));

        let mut commented = WordSetStore::with_format(LineFormat::Commented);
        commented.load(&path).unwrap();
        assert_eq!(commented.len(), 2);
        assert!(commented.contains("foo") && commented.contains("bar"));

        std::fs::write(&path, "tnbsuqipof\n").unwrap();
        let mut scrambled = WordSetStore::with_format(LineFormat::Scrambled);
        scrambled.load(&path).unwrap();
        assert!(scrambled.contains("smartphone"));
    }
}

//! Fuzzy lookup over a small, changing set of words.
use hashbrown::HashSet;
use smol_str::SmolStr;

use crate::tokenizer::case_handling::lower_case;

const MAX_RESULTS: usize = 10;

/// A fuzzy word index sized for an expected number of words.
pub trait WordIndex: Send {
    /// Number of words the index was sized for.
    fn capacity(&self) -> usize;

    fn insert(&mut self, word: &str);

    fn remove(&mut self, word: &str);

    /// Indexed words close to `query`, best first.
    fn suggest(&self, query: &str) -> Vec<SmolStr>;
}

/// Ranks words by Damerau-Levenshtein distance, ignoring case.
#[derive(Debug, Clone)]
pub struct EditDistanceIndex {
    words: HashSet<SmolStr>,
    capacity: usize,
}

impl EditDistanceIndex {
    pub fn with_capacity(capacity: usize) -> EditDistanceIndex {
        EditDistanceIndex {
            words: HashSet::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl WordIndex for EditDistanceIndex {
    fn capacity(&self) -> usize {
        self.capacity
    }

    fn insert(&mut self, word: &str) {
        self.words.insert(SmolStr::new(word));
    }

    fn remove(&mut self, word: &str) {
        self.words.remove(word);
    }

    fn suggest(&self, query: &str) -> Vec<SmolStr> {
        let query = lower_case(query);
        let max_distance = std::cmp::max(1, query.chars().count() / 3);

        let mut ranked: Vec<(usize, &SmolStr)> = self
            .words
            .iter()
            .map(|word| (strsim::damerau_levenshtein(&query, &lower_case(word)), word))
            .filter(|(distance, _)| *distance <= max_distance)
            .collect();
        ranked.sort();

        ranked
            .into_iter()
            .take(MAX_RESULTS)
            .map(|(_, word)| word.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_by_distance() {
        let mut index = EditDistanceIndex::with_capacity(1000);
        for word in ["Oulu", "Oulo", "Ouluun", "Turku"] {
            index.insert(word);
        }

        assert_eq!(index.suggest("oulu"), vec!["Oulu", "Oulo"]);
        assert_eq!(index.suggest("turkku"), vec!["Turku"]);
        assert!(index.suggest("Helsinki").is_empty());

        index.remove("Oulu");
        assert_eq!(index.suggest("oulu"), vec!["Oulo"]);
        assert_eq!(index.capacity(), 1000);
    }
}

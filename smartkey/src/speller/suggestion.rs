//! Suggestion for a spelling correction.
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::cmp::Ordering;
use std::cmp::Ordering::Equal;

#[derive(Clone, Debug, Serialize, Deserialize)]
/// Suggestion for a spelling correction
pub struct Suggestion {
    /// the suggested word-form
    pub value: SmolStr,
    /// penalty of the word-form; lower ranks first
    pub weight: f32,
}

impl Suggestion {
    pub fn new(value: impl Into<SmolStr>, weight: f32) -> Suggestion {
        Suggestion {
            value: value.into(),
            weight,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn weight(&self) -> f32 {
        self.weight
    }
}

impl PartialOrd for Suggestion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Suggestion {
    fn cmp(&self, other: &Self) -> Ordering {
        let x = self.weight.partial_cmp(&other.weight).unwrap_or(Equal);

        if let Equal = x {
            return self.value.cmp(&other.value);
        }

        x
    }
}

impl PartialEq for Suggestion {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.weight == other.weight
    }
}

impl Eq for Suggestion {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_weight_then_value() {
        let mut suggestions = vec![
            Suggestion::new("tell", 1.0),
            Suggestion::new("full", 2.0),
            Suggestion::new("bull", 1.0),
        ];
        suggestions.sort();
        let values: Vec<&str> = suggestions.iter().map(Suggestion::value).collect();
        assert_eq!(values, vec!["bull", "tell", "full"]);
    }
}

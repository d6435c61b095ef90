//! The user-facing dictionaries: auto-replace shortcuts, learned words and
//! contact names.
use serde::{Deserialize, Serialize};

use crate::error::SmartKeyError;
use crate::store::is_storable;
use crate::tokenizer::{contains_digits, is_all_punctuation};

mod auto_sub;
mod contacts;
mod user;

pub use self::auto_sub::AutoSubDatabase;
pub use self::contacts::{ContactIndex, ContactStats};
pub use self::user::UserDatabase;

/// Which auto-replace entries a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WhichEntries {
    /// Entries added by the user, including seeded defaults.
    UserOnly,
    /// Shipped and hard-coded entries.
    StockOnly,
    All,
}

pub(crate) fn paginate<T>(items: Vec<T>, offset: usize, limit: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}

/// Text that may be stored as a shortcut or substitution.
pub(crate) fn validate_entry_text(text: &str) -> Result<(), SmartKeyError> {
    if text.trim().is_empty() || is_all_punctuation(text) || contains_digits(text) {
        return Err(SmartKeyError::BadWord);
    }
    Ok(())
}

/// A word that may be learned.
pub(crate) fn validate_word(word: &str) -> Result<(), SmartKeyError> {
    if word.is_empty() {
        return Err(SmartKeyError::BadParam);
    }
    if word.trim().is_empty() || is_all_punctuation(word) || !is_storable(word) {
        return Err(SmartKeyError::BadWord);
    }
    Ok(())
}

use std::path::{Path, PathBuf};

use smol_str::SmolStr;

use crate::paths::{find_resource, LOCALE_WORDS_DIR, LOCALE_WORDS_FILE, WHITELIST_DIR, WHITELIST_FILE};
use crate::settings::{LocaleSettings, Settings};
use crate::store::{load_or_empty, LineFormat, LocaleBundle, Persistable, WordLookup, WordSetStore};
use crate::tokenizer::case_handling::lower_case;

/// Read-only word lists that change with the locale.
#[derive(Debug)]
pub(crate) struct LocaleDictionaries {
    /// Words accepted without consulting anything else.
    whitelist: LocaleBundle<WordSetStore>,
    /// Spellings belonging to sibling locales of the same language, which
    /// must never be auto-accepted.
    locale_words: WordSetStore,
}

impl Default for LocaleDictionaries {
    fn default() -> Self {
        LocaleDictionaries {
            whitelist: LocaleBundle::new(
                WordSetStore::with_format(LineFormat::Commented),
                WordSetStore::with_format(LineFormat::Scrambled),
            ),
            locale_words: WordSetStore::new(),
        }
    }
}

impl LocaleDictionaries {
    pub fn reloaded(&self, settings: &Settings, locale: &LocaleSettings) -> LocaleDictionaries {
        let mut loaded = WordSetStore::with_format(LineFormat::Scrambled);
        if let Some(path) = find_resource(settings.read_only(WHITELIST_DIR), "/whitelist-entries", locale) {
            load_or_empty(&mut loaded, &path);
        }
        // Lookups go through the lowercase form of the typed word.
        let mut dependent = WordSetStore::with_format(LineFormat::Scrambled);
        for word in loaded.iter() {
            dependent.add(&lower_case(word));
        }
        let shared = settings.read_only(WHITELIST_DIR).join(WHITELIST_FILE);
        let whitelist = self.whitelist.reloaded(Some(&shared), dependent);

        let locale_words = sibling_locale_words(settings, locale);
        log::debug!(
            "{}: {} whitelisted, {} sibling-locale words",
            locale.language_country_locale(),
            whitelist.len(),
            locale_words.len()
        );

        LocaleDictionaries {
            whitelist,
            locale_words,
        }
    }

    pub fn is_whitelisted(&self, word: &str) -> bool {
        self.whitelist.contains(word) || self.whitelist.contains(&lower_case(word))
    }

    pub fn whitelist_prefix(&self, prefix: &str) -> Option<SmolStr> {
        self.whitelist.find_by_prefix(prefix)
    }

    pub fn is_other_locale_word(&self, word: &str) -> bool {
        self.locale_words.contains(word)
    }
}

fn read_words(path: &Path) -> WordSetStore {
    let mut store = WordSetStore::with_format(LineFormat::Commented);
    load_or_empty(&mut store, path);
    store
}

/// Words listed for other countries sharing the input language and absent
/// from the current locale's own list. Empty when the locale has no list of
/// its own.
fn sibling_locale_words(settings: &Settings, locale: &LocaleSettings) -> WordSetStore {
    let root = settings.read_only(LOCALE_WORDS_DIR);
    let mut siblings = WordSetStore::new();
    let own_path = match find_resource(&root, "/locale-words", locale) {
        Some(path) => path,
        None => return siblings,
    };
    let own = read_words(&own_path);

    let entries = match std::fs::read_dir(&root) {
        Ok(entries) => entries,
        Err(_) => return siblings,
    };

    let sibling_prefix = format!("{}_", locale.input_language);
    let paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.len() == sibling_prefix.len() + 2 && name.to_lowercase().starts_with(&sibling_prefix)
        })
        .map(|entry| entry.path().join(LOCALE_WORDS_FILE))
        .filter(|path| *path != own_path)
        .collect();

    for path in paths {
        let words = read_words(&path);
        for word in words.iter().filter(|word| !own.contains(word)) {
            siblings.add(word);
        }
    }
    siblings
}

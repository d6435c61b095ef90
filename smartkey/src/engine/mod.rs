//! The spell-check resolver that ties every dictionary together.
//!
//! A word is checked against, in order: the supported-language list, the
//! whitelist, auto-replace shortcuts, numbers and addresses, the user's and
//! contact words, and finally the [`Speller`]. The first source that knows
//! the word settles it; only the speller proposes corrections.
use std::sync::Arc;

use itertools::Itertools;
use parking_lot::Mutex;
use smol_str::SmolStr;

use self::dictionaries::LocaleDictionaries;
use crate::database::{AutoSubDatabase, ContactIndex, ContactStats, UserDatabase, WhichEntries};
use crate::error::{SmartKeyError, StoreError};
use crate::settings::{LocaleSettings, Settings, SUPPORTED_LANGUAGES};
use crate::speller::Speller;
use crate::store::Entry;
use crate::tokenizer::case_handling::{lower_case, word_variants};
use crate::tokenizer::{is_all_punctuation, is_number, is_url, Tokenize};

mod dictionaries;
mod result;

pub use self::result::{SpellCheckResult, WordGuess};

/// Everything that is replaced together when the locale changes.
#[derive(Debug)]
struct LocaleState {
    locale: LocaleSettings,
    dictionaries: LocaleDictionaries,
    auto_sub: AutoSubDatabase,
}

#[derive(Debug)]
struct EngineState {
    enabled: bool,
    current: LocaleState,
    user: UserDatabase,
    contacts: ContactIndex,
}

/// Thread-safe front for all spell-check requests.
///
/// Every request takes the same lock, so a locale change is never observed
/// half-applied.
pub struct SpellCheckEngine {
    settings: Arc<Settings>,
    speller: Arc<dyn Speller>,
    state: Mutex<EngineState>,
}

fn save_failed(e: StoreError) -> SmartKeyError {
    log::warn!("{}", e);
    SmartKeyError::Failure
}

impl SpellCheckEngine {
    pub fn new(settings: Settings, speller: Arc<dyn Speller>) -> SpellCheckEngine {
        let settings = Arc::new(settings);
        let locale = LocaleSettings::from_locale(&settings.locale);
        log::debug!("starting spell checker for {}", locale.full_locale());

        let current = LocaleState {
            dictionaries: LocaleDictionaries::default().reloaded(&settings, &locale),
            auto_sub: AutoSubDatabase::new(Arc::clone(&settings), &locale),
            locale,
        };

        let mut contacts = ContactIndex::new(&settings, Arc::clone(&speller));
        contacts.replace_stock_words(ContactIndex::read_stock_words(&settings, &current.locale));

        if !speller.reload(&current.locale.language_country_locale()) {
            log::warn!(
                "speller has no dictionary for {}",
                current.locale.language_country_locale()
            );
        }

        let state = EngineState {
            enabled: settings.enabled,
            current,
            user: UserDatabase::new(Arc::clone(&settings)),
            contacts,
        };

        SpellCheckEngine {
            settings,
            speller,
            state: Mutex::new(state),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn supported_languages(&self) -> &'static [&'static str] {
        &SUPPORTED_LANGUAGES
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state.lock().enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    pub fn locale_settings(&self) -> LocaleSettings {
        self.state.lock().current.locale.clone()
    }

    /// Switches every locale-dependent dictionary to `locale`. Returns
    /// whether anything changed.
    ///
    /// Pending user auto-replace changes are saved under the old locale
    /// first; if that fails the old locale stays active and `Failure` is
    /// returned. The new dictionaries are loaded completely before any of them
    /// replaces the old ones.
    pub fn set_locale_settings(&self, mut locale: LocaleSettings) -> Result<bool, SmartKeyError> {
        locale.normalize();

        let mut state = self.state.lock();
        if state.current.locale == locale {
            return Ok(false);
        }

        log::debug!(
            "locale change: {} -> {}",
            state.current.locale.full_locale(),
            locale.full_locale()
        );

        state.current.auto_sub.save().map_err(save_failed)?;

        let next = LocaleState {
            dictionaries: state.current.dictionaries.reloaded(&self.settings, &locale),
            auto_sub: state.current.auto_sub.reloaded(&locale),
            locale,
        };
        let stock_words = ContactIndex::read_stock_words(&self.settings, &next.locale);
        let language_country = next.locale.language_country_locale();

        state.current = next;
        state.contacts.replace_stock_words(stock_words);

        if !self.speller.reload(&language_country) {
            log::warn!("speller has no dictionary for {}", language_country);
        }
        Ok(true)
    }

    /// Checks one word and proposes up to `max_guesses` corrections.
    pub fn check_spelling(&self, word: &str, max_guesses: usize) -> Result<SpellCheckResult, SmartKeyError> {
        let mut state = self.state.lock();
        if !state.enabled {
            return Err(SmartKeyError::Disabled);
        }
        self.resolve(&mut state, word, max_guesses)
    }

    /// Like [`check_spelling`](Self::check_spelling) for a word typed after
    /// `context`. The context does not influence the result.
    pub fn auto_correct(
        &self,
        word: &str,
        context: &str,
        max_guesses: usize,
    ) -> Result<SpellCheckResult, SmartKeyError> {
        log::trace!("auto-correct {:?} after {:?}", word, context);
        self.check_spelling(word, max_guesses)
    }

    fn resolve(
        &self,
        state: &mut EngineState,
        word: &str,
        max_guesses: usize,
    ) -> Result<SpellCheckResult, SmartKeyError> {
        if word.is_empty() || is_all_punctuation(word) {
            return Err(SmartKeyError::BadParam);
        }

        if !state.current.locale.is_supported() || state.current.dictionaries.is_whitelisted(word) {
            return Ok(SpellCheckResult::known());
        }

        let mut result = SpellCheckResult::default();
        let mut auto_accepted = false;
        let mut replaced = false;

        if let Some(substitution) = state.current.auto_sub.find_entry(word) {
            if substitution != word {
                if lower_case(&substitution) == lower_case(word) {
                    result.guesses.push(WordGuess::verbatim(word));
                } else {
                    replaced = true;
                }
                result.guesses.push(WordGuess::auto_replace(substitution));
                auto_accepted = true;
            }
        }

        if is_number(word) || is_url(word) {
            result.in_dictionary = true;
            return Ok(result);
        }

        let known_locally = word_variants(word)
            .iter()
            .any(|variant| state.user.contains(variant) || state.contacts.contains(variant));
        if known_locally || Arc::clone(&self.speller).is_correct(word) {
            result.in_dictionary = true;
            return Ok(result);
        }

        if replaced {
            return Ok(result);
        }

        let contact_matches = state.contacts.query(word);
        let exact_contact = state.contacts.exact_match().filter(|name| name != word);
        let suggestions = Arc::clone(&self.speller).suggest(word, max_guesses);

        let mut candidates: Vec<SmolStr> = exact_contact
            .into_iter()
            .chain(suggestions.into_iter().map(|s| s.value))
            .chain(contact_matches)
            .filter(|candidate| candidate != word)
            .unique()
            .take(max_guesses.saturating_sub(result.guesses.len()))
            .collect();

        let best = if auto_accepted {
            None
        } else {
            candidates
                .iter()
                .position(|c| !state.current.dictionaries.is_other_locale_word(c))
        };
        if let Some(i) = best {
            let candidate = candidates.remove(i);
            candidates.insert(0, candidate);
        }

        result.guesses.extend(
            candidates
                .into_iter()
                .enumerate()
                .map(|(i, text)| WordGuess::correction(text, i == 0 && best.is_some())),
        );
        Ok(result)
    }

    /// A completion for `prefix`: its own auto-replace expansion if it has
    /// one, otherwise the smallest matching word from the local dictionaries.
    pub fn get_completion(&self, prefix: &str) -> Result<Option<SmolStr>, SmartKeyError> {
        let state = self.state.lock();
        if !state.enabled {
            return Err(SmartKeyError::Disabled);
        }
        if prefix.is_empty() {
            return Err(SmartKeyError::BadParam);
        }
        if !state.current.locale.is_supported() {
            return Err(SmartKeyError::Unsupported);
        }
        if prefix.chars().all(|c| c.is_ascii_digit()) {
            return Ok(None);
        }

        let auto_sub = &state.current.auto_sub;
        Ok(auto_sub
            .find_entry(prefix)
            .or_else(|| auto_sub.find_by_prefix(prefix))
            .or_else(|| state.user.find_by_prefix(prefix))
            .or_else(|| state.contacts.find_by_prefix(prefix))
            .or_else(|| state.current.dictionaries.whitelist_prefix(prefix)))
    }

    fn with_state<T>(
        &self,
        f: impl FnOnce(&mut EngineState) -> Result<T, SmartKeyError>,
    ) -> Result<T, SmartKeyError> {
        let mut state = self.state.lock();
        if !state.enabled {
            return Err(SmartKeyError::Disabled);
        }
        f(&mut state)
    }

    pub fn learn_word(&self, word: &str) -> Result<(), SmartKeyError> {
        self.with_state(|state| state.user.learn_word(word))
    }

    pub fn forget_word(&self, word: &str) -> Result<(), SmartKeyError> {
        self.with_state(|state| state.user.forget_word(word))
    }

    pub fn learn_context_word(&self, word: &str) -> Result<(), SmartKeyError> {
        self.with_state(|state| state.user.learn_context_word(word))
    }

    pub fn forget_context_word(&self, word: &str) -> Result<(), SmartKeyError> {
        self.with_state(|state| state.user.forget_context_word(word))
    }

    pub fn update_word_usage(&self, word: &str) -> Result<u32, SmartKeyError> {
        self.with_state(|state| state.user.update_word_usage(word))
    }

    /// Learned words in display order.
    pub fn user_entries(&self, offset: usize, limit: usize) -> Result<Vec<SmolStr>, SmartKeyError> {
        self.with_state(|state| Ok(state.user.entries(offset, limit)))
    }

    pub fn num_user_entries(&self) -> Result<usize, SmartKeyError> {
        self.with_state(|state| Ok(state.user.num_entries()))
    }

    pub fn add_entry(&self, entry: &Entry) -> Result<(), SmartKeyError> {
        self.with_state(|state| state.current.auto_sub.add_entry(entry))
    }

    pub fn remove_entry(&self, shortcut: &str) -> Result<(), SmartKeyError> {
        self.with_state(|state| state.current.auto_sub.remove_entry(shortcut))
    }

    pub fn entries(&self, offset: usize, limit: usize, which: WhichEntries) -> Result<Vec<Entry>, SmartKeyError> {
        self.with_state(|state| Ok(state.current.auto_sub.entries(offset, limit, which)))
    }

    pub fn num_entries(&self, which: WhichEntries) -> Result<usize, SmartKeyError> {
        self.with_state(|state| Ok(state.current.auto_sub.num_entries(which)))
    }

    /// Learns the usable parts of a person's name as contact words and
    /// returns them.
    pub fn add_person(&self, name: &str) -> Result<Vec<SmolStr>, SmartKeyError> {
        self.with_state(|state| {
            let mut learned = vec![];
            for part in name.names() {
                state.contacts.learn_word(part)?;
                learned.push(SmolStr::new(part));
            }
            Ok(learned)
        })
    }

    /// Forgets the parts of a name learned by [`add_person`](Self::add_person).
    pub fn remove_person(&self, name: &str) -> Result<usize, SmartKeyError> {
        self.with_state(|state| {
            let forgotten = name
                .names()
                .filter(|part| state.contacts.forget_word(part).is_ok())
                .count();
            if forgotten == 0 {
                Err(SmartKeyError::NoMatchingWords)
            } else {
                Ok(forgotten)
            }
        })
    }

    pub fn set_expected_contact_count(&self, count: usize) -> Result<(), SmartKeyError> {
        self.with_state(|state| {
            state.contacts.set_expected_count(count);
            Ok(())
        })
    }

    pub fn contact_statistics(&self) -> ContactStats {
        let state = self.state.lock();
        state.contacts.log_statistics();
        state.contacts.statistics()
    }

    /// Writes every modified user dictionary. All are attempted even if one
    /// fails.
    pub fn save(&self) -> Result<(), SmartKeyError> {
        let mut state = self.state.lock();
        save_state(&mut state)
    }
}

fn save_state(state: &mut EngineState) -> Result<(), SmartKeyError> {
    let user = state.user.save().map_err(save_failed);
    let auto_sub = state.current.auto_sub.save().map_err(save_failed);
    user.and(auto_sub)
}

impl Drop for SpellCheckEngine {
    fn drop(&mut self) {
        let _ = save_state(self.state.get_mut());
    }
}

impl std::fmt::Debug for SpellCheckEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpellCheckEngine")
            .field("settings", &self.settings)
            .finish()
    }
}

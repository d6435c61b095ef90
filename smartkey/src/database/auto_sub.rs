use std::path::PathBuf;
use std::sync::Arc;

use hashbrown::HashMap;
use smol_str::SmolStr;

use super::{paginate, validate_entry_text, WhichEntries};
use crate::error::{SmartKeyError, StoreError};
use crate::paths::{find_resource, AUTOREPLACE_DIR, AUTOREPLACE_FILE, HARD_CODED_DIR};
use crate::settings::{LocaleSettings, Settings};
use crate::store::{load_or_empty, Entry, LocaleBundle, PairStore, Persistable, ShortcutLookup};
use crate::tokenizer::case_handling::{lower_case, match_case};
use crate::tokenizer::compare_folded;

/// Shortcut expansion from the user's entries and the hard-coded defaults.
///
/// The user bundle holds the shipped, shared shortcuts underneath the user's
/// own per-locale file; only the latter is ever written. The hard-coded
/// bundle is read-only. Lookups try the user bundle before the hard-coded one.
#[derive(Debug)]
pub struct AutoSubDatabase {
    settings: Arc<Settings>,
    locale: String,
    user: LocaleBundle<PairStore>,
    hard_coded: LocaleBundle<PairStore>,
}

impl AutoSubDatabase {
    pub fn new(settings: Arc<Settings>, locale: &LocaleSettings) -> AutoSubDatabase {
        AutoSubDatabase {
            settings,
            locale: String::new(),
            user: LocaleBundle::default(),
            hard_coded: LocaleBundle::default(),
        }
        .reloaded(locale)
    }

    fn user_path(&self) -> PathBuf {
        user_path(&self.settings, &self.locale)
    }

    /// The same database for another locale. The current user entries should
    /// be saved first; `self` is left as it was.
    pub fn reloaded(&self, locale: &LocaleSettings) -> AutoSubDatabase {
        let settings = &self.settings;
        let language_country = locale.language_country_locale();

        let mut user = PairStore::new();
        let path = user_path(settings, &language_country);
        load_or_empty(&mut user, &path);

        if !user.is_initialized() {
            let defaults = find_resource(settings.read_only(AUTOREPLACE_DIR), "/text-edit-autoreplace", locale);
            if let Some(defaults) = defaults {
                log::info!(
                    "creating auto-replace entries for {} from {}",
                    language_country,
                    defaults.display()
                );
                seed(&mut user, &defaults);
            }
        }

        let shared = settings.read_only(AUTOREPLACE_DIR).join(AUTOREPLACE_FILE);
        let user = self.user.reloaded(Some(&shared), user);

        let mut locale_hard_coded = PairStore::new();
        if let Some(path) = find_resource(settings.read_only(HARD_CODED_DIR), "/text-edit-autoreplace", locale) {
            load_or_empty(&mut locale_hard_coded, &path);
        }
        let shared = settings.read_only(HARD_CODED_DIR).join(AUTOREPLACE_FILE);
        let hard_coded = self.hard_coded.reloaded(Some(&shared), locale_hard_coded);

        log::debug!(
            "auto-replace for {}: {} user, {} hard-coded",
            language_country,
            user.len(),
            hard_coded.len()
        );

        AutoSubDatabase {
            settings: Arc::clone(settings),
            locale: language_country,
            user,
            hard_coded,
        }
    }

    pub fn save(&mut self) -> Result<(), StoreError> {
        let path = self.user_path();
        self.user.save(&path)
    }

    pub fn is_dirty(&self) -> bool {
        self.user.is_dirty()
    }

    /// The expansion for `shortcut`, if any, with the shortcut's
    /// capitalisation carried over. The shortcut is looked up as typed, then
    /// in lowercase.
    pub fn find_entry(&self, shortcut: &str) -> Option<SmolStr> {
        let lowered = lower_case(shortcut);

        [&self.user, &self.hard_coded]
            .iter()
            .find_map(|bundle| bundle.find(shortcut).or_else(|| bundle.find(&lowered)))
            .map(|substitution| match_case(shortcut, &substitution))
    }

    /// The smallest expansion starting with `prefix`.
    pub fn find_by_prefix(&self, prefix: &str) -> Option<SmolStr> {
        self.user
            .find_by_prefix(prefix)
            .or_else(|| self.hard_coded.find_by_prefix(prefix))
    }

    pub fn add_entry(&mut self, entry: &Entry) -> Result<(), SmartKeyError> {
        validate_entry_text(&entry.shortcut)?;
        validate_entry_text(&entry.substitution)?;
        self.user
            .dependent_mut()
            .add(&entry.shortcut, &entry.substitution)
    }

    pub fn remove_entry(&mut self, shortcut: &str) -> Result<(), SmartKeyError> {
        if shortcut.is_empty() {
            return Err(SmartKeyError::BadParam);
        }
        if self.user.dependent_mut().remove(shortcut) {
            Ok(())
        } else {
            Err(SmartKeyError::NoMatchingWords)
        }
    }

    /// One entry per shortcut in display order. Where the user and the stock
    /// data both define a shortcut, the user's entry is listed.
    fn sorted_entries(&self, which: WhichEntries) -> Vec<Entry> {
        let stock = || {
            self.user
                .independent()
                .export_all()
                .into_iter()
                .chain(self.hard_coded.export_all())
        };
        let user = || self.user.dependent().export_all().into_iter();

        let entries: Vec<Entry> = match which {
            WhichEntries::UserOnly => user().collect(),
            WhichEntries::StockOnly => stock().collect(),
            WhichEntries::All => stock().chain(user()).collect(),
        };

        let mut unique: HashMap<SmolStr, Entry> = HashMap::with_capacity(entries.len());
        for entry in entries {
            unique.insert(entry.shortcut.clone(), entry);
        }

        let mut entries: Vec<Entry> = unique.into_iter().map(|(_, entry)| entry).collect();
        entries.sort_by(|a, b| compare_folded(&a.shortcut, &b.shortcut));
        entries
    }

    pub fn entries(&self, offset: usize, limit: usize, which: WhichEntries) -> Vec<Entry> {
        paginate(self.sorted_entries(which), offset, limit)
    }

    pub fn num_entries(&self, which: WhichEntries) -> usize {
        self.sorted_entries(which).len()
    }
}

fn user_path(settings: &Settings, language_country: &str) -> PathBuf {
    settings
        .read_write(AUTOREPLACE_DIR)
        .join(language_country)
        .join(AUTOREPLACE_FILE)
}

fn seed(user: &mut PairStore, defaults: &std::path::Path) {
    let mut stock = PairStore::new();
    load_or_empty(&mut stock, defaults);
    for entry in stock.export_all() {
        if let Err(e) = user.add(&entry.shortcut, &entry.substitution) {
            log::warn!("skipping default entry {:?}: {}", entry.shortcut, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn write(path: &Path, contents: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }

    fn database(dir: &Path, locale: &str) -> AutoSubDatabase {
        let settings = Arc::new(Settings::with_dirs(dir.join("ro"), dir.join("rw")));
        AutoSubDatabase::new(settings, &LocaleSettings::from_locale(locale))
    }

    #[test]
    fn case_follows_the_shortcut() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("ro/autoreplace-hc/en_us/text-edit-autoreplace"), "cant|can't\n");

        let db = database(dir.path(), "en_us");
        assert_eq!(db.find_entry("cant"), Some("can't".into()));
        assert_eq!(db.find_entry("Cant"), Some("Can't".into()));
        assert_eq!(db.find_entry("CANT"), Some("CAN'T".into()));
        assert_eq!(db.find_entry("wont"), None);
    }

    #[test]
    fn exact_shortcut_follows_typed_case() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = database(dir.path(), "en_us");
        db.add_entry(&Entry::new("ASAP", "as soon as possible")).unwrap();
        db.add_entry(&Entry::new("Fyi", "for your information")).unwrap();
        db.add_entry(&Entry::new("ok", "OK")).unwrap();
        assert_eq!(db.find_entry("ASAP"), Some("AS SOON AS POSSIBLE".into()));
        assert_eq!(db.find_entry("Fyi"), Some("For your information".into()));
        assert_eq!(db.find_entry("ok"), Some("OK".into()));
    }

    #[test]
    fn user_entries_win_and_persist() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("ro/autoreplace/text-edit-autoreplace"), "ty|thank you\n");
        write(&dir.path().join("ro/autoreplace-hc/text-edit-autoreplace"), "brb|be right back\n");

        let mut db = database(dir.path(), "en_us");
        assert_eq!(db.find_entry("ty"), Some("thank you".into()));
        assert_eq!(db.find_entry("brb"), Some("be right back".into()));

        db.add_entry(&Entry::new("brb", "be back")).unwrap();
        assert_eq!(db.find_entry("brb"), Some("be back".into()));
        db.save().unwrap();

        let db = database(dir.path(), "en_us");
        assert_eq!(db.find_entry("brb"), Some("be back".into()));
        assert!(dir.path().join("rw/autoreplace/en_us/text-edit-autoreplace").exists());
    }

    #[test]
    fn invalid_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = database(dir.path(), "en_us");
        assert_eq!(db.add_entry(&Entry::new("", "x")), Err(SmartKeyError::BadWord));
        assert_eq!(db.add_entry(&Entry::new("gr8", "great")), Err(SmartKeyError::BadWord));
        assert_eq!(db.add_entry(&Entry::new(":)", "smile")), Err(SmartKeyError::BadWord));
        assert_eq!(db.add_entry(&Entry::new("a|b", "ab")), Err(SmartKeyError::BadWord));
        assert!(!db.is_dirty());
    }

    #[test]
    fn stock_entries_cannot_be_removed() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("ro/autoreplace-hc/text-edit-autoreplace"), "teh|the\n");

        let mut db = database(dir.path(), "en_us");
        assert_eq!(db.remove_entry("teh"), Err(SmartKeyError::NoMatchingWords));
        assert_eq!(db.find_entry("teh"), Some("the".into()));

        db.add_entry(&Entry::new("omw", "on my way")).unwrap();
        assert_eq!(db.remove_entry("omw"), Ok(()));
        assert_eq!(db.remove_entry("omw"), Err(SmartKeyError::NoMatchingWords));
    }

    #[test]
    fn seeds_user_entries_from_locale_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("ro/autoreplace/fr_fr/text-edit-autoreplace"), "stp|s'il te plaît\n");

        let mut db = database(dir.path(), "fr_ca");
        assert_eq!(db.find_entry("stp"), Some("s'il te plaît".into()));
        assert_eq!(db.num_entries(WhichEntries::UserOnly), 1);
        assert!(db.is_dirty());

        db.save().unwrap();
        assert!(dir.path().join("rw/autoreplace/fr_ca/text-edit-autoreplace").exists());
    }

    #[test]
    fn locale_change_swaps_user_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut db = database(dir.path(), "en_us");
        db.add_entry(&Entry::new("thx", "thanks")).unwrap();
        db.save().unwrap();

        let de = db.reloaded(&LocaleSettings::from_locale("de_de"));
        assert_eq!(de.find_entry("thx"), None);
        assert_eq!(db.find_entry("thx"), Some("thanks".into()));

        let en = de.reloaded(&LocaleSettings::from_locale("en_us"));
        assert_eq!(en.find_entry("thx"), Some("thanks".into()));
    }

    #[test]
    fn entries_are_sorted_and_paged() {
        let dir = tempfile::tempdir().unwrap();
        write(
            &dir.path().join("ro/autoreplace-hc/text-edit-autoreplace"),
            "dont|don't\nim|I'm\n",
        );

        let mut db = database(dir.path(), "en_us");
        for (shortcut, substitution) in [("Zed", "zebra"), ("émoi", "émotion"), ("brb", "be right back"), ("im", "I am")] {
            db.add_entry(&Entry::new(shortcut, substitution)).unwrap();
        }

        let shortcuts = |entries: Vec<Entry>| -> Vec<SmolStr> {
            entries.into_iter().map(|e| e.shortcut).collect()
        };

        assert_eq!(shortcuts(db.entries(0, 2, WhichEntries::All)), vec!["brb", "dont"]);
        assert_eq!(shortcuts(db.entries(2, 2, WhichEntries::All)), vec!["émoi", "im"]);
        assert_eq!(shortcuts(db.entries(4, 2, WhichEntries::All)), vec!["Zed"]);
        assert_eq!(db.num_entries(WhichEntries::All), 5);
        assert_eq!(db.num_entries(WhichEntries::StockOnly), 2);
        assert_eq!(db.num_entries(WhichEntries::UserOnly), 4);

        let all = db.entries(0, 10, WhichEntries::All);
        let im = all.iter().find(|e| e.shortcut == "im").unwrap();
        assert_eq!(im.substitution, "I am");
    }
}

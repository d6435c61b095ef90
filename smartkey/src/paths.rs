//! Locating per-locale dictionary files.
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::settings::LocaleSettings;
use crate::tokenizer::case_handling::upper_case;

pub const WHITELIST_DIR: &str = "whitelist/";
pub const WHITELIST_FILE: &str = "whitelist-entries";
pub const LOCALE_WORDS_DIR: &str = "locale/";
pub const LOCALE_WORDS_FILE: &str = "locale-words";
pub const AUTOREPLACE_DIR: &str = "autoreplace/";
pub const HARD_CODED_DIR: &str = "autoreplace-hc/";
pub const AUTOREPLACE_FILE: &str = "text-edit-autoreplace";
pub const MANUFACTURER_DIR: &str = "manufacturer/";
pub const MANUFACTURER_FILE: &str = "man-db-entries";
pub const USER_WORDS_FILE: &str = "user-words";
pub const USER_USAGE_FILE: &str = "user-usage";

/// The locale names tried by [`find_resource`], most specific first.
pub fn locale_candidates(locale: &LocaleSettings) -> Vec<String> {
    let lang = &locale.input_language;
    let country = &locale.device_country;

    let mut candidates = vec![
        format!("{}_{}", lang, country),
        format!("{}_{}", lang, lang),
        format!("{}_{}", lang, upper_case(country)),
        lang.to_string(),
        format!("{}_{}", lang, upper_case(lang)),
        format!("{}_us", lang),
        format!("{}_US", lang),
    ];

    let mut seen = hashbrown::HashSet::new();
    candidates.retain(|c| seen.insert(c.clone()));
    candidates
}

/// Returns the first existing `prefix + candidate + suffix` for the locale.
pub fn find_resource<P: AsRef<Path>>(
    prefix: P,
    suffix: &str,
    locale: &LocaleSettings,
) -> Option<PathBuf> {
    locale_candidates(locale).into_iter().find_map(|candidate| {
        let mut path = OsString::from(prefix.as_ref().as_os_str());
        path.push(&candidate);
        path.push(suffix);
        let path = PathBuf::from(path);

        if path.exists() {
            log::trace!("resource for {}: {}", candidate, path.display());
            Some(path)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(root: &Path, locale: &str) {
        let dir = root.join("whitelist").join(locale);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("whitelist-entries"), "").unwrap();
    }

    #[test]
    fn candidate_order() {
        let locale = LocaleSettings::from_locale("fr_ca");
        assert_eq!(
            locale_candidates(&locale),
            vec!["fr_ca", "fr_fr", "fr_CA", "fr", "fr_FR", "fr_us", "fr_US"]
        );

        let locale = LocaleSettings::from_locale("en_us");
        assert_eq!(
            locale_candidates(&locale),
            vec!["en_us", "en_en", "en_US", "en", "en_EN"]
        );
    }

    #[test]
    fn falls_back_to_language() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "fr_fr");
        touch(dir.path(), "fr_US");

        let prefix = dir.path().join(WHITELIST_DIR);
        let locale = LocaleSettings::from_locale("fr_ca");
        let found = find_resource(&prefix, "/whitelist-entries", &locale).unwrap();
        assert!(found.ends_with("fr_fr/whitelist-entries"));
    }

    #[test]
    fn exact_locale_wins() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "de_at");
        touch(dir.path(), "de");

        let prefix = dir.path().join(WHITELIST_DIR);
        let found = find_resource(&prefix, "/whitelist-entries", &LocaleSettings::from_locale("de_at"));
        assert!(found.unwrap().ends_with("de_at/whitelist-entries"));

        let missing = find_resource(&prefix, "/whitelist-entries", &LocaleSettings::from_locale("it_it"));
        assert_eq!(missing, None);
    }
}

//! Process configuration and the active keyboard locale.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::tokenizer::case_handling::lower_case;

/// Input languages for which spell checking is performed at all.
pub const SUPPORTED_LANGUAGES: [&str; 5] = ["en", "es", "fr", "de", "it"];

/// Shared configuration handed to every database constructor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the shipped, read-only dictionaries
    pub read_only_data_dir: PathBuf,
    /// Root of the user's writable dictionaries
    pub read_write_data_dir: PathBuf,
    /// Initial `lang_country` locale
    pub locale: String,
    /// Whether requests are served at all
    pub enabled: bool,
}

impl Settings {
    /// Settings rooted at the given data directories, with the default locale.
    pub fn with_dirs(read_only: impl Into<PathBuf>, read_write: impl Into<PathBuf>) -> Settings {
        Settings {
            read_only_data_dir: read_only.into(),
            read_write_data_dir: read_write.into(),
            ..Settings::default()
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Settings, std::io::Error> {
        let file = std::fs::File::open(path)?;
        let settings = serde_json::from_reader(std::io::BufReader::new(file))?;
        Ok(settings)
    }

    pub fn read_only(&self, relative: &str) -> PathBuf {
        self.read_only_data_dir.join(relative)
    }

    pub fn read_write(&self, relative: &str) -> PathBuf {
        self.read_write_data_dir.join(relative)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            read_only_data_dir: PathBuf::from("/usr/palm/smartkey"),
            read_write_data_dir: PathBuf::from("/var/palm/data/smartkey"),
            locale: String::from("en_us"),
            enabled: true,
        }
    }
}

/// The user's device and keyboard locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleSettings {
    pub device_language: String,
    pub device_country: String,
    pub input_language: String,
    pub keyboard_layout: String,
    pub has_virtual_keyboard: bool,
}

impl LocaleSettings {
    /// Builds normalized settings from a `lang_country` string such as `en_us`.
    pub fn from_locale(locale: &str) -> LocaleSettings {
        let (language, country) = match locale.split_once('_') {
            Some((language, country)) => (language, country),
            None => (locale, ""),
        };

        let mut settings = LocaleSettings {
            device_language: language.to_string(),
            device_country: country.to_string(),
            input_language: language.to_string(),
            keyboard_layout: String::new(),
            has_virtual_keyboard: true,
        };
        settings.normalize();
        settings
    }

    /// Forces the codes into two lowercase characters each and fills in a layout.
    pub fn normalize(&mut self) {
        let device_language = lower_case(&self.device_language);
        let input_language = lower_case(&self.input_language);
        let device_country = lower_case(&self.device_country);

        self.device_language = if char_len(&device_language) == 2 {
            device_language.to_string()
        } else if char_len(&input_language) == 2 {
            input_language.to_string()
        } else {
            String::from("en")
        };

        self.device_country = if char_len(&device_country) == 2 {
            device_country.to_string()
        } else {
            String::from("us")
        };

        self.input_language = match char_len(&input_language) {
            2 => input_language.to_string(),
            n if n > 2 => input_language.chars().take(2).collect(),
            _ => self.device_language.clone(),
        };

        if self.keyboard_layout.is_empty() {
            self.keyboard_layout = String::from("qwerty");
        }
    }

    /// `inputLanguage_deviceCountry`, the key used for per-locale files.
    pub fn language_country_locale(&self) -> String {
        format!("{}_{}", self.input_language, self.device_country)
    }

    /// Human-readable description for logs.
    pub fn full_locale(&self) -> String {
        format!(
            "{}_{}, {}-{}",
            self.device_language, self.device_country, self.keyboard_layout, self.input_language
        )
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_LANGUAGES.contains(&self.input_language.as_str())
    }
}

#[inline(always)]
fn char_len(s: &str) -> usize {
    s.chars().count()
}

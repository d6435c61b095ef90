use std::cmp::Ordering;

use smol_str::SmolStr;
use unic_normal::StrNormalForm;
use unic_ucd_category::GeneralCategory;

use self::case_handling::lower_case;

pub mod case_handling;

const NAME_DELIMITERS: &[char] = &[
    ' ', '.', ',', ':', ';', '(', ')', '/', '\\', '"', '&', '?', '!', '+', '*',
];

pub trait Tokenize {
    /// Splits a person's name into the tokens worth learning as words.
    fn names(&self) -> Names<'_>;
}

impl Tokenize for str {
    fn names(&self) -> Names<'_> {
        Names {
            inner: self.split(NAME_DELIMITERS),
        }
    }
}

pub struct Names<'a> {
    inner: std::str::Split<'a, &'static [char]>,
}

impl<'a> Iterator for Names<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        self.inner.find(|token| is_valid_name(token))
    }
}

/// At least two bytes, opening with two letters, and no `#` or `@`.
fn is_valid_name(token: &str) -> bool {
    if token.len() < 2 || token.contains(|c: char| c == '#' || c == '@') {
        return false;
    }

    let mut chars = token.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some(a), Some(b)) if is_letter(a) && is_letter(b)
    )
}

#[inline(always)]
pub fn is_letter(c: char) -> bool {
    GeneralCategory::of(c).is_letter()
}

#[inline(always)]
fn is_punctuation(c: char) -> bool {
    let category = GeneralCategory::of(c);
    category.is_punctuation() || category.is_symbol()
}

/// True for words made only of punctuation, symbols and spaces (or nothing).
pub fn is_all_punctuation(word: &str) -> bool {
    word.chars().all(|c| c.is_whitespace() || is_punctuation(c))
}

pub fn contains_digits(word: &str) -> bool {
    word.chars().any(|c| GeneralCategory::of(c).is_number())
}

/// Digits with optional decimal points, e.g. `12.34`.
pub fn is_number(word: &str) -> bool {
    word.chars().any(|c| c.is_ascii_digit()) && word.chars().all(|c| c.is_ascii_digit() || c == '.')
}

/// Looks like an address rather than a word: one of `@ : / .` appears
/// before the final two characters.
pub fn is_url(word: &str) -> bool {
    let len = word.chars().count();
    word.chars()
        .take(len.saturating_sub(2))
        .any(|c| matches!(c, '@' | ':' | '/' | '.'))
}

/// Lowercase with diacritics removed, for user-facing ordering.
pub fn fold(word: &str) -> SmolStr {
    let stripped: String = word
        .nfd()
        .filter(|c| !GeneralCategory::of(*c).is_mark())
        .collect();
    lower_case(&stripped.as_str().nfc().collect::<String>())
}

/// Orders words ignoring case and accents; exact ties fall back to the raw text.
pub fn compare_folded(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        let names: Vec<&str> = "Dr. Jean-Luc O'Neil (work)".names().collect();
        assert_eq!(names, vec!["Dr", "Jean-Luc", "work"]);

        let names: Vec<&str> = "J. R. R. Tolkien".names().collect();
        assert_eq!(names, vec!["Tolkien"]);

        let names: Vec<&str> = "bob@home #1 Fan 3D".names().collect();
        assert_eq!(names, vec!["Fan"]);
    }

    #[test]
    fn word_classes() {
        assert!(is_number("12.34"));
        assert!(is_number("2024"));
        assert!(!is_number("."));
        assert!(!is_number("12a"));

        assert!(is_all_punctuation("?!"));
        assert!(is_all_punctuation(":-)"));
        assert!(!is_all_punctuation("can't"));

        assert!(contains_digits("b4"));
        assert!(!contains_digits("before"));
    }

    #[test]
    fn urls() {
        assert!(is_url("www.example.org"));
        assert!(is_url("me@home"));
        assert!(is_url("http://x"));
        assert!(!is_url("end."));
        assert!(!is_url("ok"));
        assert!(!is_url("hello"));
    }

    #[test]
    fn folding() {
        assert_eq!(fold("Éclair"), "eclair");
        assert_eq!(fold("Straße"), "straße");
        assert_eq!(compare_folded("éa", "eb"), Ordering::Less);
        assert_eq!(compare_folded("Zebra", "apple"), Ordering::Greater);
        assert_eq!(compare_folded("Apple", "apple"), Ordering::Less);
    }
}

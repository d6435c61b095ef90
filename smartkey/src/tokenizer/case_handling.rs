use itertools::Itertools;
use smol_str::SmolStr;

#[inline(always)]
pub fn lower_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_lowercase().collect::<String>())
        .collect::<SmolStr>()
}

#[inline(always)]
pub fn upper_case(s: &str) -> SmolStr {
    s.chars()
        .map(|c| c.to_uppercase().collect::<String>())
        .collect::<SmolStr>()
}

#[inline(always)]
pub fn upper_first(s: &str) -> SmolStr {
    let mut c = s.chars();
    match c.next() {
        None => SmolStr::new(""),
        Some(f) => SmolStr::from(f.to_uppercase().collect::<String>() + c.as_str()),
    }
}

#[inline(always)]
pub fn lower_first(s: &str) -> SmolStr {
    let mut c = s.chars();
    match c.next() {
        None => SmolStr::new(""),
        Some(f) => SmolStr::from(f.to_lowercase().collect::<String>() + c.as_str()),
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
    Neither,
}

impl Case {
    #[inline(always)]
    fn new(ch: char) -> Case {
        if ch.is_lowercase() {
            Case::Lower
        } else if ch.is_uppercase() {
            Case::Upper
        } else {
            Case::Neither
        }
    }
}

pub fn is_mixed_case(word: &str) -> bool {
    let mut chars = word.chars();
    let mut last_case = match chars.next() {
        Some(ch) => Case::new(ch),
        None => return false,
    };

    if last_case == Case::Neither {
        return false;
    }

    let mut case_changes = 0;

    for ch in chars {
        let next_case = Case::new(ch);

        match (last_case, next_case) {
            (_, Case::Neither) => return false,
            (Case::Lower, Case::Upper) => case_changes += 1,
            _ => {}
        }

        last_case = next_case;
    }

    case_changes > 0
}

pub fn is_all_caps(word: &str) -> bool {
    upper_case(word) == word
}

pub fn is_first_caps(word: &str) -> bool {
    upper_first(word) == word
}

fn starts_upper(word: &str) -> bool {
    word.chars().next().map_or(false, char::is_uppercase)
}

/// Carries the capitalisation of a typed shortcut over to its expansion.
///
/// An initial capital capitalises the first letter of `substitution`; a
/// shortcut of two or more characters typed entirely in capitals capitalises
/// all of it. Otherwise `substitution` is returned as stored.
pub fn match_case(input: &str, substitution: &str) -> SmolStr {
    if !starts_upper(input) {
        return substitution.into();
    }

    if input.chars().nth(1).is_some() && is_all_caps(input) {
        upper_case(substitution)
    } else {
        upper_first(substitution)
    }
}

fn mixed_case_word_variants(word: &str) -> Vec<SmolStr> {
    // A mixed-case word is known if it is known exactly as given or with the
    // initial letter flipped, but never merely because its lowercase form is.
    let mut words = vec![SmolStr::new(word)];
    if is_first_caps(word) {
        words.push(lower_first(word));
    } else {
        let upper = upper_first(word);
        // Edge case of "sOMETHING"
        if !is_all_caps(&upper) {
            words.push(upper);
        }
    }
    words
}

/// Spellings under which a typed word may have been learned: as typed, the
/// title-cased form of an all-caps word, and lowercase.
pub fn word_variants(word: &str) -> Vec<SmolStr> {
    if is_mixed_case(word) {
        return mixed_case_word_variants(word);
    }

    let word = SmolStr::new(word);
    let title = Some(&word)
        .filter(|x| is_all_caps(x))
        .map(|x| upper_first(&lower_case(x)));

    std::iter::once(word.clone())
        .chain(title)
        .chain(std::iter::once(lower_case(&word)))
        .unique()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortcut_case() {
        assert_eq!(match_case("CANT", "can't"), "CAN'T");
        assert_eq!(match_case("Cant", "can't"), "Can't");
        assert_eq!(match_case("cant", "can't"), "can't");
        assert_eq!(match_case("BRB", "be right back"), "BE RIGHT BACK");
        assert_eq!(match_case("Brb", "be right back"), "Be right back");
        assert_eq!(match_case("U", "you"), "You");
        assert_eq!(match_case("i", "I"), "I");
        assert_eq!(match_case("'cause", "because"), "because");
    }

    #[test]
    fn variants() {
        assert_eq!(word_variants("OULU"), vec!["OULU", "Oulu", "oulu"]);
        assert_eq!(word_variants("Oulu"), vec!["Oulu", "oulu"]);
        assert_eq!(word_variants("oulu"), vec!["oulu"]);
        assert_eq!(word_variants("McDonald"), vec!["McDonald", "mcDonald"]);
        assert_eq!(word_variants("mcDonald"), vec!["mcDonald", "McDonald"]);
    }

    #[test]
    fn mixed_case() {
        assert_eq!(is_mixed_case("McDonald"), true);
        assert_eq!(is_mixed_case("Mcdonald"), false);
        assert_eq!(is_mixed_case("McDoNaLd"), true);
        assert_eq!(is_mixed_case("MCDONALD"), false);
        assert_eq!(is_mixed_case("mcDonald"), true);
        assert_eq!(is_mixed_case("mcdonald"), false);

        assert_eq!(is_mixed_case("ab"), false);
        assert_eq!(is_mixed_case("aB"), true);
        assert_eq!(is_mixed_case("Ab"), false);
        assert_eq!(is_mixed_case("AB"), false);

        assert_eq!(is_mixed_case("A"), false);
        assert_eq!(is_mixed_case(":"), false);
        assert_eq!(is_mixed_case("DavveVássján"), true);
        assert_eq!(is_mixed_case("Davvevássján"), false);

        assert_eq!(is_mixed_case("SGPai"), false);
        assert_eq!(is_mixed_case("SgPaI"), true);
        assert_eq!(is_mixed_case("sgpAI"), true);
    }
}

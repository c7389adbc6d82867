//! String helpers: case conversion, ordinals, pluralization, names,
//! e-mail and phone validation.
//!
//! All functions are pure.

use std::sync::LazyLock;

use phonenumber::Mode;
use regex::Regex;
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

// First pass: anything before a CapLower gets separated (`ABCWord` -> `ABC_Word`).
static CAMEL_FIRST_PASS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"(.)([A-Z][a-z]+)").unwrap()
});

// Second pass: lowerCap -> lower_Cap.
static CAMEL_SECOND_PASS: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"([a-z0-9])([A-Z])").unwrap()
});

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(concat!(
        r"(?i)^(?:",
        // dot-atom
        r"[-!#$%&'*+/=?^_`{}|~0-9A-Z]+(?:\.[-!#$%&'*+/=?^_`{}|~0-9A-Z]+)*",
        // quoted-string
        r#"|"(?:[\x01-\x08\x0B\x0C\x0E-\x1F!#-\[\]-\x7F]|\\[\x01-\x09\x0B\x0C\x0E-\x7F])*""#,
        r")@(?:[A-Z0-9](?:[A-Z0-9-]{0,61}[A-Z0-9])?\.)+[A-Z]{2,63}\.?$",
    ))
    .unwrap()
});

/// `CamelCase` -> `camel_case`.
pub fn camel_to_underscore(text: &str) -> String {
    let first = CAMEL_FIRST_PASS.replace_all(text, "${1}_${2}");
    CAMEL_SECOND_PASS
        .replace_all(&first, "${1}_${2}")
        .to_lowercase()
}

/// `snake_case` -> `SnakeCase`.
pub fn underscore_to_camel(text: &str) -> String {
    text.split('_').map(capitalize).collect()
}

fn capitalize(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Ordinal suffix of an integer: `st`, `nd`, `rd` or `th`.
pub fn ordinal_suffix(num: i64) -> &'static str {
    let n = num.unsigned_abs();
    if (10..=20).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Naive English plural: `fox` -> `foxes`, `quiz` -> `quizzes`, `city` -> `cities`.
///
/// Rules are tried in order; the last one always applies.
pub fn pluralize(word: &str) -> String {
    let mut rev = word.chars().rev();
    let last = rev.next();
    let before = rev.next();

    let is_vowel = |c: char| "aeiou".contains(c);

    match (before, last) {
        (Some(b), Some('z')) if !is_vowel(b) && b != 'z' => format!("{word}s"),
        (Some(b), Some('z')) if is_vowel(b) => format!("{word}zes"),
        (_, Some('s' | 'x')) => format!("{word}es"),
        (Some(b), Some('h')) if !"aeioudgkprt".contains(b) => format!("{word}es"),
        (Some(b), Some('y')) if !is_vowel(b) => {
            format!("{}ies", &word[..word.len() - 1])
        }
        _ => format!("{word}s"),
    }
}

/// Drop diacritics (`français` -> `francais`).
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Split a full name into first name and the rest.
///
/// `"Mary Ann Smith"` -> `(Some("Mary"), Some("Ann Smith"))`,
/// `"Cher"` -> `(Some("Cher"), None)`, blank -> `(None, None)`.
pub fn split_full_name(full_name: &str) -> (Option<String>, Option<String>) {
    let mut names = full_name.split_whitespace();
    let Some(first) = names.next() else {
        return (None, None);
    };
    let rest = names.collect::<Vec<_>>().join(" ");
    let last = (!rest.is_empty()).then_some(rest);
    (Some(first.to_string()), last)
}

/// Join first and last name, skipping whichever is missing.
pub fn display_name(first_name: Option<&str>, last_name: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [first_name, last_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

pub fn valid_email(email: &str) -> bool {
    !email.is_empty() && EMAIL.is_match(email)
}

const DEFAULT_COUNTRY_PREFIX: &str = "+1";

/// Valid international number; the country code (`+...`) is required.
pub fn valid_phone_number(phone_number: &str) -> bool {
    phonenumber::parse(None, phone_number).is_ok_and(|number| phonenumber::is_valid(&number))
}

/// Normalize to E.164 (`+15551234567`). Numbers without a country code are
/// taken as North American. `None` when the number is not valid.
pub fn format_phone_number(phone_number: &str) -> Option<String> {
    let number = phonenumber::parse(None, phone_number)
        .or_else(|_| phonenumber::parse(None, format!("{DEFAULT_COUNTRY_PREFIX}{phone_number}")))
        .ok()?;
    phonenumber::is_valid(&number).then(|| number.format().mode(Mode::E164).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camel_case_round_trip() {
        assert_eq!(camel_to_underscore("CamelCase"), "camel_case");
        assert_eq!(camel_to_underscore("HTTPResponseCode"), "http_response_code");
        assert_eq!(camel_to_underscore("version2Beta"), "version2_beta");
        assert_eq!(underscore_to_camel("snake_case_name"), "SnakeCaseName");
        assert_eq!(underscore_to_camel("ALL_CAPS"), "AllCaps");
    }

    #[test]
    fn ordinals() {
        let cases = [
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (11, "th"),
            (12, "th"),
            (20, "th"),
            (21, "st"),
            (102, "nd"),
            (111, "th"),
            (-3, "rd"),
        ];
        for (n, suffix) in cases {
            assert_eq!(ordinal_suffix(n), suffix, "{n}");
        }
    }

    #[test]
    fn plurals() {
        let cases = [
            ("fox", "foxes"),
            ("quiz", "quizzes"),
            ("bus", "buses"),
            ("church", "churches"),
            ("month", "months"),
            ("city", "cities"),
            ("day", "days"),
            ("cat", "cats"),
            ("waltz", "waltzs"),
            ("", "s"),
        ];
        for (word, plural) in cases {
            assert_eq!(pluralize(word), plural, "{word}");
        }
    }

    #[test]
    fn accents() {
        assert_eq!(strip_accents("français"), "francais");
        assert_eq!(strip_accents("Crème Brûlée"), "Creme Brulee");
        assert_eq!(strip_accents("plain"), "plain");
    }

    #[test]
    fn names() {
        assert_eq!(
            split_full_name("  Mary Ann Smith "),
            (Some("Mary".to_string()), Some("Ann Smith".to_string()))
        );
        assert_eq!(
            split_full_name("Jim Myers"),
            (Some("Jim".to_string()), Some("Myers".to_string()))
        );
        assert_eq!(split_full_name("Cher"), (Some("Cher".to_string()), None));
        assert_eq!(split_full_name("   "), (None, None));

        assert_eq!(display_name(Some("Jim"), Some("Myers")).as_deref(), Some("Jim Myers"));
        assert_eq!(display_name(None, Some("Myers")).as_deref(), Some("Myers"));
        assert_eq!(display_name(Some(" "), None), None);
    }

    #[test]
    fn emails() {
        assert!(valid_email("jim@example.com"));
        assert!(valid_email("First.Last+tag@Sub.Example.ORG"));
        assert!(valid_email(r#""john..doe"@example.com"#));
        assert!(!valid_email(r#""john doe"@example.com"#));
        assert!(!valid_email(""));
        assert!(!valid_email("no-at-sign"));
        assert!(!valid_email("a@b"));
        assert!(!valid_email("a..b@example.com"));
        assert!(!valid_email("a@-example.com"));
    }

    #[test]
    fn phone_validation_requires_country_code() {
        assert!(valid_phone_number("+1 201-555-0123"));
        assert!(valid_phone_number("+44 121 234 5678"));
        assert!(!valid_phone_number("201 555 0123"));
        assert!(!valid_phone_number("+1 015 555 2671"));
        assert!(!valid_phone_number("+1 555"));
        assert!(!valid_phone_number("call me"));
    }

    #[test]
    fn phone_validation_uses_numbering_plans() {
        // No country is assigned +999.
        assert!(!valid_phone_number("+999 1234 5678"));
        // No UK range starts with 9999.
        assert!(!valid_phone_number("+44 9999 9999"));
        assert_eq!(format_phone_number("+999 1234 5678"), None);
        assert_eq!(format_phone_number("+44 9999 9999"), None);
    }

    #[test]
    fn phone_formatting() {
        assert_eq!(format_phone_number("(201) 555-0123").as_deref(), Some("+12015550123"));
        assert_eq!(format_phone_number("+44 121 234 5678").as_deref(), Some("+441212345678"));
        assert_eq!(format_phone_number("555-2671"), None);
        assert_eq!(format_phone_number("not a number"), None);
    }
}

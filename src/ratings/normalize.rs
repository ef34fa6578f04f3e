//! Subject-name normalization shared by the rating file and the portal records.

use unicode_normalization::UnicodeNormalization;

/// Separator between the subject and professor parts of a rating key.
pub const KEY_SEPARATOR: char = '|';

/// Canonical form of a subject name for rating lookups.
///
/// Composes to NFC, drops all whitespace, spells the Roman numeral glyphs
/// Ⅰ-Ⅳ with Latin letters, then maps every ASCII `1` to `I`.
///
/// ```
/// use knu_courses::ratings::normalize::normalize_subject;
///
/// assert_eq!(normalize_subject("공학설계Ⅰ"), normalize_subject("공학설계I"));
/// assert_eq!(normalize_subject("자료구조1"), "자료구조I");
/// assert_eq!(normalize_subject("고급 프로그래밍 Ⅳ"), "고급프로그래밍IV");
/// ```
pub fn normalize_subject(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.nfc().filter(|c| !c.is_whitespace()) {
        match c {
            'Ⅰ' | '1' => out.push('I'),
            'Ⅱ' => out.push_str("II"),
            'Ⅲ' => out.push_str("III"),
            'Ⅳ' => out.push_str("IV"),
            other => out.push(other),
        }
    }
    out
}

/// Lookup key for a (subject, professor) pair.
///
/// Only the subject is normalized; the professor is used exactly as given.
pub fn rating_key(subject: &str, professor: &str) -> String {
    let mut key = normalize_subject(subject);
    key.push(KEY_SEPARATOR);
    key.push_str(professor);
    key
}

//! CNPJ display formatting.

/// Number of digits in a complete CNPJ.
pub const CNPJ_LEN: usize = 14;

/// Keep only the ASCII digits of `input`.
pub fn digits_only(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Format a CNPJ for display as `XX.XXX.XXX/XXXX-XX`.
///
/// Punctuation in the input is ignored and at most the first 14 digits are
/// used. When fewer than 14 digits remain the bare digits are returned
/// unpunctuated. Empty or absent input yields an empty string.
pub fn format_cnpj<'a>(cnpj: impl Into<Option<&'a str>>) -> String {
    let Some(cnpj) = cnpj.into().filter(|s| !s.is_empty()) else {
        return String::new();
    };

    let mut digits = digits_only(cnpj);
    digits.truncate(CNPJ_LEN);
    if digits.len() != CNPJ_LEN {
        return digits;
    }

    format!(
        "{}.{}.{}/{}-{}",
        &digits[0..2],
        &digits[2..5],
        &digits[5..8],
        &digits[8..12],
        &digits[12..14]
    )
}

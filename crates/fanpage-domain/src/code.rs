//! Approval code generation and normalization.

use rand::RngExt;

/// Symbols an approval code is drawn from.
///
/// Upper-case only, without the look-alike pairs `0/O` and `1/I`, so a code read
/// aloud or copied from an email survives being retyped.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Approval code length in characters (32^10 possible codes).
pub const CODE_LEN: usize = 10;

/// Number of trailing characters left visible by [`code_hint`].
const HINT_VISIBLE: usize = 3;

/// Generate a fresh approval code.
///
/// ```
/// use fanpage_domain::code::{CODE_LEN, generate_code, normalize_code};
///
/// let code = generate_code();
/// assert_eq!(code.len(), CODE_LEN);
/// assert_eq!(normalize_code(&code.to_lowercase()), Some(code));
/// ```
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Canonicalize user input into the stored code form.
///
/// Trims surrounding whitespace and upper-cases. Returns `None` when the result
/// cannot be a code this service issued (wrong length or foreign symbols).
pub fn normalize_code(input: &str) -> Option<String> {
    let code = input.trim().to_ascii_uppercase();
    if code.len() != CODE_LEN {
        return None;
    }
    if !code.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
        return None;
    }
    Some(code)
}

/// Masked form of a code for audit listings, e.g. `*******K7Q`.
pub fn code_hint(code: &str) -> String {
    let chars: Vec<char> = code.chars().collect();
    let visible = chars.len().min(HINT_VISIBLE);
    let hidden = chars.len() - visible;
    let mut hint = "*".repeat(hidden);
    hint.extend(&chars[hidden..]);
    hint
}

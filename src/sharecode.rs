//! Six-character codes people relay out loud or over chat to join an event.

use lazy_static::lazy_static;
use rand::Rng;
use regex::Regex;

/// Excludes the lookalikes 0, O, I and 1.
const CHARS: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

pub const CODE_LEN: usize = 6;

lazy_static! {
    static ref CODE_PATTERN: Regex = Regex::new("^[A-Z2-9]{6}$").expect("valid regex");
}

/// Draws a fresh code with independent uniform character picks. Not
/// cryptographically secure; uniqueness is enforced against the store at
/// allocation time, not here.
pub fn generate_share_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LEN)
        .map(|_| CHARS[rng.gen_range(0..CHARS.len())] as char)
        .collect()
}

/// Checks the wire format. Callers uppercase user input before lookups.
pub fn is_valid_share_code(code: &str) -> bool {
    CODE_PATTERN.is_match(code)
}

//! Identifier and access key generation for new bots.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use rand::{Rng, RngCore};

/// Prefix of every bot hash.
const HASH_PREFIX: &str = "bot_";
/// Prefix of every display name.
const NAME_PREFIX: &str = "Bot_";
/// Random suffix of a hash is drawn from `0..HASH_RANDOM_BOUND`.
const HASH_RANDOM_BOUND: u32 = 10_000;
/// Bytes of entropy in an access key.
const KEY_RANDOM_BYTES: usize = 32;

/// Generate a public bot hash: `bot_<millis>_<0..9999>`.
///
/// Collision-resistant, not collision-proof.
pub fn new_identifier() -> String {
    let suffix = rand::rng().random_range(0..HASH_RANDOM_BOUND);
    format!("{}{}_{}", HASH_PREFIX, now_millis(), suffix)
}

/// Generate a secret access key: base64url of 32 random bytes, `_`, base-36 millis.
pub fn new_access_key() -> String {
    let mut bytes = [0u8; KEY_RANDOM_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    format!("{}_{}", URL_SAFE_NO_PAD.encode(bytes), to_base36(now_millis()))
}

/// Display name for a bot created now.
pub fn new_display_name() -> String {
    format!("{}{}", NAME_PREFIX, now_millis())
}

fn now_millis() -> u64 {
    u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default()
}

/// Lowercase base-36 rendering.
fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8(out).unwrap_or_default()
}

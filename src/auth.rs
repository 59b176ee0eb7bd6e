//! Passcode verification with HMAC-SHA256.
//!
//! The configured passcode is not kept in the panel.  At construction a
//! per-instance key is drawn from the OS RNG (`getrandom`) and only
//! `HMAC-SHA256(key, passcode)` is stored.  Entered codes are MAC'd under the same key and compared
//! with `hmac_sha256::HMAC::verify`, which runs in constant time.

use hmac_sha256::HMAC;
use log::error;

pub struct PasscodeVerifier {
    key: [u8; 32],
    tag: [u8; 32],
}

impl PasscodeVerifier {
    pub fn new(passcode: &str) -> Self {
        let key = random_key();
        let tag = HMAC::mac(passcode.as_bytes(), key);
        Self { key, tag }
    }

    /// `true` when `entered` equals the configured passcode.
    pub fn matches(&self, entered: &str) -> bool {
        HMAC::verify(entered.as_bytes(), self.key, &self.tag)
    }
}

impl core::fmt::Debug for PasscodeVerifier {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasscodeVerifier(<redacted>)")
    }
}

// ── Key generation ───────────────────────────────────────────

/// Draw a 32-byte key from the OS RNG.
fn random_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    match getrandom::fill(&mut key) {
        Ok(()) => key,
        Err(e) => {
            error!("OS RNG unavailable ({}), passcode key is not cryptographic", e);
            fallback_key()
        }
    }
}

/// Non-cryptographic entropy from `RandomState`'s per-process seed.  Only
/// used when the OS RNG fails; the MAC still verifies correctly, the key is
/// just guessable.
fn fallback_key() -> [u8; 32] {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hasher};

    let mut buf = [0u8; 32];
    for chunk in buf.chunks_mut(8) {
        let val = RandomState::new().build_hasher().finish().to_le_bytes();
        chunk.copy_from_slice(&val[..chunk.len()]);
    }
    buf
}

// Cryptographic utilities for generating secure tokens and nonces

use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;

/// Generate a cryptographically secure CSRF token
///
/// 24 bytes (192 bits) of entropy, base64url-encoded to 32 characters.
#[must_use]
pub fn generate_csrf_token() -> String {
    let mut nonce = [0u8; 24];
    rand::rng().fill_bytes(&mut nonce);
    general_purpose::URL_SAFE_NO_PAD.encode(nonce)
}

/// Generate a cryptographically secure nonce of the specified byte length,
/// base64url-encoded.
#[must_use]
pub fn generate_nonce(length: usize) -> String {
    let mut nonce = vec![0u8; length];
    rand::rng().fill_bytes(&mut nonce);
    general_purpose::URL_SAFE_NO_PAD.encode(nonce)
}

//! `v0` request signatures: `v0=` + hex(HMAC-SHA256(secret, "v0:" + timestamp + ":" + body)).

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use tracing::debug;

type HmacSha256 = Hmac<Sha256>;

/// Signature version prefix.
pub const SIGNATURE_VERSION: &str = "v0";

/// Compute the `X-Slack-Signature` value for a request.
///
/// `timestamp` is used verbatim and `body` byte for byte; nothing is
/// re-encoded, so leading zeros and non-UTF-8 bytes are significant.
pub fn sign(secret: &[u8], timestamp: &str, body: &[u8]) -> Result<String, InvalidLength> {
    let mut mac = HmacSha256::new_from_slice(secret)?;
    mac.update(SIGNATURE_VERSION.as_bytes());
    mac.update(b":");
    mac.update(timestamp.as_bytes());
    mac.update(b":");
    mac.update(body);
    let digest = mac.finalize().into_bytes();
    Ok(format!("{}={}", SIGNATURE_VERSION, hex::encode(digest)))
}

/// Check a supplied `X-Slack-Signature` against the one computed from the request.
pub fn verify(secret: &[u8], timestamp: &str, body: &[u8], supplied: &str) -> bool {
    let Ok(expected) = sign(secret, timestamp, body) else {
        return false;
    };
    let valid = constant_time_eq(expected.as_bytes(), supplied.as_bytes());
    if !valid {
        debug!("[Slack] Signature mismatch");
    }
    valid
}

/// Byte equality whose running time depends only on the longer input's length.
///
/// Both inputs are padded to a common length with distinct fill bytes, so a
/// length mismatch is detected without returning early.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    let max_len = a.len().max(b.len());
    let mut a_padded = vec![0u8; max_len];
    let mut b_padded = vec![0xFFu8; max_len];
    a_padded[..a.len()].copy_from_slice(a);
    b_padded[..b.len()].copy_from_slice(b);

    let lengths_equal = (a.len() as u64).ct_eq(&(b.len() as u64));
    let contents_equal = a_padded.ct_eq(&b_padded);
    (lengths_equal & contents_equal).into()
}

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

/// Content identity of an upload: base64 (no padding) SHA-256 of the raw bytes.
///
/// Byte-identical uploads share a fingerprint regardless of file name, so the
/// loader can reuse a previously validated dataset.
pub fn content_fingerprint(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    STANDARD_NO_PAD.encode(digest)
}

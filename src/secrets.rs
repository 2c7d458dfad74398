use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use rand::RngCore;
use rand::rngs::OsRng;

/// Alphabet used to encode a generated secret.
///
/// `UrlSafe` is for values that end up inside connection strings
/// or environment files where `+` and `/` cause trouble.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Standard,
    UrlSafe,
}

/// Generate `n` bytes from the OS secure random source, encoded
/// with the requested alphabet. The encoded string always decodes
/// back to exactly `n` bytes.
#[must_use]
pub fn generate(n: usize, encoding: Encoding) -> String {
    let mut bytes = vec![0u8; n];
    OsRng.fill_bytes(&mut bytes);
    match encoding {
        Encoding::Standard => STANDARD.encode(&bytes),
        Encoding::UrlSafe => URL_SAFE_NO_PAD.encode(&bytes),
    }
}

/// The full set of secrets one instance needs, generated once at
/// provisioning time and embedded into the settings document.
#[derive(Debug, Clone)]
pub struct StackSecrets {
    pub postgres_password: String,
    pub minio_user: String,
    pub minio_password: String,
    pub jwt_secret: String,
    pub encryption_key: String,
    pub hash_key: String,
}

impl StackSecrets {
    /// Generate a fresh secret set. Key lengths follow what the
    /// application server expects: a 32-byte encryption key and a
    /// 64-byte hash key, both standard base64; everything that is
    /// interpolated into URLs or env blocks is URL-safe.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            postgres_password: generate(24, Encoding::UrlSafe),
            minio_user: generate(12, Encoding::UrlSafe),
            minio_password: generate(24, Encoding::UrlSafe),
            jwt_secret: generate(44, Encoding::UrlSafe),
            encryption_key: generate(32, Encoding::Standard),
            hash_key: generate(64, Encoding::Standard),
        }
    }
}

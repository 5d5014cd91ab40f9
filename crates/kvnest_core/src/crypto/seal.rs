//! Sealing the master key under a padlock.

use super::key::{MasterKey, KEY_SIZE};
use crate::error::{CoreError, CoreResult};
use aes_gcm::{
    aead::{generic_array::GenericArray, Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use hkdf::Hkdf;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroize;

/// Size of the GCM nonce in bytes.
pub const NONCE_SIZE: usize = 12;
/// Size of the GCM authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

const HKDF_INFO: &[u8] = b"kvnest-padlock-v1";

/// Wraps and unwraps a [`MasterKey`] with a key derived from a padlock.
///
/// Sealed format: `nonce (12 bytes) || ciphertext || tag (16 bytes)`.
/// GCM authentication is what detects a wrong padlock.
pub struct PadlockSealer {
    cipher: Aes256Gcm,
}

impl PadlockSealer {
    /// Derives the wrapping key from `padlock` and `salt` using HKDF-SHA256.
    ///
    /// An empty padlock is valid input key material, so "no secret" is
    /// just another secret.
    ///
    /// # Security Note
    ///
    /// HKDF is not a password hash. Low-entropy padlocks get no stretching.
    pub fn derive(padlock: &[u8], salt: &[u8]) -> CoreResult<Self> {
        let hk = Hkdf::<Sha256>::new(Some(salt), padlock);

        let mut bytes = [0u8; KEY_SIZE];
        hk.expand(HKDF_INFO, &mut bytes)
            .map_err(|_| CoreError::key_derivation_failed("HKDF expand failed"))?;

        let cipher = Aes256Gcm::new(GenericArray::from_slice(&bytes));
        bytes.zeroize();
        Ok(Self { cipher })
    }

    /// Seals `key`, prepending a random nonce.
    pub fn seal(&self, key: &MasterKey) -> CoreResult<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, key.as_bytes().as_slice())
            .map_err(|_| CoreError::encryption_failed("sealing master key"))?;

        let mut sealed = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend(ciphertext);
        Ok(sealed)
    }

    /// Recovers a key sealed by [`seal`](Self::seal).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::BadPadlock`] if authentication fails, which
    /// happens whenever the padlock differs from the one used to seal.
    pub fn unseal(&self, sealed: &[u8]) -> CoreResult<MasterKey> {
        if sealed.len() < NONCE_SIZE + TAG_SIZE {
            return Err(CoreError::invalid_lock_state("sealed key too short"));
        }

        let nonce = Nonce::from_slice(&sealed[..NONCE_SIZE]);
        let mut plaintext = self
            .cipher
            .decrypt(nonce, &sealed[NONCE_SIZE..])
            .map_err(|_| CoreError::BadPadlock)?;

        let key = MasterKey::from_bytes(&plaintext);
        plaintext.zeroize();
        key
    }
}

impl std::fmt::Debug for PadlockSealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PadlockSealer")
            .field("cipher", &"Aes256Gcm")
            .finish()
    }
}

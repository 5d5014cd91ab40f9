//! Per-value stream cipher.

use super::key::MasterKey;
use crate::error::{CoreError, CoreResult};
use aes::Aes256;
use cfb_mode::cipher::{AsyncStreamCipher, KeyIvInit};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

type Aes256CfbEnc = cfb_mode::Encryptor<Aes256>;
type Aes256CfbDec = cfb_mode::Decryptor<Aes256>;

/// Size of the CFB initialisation vector in bytes.
pub const IV_SIZE: usize = 16;

/// AES-256-CFB cipher applied to encrypted records.
///
/// The cipher key is SHA-256 of the master key and the IV is the first
/// [`IV_SIZE`] bytes of SHA-256 of the cipher key. Output length always
/// equals input length.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ValueCipher {
    key: [u8; 32],
    iv: [u8; IV_SIZE],
}

impl ValueCipher {
    /// Derives the value cipher for `master`.
    #[must_use]
    pub fn new(master: &MasterKey) -> Self {
        let mut key = [0u8; 32];
        key.copy_from_slice(&Sha256::digest(master.as_bytes()));

        let mut iv = [0u8; IV_SIZE];
        iv.copy_from_slice(&Sha256::digest(key)[..IV_SIZE]);

        Self { key, iv }
    }

    /// Encrypts `plaintext`.
    pub fn encrypt(&self, plaintext: &[u8]) -> CoreResult<Vec<u8>> {
        let mut buf = plaintext.to_vec();
        Aes256CfbEnc::new_from_slices(&self.key, &self.iv)
            .map_err(|_| CoreError::encryption_failed("invalid key or IV length"))?
            .encrypt(&mut buf);
        Ok(buf)
    }

    /// Decrypts data produced by [`encrypt`](Self::encrypt).
    ///
    /// CFB carries no authentication tag: a wrong key yields garbage, which
    /// the CBOR decoder then rejects.
    pub fn decrypt(&self, ciphertext: &[u8]) -> CoreResult<Vec<u8>> {
        let mut buf = ciphertext.to_vec();
        Aes256CfbDec::new_from_slices(&self.key, &self.iv)
            .map_err(|_| CoreError::decryption_failed("invalid key or IV length"))?
            .decrypt(&mut buf);
        Ok(buf)
    }
}

impl std::fmt::Debug for ValueCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueCipher")
            .field("cipher", &"Aes256Cfb")
            .finish()
    }
}

// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: MIT-0

//! AES-256-GCM encryption of cache file contents.
//!
//! # Wire Format
//!
//! ```text
//! +------------------+---------------------+------------------+
//! | Nonce (12 bytes) | Ciphertext (N bytes) | Tag (16 bytes)   |
//! +------------------+---------------------+------------------+
//! ```
//!
//! There is no header or version byte. A fresh random nonce is drawn for every
//! encryption, so the same plaintext never produces the same file twice.

use aws_lc_rs::aead::{AES_256_GCM, Aad, LessSafeKey, Nonce, UnboundKey};
use aws_lc_rs::rand::{SecureRandom, SystemRandom};

use crate::constants::NONCE_LEN;
use crate::errors::CipherError;
use crate::keys::CipherKey;

/// AES-256-GCM cipher bound to a single [`CipherKey`].
pub struct AesGcm {
    key: LessSafeKey,
    rng: SystemRandom,
}

impl AesGcm {
    /// Builds a cipher from a 32-byte key.
    ///
    /// # Errors
    ///
    /// [`CipherError::Construction`] if the AEAD key cannot be initialized,
    /// which does not happen for a correctly sized key.
    pub fn new(key: &CipherKey) -> Result<Self, CipherError> {
        let unbound =
            UnboundKey::new(&AES_256_GCM, key.expose()).map_err(|_| CipherError::Construction)?;

        Ok(Self {
            key: LessSafeKey::new(unbound),
            rng: SystemRandom::new(),
        })
    }

    /// Encrypts `plaintext`, returning `nonce || ciphertext || tag`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| CipherError::Nonce)?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut in_out = plaintext.to_vec();
        self.key
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| CipherError::Seal)?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);

        Ok(sealed)
    }

    /// Decrypts `nonce || ciphertext || tag` produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// - [`CipherError::TooShort`] if the input cannot even hold a nonce
    /// - [`CipherError::Authentication`] if the data were tampered with or
    ///   encrypted under another key. No plaintext is returned in that case.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        if ciphertext.len() < NONCE_LEN {
            return Err(CipherError::TooShort(ciphertext.len()));
        }

        let (nonce_bytes, sealed) = ciphertext.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| CipherError::TooShort(ciphertext.len()))?;

        let mut in_out = sealed.to_vec();
        let plaintext_len = self
            .key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| CipherError::Authentication)?
            .len();
        in_out.truncate(plaintext_len);

        Ok(in_out)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::constants::TAG_LEN;
    use proptest::prelude::*;

    fn cipher(fill: u8) -> AesGcm {
        AesGcm::new(&CipherKey::new([fill; 32])).unwrap()
    }

    #[test]
    fn test_encrypt_layout() {
        let plaintext = b"{\"Version\":1}";
        let sealed = cipher(7).encrypt(plaintext).unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + plaintext.len() + TAG_LEN);
    }

    #[test]
    fn test_decrypt_inverts_encrypt() {
        let c = cipher(7);
        let sealed = c.encrypt(b"hello").unwrap();
        assert_eq!(c.decrypt(&sealed).unwrap(), b"hello");
    }

    #[test]
    fn test_empty_plaintext() {
        let c = cipher(7);
        let sealed = c.encrypt(b"").unwrap();
        assert_eq!(sealed.len(), NONCE_LEN + TAG_LEN);
        assert!(c.decrypt(&sealed).unwrap().is_empty());
    }

    #[test]
    fn test_fresh_nonce_per_encryption() {
        let c = cipher(7);
        let first = c.encrypt(b"same").unwrap();
        let second = c.encrypt(b"same").unwrap();
        assert_ne!(first[..NONCE_LEN], second[..NONCE_LEN]);
        assert_ne!(first, second);
    }

    #[test]
    fn test_decrypt_too_short() {
        let c = cipher(7);
        assert_eq!(c.decrypt(&[0u8; 8]).unwrap_err(), CipherError::TooShort(8));
        assert_eq!(c.decrypt(&[]).unwrap_err(), CipherError::TooShort(0));
    }

    #[test]
    fn test_decrypt_nonce_only() {
        let c = cipher(7);
        assert_eq!(
            c.decrypt(&[0u8; NONCE_LEN]).unwrap_err(),
            CipherError::Authentication
        );
    }

    #[test]
    fn test_decrypt_with_wrong_key() {
        let sealed = cipher(7).encrypt(b"hello").unwrap();
        assert_eq!(
            cipher(8).decrypt(&sealed).unwrap_err(),
            CipherError::Authentication
        );
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_any_flipped_byte_fails_authentication(
            plaintext in prop::collection::vec(any::<u8>(), 0..256),
            position in any::<prop::sample::Index>(),
            mask in 1u8..=255,
        ) {
            let c = cipher(42);
            let mut sealed = c.encrypt(&plaintext).unwrap();
            let idx = position.index(sealed.len());
            sealed[idx] ^= mask;

            prop_assert_eq!(c.decrypt(&sealed).unwrap_err(), CipherError::Authentication);
        }

        #[test]
        fn prop_decrypt_inverts_encrypt(plaintext in prop::collection::vec(any::<u8>(), 0..512)) {
            let c = cipher(42);
            let sealed = c.encrypt(&plaintext).unwrap();
            prop_assert_eq!(c.decrypt(&sealed).unwrap(), plaintext);
        }
    }
}

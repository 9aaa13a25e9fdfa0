//! Deterministic wallet-key derivation from a symmetric key and a
//! user secret.

use aes::Aes256;
use ctr::cipher::{KeyIvInit, StreamCipher};
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha256};
use sha3::Keccak256;
use std::fmt;
use thiserror::Error;
use zeroize::Zeroize;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("secret must not be empty")]
    InvalidSecret,
    #[error("derived scalar is not a valid secp256k1 key")]
    InvalidScalar,
}

/// A session wallet key: private scalar plus its EIP-55 address.
///
/// The private key is `0x`-prefixed lowercase hex, wiped on drop.
#[derive(Clone)]
pub struct WalletKey {
    private_key: String,
    address: String,
}

impl WalletKey {
    /// `0x`-prefixed lowercase hex private key.
    pub fn private_key(&self) -> &str {
        &self.private_key
    }

    /// EIP-55 checksummed account address.
    pub fn address(&self) -> &str {
        &self.address
    }
}

impl fmt::Debug for WalletKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletKey")
            .field("address", &self.address)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

impl Drop for WalletKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}

/// Derive a wallet key from the extracted symmetric key and a secret.
///
/// Pure: the same `(symmetric_key, secret)` pair always yields the
/// same wallet key. The symmetric key is stream-encrypted under
/// `SHA-256(secret)` with a zero IV, then the ciphertext is hashed to
/// the private scalar.
///
/// The zero IV is sound only because each symmetric key is freshly
/// random and each (key, secret) keystream is used exactly once. Any
/// extension that re-encrypts a reused key under multiple secrets
/// concurrently must introduce an explicit nonce first.
///
/// # Errors
/// `InvalidSecret` for an empty secret (policy, not cryptography);
/// `InvalidScalar` in the negligible case that the hashed ciphertext
/// falls outside the secp256k1 scalar range.
pub fn derive_wallet(symmetric_key: &[u8], secret: &str) -> Result<WalletKey, WalletError> {
    if secret.is_empty() {
        return Err(WalletError::InvalidSecret);
    }

    let cipher_key = Sha256::digest(secret.as_bytes());
    let iv = [0u8; 16];

    let mut ciphertext = symmetric_key.to_vec();
    let mut ctr = Aes256Ctr::new(&cipher_key, &iv.into());
    ctr.apply_keystream(&mut ciphertext);

    let mut scalar: [u8; 32] = Sha256::digest(&ciphertext).into();
    ciphertext.zeroize();

    let secret_key = SecretKey::from_slice(&scalar).map_err(|_| {
        scalar.zeroize();
        WalletError::InvalidScalar
    })?;

    let secp = Secp256k1::new();
    let public_key = PublicKey::from_secret_key(&secp, &secret_key);
    let uncompressed = public_key.serialize_uncompressed();

    // Ethereum addressing: Keccak-256 over the 64-byte public key
    // (without the 0x04 prefix), keep the low 20 bytes.
    let hash = Keccak256::digest(&uncompressed[1..]);
    let address = to_eip55_address(&hash[12..]);

    let private_key = format!("0x{}", hex::encode(scalar));
    scalar.zeroize();

    Ok(WalletKey {
        private_key,
        address,
    })
}

/// EIP-55 mixed-case checksum encoding of a 20-byte address.
pub fn to_eip55_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(2 + lower.len());
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (4 * (1 - i % 2))) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

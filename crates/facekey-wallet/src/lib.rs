//! FaceKey Wallet
//!
//! Turns the fuzzy extractor's symmetric key plus a user secret into a
//! secp256k1 wallet key and Ethereum-style address, and orchestrates
//! the registration / login flows on top of it.
//!
//! # Derivation
//!
//! ```text
//! ciphertext = AES-256-CTR(key = SHA-256(secret), iv = 0)(symmetric key)
//! scalar     = SHA-256(ciphertext)
//! address    = EIP-55(Keccak-256(pubkey)[12..])
//! ```
//!
//! The derived private key lives only for the signing session and is
//! wiped on drop. Nothing in this crate talks to a chain: transaction
//! construction and signing against the account contract happen behind
//! the [`AccountGateway`] seam.

pub mod account;
pub mod derive;
pub mod pipeline;

pub use account::{AccountGateway, AccountRecord, GatewayError, TransactionRequest};
pub use derive::{derive_wallet, WalletError, WalletKey};
pub use pipeline::{AuthError, AuthPipeline, Registration};

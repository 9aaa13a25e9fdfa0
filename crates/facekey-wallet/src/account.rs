//! Seam to the external account system.
//!
//! The backend binds a registration to an on-chain account contract
//! and later relays signed transactions. This module only defines the
//! wire contract the core hands across that boundary — no chain or
//! HTTP logic lives here.

use crate::pipeline::Registration;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("account backend error: {0}")]
    Backend(String),
    #[error("account already exists for signer {0}")]
    DuplicateAccount(String),
}

/// The per-user record the backend persists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Address derived from (key, password); the transaction signer.
    pub signer: String,
    /// Address derived from (key, recovery secret).
    pub recovery_signer: String,
    /// Account contract address assigned by the backend.
    pub contract_address: String,
    /// Serialized helper bundle (JSON).
    pub helper: String,
}

/// Descriptor for a transaction to execute through the account
/// contract. Signing happens caller-side with the derived key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRequest {
    /// Destination address.
    pub to: String,
    /// Value in the chain's base unit.
    pub value: u128,
    /// Optional calldata.
    #[serde(default)]
    pub data: Vec<u8>,
}

/// What the account system must provide.
pub trait AccountGateway {
    /// Bind a registration to a new account contract; returns the
    /// contract address.
    fn create_account(&self, registration: &Registration) -> Result<String, GatewayError>;

    /// Submit a caller-signed transaction; returns a transaction id.
    fn submit_transaction(
        &self,
        contract_address: &str,
        request: &TransactionRequest,
        signature: &[u8],
    ) -> Result<String, GatewayError>;
}

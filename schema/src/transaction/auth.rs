//! Authentication resolution: does a variant carry one `signature` or an
//! ordered list of `proofs`?
//!
//! The rule is a fixed table rather than something inferred from the field
//! layout. Ten legacy kinds sign with a single signature at version 1 only;
//! every later version of those kinds, and every version of every other
//! kind, carries proofs. Exchange orders follow the same shape on their own
//! version axis.
//!
//! The resolver deliberately keeps its own list of known versions instead of
//! asking the catalog, so an unknown pair fails loudly here even if the two
//! tables ever drift apart.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use super::error::SchemaError;
use super::types::TransactionKind;
use crate::config::MAX_PROOFS;

// ---------------------------------------------------------------------------
// AuthMode / Authentication
// ---------------------------------------------------------------------------

/// Which authentication field a variant carries. A tag, not a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    Signature,
    Proofs,
}

impl AuthMode {
    /// Name of the field in the bag.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Signature => "signature",
            Self::Proofs => "proofs",
        }
    }

    /// The field that must *not* appear alongside this one.
    pub fn other(self) -> Self {
        match self {
            Self::Signature => Self::Proofs,
            Self::Proofs => Self::Signature,
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// The authentication attached to a materialized transaction or order.
///
/// Exactly one of the two is present by construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Authentication {
    /// A single base58 signature.
    Signature(String),
    /// Between 0 and 8 base58 proofs, order significant.
    Proofs(Vec<String>),
}

impl Authentication {
    pub fn mode(&self) -> AuthMode {
        match self {
            Self::Signature(_) => AuthMode::Signature,
            Self::Proofs(_) => AuthMode::Proofs,
        }
    }

    /// Returns `true` if the proof count is within protocol limits.
    /// Signatures always are.
    pub fn within_limits(&self) -> bool {
        match self {
            Self::Signature(_) => true,
            Self::Proofs(proofs) => proofs.len() <= MAX_PROOFS,
        }
    }
}

// ---------------------------------------------------------------------------
// Rule tables
// ---------------------------------------------------------------------------

/// Kinds that predate proofs and sign with a single signature at version 1.
const SIGNATURE_AT_V1: [TransactionKind; 10] = [
    TransactionKind::Genesis,
    TransactionKind::Payment,
    TransactionKind::Issue,
    TransactionKind::Transfer,
    TransactionKind::Reissue,
    TransactionKind::Burn,
    TransactionKind::Exchange,
    TransactionKind::Lease,
    TransactionKind::CancelLease,
    TransactionKind::Alias,
];

/// Versions the resolver knows how to authenticate, per kind.
fn known_versions(kind: TransactionKind) -> RangeInclusive<u8> {
    use TransactionKind::*;
    match kind {
        Genesis | Payment | UpdateAssetInfo | Ethereum => 1..=1,
        Issue | Transfer | Reissue | Burn | Exchange | Lease | CancelLease | Alias => 1..=3,
        MassTransfer | Data | SetScript | Sponsorship | SetAssetScript | Invoke => 1..=2,
    }
}

/// Exchange order versions in existence.
const ORDER_VERSIONS: RangeInclusive<u8> = 1..=4;

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Decides which authentication field a `(kind, version)` variant carries.
///
/// # Errors
///
/// [`SchemaError::UnresolvedAuthentication`] if the version is not one the
/// kind ever had. There is no default.
pub fn resolve(kind: TransactionKind, version: u8) -> Result<AuthMode, SchemaError> {
    if !known_versions(kind).contains(&version) {
        return Err(SchemaError::UnresolvedAuthentication {
            type_id: kind.type_id(),
            version,
        });
    }
    if version == 1 && SIGNATURE_AT_V1.contains(&kind) {
        Ok(AuthMode::Signature)
    } else {
        Ok(AuthMode::Proofs)
    }
}

/// Same as [`resolve`] but keyed by the raw wire `type`.
pub fn resolve_type_id(type_id: u8, version: u8) -> Result<AuthMode, SchemaError> {
    let kind = TransactionKind::from_type_id(type_id)
        .ok_or(SchemaError::UnresolvedAuthentication { type_id, version })?;
    resolve(kind, version)
}

/// Authentication for an exchange order: signature at v1, proofs after.
///
/// Order errors reuse the exchange type id in the error payload.
pub fn resolve_order(version: u8) -> Result<AuthMode, SchemaError> {
    if !ORDER_VERSIONS.contains(&version) {
        return Err(SchemaError::UnresolvedAuthentication {
            type_id: TransactionKind::Exchange.type_id(),
            version,
        });
    }
    Ok(if version == 1 {
        AuthMode::Signature
    } else {
        AuthMode::Proofs
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

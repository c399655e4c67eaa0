//! # Schema Constants & Codec Configuration
//!
//! Every protocol limit the validator enforces lives here. Changing any of
//! them changes which transactions the registry accepts, so treat edits as
//! consensus-adjacent even though this crate never touches ledger state.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Transaction Type Identifiers
// ---------------------------------------------------------------------------

pub const GENESIS_TYPE: u8 = 1;
pub const PAYMENT_TYPE: u8 = 2;
pub const ISSUE_TYPE: u8 = 3;
pub const TRANSFER_TYPE: u8 = 4;
pub const REISSUE_TYPE: u8 = 5;
pub const BURN_TYPE: u8 = 6;
pub const EXCHANGE_TYPE: u8 = 7;
pub const LEASE_TYPE: u8 = 8;
pub const CANCEL_LEASE_TYPE: u8 = 9;
pub const ALIAS_TYPE: u8 = 10;
pub const MASS_TRANSFER_TYPE: u8 = 11;
pub const DATA_TYPE: u8 = 12;
pub const SET_SCRIPT_TYPE: u8 = 13;
pub const SPONSORSHIP_TYPE: u8 = 14;
pub const SET_ASSET_SCRIPT_TYPE: u8 = 15;
pub const INVOKE_SCRIPT_TYPE: u8 = 16;
pub const UPDATE_ASSET_INFO_TYPE: u8 = 17;
pub const ETHEREUM_TYPE: u8 = 18;

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

/// Upper bound on the number of entries in a `proofs` array.
pub const MAX_PROOFS: usize = 8;

// ---------------------------------------------------------------------------
// Field Limits
// ---------------------------------------------------------------------------

/// Assets carry between 0 and 8 decimal places inclusive.
pub const MAX_ASSET_DECIMALS: u64 = 8;

/// Maximum number of entries in a single data transaction.
pub const MAX_DATA_ENTRIES: usize = 100;

/// Maximum number of recipients in a single mass transfer.
pub const MAX_MASS_TRANSFERS: usize = 100;

/// Default bound on nested `list` arguments in an invoke call. A top-level
/// list sits at level 1.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 8;

// ---------------------------------------------------------------------------
// Wire Prefixes
// ---------------------------------------------------------------------------

/// Binary values and scripts travel as `base64:<payload>`.
pub const BASE64_PREFIX: &str = "base64:";

/// Alias recipients travel as `alias:<chain char>:<name>`.
pub const ALIAS_PREFIX: &str = "alias:";

/// Ethereum payloads and EIP-712 signatures travel as `0x<hex>`.
pub const HEX_PREFIX: &str = "0x";

// ---------------------------------------------------------------------------
// CodecConfig
// ---------------------------------------------------------------------------

/// Tunable decoder behaviour.
///
/// Defaults accept everything the catalog describes and tolerate unknown
/// fields with a warning. Services that ingest untrusted bags should lower
/// `max_nesting_depth` to whatever their upstream node enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodecConfig {
    /// Deepest `list` nesting level accepted in invoke call arguments.
    pub max_nesting_depth: usize,

    /// Accept `union` call arguments on invoke versions that allow them.
    pub union_arguments: bool,

    /// Reject unexpected fields instead of warning about them.
    pub strict_fields: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            union_arguments: true,
            strict_fields: false,
        }
    }
}

impl CodecConfig {
    /// Returns a copy with a different nesting bound.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Returns a copy with strict field checking toggled.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_fields = strict;
        self
    }
}

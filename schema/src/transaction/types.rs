//! Core value types shared by every transaction variant.
//!
//! These types form the vocabulary of the field bag: the closed set of
//! transaction kinds, the 64-bit `Long` that may travel as a number or a
//! decimal string, and the base58/base64 byte wrappers.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::config::{self, ALIAS_PREFIX, BASE64_PREFIX, HEX_PREFIX};

// ---------------------------------------------------------------------------
// TransactionKind
// ---------------------------------------------------------------------------

/// Discriminant for the functional category of a transaction.
///
/// The set is closed: every transaction on the ledger falls into exactly one
/// of these eighteen kinds, identified on the wire by its numeric `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransactionKind {
    Genesis,
    Payment,
    Issue,
    Transfer,
    Reissue,
    Burn,
    Exchange,
    Lease,
    CancelLease,
    Alias,
    MassTransfer,
    Data,
    SetScript,
    Sponsorship,
    SetAssetScript,
    Invoke,
    UpdateAssetInfo,
    /// An Ethereum-format transaction wrapped for the ledger.
    Ethereum,
}

impl TransactionKind {
    /// Every kind, in type-id order.
    pub const ALL: [TransactionKind; 18] = [
        Self::Genesis,
        Self::Payment,
        Self::Issue,
        Self::Transfer,
        Self::Reissue,
        Self::Burn,
        Self::Exchange,
        Self::Lease,
        Self::CancelLease,
        Self::Alias,
        Self::MassTransfer,
        Self::Data,
        Self::SetScript,
        Self::Sponsorship,
        Self::SetAssetScript,
        Self::Invoke,
        Self::UpdateAssetInfo,
        Self::Ethereum,
    ];

    /// The numeric `type` carried in the field bag.
    pub fn type_id(self) -> u8 {
        match self {
            Self::Genesis => config::GENESIS_TYPE,
            Self::Payment => config::PAYMENT_TYPE,
            Self::Issue => config::ISSUE_TYPE,
            Self::Transfer => config::TRANSFER_TYPE,
            Self::Reissue => config::REISSUE_TYPE,
            Self::Burn => config::BURN_TYPE,
            Self::Exchange => config::EXCHANGE_TYPE,
            Self::Lease => config::LEASE_TYPE,
            Self::CancelLease => config::CANCEL_LEASE_TYPE,
            Self::Alias => config::ALIAS_TYPE,
            Self::MassTransfer => config::MASS_TRANSFER_TYPE,
            Self::Data => config::DATA_TYPE,
            Self::SetScript => config::SET_SCRIPT_TYPE,
            Self::Sponsorship => config::SPONSORSHIP_TYPE,
            Self::SetAssetScript => config::SET_ASSET_SCRIPT_TYPE,
            Self::Invoke => config::INVOKE_SCRIPT_TYPE,
            Self::UpdateAssetInfo => config::UPDATE_ASSET_INFO_TYPE,
            Self::Ethereum => config::ETHEREUM_TYPE,
        }
    }

    /// Maps a wire `type` back to its kind. Returns `None` for ids outside
    /// the closed set.
    pub fn from_type_id(type_id: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.type_id() == type_id)
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Genesis => "Genesis",
            Self::Payment => "Payment",
            Self::Issue => "Issue",
            Self::Transfer => "Transfer",
            Self::Reissue => "Reissue",
            Self::Burn => "Burn",
            Self::Exchange => "Exchange",
            Self::Lease => "Lease",
            Self::CancelLease => "CancelLease",
            Self::Alias => "Alias",
            Self::MassTransfer => "MassTransfer",
            Self::Data => "Data",
            Self::SetScript => "SetScript",
            Self::Sponsorship => "Sponsorship",
            Self::SetAssetScript => "SetAssetScript",
            Self::Invoke => "Invoke",
            Self::UpdateAssetInfo => "UpdateAssetInfo",
            Self::Ethereum => "Ethereum",
        };
        write!(f, "{}", name)
    }
}

impl Serialize for TransactionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.type_id())
    }
}

impl<'de> Deserialize<'de> for TransactionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = u8::deserialize(deserializer)?;
        Self::from_type_id(id)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown transaction type {}", id)))
    }
}

// ---------------------------------------------------------------------------
// Long
// ---------------------------------------------------------------------------

/// A signed 64-bit quantity as it appeared on the wire.
///
/// Amounts and fees may arrive either as JSON integers or as decimal strings
/// (JavaScript clients quote anything beyond 2^53). The representation is
/// remembered so re-encoding yields the same bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Long {
    value: i64,
    quoted: bool,
}

impl Long {
    /// A `Long` that encodes as a JSON number.
    pub fn new(value: i64) -> Self {
        Self {
            value,
            quoted: false,
        }
    }

    /// A `Long` that encodes as a decimal string.
    pub fn quoted(value: i64) -> Self {
        Self {
            value,
            quoted: true,
        }
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Parses a JSON number or canonical decimal string.
    pub fn from_json(value: &Value) -> Result<Self, String> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .map(Self::new)
                .ok_or_else(|| format!("{} is not an integer representable in 64 bits", n)),
            Value::String(s) => match s.parse::<i64>() {
                // Reject "+5", "007" and friends: they would not survive re-encoding.
                Ok(v) if v.to_string() == *s => Ok(Self::quoted(v)),
                _ => Err(format!("'{}' is not a numeric string", s)),
            },
            other => Err(format!(
                "expected an integer or numeric string, got {}",
                json_type_name(other)
            )),
        }
    }

    pub fn to_json(&self) -> Value {
        if self.quoted {
            Value::String(self.value.to_string())
        } else {
            Value::from(self.value)
        }
    }
}

impl From<i64> for Long {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for Long {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl Serialize for Long {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Long {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_json(&value).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Base58
// ---------------------------------------------------------------------------

/// Raw bytes that travel as a base58 string (attachments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Base58(pub Vec<u8>);

impl Base58 {
    pub fn parse(s: &str) -> Result<Self, String> {
        decode_base58(s).map(Self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Base58 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", bs58::encode(&self.0).into_string())
    }
}

// ---------------------------------------------------------------------------
// Base64
// ---------------------------------------------------------------------------

/// Raw bytes that travel as a `base64:`-prefixed string (scripts, binary
/// data entries, binary call arguments).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Base64(pub Vec<u8>);

impl Base64 {
    pub fn parse(s: &str) -> Result<Self, String> {
        let payload = s
            .strip_prefix(BASE64_PREFIX)
            .ok_or_else(|| format!("expected a '{}'-prefixed string", BASE64_PREFIX))?;
        STANDARD
            .decode(payload)
            .map(Self)
            .map_err(|e| format!("invalid base64: {}", e))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Base64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", BASE64_PREFIX, STANDARD.encode(&self.0))
    }
}

// ---------------------------------------------------------------------------
// String-shaped checks
// ---------------------------------------------------------------------------

pub(crate) fn decode_base58(s: &str) -> Result<Vec<u8>, String> {
    bs58::decode(s)
        .into_vec()
        .map_err(|e| format!("invalid base58: {}", e))
}

/// Public keys, asset ids, lease ids, signatures: non-empty base58.
pub(crate) fn check_base58_id(s: &str) -> Result<(), String> {
    if s.is_empty() {
        return Err("must not be empty".to_string());
    }
    decode_base58(s).map(|_| ())
}

/// A recipient is either a base58 address or `alias:<chain char>:<name>`.
pub(crate) fn check_recipient(s: &str) -> Result<(), String> {
    match s.strip_prefix(ALIAS_PREFIX) {
        Some(rest) => {
            let mut parts = rest.splitn(2, ':');
            let chain = parts.next().unwrap_or_default();
            let name = parts.next().unwrap_or_default();
            if chain.chars().count() != 1 || name.is_empty() {
                return Err(format!("malformed alias recipient '{}'", s));
            }
            Ok(())
        }
        None => check_base58_id(s),
    }
}

/// `0x`-prefixed, even-length hex.
pub(crate) fn check_hex(s: &str) -> Result<(), String> {
    let digits = s
        .strip_prefix(HEX_PREFIX)
        .ok_or_else(|| format!("expected a '{}'-prefixed string", HEX_PREFIX))?;
    hex::decode(digits)
        .map(|_| ())
        .map_err(|e| format!("invalid hex: {}", e))
}

/// Short name of a JSON value's type, for error messages.
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_type_ids_roundtrip() {
        for kind in TransactionKind::ALL {
            assert_eq!(TransactionKind::from_type_id(kind.type_id()), Some(kind));
        }
        assert_eq!(TransactionKind::from_type_id(0), None);
        assert_eq!(TransactionKind::from_type_id(19), None);
    }

    #[test]
    fn kind_display() {
        assert_eq!(TransactionKind::Invoke.to_string(), "Invoke");
        assert_eq!(TransactionKind::CancelLease.to_string(), "CancelLease");
    }

    #[test]
    fn kind_serializes_as_type_id() {
        assert_eq!(serde_json::to_value(TransactionKind::Data).unwrap(), json!(12));
        let kind: TransactionKind = serde_json::from_value(json!(4)).unwrap();
        assert_eq!(kind, TransactionKind::Transfer);
        assert!(serde_json::from_value::<TransactionKind>(json!(42)).is_err());
    }

    #[test]
    fn long_preserves_representation() {
        let n = Long::from_json(&json!(500)).unwrap();
        assert_eq!(n.value(), 500);
        assert!(!n.is_quoted());
        assert_eq!(n.to_json(), json!(500));

        let s = Long::from_json(&json!("100000")).unwrap();
        assert_eq!(s.value(), 100_000);
        assert!(s.is_quoted());
        assert_eq!(s.to_json(), json!("100000"));
    }

    #[test]
    fn long_accepts_full_i64_range_as_string() {
        let max = Long::from_json(&json!("9223372036854775807")).unwrap();
        assert_eq!(max.value(), i64::MAX);
        let min = Long::from_json(&json!("-9223372036854775808")).unwrap();
        assert_eq!(min.value(), i64::MIN);
    }

    #[test]
    fn long_rejects_non_canonical_and_garbage() {
        assert!(Long::from_json(&json!("not a number")).is_err());
        assert!(Long::from_json(&json!("+5")).is_err());
        assert!(Long::from_json(&json!("007")).is_err());
        assert!(Long::from_json(&json!("9223372036854775808")).is_err());
        assert!(Long::from_json(&json!(1.5)).is_err());
        assert!(Long::from_json(&json!(u64::MAX)).is_err());
        assert!(Long::from_json(&json!(true)).is_err());
    }

    #[test]
    fn long_serde_roundtrip() {
        for long in [Long::new(7), Long::quoted(-12)] {
            let json = serde_json::to_string(&long).unwrap();
            let recovered: Long = serde_json::from_str(&json).unwrap();
            assert_eq!(long, recovered);
        }
    }

    #[test]
    fn base64_requires_prefix() {
        let b = Base64::parse("base64:AQID").unwrap();
        assert_eq!(b.as_bytes(), &[1, 2, 3]);
        assert_eq!(b.to_string(), "base64:AQID");
        assert!(Base64::parse("AQID").is_err());
        assert!(Base64::parse("base64:!!!").is_err());
    }

    #[test]
    fn base64_empty_payload() {
        let b = Base64::parse("base64:").unwrap();
        assert!(b.as_bytes().is_empty());
        assert_eq!(b.to_string(), "base64:");
    }

    #[test]
    fn base58_roundtrip_and_empty() {
        let b = Base58::parse("3mJr7AoUXx2Wqd").unwrap();
        assert_eq!(b.to_string(), "3mJr7AoUXx2Wqd");
        assert!(Base58::parse("").unwrap().as_bytes().is_empty());
        assert!(Base58::parse("0OIl").is_err());
    }

    #[test]
    fn recipient_forms() {
        assert!(check_recipient("alias:T:x").is_ok());
        assert!(check_recipient("3N1HYdheNiiTtHgi2n3jLAek6N3H4guaciG").is_ok());
        assert!(check_recipient("alias:T:").is_err());
        assert!(check_recipient("alias:TT:name").is_err());
        assert!(check_recipient("").is_err());
    }

    #[test]
    fn hex_requires_prefix() {
        assert!(check_hex("0xdeadbeef").is_ok());
        assert!(check_hex("deadbeef").is_err());
        assert!(check_hex("0xabc").is_err());
    }
}

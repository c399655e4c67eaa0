//! The variant catalog: a single data-driven table mapping every
//! `(kind, version)` pair to its ordered field specification.
//!
//! Nested variant families (exchange orders, data entries, call arguments,
//! payments, mass-transfer items, Ethereum payloads) have their own small
//! tables here so the validator can walk them the same way it walks a
//! top-level transaction.
//!
//! Authentication fields (`signature` / `proofs`) are *not* listed; the
//! resolver in [`super::auth`] owns that rule.

use std::fmt;

use super::types::TransactionKind;

// ---------------------------------------------------------------------------
// Field specification
// ---------------------------------------------------------------------------

/// Sign constraint on a [`FieldType::Long`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Any,
    NonNegative,
    Positive,
}

impl Bound {
    pub fn admits(self, value: i64) -> bool {
        match self {
            Self::Any => true,
            Self::NonNegative => value >= 0,
            Self::Positive => value > 0,
        }
    }
}

/// Semantic type of a field, which decides both the accepted JSON
/// representation and the value it decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Numeric `type`; must equal the claimed kind.
    TypeTag,
    /// Numeric `version`; must equal the claimed version.
    Version,
    /// Chain byte, 0..=255.
    ChainId,
    /// Milliseconds since the epoch, non-negative JSON integer.
    Timestamp,
    /// Asset decimals, 0..=8.
    Decimals,
    /// 64-bit integer as a number or numeric string.
    Long(Bound),
    Boolean,
    /// Free-form string.
    Text,
    /// Non-empty string (data entry keys, call function names).
    Key,
    /// Non-empty base58 identifier: public keys, asset ids, lease ids.
    Id,
    /// Address or `alias:` recipient.
    Recipient,
    /// Base58-encoded bytes, possibly empty.
    Base58Bytes,
    /// `base64:`-prefixed bytes.
    Base64Bytes,
    /// `0x`-prefixed hex.
    Hex,
    /// Exchange order side, `buy` or `sell`.
    OrderType,
    /// Order v4 price interpretation.
    PriceMode,
    /// `{amountAsset, priceAsset}`.
    AssetPair,
    /// A full exchange order, versioned on its own axis.
    Order,
    /// Data transaction entries.
    DataEntries,
    /// Mass-transfer recipients.
    Transfers,
    /// Invoke call `{function, args}`.
    Call,
    /// Invoke call argument list.
    Arguments,
    /// Invoke payments.
    Payments,
    /// Ethereum-wrapped transaction payload.
    EthereumPayload,
    /// Accepted verbatim (node-provided state changes).
    Opaque,
    /// Only `null` is accepted.
    Null,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Long(Bound::Any) => write!(f, "Long"),
            Self::Long(Bound::NonNegative) => write!(f, "non-negative Long"),
            Self::Long(Bound::Positive) => write!(f, "positive Long"),
            other => write!(f, "{:?}", other),
        }
    }
}

/// Whether a field must appear in the bag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Presence {
    Required,
    /// May be omitted. When present it must match its type; when absent it
    /// is omitted again on encode.
    Optional,
}

/// One entry of a variant's field list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldSpec {
    pub name: &'static str,
    pub ty: FieldType,
    pub presence: Presence,
    /// `null` is an accepted value.
    pub nullable: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Required,
            nullable: false,
        }
    }

    /// Required key whose value may be `null`.
    pub const fn nullable(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Required,
            nullable: true,
        }
    }

    pub const fn optional(name: &'static str, ty: FieldType) -> Self {
        Self {
            name,
            ty,
            presence: Presence::Optional,
            nullable: false,
        }
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }
}

use FieldSpec as F;
use FieldType as T;

// ---------------------------------------------------------------------------
// Transaction tables
// ---------------------------------------------------------------------------

const HEADER: &[FieldSpec] = &[
    F::required("type", T::TypeTag),
    F::required("version", T::Version),
    F::required("chainId", T::ChainId),
    F::required("senderPublicKey", T::Id),
    F::required("timestamp", T::Timestamp),
    F::required("fee", T::Long(Bound::NonNegative)),
];

/// Genesis transactions have no sender.
const GENESIS_HEADER: &[FieldSpec] = &[
    F::required("type", T::TypeTag),
    F::required("version", T::Version),
    F::required("chainId", T::ChainId),
    F::required("timestamp", T::Timestamp),
    F::required("fee", T::Long(Bound::NonNegative)),
];

const GENESIS: &[FieldSpec] = &[
    F::required("recipient", T::Recipient),
    F::required("amount", T::Long(Bound::Positive)),
];

const PAYMENT: &[FieldSpec] = &[
    F::required("sender", T::Recipient),
    F::required("recipient", T::Recipient),
    F::required("amount", T::Long(Bound::Positive)),
];

const ISSUE: &[FieldSpec] = &[
    F::required("name", T::Text),
    F::required("description", T::Text),
    F::required("decimals", T::Decimals),
    F::required("quantity", T::Long(Bound::Positive)),
    F::required("reissuable", T::Boolean),
    F::nullable("script", T::Base64Bytes),
];

const TRANSFER: &[FieldSpec] = &[
    F::required("recipient", T::Recipient),
    F::required("amount", T::Long(Bound::Positive)),
    F::nullable("feeAssetId", T::Id),
    F::nullable("assetId", T::Id),
    F::nullable("attachment", T::Base58Bytes),
];

const REISSUE: &[FieldSpec] = &[
    F::required("assetId", T::Id),
    F::required("quantity", T::Long(Bound::NonNegative)),
    F::required("reissuable", T::Boolean),
];

const BURN: &[FieldSpec] = &[
    F::required("assetId", T::Id),
    F::required("amount", T::Long(Bound::NonNegative)),
];

const EXCHANGE: &[FieldSpec] = &[
    F::required("order1", T::Order),
    F::required("order2", T::Order),
    F::required("price", T::Long(Bound::Positive)),
    F::required("amount", T::Long(Bound::Positive)),
    F::required("buyMatcherFee", T::Long(Bound::NonNegative)),
    F::required("sellMatcherFee", T::Long(Bound::NonNegative)),
];

const LEASE: &[FieldSpec] = &[
    F::required("recipient", T::Recipient),
    F::required("amount", T::Long(Bound::Positive)),
];

const CANCEL_LEASE: &[FieldSpec] = &[F::required("leaseId", T::Id)];

const ALIAS: &[FieldSpec] = &[F::required("alias", T::Key)];

const MASS_TRANSFER: &[FieldSpec] = &[
    F::required("transfers", T::Transfers),
    F::nullable("assetId", T::Id),
    F::nullable("attachment", T::Base58Bytes),
];

const DATA: &[FieldSpec] = &[F::required("data", T::DataEntries)];

const SET_SCRIPT: &[FieldSpec] = &[F::nullable("script", T::Base64Bytes)];

const SPONSORSHIP: &[FieldSpec] = &[
    F::required("assetId", T::Id),
    F::nullable("minSponsoredAssetFee", T::Long(Bound::NonNegative)),
];

const SET_ASSET_SCRIPT: &[FieldSpec] = &[
    F::required("assetId", T::Id),
    F::required("script", T::Base64Bytes),
];

const INVOKE: &[FieldSpec] = &[
    F::required("dApp", T::Recipient),
    F::nullable("call", T::Call),
    F::nullable("feeAssetId", T::Id),
    F::nullable("payment", T::Payments),
];

const UPDATE_ASSET_INFO: &[FieldSpec] = &[
    F::required("assetId", T::Id),
    F::required("name", T::Text),
    F::required("description", T::Text),
];

const ETHEREUM: &[FieldSpec] = &[
    F::required("bytes", T::Hex),
    F::optional("payload", T::EthereumPayload),
];

// ---------------------------------------------------------------------------
// Nested tables
// ---------------------------------------------------------------------------

const ORDER_V1: &[FieldSpec] = &[
    F::required("version", T::Version),
    F::required("orderType", T::OrderType),
    F::required("assetPair", T::AssetPair),
    F::required("price", T::Long(Bound::Positive)),
    F::required("amount", T::Long(Bound::Positive)),
    F::required("timestamp", T::Timestamp),
    F::required("expiration", T::Timestamp),
    F::required("matcherFee", T::Long(Bound::NonNegative)),
    F::required("matcherPublicKey", T::Id),
    F::required("senderPublicKey", T::Id),
];

const ORDER_V3: &[FieldSpec] = &[
    F::required("version", T::Version),
    F::required("orderType", T::OrderType),
    F::required("assetPair", T::AssetPair),
    F::required("price", T::Long(Bound::Positive)),
    F::required("amount", T::Long(Bound::Positive)),
    F::required("timestamp", T::Timestamp),
    F::required("expiration", T::Timestamp),
    F::required("matcherFee", T::Long(Bound::NonNegative)),
    F::required("matcherPublicKey", T::Id),
    F::required("senderPublicKey", T::Id),
    F::nullable("matcherFeeAssetId", T::Id),
];

const ORDER_V4: &[FieldSpec] = &[
    F::required("version", T::Version),
    F::required("orderType", T::OrderType),
    F::required("assetPair", T::AssetPair),
    F::required("price", T::Long(Bound::Positive)),
    F::required("amount", T::Long(Bound::Positive)),
    F::required("timestamp", T::Timestamp),
    F::required("expiration", T::Timestamp),
    F::required("matcherFee", T::Long(Bound::NonNegative)),
    F::required("matcherPublicKey", T::Id),
    F::required("senderPublicKey", T::Id),
    F::nullable("matcherFeeAssetId", T::Id),
    F::required("priceMode", T::PriceMode),
    F::optional("eip712Signature", T::Hex),
];

pub(crate) const ASSET_PAIR: &[FieldSpec] = &[
    F::nullable("amountAsset", T::Id),
    F::nullable("priceAsset", T::Id),
];

pub(crate) const TRANSFER_ITEM: &[FieldSpec] = &[
    F::required("recipient", T::Recipient),
    F::required("amount", T::Long(Bound::NonNegative)),
];

pub(crate) const PAYMENT_ITEM: &[FieldSpec] = &[
    F::nullable("assetId", T::Id),
    F::required("amount", T::Long(Bound::Positive)),
];

pub(crate) const INVOKE_CALL: &[FieldSpec] = &[
    F::required("function", T::Key),
    F::required("args", T::Arguments),
];

pub(crate) const ETHEREUM_TRANSFER_PAYLOAD: &[FieldSpec] = &[
    F::required("type", T::Key),
    F::required("recipient", T::Recipient),
    F::required("amount", T::Long(Bound::NonNegative)),
    F::nullable("asset", T::Id),
];

pub(crate) const ETHEREUM_INVOCATION_PAYLOAD: &[FieldSpec] = &[
    F::required("type", T::Key),
    F::required("dApp", T::Recipient),
    F::nullable("call", T::Call),
    F::nullable("payment", T::Payments),
    F::nullable("feeAssetId", T::Id),
    F::optional("stateChanges", T::Opaque),
];

const DATA_INTEGER: &[FieldSpec] = &[
    F::required("key", T::Key),
    F::required("type", T::Key),
    F::required("value", T::Long(Bound::Any)),
];

const DATA_BOOLEAN: &[FieldSpec] = &[
    F::required("key", T::Key),
    F::required("type", T::Key),
    F::required("value", T::Boolean),
];

const DATA_STRING: &[FieldSpec] = &[
    F::required("key", T::Key),
    F::required("type", T::Key),
    F::required("value", T::Text),
];

const DATA_BINARY: &[FieldSpec] = &[
    F::required("key", T::Key),
    F::required("type", T::Key),
    F::required("value", T::Base64Bytes),
];

/// Canonical delete request: `{"key": k, "value": null}`.
const DATA_DELETE: &[FieldSpec] = &[
    F::required("key", T::Key),
    F::nullable("value", T::Null),
];

// ---------------------------------------------------------------------------
// VariantSpec
// ---------------------------------------------------------------------------

/// The complete shape of one `(kind, version)` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantSpec {
    pub kind: TransactionKind,
    pub version: u8,
    body: &'static [FieldSpec],
}

impl VariantSpec {
    const fn new(kind: TransactionKind, version: u8, body: &'static [FieldSpec]) -> Self {
        Self {
            kind,
            version,
            body,
        }
    }

    /// Fields common to every kind (minus the sender for Genesis).
    pub fn header(&self) -> &'static [FieldSpec] {
        match self.kind {
            TransactionKind::Genesis => GENESIS_HEADER,
            _ => HEADER,
        }
    }

    /// Kind-specific fields.
    pub fn body(&self) -> &'static [FieldSpec] {
        self.body
    }

    /// Header then body, in wire order.
    pub fn fields(&self) -> impl Iterator<Item = &'static FieldSpec> + Clone {
        self.header().iter().chain(self.body.iter())
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().find(|f| f.name == name)
    }
}

use TransactionKind as K;

static VARIANTS: &[VariantSpec] = &[
    VariantSpec::new(K::Genesis, 1, GENESIS),
    VariantSpec::new(K::Payment, 1, PAYMENT),
    VariantSpec::new(K::Issue, 1, ISSUE),
    VariantSpec::new(K::Issue, 2, ISSUE),
    VariantSpec::new(K::Issue, 3, ISSUE),
    VariantSpec::new(K::Transfer, 1, TRANSFER),
    VariantSpec::new(K::Transfer, 2, TRANSFER),
    VariantSpec::new(K::Transfer, 3, TRANSFER),
    VariantSpec::new(K::Reissue, 1, REISSUE),
    VariantSpec::new(K::Reissue, 2, REISSUE),
    VariantSpec::new(K::Reissue, 3, REISSUE),
    VariantSpec::new(K::Burn, 1, BURN),
    VariantSpec::new(K::Burn, 2, BURN),
    VariantSpec::new(K::Burn, 3, BURN),
    VariantSpec::new(K::Exchange, 1, EXCHANGE),
    VariantSpec::new(K::Exchange, 2, EXCHANGE),
    VariantSpec::new(K::Exchange, 3, EXCHANGE),
    VariantSpec::new(K::Lease, 1, LEASE),
    VariantSpec::new(K::Lease, 2, LEASE),
    VariantSpec::new(K::Lease, 3, LEASE),
    VariantSpec::new(K::CancelLease, 1, CANCEL_LEASE),
    VariantSpec::new(K::CancelLease, 2, CANCEL_LEASE),
    VariantSpec::new(K::CancelLease, 3, CANCEL_LEASE),
    VariantSpec::new(K::Alias, 1, ALIAS),
    VariantSpec::new(K::Alias, 2, ALIAS),
    VariantSpec::new(K::Alias, 3, ALIAS),
    VariantSpec::new(K::MassTransfer, 1, MASS_TRANSFER),
    VariantSpec::new(K::MassTransfer, 2, MASS_TRANSFER),
    VariantSpec::new(K::Data, 1, DATA),
    VariantSpec::new(K::Data, 2, DATA),
    VariantSpec::new(K::SetScript, 1, SET_SCRIPT),
    VariantSpec::new(K::SetScript, 2, SET_SCRIPT),
    VariantSpec::new(K::Sponsorship, 1, SPONSORSHIP),
    VariantSpec::new(K::Sponsorship, 2, SPONSORSHIP),
    VariantSpec::new(K::SetAssetScript, 1, SET_ASSET_SCRIPT),
    VariantSpec::new(K::SetAssetScript, 2, SET_ASSET_SCRIPT),
    VariantSpec::new(K::Invoke, 1, INVOKE),
    VariantSpec::new(K::Invoke, 2, INVOKE),
    VariantSpec::new(K::UpdateAssetInfo, 1, UPDATE_ASSET_INFO),
    VariantSpec::new(K::Ethereum, 1, ETHEREUM),
];

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

/// Looks up the field specification of a variant. Unknown pairs return
/// `None`; the catalog never guesses.
pub fn lookup(kind: TransactionKind, version: u8) -> Option<&'static VariantSpec> {
    VARIANTS
        .iter()
        .find(|v| v.kind == kind && v.version == version)
}

/// Every variant in the catalog, grouped by kind in type-id order.
pub fn variants() -> &'static [VariantSpec] {
    VARIANTS
}

/// Versions the catalog knows for a kind, ascending.
pub fn versions(kind: TransactionKind) -> impl Iterator<Item = u8> {
    VARIANTS
        .iter()
        .filter(move |v| v.kind == kind)
        .map(|v| v.version)
}

/// Field specification of an exchange order version.
pub fn lookup_order(version: u8) -> Option<&'static [FieldSpec]> {
    match version {
        1 | 2 => Some(ORDER_V1),
        3 => Some(ORDER_V3),
        4 => Some(ORDER_V4),
        _ => None,
    }
}

/// Field specification of a data entry by its `type` tag. `None` selects
/// the delete request.
pub fn lookup_data_entry(tag: Option<&str>) -> Option<&'static [FieldSpec]> {
    match tag {
        Some("integer") => Some(DATA_INTEGER),
        Some("boolean") => Some(DATA_BOOLEAN),
        Some("string") => Some(DATA_STRING),
        Some("binary") => Some(DATA_BINARY),
        None => Some(DATA_DELETE),
        Some(_) => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! # Variant Codec
//!
//! Converts between the loosely typed field bag and the strongly typed
//! [`Transaction`].
//!
//! Decoding always runs the structural validator first and then moves the
//! already-parsed field values into the variant, recursing into orders,
//! data entries, call arguments, payments, mass-transfer items, and Ethereum
//! payloads. Encoding walks the catalog entry of the transaction's own
//! `(kind, version)` so field emission is data-driven: required nullable
//! fields come out as `null`, absent optional fields are left out.
//!
//! `encode(decode(bag)) == bag` for every bag `decode` accepts, with one
//! documented exception: a data-entry deletion written as
//! `{"key", "type": null, "value": null}` re-encodes without `type`.
//! Unknown keys survive only at the top level and on orders; any other
//! nested object carrying one is rejected rather than silently trimmed.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use super::auth::{self, AuthMode, Authentication};
use super::catalog::{self, FieldSpec};
use super::data_entry::DataEntry;
use super::error::{SchemaError, ValidationError, ValidationErrors};
use super::exchange::{self, Order};
use super::invoke::{InvokeCall, Payment};
use super::types::{Base58, Base64, Long, TransactionKind};
use super::validation::{self, index, join, malformed, Checker, FieldValue, Fields, Validated};
use crate::config::{
    CodecConfig, MAX_ASSET_DECIMALS, MAX_DATA_ENTRIES, MAX_MASS_TRANSFERS, MAX_PROOFS,
};

// ---------------------------------------------------------------------------
// Nested body types
// ---------------------------------------------------------------------------

/// One recipient of a mass transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MassTransferItem {
    pub recipient: String,
    pub amount: Long,
}

/// The decoded form of an Ethereum-wrapped transaction, as reported by a
/// node alongside the raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EthereumPayload {
    Transfer {
        recipient: String,
        amount: Long,
        /// `None` is the native token.
        asset: Option<String>,
    },
    Invocation {
        d_app: String,
        call: Option<InvokeCall>,
        payment: Option<Vec<Payment>>,
        fee_asset_id: Option<String>,
        /// Node-computed execution result, carried through untouched.
        state_changes: Option<Value>,
    },
}

impl EthereumPayload {
    fn to_json(&self) -> Result<Value, ValidationError> {
        let out = match self {
            Self::Transfer {
                recipient,
                amount,
                asset,
            } => emit_fields(
                catalog::ETHEREUM_TRANSFER_PAYLOAD.iter(),
                vec![
                    ("type", Some(Value::from("transfer"))),
                    ("recipient", Some(Value::from(recipient.as_str()))),
                    ("amount", Some(amount.to_json())),
                    ("asset", asset.as_deref().map(Value::from)),
                ],
            )?,
            Self::Invocation {
                d_app,
                call,
                payment,
                fee_asset_id,
                state_changes,
            } => emit_fields(
                catalog::ETHEREUM_INVOCATION_PAYLOAD.iter(),
                vec![
                    ("type", Some(Value::from("invocation"))),
                    ("dApp", Some(Value::from(d_app.as_str()))),
                    ("call", call.as_ref().map(InvokeCall::to_json)),
                    ("payment", payment.as_deref().map(payments_json)),
                    ("feeAssetId", fee_asset_id.as_deref().map(Value::from)),
                    ("stateChanges", state_changes.clone()),
                ],
            )?,
        };
        Ok(Value::Object(out))
    }
}

// ---------------------------------------------------------------------------
// TransactionBody
// ---------------------------------------------------------------------------

/// Kind-specific fields. The variant determines the transaction kind; the
/// version lives on [`Transaction`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionBody {
    Genesis {
        recipient: String,
        amount: Long,
    },
    Payment {
        sender: String,
        recipient: String,
        amount: Long,
    },
    Issue {
        name: String,
        description: String,
        decimals: u8,
        quantity: Long,
        reissuable: bool,
        script: Option<Base64>,
    },
    Transfer {
        recipient: String,
        amount: Long,
        fee_asset_id: Option<String>,
        asset_id: Option<String>,
        attachment: Option<Base58>,
    },
    Reissue {
        asset_id: String,
        quantity: Long,
        reissuable: bool,
    },
    Burn {
        asset_id: String,
        amount: Long,
    },
    Exchange {
        order1: Box<Order>,
        order2: Box<Order>,
        price: Long,
        amount: Long,
        buy_matcher_fee: Long,
        sell_matcher_fee: Long,
    },
    Lease {
        recipient: String,
        amount: Long,
    },
    CancelLease {
        lease_id: String,
    },
    Alias {
        alias: String,
    },
    MassTransfer {
        transfers: Vec<MassTransferItem>,
        asset_id: Option<String>,
        attachment: Option<Base58>,
    },
    Data {
        data: Vec<DataEntry>,
    },
    SetScript {
        script: Option<Base64>,
    },
    Sponsorship {
        asset_id: String,
        min_sponsored_asset_fee: Option<Long>,
    },
    SetAssetScript {
        asset_id: String,
        script: Base64,
    },
    Invoke {
        d_app: String,
        call: Option<InvokeCall>,
        fee_asset_id: Option<String>,
        payment: Option<Vec<Payment>>,
    },
    UpdateAssetInfo {
        asset_id: String,
        name: String,
        description: String,
    },
    Ethereum {
        bytes: String,
        payload: Option<EthereumPayload>,
    },
}

impl TransactionBody {
    pub fn kind(&self) -> TransactionKind {
        match self {
            Self::Genesis { .. } => TransactionKind::Genesis,
            Self::Payment { .. } => TransactionKind::Payment,
            Self::Issue { .. } => TransactionKind::Issue,
            Self::Transfer { .. } => TransactionKind::Transfer,
            Self::Reissue { .. } => TransactionKind::Reissue,
            Self::Burn { .. } => TransactionKind::Burn,
            Self::Exchange { .. } => TransactionKind::Exchange,
            Self::Lease { .. } => TransactionKind::Lease,
            Self::CancelLease { .. } => TransactionKind::CancelLease,
            Self::Alias { .. } => TransactionKind::Alias,
            Self::MassTransfer { .. } => TransactionKind::MassTransfer,
            Self::Data { .. } => TransactionKind::Data,
            Self::SetScript { .. } => TransactionKind::SetScript,
            Self::Sponsorship { .. } => TransactionKind::Sponsorship,
            Self::SetAssetScript { .. } => TransactionKind::SetAssetScript,
            Self::Invoke { .. } => TransactionKind::Invoke,
            Self::UpdateAssetInfo { .. } => TransactionKind::UpdateAssetInfo,
            Self::Ethereum { .. } => TransactionKind::Ethereum,
        }
    }

    fn from_fields(kind: TransactionKind, f: &mut Fields) -> Result<Self, ValidationError> {
        use FieldValue as V;
        use TransactionKind as K;

        Ok(match kind {
            K::Genesis => Self::Genesis {
                recipient: f.take("recipient", V::into_string)?,
                amount: f.take("amount", V::into_long)?,
            },
            K::Payment => Self::Payment {
                sender: f.take("sender", V::into_string)?,
                recipient: f.take("recipient", V::into_string)?,
                amount: f.take("amount", V::into_long)?,
            },
            K::Issue => Self::Issue {
                name: f.take("name", V::into_string)?,
                description: f.take("description", V::into_string)?,
                decimals: f.take("decimals", V::into_u8)?,
                quantity: f.take("quantity", V::into_long)?,
                reissuable: f.take("reissuable", V::into_bool)?,
                script: f.take_opt("script", V::into_base64)?,
            },
            K::Transfer => Self::Transfer {
                recipient: f.take("recipient", V::into_string)?,
                amount: f.take("amount", V::into_long)?,
                fee_asset_id: f.take_opt("feeAssetId", V::into_string)?,
                asset_id: f.take_opt("assetId", V::into_string)?,
                attachment: f.take_opt("attachment", V::into_base58)?,
            },
            K::Reissue => Self::Reissue {
                asset_id: f.take("assetId", V::into_string)?,
                quantity: f.take("quantity", V::into_long)?,
                reissuable: f.take("reissuable", V::into_bool)?,
            },
            K::Burn => Self::Burn {
                asset_id: f.take("assetId", V::into_string)?,
                amount: f.take("amount", V::into_long)?,
            },
            K::Exchange => Self::Exchange {
                order1: f.take("order1", V::into_order)?,
                order2: f.take("order2", V::into_order)?,
                price: f.take("price", V::into_long)?,
                amount: f.take("amount", V::into_long)?,
                buy_matcher_fee: f.take("buyMatcherFee", V::into_long)?,
                sell_matcher_fee: f.take("sellMatcherFee", V::into_long)?,
            },
            K::Lease => Self::Lease {
                recipient: f.take("recipient", V::into_string)?,
                amount: f.take("amount", V::into_long)?,
            },
            K::CancelLease => Self::CancelLease {
                lease_id: f.take("leaseId", V::into_string)?,
            },
            K::Alias => Self::Alias {
                alias: f.take("alias", V::into_string)?,
            },
            K::MassTransfer => Self::MassTransfer {
                transfers: f.take("transfers", V::into_transfers)?,
                asset_id: f.take_opt("assetId", V::into_string)?,
                attachment: f.take_opt("attachment", V::into_base58)?,
            },
            K::Data => Self::Data {
                data: f.take("data", V::into_entries)?,
            },
            K::SetScript => Self::SetScript {
                script: f.take_opt("script", V::into_base64)?,
            },
            K::Sponsorship => Self::Sponsorship {
                asset_id: f.take("assetId", V::into_string)?,
                min_sponsored_asset_fee: f.take_opt("minSponsoredAssetFee", V::into_long)?,
            },
            K::SetAssetScript => Self::SetAssetScript {
                asset_id: f.take("assetId", V::into_string)?,
                script: f.take("script", V::into_base64)?,
            },
            K::Invoke => Self::Invoke {
                d_app: f.take("dApp", V::into_string)?,
                call: f.take_opt("call", V::into_call)?,
                fee_asset_id: f.take_opt("feeAssetId", V::into_string)?,
                payment: f.take_opt("payment", V::into_payments)?,
            },
            K::UpdateAssetInfo => Self::UpdateAssetInfo {
                asset_id: f.take("assetId", V::into_string)?,
                name: f.take("name", V::into_string)?,
                description: f.take("description", V::into_string)?,
            },
            K::Ethereum => Self::Ethereum {
                bytes: f.take("bytes", V::into_string)?,
                payload: f.take_opt("payload", V::into_ethereum)?.map(|p| *p),
            },
        })
    }

    /// Wire values of the body fields. `None` means "no value"; the catalog
    /// decides whether that becomes `null` or an omitted key.
    fn values(&self) -> Result<Vec<(&'static str, Option<Value>)>, SchemaError> {
        fn text(s: &str) -> Option<Value> {
            Some(Value::from(s))
        }
        fn opt_text(s: &Option<String>) -> Option<Value> {
            s.as_deref().map(Value::from)
        }
        fn long(n: &Long) -> Option<Value> {
            Some(n.to_json())
        }

        Ok(match self {
            Self::Genesis { recipient, amount } | Self::Lease { recipient, amount } => {
                vec![("recipient", text(recipient)), ("amount", long(amount))]
            }
            Self::Payment {
                sender,
                recipient,
                amount,
            } => vec![
                ("sender", text(sender)),
                ("recipient", text(recipient)),
                ("amount", long(amount)),
            ],
            Self::Issue {
                name,
                description,
                decimals,
                quantity,
                reissuable,
                script,
            } => vec![
                ("name", text(name)),
                ("description", text(description)),
                ("decimals", Some(Value::from(*decimals))),
                ("quantity", long(quantity)),
                ("reissuable", Some(Value::Bool(*reissuable))),
                ("script", script.as_ref().map(|s| Value::from(s.to_string()))),
            ],
            Self::Transfer {
                recipient,
                amount,
                fee_asset_id,
                asset_id,
                attachment,
            } => vec![
                ("recipient", text(recipient)),
                ("amount", long(amount)),
                ("feeAssetId", opt_text(fee_asset_id)),
                ("assetId", opt_text(asset_id)),
                ("attachment", attachment.as_ref().map(|a| Value::from(a.to_string()))),
            ],
            Self::Reissue {
                asset_id,
                quantity,
                reissuable,
            } => vec![
                ("assetId", text(asset_id)),
                ("quantity", long(quantity)),
                ("reissuable", Some(Value::Bool(*reissuable))),
            ],
            Self::Burn { asset_id, amount } => {
                vec![("assetId", text(asset_id)), ("amount", long(amount))]
            }
            Self::Exchange {
                order1,
                order2,
                price,
                amount,
                buy_matcher_fee,
                sell_matcher_fee,
            } => vec![
                ("order1", Some(order1.to_json()?)),
                ("order2", Some(order2.to_json()?)),
                ("price", long(price)),
                ("amount", long(amount)),
                ("buyMatcherFee", long(buy_matcher_fee)),
                ("sellMatcherFee", long(sell_matcher_fee)),
            ],
            Self::CancelLease { lease_id } => vec![("leaseId", text(lease_id))],
            Self::Alias { alias } => vec![("alias", text(alias))],
            Self::MassTransfer {
                transfers,
                asset_id,
                attachment,
            } => vec![
                (
                    "transfers",
                    Some(Value::Array(
                        transfers
                            .iter()
                            .map(|t| {
                                serde_json::json!({
                                    "recipient": t.recipient,
                                    "amount": t.amount.to_json(),
                                })
                            })
                            .collect(),
                    )),
                ),
                ("assetId", opt_text(asset_id)),
                ("attachment", attachment.as_ref().map(|a| Value::from(a.to_string()))),
            ],
            Self::Data { data } => vec![(
                "data",
                Some(Value::Array(data.iter().map(DataEntry::to_json).collect())),
            )],
            Self::SetScript { script } => {
                vec![("script", script.as_ref().map(|s| Value::from(s.to_string())))]
            }
            Self::Sponsorship {
                asset_id,
                min_sponsored_asset_fee,
            } => vec![
                ("assetId", text(asset_id)),
                (
                    "minSponsoredAssetFee",
                    min_sponsored_asset_fee.as_ref().map(Long::to_json),
                ),
            ],
            Self::SetAssetScript { asset_id, script } => vec![
                ("assetId", text(asset_id)),
                ("script", Some(Value::from(script.to_string()))),
            ],
            Self::Invoke {
                d_app,
                call,
                fee_asset_id,
                payment,
            } => vec![
                ("dApp", text(d_app)),
                ("call", call.as_ref().map(InvokeCall::to_json)),
                ("feeAssetId", opt_text(fee_asset_id)),
                ("payment", payment.as_deref().map(payments_json)),
            ],
            Self::UpdateAssetInfo {
                asset_id,
                name,
                description,
            } => vec![
                ("assetId", text(asset_id)),
                ("name", text(name)),
                ("description", text(description)),
            ],
            Self::Ethereum { bytes, payload } => vec![
                ("bytes", text(bytes)),
                (
                    "payload",
                    payload
                        .as_ref()
                        .map(EthereumPayload::to_json)
                        .transpose()
                        .map_err(SchemaError::invalid)?,
                ),
            ],
        })
    }
}

fn payments_json(payments: &[Payment]) -> Value {
    Value::Array(payments.iter().map(Payment::to_json).collect())
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A decoded, strongly typed transaction of any kind and version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub version: u8,
    pub chain_id: u8,
    /// Absent only for genesis transactions.
    pub sender_public_key: Option<String>,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub fee: Long,
    pub body: TransactionBody,
    pub authentication: Authentication,
    /// Fields the catalog does not define for this variant, kept verbatim.
    pub extra: Map<String, Value>,
}

impl Transaction {
    pub fn kind(&self) -> TransactionKind {
        self.body.kind()
    }

    pub fn auth_mode(&self) -> AuthMode {
        self.authentication.mode()
    }

    fn from_validated(validated: Validated) -> Result<Self, ValidationError> {
        let kind = validated.kind();
        let version = validated.version();
        let (mut fields, authentication, _) = validated.into_parts();
        let body = TransactionBody::from_fields(kind, &mut fields)?;
        Ok(Self {
            version,
            chain_id: fields.take("chainId", FieldValue::into_u8)?,
            sender_public_key: fields.take_opt("senderPublicKey", FieldValue::into_string)?,
            timestamp: fields.take("timestamp", FieldValue::into_u64)?,
            fee: fields.take("fee", FieldValue::into_long)?,
            body,
            authentication,
            extra: fields.take_extra(),
        })
    }
}

impl Serialize for Transaction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode(self)
            .map_err(serde::ser::Error::custom)?
            .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Transaction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bag = Value::deserialize(deserializer)?;
        decode_tagged(&bag).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Emission helpers
// ---------------------------------------------------------------------------

/// Emits `values` in catalog order. A `None` for a required nullable field
/// becomes `null`; for an optional field the key is left out. A value for a
/// field the catalog does not list is an error.
pub(crate) fn emit_fields<'s>(
    specs: impl Iterator<Item = &'s FieldSpec>,
    values: Vec<(&'static str, Option<Value>)>,
) -> Result<Map<String, Value>, ValidationError> {
    let mut values: HashMap<&str, Option<Value>> = values.into_iter().collect();
    let mut out = Map::new();
    for spec in specs {
        match values.remove(spec.name).flatten() {
            Some(value) => {
                out.insert(spec.name.to_string(), value);
            }
            None if spec.is_required() && spec.nullable => {
                out.insert(spec.name.to_string(), Value::Null);
            }
            None if spec.is_required() => {
                return Err(ValidationError::field(spec.name, "missing required field"));
            }
            None => {}
        }
    }
    if let Some((name, _)) = values.iter().find(|(_, v)| v.is_some()) {
        return Err(ValidationError::field(
            *name,
            "not defined for this variant",
        ));
    }
    Ok(out)
}

pub(crate) fn emit_authentication(
    out: &mut Map<String, Value>,
    authentication: &Authentication,
) -> Result<(), ValidationError> {
    if !authentication.within_limits() {
        return Err(ValidationError::field(
            "proofs",
            format!("at most {} proofs allowed", MAX_PROOFS),
        ));
    }
    let value = match authentication {
        Authentication::Signature(s) => Value::from(s.as_str()),
        Authentication::Proofs(proofs) => {
            Value::Array(proofs.iter().map(|p| Value::from(p.as_str())).collect())
        }
    };
    out.insert(authentication.mode().field_name().to_string(), value);
    Ok(())
}

/// Re-emits preserved unknown fields. Catalog fields always win.
pub(crate) fn emit_extra(out: &mut Map<String, Value>, extra: &Map<String, Value>) {
    for (key, value) in extra {
        if !out.contains_key(key) {
            out.insert(key.clone(), value.clone());
        }
    }
}

/// Value rules the decoder enforces that the typed body cannot express on
/// its own. A transaction that breaks one would encode to a bag `decode`
/// rejects.
fn body_rules(tx: &Transaction) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    match &tx.body {
        TransactionBody::Issue { decimals, .. } if u64::from(*decimals) > MAX_ASSET_DECIMALS => {
            errors.push(ValidationError::field(
                "decimals",
                format!("{} is out of range 0..={}", decimals, MAX_ASSET_DECIMALS),
            ));
        }
        TransactionBody::MassTransfer { transfers, .. } if transfers.len() > MAX_MASS_TRANSFERS => {
            errors.push(ValidationError::field(
                "transfers",
                format!("at most {} transfers allowed", MAX_MASS_TRANSFERS),
            ));
        }
        TransactionBody::Data { data } => {
            if data.len() > MAX_DATA_ENTRIES {
                errors.push(ValidationError::field(
                    "data",
                    format!("at most {} entries allowed", MAX_DATA_ENTRIES),
                ));
            }
            let mut seen = HashSet::new();
            for (i, entry) in data.iter().enumerate() {
                if !seen.insert(entry.key.as_str()) {
                    errors.push(ValidationError::field(
                        join(&index("data", i), "key"),
                        format!("duplicate key '{}'", entry.key),
                    ));
                }
                if entry.is_delete() && tx.version < 2 {
                    errors.push(ValidationError::field(
                        index("data", i),
                        "delete entries require data transaction version 2",
                    ));
                }
            }
        }
        TransactionBody::Exchange { order1, order2, .. } => {
            let permitted = exchange::permitted_order_versions(tx.version);
            for (name, order) in [("order1", order1), ("order2", order2)] {
                if !permitted.contains(&order.version) {
                    errors.push(ValidationError::field(
                        join(name, "version"),
                        format!(
                            "order version {} is not accepted by exchange version {}",
                            order.version, tx.version
                        ),
                    ));
                }
            }
        }
        _ => {}
    }
    errors
}

// ---------------------------------------------------------------------------
// Nested checks owned by the codec's body types
// ---------------------------------------------------------------------------

pub(crate) fn check_transfers(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &str,
) -> Option<Vec<MassTransferItem>> {
    let items = checker.as_array(value, path)?;
    let mark = checker.mark();
    if items.len() > MAX_MASS_TRANSFERS {
        checker.fail(ValidationError::field(
            path,
            format!(
                "at most {} transfers allowed, got {}",
                MAX_MASS_TRANSFERS,
                items.len()
            ),
        ));
    }
    let mut transfers = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let item_path = index(path, i);
        let Some(obj) = checker.as_object(item, &item_path) else {
            continue;
        };
        let Some(mut fields) =
            checker.closed_object(catalog::TRANSFER_ITEM.iter(), obj, &item_path, &[])
        else {
            continue;
        };
        let transfer = checker.materialize(|| {
            Ok(MassTransferItem {
                recipient: fields.take("recipient", FieldValue::into_string)?,
                amount: fields.take("amount", FieldValue::into_long)?,
            })
        });
        transfers.extend(transfer);
    }
    if checker.failed_since(mark) {
        None
    } else {
        Some(transfers)
    }
}

pub(crate) fn check_ethereum_payload(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &str,
) -> Option<EthereumPayload> {
    let obj = checker.as_object(value, path)?;
    let tag = obj.get("type").and_then(Value::as_str);
    let specs = match tag {
        Some("transfer") => catalog::ETHEREUM_TRANSFER_PAYLOAD,
        Some("invocation") => catalog::ETHEREUM_INVOCATION_PAYLOAD,
        _ => {
            checker.fail(malformed(
                path,
                "payload type must be 'transfer' or 'invocation'",
            ));
            return None;
        }
    };
    let mut fields = checker.closed_object(specs.iter(), obj, path, &[])?;
    checker.materialize(|| {
        use FieldValue as V;
        Ok(match tag {
            Some("transfer") => EthereumPayload::Transfer {
                recipient: fields.take("recipient", V::into_string)?,
                amount: fields.take("amount", V::into_long)?,
                asset: fields.take_opt("asset", V::into_string)?,
            },
            _ => EthereumPayload::Invocation {
                d_app: fields.take("dApp", V::into_string)?,
                call: fields.take_opt("call", V::into_call)?,
                payment: fields.take_opt("payment", V::into_payments)?,
                fee_asset_id: fields.take_opt("feeAssetId", V::into_string)?,
                state_changes: fields.take_opt("stateChanges", V::into_opaque)?,
            },
        })
    })
}

// ---------------------------------------------------------------------------
// Codec
// ---------------------------------------------------------------------------

/// Encoder/decoder bound to a [`CodecConfig`]. Stateless apart from the
/// config, so one instance can be shared freely across threads.
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Runs structural validation only.
    pub fn validate(
        &self,
        kind: TransactionKind,
        version: u8,
        bag: &Value,
    ) -> Result<Validated, SchemaError> {
        validation::validate_with(&self.config, kind, version, bag)
    }

    /// Decodes a bag claimed to be `(kind, version)`.
    ///
    /// # Errors
    ///
    /// Anything [`Codec::validate`] reports.
    pub fn decode(
        &self,
        kind: TransactionKind,
        version: u8,
        bag: &Value,
    ) -> Result<Transaction, SchemaError> {
        let validated = self.validate(kind, version, bag)?;
        let warnings = validated.warnings().len();
        let tx = Transaction::from_validated(validated).map_err(SchemaError::invalid)?;
        debug!(kind = %kind, version, warnings, "decoded transaction");
        Ok(tx)
    }

    /// Decodes a bag, taking `(kind, version)` from its own `type` and
    /// `version` fields.
    pub fn decode_tagged(&self, bag: &Value) -> Result<Transaction, SchemaError> {
        let (kind, version) = read_tag(bag)?;
        self.decode(kind, version, bag)
    }

    /// Encodes a transaction back into a field bag.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::UnknownVariant`] if `(kind, version)` is not in the
    ///   catalog.
    /// - [`SchemaError::Invalid`] if the authentication does not match the
    ///   resolver, a field is set that the variant does not define, or a
    ///   value breaks a rule the decoder enforces (decimals range, list
    ///   limits, unique data keys, delete entries before data version 2,
    ///   order versions the exchange version does not accept).
    pub fn encode(&self, tx: &Transaction) -> Result<Value, SchemaError> {
        let kind = tx.kind();
        let spec = catalog::lookup(kind, tx.version)
            .ok_or_else(|| SchemaError::unknown_variant(kind, tx.version))?;
        let mode = auth::resolve(kind, tx.version)?;
        if tx.authentication.mode() != mode {
            return Err(SchemaError::invalid(ValidationError::field(
                tx.authentication.mode().field_name(),
                format!("{} version {} requires {}", kind, tx.version, mode),
            )));
        }
        let broken = body_rules(tx);
        if !broken.is_empty() {
            return Err(SchemaError::Invalid(ValidationErrors(broken)));
        }

        let mut values = vec![
            ("type", Some(Value::from(kind.type_id()))),
            ("version", Some(Value::from(tx.version))),
            ("chainId", Some(Value::from(tx.chain_id))),
            (
                "senderPublicKey",
                tx.sender_public_key.as_deref().map(Value::from),
            ),
            ("timestamp", Some(Value::from(tx.timestamp))),
            ("fee", Some(tx.fee.to_json())),
        ];
        values.extend(tx.body.values()?);

        let mut out = emit_fields(spec.fields(), values).map_err(SchemaError::invalid)?;
        emit_authentication(&mut out, &tx.authentication).map_err(SchemaError::invalid)?;
        emit_extra(&mut out, &tx.extra);

        debug!(kind = %kind, version = tx.version, "encoded transaction");
        Ok(Value::Object(out))
    }
}

/// Reads the `(kind, version)` tag a bag claims for itself.
fn read_tag(bag: &Value) -> Result<(TransactionKind, u8), SchemaError> {
    let read = |name: &str| -> Result<u8, ValidationError> {
        let n = bag
            .get(name)
            .and_then(Value::as_u64)
            .ok_or_else(|| ValidationError::field(name, "missing or not a non-negative integer"))?;
        u8::try_from(n).map_err(|_| ValidationError::field(name, format!("{} is out of range", n)))
    };
    let (type_id, version) = match (read("type"), read("version")) {
        (Ok(t), Ok(v)) => (t, v),
        (t, v) => {
            let errors = [t.err(), v.err()].into_iter().flatten().collect();
            return Err(SchemaError::Invalid(ValidationErrors(errors)));
        }
    };
    let kind = TransactionKind::from_type_id(type_id)
        .ok_or(SchemaError::UnknownVariant { type_id, version })?;
    Ok((kind, version))
}

/// [`Codec::decode`] with the default config.
pub fn decode(kind: TransactionKind, version: u8, bag: &Value) -> Result<Transaction, SchemaError> {
    Codec::default().decode(kind, version, bag)
}

/// [`Codec::decode_tagged`] with the default config.
pub fn decode_tagged(bag: &Value) -> Result<Transaction, SchemaError> {
    Codec::default().decode_tagged(bag)
}

/// [`Codec::encode`]. Encoding does not depend on the config.
pub fn encode(tx: &Transaction) -> Result<Value, SchemaError> {
    Codec::default().encode(tx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transfer_v2() -> Value {
        json!({
            "type": 4,
            "chainId": 84,
            "senderPublicKey": "abc",
            "timestamp": 1000,
            "fee": "100000",
            "recipient": "alias:T:x",
            "amount": "500",
            "feeAssetId": null,
            "assetId": null,
            "attachment": "",
            "version": 2,
            "proofs": ["sig1"]
        })
    }

    #[test]
    fn transfer_example_roundtrips() {
        let bag = transfer_v2();
        let tx = decode(TransactionKind::Transfer, 2, &bag).unwrap();
        assert_eq!(tx.kind(), TransactionKind::Transfer);
        assert_eq!(tx.authentication, Authentication::Proofs(vec!["sig1".into()]));
        assert_eq!(tx.fee, Long::quoted(100_000));
        match &tx.body {
            TransactionBody::Transfer {
                recipient,
                amount,
                attachment,
                ..
            } => {
                assert_eq!(recipient, "alias:T:x");
                assert_eq!(amount.value(), 500);
                assert_eq!(attachment.as_ref().map(Base58::as_bytes), Some(&[][..]));
            }
            other => panic!("expected Transfer, got {:?}", other),
        }
        assert_eq!(encode(&tx).unwrap(), bag);
    }

    #[test]
    fn decode_tagged_reads_tag_from_bag() {
        let tx = decode_tagged(&transfer_v2()).unwrap();
        assert_eq!(tx.kind(), TransactionKind::Transfer);
        assert_eq!(tx.version, 2);
    }

    #[test]
    fn decode_tagged_unknown_type() {
        match decode_tagged(&json!({"type": 99, "version": 1})) {
            Err(SchemaError::UnknownVariant {
                type_id: 99,
                version: 1,
            }) => {}
            other => panic!("expected UnknownVariant, got {:?}", other),
        }
    }

    #[test]
    fn decode_tagged_missing_tag() {
        match decode_tagged(&json!({"chainId": 84})) {
            Err(SchemaError::Invalid(errors)) => {
                assert!(errors.has_field("type"));
                assert!(errors.has_field("version"));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn extra_fields_are_preserved() {
        let mut bag = transfer_v2();
        bag["id"] = json!("txid");
        let tx = decode(TransactionKind::Transfer, 2, &bag).unwrap();
        assert_eq!(tx.extra.get("id"), Some(&json!("txid")));
        assert_eq!(encode(&tx).unwrap(), bag);
    }

    #[test]
    fn encode_rejects_mismatched_auth() {
        let mut tx = decode(TransactionKind::Transfer, 2, &transfer_v2()).unwrap();
        tx.authentication = Authentication::Signature("sig".into());
        assert!(matches!(encode(&tx), Err(SchemaError::Invalid(_))));
    }

    #[test]
    fn encode_rejects_unknown_version() {
        let mut tx = decode(TransactionKind::Transfer, 2, &transfer_v2()).unwrap();
        tx.version = 7;
        match encode(&tx) {
            Err(SchemaError::UnknownVariant {
                type_id: 4,
                version: 7,
            }) => {}
            other => panic!("expected UnknownVariant, got {:?}", other),
        }
    }

    #[test]
    fn encode_rejects_missing_sender() {
        let mut tx = decode(TransactionKind::Transfer, 2, &transfer_v2()).unwrap();
        tx.sender_public_key = None;
        match encode(&tx) {
            Err(SchemaError::Invalid(errors)) => assert!(errors.has_field("senderPublicKey")),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn serde_goes_through_codec() {
        let tx = decode_tagged(&transfer_v2()).unwrap();
        let text = serde_json::to_string(&tx).unwrap();
        let back: Transaction = serde_json::from_str(&text).unwrap();
        assert_eq!(tx, back);
        assert!(serde_json::from_str::<Transaction>(r#"{"type": 4}"#).is_err());
    }

    #[test]
    fn emit_fields_null_vs_omitted() {
        let specs = [
            FieldSpec::nullable("a", catalog::FieldType::Text),
            FieldSpec::optional("b", catalog::FieldType::Text),
        ];
        let out = emit_fields(specs.iter(), vec![("a", None), ("b", None)]).unwrap();
        assert_eq!(Value::Object(out), json!({"a": null}));

        assert!(emit_fields(specs.iter(), vec![("c", Some(json!(1)))]).is_err());
    }
}

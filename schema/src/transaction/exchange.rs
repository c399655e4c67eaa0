//! Exchange orders, the nested variant family carried by exchange
//! transactions.
//!
//! Orders are versioned independently of the exchange transaction that
//! matches them. v3 adds `matcherFeeAssetId`; v4 adds `priceMode` and an
//! optional `eip712Signature`. Authentication follows the legacy rule on
//! the order's own axis: `signature` at v1, `proofs` from v2.

use std::fmt;
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::auth::{self, Authentication};
use super::catalog;
use super::codec::{emit_authentication, emit_extra, emit_fields};
use super::error::{SchemaError, ValidationError};
use super::types::Long;
use super::validation::{self, join, malformed, Checker, FieldValue, Fields, AUTH_FIELDS};
use crate::config::CodecConfig;

// ---------------------------------------------------------------------------
// OrderType / PriceMode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Buy,
    Sell,
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(format!("expected 'buy' or 'sell', got '{}'", other)),
        }
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an order v4 `price` is scaled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriceMode {
    FixedDecimals,
    AssetDecimals,
}

impl PriceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FixedDecimals => "fixedDecimals",
            Self::AssetDecimals => "assetDecimals",
        }
    }

    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "fixedDecimals" => Ok(Self::FixedDecimals),
            "assetDecimals" => Ok(Self::AssetDecimals),
            other => Err(format!(
                "expected 'fixedDecimals' or 'assetDecimals', got '{}'",
                other
            )),
        }
    }
}

impl fmt::Display for PriceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AssetPair
// ---------------------------------------------------------------------------

/// The traded pair. `None` is the native token on either side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetPair {
    pub amount_asset: Option<String>,
    pub price_asset: Option<String>,
}

impl AssetPair {
    pub fn to_json(&self) -> Value {
        serde_json::json!({
            "amountAsset": self.amount_asset,
            "priceAsset": self.price_asset,
        })
    }
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// A signed exchange order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub version: u8,
    pub order_type: OrderType,
    pub asset_pair: AssetPair,
    pub price: Long,
    pub amount: Long,
    pub timestamp: u64,
    pub expiration: u64,
    pub matcher_fee: Long,
    pub matcher_public_key: String,
    pub sender_public_key: String,
    /// v3 and later.
    pub matcher_fee_asset_id: Option<String>,
    /// v4 only.
    pub price_mode: Option<PriceMode>,
    /// v4 only, never required.
    pub eip712_signature: Option<String>,
    pub authentication: Authentication,
    /// Fields this order version does not define, kept verbatim.
    pub extra: Map<String, Value>,
}

impl Order {
    /// Decodes a standalone order. Error paths are relative to the order.
    pub fn from_json(value: &Value) -> Result<Self, SchemaError> {
        validation::run_nested(&CodecConfig::default(), false, |checker| {
            check_order(checker, value, "")
        })
    }

    pub fn to_json(&self) -> Result<Value, SchemaError> {
        let specs = catalog::lookup_order(self.version).ok_or_else(|| {
            SchemaError::invalid(ValidationError::field(
                "version",
                format!("unknown order version {}", self.version),
            ))
        })?;
        let mode = auth::resolve_order(self.version)?;
        if self.authentication.mode() != mode {
            return Err(SchemaError::invalid(ValidationError::field(
                self.authentication.mode().field_name(),
                format!("order version {} requires {}", self.version, mode),
            )));
        }

        let mut out = emit_fields(
            specs.iter(),
            vec![
                ("version", Some(Value::from(self.version))),
                ("orderType", Some(Value::from(self.order_type.as_str()))),
                ("assetPair", Some(self.asset_pair.to_json())),
                ("price", Some(self.price.to_json())),
                ("amount", Some(self.amount.to_json())),
                ("timestamp", Some(Value::from(self.timestamp))),
                ("expiration", Some(Value::from(self.expiration))),
                ("matcherFee", Some(self.matcher_fee.to_json())),
                ("matcherPublicKey", Some(Value::from(self.matcher_public_key.as_str()))),
                ("senderPublicKey", Some(Value::from(self.sender_public_key.as_str()))),
                ("matcherFeeAssetId", self.matcher_fee_asset_id.as_deref().map(Value::from)),
                ("priceMode", self.price_mode.map(|m| Value::from(m.as_str()))),
                ("eip712Signature", self.eip712_signature.as_deref().map(Value::from)),
            ],
        )
        .map_err(SchemaError::invalid)?;
        emit_authentication(&mut out, &self.authentication).map_err(SchemaError::invalid)?;
        emit_extra(&mut out, &self.extra);
        Ok(Value::Object(out))
    }
}

/// Order versions an exchange transaction of `tx_version` may carry.
pub fn permitted_order_versions(tx_version: u8) -> RangeInclusive<u8> {
    match tx_version {
        1 => 1..=1,
        2 => 1..=3,
        3 => 1..=4,
        // empty
        _ => 1..=0,
    }
}

// ---------------------------------------------------------------------------
// Checking
// ---------------------------------------------------------------------------

pub(crate) fn check_asset_pair(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &str,
) -> Option<AssetPair> {
    let obj = checker.as_object(value, path)?;
    let mut fields = checker.closed_object(catalog::ASSET_PAIR.iter(), obj, path, &[])?;
    let pair = checker.materialize(|| {
        Ok(AssetPair {
            amount_asset: fields.take_opt("amountAsset", FieldValue::into_string)?,
            price_asset: fields.take_opt("priceAsset", FieldValue::into_string)?,
        })
    })?;
    if pair.amount_asset == pair.price_asset {
        checker.fail(ValidationError::field(
            join(path, "priceAsset"),
            "must differ from amountAsset",
        ));
        return None;
    }
    Some(pair)
}

pub(crate) fn check_order(checker: &mut Checker<'_>, value: &Value, path: &str) -> Option<Order> {
    let obj = checker.as_object(value, path)?;
    let version_path = join(path, "version");
    let version = match obj.get("version").map(|v| v.as_u64()) {
        None => {
            checker.fail(ValidationError::field(version_path, "missing required field"));
            return None;
        }
        Some(None) => {
            checker.fail(ValidationError::field(version_path, "expected a non-negative integer"));
            return None;
        }
        Some(Some(v)) => v,
    };
    let (specs, mode) = match u8::try_from(version)
        .ok()
        .and_then(|v| Some((catalog::lookup_order(v)?, auth::resolve_order(v).ok()?)))
    {
        Some(found) => found,
        None => {
            checker.fail(malformed(path, format!("unknown order version {}", version)));
            return None;
        }
    };

    let fields = checker.object(specs.iter(), obj, path, &AUTH_FIELDS);
    let authentication = checker.authentication(mode, obj, path);
    let (mut fields, authentication) = (fields?, authentication?);

    let order = checker.materialize(|| order_from_fields(&mut fields, authentication))?;
    if order.expiration < order.timestamp {
        checker.fail(ValidationError::field(
            join(path, "expiration"),
            format!(
                "expiration {} precedes timestamp {}",
                order.expiration, order.timestamp
            ),
        ));
        return None;
    }
    Some(order)
}

fn order_from_fields(
    fields: &mut Fields,
    authentication: Authentication,
) -> Result<Order, ValidationError> {
    Ok(Order {
        version: fields.take("version", FieldValue::into_u8)?,
        order_type: fields.take("orderType", FieldValue::into_order_type)?,
        asset_pair: fields.take("assetPair", FieldValue::into_asset_pair)?,
        price: fields.take("price", FieldValue::into_long)?,
        amount: fields.take("amount", FieldValue::into_long)?,
        timestamp: fields.take("timestamp", FieldValue::into_u64)?,
        expiration: fields.take("expiration", FieldValue::into_u64)?,
        matcher_fee: fields.take("matcherFee", FieldValue::into_long)?,
        matcher_public_key: fields.take("matcherPublicKey", FieldValue::into_string)?,
        sender_public_key: fields.take("senderPublicKey", FieldValue::into_string)?,
        matcher_fee_asset_id: fields.take_opt("matcherFeeAssetId", FieldValue::into_string)?,
        price_mode: fields.take_opt("priceMode", FieldValue::into_price_mode)?,
        eip712_signature: fields.take_opt("eip712Signature", FieldValue::into_string)?,
        authentication,
        extra: fields.take_extra(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::auth::AuthMode;
    use serde_json::json;

    fn order_v3() -> Value {
        json!({
            "version": 3,
            "orderType": "buy",
            "assetPair": {"amountAsset": "8LQW8f7P5d5PZM7GtZEBgaqRPGSzS3DfPuiXrURJ4AJS", "priceAsset": null},
            "price": 100,
            "amount": 10,
            "timestamp": 1000,
            "expiration": 2000,
            "matcherFee": 300000,
            "matcherPublicKey": "7kPFrHDiGw1rCm7LPszuECwWYL3dMf6iMifLRDJQZMzy",
            "senderPublicKey": "FM5ojNqW7e9cZ9zhPYGkpSP1Pcd8Z3e3MNKYVS5pGJ8Z",
            "matcherFeeAssetId": null,
            "proofs": ["3pP3H9b"]
        })
    }

    fn invalid(result: Result<Order, SchemaError>) -> crate::transaction::error::ValidationErrors {
        match result {
            Err(SchemaError::Invalid(errors)) => errors,
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn v3_with_fee_asset_decodes_with_proofs() {
        let order = Order::from_json(&order_v3()).unwrap();
        assert_eq!(order.version, 3);
        assert_eq!(order.authentication.mode(), AuthMode::Proofs);
        assert_eq!(order.matcher_fee_asset_id, None);
        assert_eq!(order.to_json().unwrap(), order_v3());
    }

    #[test]
    fn v3_without_fee_asset_fails() {
        let mut bag = order_v3();
        bag.as_object_mut().unwrap().remove("matcherFeeAssetId");
        let errors = invalid(Order::from_json(&bag));
        assert!(errors.has_field("matcherFeeAssetId"));
    }

    #[test]
    fn v1_uses_signature() {
        let mut bag = order_v3();
        let obj = bag.as_object_mut().unwrap();
        obj.insert("version".into(), json!(1));
        obj.remove("matcherFeeAssetId");
        obj.remove("proofs");
        obj.insert("signature".into(), json!("5Wpe7xU"));
        let order = Order::from_json(&bag).unwrap();
        assert_eq!(order.authentication, Authentication::Signature("5Wpe7xU".into()));
        assert_eq!(order.to_json().unwrap(), bag);
    }

    #[test]
    fn v4_needs_price_mode() {
        let mut bag = order_v3();
        bag["version"] = json!(4);
        let errors = invalid(Order::from_json(&bag));
        assert!(errors.has_field("priceMode"));

        bag["priceMode"] = json!("assetDecimals");
        bag["eip712Signature"] = json!("0xabcdef");
        let order = Order::from_json(&bag).unwrap();
        assert_eq!(order.price_mode, Some(PriceMode::AssetDecimals));
        assert_eq!(order.to_json().unwrap(), bag);
    }

    #[test]
    fn identical_assets_rejected() {
        let mut bag = order_v3();
        bag["assetPair"] = json!({"amountAsset": null, "priceAsset": null});
        let errors = invalid(Order::from_json(&bag));
        assert!(errors.has_field("assetPair.priceAsset"));
    }

    #[test]
    fn expiration_before_timestamp_rejected() {
        let mut bag = order_v3();
        bag["expiration"] = json!(999);
        let errors = invalid(Order::from_json(&bag));
        assert!(errors.has_field("expiration"));
    }

    #[test]
    fn unknown_version_is_malformed() {
        let mut bag = order_v3();
        bag["version"] = json!(5);
        let errors = invalid(Order::from_json(&bag));
        assert!(errors.has_malformed_nested());
    }

    #[test]
    fn extra_fields_survive() {
        let mut bag = order_v3();
        bag["id"] = json!("someId");
        let order = Order::from_json(&bag).unwrap();
        assert_eq!(order.extra.get("id"), Some(&json!("someId")));
        assert_eq!(order.to_json().unwrap(), bag);
    }

    #[test]
    fn encode_rejects_fields_outside_version() {
        let mut order = Order::from_json(&order_v3()).unwrap();
        order.version = 2;
        order.matcher_fee_asset_id = Some("8LQW8f7P5d5PZM7GtZEBgaqRPGSzS3DfPuiXrURJ4AJS".into());
        assert!(order.to_json().is_err());
    }

    #[test]
    fn permitted_versions() {
        assert_eq!(permitted_order_versions(1), 1..=1);
        assert!(permitted_order_versions(2).contains(&3));
        assert!(!permitted_order_versions(2).contains(&4));
        assert!(permitted_order_versions(3).contains(&4));
        assert!(permitted_order_versions(4).is_empty());
    }
}

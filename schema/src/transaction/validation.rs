//! # Structural Validation
//!
//! Checks a raw field bag against the catalog entry for a claimed
//! `(kind, version)` and, on success, hands the codec a set of already-parsed
//! field values.
//!
//! Checks run in a fixed order for every object, top-level or nested:
//!
//! 1. every required field is present
//! 2. unexpected fields are reported (warning by default, failure when
//!    [`CodecConfig::strict_fields`] is set) and preserved on transactions and
//!    orders; every other nested object rejects them
//! 3. each present field matches its declared semantic type
//! 4. cross-field rules: tag agreement, order-version permission, unique data
//!    keys, list limits, asset-pair distinctness, expiration ordering
//!
//! Independent failures are collected across the whole bag so a caller sees
//! the complete report in one pass. Cross-field rules run over every field
//! that parsed, even when another field failed. A field that fails its type
//! check is not inspected further.

use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::auth::{self, AuthMode, Authentication};
use super::catalog::{self, FieldSpec, FieldType};
use super::codec::{self, EthereumPayload, MassTransferItem};
use super::data_entry::{self, DataEntry};
use super::error::{SchemaError, ValidationError, ValidationErrors};
use super::exchange::{self, AssetPair, Order, OrderType, PriceMode};
use super::invoke::{self, CallArguments, InvokeCall, Payment};
use super::types::{
    check_base58_id, check_hex, check_recipient, decode_base58, json_type_name, Base58, Base64,
    Long, TransactionKind,
};
use crate::config::{CodecConfig, MAX_ASSET_DECIMALS, MAX_PROOFS};

/// Both authentication field names. Neither is ever treated as an
/// unexpected field; the resolver decides which one is allowed.
pub(crate) const AUTH_FIELDS: [&str; 2] = ["signature", "proofs"];

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// `order1` + `assetPair` -> `order1.assetPair`.
pub(crate) fn join(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}

/// `data` + 2 -> `data[2]`.
pub(crate) fn index(path: &str, i: usize) -> String {
    format!("{}[{}]", path, i)
}

/// A nested structure that could not be recognised at all.
pub(crate) fn malformed(path: &str, reason: impl Into<String>) -> ValidationError {
    if path.is_empty() {
        ValidationError::nested("$", reason)
    } else {
        ValidationError::nested(path, reason)
    }
}

// ---------------------------------------------------------------------------
// FieldValue
// ---------------------------------------------------------------------------

/// A field value after its type check, ready for the codec to move into a
/// typed variant.
#[derive(Debug)]
pub(crate) enum FieldValue {
    Null,
    Integer(u64),
    Long(Long),
    Boolean(bool),
    Text(String),
    Base58(Base58),
    Base64(Base64),
    OrderType(OrderType),
    PriceMode(PriceMode),
    AssetPair(AssetPair),
    Order(Box<Order>),
    DataEntries(Vec<DataEntry>),
    Transfers(Vec<MassTransferItem>),
    Call(InvokeCall),
    Arguments(CallArguments),
    Payments(Vec<Payment>),
    Ethereum(Box<EthereumPayload>),
    Opaque(Value),
}

macro_rules! into_variant {
    ($($name:ident => $variant:ident($ty:ty)),* $(,)?) => {
        $(
            pub(crate) fn $name(self) -> Option<$ty> {
                match self {
                    Self::$variant(v) => Some(v),
                    _ => None,
                }
            }
        )*
    };
}

impl FieldValue {
    into_variant! {
        into_u64 => Integer(u64),
        into_long => Long(Long),
        into_bool => Boolean(bool),
        into_string => Text(String),
        into_base58 => Base58(Base58),
        into_base64 => Base64(Base64),
        into_order_type => OrderType(OrderType),
        into_price_mode => PriceMode(PriceMode),
        into_asset_pair => AssetPair(AssetPair),
        into_order => Order(Box<Order>),
        into_entries => DataEntries(Vec<DataEntry>),
        into_transfers => Transfers(Vec<MassTransferItem>),
        into_call => Call(InvokeCall),
        into_arguments => Arguments(CallArguments),
        into_payments => Payments(Vec<Payment>),
        into_ethereum => Ethereum(Box<EthereumPayload>),
        into_opaque => Opaque(Value),
    }

    pub(crate) fn into_u8(self) -> Option<u8> {
        self.into_u64().and_then(|n| u8::try_from(n).ok())
    }
}

/// Parsed fields of one object plus whatever the catalog did not name.
#[derive(Debug, Default)]
pub(crate) struct Fields {
    values: HashMap<&'static str, FieldValue>,
    extra: Map<String, Value>,
}

impl Fields {
    pub(crate) fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Moves a required, non-null value out.
    pub(crate) fn take<T>(
        &mut self,
        name: &'static str,
        convert: fn(FieldValue) -> Option<T>,
    ) -> Result<T, ValidationError> {
        let value = self
            .values
            .remove(name)
            .ok_or_else(|| ValidationError::field(name, "missing required field"))?;
        convert(value).ok_or_else(|| ValidationError::field(name, "value has the wrong kind"))
    }

    /// Moves a nullable or optional value out. Absent and `null` are both
    /// `None`.
    pub(crate) fn take_opt<T>(
        &mut self,
        name: &'static str,
        convert: fn(FieldValue) -> Option<T>,
    ) -> Result<Option<T>, ValidationError> {
        match self.values.remove(name) {
            None | Some(FieldValue::Null) => Ok(None),
            Some(value) => convert(value)
                .map(Some)
                .ok_or_else(|| ValidationError::field(name, "value has the wrong kind")),
        }
    }

    pub(crate) fn take_extra(&mut self) -> Map<String, Value> {
        std::mem::take(&mut self.extra)
    }
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// A non-fatal finding. The bag is still accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// A field the catalog does not name for this variant. Carries the path.
    UnexpectedField(String),
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedField(path) => write!(f, "unexpected field '{}'", path),
        }
    }
}

// ---------------------------------------------------------------------------
// Checker
// ---------------------------------------------------------------------------

/// Accumulates failures and warnings while walking a bag.
pub(crate) struct Checker<'a> {
    config: &'a CodecConfig,
    allow_union: bool,
    failures: Vec<ValidationError>,
    warnings: Vec<ValidationWarning>,
}

impl<'a> Checker<'a> {
    pub(crate) fn new(config: &'a CodecConfig, allow_union: bool) -> Self {
        Self {
            config,
            allow_union,
            failures: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn config(&self) -> &CodecConfig {
        self.config
    }

    /// Union call arguments are acceptable in the current scope.
    pub(crate) fn allow_union(&self) -> bool {
        self.allow_union
    }

    pub(crate) fn fail(&mut self, error: ValidationError) {
        self.failures.push(error);
    }

    /// Position in the failure list, for [`Checker::failed_since`].
    pub(crate) fn mark(&self) -> usize {
        self.failures.len()
    }

    pub(crate) fn failed_since(&self, mark: usize) -> bool {
        self.failures.len() > mark
    }

    /// Records an unknown key, as a warning or a failure depending on config.
    fn unexpected(&mut self, path: String) {
        if self.config.strict_fields {
            self.fail(ValidationError::field(path, "unexpected field"));
        } else {
            warn!(field = %path, "tolerating unexpected field");
            self.warnings.push(ValidationWarning::UnexpectedField(path));
        }
    }

    /// Runs a materialization step, recording its error if it has one.
    pub(crate) fn materialize<T>(
        &mut self,
        build: impl FnOnce() -> Result<T, ValidationError>,
    ) -> Option<T> {
        match build() {
            Ok(value) => Some(value),
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    pub(crate) fn as_object<'v>(
        &mut self,
        value: &'v Value,
        path: &str,
    ) -> Option<&'v Map<String, Value>> {
        match value {
            Value::Object(map) => Some(map),
            other => {
                self.fail(malformed(
                    path,
                    format!("expected an object, got {}", json_type_name(other)),
                ));
                None
            }
        }
    }

    pub(crate) fn as_array<'v>(&mut self, value: &'v Value, path: &str) -> Option<&'v [Value]> {
        match value {
            Value::Array(items) => Some(items),
            other => {
                self.fail(malformed(
                    path,
                    format!("expected an array, got {}", json_type_name(other)),
                ));
                None
            }
        }
    }

    /// Records a key that a closed object cannot carry. Only transactions and
    /// orders keep unknown fields for re-emission.
    pub(crate) fn reject_unknown(&mut self, path: String) {
        self.fail(ValidationError::field(
            path,
            "unexpected field, not allowed in this object",
        ));
    }

    /// Checks one object against a field list and returns whatever parsed,
    /// even if some fields failed. Keys in `reserved` are handled by the
    /// caller and neither parsed nor reported. Unknown keys are kept in
    /// `extra` when `open`, rejected otherwise.
    pub(crate) fn fields(
        &mut self,
        specs: impl Iterator<Item = &'static FieldSpec> + Clone,
        obj: &Map<String, Value>,
        path: &str,
        reserved: &[&str],
        open: bool,
    ) -> Fields {
        let mut fields = Fields::default();

        for spec in specs.clone() {
            if spec.is_required() && !obj.contains_key(spec.name) {
                self.fail(ValidationError::field(
                    join(path, spec.name),
                    "missing required field",
                ));
            }
        }

        for (key, value) in obj {
            let known = reserved.contains(&key.as_str())
                || specs.clone().any(|s| s.name == key.as_str());
            if known {
                continue;
            }
            if open {
                self.unexpected(join(path, key));
                fields.extra.insert(key.clone(), value.clone());
            } else {
                self.reject_unknown(join(path, key));
            }
        }

        for spec in specs {
            if let Some(value) = obj.get(spec.name) {
                if let Some(parsed) = self.value(spec, value, &join(path, spec.name)) {
                    fields.values.insert(spec.name, parsed);
                }
            }
        }
        fields
    }

    /// [`Checker::fields`] for an object that keeps unknown keys. `None` if
    /// anything in it failed.
    pub(crate) fn object(
        &mut self,
        specs: impl Iterator<Item = &'static FieldSpec> + Clone,
        obj: &Map<String, Value>,
        path: &str,
        reserved: &[&str],
    ) -> Option<Fields> {
        let mark = self.mark();
        let fields = self.fields(specs, obj, path, reserved, true);
        (!self.failed_since(mark)).then_some(fields)
    }

    /// [`Checker::fields`] for an object that has no place for unknown keys.
    pub(crate) fn closed_object(
        &mut self,
        specs: impl Iterator<Item = &'static FieldSpec> + Clone,
        obj: &Map<String, Value>,
        path: &str,
        reserved: &[&str],
    ) -> Option<Fields> {
        let mark = self.mark();
        let fields = self.fields(specs, obj, path, reserved, false);
        (!self.failed_since(mark)).then_some(fields)
    }

    fn value(&mut self, spec: &FieldSpec, value: &Value, path: &str) -> Option<FieldValue> {
        if value.is_null() {
            if spec.nullable {
                return Some(FieldValue::Null);
            }
            self.fail(ValidationError::field(path, "must not be null"));
            return None;
        }
        match spec.ty {
            FieldType::AssetPair => {
                exchange::check_asset_pair(self, value, path).map(FieldValue::AssetPair)
            }
            FieldType::Order => exchange::check_order(self, value, path)
                .map(|order| FieldValue::Order(Box::new(order))),
            FieldType::DataEntries => {
                data_entry::check_entries(self, value, path).map(FieldValue::DataEntries)
            }
            FieldType::Transfers => {
                codec::check_transfers(self, value, path).map(FieldValue::Transfers)
            }
            FieldType::Call => invoke::check_call(self, value, path).map(FieldValue::Call),
            FieldType::Arguments => {
                invoke::check_arguments(self, value, path).map(FieldValue::Arguments)
            }
            FieldType::Payments => {
                invoke::check_payments(self, value, path).map(FieldValue::Payments)
            }
            FieldType::EthereumPayload => codec::check_ethereum_payload(self, value, path)
                .map(|payload| FieldValue::Ethereum(Box::new(payload))),
            ty => match parse_scalar(ty, value) {
                Ok(parsed) => Some(parsed),
                Err(reason) => {
                    self.fail(ValidationError::field(path, reason));
                    None
                }
            },
        }
    }

    /// Checks the authentication field the resolver chose and rejects the
    /// other one.
    pub(crate) fn authentication(
        &mut self,
        mode: AuthMode,
        obj: &Map<String, Value>,
        path: &str,
    ) -> Option<Authentication> {
        let mark = self.mark();
        let other = mode.other();
        if obj.contains_key(other.field_name()) {
            self.fail(ValidationError::field(
                join(path, other.field_name()),
                format!("not permitted for this version, expected {}", mode),
            ));
        }

        let field_path = join(path, mode.field_name());
        let auth = match (mode, obj.get(mode.field_name())) {
            (_, None) => {
                self.fail(ValidationError::field(field_path, "missing required field"));
                None
            }
            (AuthMode::Signature, Some(Value::String(s))) => match decode_base58(s) {
                Ok(_) => Some(Authentication::Signature(s.clone())),
                Err(reason) => {
                    self.fail(ValidationError::field(field_path, reason));
                    None
                }
            },
            (AuthMode::Proofs, Some(Value::Array(items))) => {
                if items.len() > MAX_PROOFS {
                    self.fail(ValidationError::field(
                        field_path.clone(),
                        format!("at most {} proofs allowed, got {}", MAX_PROOFS, items.len()),
                    ));
                }
                let mut proofs = Vec::with_capacity(items.len());
                for (i, item) in items.iter().enumerate() {
                    let proof = item
                        .as_str()
                        .ok_or_else(|| format!("expected a string, got {}", json_type_name(item)))
                        .and_then(|s| decode_base58(s).map(|_| s.to_string()));
                    match proof {
                        Ok(p) => proofs.push(p),
                        Err(reason) => {
                            self.fail(ValidationError::field(index(&field_path, i), reason))
                        }
                    }
                }
                Some(Authentication::Proofs(proofs))
            }
            (AuthMode::Signature, Some(other)) => {
                self.fail(ValidationError::field(
                    field_path,
                    format!("expected a string, got {}", json_type_name(other)),
                ));
                None
            }
            (AuthMode::Proofs, Some(other)) => {
                self.fail(ValidationError::field(
                    field_path,
                    format!("expected an array, got {}", json_type_name(other)),
                ));
                None
            }
        };

        if self.failed_since(mark) {
            None
        } else {
            auth
        }
    }

    pub(crate) fn finish(self) -> (Vec<ValidationError>, Vec<ValidationWarning>) {
        (self.failures, self.warnings)
    }
}

/// Runs a standalone nested check (a lone data entry, order, or argument
/// list) outside of any transaction.
pub(crate) fn run_nested<T>(
    config: &CodecConfig,
    allow_union: bool,
    check: impl FnOnce(&mut Checker<'_>) -> Option<T>,
) -> Result<T, SchemaError> {
    let mut checker = Checker::new(config, allow_union);
    let result = check(&mut checker);
    let (failures, _) = checker.finish();
    match result {
        Some(value) if failures.is_empty() => Ok(value),
        _ => Err(SchemaError::Invalid(ValidationErrors(failures))),
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

fn unsigned(value: &Value, max: u64) -> Result<u64, String> {
    let n = value.as_u64().ok_or_else(|| {
        format!(
            "expected a non-negative integer, got {}",
            json_type_name(value)
        )
    })?;
    if n > max {
        return Err(format!("{} is out of range 0..={}", n, max));
    }
    Ok(n)
}

fn string(value: &Value) -> Result<&str, String> {
    value
        .as_str()
        .ok_or_else(|| format!("expected a string, got {}", json_type_name(value)))
}

fn parse_scalar(ty: FieldType, value: &Value) -> Result<FieldValue, String> {
    match ty {
        FieldType::TypeTag | FieldType::Version | FieldType::ChainId => {
            unsigned(value, u64::from(u8::MAX)).map(FieldValue::Integer)
        }
        FieldType::Timestamp => unsigned(value, u64::MAX).map(FieldValue::Integer),
        FieldType::Decimals => unsigned(value, MAX_ASSET_DECIMALS).map(FieldValue::Integer),
        FieldType::Long(bound) => {
            let long = Long::from_json(value)?;
            if bound.admits(long.value()) {
                Ok(FieldValue::Long(long))
            } else {
                Err(format!("expected a {}, got {}", ty, long))
            }
        }
        FieldType::Boolean => value
            .as_bool()
            .map(FieldValue::Boolean)
            .ok_or_else(|| format!("expected a boolean, got {}", json_type_name(value))),
        FieldType::Text => string(value).map(|s| FieldValue::Text(s.to_string())),
        FieldType::Key => {
            let s = string(value)?;
            if s.is_empty() {
                return Err("must not be empty".to_string());
            }
            Ok(FieldValue::Text(s.to_string()))
        }
        FieldType::Id => {
            let s = string(value)?;
            check_base58_id(s)?;
            Ok(FieldValue::Text(s.to_string()))
        }
        FieldType::Recipient => {
            let s = string(value)?;
            check_recipient(s)?;
            Ok(FieldValue::Text(s.to_string()))
        }
        FieldType::Hex => {
            let s = string(value)?;
            check_hex(s)?;
            Ok(FieldValue::Text(s.to_string()))
        }
        FieldType::Base58Bytes => Base58::parse(string(value)?).map(FieldValue::Base58),
        FieldType::Base64Bytes => Base64::parse(string(value)?).map(FieldValue::Base64),
        FieldType::OrderType => OrderType::parse(string(value)?).map(FieldValue::OrderType),
        FieldType::PriceMode => PriceMode::parse(string(value)?).map(FieldValue::PriceMode),
        FieldType::Opaque => Ok(FieldValue::Opaque(value.clone())),
        FieldType::Null => Err(format!("expected null, got {}", json_type_name(value))),
        other => Err(format!("{} is not a scalar field type", other)),
    }
}

// ---------------------------------------------------------------------------
// Validated
// ---------------------------------------------------------------------------

/// A bag that passed validation, along with any warnings raised on the way.
#[derive(Debug)]
pub struct Validated {
    kind: TransactionKind,
    version: u8,
    fields: Fields,
    authentication: Authentication,
    warnings: Vec<ValidationWarning>,
}

impl Validated {
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn version(&self) -> u8 {
        self.version
    }

    pub fn authentication(&self) -> &Authentication {
        &self.authentication
    }

    pub fn warnings(&self) -> &[ValidationWarning] {
        &self.warnings
    }

    pub(crate) fn into_parts(self) -> (Fields, Authentication, Vec<ValidationWarning>) {
        (self.fields, self.authentication, self.warnings)
    }
}

/// Validates a bag with the default [`CodecConfig`].
pub fn validate(kind: TransactionKind, version: u8, bag: &Value) -> Result<Validated, SchemaError> {
    validate_with(&CodecConfig::default(), kind, version, bag)
}

/// Validates a bag against the catalog entry for `(kind, version)`.
///
/// # Errors
///
/// - [`SchemaError::UnknownVariant`] if the pair is not in the catalog.
/// - [`SchemaError::UnresolvedAuthentication`] if no authentication rule exists.
/// - [`SchemaError::Invalid`] carrying every independent failure found.
pub fn validate_with(
    config: &CodecConfig,
    kind: TransactionKind,
    version: u8,
    bag: &Value,
) -> Result<Validated, SchemaError> {
    let spec =
        catalog::lookup(kind, version).ok_or_else(|| SchemaError::unknown_variant(kind, version))?;
    let mode = auth::resolve(kind, version)?;

    let allow_union = config.union_arguments && kind == TransactionKind::Invoke && version >= 2;
    let mut checker = Checker::new(config, allow_union);

    // Cross-field rules run over whatever parsed, so their failures are
    // reported alongside unrelated field failures.
    let checked = checker.as_object(bag, "").map(|obj| {
        let fields = checker.fields(spec.fields(), obj, "", &AUTH_FIELDS, true);
        let authentication = checker.authentication(mode, obj, "");
        cross_checks(&mut checker, kind, version, &fields);
        (fields, authentication)
    });

    let (failures, warnings) = checker.finish();
    match checked {
        Some((fields, Some(authentication))) if failures.is_empty() => Ok(Validated {
            kind,
            version,
            fields,
            authentication,
            warnings,
        }),
        _ => {
            debug!(kind = %kind, version, failures = failures.len(), "validation failed");
            Err(SchemaError::Invalid(ValidationErrors(failures)))
        }
    }
}

/// Rules that span more than one field or depend on the transaction version.
fn cross_checks(checker: &mut Checker<'_>, kind: TransactionKind, version: u8, fields: &Fields) {
    if let Some(FieldValue::Integer(type_id)) = fields.get("type") {
        if *type_id != u64::from(kind.type_id()) {
            checker.fail(ValidationError::field(
                "type",
                format!("expected {} for {}, got {}", kind.type_id(), kind, type_id),
            ));
        }
    }
    if let Some(FieldValue::Integer(v)) = fields.get("version") {
        if *v != u64::from(version) {
            checker.fail(ValidationError::field(
                "version",
                format!("expected {}, got {}", version, v),
            ));
        }
    }

    match kind {
        TransactionKind::Data if version < 2 => {
            if let Some(FieldValue::DataEntries(entries)) = fields.get("data") {
                for (i, entry) in entries.iter().enumerate() {
                    if entry.is_delete() {
                        checker.fail(ValidationError::field(
                            index("data", i),
                            "delete entries require data transaction version 2",
                        ));
                    }
                }
            }
        }
        TransactionKind::Exchange => {
            let permitted = exchange::permitted_order_versions(version);
            for name in ["order1", "order2"] {
                if let Some(FieldValue::Order(order)) = fields.get(name) {
                    if !permitted.contains(&order.version) {
                        checker.fail(ValidationError::field(
                            join(name, "version"),
                            format!(
                                "order version {} is not accepted by exchange version {}",
                                order.version, version
                            ),
                        ));
                    }
                }
            }
        }
        _ => {}
    }
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
            "version": 2,
            "chainId": 84,
            "senderPublicKey": "abc",
            "timestamp": 1000,
            "fee": "100000",
            "recipient": "alias:T:x",
            "amount": "500",
            "feeAssetId": null,
            "assetId": null,
            "attachment": "",
            "proofs": ["sig1"]
        })
    }

    fn invalid(result: Result<Validated, SchemaError>) -> ValidationErrors {
        match result {
            Err(SchemaError::Invalid(errors)) => errors,
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn accepts_valid_transfer() {
        let validated = validate(TransactionKind::Transfer, 2, &transfer_v2()).unwrap();
        assert_eq!(validated.kind(), TransactionKind::Transfer);
        assert_eq!(
            validated.authentication(),
            &Authentication::Proofs(vec!["sig1".into()])
        );
        assert!(validated.warnings().is_empty());
    }

    #[test]
    fn unknown_variant_is_reported_before_checks() {
        match validate(TransactionKind::Transfer, 9, &transfer_v2()) {
            Err(SchemaError::UnknownVariant {
                type_id: 4,
                version: 9,
            }) => {}
            other => panic!("expected UnknownVariant, got {:?}", other),
        }
    }

    #[test]
    fn collects_independent_failures() {
        let mut bag = transfer_v2();
        let obj = bag.as_object_mut().unwrap();
        obj.remove("fee");
        obj.insert("amount".into(), json!("-1"));
        obj.insert("recipient".into(), json!(42));

        let errors = invalid(validate(TransactionKind::Transfer, 2, &bag));
        assert!(errors.has_field("fee"));
        assert!(errors.has_field("amount"));
        assert!(errors.has_field("recipient"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn unexpected_fields_warn_by_default() {
        let mut bag = transfer_v2();
        bag["memo"] = json!("hi");
        let validated = validate(TransactionKind::Transfer, 2, &bag).unwrap();
        assert_eq!(
            validated.warnings(),
            &[ValidationWarning::UnexpectedField("memo".into())]
        );
    }

    #[test]
    fn unexpected_fields_fail_when_strict() {
        let mut bag = transfer_v2();
        bag["memo"] = json!("hi");
        let config = CodecConfig::default().strict(true);
        let errors = invalid(validate_with(&config, TransactionKind::Transfer, 2, &bag));
        assert!(errors.has_field("memo"));
    }

    #[test]
    fn wrong_auth_field_is_rejected() {
        let mut bag = transfer_v2();
        bag["signature"] = json!("sig");
        let errors = invalid(validate(TransactionKind::Transfer, 2, &bag));
        assert!(errors.has_field("signature"));

        let mut bag = transfer_v2();
        bag.as_object_mut().unwrap().remove("proofs");
        let errors = invalid(validate(TransactionKind::Transfer, 2, &bag));
        assert!(errors.has_field("proofs"));
    }

    #[test]
    fn too_many_proofs() {
        let mut bag = transfer_v2();
        bag["proofs"] = json!(["a", "b", "c", "d", "e", "f", "g", "h", "i"]);
        let errors = invalid(validate(TransactionKind::Transfer, 2, &bag));
        assert!(errors.has_field("proofs"));
    }

    #[test]
    fn tag_must_agree_with_claim() {
        let mut bag = transfer_v2();
        bag["type"] = json!(8);
        let errors = invalid(validate(TransactionKind::Transfer, 2, &bag));
        assert!(errors.has_field("type"));

        let mut bag = transfer_v2();
        bag["version"] = json!(3);
        let errors = invalid(validate(TransactionKind::Transfer, 2, &bag));
        assert!(errors.has_field("version"));
    }

    #[test]
    fn tag_mismatch_reported_with_missing_field() {
        let mut bag = transfer_v2();
        bag["type"] = json!(8);
        bag.as_object_mut().unwrap().remove("fee");
        let errors = invalid(validate(TransactionKind::Transfer, 2, &bag));
        assert!(errors.has_field("type"));
        assert!(errors.has_field("fee"));
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn nested_objects_are_closed() {
        let config = CodecConfig::default();
        let mut checker = Checker::new(&config, false);
        let obj = json!({"amountAsset": null, "priceAsset": "abc", "note": 1});
        let obj = obj.as_object().unwrap();
        assert!(checker
            .closed_object(catalog::ASSET_PAIR.iter(), obj, "assetPair", &[])
            .is_none());
        let (failures, warnings) = checker.finish();
        assert!(warnings.is_empty());
        assert!(ValidationErrors(failures).has_field("assetPair.note"));
    }

    #[test]
    fn non_object_bag() {
        let errors = invalid(validate(TransactionKind::Transfer, 2, &json!([1, 2])));
        assert!(errors.has_malformed_nested());
    }

    #[test]
    fn decimals_range() {
        let bag = json!({
            "type": 3, "version": 2, "chainId": 84, "senderPublicKey": "abc",
            "timestamp": 1, "fee": 100000000, "name": "Token", "description": "",
            "decimals": 9, "quantity": 1000, "reissuable": true, "script": null,
            "proofs": []
        });
        let errors = invalid(validate(TransactionKind::Issue, 2, &bag));
        assert!(errors.has_field("decimals"));
    }

    #[test]
    fn null_on_non_nullable_field() {
        let mut bag = transfer_v2();
        bag["recipient"] = Value::Null;
        let errors = invalid(validate(TransactionKind::Transfer, 2, &bag));
        assert!(errors.has_field("recipient"));
    }

    #[test]
    fn paths() {
        assert_eq!(join("", "fee"), "fee");
        assert_eq!(join("order1", "assetPair"), "order1.assetPair");
        assert_eq!(index("data", 2), "data[2]");
        assert_eq!(index("call.args[0]", 1), "call.args[0][1]");
    }
}

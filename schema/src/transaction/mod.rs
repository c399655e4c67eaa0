//! # Transaction Module
//!
//! Shape, validation, and encoding of every ledger transaction kind across
//! every protocol version it has had. Callers hand in a decoded field bag
//! (usually parsed JSON from a node) plus a claimed `(kind, version)` and get
//! back a typed [`Transaction`] or a [`SchemaError`] that names the field at
//! fault.
//!
//! ## Architecture
//!
//! ```text
//! types.rs      - TransactionKind, Long, base58/base64 wrappers
//! catalog.rs    - (kind, version) -> ordered field specification
//! auth.rs       - signature vs proofs resolution
//! validation.rs - presence, type, and cross-field checks
//! codec.rs      - field bag <-> Transaction
//! data_entry.rs - data transaction entries
//! invoke.rs     - invoke calls, arena-backed arguments, payments
//! exchange.rs   - exchange orders
//! error.rs      - SchemaError / ValidationError
//! ```
//!
//! ## Flow
//!
//! 1. **Lookup**: [`catalog::lookup`] yields the expected shape.
//! 2. **Validate**: [`validate`] checks the bag and collects every failure.
//! 3. **Materialize**: [`decode`] moves the parsed values into a
//!    [`Transaction`], recursing into nested families.
//! 4. **Encode**: [`encode`] walks the same catalog entry to rebuild the bag.
//!
//! [`auth::resolve`] can be consulted on its own whenever a caller only needs
//! to know which authentication field to fill.

pub mod auth;
pub mod catalog;
pub mod codec;
pub mod data_entry;
pub mod error;
pub mod exchange;
pub mod invoke;
pub mod types;
pub mod validation;

pub use auth::{AuthMode, Authentication};
pub use catalog::{FieldSpec, FieldType, VariantSpec};
pub use codec::{
    decode, decode_tagged, encode, Codec, EthereumPayload, MassTransferItem, Transaction,
    TransactionBody,
};
pub use data_entry::{DataEntry, DataValue};
pub use error::{SchemaError, ValidationError, ValidationErrors};
pub use exchange::{AssetPair, Order, OrderType, PriceMode};
pub use invoke::{ArgId, ArgumentNode, ArgumentsBuilder, CallArguments, InvokeCall, Payment, Scalar};
pub use types::{Base58, Base64, Long, TransactionKind};
pub use validation::{validate, validate_with, Validated, ValidationWarning};

// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger Transaction Schema: Core Library
//!
//! A versioned schema registry for public-ledger transactions. Eighteen
//! transaction kinds, each with its own history of field layouts, collapsed
//! into one data-driven catalog plus the small amount of decision logic the
//! layouts imply: which authentication field a variant carries, which order
//! versions an exchange accepts, and how nested data entries, call arguments,
//! and orders decode.
//!
//! ## Architecture
//!
//! - **transaction**: Catalog, authentication resolver, validator, codec.
//! - **config**: Protocol limits and the tunable [`CodecConfig`].
//!
//! ## Quick Start
//!
//! ```ignore
//! use ledger_tx_schema::transaction::{decode_tagged, encode};
//!
//! let bag: serde_json::Value = serde_json::from_str(raw)?;
//! let tx = decode_tagged(&bag)?;
//! assert_eq!(encode(&tx)?, bag);
//! ```
//!
//! ## Scope
//!
//! Pure and stateless: no I/O, no signing, no binary wire format. Every
//! operation is a function over immutable input and is safe to call from any
//! number of threads.

pub mod config;
pub mod transaction;

pub use config::CodecConfig;
pub use transaction::{
    decode, decode_tagged, encode, validate, Authentication, AuthMode, Codec, SchemaError,
    Transaction, TransactionKind,
};

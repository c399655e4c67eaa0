//! Shared fixtures for the integration tests: one syntactically valid bag
//! for every `(kind, version)` in the catalog.

#![allow(dead_code)]

use serde_json::{json, Value};

use ledger_tx_schema::transaction::auth::{self, AuthMode};
use ledger_tx_schema::transaction::TransactionKind;

pub const SENDER: &str = "FM5ojNqW7e9cZ9zhPYGkpSP1Pcd8Z3e3MNKYVS5pGJ8Z";
pub const MATCHER: &str = "7kPFrHDiGw1rCm7LPszuECwWYL3dMf6iMifLRDJQZMzy";
pub const ADDRESS: &str = "3N1HYdheNiiTtHgi2n3jLAek6N3H4guaciG";
pub const ASSET: &str = "8LQW8f7P5d5PZM7GtZEBgaqRPGSzS3DfPuiXrURJ4AJS";
pub const SIGNATURE: &str = "5Wpe7xUkmvCRJ4cN9vwTrBDqF6frvGk5BRrpsHjw4Ejz";

/// Routes library `tracing` output through the test harness. Safe to call
/// from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Adds the authentication field the resolver expects.
pub fn authenticate(bag: &mut Value, mode: AuthMode) {
    match mode {
        AuthMode::Signature => bag["signature"] = json!(SIGNATURE),
        AuthMode::Proofs => bag["proofs"] = json!([SIGNATURE, "2N3z"]),
    }
}

pub fn order(version: u8, order_type: &str) -> Value {
    let mut bag = json!({
        "version": version,
        "orderType": order_type,
        "assetPair": {"amountAsset": ASSET, "priceAsset": null},
        "price": 1_500_000,
        "amount": "250000000",
        "timestamp": 1_700_000_000_000u64,
        "expiration": 1_702_000_000_000u64,
        "matcherFee": 300_000,
        "matcherPublicKey": MATCHER,
        "senderPublicKey": SENDER,
    });
    if version >= 3 {
        bag["matcherFeeAssetId"] = Value::Null;
    }
    if version >= 4 {
        bag["priceMode"] = json!("fixedDecimals");
    }
    let mode = match auth::resolve_order(version) {
        Ok(mode) => mode,
        Err(e) => panic!("no order auth for v{}: {}", version, e),
    };
    authenticate(&mut bag, mode);
    bag
}

fn body(kind: TransactionKind, version: u8) -> Value {
    use TransactionKind::*;
    match kind {
        Genesis => json!({"recipient": ADDRESS, "amount": 100_000_000}),
        Payment => json!({"sender": ADDRESS, "recipient": ADDRESS, "amount": 5}),
        Issue => json!({
            "name": "Gold",
            "description": "one gram",
            "decimals": 8,
            "quantity": "100000000000",
            "reissuable": true,
            "script": null,
        }),
        Transfer => json!({
            "recipient": ADDRESS,
            "amount": 1,
            "feeAssetId": null,
            "assetId": ASSET,
            "attachment": "3mJr7AoUXx2Wqd",
        }),
        Reissue => json!({"assetId": ASSET, "quantity": 10, "reissuable": false}),
        Burn => json!({"assetId": ASSET, "amount": 0}),
        Exchange => {
            let (v1, v2) = match version {
                1 => (1, 1),
                2 => (2, 3),
                _ => (3, 4),
            };
            json!({
                "order1": order(v1, "buy"),
                "order2": order(v2, "sell"),
                "price": 1_500_000,
                "amount": "250000000",
                "buyMatcherFee": 300_000,
                "sellMatcherFee": 300_000,
            })
        }
        Lease => json!({"recipient": "alias:T:merry", "amount": "9007199254740993"}),
        CancelLease => json!({"leaseId": ASSET}),
        Alias => json!({"alias": "merry"}),
        MassTransfer => json!({
            "transfers": [
                {"recipient": ADDRESS, "amount": 1},
                {"recipient": "alias:T:pippin", "amount": "2"},
            ],
            "assetId": null,
            "attachment": null,
        }),
        Data => {
            let mut data = vec![
                json!({"key": "int", "type": "integer", "value": -4}),
                json!({"key": "bool", "type": "boolean", "value": true}),
                json!({"key": "str", "type": "string", "value": "hi"}),
                json!({"key": "bin", "type": "binary", "value": "base64:AQID"}),
            ];
            if version >= 2 {
                data.push(json!({"key": "old", "value": null}));
            }
            json!({"data": data})
        }
        SetScript => json!({"script": "base64:AQID"}),
        Sponsorship => json!({"assetId": ASSET, "minSponsoredAssetFee": 100_000}),
        SetAssetScript => json!({"assetId": ASSET, "script": "base64:AQID"}),
        Invoke => {
            let mut args = vec![
                json!({"type": "integer", "value": 42}),
                json!({"type": "list", "value": [
                    {"type": "string", "value": "a"},
                    {"type": "list", "value": [{"type": "boolean", "value": false}]},
                ]}),
            ];
            if version >= 2 {
                args.push(json!({"type": "union", "valueType": "binary", "value": "base64:AQID"}));
            }
            json!({
                "dApp": ADDRESS,
                "call": {"function": "deposit", "args": args},
                "feeAssetId": null,
                "payment": [{"assetId": null, "amount": 100}],
            })
        }
        UpdateAssetInfo => json!({"assetId": ASSET, "name": "Gold", "description": "renamed"}),
        Ethereum => json!({
            "bytes": "0xf86b8085",
            "payload": {
                "type": "transfer",
                "recipient": ADDRESS,
                "amount": 100,
                "asset": null,
            },
        }),
    }
}

/// A bag the codec must accept for `(kind, version)`.
pub fn sample(kind: TransactionKind, version: u8) -> Value {
    let mut bag = body(kind, version);
    bag["type"] = json!(kind.type_id());
    bag["version"] = json!(version);
    bag["chainId"] = json!(84);
    bag["timestamp"] = json!(1_700_000_000_000u64);
    bag["fee"] = json!(100_000);
    if kind != TransactionKind::Genesis {
        bag["senderPublicKey"] = json!(SENDER);
    }
    let mode = match auth::resolve(kind, version) {
        Ok(mode) => mode,
        Err(e) => panic!("no auth for {} v{}: {}", kind, version, e),
    };
    authenticate(&mut bag, mode);
    bag
}

//! Round-trip law over the whole catalog: for every `(kind, version)` the
//! catalog knows, decoding a valid bag and encoding the result gives the
//! same bag back.

mod common;

use serde_json::json;

use ledger_tx_schema::transaction::{
    catalog, decode, decode_tagged, encode, SchemaError, Transaction, TransactionKind,
};

use common::{init_tracing, sample};

#[test]
fn every_variant_roundtrips() {
    init_tracing();
    for spec in catalog::variants() {
        let bag = sample(spec.kind, spec.version);
        let tx = match decode(spec.kind, spec.version, &bag) {
            Ok(tx) => tx,
            Err(e) => panic!("{} v{} rejected: {}", spec.kind, spec.version, e),
        };
        assert_eq!(tx.kind(), spec.kind);
        assert_eq!(tx.version, spec.version);
        let encoded = encode(&tx).unwrap();
        assert_eq!(encoded, bag, "{} v{} did not round-trip", spec.kind, spec.version);
    }
}

#[test]
fn every_variant_roundtrips_through_serde() {
    init_tracing();
    for spec in catalog::variants() {
        let bag = sample(spec.kind, spec.version);
        let text = serde_json::to_string(&bag).unwrap();
        let tx: Transaction = serde_json::from_str(&text).unwrap();
        assert_eq!(serde_json::to_value(&tx).unwrap(), bag);
    }
}

#[test]
fn samples_produce_no_warnings() {
    for spec in catalog::variants() {
        let bag = sample(spec.kind, spec.version);
        let validated =
            ledger_tx_schema::transaction::validate(spec.kind, spec.version, &bag).unwrap();
        assert!(
            validated.warnings().is_empty(),
            "{} v{}: {:?}",
            spec.kind,
            spec.version,
            validated.warnings()
        );
    }
}

#[test]
fn tagged_decode_matches_explicit() {
    for spec in catalog::variants() {
        let bag = sample(spec.kind, spec.version);
        assert_eq!(
            decode_tagged(&bag).unwrap(),
            decode(spec.kind, spec.version, &bag).unwrap()
        );
    }
}

#[test]
fn unknown_fields_survive_every_variant() {
    for spec in catalog::variants() {
        let mut bag = sample(spec.kind, spec.version);
        bag["id"] = json!("Fq7S4i2NNEWXVSq36gVyqkkyLLs5kTDiztnwMtz3FgmX");
        bag["height"] = json!(3_000_001);
        let tx = decode(spec.kind, spec.version, &bag).unwrap();
        assert_eq!(tx.extra.len(), 2);
        assert_eq!(encode(&tx).unwrap(), bag);
    }
}

#[test]
fn nested_objects_refuse_keys_they_cannot_keep() {
    use TransactionKind::*;
    let cases = [
        (Data, 2, "/data/0", "data[0].note"),
        (MassTransfer, 2, "/transfers/1", "transfers[1].note"),
        (Invoke, 2, "/call", "call.note"),
        (Invoke, 2, "/call/args/1/value/0", "call.args[1][0].note"),
        (Invoke, 2, "/payment/0", "payment[0].note"),
        (Exchange, 3, "/order1/assetPair", "order1.assetPair.note"),
        (Ethereum, 1, "/payload", "payload.note"),
    ];
    for (kind, version, pointer, path) in cases {
        let mut bag = sample(kind, version);
        match bag.pointer_mut(pointer) {
            Some(nested) => nested["note"] = json!("x"),
            None => panic!("{} v{} has nothing at {}", kind, version, pointer),
        }
        match decode(kind, version, &bag) {
            Err(SchemaError::Invalid(errors)) => {
                assert!(errors.has_field(path), "{} v{}: got {}", kind, version, errors)
            }
            other => panic!("expected Invalid for {} v{}, got {:?}", kind, version, other),
        }
    }
}

#[test]
fn order_unknown_fields_roundtrip() {
    let mut bag = sample(TransactionKind::Exchange, 3);
    bag["order1"]["id"] = json!("Fq7S4i2NNEWXVSq36gVyqkkyLLs5kTDiztnwMtz3FgmX");
    let tx = decode(TransactionKind::Exchange, 3, &bag).unwrap();
    assert_eq!(encode(&tx).unwrap(), bag);
}

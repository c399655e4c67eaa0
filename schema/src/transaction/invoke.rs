//! # Invoke Calls
//!
//! The `call` of an invoke transaction names a dApp function and carries a
//! list of typed arguments. Arguments are recursive: a `list` argument holds
//! further arguments, and lists may nest.
//!
//! Arguments live in a flat arena ([`CallArguments`]) addressed by
//! [`ArgId`]. Every child is pushed before its parent, so the structure is a
//! tree by construction and can be encoded in a single forward pass without
//! recursion. Decoding recurses, bounded by
//! [`CodecConfig::max_nesting_depth`](crate::config::CodecConfig).
//!
//! ```text
//! {"type": "integer", "value": 7}
//! {"type": "list",    "value": [{"type": "string", "value": "a"}]}
//! {"type": "union",   "valueType": "boolean", "value": true}   // invoke v2
//! ```

use std::collections::HashSet;

use serde_json::{json, Value};

use super::catalog;
use super::error::{SchemaError, ValidationError};
use super::types::{json_type_name, Base64, Long};
use super::validation::{self, index, join, malformed, Checker, FieldValue};
use crate::config::CodecConfig;

// ---------------------------------------------------------------------------
// Argument arena
// ---------------------------------------------------------------------------

/// Index of a node in a [`CallArguments`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArgId(usize);

impl ArgId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A leaf argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Integer(Long),
    String(String),
    Boolean(bool),
    Binary(Base64),
}

impl Scalar {
    pub fn type_tag(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Binary(_) => "binary",
        }
    }

    /// Parses `value` as the scalar named by `tag`. `None` if `tag` is not a
    /// scalar type at all.
    fn parse(tag: &str, value: &Value) -> Option<Result<Self, String>> {
        let parsed = match tag {
            "integer" => Long::from_json(value).map(Self::Integer),
            "string" => value
                .as_str()
                .map(|s| Self::String(s.to_string()))
                .ok_or_else(|| format!("expected a string, got {}", json_type_name(value))),
            "boolean" => value
                .as_bool()
                .map(Self::Boolean)
                .ok_or_else(|| format!("expected a boolean, got {}", json_type_name(value))),
            "binary" => match value.as_str() {
                Some(s) => Base64::parse(s).map(Self::Binary),
                None => Err(format!("expected a string, got {}", json_type_name(value))),
            },
            _ => return None,
        };
        Some(parsed)
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Integer(n) => n.to_json(),
            Self::String(s) => Value::String(s.clone()),
            Self::Boolean(b) => Value::Bool(*b),
            Self::Binary(bytes) => Value::String(bytes.to_string()),
        }
    }
}

/// One node of the argument tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentNode {
    Scalar(Scalar),
    /// A scalar tagged with an explicit `valueType`.
    Union(Scalar),
    /// Children, in order. Each id is lower than this node's own.
    List(Vec<ArgId>),
}

/// Arena-backed argument list of an invoke call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallArguments {
    nodes: Vec<ArgumentNode>,
    roots: Vec<ArgId>,
}

impl CallArguments {
    /// Top-level arguments, in call order.
    pub fn roots(&self) -> &[ArgId] {
        &self.roots
    }

    pub fn node(&self, id: ArgId) -> Option<&ArgumentNode> {
        self.nodes.get(id.0)
    }

    /// Total nodes in the tree, nested ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Deepest `list` nesting level; 0 when there are no lists.
    pub fn depth(&self) -> usize {
        let mut depths = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let depth = match node {
                ArgumentNode::List(children) => {
                    1 + children
                        .iter()
                        .filter_map(|c| depths.get(c.0).copied())
                        .max()
                        .unwrap_or(0)
                }
                _ => 0,
            };
            depths.push(depth);
        }
        self.roots
            .iter()
            .filter_map(|r| depths.get(r.0).copied())
            .max()
            .unwrap_or(0)
    }

    /// Decodes a standalone `args` array. Union arguments are accepted when
    /// the config allows them.
    pub fn from_json(value: &Value, config: &CodecConfig) -> Result<Self, SchemaError> {
        validation::run_nested(config, config.union_arguments, |checker| {
            check_arguments(checker, value, "")
        })
    }

    pub fn to_json(&self) -> Value {
        let mut built: Vec<Option<Value>> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let value = match node {
                ArgumentNode::Scalar(s) => json!({"type": s.type_tag(), "value": s.to_json()}),
                ArgumentNode::Union(s) => json!({
                    "type": "union",
                    "valueType": s.type_tag(),
                    "value": s.to_json(),
                }),
                ArgumentNode::List(children) => {
                    let items: Vec<Value> = children
                        .iter()
                        .map(|c| take_built(&mut built, *c))
                        .collect();
                    json!({"type": "list", "value": items})
                }
            };
            built.push(Some(value));
        }
        Value::Array(
            self.roots
                .iter()
                .map(|r| take_built(&mut built, *r))
                .collect(),
        )
    }
}

fn take_built(built: &mut [Option<Value>], id: ArgId) -> Value {
    built
        .get_mut(id.0)
        .and_then(Option::take)
        .unwrap_or(Value::Null)
}

// ---------------------------------------------------------------------------
// ArgumentsBuilder
// ---------------------------------------------------------------------------

/// Programmatic construction of a [`CallArguments`] tree.
///
/// ```ignore
/// let mut b = ArgumentsBuilder::new();
/// let one = b.scalar(Scalar::Integer(1.into()));
/// let two = b.scalar(Scalar::Integer(2.into()));
/// b.list(&[one, two])?;
/// let args = b.build(); // [[1, 2]]
/// ```
#[derive(Debug, Default)]
pub struct ArgumentsBuilder {
    nodes: Vec<ArgumentNode>,
    attached: Vec<bool>,
}

impl ArgumentsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, node: ArgumentNode) -> ArgId {
        self.nodes.push(node);
        self.attached.push(false);
        ArgId(self.nodes.len() - 1)
    }

    pub fn scalar(&mut self, value: Scalar) -> ArgId {
        self.push(ArgumentNode::Scalar(value))
    }

    pub fn union(&mut self, value: Scalar) -> ArgId {
        self.push(ArgumentNode::Union(value))
    }

    /// Wraps previously created nodes in a list. Each node can be attached
    /// to at most one list.
    pub fn list(&mut self, children: &[ArgId]) -> Result<ArgId, ValidationError> {
        let mut seen = HashSet::new();
        for child in children {
            match self.attached.get(child.0) {
                None => {
                    return Err(ValidationError::nested(
                        "args",
                        format!("unknown argument id {}", child.0),
                    ))
                }
                Some(true) => {
                    return Err(ValidationError::nested(
                        "args",
                        format!("argument {} already belongs to a list", child.0),
                    ))
                }
                Some(false) if !seen.insert(child.0) => {
                    return Err(ValidationError::nested(
                        "args",
                        format!("argument {} appears twice in one list", child.0),
                    ))
                }
                Some(false) => {}
            }
        }
        for child in children {
            self.attached[child.0] = true;
        }
        Ok(self.push(ArgumentNode::List(children.to_vec())))
    }

    /// Finishes the tree. Nodes not attached to any list become top-level
    /// arguments, in creation order.
    pub fn build(self) -> CallArguments {
        let roots = self
            .attached
            .iter()
            .enumerate()
            .filter(|(_, attached)| !**attached)
            .map(|(i, _)| ArgId(i))
            .collect();
        CallArguments {
            nodes: self.nodes,
            roots,
        }
    }
}

// ---------------------------------------------------------------------------
// InvokeCall / Payment
// ---------------------------------------------------------------------------

/// The dApp function invocation carried by an invoke transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvokeCall {
    pub function: String,
    pub args: CallArguments,
}

impl InvokeCall {
    pub fn to_json(&self) -> Value {
        json!({"function": self.function, "args": self.args.to_json()})
    }
}

/// An attached payment. `asset_id` of `None` is the native token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payment {
    pub asset_id: Option<String>,
    pub amount: Long,
}

impl Payment {
    pub fn to_json(&self) -> Value {
        json!({"assetId": self.asset_id, "amount": self.amount.to_json()})
    }
}

// ---------------------------------------------------------------------------
// Checking
// ---------------------------------------------------------------------------

pub(crate) fn check_call(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &str,
) -> Option<InvokeCall> {
    let obj = checker.as_object(value, path)?;
    let mut fields = checker.closed_object(catalog::INVOKE_CALL.iter(), obj, path, &[])?;
    checker.materialize(|| {
        Ok(InvokeCall {
            function: fields.take("function", FieldValue::into_string)?,
            args: fields.take("args", FieldValue::into_arguments)?,
        })
    })
}

pub(crate) fn check_payments(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &str,
) -> Option<Vec<Payment>> {
    let items = checker.as_array(value, path)?;
    let mark = checker.mark();
    let mut payments = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        let item_path = index(path, i);
        let Some(obj) = checker.as_object(item, &item_path) else {
            continue;
        };
        let Some(mut fields) =
            checker.closed_object(catalog::PAYMENT_ITEM.iter(), obj, &item_path, &[])
        else {
            continue;
        };
        let payment = checker.materialize(|| {
            Ok(Payment {
                asset_id: fields.take_opt("assetId", FieldValue::into_string)?,
                amount: fields.take("amount", FieldValue::into_long)?,
            })
        });
        payments.extend(payment);
    }
    if checker.failed_since(mark) {
        None
    } else {
        Some(payments)
    }
}

pub(crate) fn check_arguments(
    checker: &mut Checker<'_>,
    value: &Value,
    path: &str,
) -> Option<CallArguments> {
    let items = checker.as_array(value, path)?;
    let mark = checker.mark();
    let mut args = CallArguments::default();
    for (i, item) in items.iter().enumerate() {
        if let Some(id) = check_argument(checker, &mut args.nodes, item, &index(path, i), 0) {
            args.roots.push(id);
        }
    }
    if checker.failed_since(mark) {
        None
    } else {
        Some(args)
    }
}

/// Decodes one argument, pushing its children and then itself. `depth` is
/// the list level of the enclosing list, 0 at the top.
fn check_argument(
    checker: &mut Checker<'_>,
    nodes: &mut Vec<ArgumentNode>,
    value: &Value,
    path: &str,
    depth: usize,
) -> Option<ArgId> {
    let obj = checker.as_object(value, path)?;
    let tag = match obj.get("type") {
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            checker.fail(malformed(
                path,
                format!("argument type must be a string, got {}", json_type_name(other)),
            ));
            return None;
        }
        None => {
            checker.fail(malformed(path, "argument has no type"));
            return None;
        }
    };

    let allowed: &[&str] = if tag == "union" {
        &["type", "valueType", "value"]
    } else {
        &["type", "value"]
    };
    for key in obj.keys() {
        if !allowed.contains(&key.as_str()) {
            checker.reject_unknown(join(path, key));
        }
    }

    let value_path = join(path, "value");
    let Some(inner) = obj.get("value") else {
        checker.fail(ValidationError::field(value_path, "missing required field"));
        return None;
    };

    let node = match tag {
        "list" => {
            let level = depth + 1;
            let max = checker.config().max_nesting_depth;
            if level > max {
                checker.fail(malformed(
                    path,
                    format!("list nesting exceeds the maximum depth of {}", max),
                ));
                return None;
            }
            let items = checker.as_array(inner, &value_path)?;
            let mark = checker.mark();
            let mut children = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                if let Some(id) = check_argument(checker, nodes, item, &index(path, i), level) {
                    children.push(id);
                }
            }
            if checker.failed_since(mark) {
                return None;
            }
            ArgumentNode::List(children)
        }
        "union" => {
            if !checker.allow_union() {
                checker.fail(malformed(path, "union arguments are not permitted here"));
                return None;
            }
            let value_type = match obj.get("valueType") {
                Some(Value::String(s)) => s.as_str(),
                _ => {
                    checker.fail(malformed(path, "union argument needs a string valueType"));
                    return None;
                }
            };
            match Scalar::parse(value_type, inner) {
                Some(Ok(scalar)) => ArgumentNode::Union(scalar),
                Some(Err(reason)) => {
                    checker.fail(ValidationError::field(value_path, reason));
                    return None;
                }
                None => {
                    checker.fail(malformed(
                        path,
                        format!("unknown union value type '{}'", value_type),
                    ));
                    return None;
                }
            }
        }
        tag => match Scalar::parse(tag, inner) {
            Some(Ok(scalar)) => ArgumentNode::Scalar(scalar),
            Some(Err(reason)) => {
                checker.fail(ValidationError::field(value_path, reason));
                return None;
            }
            None => {
                checker.fail(malformed(path, format!("unknown argument type '{}'", tag)));
                return None;
            }
        },
    };

    nodes.push(node);
    Some(ArgId(nodes.len() - 1))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(value: Value) -> Result<CallArguments, SchemaError> {
        CallArguments::from_json(&value, &CodecConfig::default())
    }

    #[test]
    fn scalars_roundtrip() {
        let bag = json!([
            {"type": "integer", "value": 7},
            {"type": "integer", "value": "9007199254740993"},
            {"type": "string", "value": "hello"},
            {"type": "boolean", "value": true},
            {"type": "binary", "value": "base64:AAE="}
        ]);
        let args = decode(bag.clone()).unwrap();
        assert_eq!(args.roots().len(), 5);
        assert_eq!(args.depth(), 0);
        assert_eq!(args.to_json(), bag);
    }

    #[test]
    fn nested_lists_roundtrip() {
        let bag = json!([
            {"type": "list", "value": [
                {"type": "list", "value": [{"type": "integer", "value": 1}]},
                {"type": "string", "value": "x"}
            ]}
        ]);
        let args = decode(bag.clone()).unwrap();
        assert_eq!(args.depth(), 2);
        assert_eq!(args.node_count(), 4);
        assert_eq!(args.to_json(), bag);
    }

    #[test]
    fn children_precede_parents() {
        let bag = json!([
            {"type": "list", "value": [
                {"type": "list", "value": [{"type": "integer", "value": 1}]}
            ]}
        ]);
        let args = decode(bag).unwrap();
        for (i, node) in args.nodes.iter().enumerate() {
            if let ArgumentNode::List(children) = node {
                assert!(children.iter().all(|c| c.index() < i));
            }
        }
    }

    #[test]
    fn nesting_beyond_limit_is_malformed() {
        let bag = json!([
            {"type": "list", "value": [
                {"type": "list", "value": [{"type": "integer", "value": 1}]}
            ]}
        ]);
        let config = CodecConfig::default().with_max_nesting_depth(1);
        match CallArguments::from_json(&bag, &config) {
            Err(SchemaError::Invalid(errors)) => {
                assert!(errors.has_malformed_nested());
                assert_eq!(errors.iter().next().unwrap().location(), "[0][0]");
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn deep_input_is_bounded() {
        let mut bag = json!({"type": "integer", "value": 0});
        for _ in 0..200 {
            bag = json!({"type": "list", "value": [bag]});
        }
        match decode(Value::Array(vec![bag])) {
            Err(SchemaError::Invalid(errors)) => assert!(errors.has_malformed_nested()),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn unknown_type_is_malformed() {
        match decode(json!([{"type": "float", "value": 1.0}])) {
            Err(SchemaError::Invalid(errors)) => assert!(errors.has_malformed_nested()),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn wrong_value_is_field_error() {
        match decode(json!([{"type": "boolean", "value": "yes"}])) {
            Err(SchemaError::Invalid(errors)) => assert!(errors.has_field("[0].value")),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn unknown_argument_key_is_rejected() {
        match decode(json!([{"type": "integer", "value": 1, "note": "x"}])) {
            Err(SchemaError::Invalid(errors)) => assert!(errors.has_field("[0].note")),
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn union_gated_by_config() {
        let bag = json!([{"type": "union", "valueType": "integer", "value": 5}]);
        let args = decode(bag.clone()).unwrap();
        assert!(matches!(
            args.node(args.roots()[0]),
            Some(ArgumentNode::Union(Scalar::Integer(_)))
        ));
        assert_eq!(args.to_json(), bag);

        let config = CodecConfig {
            union_arguments: false,
            ..CodecConfig::default()
        };
        assert!(CallArguments::from_json(&bag, &config).is_err());
    }

    #[test]
    fn builder_produces_tree() {
        let mut b = ArgumentsBuilder::new();
        let one = b.scalar(Scalar::Integer(1.into()));
        let two = b.scalar(Scalar::String("two".into()));
        let list = b.list(&[one, two]).unwrap();
        let flag = b.scalar(Scalar::Boolean(false));
        let args = b.build();

        assert_eq!(args.roots(), &[list, flag]);
        assert_eq!(
            args.to_json(),
            json!([
                {"type": "list", "value": [
                    {"type": "integer", "value": 1},
                    {"type": "string", "value": "two"}
                ]},
                {"type": "boolean", "value": false}
            ])
        );
    }

    #[test]
    fn builder_rejects_shared_children() {
        let mut b = ArgumentsBuilder::new();
        let one = b.scalar(Scalar::Integer(1.into()));
        b.list(&[one]).unwrap();
        assert!(b.list(&[one]).is_err());
        assert!(b.list(&[ArgId(99)]).is_err());

        let two = b.scalar(Scalar::Integer(2.into()));
        assert!(b.list(&[two, two]).is_err());
    }
}

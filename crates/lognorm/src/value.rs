//! Conversion of engine value trees into [`serde_json::Value`].

use serde_json::{Map, Number, Value};

use crate::engine::{NodeKind, ValueNode};

/// Eagerly converts an engine value tree into an owned [`Value`].
///
/// Total over every node shape: absent nodes and unknown tags become
/// [`Value::Null`]. Objects keep the engine's key order; a repeated key
/// overwrites the earlier value in place.
pub fn convert<'a, N: ValueNode<'a>>(node: Option<N>) -> Value {
    let Some(node) = node else {
        return Value::Null;
    };

    match node.kind() {
        NodeKind::Null | NodeKind::Unknown => Value::Null,
        NodeKind::Boolean => Value::Bool(node.as_bool()),
        NodeKind::Double => convert_double(node.as_f64()),
        NodeKind::Int => Value::Number(Number::from(node.as_i64())),
        NodeKind::String => Value::String(decode(node.as_bytes())),
        NodeKind::Array => convert_array(node),
        NodeKind::Object => convert_object(node),
    }
}

// JSON has no NaN or infinities.
fn convert_double(value: f64) -> Value {
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn convert_array<'a, N: ValueNode<'a>>(node: N) -> Value {
    let len = node.array_len();
    let mut items = Vec::with_capacity(len);
    for index in 0..len {
        items.push(convert(node.array_get(index)));
    }
    Value::Array(items)
}

fn convert_object<'a, N: ValueNode<'a>>(node: N) -> Value {
    let mut map = Map::new();
    for (key, value) in node.entries() {
        map.insert(decode(key), convert(value));
    }
    Value::Object(map)
}

fn decode(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

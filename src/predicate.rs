/*! Property-based matching of nodes.
 *
 * Every search operation has a closure form (`find_child`, `find`, ...) and a property form
 * (`find_child_by_property`, `find_by_property`, ...). The latter compares a named field of a node's
 * model against a value. Models and values are compared through their [serde] representation, so
 * any `Serialize` model with named fields (structs, maps, JSON objects) can be matched.
 */

use crate::Node;
use serde::Serialize;
use serde_json::Value;

/// Reads the field `name` off `model`. `None` if the model does not serialize to
/// an object or has no such field.
pub fn property<M>(model: &M, name: &str) -> Option<Value>
where
    M: Serialize + ?Sized,
{
    match serde_json::to_value(model) {
        Ok(Value::Object(mut fields)) => fields.remove(name),
        Ok(_) => None,
        Err(err) => {
            tracing::warn!(property = name, %err, "model cannot be serialized");
            None
        }
    }
}

/// Equality of serialized values. Numbers compare by value, so `10` equals `10.0`.
fn same_value(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => a == b,
        },
        _ => actual == expected,
    }
}

/// Builds a predicate matching nodes whose model field `name` equals `value`.
///
/// Integer and floating point numbers match if they denote the same number.
pub fn property_eq<M, V>(name: &str, value: &V) -> impl Fn(&Node<M>) -> bool
where
    M: Serialize,
    V: Serialize + ?Sized,
{
    let name = name.to_owned();
    let expected = match serde_json::to_value(value) {
        Ok(expected) => Some(expected),
        Err(err) => {
            tracing::warn!(property = name.as_str(), %err, "value cannot be serialized, nothing will match");
            None
        }
    };
    move |node: &Node<M>| match &expected {
        Some(expected) => property(&*node.model(), &name).map_or(false, |actual| same_value(&actual, expected)),
        None => false,
    }
}

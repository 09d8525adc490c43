//! Type unifier: recursive walk of the value tree, producing the minimal
//! inferred type for every node.
//!
//! Sequences of mappings are folded into one representative mapping before
//! their element type is inferred, so the generated record carries the union
//! of every key seen across all elements. Conflicting element shapes degrade
//! to untyped rather than erroring; that lossiness is deliberate and callers
//! depend on it.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::ident::format_field_name;
use crate::ir::{Field, Ty};
use crate::value::{Kind, Value};

/// Numbers within this distance of an integer are reclassified as `int`.
/// JSON readers surface every number through one floating representation, so
/// integral values have to be recovered heuristically.
const INT_EPSILON: f64 = 1e-4;

/// Immutable per-call configuration, threaded through every recursive call so
/// concurrent invocations cannot interfere.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Skip integer recovery and classify every number as `float64`.
    pub force_floats: bool,
}

pub fn infer(value: &Value, config: &Config) -> Ty {
    match value {
        Value::Null => Ty::Unknown,
        Value::Bool(_) => Ty::Primitive("bool"),
        Value::Str(_) => Ty::Primitive("string"),
        Value::Int(_) => {
            if config.force_floats {
                Ty::Primitive("float64")
            } else {
                Ty::Primitive("int")
            }
        }
        Value::Float(f) => Ty::Primitive(number_type(*f, config)),
        Value::Seq(elems) => infer_seq(elems, config),
        Value::Map(map) => infer_map(map, config),
    }
}

fn number_type(v: f64, config: &Config) -> &'static str {
    if !config.force_floats && (v - (v + INT_EPSILON).floor()).abs() < INT_EPSILON {
        "int"
    } else {
        "float64"
    }
}

fn infer_seq(elems: &[Value], config: &Config) -> Ty {
    let kinds: BTreeSet<Kind> = elems.iter().map(Value::kind).collect();
    if kinds.len() != 1 {
        // Empty, or elements of incompatible shapes.
        return Ty::Slice(Box::new(Ty::Unknown));
    }
    match merge_elements(elems.to_vec()) {
        Some(representative) => Ty::Slice(Box::new(infer(&representative, config))),
        None => Ty::Slice(Box::new(Ty::Unknown)),
    }
}

fn infer_map(map: &BTreeMap<String, Value>, config: &Config) -> Ty {
    let fields = map
        .iter()
        .map(|(key, value)| Field {
            key: key.clone(),
            ident: format_field_name(key),
            ty: infer(value, config),
        })
        .collect();
    Ty::Record(fields)
}

/// Fold every element into a single representative value.
pub fn merge_elements(elems: Vec<Value>) -> Option<Value> {
    let mut iter = elems.into_iter();
    let mut acc = iter.next()?;
    for next in iter {
        acc = merge_values(acc, next);
    }
    Some(acc)
}

/// Structural merge of two values.
///
/// Mappings take the union of keys, shared keys merging recursively.
/// Sequences concatenate and re-merge down to one representative element.
/// A kind mismatch discards both sides and yields null at that position.
/// Scalars of the same kind keep the first value seen, which is what lets the
/// earliest element of a numeric sequence decide int versus float64.
fn merge_values(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Null, b) => b,
        (a, Value::Null) => a,
        (a, b) if a.kind() != b.kind() => Value::Null,
        (Value::Seq(mut xs), Value::Seq(ys)) => {
            xs.extend(ys);
            match merge_elements(xs) {
                Some(v) => Value::Seq(vec![v]),
                None => Value::Seq(Vec::new()),
            }
        }
        (Value::Map(mut am), Value::Map(bm)) => {
            for (k, bv) in bm {
                match am.remove(&k) {
                    Some(av) => {
                        am.insert(k, merge_values(av, bv));
                    }
                    None => {
                        am.insert(k, bv);
                    }
                }
            }
            Value::Map(am)
        }
        (a, _) => a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn infer_json(doc: &str) -> Ty {
        let value = Value::from_json(serde_json::from_str(doc).unwrap());
        infer(&value, &Config::default())
    }

    #[test]
    fn scalars() {
        assert_eq!(infer_json("\"x\""), Ty::Primitive("string"));
        assert_eq!(infer_json("true"), Ty::Primitive("bool"));
        assert_eq!(infer_json("null"), Ty::Unknown);
    }

    #[test]
    fn numbers_disambiguate_near_integers() {
        assert_eq!(infer_json("2.2"), Ty::Primitive("float64"));
        assert_eq!(infer_json("2.0"), Ty::Primitive("int"));
        assert_eq!(infer_json("2"), Ty::Primitive("int"));
        assert_eq!(infer_json("-3.00001"), Ty::Primitive("int"));
        assert_eq!(infer_json("2.001"), Ty::Primitive("float64"));
    }

    #[test]
    fn force_floats_wins_regardless_of_value() {
        let config = Config { force_floats: true };
        for doc in ["2.2", "2.0", "2"] {
            let value = Value::from_json(serde_json::from_str(doc).unwrap());
            assert_eq!(infer(&value, &config), Ty::Primitive("float64"), "doc {doc}");
        }
    }

    #[test]
    fn homogeneous_sequences() {
        assert_eq!(
            infer_json("[\"a\", \"b\"]"),
            Ty::Slice(Box::new(Ty::Primitive("string")))
        );
        assert_eq!(
            infer_json("[1, 2, 3]"),
            Ty::Slice(Box::new(Ty::Primitive("int")))
        );
    }

    #[test]
    fn empty_and_mixed_sequences_are_untyped() {
        assert_eq!(infer_json("[]"), Ty::Slice(Box::new(Ty::Unknown)));
        assert_eq!(infer_json("[1, \"a\"]"), Ty::Slice(Box::new(Ty::Unknown)));
        assert_eq!(
            infer_json("[null, {\"a\": 1}]"),
            Ty::Slice(Box::new(Ty::Unknown))
        );
    }

    #[test]
    fn first_numeric_element_decides_the_slice_type() {
        assert_eq!(
            infer_json("[1, 2.5]"),
            Ty::Slice(Box::new(Ty::Primitive("int")))
        );
        assert_eq!(
            infer_json("[2.5, 1]"),
            Ty::Slice(Box::new(Ty::Primitive("float64")))
        );
    }

    #[test]
    fn array_of_objects_unifies_to_one_record() {
        let ty = infer_json("{\"foo\": [{\"bar\": 24}, {\"bar\": 42}]}");
        let Ty::Record(fields) = ty else {
            panic!("expected record")
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].ident, "Foo");
        let Ty::Slice(elem) = &fields[0].ty else {
            panic!("expected slice")
        };
        let Ty::Record(inner) = elem.as_ref() else {
            panic!("expected record element")
        };
        assert_eq!(inner.len(), 1);
        assert_eq!(inner[0].ident, "Bar");
        assert_eq!(inner[0].ty, Ty::Primitive("int"));
    }

    #[test]
    fn sparse_keys_survive_the_merge() {
        // A key present in only one element still appears in the record.
        let ty = infer_json("[{\"a\": 1}, {\"b\": \"x\"}, {\"a\": 2, \"c\": true}]");
        let Ty::Slice(elem) = ty else {
            panic!("expected slice")
        };
        let Ty::Record(fields) = *elem else {
            panic!("expected record")
        };
        let idents: Vec<&str> = fields.iter().map(|f| f.ident.as_str()).collect();
        assert_eq!(idents, vec!["A", "B", "C"]);
    }

    #[test]
    fn conflicting_shared_keys_degrade_to_untyped() {
        let ty = infer_json("[{\"a\": 1}, {\"a\": \"x\"}]");
        let Ty::Slice(elem) = ty else {
            panic!("expected slice")
        };
        let Ty::Record(fields) = *elem else {
            panic!("expected record")
        };
        assert_eq!(fields[0].ty, Ty::Unknown);
    }

    #[test]
    fn nested_sequences_re_merge() {
        assert_eq!(
            infer_json("[[1], [2, 3]]"),
            Ty::Slice(Box::new(Ty::Slice(Box::new(Ty::Primitive("int")))))
        );
        assert_eq!(
            infer_json("[[1], [\"a\"]]"),
            Ty::Slice(Box::new(Ty::Slice(Box::new(Ty::Unknown))))
        );
    }

    #[test]
    fn null_fields_are_untyped() {
        let ty = infer_json("{\"foo\": \"bar\", \"baz\": null}");
        let Ty::Record(fields) = ty else {
            panic!("expected record")
        };
        assert_eq!(fields[0].key, "baz");
        assert_eq!(fields[0].ty, Ty::Unknown);
        assert_eq!(fields[1].key, "foo");
        assert_eq!(fields[1].ty, Ty::Primitive("string"));
    }
}

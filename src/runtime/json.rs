//! Serde interop for [`Value`].
//!
//! Data values map onto the JSON data model directly: `None` ⇄ `null`,
//! arrays ⇄ arrays, hashes ⇄ objects. Hash keys flatten to their plain text
//! on the way out (`Integer(1)` becomes the object key `"1"`), and object
//! keys always come back as `String` keys. Callables carry behavior, not
//! data; serializing one is an error.
use std::{collections::HashMap, fmt, rc::Rc};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, SeqAccess, Visitor},
    ser::{SerializeMap, SerializeSeq},
};

use crate::runtime::{hash_key::HashKey, value::Value};

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Integer(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::Boolean(v) => serializer.serialize_bool(*v),
            Value::String(v) => serializer.serialize_str(v),
            Value::None => serializer.serialize_unit(),
            Value::Array(elements) => {
                let mut seq = serializer.serialize_seq(Some(elements.len()))?;
                for element in elements.iter() {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Value::Hash(pairs) => {
                let mut map = serializer.serialize_map(Some(pairs.len()))?;
                for (key, value) in pairs.iter() {
                    map.serialize_entry(&key.as_plain_text(), value)?;
                }
                map.end()
            }
            Value::Callable(c) => Err(serde::ser::Error::custom(format!(
                "cannot serialize {}",
                c
            ))),
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a JSON-compatible value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Boolean(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Value, E>
    where
        E: de::Error,
    {
        if v <= i64::MAX as u64 {
            Ok(Value::Integer(v as i64))
        } else {
            Ok(Value::Float(v as f64))
        }
    }

    fn visit_f64<E>(self, v: f64) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::String(v.into()))
    }

    fn visit_unit<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::None)
    }

    fn visit_none<E>(self) -> Result<Value, E>
    where
        E: de::Error,
    {
        Ok(Value::None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut elements = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(element) = access.next_element()? {
            elements.push(element);
        }
        Ok(Value::Array(Rc::new(elements)))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut pairs = HashMap::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            pairs.insert(HashKey::String(key), value);
        }
        Ok(Value::Hash(Rc::new(pairs)))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Serializes a value to compact JSON text.
pub fn to_json_string(value: &Value) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

/// Parses JSON text into a value.
pub fn from_json_str(text: &str) -> Result<Value, String> {
    serde_json::from_str(text).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_round_trip() {
        for value in [
            Value::Integer(42),
            Value::Float(2.5),
            Value::Boolean(true),
            Value::string("hello"),
            Value::None,
        ] {
            let text = to_json_string(&value).unwrap();
            assert_eq!(from_json_str(&text).unwrap(), value);
        }
    }

    #[test]
    fn test_none_is_null() {
        assert_eq!(to_json_string(&Value::None).unwrap(), "null");
        assert_eq!(from_json_str("null").unwrap(), Value::None);
    }

    #[test]
    fn test_nested_array_round_trips() {
        let value = Value::array(vec![
            Value::Integer(1),
            Value::array(vec![Value::string("a"), Value::Boolean(false)]),
            Value::None,
        ]);
        let text = to_json_string(&value).unwrap();
        assert_eq!(text, "[1,[\"a\",false],null]");
        assert_eq!(from_json_str(&text).unwrap(), value);
    }

    #[test]
    fn test_hash_keys_flatten_to_text() {
        let mut pairs = HashMap::new();
        pairs.insert(HashKey::Integer(1), Value::string("one"));
        let value = Value::Hash(Rc::new(pairs));
        let text = to_json_string(&value).unwrap();
        assert_eq!(text, "{\"1\":\"one\"}");

        // Object keys always come back as string keys.
        let back = from_json_str(&text).unwrap();
        match back {
            Value::Hash(pairs) => {
                assert_eq!(
                    pairs.get(&HashKey::String("1".to_string())),
                    Some(&Value::string("one"))
                );
                assert_eq!(pairs.get(&HashKey::Integer(1)), None);
            }
            other => panic!("expected hash, got {}", other),
        }
    }

    #[test]
    fn test_callable_refuses_to_serialize() {
        let f = Value::host_fn("secret", 1, |_ctx, _recv, mut args| Ok(args.remove(0)));
        let err = to_json_string(&f).unwrap_err();
        assert!(err.contains("cannot serialize <closure secret>"), "{}", err);
    }

    #[test]
    fn test_large_unsigned_becomes_float() {
        let back = from_json_str("18446744073709551615").unwrap();
        assert!(matches!(back, Value::Float(_)));
    }
}

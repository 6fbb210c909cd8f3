use serde_json::Value;

use typed_json_traits::{
  Event, Number, Cursor, Tokenizer, JsonWriter, DecodeOptions, JsonValue, from_slice, to_string,
  transcribe,
};

/*
  Equivalence tests between `serde_json` and `typed-json`. The events a `Tokenizer` yields are
  compared against the `serde_json::Value` parsed from the same encoding, as is the `JsonValue`
  decoded from it. The other direction checks what `typed-json` writes parses with `serde_json`.
*/

fn check_float(number: f64, expected: f64) {
  // 0.1% of the smaller number
  let allowed_deviation = number.min(expected).abs() / 1000.0;
  assert!((number - expected).abs() <= allowed_deviation);
}

fn check_number(number: Number, expected: &serde_json::Number) {
  if let Some(expected) = expected.as_i64() {
    assert_eq!(number, Number::Integer(expected));
  } else {
    check_float(number.as_f64(), expected.as_f64().unwrap());
  }
}

fn check_events(tokenizer: &mut Tokenizer, value: &Value) {
  match (tokenizer.expect_next().unwrap(), value) {
    (Event::Null, Value::Null) => {}
    (Event::Bool(bool), Value::Bool(expected)) => assert_eq!(bool, *expected),
    (Event::Number(number), Value::Number(expected)) => check_number(number, expected),
    (Event::String(string), Value::String(expected)) => assert_eq!(&string, expected),
    (Event::StartArray, Value::Array(array)) => {
      for value in array {
        check_events(tokenizer, value);
      }
      assert_eq!(tokenizer.expect_next().unwrap(), Event::EndArray);
    }
    (Event::StartObject, Value::Object(object)) => {
      // `serde_json` orders its maps by key, as does its serialization
      for (key, value) in object {
        assert_eq!(tokenizer.expect_next().unwrap(), Event::Key(key.clone()));
        check_events(tokenizer, value);
      }
      assert_eq!(tokenizer.expect_next().unwrap(), Event::EndObject);
    }
    (event, value) => panic!("tokenized {event:?} for {value:?}"),
  }
}

fn check_json_value(decoded: &JsonValue, value: &Value) {
  match (decoded, value) {
    (JsonValue::Null, Value::Null) => {}
    (JsonValue::Bool(bool), Value::Bool(expected)) => assert_eq!(bool, expected),
    (JsonValue::Number(number), Value::Number(expected)) => check_number(*number, expected),
    (JsonValue::String(string), Value::String(expected)) => assert_eq!(string, expected),
    (JsonValue::Array(array), Value::Array(expected)) => {
      assert_eq!(array.len(), expected.len());
      for (decoded, value) in array.iter().zip(expected) {
        check_json_value(decoded, value);
      }
    }
    (JsonValue::Object(object), Value::Object(expected)) => {
      assert_eq!(object.len(), expected.len());
      for ((key, decoded), (expected_key, value)) in object.iter().zip(expected) {
        assert_eq!(key, expected_key);
        check_json_value(decoded, value);
      }
    }
    (decoded, value) => panic!("decoded {decoded:?} for {value:?}"),
  }
}

/// Check `encoding`, the serialization of `value`, is read by `typed-json` as `value`.
pub fn check_value(encoding: &[u8], value: &Value) {
  let mut tokenizer = Tokenizer::new(encoding);
  check_events(&mut tokenizer, value);
  tokenizer.finish().unwrap();
  assert!(tokenizer.next_event().unwrap().is_none());

  let decoded = from_slice::<JsonValue>(encoding, &DecodeOptions::strict()).unwrap();
  check_json_value(&decoded, value);
}

/// Check what `typed-json` writes for `value` is read by `serde_json` as `value`.
pub fn check_written(encoding: &[u8], value: &Value) {
  let decoded = from_slice::<JsonValue>(encoding, &DecodeOptions::strict()).unwrap();
  check_values_equivalent(value, &serde_json::from_str(&to_string(&decoded).unwrap()).unwrap());

  let mut tokenizer = Tokenizer::new(encoding);
  let mut writer = JsonWriter::new();
  transcribe(&mut tokenizer, &mut writer).unwrap();
  tokenizer.finish().unwrap();
  check_values_equivalent(value, &serde_json::from_str(&writer.into_string().unwrap()).unwrap());
}

fn check_values_equivalent(a: &Value, b: &Value) {
  match a {
    Value::Null | Value::Bool(_) | Value::String(_) => assert_eq!(a, b),
    Value::Number(number) => {
      check_float(number.as_f64().unwrap(), b.as_number().unwrap().as_f64().unwrap());
    }
    Value::Array(array) => {
      let b = b.as_array().unwrap();
      assert_eq!(array.len(), b.len());
      for (a, b) in array.iter().zip(b) {
        check_values_equivalent(a, b);
      }
    }
    Value::Object(object) => {
      let b = b.as_object().unwrap();
      assert_eq!(object.len(), b.len());
      for (key, value) in object {
        check_values_equivalent(value, &b[key]);
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use rand_core::{RngCore, OsRng};
  use super::*;

  #[allow(clippy::cast_possible_truncation)]
  fn random_string() -> String {
    let mut res = String::new();
    for _ in 0 .. (OsRng.next_u64() % 128) {
      if (OsRng.next_u64() % 2) == 1 {
        // ASCII
        res.push(char::from_u32((OsRng.next_u64() % 128) as u32).unwrap());
      } else {
        // Unicode
        res.push(loop {
          if let Some(char) = char::from_u32(OsRng.next_u64() as u32) {
            // Skip ASCII as those are intended to be included by the other branch
            // Skip the byte-order mark as implementations are allowed to ignore/reject it
            if char.is_ascii() || (char == '\u{feff}') {
              continue;
            }
            break char;
          }
        });
      }
    }
    res
  }

  fn random_value(depth: usize) -> Value {
    let modulus = if depth == 8 { 4 } else { 6 };
    match OsRng.next_u64() % modulus {
      0 => Value::Null,
      1 => Value::Bool((OsRng.next_u64() % 2) == 1),
      2 => Value::Number(match OsRng.next_u64() % 3 {
        0 => serde_json::Number::from(OsRng.next_u64() >> 1),
        1 => serde_json::Number::from(OsRng.next_u64().wrapping_neg()),
        2 => loop {
          if let Some(float) = serde_json::Number::from_f64(f64::from_bits(OsRng.next_u64())) {
            break float;
          }
        },
        _ => unreachable!(),
      }),
      3 => Value::String(random_string()),
      4 => Value::Array({
        let mut res = vec![];
        for _ in 0 .. (OsRng.next_u64() % 8) {
          res.push(random_value(depth + 1));
        }
        res
      }),
      5 => Value::Object({
        let mut res = serde_json::Map::new();
        for _ in 0 .. (OsRng.next_u64() % 8) {
          res.insert(random_string(), random_value(depth + 1));
        }
        res
      }),
      _ => unreachable!(),
    }
  }

  #[test]
  fn fuzz() {
    for i in 0 .. 100 {
      dbg!(i);
      let value = dbg!(random_value(0));
      let bytes = value.to_string().into_bytes();
      let bytes = bytes.as_slice();

      check_value(bytes, &value);
      check_written(bytes, &value);
    }
  }

  #[test]
  fn rejects_what_serde_json_rejects() {
    for invalid in [
      "",
      "[",
      "[1,]",
      r#"{"a" 1}"#,
      r#"{"a": 1,}"#,
      "01",
      "1.",
      "-",
      "tru",
      r#""\x""#,
      r#""\ud800""#,
      "[1] [2]",
      "\"\u{1}\"",
    ] {
      assert!(serde_json::from_str::<Value>(invalid).is_err(), "{invalid}");
      assert!(from_slice::<JsonValue>(invalid.as_bytes(), &DecodeOptions::strict()).is_err());
    }
  }
}

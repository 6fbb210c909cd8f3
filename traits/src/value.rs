use indexmap::IndexMap;

use crate::{
  Number, Event, Cursor, Generator, JsonError, Result, DecodeOptions, JsonDeserialize,
  JsonSerialize,
};

/// An arbitrary JSON value.
///
/// Objects preserve the order their fields were read in.
#[derive(Clone, PartialEq, Debug)]
pub enum JsonValue {
  /// `null`.
  Null,
  /// A boolean.
  Bool(bool),
  /// A number.
  Number(Number),
  /// A string.
  String(String),
  /// An array.
  Array(Vec<JsonValue>),
  /// An object.
  Object(IndexMap<String, JsonValue>),
}

impl JsonValue {
  /// The value as a string, if it is one.
  pub fn as_str(&self) -> Option<&str> {
    match self {
      JsonValue::String(value) => Some(value),
      _ => None,
    }
  }

  /// The value as an object, if it is one.
  pub fn as_object(&self) -> Option<&IndexMap<String, JsonValue>> {
    match self {
      JsonValue::Object(fields) => Some(fields),
      _ => None,
    }
  }
}

impl From<&str> for JsonValue {
  fn from(value: &str) -> Self {
    JsonValue::String(value.to_string())
  }
}
impl From<String> for JsonValue {
  fn from(value: String) -> Self {
    JsonValue::String(value)
  }
}
impl From<i64> for JsonValue {
  fn from(value: i64) -> Self {
    JsonValue::Number(Number::Integer(value))
  }
}
impl From<f64> for JsonValue {
  fn from(value: f64) -> Self {
    JsonValue::Number(Number::Float(value))
  }
}
impl From<bool> for JsonValue {
  fn from(value: bool) -> Self {
    JsonValue::Bool(value)
  }
}

/*
  We don't recurse per level of nesting, instead tracking the open structures on our own stack, so
  the depth of a value isn't bound by the call stack of this function.
*/
impl JsonDeserialize for JsonValue {
  fn deserialize(cursor: &mut dyn Cursor, _options: &DecodeOptions) -> Result<Self> {
    enum Open {
      Array(Vec<JsonValue>),
      Object(IndexMap<String, JsonValue>, Option<String>),
    }

    let mut stack: Vec<Open> = vec![];
    loop {
      let position = cursor.position();
      let value = match cursor.expect_next()? {
        Event::StartArray => {
          stack.push(Open::Array(vec![]));
          continue;
        }
        Event::StartObject => {
          stack.push(Open::Object(IndexMap::new(), None));
          continue;
        }
        Event::Key(key) => {
          match stack.last_mut() {
            Some(Open::Object(_, pending @ None)) => *pending = Some(key),
            _ => Err(JsonError::malformed("key where a value was expected", position))?,
          }
          continue;
        }
        Event::EndArray => match stack.pop() {
          Some(Open::Array(items)) => JsonValue::Array(items),
          _ => Err(JsonError::malformed("end of an array which wasn't opened", position))?,
        },
        Event::EndObject => match stack.pop() {
          Some(Open::Object(fields, None)) => JsonValue::Object(fields),
          _ => Err(JsonError::malformed("end of an object which wasn't opened", position))?,
        },
        Event::String(value) => JsonValue::String(value),
        Event::Number(value) => JsonValue::Number(value),
        Event::Bool(value) => JsonValue::Bool(value),
        Event::Null => JsonValue::Null,
      };

      match stack.last_mut() {
        None => return Ok(value),
        Some(Open::Array(items)) => items.push(value),
        Some(Open::Object(fields, pending)) => {
          let Some(key) = pending.take() else {
            return Err(JsonError::malformed("value within an object without a key", position));
          };
          fields.insert(key, value);
        }
      }
    }
  }
}

impl JsonSerialize for JsonValue {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    match self {
      JsonValue::Null => generator.write_null(),
      JsonValue::Bool(value) => generator.write_bool(*value),
      JsonValue::Number(value) => generator.write_number(*value),
      JsonValue::String(value) => generator.write_str(value),
      JsonValue::Array(items) => items.serialize(generator),
      JsonValue::Object(fields) => fields.serialize(generator),
    }
  }
}

#[test]
fn arbitrary_values() {
  use crate::{from_str, to_string};

  let json = r#"{"z":[1,2.5,"s",true,null,{}],"a":{"b":{"c":[]}}}"#;
  let value = from_str::<JsonValue>(json, &DecodeOptions::strict()).unwrap();
  let fields = value.as_object().unwrap();
  assert_eq!(fields.keys().collect::<Vec<_>>(), ["z", "a"]);
  assert_eq!(
    fields["z"],
    JsonValue::Array(vec![
      1i64.into(),
      2.5.into(),
      "s".into(),
      true.into(),
      JsonValue::Null,
      JsonValue::Object(IndexMap::new()),
    ])
  );
  assert_eq!(to_string(&value).unwrap(), json);
}

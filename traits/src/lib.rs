#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

use core::marker::PhantomData;

use indexmap::IndexMap;

pub use typed_json::*;

mod options;
pub use options::{UnknownFieldPolicy, DecodeOptions};
mod tri;
pub use tri::Tri;
mod primitives;
mod value;
pub use value::JsonValue;

/// Builders and the checks they perform when built.
pub mod builder;
pub use builder::{ObjectBuilder, SingleUse};
/// Deserializers composed from other deserializers.
pub mod combinators;
pub use combinators::{lazy, sequence, mapping, optional, tri};
mod object;
pub use object::ObjectDeserializer;
/// Tagged unions and the deserializers which dispatch to their variants.
pub mod union;

/// A deserializer for values of type `T`.
///
/// Deserializers are stateless, so one instance may be shared by every decode, including
/// concurrently.
pub trait JsonDeserializer<T>: Send + Sync {
  /// Deserialize a value from the cursor.
  ///
  /// This consumes exactly the events of the value.
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<T>;
}

impl<T, D: ?Sized + JsonDeserializer<T>> JsonDeserializer<T> for &D {
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<T> {
    (**self).deserialize(cursor, options)
  }
}

impl<T, D: ?Sized + JsonDeserializer<T>> JsonDeserializer<T> for Box<D> {
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<T> {
    (**self).deserialize(cursor, options)
  }
}

/// An item with a canonical deserializer.
pub trait JsonDeserialize: Sized {
  /// Deserialize this item from the cursor.
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self>;
}

/// The canonical deserializer of `T`, as a `JsonDeserializer`.
pub struct Canonical<T>(PhantomData<fn() -> T>);

impl<T> Clone for Canonical<T> {
  fn clone(&self) -> Self {
    *self
  }
}
impl<T> Copy for Canonical<T> {}

impl<T> core::fmt::Debug for Canonical<T> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_tuple("Canonical").field(&core::any::type_name::<T>()).finish()
  }
}

/// The canonical deserializer of `T`.
pub const fn canonical<T: JsonDeserialize>() -> Canonical<T> {
  Canonical(PhantomData)
}

impl<T: JsonDeserialize> JsonDeserializer<T> for Canonical<T> {
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<T> {
    T::deserialize(cursor, options)
  }
}

impl<T: JsonDeserialize> JsonDeserialize for Option<T> {
  /// This will accept `null` as a representation of `None`.
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    optional(canonical::<T>()).deserialize(cursor, options)
  }
}

impl<T: JsonDeserialize> JsonDeserialize for Vec<T> {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    sequence(canonical::<T>()).deserialize(cursor, options)
  }
}

impl<T: JsonDeserialize> JsonDeserialize for IndexMap<String, T> {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    mapping(canonical::<T>()).deserialize(cursor, options)
  }
}

impl<T: JsonDeserialize> JsonDeserialize for Box<T> {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    T::deserialize(cursor, options).map(Box::new)
  }
}

/// An item which can be serialized as JSON.
pub trait JsonSerialize {
  /// Write this item to the generator.
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()>;
}

/// An item which serializes as the fields of an object.
///
/// This writes only the fields, without the surrounding braces, so the fields of a variant may be
/// preceded by its discriminator.
pub trait SerializeFields {
  /// Write the fields of this item to the generator.
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()>;
}

/// Serialize an item as an object of its fields.
pub fn serialize_object(
  value: &(impl ?Sized + SerializeFields),
  generator: &mut dyn Generator,
) -> Result<()> {
  generator.write_start_object()?;
  value.serialize_fields(generator)?;
  generator.write_end_object()
}

/// Write a field.
pub fn write_field(
  generator: &mut dyn Generator,
  name: &str,
  value: &(impl ?Sized + JsonSerialize),
) -> Result<()> {
  generator.write_key(name)?;
  value.serialize(generator)
}

/// Write a field if it's set.
pub fn write_optional_field<T: JsonSerialize>(
  generator: &mut dyn Generator,
  name: &str,
  value: Option<&T>,
) -> Result<()> {
  if let Some(value) = value {
    write_field(generator, name, value)?;
  }
  Ok(())
}

/// Write a field unless it's `Tri::None`.
///
/// `Tri::Null` is written as `null`.
pub fn write_tri_field<T: JsonSerialize>(
  generator: &mut dyn Generator,
  name: &str,
  value: Tri<&T>,
) -> Result<()> {
  match value {
    Tri::Some(value) => write_field(generator, name, value),
    Tri::Null => {
      generator.write_key(name)?;
      generator.write_null()
    }
    Tri::None => Ok(()),
  }
}

impl<T: ?Sized + JsonSerialize> JsonSerialize for &T {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    (**self).serialize(generator)
  }
}

impl<T: ?Sized + JsonSerialize> JsonSerialize for Box<T> {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    (**self).serialize(generator)
  }
}

impl<T: JsonSerialize> JsonSerialize for Option<T> {
  /// This will serialize `Some(value)` as `value` and `None` as `null`.
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    match self {
      Some(value) => value.serialize(generator),
      None => generator.write_null(),
    }
  }
}

impl<T: JsonSerialize> JsonSerialize for [T] {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    generator.write_start_array()?;
    for item in self {
      item.serialize(generator)?;
    }
    generator.write_end_array()
  }
}

impl<T: JsonSerialize> JsonSerialize for Vec<T> {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    self.as_slice().serialize(generator)
  }
}

impl<K: AsRef<str>, T: JsonSerialize> JsonSerialize for IndexMap<K, T> {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    generator.write_start_object()?;
    for (key, value) in self {
      write_field(generator, key.as_ref(), value)?;
    }
    generator.write_end_object()
  }
}

/// Deserialize a value from a JSON-serialized blob with its canonical deserializer.
///
/// The blob must consist of exactly the one value, optionally surrounded by whitespace.
pub fn from_slice<T: JsonDeserialize>(json: &[u8], options: &DecodeOptions) -> Result<T> {
  from_slice_with(json, &canonical::<T>(), options)
}

/// Deserialize a value from a JSON-serialized string with its canonical deserializer.
pub fn from_str<T: JsonDeserialize>(json: &str, options: &DecodeOptions) -> Result<T> {
  from_slice(json.as_bytes(), options)
}

/// Deserialize a value from a JSON-serialized blob with the specified deserializer.
pub fn from_slice_with<T>(
  json: &[u8],
  deserializer: &dyn JsonDeserializer<T>,
  options: &DecodeOptions,
) -> Result<T> {
  let mut tokenizer = Tokenizer::with_max_depth(json, options.max_depth);
  let res = deserializer.deserialize(&mut tokenizer, options)?;
  tokenizer.finish()?;
  Ok(res)
}

/// Deserialize the next value within a cursor with its canonical deserializer.
pub fn from_cursor<T: JsonDeserialize>(
  cursor: &mut dyn Cursor,
  options: &DecodeOptions,
) -> Result<T> {
  T::deserialize(cursor, options)
}

/// Serialize a value as compact JSON text.
pub fn to_string<T: ?Sized + JsonSerialize>(value: &T) -> Result<String> {
  let mut writer = JsonWriter::new();
  value.serialize(&mut writer)?;
  writer.into_string()
}

/// Serialize a value into a `Replay` of its events.
pub fn to_replay<T: ?Sized + JsonSerialize>(value: &T) -> Result<Replay> {
  let mut recorder = EventRecorder::new();
  value.serialize(&mut recorder)?;
  recorder.into_replay()
}

#[test]
fn containers_round_trip() {
  let options = DecodeOptions::strict();

  let list = vec![Some(1i64), None, Some(3)];
  let json = to_string(&list).unwrap();
  assert_eq!(json, "[1,null,3]");
  assert_eq!(from_str::<Vec<Option<i64>>>(&json, &options).unwrap(), list);

  let mut map = IndexMap::new();
  map.insert("z".to_string(), vec![true]);
  map.insert("a".to_string(), vec![]);
  let json = to_string(&map).unwrap();
  assert_eq!(json, r#"{"z":[true],"a":[]}"#);
  assert_eq!(from_str::<IndexMap<String, Vec<bool>>>(&json, &options).unwrap(), map);

  let mut replay = to_replay(&map).unwrap();
  assert_eq!(from_cursor::<IndexMap<String, Vec<bool>>>(&mut replay, &options).unwrap(), map);
  assert!(replay.is_exhausted());

  assert!(matches!(
    from_str::<Vec<i64>>("[1] [2]", &options),
    Err(JsonError::MalformedStream { .. })
  ));
  assert_eq!(
    from_str::<Vec<Vec<i64>>>("[[1]]", &options.with_max_depth(1)),
    Err(JsonError::DepthExceeded { max: 1 })
  );
}

use core::{fmt::Debug, marker::PhantomData};

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
  Event, EventKind, Cursor, Generator, JsonError, Result, DecodeOptions, JsonDeserializer,
  JsonSerialize, SerializeFields, serialize_object, combinators::{Lazy, lazy},
};

/// The kind of a tagged union's variant.
pub trait VariantKind: 'static + Copy + Eq + Debug {
  /// The discriminator of this kind on the wire.
  fn tag(self) -> &'static str;
}

/// A closed set of variants, one of which is present.
pub trait TaggedUnion: 'static + Sized {
  /// The name of the union, for errors.
  const NAME: &'static str;
  /// The kinds of the union's variants.
  type Kind: VariantKind;

  /// The kind of the variant present.
  fn kind(&self) -> Self::Kind;
  /// The variant present, as its fields.
  fn variant(&self) -> &dyn SerializeFields;
}

struct Wrapped<D, V, U> {
  deserializer: D,
  wrap: fn(V) -> U,
  _variant: PhantomData<fn() -> V>,
}

impl<V, U, D: JsonDeserializer<V>> JsonDeserializer<U> for Wrapped<D, V, U> {
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<U> {
    self.deserializer.deserialize(cursor, options).map(self.wrap)
  }
}

/// A table from discriminator to the deserializer of the variant it selects.
pub struct VariantTable<U> {
  variants: IndexMap<&'static str, Box<dyn JsonDeserializer<U>>>,
}

impl<U: TaggedUnion> Default for VariantTable<U> {
  fn default() -> Self {
    Self::new()
  }
}

impl<U: TaggedUnion> VariantTable<U> {
  /// Create a table without any variants.
  pub fn new() -> Self {
    VariantTable { variants: IndexMap::new() }
  }

  /// Register a variant, deserialized with `deserializer` and wrapped into the union with `wrap`.
  ///
  /// Panics if the discriminator was already registered.
  pub fn add<V: 'static>(
    &mut self,
    tag: &'static str,
    deserializer: impl 'static + JsonDeserializer<V>,
    wrap: fn(V) -> U,
  ) -> &mut Self {
    let existing = self
      .variants
      .insert(tag, Box::new(Wrapped { deserializer, wrap, _variant: PhantomData }));
    assert!(existing.is_none(), "variant `{tag}` of `{}` was registered multiple times", U::NAME);
    self
  }

  /// The registered discriminators, in the order they were registered.
  pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.variants.keys().copied()
  }

  /// If `tag` selects a registered variant.
  pub fn contains(&self, tag: &str) -> bool {
    self.variants.contains_key(tag)
  }

  /// Deserialize the variant selected by `tag`.
  pub fn deserialize_variant(
    &self,
    tag: &str,
    cursor: &mut dyn Cursor,
    options: &DecodeOptions,
  ) -> Result<U> {
    let Some(deserializer) = self.variants.get(tag) else {
      return Err(JsonError::UnknownVariant { union: U::NAME, key: tag.to_string() });
    };
    trace!(union = U::NAME, variant = tag, "dispatching to variant");
    deserializer.deserialize(cursor, options)
  }

  /// Deserialize an entry keyed `<kind>#<name>`, returning the name and the variant.
  pub fn deserialize_typed_key(
    &self,
    key: &str,
    cursor: &mut dyn Cursor,
    options: &DecodeOptions,
  ) -> Result<(String, U)> {
    let Some((tag, name)) = key.split_once('#') else {
      return Err(JsonError::UnexpectedTokenShape {
        expected: "a key of the form `kind#name`",
        found: format!("`{key}`"),
        context: U::NAME,
      });
    };
    Ok((name.to_string(), self.deserialize_variant(tag, cursor, options)?))
  }
}

impl<U: TaggedUnion> Debug for VariantTable<U> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("VariantTable")
      .field("union", &U::NAME)
      .field("tags", &self.tags().collect::<Vec<_>>())
      .finish()
  }
}

/// A deserializer of an object with exactly one key, the discriminator, whose value is the
/// variant.
///
/// `{"avg": {"value": 1.0}}` would select the `avg` variant.
#[derive(Debug)]
pub struct SingleKeyDeserializer<U: 'static> {
  variants: Lazy<VariantTable<U>>,
}

impl<U: TaggedUnion> SingleKeyDeserializer<U> {
  /// Create a single-key deserializer over the table `variants` returns.
  ///
  /// `variants` isn't called until the first deserialization.
  pub const fn new(variants: fn() -> &'static VariantTable<U>) -> Self {
    SingleKeyDeserializer { variants: lazy(variants) }
  }
}

impl<U: TaggedUnion> JsonDeserializer<U> for SingleKeyDeserializer<U> {
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<U> {
    match cursor.expect_next()? {
      Event::StartObject => {}
      other => Err(JsonError::unexpected("an object", other.kind(), U::NAME))?,
    }
    let tag = match cursor.expect_next()? {
      Event::Key(tag) => tag,
      other => {
        Err(JsonError::unexpected("a single key naming the variant", other.kind(), U::NAME))?
      }
    };
    let res = self.variants.get().deserialize_variant(&tag, cursor, options)?;
    match cursor.expect_next()? {
      Event::EndObject => Ok(res),
      other => Err(JsonError::unexpected(
        "the end of the object after its single key",
        other.kind(),
        U::NAME,
      )),
    }
  }
}

/// A deserializer of an object whose discriminator is one of its own fields.
///
/// The field may be present at any position, so the object is buffered, then replayed through the
/// selected variant's deserializer. That deserializer should ignore the discriminator field.
#[derive(Debug)]
pub struct SentinelDeserializer<U: 'static> {
  field: &'static str,
  default_tag: Option<&'static str>,
  variants: Lazy<VariantTable<U>>,
}

impl<U: TaggedUnion> SentinelDeserializer<U> {
  /// Create a deserializer discriminating on `field`, over the table `variants` returns.
  ///
  /// `variants` isn't called until the first deserialization.
  pub const fn new(field: &'static str, variants: fn() -> &'static VariantTable<U>) -> Self {
    SentinelDeserializer { field, default_tag: None, variants: lazy(variants) }
  }

  /// Use `tag` when the discriminator field is absent.
  #[must_use]
  pub const fn with_default_tag(mut self, tag: &'static str) -> Self {
    self.default_tag = Some(tag);
    self
  }

  /// The discriminator field.
  pub fn field(&self) -> &'static str {
    self.field
  }
}

impl<U: TaggedUnion> JsonDeserializer<U> for SentinelDeserializer<U> {
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<U> {
    let kind = cursor.peek_kind()?;
    if kind != EventKind::StartObject {
      Err(JsonError::unexpected("an object", kind, U::NAME))?;
    }
    let mut object = cursor.capture_value()?;
    let tag = match object.find_field(self.field) {
      Some(Event::String(tag)) => tag.clone(),
      Some(other) => Err(JsonError::unexpected("a string discriminator", other.kind(), U::NAME))?,
      None => {
        let Some(tag) = self.default_tag else {
          return Err(JsonError::MissingRequiredField { owner: U::NAME, field: self.field });
        };
        debug!(union = U::NAME, variant = tag, "discriminator absent, using the default");
        tag.to_string()
      }
    };
    self.variants.get().deserialize_variant(&tag, &mut object, options)
  }
}

/// A deserializer of an object whose keys are of the form `<kind>#<name>`, into a map from name to
/// variant.
#[derive(Debug)]
pub struct TypedKeysDeserializer<U: 'static> {
  variants: Lazy<VariantTable<U>>,
}

impl<U: TaggedUnion> TypedKeysDeserializer<U> {
  /// Create a typed-keys deserializer over the table `variants` returns.
  ///
  /// `variants` isn't called until the first deserialization.
  pub const fn new(variants: fn() -> &'static VariantTable<U>) -> Self {
    TypedKeysDeserializer { variants: lazy(variants) }
  }
}

impl<U: TaggedUnion> JsonDeserializer<IndexMap<String, U>> for TypedKeysDeserializer<U> {
  fn deserialize(
    &self,
    cursor: &mut dyn Cursor,
    options: &DecodeOptions,
  ) -> Result<IndexMap<String, U>> {
    match cursor.expect_next()? {
      Event::StartObject => {}
      other => Err(JsonError::unexpected("an object", other.kind(), U::NAME))?,
    }
    let variants = self.variants.get();
    let mut res = IndexMap::new();
    loop {
      match cursor.expect_next()? {
        Event::EndObject => return Ok(res),
        Event::Key(key) => {
          let (name, value) = variants.deserialize_typed_key(&key, cursor, options)?;
          res.insert(name, value);
        }
        other => Err(JsonError::unexpected("a key", other.kind(), U::NAME))?,
      }
    }
  }
}

/// Serialize a variant as an object with its discriminator as the single key.
pub fn serialize_single_key<U: TaggedUnion>(
  value: &U,
  generator: &mut dyn Generator,
) -> Result<()> {
  generator.write_start_object()?;
  generator.write_key(value.kind().tag())?;
  serialize_object(value.variant(), generator)?;
  generator.write_end_object()
}

/// Serialize a variant as an object with its discriminator as the first field.
pub fn serialize_sentinel<U: TaggedUnion>(
  value: &U,
  field: &str,
  generator: &mut dyn Generator,
) -> Result<()> {
  generator.write_start_object()?;
  generator.write_key(field)?;
  generator.write_str(value.kind().tag())?;
  value.variant().serialize_fields(generator)?;
  generator.write_end_object()
}

/// Write each entry of a map as a field keyed `<kind>#<name>`.
///
/// This only writes the fields, allowing them to be merged into another object.
pub fn serialize_typed_key_entries<U: TaggedUnion>(
  entries: &IndexMap<String, U>,
  generator: &mut dyn Generator,
) -> Result<()> {
  for (name, value) in entries {
    generator.write_key(&format!("{}#{name}", value.kind().tag()))?;
    serialize_object(value.variant(), generator)?;
  }
  Ok(())
}

/// A map serialized as an object with keys of the form `<kind>#<name>`.
#[derive(Clone, Copy, Debug)]
pub struct TypedKeys<'a, U>(pub &'a IndexMap<String, U>);

impl<U: TaggedUnion> JsonSerialize for TypedKeys<'_, U> {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    generator.write_start_object()?;
    serialize_typed_key_entries(self.0, generator)?;
    generator.write_end_object()
  }
}

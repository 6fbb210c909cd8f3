use indexmap::IndexMap;

use typed_json_traits::{
  Generator, Result, JsonValue, ObjectBuilder, ObjectDeserializer, canonical, mapping,
  write_field, builder::map_put,
};

/// The fields every aggregate has.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct AggregateBase {
  meta: IndexMap<String, JsonValue>,
}

impl AggregateBase {
  /// The metadata attached to the aggregation when it was requested.
  pub fn meta(&self) -> &IndexMap<String, JsonValue> {
    &self.meta
  }

  pub(crate) fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    if !self.meta.is_empty() {
      write_field(generator, "meta", &self.meta)?;
    }
    Ok(())
  }
}

/// The builder of the fields every aggregate has.
#[derive(Default, Debug)]
pub struct AggregateBaseBuilder {
  meta: Option<IndexMap<String, JsonValue>>,
}

impl AggregateBaseBuilder {
  pub(crate) fn build(self) -> AggregateBase {
    AggregateBase { meta: self.meta.unwrap_or_default() }
  }
}

/// Setters for the fields every aggregate has.
pub trait AggregateBaseSetters: Sized + AsMut<AggregateBaseBuilder> {
  /// Add every entry to `meta`.
  #[must_use]
  fn meta(mut self, meta: IndexMap<String, JsonValue>) -> Self {
    for (key, value) in meta {
      map_put(&mut self.as_mut().meta, key, value);
    }
    self
  }

  /// Add an entry to `meta`.
  #[must_use]
  fn meta_entry(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
    map_put(&mut self.as_mut().meta, key, value.into());
    self
  }
}
impl<B: AsMut<AggregateBaseBuilder>> AggregateBaseSetters for B {}

pub(crate) fn setup_aggregate_base<B: 'static + ObjectBuilder + AsMut<AggregateBaseBuilder>>(
  deserializer: &mut ObjectDeserializer<B>,
) {
  deserializer.add("meta", mapping(canonical::<JsonValue>()), |builder: &mut B, value| {
    builder.as_mut().meta = Some(value);
  });
}

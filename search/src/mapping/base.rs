use indexmap::IndexMap;

use typed_json_traits::{
  Generator, Result, ObjectBuilder, ObjectDeserializer, canonical, mapping, write_field,
  builder::map_put,
};

use crate::mapping::{Property, property::PROPERTY};

/// The fields every property has.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct PropertyBase {
  meta: IndexMap<String, String>,
  properties: IndexMap<String, Property>,
}

impl PropertyBase {
  /// The metadata of the field.
  pub fn meta(&self) -> &IndexMap<String, String> {
    &self.meta
  }

  /// The properties of the fields within this field.
  pub fn properties(&self) -> &IndexMap<String, Property> {
    &self.properties
  }

  pub(crate) fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    if !self.meta.is_empty() {
      write_field(generator, "meta", &self.meta)?;
    }
    if !self.properties.is_empty() {
      write_field(generator, "properties", &self.properties)?;
    }
    Ok(())
  }
}

/// The builder of the fields every property has.
#[derive(Default, Debug)]
pub struct PropertyBaseBuilder {
  meta: Option<IndexMap<String, String>>,
  properties: Option<IndexMap<String, Property>>,
}

impl PropertyBaseBuilder {
  pub(crate) fn build(self) -> PropertyBase {
    PropertyBase {
      meta: self.meta.unwrap_or_default(),
      properties: self.properties.unwrap_or_default(),
    }
  }
}

/// Setters for the fields every property has.
pub trait PropertyBaseSetters: Sized + AsMut<PropertyBaseBuilder> {
  /// Add an entry to `meta`.
  #[must_use]
  fn meta_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    map_put(&mut self.as_mut().meta, key, value.into());
    self
  }

  /// Add every entry to `properties`.
  #[must_use]
  fn properties(mut self, properties: IndexMap<String, Property>) -> Self {
    for (name, property) in properties {
      map_put(&mut self.as_mut().properties, name, property);
    }
    self
  }

  /// Add the property of a field within this field.
  #[must_use]
  fn properties_entry(mut self, name: impl Into<String>, property: impl Into<Property>) -> Self {
    map_put(&mut self.as_mut().properties, name, property.into());
    self
  }
}
impl<B: AsMut<PropertyBaseBuilder>> PropertyBaseSetters for B {}

/*
  `type` is read by the dispatcher before the variant is, and is written by it, so each variant
  only has to accept it.
*/
pub(crate) fn setup_property_base<B: 'static + ObjectBuilder + AsMut<PropertyBaseBuilder>>(
  deserializer: &mut ObjectDeserializer<B>,
) {
  deserializer
    .ignore("type")
    .add("meta", mapping(canonical::<String>()), |builder: &mut B, value| {
      builder.as_mut().meta = Some(value);
    })
    .add("properties", mapping(&PROPERTY), |builder: &mut B, value| {
      builder.as_mut().properties = Some(value);
    });
}

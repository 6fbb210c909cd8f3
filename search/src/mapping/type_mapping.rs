use std::sync::LazyLock;

use indexmap::IndexMap;

use typed_json_traits::{
  Cursor, Generator, Result, DecodeOptions, JsonDeserialize, JsonDeserializer, JsonSerialize,
  SerializeFields, ObjectBuilder, ObjectDeserializer, canonical, mapping, serialize_object,
  write_field, write_optional_field,
  builder::map_put,
};

use crate::mapping::{Property, property::PROPERTY};

/// The mapping of an index's documents.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct TypeMapping {
  properties: IndexMap<String, Property>,
  date_detection: Option<bool>,
}

impl TypeMapping {
  /// A builder for a mapping.
  pub fn builder() -> TypeMappingBuilder {
    TypeMappingBuilder::default()
  }

  /// The properties of the documents' fields.
  pub fn properties(&self) -> &IndexMap<String, Property> {
    &self.properties
  }

  /// If strings which look like dates are mapped as dates.
  pub fn date_detection(&self) -> Option<bool> {
    self.date_detection
  }
}

/// The builder of a `TypeMapping`.
#[derive(Default, Debug)]
pub struct TypeMappingBuilder {
  properties: Option<IndexMap<String, Property>>,
  date_detection: Option<bool>,
}

impl TypeMappingBuilder {
  /// Add every entry to `properties`.
  #[must_use]
  pub fn properties(mut self, properties: IndexMap<String, Property>) -> Self {
    for (name, property) in properties {
      map_put(&mut self.properties, name, property);
    }
    self
  }

  /// Add the property of a field.
  #[must_use]
  pub fn properties_entry(
    mut self,
    name: impl Into<String>,
    property: impl Into<Property>,
  ) -> Self {
    map_put(&mut self.properties, name, property.into());
    self
  }

  /// Set if strings which look like dates are mapped as dates.
  #[must_use]
  pub fn date_detection(mut self, date_detection: bool) -> Self {
    self.date_detection = Some(date_detection);
    self
  }
}

impl ObjectBuilder for TypeMappingBuilder {
  type Value = TypeMapping;
  const NAME: &'static str = "TypeMapping";
  fn build(self) -> Result<TypeMapping> {
    Ok(TypeMapping {
      properties: self.properties.unwrap_or_default(),
      date_detection: self.date_detection,
    })
  }
}

static TYPE_MAPPING: LazyLock<ObjectDeserializer<TypeMappingBuilder>> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<TypeMappingBuilder>::new();
  deserializer
    .add("properties", mapping(&PROPERTY), |builder: &mut TypeMappingBuilder, value| {
      builder.properties = Some(value);
    })
    .add("date_detection", canonical::<bool>(), |builder: &mut TypeMappingBuilder, value| {
      builder.date_detection = Some(value);
    });
  deserializer
});

impl JsonDeserialize for TypeMapping {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    TYPE_MAPPING.deserialize(cursor, options)
  }
}

impl SerializeFields for TypeMapping {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    write_field(generator, "properties", &self.properties)?;
    write_optional_field(generator, "date_detection", self.date_detection.as_ref())
  }
}

impl JsonSerialize for TypeMapping {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

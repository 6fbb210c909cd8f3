use std::sync::LazyLock;

use typed_json_traits::{
  Cursor, Generator, Result, DecodeOptions, JsonDeserialize, JsonDeserializer, SerializeFields,
  ObjectBuilder, ObjectDeserializer, canonical, write_optional_field,
};

use crate::mapping::{PropertyBase, PropertyBaseBuilder, setup_property_base};

/// A string indexed as a whole, for filtering, sorting, and aggregating.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct KeywordProperty {
  base: PropertyBase,
  ignore_above: Option<i32>,
  index: Option<bool>,
}

impl KeywordProperty {
  /// A builder for this property.
  pub fn builder() -> KeywordPropertyBuilder {
    KeywordPropertyBuilder::default()
  }

  /// The fields shared by every property.
  pub fn base(&self) -> &PropertyBase {
    &self.base
  }

  /// The length above which strings aren't indexed.
  pub fn ignore_above(&self) -> Option<i32> {
    self.ignore_above
  }

  /// If the field is searchable.
  pub fn index(&self) -> Option<bool> {
    self.index
  }
}

/// The builder of a `KeywordProperty`.
#[derive(Default, Debug)]
pub struct KeywordPropertyBuilder {
  base: PropertyBaseBuilder,
  ignore_above: Option<i32>,
  index: Option<bool>,
}

impl AsMut<PropertyBaseBuilder> for KeywordPropertyBuilder {
  fn as_mut(&mut self) -> &mut PropertyBaseBuilder {
    &mut self.base
  }
}

impl KeywordPropertyBuilder {
  /// Set the length above which strings aren't indexed.
  #[must_use]
  pub fn ignore_above(mut self, ignore_above: i32) -> Self {
    self.ignore_above = Some(ignore_above);
    self
  }

  /// Set if the field is searchable.
  #[must_use]
  pub fn index(mut self, index: bool) -> Self {
    self.index = Some(index);
    self
  }
}

impl ObjectBuilder for KeywordPropertyBuilder {
  type Value = KeywordProperty;
  const NAME: &'static str = "KeywordProperty";
  fn build(self) -> Result<KeywordProperty> {
    Ok(KeywordProperty {
      base: self.base.build(),
      ignore_above: self.ignore_above,
      index: self.index,
    })
  }
}

static KEYWORD_PROPERTY: LazyLock<ObjectDeserializer<KeywordPropertyBuilder>> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<KeywordPropertyBuilder>::new();
  setup_property_base(&mut deserializer);
  deserializer
    .add("ignore_above", canonical::<i32>(), |builder: &mut KeywordPropertyBuilder, value| {
      builder.ignore_above = Some(value);
    })
    .add("index", canonical::<bool>(), |builder: &mut KeywordPropertyBuilder, value| {
      builder.index = Some(value);
    });
  deserializer
});

impl JsonDeserialize for KeywordProperty {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    KEYWORD_PROPERTY.deserialize(cursor, options)
  }
}

impl SerializeFields for KeywordProperty {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_optional_field(generator, "ignore_above", self.ignore_above.as_ref())?;
    write_optional_field(generator, "index", self.index.as_ref())
  }
}

/// A string analyzed into terms, for full-text search.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct TextProperty {
  base: PropertyBase,
  analyzer: Option<String>,
  fielddata: Option<bool>,
}

impl TextProperty {
  /// A builder for this property.
  pub fn builder() -> TextPropertyBuilder {
    TextPropertyBuilder::default()
  }

  /// The fields shared by every property.
  pub fn base(&self) -> &PropertyBase {
    &self.base
  }

  /// The analyzer of the text.
  pub fn analyzer(&self) -> Option<&str> {
    self.analyzer.as_deref()
  }

  /// If the terms may be used for sorting and aggregating.
  pub fn fielddata(&self) -> Option<bool> {
    self.fielddata
  }
}

/// The builder of a `TextProperty`.
#[derive(Default, Debug)]
pub struct TextPropertyBuilder {
  base: PropertyBaseBuilder,
  analyzer: Option<String>,
  fielddata: Option<bool>,
}

impl AsMut<PropertyBaseBuilder> for TextPropertyBuilder {
  fn as_mut(&mut self) -> &mut PropertyBaseBuilder {
    &mut self.base
  }
}

impl TextPropertyBuilder {
  /// Set the analyzer of the text.
  #[must_use]
  pub fn analyzer(mut self, analyzer: impl Into<String>) -> Self {
    self.analyzer = Some(analyzer.into());
    self
  }

  /// Set if the terms may be used for sorting and aggregating.
  #[must_use]
  pub fn fielddata(mut self, fielddata: bool) -> Self {
    self.fielddata = Some(fielddata);
    self
  }
}

impl ObjectBuilder for TextPropertyBuilder {
  type Value = TextProperty;
  const NAME: &'static str = "TextProperty";
  fn build(self) -> Result<TextProperty> {
    Ok(TextProperty { base: self.base.build(), analyzer: self.analyzer, fielddata: self.fielddata })
  }
}

static TEXT_PROPERTY: LazyLock<ObjectDeserializer<TextPropertyBuilder>> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<TextPropertyBuilder>::new();
  setup_property_base(&mut deserializer);
  deserializer
    .add("analyzer", canonical::<String>(), |builder: &mut TextPropertyBuilder, value| {
      builder.analyzer = Some(value);
    })
    .add("fielddata", canonical::<bool>(), |builder: &mut TextPropertyBuilder, value| {
      builder.fielddata = Some(value);
    });
  deserializer
});

impl JsonDeserialize for TextProperty {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    TEXT_PROPERTY.deserialize(cursor, options)
  }
}

impl SerializeFields for TextProperty {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_optional_field(generator, "analyzer", self.analyzer.as_ref())?;
    write_optional_field(generator, "fielddata", self.fielddata.as_ref())
  }
}

/// A number, as of the `long` and `double` properties.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct NumberProperty {
  base: PropertyBase,
  coerce: Option<bool>,
  index: Option<bool>,
}

impl NumberProperty {
  /// A builder for this property.
  pub fn builder() -> NumberPropertyBuilder {
    NumberPropertyBuilder::default()
  }

  /// The fields shared by every property.
  pub fn base(&self) -> &PropertyBase {
    &self.base
  }

  /// If strings are converted to numbers.
  pub fn coerce(&self) -> Option<bool> {
    self.coerce
  }

  /// If the field is searchable.
  pub fn index(&self) -> Option<bool> {
    self.index
  }
}

/// The builder of a `NumberProperty`.
#[derive(Default, Debug)]
pub struct NumberPropertyBuilder {
  base: PropertyBaseBuilder,
  coerce: Option<bool>,
  index: Option<bool>,
}

impl AsMut<PropertyBaseBuilder> for NumberPropertyBuilder {
  fn as_mut(&mut self) -> &mut PropertyBaseBuilder {
    &mut self.base
  }
}

impl NumberPropertyBuilder {
  /// Set if strings are converted to numbers.
  #[must_use]
  pub fn coerce(mut self, coerce: bool) -> Self {
    self.coerce = Some(coerce);
    self
  }

  /// Set if the field is searchable.
  #[must_use]
  pub fn index(mut self, index: bool) -> Self {
    self.index = Some(index);
    self
  }
}

impl ObjectBuilder for NumberPropertyBuilder {
  type Value = NumberProperty;
  const NAME: &'static str = "NumberProperty";
  fn build(self) -> Result<NumberProperty> {
    Ok(NumberProperty { base: self.base.build(), coerce: self.coerce, index: self.index })
  }
}

static NUMBER_PROPERTY: LazyLock<ObjectDeserializer<NumberPropertyBuilder>> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<NumberPropertyBuilder>::new();
  setup_property_base(&mut deserializer);
  deserializer
    .add("coerce", canonical::<bool>(), |builder: &mut NumberPropertyBuilder, value| {
      builder.coerce = Some(value);
    })
    .add("index", canonical::<bool>(), |builder: &mut NumberPropertyBuilder, value| {
      builder.index = Some(value);
    });
  deserializer
});

impl JsonDeserialize for NumberProperty {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    NUMBER_PROPERTY.deserialize(cursor, options)
  }
}

impl SerializeFields for NumberProperty {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_optional_field(generator, "coerce", self.coerce.as_ref())?;
    write_optional_field(generator, "index", self.index.as_ref())
  }
}

/// A boolean.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct BooleanProperty {
  base: PropertyBase,
  index: Option<bool>,
}

impl BooleanProperty {
  /// A builder for this property.
  pub fn builder() -> BooleanPropertyBuilder {
    BooleanPropertyBuilder::default()
  }

  /// The fields shared by every property.
  pub fn base(&self) -> &PropertyBase {
    &self.base
  }

  /// If the field is searchable.
  pub fn index(&self) -> Option<bool> {
    self.index
  }
}

/// The builder of a `BooleanProperty`.
#[derive(Default, Debug)]
pub struct BooleanPropertyBuilder {
  base: PropertyBaseBuilder,
  index: Option<bool>,
}

impl AsMut<PropertyBaseBuilder> for BooleanPropertyBuilder {
  fn as_mut(&mut self) -> &mut PropertyBaseBuilder {
    &mut self.base
  }
}

impl BooleanPropertyBuilder {
  /// Set if the field is searchable.
  #[must_use]
  pub fn index(mut self, index: bool) -> Self {
    self.index = Some(index);
    self
  }
}

impl ObjectBuilder for BooleanPropertyBuilder {
  type Value = BooleanProperty;
  const NAME: &'static str = "BooleanProperty";
  fn build(self) -> Result<BooleanProperty> {
    Ok(BooleanProperty { base: self.base.build(), index: self.index })
  }
}

static BOOLEAN_PROPERTY: LazyLock<ObjectDeserializer<BooleanPropertyBuilder>> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<BooleanPropertyBuilder>::new();
  setup_property_base(&mut deserializer);
  deserializer
    .add("index", canonical::<bool>(), |builder: &mut BooleanPropertyBuilder, value| {
      builder.index = Some(value);
    });
  deserializer
});

impl JsonDeserialize for BooleanProperty {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    BOOLEAN_PROPERTY.deserialize(cursor, options)
  }
}

impl SerializeFields for BooleanProperty {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_optional_field(generator, "index", self.index.as_ref())
  }
}

/// A date.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct DateProperty {
  base: PropertyBase,
  format: Option<String>,
}

impl DateProperty {
  /// A builder for this property.
  pub fn builder() -> DatePropertyBuilder {
    DatePropertyBuilder::default()
  }

  /// The fields shared by every property.
  pub fn base(&self) -> &PropertyBase {
    &self.base
  }

  /// The formats dates may be in.
  pub fn format(&self) -> Option<&str> {
    self.format.as_deref()
  }
}

/// The builder of a `DateProperty`.
#[derive(Default, Debug)]
pub struct DatePropertyBuilder {
  base: PropertyBaseBuilder,
  format: Option<String>,
}

impl AsMut<PropertyBaseBuilder> for DatePropertyBuilder {
  fn as_mut(&mut self) -> &mut PropertyBaseBuilder {
    &mut self.base
  }
}

impl DatePropertyBuilder {
  /// Set the formats dates may be in.
  #[must_use]
  pub fn format(mut self, format: impl Into<String>) -> Self {
    self.format = Some(format.into());
    self
  }
}

impl ObjectBuilder for DatePropertyBuilder {
  type Value = DateProperty;
  const NAME: &'static str = "DateProperty";
  fn build(self) -> Result<DateProperty> {
    Ok(DateProperty { base: self.base.build(), format: self.format })
  }
}

static DATE_PROPERTY: LazyLock<ObjectDeserializer<DatePropertyBuilder>> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<DatePropertyBuilder>::new();
  setup_property_base(&mut deserializer);
  deserializer
    .add("format", canonical::<String>(), |builder: &mut DatePropertyBuilder, value| {
      builder.format = Some(value);
    });
  deserializer
});

impl JsonDeserialize for DateProperty {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    DATE_PROPERTY.deserialize(cursor, options)
  }
}

impl SerializeFields for DateProperty {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_optional_field(generator, "format", self.format.as_ref())
  }
}

/// An object, whose fields are flattened into its document.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct ObjectProperty {
  base: PropertyBase,
  enabled: Option<bool>,
}

impl ObjectProperty {
  /// A builder for this property.
  pub fn builder() -> ObjectPropertyBuilder {
    ObjectPropertyBuilder::default()
  }

  /// The fields shared by every property.
  pub fn base(&self) -> &PropertyBase {
    &self.base
  }

  /// If the object's fields are parsed.
  pub fn enabled(&self) -> Option<bool> {
    self.enabled
  }
}

/// The builder of a `ObjectProperty`.
#[derive(Default, Debug)]
pub struct ObjectPropertyBuilder {
  base: PropertyBaseBuilder,
  enabled: Option<bool>,
}

impl AsMut<PropertyBaseBuilder> for ObjectPropertyBuilder {
  fn as_mut(&mut self) -> &mut PropertyBaseBuilder {
    &mut self.base
  }
}

impl ObjectPropertyBuilder {
  /// Set if the object's fields are parsed.
  #[must_use]
  pub fn enabled(mut self, enabled: bool) -> Self {
    self.enabled = Some(enabled);
    self
  }
}

impl ObjectBuilder for ObjectPropertyBuilder {
  type Value = ObjectProperty;
  const NAME: &'static str = "ObjectProperty";
  fn build(self) -> Result<ObjectProperty> {
    Ok(ObjectProperty { base: self.base.build(), enabled: self.enabled })
  }
}

static OBJECT_PROPERTY: LazyLock<ObjectDeserializer<ObjectPropertyBuilder>> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<ObjectPropertyBuilder>::new();
  setup_property_base(&mut deserializer);
  deserializer
    .add("enabled", canonical::<bool>(), |builder: &mut ObjectPropertyBuilder, value| {
      builder.enabled = Some(value);
    });
  deserializer
});

impl JsonDeserialize for ObjectProperty {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    OBJECT_PROPERTY.deserialize(cursor, options)
  }
}

impl SerializeFields for ObjectProperty {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_optional_field(generator, "enabled", self.enabled.as_ref())
  }
}

/// An array of objects, each indexed as its own hidden document.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct NestedProperty {
  base: PropertyBase,
  include_in_parent: Option<bool>,
}

impl NestedProperty {
  /// A builder for this property.
  pub fn builder() -> NestedPropertyBuilder {
    NestedPropertyBuilder::default()
  }

  /// The fields shared by every property.
  pub fn base(&self) -> &PropertyBase {
    &self.base
  }

  /// If the objects' fields are also added to the parent document.
  pub fn include_in_parent(&self) -> Option<bool> {
    self.include_in_parent
  }
}

/// The builder of a `NestedProperty`.
#[derive(Default, Debug)]
pub struct NestedPropertyBuilder {
  base: PropertyBaseBuilder,
  include_in_parent: Option<bool>,
}

impl AsMut<PropertyBaseBuilder> for NestedPropertyBuilder {
  fn as_mut(&mut self) -> &mut PropertyBaseBuilder {
    &mut self.base
  }
}

impl NestedPropertyBuilder {
  /// Set if the objects' fields are also added to the parent document.
  #[must_use]
  pub fn include_in_parent(mut self, include_in_parent: bool) -> Self {
    self.include_in_parent = Some(include_in_parent);
    self
  }
}

impl ObjectBuilder for NestedPropertyBuilder {
  type Value = NestedProperty;
  const NAME: &'static str = "NestedProperty";
  fn build(self) -> Result<NestedProperty> {
    Ok(NestedProperty { base: self.base.build(), include_in_parent: self.include_in_parent })
  }
}

static NESTED_PROPERTY: LazyLock<ObjectDeserializer<NestedPropertyBuilder>> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<NestedPropertyBuilder>::new();
  setup_property_base(&mut deserializer);
  deserializer
    .add("include_in_parent", canonical::<bool>(), |builder: &mut NestedPropertyBuilder, value| {
      builder.include_in_parent = Some(value);
    });
  deserializer
});

impl JsonDeserialize for NestedProperty {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    NESTED_PROPERTY.deserialize(cursor, options)
  }
}

impl SerializeFields for NestedProperty {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_optional_field(generator, "include_in_parent", self.include_in_parent.as_ref())
  }
}

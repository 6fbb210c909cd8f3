use std::sync::LazyLock;

use typed_json_traits::{
  Cursor, Generator, Result, DecodeOptions, JsonDeserialize, JsonDeserializer, JsonSerialize,
  SerializeFields, canonical,
  union::{VariantKind, TaggedUnion, VariantTable, SentinelDeserializer, serialize_sentinel},
};

use crate::mapping::{
  KeywordProperty, TextProperty, NumberProperty, BooleanProperty, DateProperty, ObjectProperty,
  NestedProperty,
};

/// The kind of a property.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PropertyKind {
  /// `keyword`
  Keyword,
  /// `text`
  Text,
  /// `long`
  Long,
  /// `double`
  Double,
  /// `boolean`
  Boolean,
  /// `date`
  Date,
  /// `object`
  Object,
  /// `nested`
  Nested,
}

impl VariantKind for PropertyKind {
  fn tag(self) -> &'static str {
    match self {
      PropertyKind::Keyword => "keyword",
      PropertyKind::Text => "text",
      PropertyKind::Long => "long",
      PropertyKind::Double => "double",
      PropertyKind::Boolean => "boolean",
      PropertyKind::Date => "date",
      PropertyKind::Object => "object",
      PropertyKind::Nested => "nested",
    }
  }
}

/// The mapping of a field, as one of many types.
///
/// On the wire, the type is the `type` field, which may be anywhere within the object. Without
/// it, the property is an `object`.
#[derive(Clone, PartialEq, Debug)]
pub enum Property {
  /// A string indexed as a whole.
  Keyword(KeywordProperty),
  /// A string analyzed for full-text search.
  Text(TextProperty),
  /// A signed 64-bit integer.
  Long(NumberProperty),
  /// A 64-bit float.
  Double(NumberProperty),
  /// A boolean.
  Boolean(BooleanProperty),
  /// A date.
  Date(DateProperty),
  /// An object.
  Object(ObjectProperty),
  /// An array of objects indexed independently.
  Nested(NestedProperty),
}

impl Property {
  /// If this is a `keyword` property.
  pub fn is_keyword(&self) -> bool {
    matches!(self, Property::Keyword(_))
  }
  /// This as a `keyword` property, if it is one.
  pub fn as_keyword(&self) -> Option<&KeywordProperty> {
    match self {
      Property::Keyword(property) => Some(property),
      _ => None,
    }
  }

  /// If this is a `text` property.
  pub fn is_text(&self) -> bool {
    matches!(self, Property::Text(_))
  }
  /// This as a `text` property, if it is one.
  pub fn as_text(&self) -> Option<&TextProperty> {
    match self {
      Property::Text(property) => Some(property),
      _ => None,
    }
  }

  /// If this is a `long` property.
  pub fn is_long(&self) -> bool {
    matches!(self, Property::Long(_))
  }
  /// This as a `long` property, if it is one.
  pub fn as_long(&self) -> Option<&NumberProperty> {
    match self {
      Property::Long(property) => Some(property),
      _ => None,
    }
  }

  /// If this is a `double` property.
  pub fn is_double(&self) -> bool {
    matches!(self, Property::Double(_))
  }
  /// This as a `double` property, if it is one.
  pub fn as_double(&self) -> Option<&NumberProperty> {
    match self {
      Property::Double(property) => Some(property),
      _ => None,
    }
  }

  /// If this is a `boolean` property.
  pub fn is_boolean(&self) -> bool {
    matches!(self, Property::Boolean(_))
  }
  /// This as a `boolean` property, if it is one.
  pub fn as_boolean(&self) -> Option<&BooleanProperty> {
    match self {
      Property::Boolean(property) => Some(property),
      _ => None,
    }
  }

  /// If this is a `date` property.
  pub fn is_date(&self) -> bool {
    matches!(self, Property::Date(_))
  }
  /// This as a `date` property, if it is one.
  pub fn as_date(&self) -> Option<&DateProperty> {
    match self {
      Property::Date(property) => Some(property),
      _ => None,
    }
  }

  /// If this is an `object` property.
  pub fn is_object(&self) -> bool {
    matches!(self, Property::Object(_))
  }
  /// This as an `object` property, if it is one.
  pub fn as_object(&self) -> Option<&ObjectProperty> {
    match self {
      Property::Object(property) => Some(property),
      _ => None,
    }
  }

  /// If this is a `nested` property.
  pub fn is_nested(&self) -> bool {
    matches!(self, Property::Nested(_))
  }
  /// This as a `nested` property, if it is one.
  pub fn as_nested(&self) -> Option<&NestedProperty> {
    match self {
      Property::Nested(property) => Some(property),
      _ => None,
    }
  }
}

impl From<KeywordProperty> for Property {
  fn from(property: KeywordProperty) -> Property {
    Property::Keyword(property)
  }
}

impl From<TextProperty> for Property {
  fn from(property: TextProperty) -> Property {
    Property::Text(property)
  }
}

impl From<BooleanProperty> for Property {
  fn from(property: BooleanProperty) -> Property {
    Property::Boolean(property)
  }
}

impl From<DateProperty> for Property {
  fn from(property: DateProperty) -> Property {
    Property::Date(property)
  }
}

impl From<ObjectProperty> for Property {
  fn from(property: ObjectProperty) -> Property {
    Property::Object(property)
  }
}

impl From<NestedProperty> for Property {
  fn from(property: NestedProperty) -> Property {
    Property::Nested(property)
  }
}

impl TaggedUnion for Property {
  const NAME: &'static str = "Property";
  type Kind = PropertyKind;

  fn kind(&self) -> PropertyKind {
    match self {
      Property::Keyword(_) => PropertyKind::Keyword,
      Property::Text(_) => PropertyKind::Text,
      Property::Long(_) => PropertyKind::Long,
      Property::Double(_) => PropertyKind::Double,
      Property::Boolean(_) => PropertyKind::Boolean,
      Property::Date(_) => PropertyKind::Date,
      Property::Object(_) => PropertyKind::Object,
      Property::Nested(_) => PropertyKind::Nested,
    }
  }

  fn variant(&self) -> &dyn SerializeFields {
    match self {
      Property::Keyword(property) => property,
      Property::Text(property) => property,
      Property::Long(property) | Property::Double(property) => property,
      Property::Boolean(property) => property,
      Property::Date(property) => property,
      Property::Object(property) => property,
      Property::Nested(property) => property,
    }
  }
}

static PROPERTY_VARIANTS: LazyLock<VariantTable<Property>> = LazyLock::new(|| {
  let mut variants = VariantTable::new();
  variants
    .add(PropertyKind::Keyword.tag(), canonical::<KeywordProperty>(), Property::Keyword)
    .add(PropertyKind::Text.tag(), canonical::<TextProperty>(), Property::Text)
    .add(PropertyKind::Long.tag(), canonical::<NumberProperty>(), Property::Long)
    .add(PropertyKind::Double.tag(), canonical::<NumberProperty>(), Property::Double)
    .add(PropertyKind::Boolean.tag(), canonical::<BooleanProperty>(), Property::Boolean)
    .add(PropertyKind::Date.tag(), canonical::<DateProperty>(), Property::Date)
    .add(PropertyKind::Object.tag(), canonical::<ObjectProperty>(), Property::Object)
    .add(PropertyKind::Nested.tag(), canonical::<NestedProperty>(), Property::Nested);
  variants
});

pub(crate) static PROPERTY: SentinelDeserializer<Property> =
  SentinelDeserializer::new("type", || &*PROPERTY_VARIANTS).with_default_tag("object");

impl JsonDeserialize for Property {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    PROPERTY.deserialize(cursor, options)
  }
}

impl JsonSerialize for Property {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_sentinel(self, PROPERTY.field(), generator)
  }
}

use std::sync::LazyLock;

use indexmap::IndexMap;

use typed_json_traits::{
  Cursor, Generator, JsonError, Result, DecodeOptions, JsonValue, JsonDeserialize,
  JsonDeserializer, JsonSerialize, SerializeFields, ObjectBuilder, ObjectDeserializer, canonical,
  lazy, mapping, serialize_object, write_field, write_optional_field,
  builder::{require, map_put},
  union::{VariantKind, TaggedUnion, VariantTable},
};

/// An aggregation of the values of a single field into a single metric.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct FieldMetricAggregation {
  field: Option<String>,
  missing: Option<JsonValue>,
}

impl FieldMetricAggregation {
  /// A builder for this aggregation.
  pub fn builder() -> FieldMetricAggregationBuilder {
    FieldMetricAggregationBuilder::default()
  }

  /// The field to aggregate.
  pub fn field(&self) -> Option<&str> {
    self.field.as_deref()
  }

  /// The value used for documents without the field.
  pub fn missing(&self) -> Option<&JsonValue> {
    self.missing.as_ref()
  }
}

/// The builder of a `FieldMetricAggregation`.
#[derive(Default, Debug)]
pub struct FieldMetricAggregationBuilder {
  field: Option<String>,
  missing: Option<JsonValue>,
}

impl FieldMetricAggregationBuilder {
  /// Set the field to aggregate.
  #[must_use]
  pub fn field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }

  /// Set the value used for documents without the field.
  #[must_use]
  pub fn missing(mut self, missing: impl Into<JsonValue>) -> Self {
    self.missing = Some(missing.into());
    self
  }
}

impl ObjectBuilder for FieldMetricAggregationBuilder {
  type Value = FieldMetricAggregation;
  const NAME: &'static str = "FieldMetricAggregation";
  fn build(self) -> Result<FieldMetricAggregation> {
    Ok(FieldMetricAggregation { field: self.field, missing: self.missing })
  }
}

static FIELD_METRIC_AGGREGATION: LazyLock<ObjectDeserializer<FieldMetricAggregationBuilder>> =
  LazyLock::new(|| {
    let mut deserializer = ObjectDeserializer::<FieldMetricAggregationBuilder>::new();
    deserializer
      .add("field", canonical::<String>(), |builder: &mut FieldMetricAggregationBuilder, value| {
        builder.field = Some(value);
      })
      .add(
        "missing",
        canonical::<JsonValue>(),
        |builder: &mut FieldMetricAggregationBuilder, value| builder.missing = Some(value),
      );
    deserializer
  });

impl JsonDeserialize for FieldMetricAggregation {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    FIELD_METRIC_AGGREGATION.deserialize(cursor, options)
  }
}

impl SerializeFields for FieldMetricAggregation {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    write_optional_field(generator, "field", self.field.as_ref())?;
    write_optional_field(generator, "missing", self.missing.as_ref())
  }
}

/// An aggregation into a bucket per term of a field.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct TermsAggregation {
  field: Option<String>,
  size: Option<i32>,
}

impl TermsAggregation {
  /// A builder for this aggregation.
  pub fn builder() -> TermsAggregationBuilder {
    TermsAggregationBuilder::default()
  }

  /// The field whose terms to bucket by.
  pub fn field(&self) -> Option<&str> {
    self.field.as_deref()
  }

  /// The amount of buckets to return.
  pub fn size(&self) -> Option<i32> {
    self.size
  }
}

/// The builder of a `TermsAggregation`.
#[derive(Default, Debug)]
pub struct TermsAggregationBuilder {
  field: Option<String>,
  size: Option<i32>,
}

impl TermsAggregationBuilder {
  /// Set the field whose terms to bucket by.
  #[must_use]
  pub fn field(mut self, field: impl Into<String>) -> Self {
    self.field = Some(field.into());
    self
  }

  /// Set the amount of buckets to return.
  #[must_use]
  pub fn size(mut self, size: i32) -> Self {
    self.size = Some(size);
    self
  }
}

impl ObjectBuilder for TermsAggregationBuilder {
  type Value = TermsAggregation;
  const NAME: &'static str = "TermsAggregation";
  fn build(self) -> Result<TermsAggregation> {
    Ok(TermsAggregation { field: self.field, size: self.size })
  }
}

static TERMS_AGGREGATION: LazyLock<ObjectDeserializer<TermsAggregationBuilder>> =
  LazyLock::new(|| {
    let mut deserializer = ObjectDeserializer::<TermsAggregationBuilder>::new();
    deserializer
      .add("field", canonical::<String>(), |builder: &mut TermsAggregationBuilder, value| {
        builder.field = Some(value);
      })
      .add("size", canonical::<i32>(), |builder: &mut TermsAggregationBuilder, value| {
        builder.size = Some(value);
      });
    deserializer
  });

impl JsonDeserialize for TermsAggregation {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    TERMS_AGGREGATION.deserialize(cursor, options)
  }
}

impl SerializeFields for TermsAggregation {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    write_optional_field(generator, "field", self.field.as_ref())?;
    write_optional_field(generator, "size", self.size.as_ref())
  }
}

/// An aggregation of the documents nested under a path.
#[derive(Clone, PartialEq, Debug)]
pub struct NestedAggregation {
  path: String,
}

impl NestedAggregation {
  /// A builder for this aggregation.
  pub fn builder() -> NestedAggregationBuilder {
    NestedAggregationBuilder::default()
  }

  /// The path of the nested documents.
  pub fn path(&self) -> &str {
    &self.path
  }
}

/// The builder of a `NestedAggregation`.
#[derive(Default, Debug)]
pub struct NestedAggregationBuilder {
  path: Option<String>,
}

impl NestedAggregationBuilder {
  /// Set the path of the nested documents.
  #[must_use]
  pub fn path(mut self, path: impl Into<String>) -> Self {
    self.path = Some(path.into());
    self
  }
}

impl ObjectBuilder for NestedAggregationBuilder {
  type Value = NestedAggregation;
  const NAME: &'static str = "NestedAggregation";
  fn build(self) -> Result<NestedAggregation> {
    Ok(NestedAggregation { path: require(self.path, Self::NAME, "path")? })
  }
}

static NESTED_AGGREGATION: LazyLock<ObjectDeserializer<NestedAggregationBuilder>> =
  LazyLock::new(|| {
    let mut deserializer = ObjectDeserializer::<NestedAggregationBuilder>::new();
    deserializer.add(
      "path",
      canonical::<String>(),
      |builder: &mut NestedAggregationBuilder, value| builder.path = Some(value),
    );
    deserializer
  });

impl JsonDeserialize for NestedAggregation {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    NESTED_AGGREGATION.deserialize(cursor, options)
  }
}

impl SerializeFields for NestedAggregation {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    write_field(generator, "path", &self.path)
  }
}

/// An aggregation of every document of the searched indices, regardless of the query.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct GlobalAggregation {}

impl GlobalAggregation {
  /// A builder for this aggregation.
  pub fn builder() -> GlobalAggregationBuilder {
    GlobalAggregationBuilder::default()
  }
}

/// The builder of a `GlobalAggregation`.
#[derive(Default, Debug)]
pub struct GlobalAggregationBuilder {}

impl ObjectBuilder for GlobalAggregationBuilder {
  type Value = GlobalAggregation;
  const NAME: &'static str = "GlobalAggregation";
  fn build(self) -> Result<GlobalAggregation> {
    Ok(GlobalAggregation {})
  }
}

static GLOBAL_AGGREGATION: LazyLock<ObjectDeserializer<GlobalAggregationBuilder>> =
  LazyLock::new(ObjectDeserializer::new);

impl JsonDeserialize for GlobalAggregation {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    GLOBAL_AGGREGATION.deserialize(cursor, options)
  }
}

impl SerializeFields for GlobalAggregation {
  fn serialize_fields(&self, _generator: &mut dyn Generator) -> Result<()> {
    Ok(())
  }
}

/// The kind of an aggregation.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AggregationKind {
  /// `avg`
  Avg,
  /// `min`
  Min,
  /// `max`
  Max,
  /// `sum`
  Sum,
  /// `value_count`
  ValueCount,
  /// `cardinality`
  Cardinality,
  /// `terms`
  Terms,
  /// `nested`
  Nested,
  /// `global`
  Global,
}

impl VariantKind for AggregationKind {
  fn tag(self) -> &'static str {
    match self {
      AggregationKind::Avg => "avg",
      AggregationKind::Min => "min",
      AggregationKind::Max => "max",
      AggregationKind::Sum => "sum",
      AggregationKind::ValueCount => "value_count",
      AggregationKind::Cardinality => "cardinality",
      AggregationKind::Terms => "terms",
      AggregationKind::Nested => "nested",
      AggregationKind::Global => "global",
    }
  }
}

/// The kind-specific part of an aggregation.
#[derive(Clone, PartialEq, Debug)]
pub enum AggregationVariant {
  /// The average of a field.
  Avg(FieldMetricAggregation),
  /// The minimum of a field.
  Min(FieldMetricAggregation),
  /// The maximum of a field.
  Max(FieldMetricAggregation),
  /// The sum of a field.
  Sum(FieldMetricAggregation),
  /// The amount of values of a field.
  ValueCount(FieldMetricAggregation),
  /// The approximate count of distinct values of a field.
  Cardinality(FieldMetricAggregation),
  /// A bucket per term of a field.
  Terms(TermsAggregation),
  /// The documents nested under a path.
  Nested(NestedAggregation),
  /// Every document of the searched indices.
  Global(GlobalAggregation),
}

impl TaggedUnion for AggregationVariant {
  const NAME: &'static str = "Aggregation";
  type Kind = AggregationKind;

  fn kind(&self) -> AggregationKind {
    match self {
      AggregationVariant::Avg(_) => AggregationKind::Avg,
      AggregationVariant::Min(_) => AggregationKind::Min,
      AggregationVariant::Max(_) => AggregationKind::Max,
      AggregationVariant::Sum(_) => AggregationKind::Sum,
      AggregationVariant::ValueCount(_) => AggregationKind::ValueCount,
      AggregationVariant::Cardinality(_) => AggregationKind::Cardinality,
      AggregationVariant::Terms(_) => AggregationKind::Terms,
      AggregationVariant::Nested(_) => AggregationKind::Nested,
      AggregationVariant::Global(_) => AggregationKind::Global,
    }
  }

  fn variant(&self) -> &dyn SerializeFields {
    match self {
      AggregationVariant::Avg(aggregation) |
      AggregationVariant::Min(aggregation) |
      AggregationVariant::Max(aggregation) |
      AggregationVariant::Sum(aggregation) |
      AggregationVariant::ValueCount(aggregation) |
      AggregationVariant::Cardinality(aggregation) => aggregation,
      AggregationVariant::Terms(aggregation) => aggregation,
      AggregationVariant::Nested(aggregation) => aggregation,
      AggregationVariant::Global(aggregation) => aggregation,
    }
  }
}

static AGGREGATION_VARIANTS: LazyLock<VariantTable<AggregationVariant>> = LazyLock::new(|| {
  let mut variants = VariantTable::new();
  variants
    .add("avg", canonical::<FieldMetricAggregation>(), AggregationVariant::Avg)
    .add("min", canonical::<FieldMetricAggregation>(), AggregationVariant::Min)
    .add("max", canonical::<FieldMetricAggregation>(), AggregationVariant::Max)
    .add("sum", canonical::<FieldMetricAggregation>(), AggregationVariant::Sum)
    .add("value_count", canonical::<FieldMetricAggregation>(), AggregationVariant::ValueCount)
    .add("cardinality", canonical::<FieldMetricAggregation>(), AggregationVariant::Cardinality)
    .add("terms", canonical::<TermsAggregation>(), AggregationVariant::Terms)
    .add("nested", canonical::<NestedAggregation>(), AggregationVariant::Nested)
    .add("global", canonical::<GlobalAggregation>(), AggregationVariant::Global);
  variants
});

/// An aggregation, as requested.
///
/// An aggregation is of exactly one kind, and may have sub-aggregations which aggregate each of
/// its buckets.
#[derive(Clone, PartialEq, Debug)]
pub struct Aggregation {
  variant: AggregationVariant,
  aggregations: IndexMap<String, Aggregation>,
  meta: IndexMap<String, JsonValue>,
}

impl Aggregation {
  /// A builder for an aggregation, which first has to be given its kind.
  pub fn builder() -> AggregationBuilder {
    AggregationBuilder(())
  }

  /// The kind of this aggregation.
  pub fn kind(&self) -> AggregationKind {
    self.variant.kind()
  }

  /// The kind-specific part of this aggregation.
  pub fn variant(&self) -> &AggregationVariant {
    &self.variant
  }

  /// The sub-aggregations.
  pub fn aggregations(&self) -> &IndexMap<String, Aggregation> {
    &self.aggregations
  }

  /// The metadata to attach to the aggregate.
  pub fn meta(&self) -> &IndexMap<String, JsonValue> {
    &self.meta
  }
}

/// The builder of an `Aggregation` which has yet to be given its kind.
///
/// Choosing the kind yields an `AggregationContainerBuilder`, so only one kind may be chosen.
#[derive(Debug)]
pub struct AggregationBuilder(());

impl AggregationBuilder {
  /// Choose the kind-specific part of the aggregation.
  pub fn variant(self, variant: AggregationVariant) -> AggregationContainerBuilder {
    AggregationContainerBuilder { variant, aggregations: None, meta: None }
  }

  /// An `avg` aggregation.
  pub fn avg(
    self,
    f: impl FnOnce(FieldMetricAggregationBuilder) -> Result<FieldMetricAggregation>,
  ) -> Result<AggregationContainerBuilder> {
    Ok(self.variant(AggregationVariant::Avg(f(FieldMetricAggregation::builder())?)))
  }

  /// A `min` aggregation.
  pub fn min(
    self,
    f: impl FnOnce(FieldMetricAggregationBuilder) -> Result<FieldMetricAggregation>,
  ) -> Result<AggregationContainerBuilder> {
    Ok(self.variant(AggregationVariant::Min(f(FieldMetricAggregation::builder())?)))
  }

  /// A `max` aggregation.
  pub fn max(
    self,
    f: impl FnOnce(FieldMetricAggregationBuilder) -> Result<FieldMetricAggregation>,
  ) -> Result<AggregationContainerBuilder> {
    Ok(self.variant(AggregationVariant::Max(f(FieldMetricAggregation::builder())?)))
  }

  /// A `sum` aggregation.
  pub fn sum(
    self,
    f: impl FnOnce(FieldMetricAggregationBuilder) -> Result<FieldMetricAggregation>,
  ) -> Result<AggregationContainerBuilder> {
    Ok(self.variant(AggregationVariant::Sum(f(FieldMetricAggregation::builder())?)))
  }

  /// A `value_count` aggregation.
  pub fn value_count(
    self,
    f: impl FnOnce(FieldMetricAggregationBuilder) -> Result<FieldMetricAggregation>,
  ) -> Result<AggregationContainerBuilder> {
    Ok(self.variant(AggregationVariant::ValueCount(f(FieldMetricAggregation::builder())?)))
  }

  /// A `cardinality` aggregation.
  pub fn cardinality(
    self,
    f: impl FnOnce(FieldMetricAggregationBuilder) -> Result<FieldMetricAggregation>,
  ) -> Result<AggregationContainerBuilder> {
    Ok(self.variant(AggregationVariant::Cardinality(f(FieldMetricAggregation::builder())?)))
  }

  /// A `terms` aggregation.
  pub fn terms(
    self,
    f: impl FnOnce(TermsAggregationBuilder) -> Result<TermsAggregation>,
  ) -> Result<AggregationContainerBuilder> {
    Ok(self.variant(AggregationVariant::Terms(f(TermsAggregation::builder())?)))
  }

  /// A `nested` aggregation.
  pub fn nested(
    self,
    f: impl FnOnce(NestedAggregationBuilder) -> Result<NestedAggregation>,
  ) -> Result<AggregationContainerBuilder> {
    Ok(self.variant(AggregationVariant::Nested(f(NestedAggregation::builder())?)))
  }

  /// A `global` aggregation.
  pub fn global(self) -> AggregationContainerBuilder {
    self.variant(AggregationVariant::Global(GlobalAggregation {}))
  }
}

/// The builder of an `Aggregation` whose kind was chosen.
#[derive(Debug)]
pub struct AggregationContainerBuilder {
  variant: AggregationVariant,
  aggregations: Option<IndexMap<String, Aggregation>>,
  meta: Option<IndexMap<String, JsonValue>>,
}

impl AggregationContainerBuilder {
  /// Add every entry to the sub-aggregations.
  #[must_use]
  pub fn aggregations(mut self, aggregations: IndexMap<String, Aggregation>) -> Self {
    for (name, aggregation) in aggregations {
      map_put(&mut self.aggregations, name, aggregation);
    }
    self
  }

  /// Add a sub-aggregation.
  #[must_use]
  pub fn aggregations_entry(mut self, name: impl Into<String>, aggregation: Aggregation) -> Self {
    map_put(&mut self.aggregations, name, aggregation);
    self
  }

  /// Add every entry to `meta`.
  #[must_use]
  pub fn meta(mut self, meta: IndexMap<String, JsonValue>) -> Self {
    for (key, value) in meta {
      map_put(&mut self.meta, key, value);
    }
    self
  }

  /// Add an entry to `meta`.
  #[must_use]
  pub fn meta_entry(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
    map_put(&mut self.meta, key, value.into());
    self
  }
}

impl ObjectBuilder for AggregationContainerBuilder {
  type Value = Aggregation;
  const NAME: &'static str = "Aggregation";
  fn build(self) -> Result<Aggregation> {
    Ok(Aggregation {
      variant: self.variant,
      aggregations: self.aggregations.unwrap_or_default(),
      meta: self.meta.unwrap_or_default(),
    })
  }
}

// The kind isn't known until its key is read, so decoding can't use the typestate builder.
#[derive(Default)]
struct AggregationFields {
  variant: Option<AggregationVariant>,
  aggregations: Option<IndexMap<String, Aggregation>>,
  meta: Option<IndexMap<String, JsonValue>>,
}

impl ObjectBuilder for AggregationFields {
  type Value = Aggregation;
  const NAME: &'static str = "Aggregation";
  fn build(self) -> Result<Aggregation> {
    Ok(Aggregation {
      variant: require(self.variant, Self::NAME, "kind")?,
      aggregations: self.aggregations.unwrap_or_default(),
      meta: self.meta.unwrap_or_default(),
    })
  }
}

static AGGREGATION: LazyLock<ObjectDeserializer<AggregationFields>> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<AggregationFields>::new();
  deserializer
    .add_aliased(
      &["aggregations", "aggs"],
      mapping(lazy(|| &*AGGREGATION)),
      |builder: &mut AggregationFields, value| builder.aggregations = Some(value),
    )
    .add("meta", mapping(canonical::<JsonValue>()), |builder: &mut AggregationFields, value| {
      builder.meta = Some(value);
    })
    .set_unknown_field_handler(|builder: &mut AggregationFields, key, cursor, options| {
      if !AGGREGATION_VARIANTS.contains(key) {
        return Ok(false);
      }
      if let Some(chosen) = &builder.variant {
        Err(JsonError::UnexpectedTokenShape {
          expected: "a single aggregation kind",
          found: format!("`{key}` after `{}`", chosen.kind().tag()),
          context: AggregationFields::NAME,
        })?;
      }
      builder.variant = Some(AGGREGATION_VARIANTS.deserialize_variant(key, cursor, options)?);
      Ok(true)
    });
  deserializer
});

impl JsonDeserialize for Aggregation {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    AGGREGATION.deserialize(cursor, options)
  }
}

impl SerializeFields for Aggregation {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    generator.write_key(self.variant.kind().tag())?;
    serialize_object(self.variant.variant(), generator)?;
    if !self.aggregations.is_empty() {
      write_field(generator, "aggregations", &self.aggregations)?;
    }
    if !self.meta.is_empty() {
      write_field(generator, "meta", &self.meta)?;
    }
    Ok(())
  }
}

impl JsonSerialize for Aggregation {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

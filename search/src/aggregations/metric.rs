use std::sync::LazyLock;

use typed_json_traits::{
  Cursor, Generator, Result, DecodeOptions, Tri, JsonDeserialize, JsonDeserializer, JsonSerialize,
  SerializeFields, ObjectBuilder, ObjectDeserializer, canonical, optional, tri, serialize_object,
  write_field, write_optional_field, write_tri_field,
  builder::{require, require_tri},
};

use crate::aggregations::{AggregateBase, AggregateBaseBuilder, setup_aggregate_base};

/// An aggregate of a single numeric value, such as `avg` or `max`.
///
/// The value is `null` when there were no documents to aggregate.
#[derive(Clone, PartialEq, Debug)]
pub struct SingleMetricAggregate {
  base: AggregateBase,
  value: Option<f64>,
  value_as_string: Option<String>,
}

impl SingleMetricAggregate {
  /// A builder for this aggregate.
  pub fn builder() -> SingleMetricAggregateBuilder {
    SingleMetricAggregateBuilder::default()
  }

  /// The fields shared by every aggregate.
  pub fn base(&self) -> &AggregateBase {
    &self.base
  }

  /// The value.
  pub fn value(&self) -> Option<f64> {
    self.value
  }

  /// The value, formatted.
  pub fn value_as_string(&self) -> Option<&str> {
    self.value_as_string.as_deref()
  }
}

/// The builder of a `SingleMetricAggregate`.
#[derive(Default, Debug)]
pub struct SingleMetricAggregateBuilder {
  base: AggregateBaseBuilder,
  value: Tri<f64>,
  value_as_string: Option<String>,
}

impl AsMut<AggregateBaseBuilder> for SingleMetricAggregateBuilder {
  fn as_mut(&mut self) -> &mut AggregateBaseBuilder {
    &mut self.base
  }
}

impl SingleMetricAggregateBuilder {
  /// Set the value, which is required yet may be `None`.
  #[must_use]
  pub fn value(mut self, value: Option<f64>) -> Self {
    self.value = value.into();
    self
  }

  /// Set the formatted value.
  #[must_use]
  pub fn value_as_string(mut self, value_as_string: impl Into<String>) -> Self {
    self.value_as_string = Some(value_as_string.into());
    self
  }
}

impl ObjectBuilder for SingleMetricAggregateBuilder {
  type Value = SingleMetricAggregate;
  const NAME: &'static str = "SingleMetricAggregate";
  fn build(self) -> Result<SingleMetricAggregate> {
    Ok(SingleMetricAggregate {
      base: self.base.build(),
      value: require_tri(self.value, Self::NAME, "value")?,
      value_as_string: self.value_as_string,
    })
  }
}

static SINGLE_METRIC_AGGREGATE: LazyLock<ObjectDeserializer<SingleMetricAggregateBuilder>> =
  LazyLock::new(|| {
    let mut deserializer = ObjectDeserializer::<SingleMetricAggregateBuilder>::new();
    setup_aggregate_base(&mut deserializer);
    deserializer
      .add("value", tri(canonical::<f64>()), |builder: &mut SingleMetricAggregateBuilder, value| {
        builder.value = value;
      })
      .add(
        "value_as_string",
        optional(canonical::<String>()),
        |builder: &mut SingleMetricAggregateBuilder, value| builder.value_as_string = value,
      );
    deserializer
  });

impl JsonDeserialize for SingleMetricAggregate {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    SINGLE_METRIC_AGGREGATE.deserialize(cursor, options)
  }
}

impl SerializeFields for SingleMetricAggregate {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_tri_field(generator, "value", self.value.as_ref().into())?;
    write_optional_field(generator, "value_as_string", self.value_as_string.as_ref())
  }
}

impl JsonSerialize for SingleMetricAggregate {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

/// The approximate count of distinct values.
#[derive(Clone, PartialEq, Debug)]
pub struct CardinalityAggregate {
  base: AggregateBase,
  value: i64,
}

impl CardinalityAggregate {
  /// A builder for this aggregate.
  pub fn builder() -> CardinalityAggregateBuilder {
    CardinalityAggregateBuilder::default()
  }

  /// The fields shared by every aggregate.
  pub fn base(&self) -> &AggregateBase {
    &self.base
  }

  /// The count of distinct values.
  pub fn value(&self) -> i64 {
    self.value
  }
}

/// The builder of a `CardinalityAggregate`.
#[derive(Default, Debug)]
pub struct CardinalityAggregateBuilder {
  base: AggregateBaseBuilder,
  value: Option<i64>,
}

impl AsMut<AggregateBaseBuilder> for CardinalityAggregateBuilder {
  fn as_mut(&mut self) -> &mut AggregateBaseBuilder {
    &mut self.base
  }
}

impl CardinalityAggregateBuilder {
  /// Set the count of distinct values.
  #[must_use]
  pub fn value(mut self, value: i64) -> Self {
    self.value = Some(value);
    self
  }
}

impl ObjectBuilder for CardinalityAggregateBuilder {
  type Value = CardinalityAggregate;
  const NAME: &'static str = "CardinalityAggregate";
  fn build(self) -> Result<CardinalityAggregate> {
    Ok(CardinalityAggregate {
      base: self.base.build(),
      value: require(self.value, Self::NAME, "value")?,
    })
  }
}

static CARDINALITY_AGGREGATE: LazyLock<ObjectDeserializer<CardinalityAggregateBuilder>> =
  LazyLock::new(|| {
    let mut deserializer = ObjectDeserializer::<CardinalityAggregateBuilder>::new();
    setup_aggregate_base(&mut deserializer);
    deserializer.add(
      "value",
      canonical::<i64>(),
      |builder: &mut CardinalityAggregateBuilder, value| builder.value = Some(value),
    );
    deserializer
  });

impl JsonDeserialize for CardinalityAggregate {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    CARDINALITY_AGGREGATE.deserialize(cursor, options)
  }
}

impl SerializeFields for CardinalityAggregate {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_field(generator, "value", &self.value)
  }
}

impl JsonSerialize for CardinalityAggregate {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

use std::sync::LazyLock;

use indexmap::IndexMap;

use typed_json_traits::{
  Cursor, Generator, Result, DecodeOptions, JsonDeserialize, JsonDeserializer, JsonSerialize,
  SerializeFields, ObjectBuilder, ObjectDeserializer, canonical, mapping, optional,
  serialize_object, write_field,
  builder::{require, map_put},
};

use crate::aggregations::{AggregateBase, AggregateBaseBuilder, setup_aggregate_base};

/// Percentiles estimated with a t-digest, keyed by the percent.
#[derive(Clone, PartialEq, Debug)]
pub struct TDigestPercentilesAggregate {
  base: AggregateBase,
  values: IndexMap<String, Option<f64>>,
}

impl TDigestPercentilesAggregate {
  /// A builder for this aggregate.
  pub fn builder() -> TDigestPercentilesAggregateBuilder {
    TDigestPercentilesAggregateBuilder::default()
  }

  /// The fields shared by every aggregate.
  pub fn base(&self) -> &AggregateBase {
    &self.base
  }

  /// The value of each percentile, `None` if there were no values.
  pub fn values(&self) -> &IndexMap<String, Option<f64>> {
    &self.values
  }
}

/// The builder of a `TDigestPercentilesAggregate`.
#[derive(Default, Debug)]
pub struct TDigestPercentilesAggregateBuilder {
  base: AggregateBaseBuilder,
  values: Option<IndexMap<String, Option<f64>>>,
}

impl AsMut<AggregateBaseBuilder> for TDigestPercentilesAggregateBuilder {
  fn as_mut(&mut self) -> &mut AggregateBaseBuilder {
    &mut self.base
  }
}

impl TDigestPercentilesAggregateBuilder {
  /// Add every entry to `values`.
  #[must_use]
  pub fn values(mut self, values: IndexMap<String, Option<f64>>) -> Self {
    for (percent, value) in values {
      map_put(&mut self.values, percent, value);
    }
    self
  }

  /// Add the value of a percentile.
  #[must_use]
  pub fn values_entry(mut self, percent: impl Into<String>, value: Option<f64>) -> Self {
    map_put(&mut self.values, percent, value);
    self
  }
}

impl ObjectBuilder for TDigestPercentilesAggregateBuilder {
  type Value = TDigestPercentilesAggregate;
  const NAME: &'static str = "TDigestPercentilesAggregate";
  fn build(self) -> Result<TDigestPercentilesAggregate> {
    Ok(TDigestPercentilesAggregate {
      base: self.base.build(),
      values: require(self.values, Self::NAME, "values")?,
    })
  }
}

static TDIGEST_PERCENTILES_AGGREGATE: LazyLock<
  ObjectDeserializer<TDigestPercentilesAggregateBuilder>,
> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<TDigestPercentilesAggregateBuilder>::new();
  setup_aggregate_base(&mut deserializer);
  deserializer.add(
    "values",
    mapping(optional(canonical::<f64>())),
    |builder: &mut TDigestPercentilesAggregateBuilder, value| builder.values = Some(value),
  );
  deserializer
});

impl JsonDeserialize for TDigestPercentilesAggregate {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    TDIGEST_PERCENTILES_AGGREGATE.deserialize(cursor, options)
  }
}

impl SerializeFields for TDigestPercentilesAggregate {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_field(generator, "values", &self.values)
  }
}

impl JsonSerialize for TDigestPercentilesAggregate {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

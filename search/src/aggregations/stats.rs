use std::sync::LazyLock;

use typed_json_traits::{
  Cursor, Generator, Result, DecodeOptions, Tri, JsonDeserialize, JsonDeserializer, JsonSerialize,
  SerializeFields, ObjectBuilder, ObjectDeserializer, canonical, optional, tri, serialize_object,
  write_field, write_optional_field, write_tri_field,
  builder::{require, require_tri},
};

use crate::aggregations::{AggregateBase, AggregateBaseBuilder, setup_aggregate_base};

/// Statistics over the values of a field, as of the `stats` and `stats_bucket` aggregations.
///
/// `min`, `max`, and `avg` are `None` when there were no values.
#[derive(Clone, PartialEq, Debug)]
pub struct StatsAggregate {
  base: AggregateBase,
  count: i64,
  min: Option<f64>,
  max: Option<f64>,
  avg: Option<f64>,
  sum: f64,
  min_as_string: Option<String>,
  max_as_string: Option<String>,
  avg_as_string: Option<String>,
  sum_as_string: Option<String>,
}

impl StatsAggregate {
  /// A builder for this aggregate.
  pub fn builder() -> StatsAggregateBuilder {
    StatsAggregateBuilder::default()
  }

  /// The fields shared by every aggregate.
  pub fn base(&self) -> &AggregateBase {
    &self.base
  }

  /// The amount of values.
  pub fn count(&self) -> i64 {
    self.count
  }
  /// The minimum value.
  pub fn min(&self) -> Option<f64> {
    self.min
  }
  /// The maximum value.
  pub fn max(&self) -> Option<f64> {
    self.max
  }
  /// The average value.
  pub fn avg(&self) -> Option<f64> {
    self.avg
  }
  /// The sum of the values.
  pub fn sum(&self) -> f64 {
    self.sum
  }
  /// The minimum value, formatted.
  pub fn min_as_string(&self) -> Option<&str> {
    self.min_as_string.as_deref()
  }
  /// The maximum value, formatted.
  pub fn max_as_string(&self) -> Option<&str> {
    self.max_as_string.as_deref()
  }
  /// The average value, formatted.
  pub fn avg_as_string(&self) -> Option<&str> {
    self.avg_as_string.as_deref()
  }
  /// The sum of the values, formatted.
  pub fn sum_as_string(&self) -> Option<&str> {
    self.sum_as_string.as_deref()
  }
}

/// The builder of a `StatsAggregate`.
#[derive(Default, Debug)]
pub struct StatsAggregateBuilder {
  base: AggregateBaseBuilder,
  count: Option<i64>,
  min: Tri<f64>,
  max: Tri<f64>,
  avg: Tri<f64>,
  sum: Option<f64>,
  min_as_string: Option<String>,
  max_as_string: Option<String>,
  avg_as_string: Option<String>,
  sum_as_string: Option<String>,
}

impl AsMut<AggregateBaseBuilder> for StatsAggregateBuilder {
  fn as_mut(&mut self) -> &mut AggregateBaseBuilder {
    &mut self.base
  }
}
impl AsMut<StatsAggregateBuilder> for StatsAggregateBuilder {
  fn as_mut(&mut self) -> &mut StatsAggregateBuilder {
    self
  }
}

impl StatsAggregateBuilder {
  fn build_stats(self, owner: &'static str) -> Result<StatsAggregate> {
    Ok(StatsAggregate {
      base: self.base.build(),
      count: require(self.count, owner, "count")?,
      min: require_tri(self.min, owner, "min")?,
      max: require_tri(self.max, owner, "max")?,
      avg: require_tri(self.avg, owner, "avg")?,
      sum: require(self.sum, owner, "sum")?,
      min_as_string: self.min_as_string,
      max_as_string: self.max_as_string,
      avg_as_string: self.avg_as_string,
      sum_as_string: self.sum_as_string,
    })
  }
}

/// Setters for the fields of statistics.
pub trait StatsAggregateSetters: Sized + AsMut<StatsAggregateBuilder> {
  /// Set the amount of values.
  #[must_use]
  fn count(mut self, count: i64) -> Self {
    self.as_mut().count = Some(count);
    self
  }
  /// Set the minimum value, which is required yet may be `None`.
  #[must_use]
  fn min(mut self, min: Option<f64>) -> Self {
    self.as_mut().min = min.into();
    self
  }
  /// Set the maximum value, which is required yet may be `None`.
  #[must_use]
  fn max(mut self, max: Option<f64>) -> Self {
    self.as_mut().max = max.into();
    self
  }
  /// Set the average value, which is required yet may be `None`.
  #[must_use]
  fn avg(mut self, avg: Option<f64>) -> Self {
    self.as_mut().avg = avg.into();
    self
  }
  /// Set the sum of the values.
  #[must_use]
  fn sum(mut self, sum: f64) -> Self {
    self.as_mut().sum = Some(sum);
    self
  }
  /// Set the minimum value, formatted.
  #[must_use]
  fn min_as_string(mut self, value: impl Into<String>) -> Self {
    self.as_mut().min_as_string = Some(value.into());
    self
  }
  /// Set the maximum value, formatted.
  #[must_use]
  fn max_as_string(mut self, value: impl Into<String>) -> Self {
    self.as_mut().max_as_string = Some(value.into());
    self
  }
  /// Set the average value, formatted.
  #[must_use]
  fn avg_as_string(mut self, value: impl Into<String>) -> Self {
    self.as_mut().avg_as_string = Some(value.into());
    self
  }
  /// Set the sum of the values, formatted.
  #[must_use]
  fn sum_as_string(mut self, value: impl Into<String>) -> Self {
    self.as_mut().sum_as_string = Some(value.into());
    self
  }
}
impl<B: AsMut<StatsAggregateBuilder>> StatsAggregateSetters for B {}

impl ObjectBuilder for StatsAggregateBuilder {
  type Value = StatsAggregate;
  const NAME: &'static str = "StatsAggregate";
  fn build(self) -> Result<StatsAggregate> {
    self.build_stats(Self::NAME)
  }
}

fn stats<B: AsMut<StatsAggregateBuilder>>(builder: &mut B) -> &mut StatsAggregateBuilder {
  builder.as_mut()
}

fn setup_stats<B>(deserializer: &mut ObjectDeserializer<B>)
where
  B: 'static + ObjectBuilder + AsMut<AggregateBaseBuilder> + AsMut<StatsAggregateBuilder>,
{
  setup_aggregate_base(deserializer);
  deserializer
    .add("count", canonical::<i64>(), |builder: &mut B, value| stats(builder).count = Some(value))
    .add("min", tri(canonical::<f64>()), |builder: &mut B, value| stats(builder).min = value)
    .add("max", tri(canonical::<f64>()), |builder: &mut B, value| stats(builder).max = value)
    .add("avg", tri(canonical::<f64>()), |builder: &mut B, value| stats(builder).avg = value)
    .add("sum", canonical::<f64>(), |builder: &mut B, value| stats(builder).sum = Some(value))
    .add("min_as_string", optional(canonical::<String>()), |builder: &mut B, value| {
      stats(builder).min_as_string = value;
    })
    .add("max_as_string", optional(canonical::<String>()), |builder: &mut B, value| {
      stats(builder).max_as_string = value;
    })
    .add("avg_as_string", optional(canonical::<String>()), |builder: &mut B, value| {
      stats(builder).avg_as_string = value;
    })
    .add("sum_as_string", optional(canonical::<String>()), |builder: &mut B, value| {
      stats(builder).sum_as_string = value;
    });
}

static STATS_AGGREGATE: LazyLock<ObjectDeserializer<StatsAggregateBuilder>> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<StatsAggregateBuilder>::new();
  setup_stats(&mut deserializer);
  deserializer
});

impl JsonDeserialize for StatsAggregate {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    STATS_AGGREGATE.deserialize(cursor, options)
  }
}

impl SerializeFields for StatsAggregate {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_field(generator, "count", &self.count)?;
    write_tri_field(generator, "min", self.min.as_ref().into())?;
    write_tri_field(generator, "max", self.max.as_ref().into())?;
    write_tri_field(generator, "avg", self.avg.as_ref().into())?;
    write_field(generator, "sum", &self.sum)?;
    write_optional_field(generator, "min_as_string", self.min_as_string.as_ref())?;
    write_optional_field(generator, "max_as_string", self.max_as_string.as_ref())?;
    write_optional_field(generator, "avg_as_string", self.avg_as_string.as_ref())?;
    write_optional_field(generator, "sum_as_string", self.sum_as_string.as_ref())
  }
}

impl JsonSerialize for StatsAggregate {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

/// The bounds of the standard deviation around the average.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct StandardDeviationBounds {
  upper: Option<f64>,
  lower: Option<f64>,
}

impl StandardDeviationBounds {
  /// A builder for these bounds.
  pub fn builder() -> StandardDeviationBoundsBuilder {
    StandardDeviationBoundsBuilder::default()
  }

  /// The upper bound.
  pub fn upper(&self) -> Option<f64> {
    self.upper
  }
  /// The lower bound.
  pub fn lower(&self) -> Option<f64> {
    self.lower
  }
}

/// The builder of `StandardDeviationBounds`.
#[derive(Default, Debug)]
pub struct StandardDeviationBoundsBuilder {
  upper: Tri<f64>,
  lower: Tri<f64>,
}

impl StandardDeviationBoundsBuilder {
  /// Set the upper bound, which is required yet may be `None`.
  #[must_use]
  pub fn upper(mut self, upper: Option<f64>) -> Self {
    self.upper = upper.into();
    self
  }
  /// Set the lower bound, which is required yet may be `None`.
  #[must_use]
  pub fn lower(mut self, lower: Option<f64>) -> Self {
    self.lower = lower.into();
    self
  }
}

impl ObjectBuilder for StandardDeviationBoundsBuilder {
  type Value = StandardDeviationBounds;
  const NAME: &'static str = "StandardDeviationBounds";
  fn build(self) -> Result<StandardDeviationBounds> {
    Ok(StandardDeviationBounds {
      upper: require_tri(self.upper, Self::NAME, "upper")?,
      lower: require_tri(self.lower, Self::NAME, "lower")?,
    })
  }
}

static STANDARD_DEVIATION_BOUNDS: LazyLock<ObjectDeserializer<StandardDeviationBoundsBuilder>> =
  LazyLock::new(|| {
    let mut deserializer = ObjectDeserializer::<StandardDeviationBoundsBuilder>::new();
    deserializer
      .add("upper", tri(canonical::<f64>()), |builder: &mut StandardDeviationBoundsBuilder, value| {
        builder.upper = value;
      })
      .add("lower", tri(canonical::<f64>()), |builder: &mut StandardDeviationBoundsBuilder, value| {
        builder.lower = value;
      });
    deserializer
  });

impl JsonDeserialize for StandardDeviationBounds {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    STANDARD_DEVIATION_BOUNDS.deserialize(cursor, options)
  }
}

impl SerializeFields for StandardDeviationBounds {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    write_tri_field(generator, "upper", self.upper.as_ref().into())?;
    write_tri_field(generator, "lower", self.lower.as_ref().into())
  }
}

impl JsonSerialize for StandardDeviationBounds {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

/// Statistics extending `StatsAggregate` with the variance, as of the `extended_stats` and
/// `extended_stats_bucket` aggregations.
#[derive(Clone, PartialEq, Debug)]
pub struct ExtendedStatsAggregate {
  stats: StatsAggregate,
  sum_of_squares: Option<f64>,
  variance: Option<f64>,
  std_deviation: Option<f64>,
  std_deviation_bounds: Option<StandardDeviationBounds>,
}

impl ExtendedStatsAggregate {
  /// A builder for this aggregate.
  pub fn builder() -> ExtendedStatsAggregateBuilder {
    ExtendedStatsAggregateBuilder::default()
  }

  /// The statistics this extends.
  pub fn stats(&self) -> &StatsAggregate {
    &self.stats
  }
  /// The sum of the squares of the values.
  pub fn sum_of_squares(&self) -> Option<f64> {
    self.sum_of_squares
  }
  /// The variance of the values.
  pub fn variance(&self) -> Option<f64> {
    self.variance
  }
  /// The standard deviation of the values.
  pub fn std_deviation(&self) -> Option<f64> {
    self.std_deviation
  }
  /// The bounds of the standard deviation around the average.
  pub fn std_deviation_bounds(&self) -> Option<&StandardDeviationBounds> {
    self.std_deviation_bounds.as_ref()
  }
}

/// The builder of an `ExtendedStatsAggregate`.
#[derive(Default, Debug)]
pub struct ExtendedStatsAggregateBuilder {
  stats: StatsAggregateBuilder,
  sum_of_squares: Tri<f64>,
  variance: Tri<f64>,
  std_deviation: Tri<f64>,
  std_deviation_bounds: Option<StandardDeviationBounds>,
}

impl AsMut<AggregateBaseBuilder> for ExtendedStatsAggregateBuilder {
  fn as_mut(&mut self) -> &mut AggregateBaseBuilder {
    &mut self.stats.base
  }
}
impl AsMut<StatsAggregateBuilder> for ExtendedStatsAggregateBuilder {
  fn as_mut(&mut self) -> &mut StatsAggregateBuilder {
    &mut self.stats
  }
}

impl ExtendedStatsAggregateBuilder {
  /// Set the sum of the squares of the values, which is required yet may be `None`.
  #[must_use]
  pub fn sum_of_squares(mut self, sum_of_squares: Option<f64>) -> Self {
    self.sum_of_squares = sum_of_squares.into();
    self
  }
  /// Set the variance of the values, which is required yet may be `None`.
  #[must_use]
  pub fn variance(mut self, variance: Option<f64>) -> Self {
    self.variance = variance.into();
    self
  }
  /// Set the standard deviation of the values, which is required yet may be `None`.
  #[must_use]
  pub fn std_deviation(mut self, std_deviation: Option<f64>) -> Self {
    self.std_deviation = std_deviation.into();
    self
  }
  /// Set the bounds of the standard deviation, as built by `bounds`.
  pub fn std_deviation_bounds(
    mut self,
    bounds: impl FnOnce(StandardDeviationBoundsBuilder) -> Result<StandardDeviationBounds>,
  ) -> Result<Self> {
    self.std_deviation_bounds = Some(bounds(StandardDeviationBounds::builder())?);
    Ok(self)
  }
}

impl ObjectBuilder for ExtendedStatsAggregateBuilder {
  type Value = ExtendedStatsAggregate;
  const NAME: &'static str = "ExtendedStatsAggregate";
  fn build(self) -> Result<ExtendedStatsAggregate> {
    Ok(ExtendedStatsAggregate {
      stats: self.stats.build_stats(Self::NAME)?,
      sum_of_squares: require_tri(self.sum_of_squares, Self::NAME, "sum_of_squares")?,
      variance: require_tri(self.variance, Self::NAME, "variance")?,
      std_deviation: require_tri(self.std_deviation, Self::NAME, "std_deviation")?,
      std_deviation_bounds: self.std_deviation_bounds,
    })
  }
}

static EXTENDED_STATS_AGGREGATE: LazyLock<ObjectDeserializer<ExtendedStatsAggregateBuilder>> =
  LazyLock::new(|| {
    let mut deserializer = ObjectDeserializer::<ExtendedStatsAggregateBuilder>::new();
    setup_stats(&mut deserializer);
    deserializer
      .add(
        "sum_of_squares",
        tri(canonical::<f64>()),
        |builder: &mut ExtendedStatsAggregateBuilder, value| builder.sum_of_squares = value,
      )
      .add(
        "variance",
        tri(canonical::<f64>()),
        |builder: &mut ExtendedStatsAggregateBuilder, value| builder.variance = value,
      )
      .add(
        "std_deviation",
        tri(canonical::<f64>()),
        |builder: &mut ExtendedStatsAggregateBuilder, value| builder.std_deviation = value,
      )
      .add(
        "std_deviation_bounds",
        canonical::<StandardDeviationBounds>(),
        |builder: &mut ExtendedStatsAggregateBuilder, value| {
          builder.std_deviation_bounds = Some(value);
        },
      );
    deserializer
  });

impl JsonDeserialize for ExtendedStatsAggregate {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    EXTENDED_STATS_AGGREGATE.deserialize(cursor, options)
  }
}

impl SerializeFields for ExtendedStatsAggregate {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.stats.serialize_fields(generator)?;
    write_tri_field(generator, "sum_of_squares", self.sum_of_squares.as_ref().into())?;
    write_tri_field(generator, "variance", self.variance.as_ref().into())?;
    write_tri_field(generator, "std_deviation", self.std_deviation.as_ref().into())?;
    write_optional_field(generator, "std_deviation_bounds", self.std_deviation_bounds.as_ref())
  }
}

impl JsonSerialize for ExtendedStatsAggregate {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

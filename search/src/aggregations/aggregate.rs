use std::sync::LazyLock;

use typed_json_traits::{
  Cursor, Generator, Result, DecodeOptions, JsonDeserialize, JsonDeserializer, JsonSerialize,
  SerializeFields, canonical,
  union::{
    VariantKind, TaggedUnion, VariantTable, SingleKeyDeserializer, TypedKeysDeserializer,
    serialize_single_key,
  },
};

use crate::aggregations::{
  SingleMetricAggregate, CardinalityAggregate, StatsAggregate, ExtendedStatsAggregate,
  TDigestPercentilesAggregate, StringTermsAggregate, LongTermsAggregate, NestedAggregate,
  FilterAggregate, GlobalAggregate,
};

/// The kind of an aggregate.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum AggregateKind {
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
  /// `weighted_avg`
  WeightedAvg,
  /// `cardinality`
  Cardinality,
  /// `stats`
  Stats,
  /// `stats_bucket`
  StatsBucket,
  /// `extended_stats`
  ExtendedStats,
  /// `extended_stats_bucket`
  ExtendedStatsBucket,
  /// `tdigest_percentiles`
  TDigestPercentiles,
  /// `sterms`
  StringTerms,
  /// `lterms`
  LongTerms,
  /// `nested`
  Nested,
  /// `filter`
  Filter,
  /// `global`
  Global,
}

impl VariantKind for AggregateKind {
  fn tag(self) -> &'static str {
    match self {
      AggregateKind::Avg => "avg",
      AggregateKind::Min => "min",
      AggregateKind::Max => "max",
      AggregateKind::Sum => "sum",
      AggregateKind::ValueCount => "value_count",
      AggregateKind::WeightedAvg => "weighted_avg",
      AggregateKind::Cardinality => "cardinality",
      AggregateKind::Stats => "stats",
      AggregateKind::StatsBucket => "stats_bucket",
      AggregateKind::ExtendedStats => "extended_stats",
      AggregateKind::ExtendedStatsBucket => "extended_stats_bucket",
      AggregateKind::TDigestPercentiles => "tdigest_percentiles",
      AggregateKind::StringTerms => "sterms",
      AggregateKind::LongTerms => "lterms",
      AggregateKind::Nested => "nested",
      AggregateKind::Filter => "filter",
      AggregateKind::Global => "global",
    }
  }
}

/// The result of an aggregation, one of many shapes.
///
/// On the wire, an aggregate is either an object with its kind as the single key
/// (`{"avg": {"value": 1.0}}`), or an entry of a map keyed `<kind>#<name>`.
#[derive(Clone, PartialEq, Debug)]
pub enum Aggregate {
  /// The average of a field.
  Avg(SingleMetricAggregate),
  /// The minimum of a field.
  Min(SingleMetricAggregate),
  /// The maximum of a field.
  Max(SingleMetricAggregate),
  /// The sum of a field.
  Sum(SingleMetricAggregate),
  /// The amount of values of a field.
  ValueCount(SingleMetricAggregate),
  /// The weighted average of a field.
  WeightedAvg(SingleMetricAggregate),
  /// The approximate count of distinct values.
  Cardinality(CardinalityAggregate),
  /// Statistics over a field.
  Stats(StatsAggregate),
  /// Statistics over the buckets of a sibling aggregation.
  StatsBucket(StatsAggregate),
  /// Extended statistics over a field.
  ExtendedStats(ExtendedStatsAggregate),
  /// Extended statistics over the buckets of a sibling aggregation.
  ExtendedStatsBucket(ExtendedStatsAggregate),
  /// Percentiles estimated with a t-digest.
  TDigestPercentiles(TDigestPercentilesAggregate),
  /// The most frequent strings.
  StringTerms(StringTermsAggregate),
  /// The most frequent integers.
  LongTerms(LongTermsAggregate),
  /// The documents nested under a path.
  Nested(NestedAggregate),
  /// The documents matching a filter.
  Filter(FilterAggregate),
  /// Every document of the searched indices.
  Global(GlobalAggregate),
}

impl Aggregate {
  /// The deserializer of a map of aggregates keyed `<kind>#<name>`.
  pub fn typed_keys_deserializer() -> &'static TypedKeysDeserializer<Aggregate> {
    &AGGREGATE_TYPED_KEYS
  }

  /// If this is an `avg` aggregate.
  pub fn is_avg(&self) -> bool {
    matches!(self, Aggregate::Avg(_))
  }
  /// This as an `avg` aggregate, if it is one.
  pub fn as_avg(&self) -> Option<&SingleMetricAggregate> {
    match self {
      Aggregate::Avg(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `min` aggregate.
  pub fn is_min(&self) -> bool {
    matches!(self, Aggregate::Min(_))
  }
  /// This as a `min` aggregate, if it is one.
  pub fn as_min(&self) -> Option<&SingleMetricAggregate> {
    match self {
      Aggregate::Min(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `max` aggregate.
  pub fn is_max(&self) -> bool {
    matches!(self, Aggregate::Max(_))
  }
  /// This as a `max` aggregate, if it is one.
  pub fn as_max(&self) -> Option<&SingleMetricAggregate> {
    match self {
      Aggregate::Max(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `sum` aggregate.
  pub fn is_sum(&self) -> bool {
    matches!(self, Aggregate::Sum(_))
  }
  /// This as a `sum` aggregate, if it is one.
  pub fn as_sum(&self) -> Option<&SingleMetricAggregate> {
    match self {
      Aggregate::Sum(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `value_count` aggregate.
  pub fn is_value_count(&self) -> bool {
    matches!(self, Aggregate::ValueCount(_))
  }
  /// This as a `value_count` aggregate, if it is one.
  pub fn as_value_count(&self) -> Option<&SingleMetricAggregate> {
    match self {
      Aggregate::ValueCount(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `weighted_avg` aggregate.
  pub fn is_weighted_avg(&self) -> bool {
    matches!(self, Aggregate::WeightedAvg(_))
  }
  /// This as a `weighted_avg` aggregate, if it is one.
  pub fn as_weighted_avg(&self) -> Option<&SingleMetricAggregate> {
    match self {
      Aggregate::WeightedAvg(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `cardinality` aggregate.
  pub fn is_cardinality(&self) -> bool {
    matches!(self, Aggregate::Cardinality(_))
  }
  /// This as a `cardinality` aggregate, if it is one.
  pub fn as_cardinality(&self) -> Option<&CardinalityAggregate> {
    match self {
      Aggregate::Cardinality(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `stats` aggregate.
  pub fn is_stats(&self) -> bool {
    matches!(self, Aggregate::Stats(_))
  }
  /// This as a `stats` aggregate, if it is one.
  pub fn as_stats(&self) -> Option<&StatsAggregate> {
    match self {
      Aggregate::Stats(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `stats_bucket` aggregate.
  pub fn is_stats_bucket(&self) -> bool {
    matches!(self, Aggregate::StatsBucket(_))
  }
  /// This as a `stats_bucket` aggregate, if it is one.
  pub fn as_stats_bucket(&self) -> Option<&StatsAggregate> {
    match self {
      Aggregate::StatsBucket(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is an `extended_stats` aggregate.
  pub fn is_extended_stats(&self) -> bool {
    matches!(self, Aggregate::ExtendedStats(_))
  }
  /// This as an `extended_stats` aggregate, if it is one.
  pub fn as_extended_stats(&self) -> Option<&ExtendedStatsAggregate> {
    match self {
      Aggregate::ExtendedStats(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is an `extended_stats_bucket` aggregate.
  pub fn is_extended_stats_bucket(&self) -> bool {
    matches!(self, Aggregate::ExtendedStatsBucket(_))
  }
  /// This as an `extended_stats_bucket` aggregate, if it is one.
  pub fn as_extended_stats_bucket(&self) -> Option<&ExtendedStatsAggregate> {
    match self {
      Aggregate::ExtendedStatsBucket(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `tdigest_percentiles` aggregate.
  pub fn is_tdigest_percentiles(&self) -> bool {
    matches!(self, Aggregate::TDigestPercentiles(_))
  }
  /// This as a `tdigest_percentiles` aggregate, if it is one.
  pub fn as_tdigest_percentiles(&self) -> Option<&TDigestPercentilesAggregate> {
    match self {
      Aggregate::TDigestPercentiles(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `sterms` aggregate.
  pub fn is_string_terms(&self) -> bool {
    matches!(self, Aggregate::StringTerms(_))
  }
  /// This as a `sterms` aggregate, if it is one.
  pub fn as_string_terms(&self) -> Option<&StringTermsAggregate> {
    match self {
      Aggregate::StringTerms(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `lterms` aggregate.
  pub fn is_long_terms(&self) -> bool {
    matches!(self, Aggregate::LongTerms(_))
  }
  /// This as a `lterms` aggregate, if it is one.
  pub fn as_long_terms(&self) -> Option<&LongTermsAggregate> {
    match self {
      Aggregate::LongTerms(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `nested` aggregate.
  pub fn is_nested(&self) -> bool {
    matches!(self, Aggregate::Nested(_))
  }
  /// This as a `nested` aggregate, if it is one.
  pub fn as_nested(&self) -> Option<&NestedAggregate> {
    match self {
      Aggregate::Nested(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `filter` aggregate.
  pub fn is_filter(&self) -> bool {
    matches!(self, Aggregate::Filter(_))
  }
  /// This as a `filter` aggregate, if it is one.
  pub fn as_filter(&self) -> Option<&FilterAggregate> {
    match self {
      Aggregate::Filter(aggregate) => Some(aggregate),
      _ => None,
    }
  }

  /// If this is a `global` aggregate.
  pub fn is_global(&self) -> bool {
    matches!(self, Aggregate::Global(_))
  }
  /// This as a `global` aggregate, if it is one.
  pub fn as_global(&self) -> Option<&GlobalAggregate> {
    match self {
      Aggregate::Global(aggregate) => Some(aggregate),
      _ => None,
    }
  }
}

impl TaggedUnion for Aggregate {
  const NAME: &'static str = "Aggregate";
  type Kind = AggregateKind;

  fn kind(&self) -> AggregateKind {
    match self {
      Aggregate::Avg(_) => AggregateKind::Avg,
      Aggregate::Min(_) => AggregateKind::Min,
      Aggregate::Max(_) => AggregateKind::Max,
      Aggregate::Sum(_) => AggregateKind::Sum,
      Aggregate::ValueCount(_) => AggregateKind::ValueCount,
      Aggregate::WeightedAvg(_) => AggregateKind::WeightedAvg,
      Aggregate::Cardinality(_) => AggregateKind::Cardinality,
      Aggregate::Stats(_) => AggregateKind::Stats,
      Aggregate::StatsBucket(_) => AggregateKind::StatsBucket,
      Aggregate::ExtendedStats(_) => AggregateKind::ExtendedStats,
      Aggregate::ExtendedStatsBucket(_) => AggregateKind::ExtendedStatsBucket,
      Aggregate::TDigestPercentiles(_) => AggregateKind::TDigestPercentiles,
      Aggregate::StringTerms(_) => AggregateKind::StringTerms,
      Aggregate::LongTerms(_) => AggregateKind::LongTerms,
      Aggregate::Nested(_) => AggregateKind::Nested,
      Aggregate::Filter(_) => AggregateKind::Filter,
      Aggregate::Global(_) => AggregateKind::Global,
    }
  }

  fn variant(&self) -> &dyn SerializeFields {
    match self {
      Aggregate::Avg(aggregate) |
      Aggregate::Min(aggregate) |
      Aggregate::Max(aggregate) |
      Aggregate::Sum(aggregate) |
      Aggregate::ValueCount(aggregate) |
      Aggregate::WeightedAvg(aggregate) => aggregate,
      Aggregate::Cardinality(aggregate) => aggregate,
      Aggregate::Stats(aggregate) | Aggregate::StatsBucket(aggregate) => aggregate,
      Aggregate::ExtendedStats(aggregate) | Aggregate::ExtendedStatsBucket(aggregate) => aggregate,
      Aggregate::TDigestPercentiles(aggregate) => aggregate,
      Aggregate::StringTerms(aggregate) => aggregate,
      Aggregate::LongTerms(aggregate) => aggregate,
      Aggregate::Nested(aggregate) |
      Aggregate::Filter(aggregate) |
      Aggregate::Global(aggregate) => aggregate,
    }
  }
}

pub(crate) static AGGREGATE_VARIANTS: LazyLock<VariantTable<Aggregate>> = LazyLock::new(|| {
  let mut variants = VariantTable::new();
  variants
    .add("avg", canonical::<SingleMetricAggregate>(), Aggregate::Avg)
    .add("min", canonical::<SingleMetricAggregate>(), Aggregate::Min)
    .add("max", canonical::<SingleMetricAggregate>(), Aggregate::Max)
    .add("sum", canonical::<SingleMetricAggregate>(), Aggregate::Sum)
    .add("value_count", canonical::<SingleMetricAggregate>(), Aggregate::ValueCount)
    .add("weighted_avg", canonical::<SingleMetricAggregate>(), Aggregate::WeightedAvg)
    .add("cardinality", canonical::<CardinalityAggregate>(), Aggregate::Cardinality)
    .add("stats", canonical::<StatsAggregate>(), Aggregate::Stats)
    .add("stats_bucket", canonical::<StatsAggregate>(), Aggregate::StatsBucket)
    .add("extended_stats", canonical::<ExtendedStatsAggregate>(), Aggregate::ExtendedStats)
    .add(
      "extended_stats_bucket",
      canonical::<ExtendedStatsAggregate>(),
      Aggregate::ExtendedStatsBucket,
    )
    .add(
      "tdigest_percentiles",
      canonical::<TDigestPercentilesAggregate>(),
      Aggregate::TDigestPercentiles,
    )
    .add("sterms", canonical::<StringTermsAggregate>(), Aggregate::StringTerms)
    .add("lterms", canonical::<LongTermsAggregate>(), Aggregate::LongTerms)
    .add("nested", canonical::<NestedAggregate>(), Aggregate::Nested)
    .add("filter", canonical::<FilterAggregate>(), Aggregate::Filter)
    .add("global", canonical::<GlobalAggregate>(), Aggregate::Global);
  variants
});

static AGGREGATE: SingleKeyDeserializer<Aggregate> =
  SingleKeyDeserializer::new(|| &*AGGREGATE_VARIANTS);
static AGGREGATE_TYPED_KEYS: TypedKeysDeserializer<Aggregate> =
  TypedKeysDeserializer::new(|| &*AGGREGATE_VARIANTS);

impl JsonDeserialize for Aggregate {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    AGGREGATE.deserialize(cursor, options)
  }
}

impl JsonSerialize for Aggregate {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_single_key(self, generator)
  }
}

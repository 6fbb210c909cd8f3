use std::sync::LazyLock;

use indexmap::IndexMap;

use typed_json_traits::{
  Cursor, Generator, Result, DecodeOptions, JsonDeserialize, JsonDeserializer, JsonSerialize,
  SerializeFields, ObjectBuilder, ObjectDeserializer, canonical, serialize_object, write_field,
  builder::{require, map_put},
  union::serialize_typed_key_entries,
};

use crate::aggregations::{
  Aggregate, AggregateBase, AggregateBaseBuilder, setup_aggregate_base,
  aggregate::AGGREGATE_VARIANTS,
};

/// The builder of the fields every bucket has.
#[derive(Default, Debug)]
pub struct BucketBuilder {
  doc_count: Option<i64>,
  aggregations: Option<IndexMap<String, Aggregate>>,
}

impl BucketBuilder {
  pub(crate) fn build(self, owner: &'static str) -> Result<(i64, IndexMap<String, Aggregate>)> {
    Ok((require(self.doc_count, owner, "doc_count")?, self.aggregations.unwrap_or_default()))
  }
}

/// Setters for the fields every bucket has.
pub trait BucketSetters: Sized + AsMut<BucketBuilder> {
  /// Set the amount of documents within the bucket.
  #[must_use]
  fn doc_count(mut self, doc_count: i64) -> Self {
    self.as_mut().doc_count = Some(doc_count);
    self
  }

  /// Add every entry to the sub-aggregations.
  #[must_use]
  fn aggregations(mut self, aggregations: IndexMap<String, Aggregate>) -> Self {
    for (name, aggregate) in aggregations {
      map_put(&mut self.as_mut().aggregations, name, aggregate);
    }
    self
  }

  /// Add a sub-aggregation.
  #[must_use]
  fn aggregations_entry(mut self, name: impl Into<String>, aggregate: Aggregate) -> Self {
    map_put(&mut self.as_mut().aggregations, name, aggregate);
    self
  }
}
impl<B: AsMut<BucketBuilder>> BucketSetters for B {}

/*
  Sub-aggregations are fields of the bucket itself, keyed `kind#name`. As their names are
  arbitrary, they can't be registered, and are instead picked up by the unknown-field handler.
*/
pub(crate) fn setup_bucket<B: 'static + ObjectBuilder + AsMut<BucketBuilder>>(
  deserializer: &mut ObjectDeserializer<B>,
) {
  deserializer
    .add("doc_count", canonical::<i64>(), |builder: &mut B, value| {
      builder.as_mut().doc_count = Some(value);
    })
    .set_unknown_field_handler(|builder: &mut B, key, cursor, options| {
      if !key.contains('#') {
        return Ok(false);
      }
      let (name, aggregate) = AGGREGATE_VARIANTS.deserialize_typed_key(key, cursor, options)?;
      map_put(&mut builder.as_mut().aggregations, name, aggregate);
      Ok(true)
    });
}

pub(crate) fn serialize_bucket_fields(
  doc_count: i64,
  aggregations: &IndexMap<String, Aggregate>,
  generator: &mut dyn Generator,
) -> Result<()> {
  write_field(generator, "doc_count", &doc_count)?;
  serialize_typed_key_entries(aggregations, generator)
}

/// An aggregate of a single bucket of documents, as of the `nested`, `filter`, and `global`
/// aggregations.
#[derive(Clone, PartialEq, Debug)]
pub struct SingleBucketAggregate {
  base: AggregateBase,
  doc_count: i64,
  aggregations: IndexMap<String, Aggregate>,
}

impl SingleBucketAggregate {
  /// A builder for this aggregate.
  pub fn builder() -> SingleBucketAggregateBuilder {
    SingleBucketAggregateBuilder::default()
  }

  /// The fields shared by every aggregate.
  pub fn base(&self) -> &AggregateBase {
    &self.base
  }

  /// The amount of documents within the bucket.
  pub fn doc_count(&self) -> i64 {
    self.doc_count
  }

  /// The aggregates of the documents within the bucket.
  pub fn aggregations(&self) -> &IndexMap<String, Aggregate> {
    &self.aggregations
  }
}

/// The documents nested under a path.
pub type NestedAggregate = SingleBucketAggregate;
/// The documents matching a filter.
pub type FilterAggregate = SingleBucketAggregate;
/// Every document of the searched indices, regardless of the query.
pub type GlobalAggregate = SingleBucketAggregate;

/// The builder of a `SingleBucketAggregate`.
#[derive(Default, Debug)]
pub struct SingleBucketAggregateBuilder {
  base: AggregateBaseBuilder,
  bucket: BucketBuilder,
}

impl AsMut<AggregateBaseBuilder> for SingleBucketAggregateBuilder {
  fn as_mut(&mut self) -> &mut AggregateBaseBuilder {
    &mut self.base
  }
}
impl AsMut<BucketBuilder> for SingleBucketAggregateBuilder {
  fn as_mut(&mut self) -> &mut BucketBuilder {
    &mut self.bucket
  }
}

impl ObjectBuilder for SingleBucketAggregateBuilder {
  type Value = SingleBucketAggregate;
  const NAME: &'static str = "SingleBucketAggregate";
  fn build(self) -> Result<SingleBucketAggregate> {
    let (doc_count, aggregations) = self.bucket.build(Self::NAME)?;
    Ok(SingleBucketAggregate { base: self.base.build(), doc_count, aggregations })
  }
}

static SINGLE_BUCKET_AGGREGATE: LazyLock<ObjectDeserializer<SingleBucketAggregateBuilder>> =
  LazyLock::new(|| {
    let mut deserializer = ObjectDeserializer::<SingleBucketAggregateBuilder>::new();
    setup_aggregate_base(&mut deserializer);
    setup_bucket(&mut deserializer);
    deserializer
  });

impl JsonDeserialize for SingleBucketAggregate {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    SINGLE_BUCKET_AGGREGATE.deserialize(cursor, options)
  }
}

impl SerializeFields for SingleBucketAggregate {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    serialize_bucket_fields(self.doc_count, &self.aggregations, generator)
  }
}

impl JsonSerialize for SingleBucketAggregate {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

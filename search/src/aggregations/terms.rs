use std::sync::LazyLock;

use indexmap::IndexMap;

use typed_json_traits::{
  Cursor, Generator, Result, DecodeOptions, JsonDeserialize, JsonDeserializer, JsonSerialize,
  SerializeFields, ObjectBuilder, ObjectDeserializer, canonical, optional, sequence,
  serialize_object, write_field, write_optional_field,
  builder::{require, list_add, list_add_all},
};

use crate::aggregations::{
  Aggregate, AggregateBase, AggregateBaseBuilder, setup_aggregate_base,
  bucket::{BucketBuilder, setup_bucket, serialize_bucket_fields},
};

/// A bucket of a terms aggregation.
pub trait TermsBucket: 'static + Send + Sync + JsonDeserialize + JsonSerialize {
  /// The name of the terms aggregate with buckets of this type.
  const AGGREGATE_NAME: &'static str;

  #[doc(hidden)]
  fn aggregate_deserializer() -> &'static ObjectDeserializer<TermsAggregateBuilder<Self>>;
}

/// The buckets of the most frequent terms of a field.
///
/// The buckets are ordered as requested, by default by descending `doc_count`.
#[derive(Clone, PartialEq, Debug)]
pub struct TermsAggregate<Bk> {
  base: AggregateBase,
  doc_count_error_upper_bound: Option<i64>,
  sum_other_doc_count: Option<i64>,
  buckets: Vec<Bk>,
}

/// The buckets of the most frequent strings.
pub type StringTermsAggregate = TermsAggregate<StringTermsBucket>;
/// The buckets of the most frequent integers.
pub type LongTermsAggregate = TermsAggregate<LongTermsBucket>;

impl<Bk: TermsBucket> TermsAggregate<Bk> {
  /// A builder for this aggregate.
  pub fn builder() -> TermsAggregateBuilder<Bk> {
    TermsAggregateBuilder::default()
  }

  /// The fields shared by every aggregate.
  pub fn base(&self) -> &AggregateBase {
    &self.base
  }

  /// The upper bound of the error of each `doc_count`.
  pub fn doc_count_error_upper_bound(&self) -> Option<i64> {
    self.doc_count_error_upper_bound
  }

  /// The amount of documents not within any bucket.
  pub fn sum_other_doc_count(&self) -> Option<i64> {
    self.sum_other_doc_count
  }

  /// The buckets.
  pub fn buckets(&self) -> &[Bk] {
    &self.buckets
  }
}

/// The builder of a `TermsAggregate`.
#[derive(Debug)]
pub struct TermsAggregateBuilder<Bk> {
  base: AggregateBaseBuilder,
  doc_count_error_upper_bound: Option<i64>,
  sum_other_doc_count: Option<i64>,
  buckets: Option<Vec<Bk>>,
}

impl<Bk> Default for TermsAggregateBuilder<Bk> {
  fn default() -> Self {
    TermsAggregateBuilder {
      base: AggregateBaseBuilder::default(),
      doc_count_error_upper_bound: None,
      sum_other_doc_count: None,
      buckets: None,
    }
  }
}

impl<Bk> AsMut<AggregateBaseBuilder> for TermsAggregateBuilder<Bk> {
  fn as_mut(&mut self) -> &mut AggregateBaseBuilder {
    &mut self.base
  }
}

impl<Bk: TermsBucket> TermsAggregateBuilder<Bk> {
  /// Set the upper bound of the error of each `doc_count`.
  #[must_use]
  pub fn doc_count_error_upper_bound(mut self, doc_count_error_upper_bound: i64) -> Self {
    self.doc_count_error_upper_bound = Some(doc_count_error_upper_bound);
    self
  }

  /// Set the amount of documents not within any bucket.
  #[must_use]
  pub fn sum_other_doc_count(mut self, sum_other_doc_count: i64) -> Self {
    self.sum_other_doc_count = Some(sum_other_doc_count);
    self
  }

  /// Add every bucket.
  #[must_use]
  pub fn buckets(mut self, buckets: impl IntoIterator<Item = Bk>) -> Self {
    list_add_all(&mut self.buckets, buckets);
    self
  }

  /// Add a bucket.
  #[must_use]
  pub fn add_bucket(mut self, bucket: Bk) -> Self {
    list_add(&mut self.buckets, bucket);
    self
  }
}

impl<Bk: TermsBucket> ObjectBuilder for TermsAggregateBuilder<Bk> {
  type Value = TermsAggregate<Bk>;
  const NAME: &'static str = Bk::AGGREGATE_NAME;
  fn build(self) -> Result<TermsAggregate<Bk>> {
    Ok(TermsAggregate {
      base: self.base.build(),
      doc_count_error_upper_bound: self.doc_count_error_upper_bound,
      sum_other_doc_count: self.sum_other_doc_count,
      buckets: require(self.buckets, Self::NAME, "buckets")?,
    })
  }
}

fn terms_aggregate_deserializer<Bk: TermsBucket>() -> ObjectDeserializer<TermsAggregateBuilder<Bk>>
{
  let mut deserializer = ObjectDeserializer::<TermsAggregateBuilder<Bk>>::new();
  setup_aggregate_base(&mut deserializer);
  deserializer
    .add(
      "doc_count_error_upper_bound",
      optional(canonical::<i64>()),
      |builder: &mut TermsAggregateBuilder<Bk>, value| builder.doc_count_error_upper_bound = value,
    )
    .add(
      "sum_other_doc_count",
      optional(canonical::<i64>()),
      |builder: &mut TermsAggregateBuilder<Bk>, value| builder.sum_other_doc_count = value,
    )
    .add("buckets", sequence(canonical::<Bk>()), |builder: &mut TermsAggregateBuilder<Bk>, value| {
      builder.buckets = Some(value);
    });
  deserializer
}

impl<Bk: TermsBucket> JsonDeserialize for TermsAggregate<Bk> {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    Bk::aggregate_deserializer().deserialize(cursor, options)
  }
}

impl<Bk: TermsBucket> SerializeFields for TermsAggregate<Bk> {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    self.base.serialize_fields(generator)?;
    write_optional_field(
      generator,
      "doc_count_error_upper_bound",
      self.doc_count_error_upper_bound.as_ref(),
    )?;
    write_optional_field(generator, "sum_other_doc_count", self.sum_other_doc_count.as_ref())?;
    write_field(generator, "buckets", &self.buckets)
  }
}

impl<Bk: TermsBucket> JsonSerialize for TermsAggregate<Bk> {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

/// The bucket of a string term.
#[derive(Clone, PartialEq, Debug)]
pub struct StringTermsBucket {
  key: String,
  doc_count: i64,
  aggregations: IndexMap<String, Aggregate>,
}

impl StringTermsBucket {
  /// A builder for this bucket.
  pub fn builder() -> StringTermsBucketBuilder {
    StringTermsBucketBuilder::default()
  }

  /// The term.
  pub fn key(&self) -> &str {
    &self.key
  }

  /// The amount of documents with this term.
  pub fn doc_count(&self) -> i64 {
    self.doc_count
  }

  /// The aggregates of the documents with this term.
  pub fn aggregations(&self) -> &IndexMap<String, Aggregate> {
    &self.aggregations
  }
}

/// The builder of a `StringTermsBucket`.
#[derive(Default, Debug)]
pub struct StringTermsBucketBuilder {
  bucket: BucketBuilder,
  key: Option<String>,
}

impl AsMut<BucketBuilder> for StringTermsBucketBuilder {
  fn as_mut(&mut self) -> &mut BucketBuilder {
    &mut self.bucket
  }
}

impl StringTermsBucketBuilder {
  /// Set the term.
  #[must_use]
  pub fn key(mut self, key: impl Into<String>) -> Self {
    self.key = Some(key.into());
    self
  }
}

impl ObjectBuilder for StringTermsBucketBuilder {
  type Value = StringTermsBucket;
  const NAME: &'static str = "StringTermsBucket";
  fn build(self) -> Result<StringTermsBucket> {
    let key = require(self.key, Self::NAME, "key")?;
    let (doc_count, aggregations) = self.bucket.build(Self::NAME)?;
    Ok(StringTermsBucket { key, doc_count, aggregations })
  }
}

static STRING_TERMS_BUCKET: LazyLock<ObjectDeserializer<StringTermsBucketBuilder>> =
  LazyLock::new(|| {
    let mut deserializer = ObjectDeserializer::<StringTermsBucketBuilder>::new();
    setup_bucket(&mut deserializer);
    deserializer.add("key", canonical::<String>(), |builder: &mut StringTermsBucketBuilder, value| {
      builder.key = Some(value);
    });
    deserializer
  });

static STRING_TERMS_AGGREGATE: LazyLock<
  ObjectDeserializer<TermsAggregateBuilder<StringTermsBucket>>,
> = LazyLock::new(terms_aggregate_deserializer);

impl TermsBucket for StringTermsBucket {
  const AGGREGATE_NAME: &'static str = "StringTermsAggregate";
  fn aggregate_deserializer() -> &'static ObjectDeserializer<TermsAggregateBuilder<Self>> {
    &STRING_TERMS_AGGREGATE
  }
}

impl JsonDeserialize for StringTermsBucket {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    STRING_TERMS_BUCKET.deserialize(cursor, options)
  }
}

impl SerializeFields for StringTermsBucket {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    write_field(generator, "key", &self.key)?;
    serialize_bucket_fields(self.doc_count, &self.aggregations, generator)
  }
}

impl JsonSerialize for StringTermsBucket {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

/// The bucket of an integer term.
#[derive(Clone, PartialEq, Debug)]
pub struct LongTermsBucket {
  key: i64,
  key_as_string: Option<String>,
  doc_count: i64,
  aggregations: IndexMap<String, Aggregate>,
}

impl LongTermsBucket {
  /// A builder for this bucket.
  pub fn builder() -> LongTermsBucketBuilder {
    LongTermsBucketBuilder::default()
  }

  /// The term.
  pub fn key(&self) -> i64 {
    self.key
  }

  /// The term, formatted.
  pub fn key_as_string(&self) -> Option<&str> {
    self.key_as_string.as_deref()
  }

  /// The amount of documents with this term.
  pub fn doc_count(&self) -> i64 {
    self.doc_count
  }

  /// The aggregates of the documents with this term.
  pub fn aggregations(&self) -> &IndexMap<String, Aggregate> {
    &self.aggregations
  }
}

/// The builder of a `LongTermsBucket`.
#[derive(Default, Debug)]
pub struct LongTermsBucketBuilder {
  bucket: BucketBuilder,
  key: Option<i64>,
  key_as_string: Option<String>,
}

impl AsMut<BucketBuilder> for LongTermsBucketBuilder {
  fn as_mut(&mut self) -> &mut BucketBuilder {
    &mut self.bucket
  }
}

impl LongTermsBucketBuilder {
  /// Set the term.
  #[must_use]
  pub fn key(mut self, key: i64) -> Self {
    self.key = Some(key);
    self
  }

  /// Set the formatted term.
  #[must_use]
  pub fn key_as_string(mut self, key_as_string: impl Into<String>) -> Self {
    self.key_as_string = Some(key_as_string.into());
    self
  }
}

impl ObjectBuilder for LongTermsBucketBuilder {
  type Value = LongTermsBucket;
  const NAME: &'static str = "LongTermsBucket";
  fn build(self) -> Result<LongTermsBucket> {
    let key = require(self.key, Self::NAME, "key")?;
    let (doc_count, aggregations) = self.bucket.build(Self::NAME)?;
    Ok(LongTermsBucket { key, key_as_string: self.key_as_string, doc_count, aggregations })
  }
}

static LONG_TERMS_BUCKET: LazyLock<ObjectDeserializer<LongTermsBucketBuilder>> =
  LazyLock::new(|| {
    let mut deserializer = ObjectDeserializer::<LongTermsBucketBuilder>::new();
    setup_bucket(&mut deserializer);
    deserializer
      .add("key", canonical::<i64>(), |builder: &mut LongTermsBucketBuilder, value| {
        builder.key = Some(value);
      })
      .add(
        "key_as_string",
        optional(canonical::<String>()),
        |builder: &mut LongTermsBucketBuilder, value| builder.key_as_string = value,
      );
    deserializer
  });

static LONG_TERMS_AGGREGATE: LazyLock<ObjectDeserializer<TermsAggregateBuilder<LongTermsBucket>>> =
  LazyLock::new(terms_aggregate_deserializer);

impl TermsBucket for LongTermsBucket {
  const AGGREGATE_NAME: &'static str = "LongTermsAggregate";
  fn aggregate_deserializer() -> &'static ObjectDeserializer<TermsAggregateBuilder<Self>> {
    &LONG_TERMS_AGGREGATE
  }
}

impl JsonDeserialize for LongTermsBucket {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    LONG_TERMS_BUCKET.deserialize(cursor, options)
  }
}

impl SerializeFields for LongTermsBucket {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    write_field(generator, "key", &self.key)?;
    write_optional_field(generator, "key_as_string", self.key_as_string.as_ref())?;
    serialize_bucket_fields(self.doc_count, &self.aggregations, generator)
  }
}

impl JsonSerialize for LongTermsBucket {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

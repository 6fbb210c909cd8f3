use std::sync::LazyLock;

use typed_json_traits::{
  Cursor, Generator, Result, DecodeOptions, JsonDeserialize, JsonDeserializer, JsonSerialize,
  SerializeFields, ObjectBuilder, ObjectDeserializer, canonical, sequence, serialize_object,
  write_optional_field,
  builder::{require, list_add, list_add_all},
};

/// A row of the segments cat API, describing a Lucene segment of a shard.
///
/// Every value is a string, as formatted for display. Each field may be requested by any of its
/// aliases, and is named accordingly in the response.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct SegmentsRecord {
  index: Option<String>,
  shard: Option<String>,
  prirep: Option<String>,
  ip: Option<String>,
  id: Option<String>,
  segment: Option<String>,
  generation: Option<String>,
  docs_count: Option<String>,
  docs_deleted: Option<String>,
  size: Option<String>,
  size_memory: Option<String>,
  committed: Option<String>,
  searchable: Option<String>,
  version: Option<String>,
  compound: Option<String>,
}

impl SegmentsRecord {
  /// A builder for a record.
  pub fn builder() -> SegmentsRecordBuilder {
    SegmentsRecordBuilder::default()
  }

  /// The index name.
  pub fn index(&self) -> Option<&str> {
    self.index.as_deref()
  }

  /// The shard name.
  pub fn shard(&self) -> Option<&str> {
    self.shard.as_deref()
  }

  /// If the shard is a primary (`p`) or a replica (`r`).
  pub fn prirep(&self) -> Option<&str> {
    self.prirep.as_deref()
  }

  /// The IP address of the node hosting the segment.
  pub fn ip(&self) -> Option<&str> {
    self.ip.as_deref()
  }

  /// The unique ID of the node hosting the segment.
  pub fn id(&self) -> Option<&str> {
    self.id.as_deref()
  }

  /// The segment name, derived from the generation.
  pub fn segment(&self) -> Option<&str> {
    self.segment.as_deref()
  }

  /// The generation number.
  pub fn generation(&self) -> Option<&str> {
    self.generation.as_deref()
  }

  /// The amount of documents within the segment, excluding deleted documents.
  pub fn docs_count(&self) -> Option<&str> {
    self.docs_count.as_deref()
  }

  /// The amount of deleted documents within the segment.
  pub fn docs_deleted(&self) -> Option<&str> {
    self.docs_deleted.as_deref()
  }

  /// The size of the segment on disk.
  pub fn size(&self) -> Option<&str> {
    self.size.as_deref()
  }

  /// The size of the segment in memory.
  pub fn size_memory(&self) -> Option<&str> {
    self.size_memory.as_deref()
  }

  /// If the segment was committed to disk.
  pub fn committed(&self) -> Option<&str> {
    self.committed.as_deref()
  }

  /// If the segment is searchable.
  pub fn searchable(&self) -> Option<&str> {
    self.searchable.as_deref()
  }

  /// The version of Lucene which wrote the segment.
  pub fn version(&self) -> Option<&str> {
    self.version.as_deref()
  }

  /// If the segment is stored within a compound file.
  pub fn compound(&self) -> Option<&str> {
    self.compound.as_deref()
  }
}

/// The builder of a `SegmentsRecord`.
#[derive(Default, Debug)]
pub struct SegmentsRecordBuilder {
  record: SegmentsRecord,
}

impl SegmentsRecordBuilder {
  /// Set the index name.
  #[must_use]
  pub fn index(mut self, index: impl Into<String>) -> Self {
    self.record.index = Some(index.into());
    self
  }

  /// Set the shard name.
  #[must_use]
  pub fn shard(mut self, shard: impl Into<String>) -> Self {
    self.record.shard = Some(shard.into());
    self
  }

  /// Set if the shard is a primary (`p`) or a replica (`r`).
  #[must_use]
  pub fn prirep(mut self, prirep: impl Into<String>) -> Self {
    self.record.prirep = Some(prirep.into());
    self
  }

  /// Set the IP address of the node hosting the segment.
  #[must_use]
  pub fn ip(mut self, ip: impl Into<String>) -> Self {
    self.record.ip = Some(ip.into());
    self
  }

  /// Set the unique ID of the node hosting the segment.
  #[must_use]
  pub fn id(mut self, id: impl Into<String>) -> Self {
    self.record.id = Some(id.into());
    self
  }

  /// Set the segment name, derived from the generation.
  #[must_use]
  pub fn segment(mut self, segment: impl Into<String>) -> Self {
    self.record.segment = Some(segment.into());
    self
  }

  /// Set the generation number.
  #[must_use]
  pub fn generation(mut self, generation: impl Into<String>) -> Self {
    self.record.generation = Some(generation.into());
    self
  }

  /// Set the amount of documents within the segment, excluding deleted documents.
  #[must_use]
  pub fn docs_count(mut self, docs_count: impl Into<String>) -> Self {
    self.record.docs_count = Some(docs_count.into());
    self
  }

  /// Set the amount of deleted documents within the segment.
  #[must_use]
  pub fn docs_deleted(mut self, docs_deleted: impl Into<String>) -> Self {
    self.record.docs_deleted = Some(docs_deleted.into());
    self
  }

  /// Set the size of the segment on disk.
  #[must_use]
  pub fn size(mut self, size: impl Into<String>) -> Self {
    self.record.size = Some(size.into());
    self
  }

  /// Set the size of the segment in memory.
  #[must_use]
  pub fn size_memory(mut self, size_memory: impl Into<String>) -> Self {
    self.record.size_memory = Some(size_memory.into());
    self
  }

  /// Set if the segment was committed to disk.
  #[must_use]
  pub fn committed(mut self, committed: impl Into<String>) -> Self {
    self.record.committed = Some(committed.into());
    self
  }

  /// Set if the segment is searchable.
  #[must_use]
  pub fn searchable(mut self, searchable: impl Into<String>) -> Self {
    self.record.searchable = Some(searchable.into());
    self
  }

  /// Set the version of Lucene which wrote the segment.
  #[must_use]
  pub fn version(mut self, version: impl Into<String>) -> Self {
    self.record.version = Some(version.into());
    self
  }

  /// Set if the segment is stored within a compound file.
  #[must_use]
  pub fn compound(mut self, compound: impl Into<String>) -> Self {
    self.record.compound = Some(compound.into());
    self
  }
}

impl ObjectBuilder for SegmentsRecordBuilder {
  type Value = SegmentsRecord;
  const NAME: &'static str = "SegmentsRecord";
  fn build(self) -> Result<SegmentsRecord> {
    Ok(self.record)
  }
}

static SEGMENTS_RECORD: LazyLock<ObjectDeserializer<SegmentsRecordBuilder>> = LazyLock::new(|| {
  let mut deserializer = ObjectDeserializer::<SegmentsRecordBuilder>::new();
  deserializer
    .add_aliased(
      &["index", "i", "idx"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.index = Some(value),
    )
    .add_aliased(
      &["shard", "s", "sh"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.shard = Some(value),
    )
    .add_aliased(
      &["prirep", "p", "pr", "primaryOrReplica"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.prirep = Some(value),
    )
    .add("ip", canonical::<String>(), |builder: &mut SegmentsRecordBuilder, value| {
      builder.record.ip = Some(value);
    })
    .add("id", canonical::<String>(), |builder: &mut SegmentsRecordBuilder, value| {
      builder.record.id = Some(value);
    })
    .add_aliased(
      &["segment", "seg"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.segment = Some(value),
    )
    .add_aliased(
      &["generation", "g", "gen"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.generation = Some(value),
    )
    .add_aliased(
      &["docs.count", "dc", "docsCount"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.docs_count = Some(value),
    )
    .add_aliased(
      &["docs.deleted", "dd", "docsDeleted"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.docs_deleted = Some(value),
    )
    .add_aliased(
      &["size", "si"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.size = Some(value),
    )
    .add_aliased(
      &["size.memory", "sm", "sizeMemory"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.size_memory = Some(value),
    )
    .add_aliased(
      &["committed", "ic", "isCommitted"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.committed = Some(value),
    )
    .add_aliased(
      &["searchable", "is", "isSearchable"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.searchable = Some(value),
    )
    .add_aliased(
      &["version", "v"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.version = Some(value),
    )
    .add_aliased(
      &["compound", "ico", "isCompound"],
      canonical::<String>(),
      |builder: &mut SegmentsRecordBuilder, value| builder.record.compound = Some(value),
    );
  deserializer
});

impl JsonDeserialize for SegmentsRecord {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    SEGMENTS_RECORD.deserialize(cursor, options)
  }
}

impl SerializeFields for SegmentsRecord {
  fn serialize_fields(&self, generator: &mut dyn Generator) -> Result<()> {
    write_optional_field(generator, "index", self.index.as_ref())?;
    write_optional_field(generator, "shard", self.shard.as_ref())?;
    write_optional_field(generator, "prirep", self.prirep.as_ref())?;
    write_optional_field(generator, "ip", self.ip.as_ref())?;
    write_optional_field(generator, "id", self.id.as_ref())?;
    write_optional_field(generator, "segment", self.segment.as_ref())?;
    write_optional_field(generator, "generation", self.generation.as_ref())?;
    write_optional_field(generator, "docs.count", self.docs_count.as_ref())?;
    write_optional_field(generator, "docs.deleted", self.docs_deleted.as_ref())?;
    write_optional_field(generator, "size", self.size.as_ref())?;
    write_optional_field(generator, "size.memory", self.size_memory.as_ref())?;
    write_optional_field(generator, "committed", self.committed.as_ref())?;
    write_optional_field(generator, "searchable", self.searchable.as_ref())?;
    write_optional_field(generator, "version", self.version.as_ref())?;
    write_optional_field(generator, "compound", self.compound.as_ref())
  }
}

impl JsonSerialize for SegmentsRecord {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    serialize_object(self, generator)
  }
}

/// The response of the segments cat API.
///
/// The body is an array of records, not an object.
#[derive(Clone, PartialEq, Debug)]
pub struct SegmentsResponse {
  value_body: Vec<SegmentsRecord>,
}

impl SegmentsResponse {
  /// A builder for a response.
  pub fn builder() -> SegmentsResponseBuilder {
    SegmentsResponseBuilder::default()
  }

  /// The records.
  pub fn value_body(&self) -> &[SegmentsRecord] {
    &self.value_body
  }
}

/// The builder of a `SegmentsResponse`.
#[derive(Default, Debug)]
pub struct SegmentsResponseBuilder {
  value_body: Option<Vec<SegmentsRecord>>,
}

impl SegmentsResponseBuilder {
  /// Add every record.
  #[must_use]
  pub fn value_body(mut self, records: impl IntoIterator<Item = SegmentsRecord>) -> Self {
    list_add_all(&mut self.value_body, records);
    self
  }

  /// Add a record.
  #[must_use]
  pub fn add_value_body(mut self, record: SegmentsRecord) -> Self {
    list_add(&mut self.value_body, record);
    self
  }

  /// Add a record, built with `f`.
  pub fn add_value_body_with(
    self,
    f: impl FnOnce(SegmentsRecordBuilder) -> Result<SegmentsRecord>,
  ) -> Result<Self> {
    Ok(self.add_value_body(f(SegmentsRecord::builder())?))
  }
}

impl ObjectBuilder for SegmentsResponseBuilder {
  type Value = SegmentsResponse;
  const NAME: &'static str = "SegmentsResponse";
  fn build(self) -> Result<SegmentsResponse> {
    Ok(SegmentsResponse { value_body: require(self.value_body, Self::NAME, "value_body")? })
  }
}

impl JsonDeserialize for SegmentsResponse {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    let records = sequence(canonical::<SegmentsRecord>()).deserialize(cursor, options)?;
    SegmentsResponse::builder().value_body(records).build()
  }
}

impl JsonSerialize for SegmentsResponse {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    self.value_body.serialize(generator)
  }
}

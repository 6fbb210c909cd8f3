//! Aggregations, as requested, and aggregates, as they're responded with.

mod base;
pub use base::{AggregateBase, AggregateBaseBuilder, AggregateBaseSetters};
pub(crate) use base::setup_aggregate_base;

mod metric;
pub use metric::*;

mod stats;
pub use stats::*;

mod percentiles;
pub use percentiles::*;

mod bucket;
pub use bucket::{
  BucketBuilder, BucketSetters, SingleBucketAggregate, SingleBucketAggregateBuilder,
  NestedAggregate, FilterAggregate, GlobalAggregate,
};

mod terms;
pub use terms::*;

mod aggregate;
pub use aggregate::{Aggregate, AggregateKind};

mod aggregation;
pub use aggregation::*;

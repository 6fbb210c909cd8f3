#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

pub mod aggregations;
pub mod mapping;
pub mod cat;

/// The traits needed to use the builders and inspect the unions.
pub mod prelude {
  pub use typed_json_traits::{ObjectBuilder, union::TaggedUnion};
  pub use crate::{
    aggregations::{AggregateBaseSetters, BucketSetters, StatsAggregateSetters},
    mapping::PropertyBaseSetters,
  };
}

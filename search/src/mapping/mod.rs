//! Mappings, which define how the fields of documents are indexed.

mod base;
pub use base::{PropertyBase, PropertyBaseBuilder, PropertyBaseSetters};
pub(crate) use base::setup_property_base;

mod properties;
pub use properties::*;

mod property;
pub use property::{Property, PropertyKind};

mod type_mapping;
pub use type_mapping::{TypeMapping, TypeMappingBuilder};

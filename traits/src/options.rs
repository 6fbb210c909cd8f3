use crate::DEFAULT_MAX_DEPTH;

/// How to handle a field no registration of the type recognizes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnknownFieldPolicy {
  /// Fail with `JsonError::UnknownField`.
  Strict,
  /// Skip the field's value, whatever its shape.
  Ignore,
}

/// Options for decoding.
///
/// There's intentionally no `Default` implementation. Callers pick between `strict` and `lenient`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DecodeOptions {
  /// The policy for unknown fields.
  pub unknown_fields: UnknownFieldPolicy,
  /// The maximum depth objects and arrays may nest to within a document.
  pub max_depth: usize,
}

impl DecodeOptions {
  /// Options which reject unknown fields.
  pub const fn strict() -> Self {
    DecodeOptions { unknown_fields: UnknownFieldPolicy::Strict, max_depth: DEFAULT_MAX_DEPTH }
  }

  /// Options which skip unknown fields.
  pub const fn lenient() -> Self {
    DecodeOptions { unknown_fields: UnknownFieldPolicy::Ignore, max_depth: DEFAULT_MAX_DEPTH }
  }

  /// Bound how deeply documents may nest.
  #[must_use]
  pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
    self.max_depth = max_depth;
    self
  }
}

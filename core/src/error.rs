use thiserror::Error;

use crate::EventKind;

/// An error incurred when building, decoding, or encoding a value.
///
/// None of these are recoverable at the point they're raised. A failed decode discards whatever
/// was being built, and the caller never observes a partially populated value.
#[derive(Clone, PartialEq, Eq, Debug, Error)]
pub enum JsonError {
  /// A builder was finalized without a required field being set.
  #[error("missing required field `{field}` of `{owner}`")]
  MissingRequiredField {
    /// The type being built.
    owner: &'static str,
    /// The name of the field which wasn't set.
    field: &'static str,
  },
  /// A builder was used after it was finalized.
  #[error("builder for `{owner}` was used after it was built")]
  BuilderReused {
    /// The type the builder builds.
    owner: &'static str,
  },
  /// The discriminator of a tagged union didn't name any of its variants.
  #[error("unknown variant `{key}` of `{union}`")]
  UnknownVariant {
    /// The tagged union being decoded.
    union: &'static str,
    /// The discriminator read.
    key: String,
  },
  /// The stream had a valid token where a token of another shape was expected.
  #[error("expected {expected} when decoding `{context}`, found {found}")]
  UnexpectedTokenShape {
    /// A description of what was expected.
    expected: &'static str,
    /// A description of what was found.
    found: String,
    /// The type, or container, being decoded.
    context: &'static str,
  },
  /// A field not known to the type was present while decoding strictly.
  #[error("unknown field `{field}` of `{owner}`")]
  UnknownField {
    /// The type being decoded.
    owner: &'static str,
    /// The name of the field.
    field: String,
  },
  /// The stream of tokens was not well-formed.
  ///
  /// For text, `offset` is the byte offset. For buffered events, it's the index of the event. For
  /// generators, it's the amount of tokens previously written.
  #[error("malformed JSON stream at {offset}: {reason}")]
  MalformedStream {
    /// The reason the stream is malformed.
    reason: &'static str,
    /// The position within the stream.
    offset: usize,
  },
  /// The document nested structures beyond the configured limit.
  #[error("JSON nested deeper than the limit of {max}")]
  DepthExceeded {
    /// The configured limit.
    max: usize,
  },
}

impl JsonError {
  /// An `UnexpectedTokenShape` error.
  pub fn unexpected(expected: &'static str, found: EventKind, context: &'static str) -> Self {
    JsonError::UnexpectedTokenShape { expected, found: found.to_string(), context }
  }

  /// A `MalformedStream` error.
  pub fn malformed(reason: &'static str, offset: usize) -> Self {
    JsonError::MalformedStream { reason, offset }
  }
}

/// A `Result` whose error is a `JsonError`.
pub type Result<T> = core::result::Result<T, JsonError>;

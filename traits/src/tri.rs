use crate::{
  Cursor, DecodeOptions, JsonDeserialize, JsonDeserializer, Result, canonical, combinators::tri,
};

/// A three-state variable comparable to a flattened `Option<Option<T>>`.
///
/// When deserializing, this preserves the distinction between present and present as `null`, when
/// `Option` will deserialize both cases into the singular `None`. Builders use this for fields
/// which are required yet nullable.
///
/// `Tri` does not itself implement `JsonSerialize` as the caller _must_ first decide whether or
/// not to serialize it at all by its pattern (see `write_tri_field`).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Debug)]
pub enum Tri<T> {
  /// A value present.
  Some(T),
  /// A value present as `null`.
  ///
  /// `Option as JsonDeserialize` would consider this as `None` but here it's comparable to
  /// `Some(None)`.
  Null,
  /// A value not present.
  ///
  /// `Option as JsonDeserialize` would ambiguously also consider this as `None`, hence the need
  /// for this `enum` in the first place.
  #[default]
  None,
}

impl<T> Tri<T> {
  /// If this value is not present.
  pub fn is_none(&self) -> bool {
    matches!(self, Tri::None)
  }

  /// Borrow the value within.
  pub fn as_ref(&self) -> Tri<&T> {
    self.into()
  }
}

impl<T: JsonDeserialize> JsonDeserialize for Tri<T> {
  fn deserialize(cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Self> {
    tri(canonical::<T>()).deserialize(cursor, options)
  }
}

impl<'value, T> From<&'value Tri<T>> for Tri<&'value T> {
  fn from(value: &'value Tri<T>) -> Self {
    match value {
      Tri::Some(value) => Tri::Some(value),
      Tri::Null => Tri::Null,
      Tri::None => Tri::None,
    }
  }
}

impl<T> From<Option<T>> for Tri<T> {
  /// Map a nullable value to `Tri::Some` or `Tri::Null`, both of which are present.
  fn from(value: Option<T>) -> Self {
    match value {
      Some(value) => Tri::Some(value),
      None => Tri::Null,
    }
  }
}

use std::sync::OnceLock;

use indexmap::IndexMap;
use tracing::trace;

use crate::{Event, EventKind, Cursor, JsonError, Result, DecodeOptions, JsonDeserializer, Tri};

/// A deserializer of an array into a `Vec`.
#[derive(Clone, Copy, Debug)]
pub struct Sequence<D>(D);

/// Deserialize an array, each item with `of`.
pub const fn sequence<D>(of: D) -> Sequence<D> {
  Sequence(of)
}

impl<T, D: JsonDeserializer<T>> JsonDeserializer<Vec<T>> for Sequence<D> {
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Vec<T>> {
    match cursor.expect_next()? {
      Event::StartArray => {}
      other => Err(JsonError::unexpected("an array", other.kind(), "sequence"))?,
    }
    let mut res = vec![];
    while cursor.peek_kind()? != EventKind::EndArray {
      res.push(self.0.deserialize(cursor, options)?);
    }
    cursor.expect_next()?;
    Ok(res)
  }
}

/// A deserializer of an object into an insertion-ordered map.
#[derive(Clone, Copy, Debug)]
pub struct Mapping<D>(D);

/// Deserialize an object, each field's value with `of`.
///
/// A key present multiple times has its value replaced, keeping its first position.
pub const fn mapping<D>(of: D) -> Mapping<D> {
  Mapping(of)
}

impl<T, D: JsonDeserializer<T>> JsonDeserializer<IndexMap<String, T>> for Mapping<D> {
  fn deserialize(
    &self,
    cursor: &mut dyn Cursor,
    options: &DecodeOptions,
  ) -> Result<IndexMap<String, T>> {
    match cursor.expect_next()? {
      Event::StartObject => {}
      other => Err(JsonError::unexpected("an object", other.kind(), "mapping"))?,
    }
    let mut res = IndexMap::new();
    loop {
      match cursor.expect_next()? {
        Event::EndObject => return Ok(res),
        Event::Key(key) => {
          let value = self.0.deserialize(cursor, options)?;
          res.insert(key, value);
        }
        other => Err(JsonError::unexpected("a key", other.kind(), "mapping"))?,
      }
    }
  }
}

/// A deserializer which accepts `null` as `None`.
#[derive(Clone, Copy, Debug)]
pub struct Optional<D>(D);

/// Deserialize `null` as `None`, anything else with `of`.
pub const fn optional<D>(of: D) -> Optional<D> {
  Optional(of)
}

impl<T, D: JsonDeserializer<T>> JsonDeserializer<Option<T>> for Optional<D> {
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Option<T>> {
    if cursor.peek_kind()? == EventKind::Null {
      cursor.expect_next()?;
      return Ok(None);
    }
    self.0.deserialize(cursor, options).map(Some)
  }
}

/// A deserializer which accepts `null` as `Tri::Null`.
#[derive(Clone, Copy, Debug)]
pub struct TriOf<D>(D);

/// Deserialize `null` as `Tri::Null`, anything else with `of`.
pub const fn tri<D>(of: D) -> TriOf<D> {
  TriOf(of)
}

impl<T, D: JsonDeserializer<T>> JsonDeserializer<Tri<T>> for TriOf<D> {
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<Tri<T>> {
    if cursor.peek_kind()? == EventKind::Null {
      cursor.expect_next()?;
      return Ok(Tri::Null);
    }
    self.0.deserialize(cursor, options).map(Tri::Some)
  }
}

/// A deserializer resolved on its first use.
///
/// This allows registering a deserializer for a type whose own deserializer isn't yet constructed,
/// as happens with recursive types.
pub struct Lazy<D: ?Sized + 'static> {
  supplier: fn() -> &'static D,
  resolved: OnceLock<&'static D>,
}

/// Defer resolving a deserializer until it's first used.
///
/// `supplier` is called at most once.
pub const fn lazy<D: ?Sized>(supplier: fn() -> &'static D) -> Lazy<D> {
  Lazy { supplier, resolved: OnceLock::new() }
}

impl<D: ?Sized + Sync> Lazy<D> {
  /// The deserializer, resolving it if this is the first use.
  pub fn get(&self) -> &'static D {
    self.resolved.get_or_init(|| {
      trace!(deserializer = core::any::type_name::<D>(), "resolving lazy deserializer");
      (self.supplier)()
    })
  }

  /// If the deserializer has been resolved.
  pub fn is_resolved(&self) -> bool {
    self.resolved.get().is_some()
  }
}

impl<T, D: ?Sized + JsonDeserializer<T>> JsonDeserializer<T> for Lazy<D> {
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<T> {
    self.get().deserialize(cursor, options)
  }
}

impl<D: ?Sized> core::fmt::Debug for Lazy<D> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Lazy").field("resolved", &self.resolved.get().is_some()).finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    LazyLock,
    atomic::{Ordering, AtomicUsize},
  };

  use super::*;
  use crate::{Tokenizer, Canonical, canonical};

  fn decode<T>(json: &str, deserializer: &dyn JsonDeserializer<T>) -> Result<T> {
    let mut tokenizer = Tokenizer::new(json.as_bytes());
    let res = deserializer.deserialize(&mut tokenizer, &DecodeOptions::strict())?;
    tokenizer.finish()?;
    Ok(res)
  }

  #[test]
  fn containers() {
    assert_eq!(decode("[1, 2, 3]", &sequence(canonical::<i64>())).unwrap(), vec![1, 2, 3]);
    assert_eq!(decode("[]", &sequence(canonical::<i64>())).unwrap(), Vec::<i64>::new());
    assert_eq!(
      decode("[[1], [], [2, 3]]", &sequence(sequence(canonical::<i64>()))).unwrap(),
      vec![vec![1], vec![], vec![2, 3]]
    );
    assert!(matches!(
      decode("{}", &sequence(canonical::<i64>())),
      Err(JsonError::UnexpectedTokenShape { context: "sequence", .. })
    ));

    let fields = decode(r#"{"b": 1, "a": 2, "b": 3}"#, &mapping(canonical::<i64>())).unwrap();
    assert_eq!(
      fields.into_iter().collect::<Vec<_>>(),
      vec![("b".to_string(), 3), ("a".to_string(), 2)]
    );

    assert_eq!(
      decode("[1, null]", &sequence(optional(canonical::<i64>()))).unwrap(),
      vec![Some(1), None]
    );
    assert_eq!(
      decode("[1, null]", &sequence(tri(canonical::<i64>()))).unwrap(),
      vec![Tri::Some(1), Tri::Null]
    );
  }

  static RESOLUTIONS: AtomicUsize = AtomicUsize::new(0);
  static TARGET: LazyLock<Sequence<Canonical<bool>>> = LazyLock::new(|| {
    RESOLUTIONS.fetch_add(1, Ordering::SeqCst);
    sequence(canonical::<bool>())
  });
  static DEFERRED: Lazy<Sequence<Canonical<bool>>> = lazy(|| &*TARGET);

  #[test]
  fn lazy_resolves_once() {
    assert!(!DEFERRED.is_resolved());
    assert_eq!(RESOLUTIONS.load(Ordering::SeqCst), 0);
    assert_eq!(decode("[true]", &DEFERRED).unwrap(), vec![true]);
    assert_eq!(decode("[false]", &DEFERRED).unwrap(), vec![false]);
    assert!(DEFERRED.is_resolved());
    assert_eq!(RESOLUTIONS.load(Ordering::SeqCst), 1);
  }
}

use indexmap::IndexMap;

use crate::{JsonError, Result, Tri};

/// A staging area for a value, finalized by `build`.
///
/// `build` consumes the builder, so a builder held by value can only be finalized once. Where a
/// builder is reached through a handle instead, wrap it in a `SingleUse`.
pub trait ObjectBuilder: Sized {
  /// The value built.
  type Value;
  /// The name of the value's type, for errors.
  const NAME: &'static str;

  /// Validate every required field is present and freeze the value.
  fn build(self) -> Result<Self::Value>;
}

/// A guard ensuring a builder is built at most once and never mutated after.
#[derive(Debug)]
pub struct SingleUse<B> {
  builder: Option<B>,
}

impl<B: ObjectBuilder> SingleUse<B> {
  /// Guard a builder.
  pub fn new(builder: B) -> Self {
    SingleUse { builder: Some(builder) }
  }

  /// Mutably access the builder.
  ///
  /// Errors with `BuilderReused` if it's already been built.
  pub fn get_mut(&mut self) -> Result<&mut B> {
    self.builder.as_mut().ok_or(JsonError::BuilderReused { owner: B::NAME })
  }

  /// Build the value.
  ///
  /// Errors with `BuilderReused` if it's already been built. The builder is consumed even if
  /// building fails.
  pub fn build(&mut self) -> Result<B::Value> {
    self.builder.take().ok_or(JsonError::BuilderReused { owner: B::NAME })?.build()
  }

  /// If this has been built.
  pub fn is_consumed(&self) -> bool {
    self.builder.is_none()
  }
}

/// Unwrap a required field.
pub fn require<T>(value: Option<T>, owner: &'static str, field: &'static str) -> Result<T> {
  value.ok_or(JsonError::MissingRequiredField { owner, field })
}

/// Unwrap a required field which may be `null`.
pub fn require_tri<T>(
  value: Tri<T>,
  owner: &'static str,
  field: &'static str,
) -> Result<Option<T>> {
  match value {
    Tri::Some(value) => Ok(Some(value)),
    Tri::Null => Ok(None),
    Tri::None => Err(JsonError::MissingRequiredField { owner, field }),
  }
}

/// Append to a list accumulator, marking the list as set.
pub fn list_add<T>(list: &mut Option<Vec<T>>, value: T) {
  list.get_or_insert_with(Vec::new).push(value);
}

/// Append every item to a list accumulator, marking the list as set even if there's none.
pub fn list_add_all<T>(list: &mut Option<Vec<T>>, values: impl IntoIterator<Item = T>) {
  list.get_or_insert_with(Vec::new).extend(values);
}

/// Insert into a map accumulator, marking the map as set.
///
/// A key already present has its value replaced, keeping its position.
pub fn map_put<T>(map: &mut Option<IndexMap<String, T>>, key: impl Into<String>, value: T) {
  map.get_or_insert_with(IndexMap::new).insert(key.into(), value);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[derive(Default)]
  struct PointBuilder {
    x: Option<i64>,
    y: Tri<i64>,
    tags: Option<Vec<String>>,
  }

  #[derive(PartialEq, Debug)]
  struct Point {
    x: i64,
    y: Option<i64>,
    tags: Vec<String>,
  }

  impl ObjectBuilder for PointBuilder {
    type Value = Point;
    const NAME: &'static str = "Point";
    fn build(self) -> Result<Point> {
      Ok(Point {
        x: require(self.x, Self::NAME, "x")?,
        y: require_tri(self.y, Self::NAME, "y")?,
        tags: require(self.tags, Self::NAME, "tags")?,
      })
    }
  }

  #[test]
  fn required_fields() {
    let builder = PointBuilder { x: Some(1), y: Tri::Null, tags: None };
    assert_eq!(
      builder.build(),
      Err(JsonError::MissingRequiredField { owner: "Point", field: "tags" })
    );

    // An explicitly empty list is present
    let mut builder = PointBuilder { x: Some(1), y: Tri::None, tags: None };
    list_add_all(&mut builder.tags, []);
    assert_eq!(
      builder.build(),
      Err(JsonError::MissingRequiredField { owner: "Point", field: "y" })
    );

    let mut builder = PointBuilder { x: Some(1), y: Tri::Null, tags: None };
    list_add_all(&mut builder.tags, []);
    assert_eq!(builder.build().unwrap(), Point { x: 1, y: None, tags: vec![] });
  }

  #[test]
  fn single_use() {
    let mut builder = SingleUse::new(PointBuilder::default());
    {
      let builder = builder.get_mut().unwrap();
      builder.x = Some(2);
      builder.y = Tri::Some(3);
      list_add(&mut builder.tags, "a".to_string());
      list_add(&mut builder.tags, "b".to_string());
    }
    assert!(!builder.is_consumed());
    assert_eq!(
      builder.build().unwrap(),
      Point { x: 2, y: Some(3), tags: vec!["a".to_string(), "b".to_string()] }
    );
    assert!(builder.is_consumed());
    assert_eq!(builder.build(), Err(JsonError::BuilderReused { owner: "Point" }));
    assert!(matches!(builder.get_mut(), Err(JsonError::BuilderReused { owner: "Point" })));
  }

  #[test]
  fn map_put_keeps_position() {
    let mut map = None;
    map_put(&mut map, "a", 1);
    map_put(&mut map, "b", 2);
    map_put(&mut map, "a", 3);
    let map = map.unwrap();
    assert_eq!(
      map.into_iter().collect::<Vec<_>>(),
      vec![("a".to_string(), 3), ("b".to_string(), 2)]
    );
  }
}

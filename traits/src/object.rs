use indexmap::IndexMap;
use tracing::debug;

use crate::{
  Event, Cursor, JsonError, Result, UnknownFieldPolicy, DecodeOptions, JsonDeserializer,
  ObjectBuilder, SingleUse,
};

type FieldAction<B> =
  Box<dyn Send + Sync + Fn(&mut B, &mut dyn Cursor, &DecodeOptions) -> Result<()>>;
type UnknownFieldHandler<B> =
  Box<dyn Send + Sync + Fn(&mut B, &str, &mut dyn Cursor, &DecodeOptions) -> Result<bool>>;

/// A deserializer of an object into a builder, field by field.
///
/// Each field name is registered with an action which deserializes the field's value and stores
/// it within the builder. Types which extend another type register the other type's fields first,
/// then their own. Registering a name twice panics, as one registration would shadow the other.
///
/// Fields which aren't registered are offered to the unknown-field handler, if one was set. If it
/// doesn't consume the field, the field is rejected or skipped per the `UnknownFieldPolicy`.
pub struct ObjectDeserializer<B> {
  owner: &'static str,
  fields: IndexMap<&'static str, usize>,
  actions: Vec<FieldAction<B>>,
  unknown_field_handler: Option<UnknownFieldHandler<B>>,
  ignore_unknown_fields: bool,
}

impl<B: 'static + ObjectBuilder> Default for ObjectDeserializer<B> {
  fn default() -> Self {
    Self::new()
  }
}

impl<B: 'static + ObjectBuilder> ObjectDeserializer<B> {
  /// Create a deserializer without any fields.
  pub fn new() -> Self {
    ObjectDeserializer {
      owner: B::NAME,
      fields: IndexMap::new(),
      actions: vec![],
      unknown_field_handler: None,
      ignore_unknown_fields: false,
    }
  }

  fn register(&mut self, names: &[&'static str], action: FieldAction<B>) {
    let index = self.actions.len();
    self.actions.push(action);
    for &name in names {
      let existing = self.fields.insert(name, index);
      assert!(
        existing.is_none(),
        "field `{name}` of `{}` was registered multiple times",
        self.owner
      );
    }
  }

  /// Register a field, deserialized with `deserializer` and stored with `set`.
  ///
  /// Panics if the name was already registered.
  pub fn add<T: 'static>(
    &mut self,
    name: &'static str,
    deserializer: impl 'static + JsonDeserializer<T>,
    set: impl 'static + Send + Sync + Fn(&mut B, T),
  ) -> &mut Self {
    self.add_aliased(&[name], deserializer, set)
  }

  /// Register a field which may be present under any of several names.
  ///
  /// Panics if any of the names were already registered.
  pub fn add_aliased<T: 'static>(
    &mut self,
    names: &[&'static str],
    deserializer: impl 'static + JsonDeserializer<T>,
    set: impl 'static + Send + Sync + Fn(&mut B, T),
  ) -> &mut Self {
    self.add_fallible(names, deserializer, move |builder, value| {
      set(builder, value);
      Ok(())
    })
  }

  /// Register a field whose setter may fail.
  ///
  /// Panics if any of the names were already registered.
  pub fn add_fallible<T: 'static>(
    &mut self,
    names: &[&'static str],
    deserializer: impl 'static + JsonDeserializer<T>,
    set: impl 'static + Send + Sync + Fn(&mut B, T) -> Result<()>,
  ) -> &mut Self {
    self.register(
      names,
      Box::new(move |builder: &mut B, cursor: &mut dyn Cursor, options: &DecodeOptions| {
        let value = deserializer.deserialize(cursor, options)?;
        set(builder, value)
      }),
    );
    self
  }

  /// Register a field whose value is skipped.
  ///
  /// Panics if the name was already registered.
  pub fn ignore(&mut self, name: &'static str) -> &mut Self {
    self.register(&[name], Box::new(|_: &mut B, cursor: &mut dyn Cursor, _: &DecodeOptions| {
      cursor.skip_value()
    }));
    self
  }

  /// Set the handler for fields which weren't registered.
  ///
  /// The handler returns if it consumed the field's value. If it didn't, it must not have advanced
  /// the cursor.
  pub fn set_unknown_field_handler(
    &mut self,
    handler: impl 'static
      + Send
      + Sync
      + Fn(&mut B, &str, &mut dyn Cursor, &DecodeOptions) -> Result<bool>,
  ) -> &mut Self {
    self.unknown_field_handler = Some(Box::new(handler));
    self
  }

  /// Skip unknown fields, regardless of the `UnknownFieldPolicy` decoded with.
  pub fn ignore_unknown_fields(&mut self) -> &mut Self {
    self.ignore_unknown_fields = true;
    self
  }

  /// The names of the registered fields, in the order they were registered.
  pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
    self.fields.keys().copied()
  }

  fn deserialize_field(
    &self,
    builder: &mut B,
    key: &str,
    cursor: &mut dyn Cursor,
    options: &DecodeOptions,
  ) -> Result<()> {
    if let Some(index) = self.fields.get(key) {
      return self.actions[*index](builder, cursor, options);
    }
    if let Some(handler) = &self.unknown_field_handler &&
      handler(builder, key, cursor, options)?
    {
      return Ok(());
    }
    if self.ignore_unknown_fields || (options.unknown_fields == UnknownFieldPolicy::Ignore) {
      debug!(owner = self.owner, field = key, "skipping unknown field");
      return cursor.skip_value();
    }
    Err(JsonError::UnknownField { owner: self.owner, field: key.to_string() })
  }

  /// Deserialize the fields of an object into an existing builder.
  pub fn deserialize_fields(
    &self,
    builder: &mut B,
    cursor: &mut dyn Cursor,
    options: &DecodeOptions,
  ) -> Result<()> {
    match cursor.expect_next()? {
      Event::StartObject => {}
      other => Err(JsonError::unexpected("an object", other.kind(), self.owner))?,
    }
    loop {
      match cursor.expect_next()? {
        Event::EndObject => return Ok(()),
        Event::Key(key) => self.deserialize_field(builder, &key, cursor, options)?,
        other => Err(JsonError::unexpected("a key", other.kind(), self.owner))?,
      }
    }
  }
}

impl<B: 'static + Default + ObjectBuilder> JsonDeserializer<B::Value> for ObjectDeserializer<B> {
  fn deserialize(&self, cursor: &mut dyn Cursor, options: &DecodeOptions) -> Result<B::Value> {
    let mut builder = SingleUse::new(B::default());
    self.deserialize_fields(builder.get_mut()?, cursor, options)?;
    builder.build()
  }
}

impl<B> core::fmt::Debug for ObjectDeserializer<B> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("ObjectDeserializer")
      .field("owner", &self.owner)
      .field("fields", &self.fields.keys().collect::<Vec<_>>())
      .field("ignore_unknown_fields", &self.ignore_unknown_fields)
      .finish_non_exhaustive()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::LazyLock;

  use super::*;
  use crate::{
    from_slice_with, canonical, optional, sequence, Tri, JsonValue,
    builder::{require, require_tri, list_add_all},
  };

  #[derive(Default)]
  struct BookBuilder {
    title: Option<String>,
    pages: Option<i64>,
    rating: Tri<f64>,
    authors: Option<Vec<String>>,
    isbn: Option<String>,
  }

  #[derive(PartialEq, Debug)]
  struct Book {
    title: String,
    pages: i64,
    rating: Option<f64>,
    authors: Vec<String>,
    isbn: Option<String>,
  }

  impl ObjectBuilder for BookBuilder {
    type Value = Book;
    const NAME: &'static str = "Book";
    fn build(self) -> Result<Book> {
      Ok(Book {
        title: require(self.title, Self::NAME, "title")?,
        pages: require(self.pages, Self::NAME, "pages")?,
        rating: require_tri(self.rating, Self::NAME, "rating")?,
        authors: self.authors.unwrap_or_default(),
        isbn: self.isbn,
      })
    }
  }

  fn book_fields(book: &mut ObjectDeserializer<BookBuilder>) {
    book
      .add("title", canonical::<String>(), |builder: &mut BookBuilder, value| {
        builder.title = Some(value);
      })
      .add("pages", canonical::<i64>(), |builder: &mut BookBuilder, value| {
        builder.pages = Some(value);
      })
      .add("rating", crate::tri(canonical::<f64>()), |builder: &mut BookBuilder, value| {
        builder.rating = value;
      })
      .add("authors", sequence(canonical::<String>()), |builder: &mut BookBuilder, value| {
        list_add_all(&mut builder.authors, value);
      })
      .add_aliased(&["isbn", "isbn13"], optional(canonical::<String>()), |builder, value| {
        builder.isbn = value;
      });
  }

  static BOOK: LazyLock<ObjectDeserializer<BookBuilder>> = LazyLock::new(|| {
    let mut book = ObjectDeserializer::new();
    book_fields(&mut book);
    book
  });

  static LENIENT_BOOK: LazyLock<ObjectDeserializer<BookBuilder>> = LazyLock::new(|| {
    let mut book = ObjectDeserializer::new();
    book_fields(&mut book);
    book.ignore_unknown_fields();
    book
  });

  fn book() -> Book {
    Book {
      title: "Dune".to_string(),
      pages: 412,
      rating: None,
      authors: vec!["Frank Herbert".to_string()],
      isbn: Some("0441172717".to_string()),
    }
  }

  const BOOK_JSON: &str = concat!(
    r#"{"title": "Dune", "pages": 412, "rating": null, "#,
    r#""authors": ["Frank Herbert"], "isbn": "0441172717"}"#,
  );
  const EXTRA_JSON: &str = concat!(
    r#"{"extra": {"a": [1, {"b": []}]}, "title": "Dune", "pages": 412, "rating": null, "#,
    r#""more": [[], {}], "authors": ["Frank Herbert"], "isbn13": "0441172717"}"#,
  );

  #[test]
  fn fields() {
    let strict = DecodeOptions::strict();
    assert_eq!(from_slice_with(BOOK_JSON.as_bytes(), &*BOOK, &strict).unwrap(), book());
    assert_eq!(
      BOOK.field_names().collect::<Vec<_>>(),
      ["title", "pages", "rating", "authors", "isbn", "isbn13"]
    );

    assert_eq!(
      from_slice_with(br#"{"title": "Dune", "rating": 1}"#, &*BOOK, &strict),
      Err(JsonError::MissingRequiredField { owner: "Book", field: "pages" })
    );
    // `rating` is required yet nullable
    assert_eq!(
      from_slice_with(br#"{"title": "Dune", "pages": 1}"#, &*BOOK, &strict),
      Err(JsonError::MissingRequiredField { owner: "Book", field: "rating" })
    );
    assert!(matches!(
      from_slice_with(b"[]", &*BOOK, &strict),
      Err(JsonError::UnexpectedTokenShape { expected: "an object", context: "Book", .. })
    ));

    // The last instance of a duplicated field wins
    let json = concat!(
      r#"{"pages": 1, "title": "Dune", "pages": 412, "rating": null, "#,
      r#""authors": ["Frank Herbert"], "isbn": "0441172717"}"#,
    );
    assert_eq!(from_slice_with(json.as_bytes(), &*BOOK, &strict).unwrap(), book());
  }

  #[test]
  fn unknown_fields() {
    assert_eq!(
      from_slice_with(EXTRA_JSON.as_bytes(), &*BOOK, &DecodeOptions::strict()),
      Err(JsonError::UnknownField { owner: "Book", field: "extra".to_string() })
    );
    assert_eq!(
      from_slice_with(EXTRA_JSON.as_bytes(), &*BOOK, &DecodeOptions::lenient()).unwrap(),
      book()
    );
    // A type may ignore unknown fields regardless of the options
    assert_eq!(
      from_slice_with(EXTRA_JSON.as_bytes(), &*LENIENT_BOOK, &DecodeOptions::strict()).unwrap(),
      book()
    );
  }

  #[derive(Default)]
  struct BagBuilder {
    name: Option<String>,
    extra: IndexMap<String, JsonValue>,
  }

  impl ObjectBuilder for BagBuilder {
    type Value = (String, IndexMap<String, JsonValue>);
    const NAME: &'static str = "Bag";
    fn build(self) -> Result<Self::Value> {
      Ok((require(self.name, Self::NAME, "name")?, self.extra))
    }
  }

  #[test]
  fn unknown_field_handler() {
    let mut bag = ObjectDeserializer::<BagBuilder>::new();
    bag
      .add("name", canonical::<String>(), |builder: &mut BagBuilder, value| {
        builder.name = Some(value);
      })
      .ignore("kind")
      .set_unknown_field_handler(|builder, key, cursor, options| {
        if !key.starts_with("x-") {
          return Ok(false);
        }
        let value = canonical::<JsonValue>().deserialize(cursor, options)?;
        builder.extra.insert(key.to_string(), value);
        Ok(true)
      });

    let json = br#"{"x-a": [1], "kind": {"ignored": true}, "name": "n", "x-b": null}"#;
    let (name, extra) = from_slice_with(json, &bag, &DecodeOptions::strict()).unwrap();
    assert_eq!(name, "n");
    assert_eq!(extra.keys().collect::<Vec<_>>(), ["x-a", "x-b"]);
    assert_eq!(extra["x-b"], JsonValue::Null);

    assert_eq!(
      from_slice_with(br#"{"name": "n", "y": 1}"#, &bag, &DecodeOptions::strict()),
      Err(JsonError::UnknownField { owner: "Bag", field: "y".to_string() })
    );
  }

  #[test]
  #[should_panic(expected = "registered multiple times")]
  fn shadowing_panics() {
    let mut book = ObjectDeserializer::<BookBuilder>::new();
    book_fields(&mut book);
    book.ignore("isbn13");
  }
}

use typed_json_traits::{JsonError, DecodeOptions, from_str, to_string};
use typed_json_search::{mapping::*, prelude::*};

#[test]
fn tag_at_any_position() {
  let options = DecodeOptions::strict();
  for json in [
    r#"{"type": "keyword", "ignore_above": 256, "index": false}"#,
    r#"{"ignore_above": 256, "type": "keyword", "index": false}"#,
    r#"{"ignore_above": 256, "index": false, "type": "keyword"}"#,
  ] {
    let property = from_str::<Property>(json, &options).unwrap();
    assert_eq!(property.kind(), PropertyKind::Keyword);
    let keyword = property.as_keyword().unwrap();
    assert_eq!(keyword.ignore_above(), Some(256));
    assert_eq!(keyword.index(), Some(false));
    assert_eq!(
      to_string(&property).unwrap(),
      r#"{"type":"keyword","ignore_above":256,"index":false}"#
    );
  }
}

#[test]
fn default_tag() {
  let property = from_str::<Property>(
    r#"{"properties": {"name": {"type": "text", "analyzer": "standard"}}}"#,
    &DecodeOptions::strict(),
  )
  .unwrap();
  assert!(property.is_object());
  let name = &property.as_object().unwrap().base().properties()["name"];
  assert_eq!(name.as_text().unwrap().analyzer(), Some("standard"));
}

#[test]
fn invalid_tags() {
  let options = DecodeOptions::lenient();
  assert_eq!(
    from_str::<Property>(r#"{"type": "geo_shape"}"#, &options),
    Err(JsonError::UnknownVariant { union: "Property", key: "geo_shape".to_string() }),
  );
  assert!(matches!(
    from_str::<Property>(r#"{"type": 1}"#, &options),
    Err(JsonError::UnexpectedTokenShape { .. })
  ));
  assert!(matches!(
    from_str::<Property>(r#"["keyword"]"#, &options),
    Err(JsonError::UnexpectedTokenShape { .. })
  ));
}

#[test]
fn unknown_fields() {
  let json = r#"{"type": "date", "format": "yyyy", "fields": {"raw": {"type": "keyword"}}}"#;
  assert_eq!(
    from_str::<Property>(json, &DecodeOptions::strict()),
    Err(JsonError::UnknownField { owner: "DateProperty", field: "fields".to_string() }),
  );
  assert_eq!(
    from_str::<Property>(json, &DecodeOptions::lenient()).unwrap(),
    Property::Date(DateProperty::builder().format("yyyy").build().unwrap()),
  );
}

#[test]
fn every_variant_round_trips() {
  let properties = [
    Property::Keyword(KeywordProperty::builder().ignore_above(64).index(true).build().unwrap()),
    Property::Text(
      TextProperty::builder()
        .analyzer("english")
        .fielddata(false)
        .meta_entry("unit", "words")
        .build()
        .unwrap(),
    ),
    Property::Long(NumberProperty::builder().coerce(false).build().unwrap()),
    Property::Double(NumberProperty::builder().index(false).build().unwrap()),
    Property::Boolean(BooleanProperty::builder().index(true).build().unwrap()),
    Property::Date(DateProperty::builder().format("strict_date_optional_time").build().unwrap()),
    Property::Object(
      ObjectProperty::builder()
        .enabled(true)
        .properties_entry("color", KeywordProperty::builder().build().unwrap())
        .build()
        .unwrap(),
    ),
    Property::Nested(
      NestedProperty::builder()
        .include_in_parent(true)
        .properties_entry("price_per_kg", Property::Double(NumberProperty::default()))
        .build()
        .unwrap(),
    ),
  ];
  for property in &properties {
    let json = to_string(property).unwrap();
    assert_eq!(&from_str::<Property>(&json, &DecodeOptions::strict()).unwrap(), property, "{json}");
  }
}

#[test]
fn deeply_nested() {
  const DEPTH: usize = 6;

  let mut json = r#"{"type": "keyword"}"#.to_string();
  for depth in 0 .. DEPTH {
    // Alternate between explicit and implied objects.
    json = if depth % 2 == 0 {
      format!(r#"{{"properties": {{"level": {json}}}}}"#)
    } else {
      format!(r#"{{"properties": {{"level": {json}}}, "type": "nested"}}"#)
    };
  }
  let mapping = from_str::<TypeMapping>(
    &format!(r#"{{"date_detection": false, "properties": {{"root": {json}}}}}"#),
    &DecodeOptions::strict(),
  )
  .unwrap();
  assert_eq!(mapping.date_detection(), Some(false));

  let mut property = &mapping.properties()["root"];
  let mut depth = 0;
  while let Some(level) = property_base(property).and_then(|base| base.properties().get("level")) {
    property = level;
    depth += 1;
  }
  assert_eq!(depth, DEPTH);
  assert!(property.is_keyword());

  let json = to_string(&mapping).unwrap();
  assert_eq!(from_str::<TypeMapping>(&json, &DecodeOptions::strict()).unwrap(), mapping);
}

fn property_base(property: &Property) -> Option<&PropertyBase> {
  match property {
    Property::Object(object) => Some(object.base()),
    Property::Nested(nested) => Some(nested.base()),
    _ => None,
  }
}

#[test]
fn type_mapping_order() {
  let mapping = TypeMapping::builder()
    .properties_entry("name", TextProperty::builder().build().unwrap())
    .properties_entry("color", KeywordProperty::builder().build().unwrap())
    .properties_entry("in_stock", BooleanProperty::builder().build().unwrap())
    .build()
    .unwrap();
  assert_eq!(mapping.properties().keys().collect::<Vec<_>>(), ["name", "color", "in_stock"]);
  assert_eq!(
    to_string(&mapping).unwrap(),
    concat!(
      r#"{"properties":{"name":{"type":"text"},"color":{"type":"keyword"},"#,
      r#""in_stock":{"type":"boolean"}}}"#,
    )
  );
}

use indexmap::IndexMap;

use typed_json_traits::{JsonError, DecodeOptions, JsonValue, from_str, to_string};
use typed_json_search::{aggregations::*, prelude::*};

fn avg(field: &str) -> Aggregation {
  Aggregation::builder().avg(|avg| avg.field(field).build()).unwrap().build().unwrap()
}

#[test]
fn nested_with_sub_aggregation() {
  let aggregation = Aggregation::builder()
    .nested(|nested| nested.path("varieties").build())
    .unwrap()
    .aggregations_entry("average_price_per_variety", avg("varieties.price_per_kg"))
    .build()
    .unwrap();
  assert_eq!(aggregation.kind(), AggregationKind::Nested);

  let json = to_string(&aggregation).unwrap();
  assert_eq!(
    json,
    concat!(
      r#"{"nested":{"path":"varieties"},"aggregations":"#,
      r#"{"average_price_per_variety":{"avg":{"field":"varieties.price_per_kg"}}}}"#,
    )
  );
  assert_eq!(from_str::<Aggregation>(&json, &DecodeOptions::strict()).unwrap(), aggregation);
}

#[test]
fn decode() {
  let aggregation = from_str::<Aggregation>(
    r#"{
      "aggs": {
        "avg_price": {"avg": {"field": "price_per_kg", "missing": 0}},
        "colors": {"terms": {"field": "color", "size": 3}, "meta": {"shown": true}}
      },
      "terms": {"field": "catgCode"}
    }"#,
    &DecodeOptions::strict(),
  )
  .unwrap();

  let AggregationVariant::Terms(terms) = aggregation.variant() else { panic!("not terms") };
  assert_eq!(terms.field(), Some("catgCode"));
  assert_eq!(terms.size(), None);

  let sub = aggregation.aggregations();
  assert_eq!(sub.keys().collect::<Vec<_>>(), ["avg_price", "colors"]);
  let AggregationVariant::Avg(avg) = sub["avg_price"].variant() else { panic!("not avg") };
  assert_eq!(avg.field(), Some("price_per_kg"));
  assert_eq!(avg.missing(), Some(&JsonValue::from(0i64)));
  assert_eq!(sub["colors"].kind(), AggregationKind::Terms);
  assert_eq!(sub["colors"].meta()["shown"], JsonValue::Bool(true));
}

#[test]
fn single_kind() {
  let options = DecodeOptions::lenient();
  assert!(matches!(
    from_str::<Aggregation>(r#"{"avg": {"field": "a"}, "max": {"field": "a"}}"#, &options),
    Err(JsonError::UnexpectedTokenShape { .. })
  ));
  assert_eq!(
    from_str::<Aggregation>(r#"{"meta": {}}"#, &options),
    Err(JsonError::MissingRequiredField { owner: "Aggregation", field: "kind" }),
  );
  assert_eq!(
    from_str::<Aggregation>(r#"{"nested": {}}"#, &options),
    Err(JsonError::MissingRequiredField { owner: "NestedAggregation", field: "path" }),
  );
  assert_eq!(
    Aggregation::builder().nested(|nested| nested.build()).map(|_| ()),
    Err(JsonError::MissingRequiredField { owner: "NestedAggregation", field: "path" }),
  );
}

#[test]
fn unknown_fields() {
  let json = r#"{"cardinality": {"field": "color"}, "unexpected": [{}]}"#;
  assert_eq!(
    from_str::<Aggregation>(json, &DecodeOptions::strict()),
    Err(JsonError::UnknownField { owner: "Aggregation", field: "unexpected".to_string() }),
  );
  let aggregation = from_str::<Aggregation>(json, &DecodeOptions::lenient()).unwrap();
  assert_eq!(aggregation.kind(), AggregationKind::Cardinality);
  assert!(aggregation.aggregations().is_empty());
}

#[test]
fn every_kind_round_trips() {
  let field_metric = || FieldMetricAggregation::builder().field("price").missing(1.5).build();
  let aggregations = [
    Aggregation::builder().avg(|avg| avg.field("price").build()).unwrap(),
    Aggregation::builder().min(|_| field_metric()).unwrap(),
    Aggregation::builder().max(|_| field_metric()).unwrap(),
    Aggregation::builder().sum(|_| field_metric()).unwrap(),
    Aggregation::builder().value_count(|_| field_metric()).unwrap(),
    Aggregation::builder().cardinality(|_| field_metric()).unwrap(),
    Aggregation::builder().terms(|terms| terms.field("color").size(10).build()).unwrap(),
    Aggregation::builder().nested(|nested| nested.path("varieties").build()).unwrap(),
    Aggregation::builder().global(),
  ];
  for aggregation in aggregations {
    let aggregation = aggregation
      .meta_entry("requested_by", "tests")
      .aggregations_entry("inner", avg("price"))
      .build()
      .unwrap();
    let json = to_string(&aggregation).unwrap();
    assert_eq!(from_str::<Aggregation>(&json, &DecodeOptions::strict()).unwrap(), aggregation);
  }
}

#[test]
fn deeply_nested() {
  let mut aggregation = avg("price");
  for depth in 0 .. 6 {
    aggregation = Aggregation::builder()
      .nested(|nested| nested.path(format!("level_{depth}")).build())
      .unwrap()
      .aggregations_entry("inner", aggregation)
      .build()
      .unwrap();
  }
  let json = to_string(&aggregation).unwrap();
  let decoded = from_str::<Aggregation>(&json, &DecodeOptions::strict()).unwrap();
  assert_eq!(decoded, aggregation);

  let mut aggregation = &decoded;
  let mut depth = 0;
  while let Some(inner) = aggregation.aggregations().get("inner") {
    aggregation = inner;
    depth += 1;
  }
  assert_eq!(depth, 6);
  assert_eq!(aggregation.kind(), AggregationKind::Avg);
}

#[test]
fn meta() {
  let mut meta = IndexMap::new();
  meta.insert("requested_by".to_string(), JsonValue::from("tests"));
  meta.insert("page".to_string(), JsonValue::from(1i64));
  let aggregation = Aggregation::builder()
    .global()
    .meta_entry("page", 0i64)
    .meta(meta)
    .meta_entry("shown", true)
    .build()
    .unwrap();
  // A repeated key keeps its first position and takes the last value.
  assert_eq!(aggregation.meta().keys().collect::<Vec<_>>(), ["page", "requested_by", "shown"]);
  assert_eq!(aggregation.meta()["page"], JsonValue::from(1i64));
  assert_eq!(
    to_string(&aggregation).unwrap(),
    r#"{"global":{},"meta":{"page":1,"requested_by":"tests","shown":true}}"#
  );
}

use core::fmt::Debug;
use std::collections::HashSet;

use indexmap::IndexMap;

use typed_json_traits::{
  JsonError, Result, DecodeOptions, JsonDeserialize, JsonSerialize, JsonValue, from_str,
  from_slice_with, to_string,
};
use typed_json_search::{aggregations::*, prelude::*};

fn round_trip<T: PartialEq + Debug + JsonSerialize + JsonDeserialize>(value: &T) {
  let json = to_string(value).unwrap();
  assert_eq!(&from_str::<T>(&json, &DecodeOptions::strict()).unwrap(), value, "{json}");
}

fn metric(value: Option<f64>) -> SingleMetricAggregate {
  SingleMetricAggregate::builder().value(value).build().unwrap()
}

fn stats() -> StatsAggregate {
  StatsAggregate::builder()
    .count(3)
    .min(Some(1.49))
    .max(Some(3.29))
    .avg(Some(2.55))
    .sum(7.65)
    .build()
    .unwrap()
}

#[test]
fn avg() {
  let aggregate =
    from_str::<Aggregate>(r#"{"avg": {"value": 3.15}}"#, &DecodeOptions::strict()).unwrap();
  assert_eq!(aggregate.kind(), AggregateKind::Avg);
  assert!(aggregate.is_avg());
  assert!(!aggregate.is_max());
  assert_eq!(aggregate.as_avg().unwrap().value(), Some(3.15));
  assert!(aggregate.as_max().is_none());

  assert_eq!(to_string(&aggregate).unwrap(), r#"{"avg":{"value":3.15}}"#);
}

#[test]
fn unknown_kind() {
  assert_eq!(
    from_str::<Aggregate>(r#"{"bogus_kind": {}}"#, &DecodeOptions::lenient()),
    Err(JsonError::UnknownVariant { union: "Aggregate", key: "bogus_kind".to_string() }),
  );
}

#[test]
fn single_key_shape() {
  let options = DecodeOptions::strict();
  assert!(matches!(
    from_str::<Aggregate>("{}", &options),
    Err(JsonError::UnexpectedTokenShape { .. })
  ));
  assert!(matches!(
    from_str::<Aggregate>(r#"{"avg": {"value": 1}, "max": {"value": 2}}"#, &options),
    Err(JsonError::UnexpectedTokenShape { .. })
  ));
  assert!(matches!(
    from_str::<Aggregate>(r#"[{"avg": {"value": 1}}]"#, &options),
    Err(JsonError::UnexpectedTokenShape { .. })
  ));
}

#[test]
fn nullable_values() {
  let options = DecodeOptions::strict();

  let empty = from_str::<Aggregate>(r#"{"min": {"value": null}}"#, &options).unwrap();
  assert_eq!(empty.as_min().unwrap().value(), None);
  assert_eq!(to_string(&empty).unwrap(), r#"{"min":{"value":null}}"#);

  assert_eq!(
    from_str::<Aggregate>(r#"{"min": {}}"#, &options),
    Err(JsonError::MissingRequiredField { owner: "SingleMetricAggregate", field: "value" }),
  );

  let stats = from_str::<StatsAggregate>(
    r#"{"count": 0, "min": null, "max": null, "avg": null, "sum": 0.0}"#,
    &options,
  )
  .unwrap();
  assert_eq!(stats.count(), 0);
  assert_eq!(stats.min(), None);
  assert_eq!(stats.sum().to_bits(), 0.0f64.to_bits());
}

#[test]
fn missing_required_field() {
  assert_eq!(
    CardinalityAggregate::builder().build(),
    Err(JsonError::MissingRequiredField { owner: "CardinalityAggregate", field: "value" }),
  );
  assert_eq!(
    StringTermsAggregate::builder().build(),
    Err(JsonError::MissingRequiredField { owner: "StringTermsAggregate", field: "buckets" }),
  );
  assert_eq!(
    ExtendedStatsAggregate::builder()
      .count(1)
      .min(None)
      .max(None)
      .avg(None)
      .sum(0.0)
      .sum_of_squares(None)
      .variance(None)
      .build(),
    Err(JsonError::MissingRequiredField {
      owner: "ExtendedStatsAggregate",
      field: "std_deviation",
    }),
  );
  assert_eq!(
    from_str::<Aggregate>(r#"{"cardinality": {"meta": {}}}"#, &DecodeOptions::strict()),
    Err(JsonError::MissingRequiredField { owner: "CardinalityAggregate", field: "value" }),
  );
  // An explicitly empty collection is present.
  let terms = StringTermsAggregate::builder().buckets(vec![]).build().unwrap();
  assert!(terms.buckets().is_empty());
}

#[test]
fn every_variant_round_trips() {
  let bucket = |key: &str, doc_count| {
    StringTermsBucket::builder()
      .key(key)
      .doc_count(doc_count)
      .aggregations_entry("avg_price", Aggregate::Avg(metric(Some(2.5))))
      .build()
      .unwrap()
  };
  let extended_stats = ExtendedStatsAggregate::builder()
    .count(3)
    .min(Some(1.0))
    .max(Some(3.0))
    .avg(Some(2.0))
    .sum(6.0)
    .sum_of_squares(Some(14.0))
    .variance(Some(0.666))
    .std_deviation(None)
    .std_deviation_bounds(|bounds| bounds.upper(Some(3.6)).lower(None).build())
    .unwrap()
    .build()
    .unwrap();
  let single_bucket = SingleBucketAggregate::builder()
    .doc_count(5)
    .aggregations_entry("max_price", Aggregate::Max(metric(Some(4.99))))
    .build()
    .unwrap();

  let aggregates = [
    Aggregate::Avg(metric(Some(3.15))),
    Aggregate::Min(metric(None)),
    Aggregate::Max(
      SingleMetricAggregate::builder().value(Some(3.0)).value_as_string("3").build().unwrap(),
    ),
    Aggregate::Sum(metric(Some(-1.5e10))),
    Aggregate::ValueCount(metric(Some(12.0))),
    Aggregate::WeightedAvg(metric(Some(0.25))),
    Aggregate::Cardinality(
      CardinalityAggregate::builder().value(7).meta_entry("owner", "fruits").build().unwrap(),
    ),
    Aggregate::Stats(stats()),
    Aggregate::StatsBucket(
      StatsAggregate::builder()
        .count(0)
        .min(None)
        .max(None)
        .avg(None)
        .sum(0.0)
        .min_as_string("n/a")
        .build()
        .unwrap(),
    ),
    Aggregate::ExtendedStats(extended_stats.clone()),
    Aggregate::ExtendedStatsBucket(extended_stats),
    Aggregate::TDigestPercentiles(
      TDigestPercentilesAggregate::builder()
        .values_entry("50.0", Some(2.5))
        .values_entry("99.0", None)
        .build()
        .unwrap(),
    ),
    Aggregate::StringTerms(
      StringTermsAggregate::builder()
        .doc_count_error_upper_bound(0)
        .sum_other_doc_count(4)
        .add_bucket(bucket("yellow", 3))
        .add_bucket(bucket("red", 2))
        .build()
        .unwrap(),
    ),
    Aggregate::LongTerms(
      LongTermsAggregate::builder()
        .add_bucket(
          LongTermsBucket::builder().key(1).key_as_string("1").doc_count(2).build().unwrap(),
        )
        .add_bucket(LongTermsBucket::builder().key(-2).doc_count(1).build().unwrap())
        .build()
        .unwrap(),
    ),
    Aggregate::Nested(single_bucket.clone()),
    Aggregate::Filter(single_bucket),
    Aggregate::Global(SingleBucketAggregate::builder().doc_count(0).build().unwrap()),
  ];

  let mut kinds = HashSet::new();
  for aggregate in &aggregates {
    round_trip(aggregate);
    kinds.insert(aggregate.kind());
  }
  // Every kind was covered.
  assert_eq!(kinds.len(), 17);
}

#[test]
fn typed_keys() {
  let json = r#"{
    "avg#average_price": {"value": 2.55},
    "sterms#price_by_color": {
      "doc_count_error_upper_bound": 0,
      "sum_other_doc_count": 0,
      "buckets": [
        {"key": "yellow", "doc_count": 2, "avg#avg_price": {"value": 2.1}},
        {"key": "red", "doc_count": 1, "avg#avg_price": {"value": 3.29}}
      ]
    },
    "min#min_price": {"value": 1.49}
  }"#;
  let aggregations: IndexMap<String, Aggregate> = from_slice_with(
    json.as_bytes(),
    Aggregate::typed_keys_deserializer(),
    &DecodeOptions::strict(),
  )
  .unwrap();

  assert_eq!(
    aggregations.keys().collect::<Vec<_>>(),
    ["average_price", "price_by_color", "min_price"]
  );
  assert_eq!(aggregations["average_price"].as_avg().unwrap().value(), Some(2.55));
  let buckets = aggregations["price_by_color"].as_string_terms().unwrap().buckets();
  assert_eq!(buckets.iter().map(StringTermsBucket::key).collect::<Vec<_>>(), ["yellow", "red"]);
  assert_eq!(buckets[1].aggregations()["avg_price"].as_avg().unwrap().value(), Some(3.29));

  let typed_keys = |json: &str| -> Result<IndexMap<String, Aggregate>> {
    from_slice_with(json.as_bytes(), Aggregate::typed_keys_deserializer(), &DecodeOptions::strict())
  };
  assert!(matches!(
    typed_keys(r#"{"avg": {"value": 1}}"#),
    Err(JsonError::UnexpectedTokenShape { .. })
  ));
  assert_eq!(
    typed_keys(r#"{"bogus#x": {}}"#),
    Err(JsonError::UnknownVariant { union: "Aggregate", key: "bogus".to_string() }),
  );
}

#[test]
fn deeply_nested() {
  const DEPTH: usize = 8;

  let mut json = r#"{"avg#leaf": {"value": 1.0}}"#.to_string();
  for level in (0 .. DEPTH).rev() {
    let inner = &json[1 .. json.len() - 1];
    json = format!(r#"{{"nested#level_{level}": {{"doc_count": {level}, {inner}}}}}"#);
  }
  let aggregations: IndexMap<String, Aggregate> =
    from_slice_with(json.as_bytes(), Aggregate::typed_keys_deserializer(), &DecodeOptions::strict())
      .unwrap();

  let mut aggregations = &aggregations;
  for level in 0 .. DEPTH {
    let nested = aggregations[format!("level_{level}").as_str()].as_nested().unwrap();
    assert_eq!(nested.doc_count(), i64::try_from(level).unwrap());
    aggregations = nested.aggregations();
  }
  assert_eq!(aggregations["leaf"].as_avg().unwrap().value(), Some(1.0));
}

#[test]
fn unknown_fields() {
  let extra = r#"{"stats": {
    "count": 3, "min": 1.49, "max": 3.29, "avg": 2.55, "sum": 7.65,
    "extra": {"nested": [1, {"deeper": [null, true]}], "text": "x"}
  }}"#;

  assert_eq!(
    from_str::<Aggregate>(extra, &DecodeOptions::strict()),
    Err(JsonError::UnknownField { owner: "StatsAggregate", field: "extra".to_string() }),
  );
  assert_eq!(
    from_str::<Aggregate>(extra, &DecodeOptions::lenient()).unwrap(),
    Aggregate::Stats(stats()),
  );

  // Within buckets, keys without a `#` remain unknown fields.
  let bucket = r#"{"key": "red", "doc_count": 1, "extra": [1, 2]}"#;
  assert_eq!(
    from_str::<StringTermsBucket>(bucket, &DecodeOptions::strict()),
    Err(JsonError::UnknownField { owner: "StringTermsBucket", field: "extra".to_string() }),
  );
  let lenient = from_str::<StringTermsBucket>(bucket, &DecodeOptions::lenient()).unwrap();
  assert_eq!(lenient.key(), "red");
  assert!(lenient.aggregations().is_empty());
}

#[test]
fn meta() {
  let aggregate = from_str::<Aggregate>(
    r#"{"cardinality": {"meta": {"b": [1, 2.5, "x"], "a": {"c": null}}, "value": 2}}"#,
    &DecodeOptions::strict(),
  )
  .unwrap();
  let meta = aggregate.as_cardinality().unwrap().base().meta();
  assert_eq!(meta.keys().collect::<Vec<_>>(), ["b", "a"]);
  assert_eq!(
    meta["b"],
    JsonValue::Array(vec![JsonValue::from(1i64), JsonValue::from(2.5), JsonValue::from("x")])
  );
  assert_eq!(
    to_string(&aggregate).unwrap(),
    r#"{"cardinality":{"meta":{"b":[1,2.5,"x"],"a":{"c":null}},"value":2}}"#
  );
}

#[test]
fn map_order() {
  let percentiles = from_str::<TDigestPercentilesAggregate>(
    r#"{"values": {"99.0": 4.0, "1.0": 1.0, "50.0": null, "1.0": 1.5}}"#,
    &DecodeOptions::strict(),
  )
  .unwrap();
  assert_eq!(percentiles.values().keys().collect::<Vec<_>>(), ["99.0", "1.0", "50.0"]);
  assert_eq!(percentiles.values()["1.0"], Some(1.5));

  let mut values = IndexMap::new();
  values.insert("25.0".to_string(), Some(1.0));
  values.insert("75.0".to_string(), Some(3.0));
  let built = TDigestPercentilesAggregate::builder()
    .values_entry("75.0", Some(0.0))
    .values(values)
    .build()
    .unwrap();
  assert_eq!(built.values().keys().collect::<Vec<_>>(), ["75.0", "25.0"]);
  assert_eq!(built.values()["75.0"], Some(3.0));
}

use typed_json_traits::{JsonError, DecodeOptions, from_str, to_string};
use typed_json_search::{cat::*, prelude::*};

#[test]
fn segments() {
  let response = from_str::<SegmentsResponse>(
    r#"[
      {"index": "fruits", "shard": "0", "prirep": "p", "ip": "127.0.0.1", "segment": "_0",
        "generation": "0", "docs.count": "12", "docs.deleted": "0", "size": "9.1kb",
        "size.memory": "0b", "committed": "true", "searchable": "true", "version": "9.7.0",
        "compound": "true"},
      {"i": "fruits", "s": "0", "p": "r", "seg": "_1", "g": "1", "dc": "3", "dd": "1"},
      {"idx": "fruits", "primaryOrReplica": "r", "docsCount": "4", "sizeMemory": "1kb",
        "isCommitted": "false", "isSearchable": "false", "v": "9.7.0", "isCompound": "false"}
    ]"#,
    &DecodeOptions::strict(),
  )
  .unwrap();

  let records = response.value_body();
  assert_eq!(records.len(), 3);
  assert_eq!(records[0].docs_count(), Some("12"));
  assert_eq!(records[0].size_memory(), Some("0b"));
  assert_eq!(records[0].id(), None);
  assert_eq!(records[1].index(), Some("fruits"));
  assert_eq!(records[1].prirep(), Some("r"));
  assert_eq!(records[1].docs_deleted(), Some("1"));
  assert_eq!(records[2].docs_count(), Some("4"));
  assert_eq!(records[2].searchable(), Some("false"));
  assert_eq!(records[2].compound(), Some("false"));

  // Serialized under the primary names.
  let json = to_string(&response).unwrap();
  assert!(json.starts_with(r#"[{"index":"fruits","shard":"0","prirep":"p""#));
  assert_eq!(from_str::<SegmentsResponse>(&json, &DecodeOptions::strict()).unwrap(), response);
}

#[test]
fn bare_array() {
  let options = DecodeOptions::strict();
  assert!(from_str::<SegmentsResponse>("[]", &options).unwrap().value_body().is_empty());
  assert!(matches!(
    from_str::<SegmentsResponse>(r#"{"index": "fruits"}"#, &options),
    Err(JsonError::UnexpectedTokenShape { .. })
  ));
  assert_eq!(
    SegmentsResponse::builder().build(),
    Err(JsonError::MissingRequiredField { owner: "SegmentsResponse", field: "value_body" }),
  );
  assert_eq!(
    from_str::<SegmentsResponse>(r#"[{"unknown": "1"}]"#, &options),
    Err(JsonError::UnknownField { owner: "SegmentsRecord", field: "unknown".to_string() }),
  );
}

#[test]
fn builder() {
  let response = SegmentsResponse::builder()
    .add_value_body_with(|record| record.index("fruits").segment("_0").build())
    .unwrap()
    .add_value_body(SegmentsRecord::builder().index("vegetables").build().unwrap())
    .build()
    .unwrap();
  assert_eq!(
    to_string(&response).unwrap(),
    r#"[{"index":"fruits","segment":"_0"},{"index":"vegetables"}]"#
  );
}

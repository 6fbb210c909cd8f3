#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]
#![deny(missing_docs)]

mod error;
mod event;
mod string;
mod number;
mod tokenizer;
mod cursor;
mod writer;

pub use error::{JsonError, Result};
pub use event::{Number, Event, EventKind};
pub use tokenizer::{DEFAULT_MAX_DEPTH, Tokenizer};
pub use cursor::{Cursor, Replay};
pub use writer::{Generator, JsonWriter, EventRecorder};

/// Replay a sequence of events into a `Generator`.
///
/// This writes exactly one value, the next one within `cursor`.
pub fn transcribe(cursor: &mut dyn Cursor, generator: &mut dyn Generator) -> Result<()> {
  let mut depth = 0usize;
  loop {
    match cursor.expect_next()? {
      Event::StartObject => {
        depth += 1;
        generator.write_start_object()?;
      }
      Event::StartArray => {
        depth += 1;
        generator.write_start_array()?;
      }
      Event::EndObject => {
        depth = depth.saturating_sub(1);
        generator.write_end_object()?;
      }
      Event::EndArray => {
        depth = depth.saturating_sub(1);
        generator.write_end_array()?;
      }
      Event::Key(key) => generator.write_key(&key)?,
      Event::String(value) => generator.write_str(&value)?,
      Event::Number(value) => generator.write_number(value)?,
      Event::Bool(value) => generator.write_bool(value)?,
      Event::Null => generator.write_null()?,
    }
    if depth == 0 {
      return Ok(());
    }
  }
}

#[test]
fn transcribe_reformats() {
  let mut tokenizer = Tokenizer::new(br#" { "a" : [ 1 , 2.5e0 , "A" ] , "b" : { } } "#);
  let mut writer = JsonWriter::new();
  transcribe(&mut tokenizer, &mut writer).unwrap();
  tokenizer.finish().unwrap();
  assert_eq!(writer.into_string().unwrap(), r#"{"a":[1,2.5,"A"],"b":{}}"#);
}

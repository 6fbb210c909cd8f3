use crate::{Event, Number, JsonError, Replay};

/// A push-style sink for JSON tokens.
///
/// Values serialize themselves by calling these methods in document order. Implementations
/// reject sequences which don't form a single, well-formed JSON value.
pub trait Generator {
  /// Write `{`.
  fn write_start_object(&mut self) -> Result<(), JsonError>;
  /// Write `}`.
  fn write_end_object(&mut self) -> Result<(), JsonError>;
  /// Write `[`.
  fn write_start_array(&mut self) -> Result<(), JsonError>;
  /// Write `]`.
  fn write_end_array(&mut self) -> Result<(), JsonError>;
  /// Write the key of a field. This must be followed by the field's value.
  fn write_key(&mut self, key: &str) -> Result<(), JsonError>;
  /// Write a string value.
  fn write_str(&mut self, value: &str) -> Result<(), JsonError>;
  /// Write an integer value.
  fn write_i64(&mut self, value: i64) -> Result<(), JsonError>;
  /// Write a float value.
  ///
  /// JSON cannot represent `NaN` or infinities, which are rejected.
  fn write_f64(&mut self, value: f64) -> Result<(), JsonError>;
  /// Write a boolean value.
  fn write_bool(&mut self, value: bool) -> Result<(), JsonError>;
  /// Write `null`.
  fn write_null(&mut self) -> Result<(), JsonError>;

  /// Write a number value.
  fn write_number(&mut self, value: Number) -> Result<(), JsonError> {
    match value {
      Number::Integer(value) => self.write_i64(value),
      Number::Float(value) => self.write_f64(value),
    }
  }
}

#[derive(Clone, Copy, Debug)]
enum Frame {
  Object { awaiting_value: bool, empty: bool },
  Array { empty: bool },
}

/// Tracks the structure being written, to validate it and place separators.
#[derive(Default, Debug)]
struct Structure {
  frames: Vec<Frame>,
  complete: bool,
  written: usize,
}

impl Structure {
  fn error(&self, reason: &'static str) -> JsonError {
    JsonError::malformed(reason, self.written)
  }

  /// Begin a value, returning if a `,` must precede it.
  fn value(&mut self) -> Result<bool, JsonError> {
    let written = self.written;
    let comma = match self.frames.last_mut() {
      None => {
        if self.complete {
          Err(JsonError::malformed("multiple values at the top level", written))?;
        }
        false
      }
      Some(Frame::Object { awaiting_value, .. }) => {
        if !*awaiting_value {
          Err(JsonError::malformed("value within an object without a key", written))?;
        }
        *awaiting_value = false;
        false
      }
      Some(Frame::Array { empty }) => {
        let comma = !*empty;
        *empty = false;
        comma
      }
    };
    self.written += 1;
    Ok(comma)
  }

  fn scalar(&mut self) -> Result<bool, JsonError> {
    let comma = self.value()?;
    if self.frames.is_empty() {
      self.complete = true;
    }
    Ok(comma)
  }

  fn key(&mut self) -> Result<bool, JsonError> {
    let comma = match self.frames.last_mut() {
      Some(Frame::Object { awaiting_value: awaiting_value @ false, empty }) => {
        let comma = !*empty;
        *empty = false;
        *awaiting_value = true;
        comma
      }
      _ => Err(self.error("key outside of an object"))?,
    };
    self.written += 1;
    Ok(comma)
  }

  fn open(&mut self, frame: Frame) -> Result<bool, JsonError> {
    let comma = self.value()?;
    self.frames.push(frame);
    Ok(comma)
  }

  fn close_object(&mut self) -> Result<(), JsonError> {
    match self.frames.last() {
      Some(Frame::Object { awaiting_value: false, .. }) => {}
      Some(Frame::Object { awaiting_value: true, .. }) => Err(self.error("key without a value"))?,
      _ => Err(self.error("end of an object which wasn't opened"))?,
    }
    self.frames.pop();
    self.closed();
    Ok(())
  }

  fn close_array(&mut self) -> Result<(), JsonError> {
    if !matches!(self.frames.last(), Some(Frame::Array { .. })) {
      Err(self.error("end of an array which wasn't opened"))?;
    }
    self.frames.pop();
    self.closed();
    Ok(())
  }

  fn closed(&mut self) {
    self.written += 1;
    if self.frames.is_empty() {
      self.complete = true;
    }
  }

  fn finish(&self) -> Result<(), JsonError> {
    if !self.complete {
      Err(self.error("incomplete value"))?;
    }
    Ok(())
  }
}

/// Write a string, quoted and escaped, to `out`.
fn write_escaped(out: &mut String, value: &str) {
  const HEX: &[u8; 16] = b"0123456789abcdef";

  out.push('"');
  for char in value.chars() {
    match char {
      '"' => out.push_str("\\\""),
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\x08' => out.push_str("\\b"),
      '\x0c' => out.push_str("\\f"),
      // The remaining control characters must be escaped as `\u00XX`
      '\x00' ..= '\x1f' => {
        let byte = char as usize;
        out.push_str("\\u00");
        out.push(char::from(HEX[byte >> 4]));
        out.push(char::from(HEX[byte & 0b1111]));
      }
      _ => out.push(char),
    }
  }
  out.push('"');
}

/// A `Generator` which renders compact JSON text.
#[derive(Default, Debug)]
pub struct JsonWriter {
  out: String,
  structure: Structure,
}

impl JsonWriter {
  /// Create a new writer.
  pub fn new() -> Self {
    Self::default()
  }

  /// The text written, erroring if it isn't a complete value.
  pub fn into_string(self) -> Result<String, JsonError> {
    self.structure.finish()?;
    Ok(self.out)
  }

  fn separate(&mut self, comma: bool) {
    if comma {
      self.out.push(',');
    }
  }
}

impl Generator for JsonWriter {
  fn write_start_object(&mut self) -> Result<(), JsonError> {
    let comma = self.structure.open(Frame::Object { awaiting_value: false, empty: true })?;
    self.separate(comma);
    self.out.push('{');
    Ok(())
  }

  fn write_end_object(&mut self) -> Result<(), JsonError> {
    self.structure.close_object()?;
    self.out.push('}');
    Ok(())
  }

  fn write_start_array(&mut self) -> Result<(), JsonError> {
    let comma = self.structure.open(Frame::Array { empty: true })?;
    self.separate(comma);
    self.out.push('[');
    Ok(())
  }

  fn write_end_array(&mut self) -> Result<(), JsonError> {
    self.structure.close_array()?;
    self.out.push(']');
    Ok(())
  }

  fn write_key(&mut self, key: &str) -> Result<(), JsonError> {
    let comma = self.structure.key()?;
    self.separate(comma);
    write_escaped(&mut self.out, key);
    self.out.push(':');
    Ok(())
  }

  fn write_str(&mut self, value: &str) -> Result<(), JsonError> {
    let comma = self.structure.scalar()?;
    self.separate(comma);
    write_escaped(&mut self.out, value);
    Ok(())
  }

  fn write_i64(&mut self, value: i64) -> Result<(), JsonError> {
    let comma = self.structure.scalar()?;
    self.separate(comma);
    self.out.push_str(&value.to_string());
    Ok(())
  }

  fn write_f64(&mut self, value: f64) -> Result<(), JsonError> {
    if !value.is_finite() {
      Err(self.structure.error("non-finite number"))?;
    }
    let comma = self.structure.scalar()?;
    self.separate(comma);
    // Rust's `Display` for `f64` never uses an exponent and is the shortest string which
    // round-trips. We ensure a fractional part so the number is read back as a float.
    let value = value.to_string();
    self.out.push_str(&value);
    if !value.contains('.') {
      self.out.push_str(".0");
    }
    Ok(())
  }

  fn write_bool(&mut self, value: bool) -> Result<(), JsonError> {
    let comma = self.structure.scalar()?;
    self.separate(comma);
    self.out.push_str(if value { "true" } else { "false" });
    Ok(())
  }

  fn write_null(&mut self) -> Result<(), JsonError> {
    let comma = self.structure.scalar()?;
    self.separate(comma);
    self.out.push_str("null");
    Ok(())
  }
}

/// A `Generator` which records the events written.
#[derive(Default, Debug)]
pub struct EventRecorder {
  events: Vec<Event>,
  structure: Structure,
}

impl EventRecorder {
  /// Create a new recorder.
  pub fn new() -> Self {
    Self::default()
  }

  /// The events recorded, erroring if they aren't a complete value.
  pub fn into_replay(self) -> Result<Replay, JsonError> {
    self.structure.finish()?;
    Ok(Replay::new(self.events))
  }
}

impl Generator for EventRecorder {
  fn write_start_object(&mut self) -> Result<(), JsonError> {
    self.structure.open(Frame::Object { awaiting_value: false, empty: true })?;
    self.events.push(Event::StartObject);
    Ok(())
  }

  fn write_end_object(&mut self) -> Result<(), JsonError> {
    self.structure.close_object()?;
    self.events.push(Event::EndObject);
    Ok(())
  }

  fn write_start_array(&mut self) -> Result<(), JsonError> {
    self.structure.open(Frame::Array { empty: true })?;
    self.events.push(Event::StartArray);
    Ok(())
  }

  fn write_end_array(&mut self) -> Result<(), JsonError> {
    self.structure.close_array()?;
    self.events.push(Event::EndArray);
    Ok(())
  }

  fn write_key(&mut self, key: &str) -> Result<(), JsonError> {
    self.structure.key()?;
    self.events.push(Event::Key(key.to_string()));
    Ok(())
  }

  fn write_str(&mut self, value: &str) -> Result<(), JsonError> {
    self.structure.scalar()?;
    self.events.push(Event::String(value.to_string()));
    Ok(())
  }

  fn write_i64(&mut self, value: i64) -> Result<(), JsonError> {
    self.structure.scalar()?;
    self.events.push(Event::Number(Number::Integer(value)));
    Ok(())
  }

  fn write_f64(&mut self, value: f64) -> Result<(), JsonError> {
    if !value.is_finite() {
      Err(self.structure.error("non-finite number"))?;
    }
    self.structure.scalar()?;
    self.events.push(Event::Number(Number::Float(value)));
    Ok(())
  }

  fn write_bool(&mut self, value: bool) -> Result<(), JsonError> {
    self.structure.scalar()?;
    self.events.push(Event::Bool(value));
    Ok(())
  }

  fn write_null(&mut self) -> Result<(), JsonError> {
    self.structure.scalar()?;
    self.events.push(Event::Null);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn writes_compact_json() {
    let mut writer = JsonWriter::new();
    writer.write_start_object().unwrap();
    writer.write_key("a").unwrap();
    writer.write_start_array().unwrap();
    writer.write_i64(1).unwrap();
    writer.write_f64(2.0).unwrap();
    writer.write_f64(-0.25).unwrap();
    writer.write_str("q\"\\\n\u{1}é").unwrap();
    writer.write_end_array().unwrap();
    writer.write_key("b").unwrap();
    writer.write_null().unwrap();
    writer.write_key("c").unwrap();
    writer.write_bool(false).unwrap();
    writer.write_end_object().unwrap();
    assert_eq!(
      writer.into_string().unwrap(),
      r#"{"a":[1,2.0,-0.25,"q\"\\\n\u0001é"],"b":null,"c":false}"#
    );
  }

  #[test]
  fn rejects_malformed_structure() {
    let mut writer = JsonWriter::new();
    writer.write_start_object().unwrap();
    assert!(writer.write_i64(1).is_err());

    let mut writer = JsonWriter::new();
    assert!(writer.write_key("a").is_err());

    let mut writer = JsonWriter::new();
    writer.write_start_array().unwrap();
    assert!(writer.write_end_object().is_err());

    let mut writer = JsonWriter::new();
    writer.write_start_object().unwrap();
    writer.write_key("a").unwrap();
    assert!(writer.write_end_object().is_err());

    let mut writer = JsonWriter::new();
    writer.write_null().unwrap();
    assert!(writer.write_null().is_err());

    let mut writer = JsonWriter::new();
    assert!(writer.write_f64(f64::NAN).is_err());

    let mut writer = JsonWriter::new();
    writer.write_start_array().unwrap();
    assert!(writer.into_string().is_err());
  }

  #[test]
  fn rejects_value_without_key() {
    let mut writer = JsonWriter::new();
    writer.write_start_object().unwrap();
    writer.write_key("a").unwrap();
    writer.write_bool(true).unwrap();
    assert_eq!(
      writer.write_bool(false),
      Err(JsonError::malformed("value within an object without a key", 3))
    );
  }

  #[test]
  fn records_events() {
    let mut recorder = EventRecorder::new();
    recorder.write_start_array().unwrap();
    recorder.write_str("x").unwrap();
    recorder.write_f64(1.5).unwrap();
    recorder.write_end_array().unwrap();
    assert_eq!(
      recorder.into_replay().unwrap().events(),
      &[
        Event::StartArray,
        Event::String("x".to_string()),
        Event::Number(Number::Float(1.5)),
        Event::EndArray,
      ]
    );
  }
}

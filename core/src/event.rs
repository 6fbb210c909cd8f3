use core::fmt;

/// A RFC-8259 number.
///
/// Numbers without a fraction or exponent which fit within an `i64` are read as integers. All
/// other numbers are read as an `f64`.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Number {
  /// An integer.
  Integer(i64),
  /// A float.
  Float(f64),
}

impl Number {
  /// This number as an `i64`.
  ///
  /// Floats are accepted if they exactly represent an integer within range.
  #[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
  pub fn as_i64(self) -> Option<i64> {
    match self {
      Number::Integer(value) => Some(value),
      Number::Float(value) => {
        // `i64::MIN` is exactly representable, `i64::MAX` is not (it rounds up to `2**63`)
        const BOUND: f64 = 9_223_372_036_854_775_808.0;
        ((value.fract() == 0.0) && (value >= -BOUND) && (value < BOUND)).then_some(value as i64)
      }
    }
  }

  /// This number as an `f64`.
  ///
  /// Integers of a magnitude beyond `2**53` will be rounded.
  #[allow(clippy::cast_precision_loss)]
  pub fn as_f64(self) -> f64 {
    match self {
      Number::Integer(value) => value as f64,
      Number::Float(value) => value,
    }
  }
}

impl fmt::Display for Number {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Number::Integer(value) => value.fmt(f),
      Number::Float(value) => value.fmt(f),
    }
  }
}

/// A token within a JSON stream.
#[derive(Clone, PartialEq, Debug)]
pub enum Event {
  /// `{`
  StartObject,
  /// `}`
  EndObject,
  /// `[`
  StartArray,
  /// `]`
  EndArray,
  /// The key of a field within an object.
  Key(String),
  /// A string value.
  String(String),
  /// A number value.
  Number(Number),
  /// A boolean value.
  Bool(bool),
  /// The `null` unit value.
  Null,
}

impl Event {
  /// The kind of this event.
  pub fn kind(&self) -> EventKind {
    match self {
      Event::StartObject => EventKind::StartObject,
      Event::EndObject => EventKind::EndObject,
      Event::StartArray => EventKind::StartArray,
      Event::EndArray => EventKind::EndArray,
      Event::Key(_) => EventKind::Key,
      Event::String(_) => EventKind::String,
      Event::Number(_) => EventKind::Number,
      Event::Bool(_) => EventKind::Bool,
      Event::Null => EventKind::Null,
    }
  }
}

/// The kind of an `Event`, without its payload.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum EventKind {
  /// `{`
  StartObject,
  /// `}`
  EndObject,
  /// `[`
  StartArray,
  /// `]`
  EndArray,
  /// The key of a field.
  Key,
  /// A string.
  String,
  /// A number.
  Number,
  /// A boolean.
  Bool,
  /// `null`.
  Null,
  /// The end of the stream.
  End,
}

impl fmt::Display for EventKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      EventKind::StartObject => "an object",
      EventKind::EndObject => "the end of an object",
      EventKind::StartArray => "an array",
      EventKind::EndArray => "the end of an array",
      EventKind::Key => "a key",
      EventKind::String => "a string",
      EventKind::Number => "a number",
      EventKind::Bool => "a boolean",
      EventKind::Null => "null",
      EventKind::End => "the end of the stream",
    })
  }
}

#[test]
fn integral_floats() {
  assert_eq!(Number::Float(3.0).as_i64(), Some(3));
  assert_eq!(Number::Float(-0.0).as_i64(), Some(0));
  assert_eq!(Number::Float(3.5).as_i64(), None);
  assert_eq!(Number::Float(1e19).as_i64(), None);
  assert_eq!(Number::Float(-9_223_372_036_854_775_808.0).as_i64(), Some(i64::MIN));
  assert_eq!(Number::Integer(7).as_f64().to_bits(), 7f64.to_bits());
}

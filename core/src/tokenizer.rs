use crate::{Event, JsonError, Cursor, string::read_string, number::read_number};

/// The default limit on how deeply a document may nest objects and arrays.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// An item within the stack, representing the state during tokenization.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
  /// Within an object, positioned before a key or its close.
  Object,
  /// Within an array, positioned before a value or its close.
  Array,
  /// A value is expected next.
  Value,
}

/// A tokenizer for a JSON-encoded document held within a byte slice.
///
/// This yields the events for exactly one value. Once that value is complete, `finish` checks
/// only whitespace follows it.
#[derive(Debug)]
pub struct Tokenizer<'bytes> {
  bytes: &'bytes [u8],
  offset: usize,
  stack: Vec<State>,
  /// The amount of objects and arrays currently open.
  depth: usize,
  max_depth: usize,
  peeked: Option<Event>,
  /*
    Once an error occurs, the position within the bytes is undefined. We store the error here so
    every successive call yields it, instead of reading from an arbitrary position.
  */
  error: Option<JsonError>,
}

/// https://datatracker.ietf.org/doc/html/rfc8259#section-2 defines whitespace as follows.
#[inline(always)]
fn is_whitespace(byte: u8) -> bool {
  matches!(byte, b'\x20' | b'\x09' | b'\x0A' | b'\x0D')
}

impl<'bytes> Tokenizer<'bytes> {
  /// Create a new tokenizer with the default depth limit.
  pub fn new(bytes: &'bytes [u8]) -> Self {
    Self::with_max_depth(bytes, DEFAULT_MAX_DEPTH)
  }

  /// Create a new tokenizer which errors if objects and arrays nest beyond `max_depth`.
  pub fn with_max_depth(bytes: &'bytes [u8], max_depth: usize) -> Self {
    let mut tokenizer = Tokenizer {
      bytes,
      offset: 0,
      stack: vec![State::Value],
      depth: 0,
      max_depth,
      peeked: None,
      error: None,
    };
    tokenizer.advance_whitespace();
    tokenizer
  }

  /// Check the document's value was completely read and only whitespace follows it.
  pub fn finish(&mut self) -> Result<(), JsonError> {
    if let Some(err) = &self.error {
      Err(err.clone())?;
    }
    if self.peeked.is_some() || (!self.stack.is_empty()) {
      Err(JsonError::malformed("the value was not completely read", self.offset))?;
    }
    self.advance_whitespace();
    if self.offset != self.bytes.len() {
      Err(JsonError::malformed("trailing characters after the value", self.offset))?;
    }
    Ok(())
  }

  #[inline(always)]
  fn peek_byte(&self) -> Option<u8> {
    self.bytes.get(self.offset).copied()
  }

  #[inline(always)]
  fn advance_whitespace(&mut self) {
    while self.peek_byte().is_some_and(is_whitespace) {
      self.offset += 1;
    }
  }

  /// Advance past a colon.
  fn advance_past_colon(&mut self) -> Result<(), JsonError> {
    self.advance_whitespace();
    if self.peek_byte() != Some(b':') {
      Err(JsonError::malformed("expected `:` after a key", self.offset))?;
    }
    self.offset += 1;
    self.advance_whitespace();
    Ok(())
  }

  /// Advance past the comma after a value, or to the close of the structure containing it.
  fn advance_past_comma_or_to_close(&mut self) -> Result<(), JsonError> {
    self.advance_whitespace();
    let Some(parent) = self.stack.last().copied() else {
      // This was the document's value
      return Ok(());
    };
    match (self.peek_byte(), parent) {
      (Some(b','), _) => {
        self.offset += 1;
        self.advance_whitespace();
        if matches!(self.peek_byte(), Some(b']' | b'}')) {
          Err(JsonError::malformed("trailing comma", self.offset))?;
        }
      }
      (Some(b'}'), State::Object) | (Some(b']'), State::Array) => {}
      (Some(b'}' | b']'), _) => Err(JsonError::malformed("mismatched delimiter", self.offset))?,
      (None, _) => Err(JsonError::malformed("unexpected end of document", self.offset))?,
      _ => Err(JsonError::malformed("expected `,` or the end of the structure", self.offset))?,
    }
    Ok(())
  }

  fn open(&mut self, state: State) -> Result<(), JsonError> {
    if self.depth == self.max_depth {
      Err(JsonError::DepthExceeded { max: self.max_depth })?;
    }
    self.depth += 1;
    self.offset += 1;
    self.advance_whitespace();
    self.stack.push(state);
    Ok(())
  }

  fn close(&mut self) -> Result<(), JsonError> {
    self.stack.pop();
    self.depth -= 1;
    self.offset += 1;
    self.advance_past_comma_or_to_close()
  }

  fn literal(&mut self, literal: &'static [u8], event: Event) -> Result<Event, JsonError> {
    if self.bytes.get(self.offset .. (self.offset + literal.len())) != Some(literal) {
      Err(JsonError::malformed("invalid literal", self.offset))?;
    }
    self.offset += literal.len();
    self.advance_past_comma_or_to_close()?;
    Ok(event)
  }

  /// Step the tokenizer forwards, yielding the next event.
  fn single_step(&mut self) -> Result<Option<Event>, JsonError> {
    loop {
      let Some(state) = self.stack.last().copied() else { return Ok(None) };
      match state {
        State::Object => {
          return match self.peek_byte() {
            Some(b'}') => {
              self.close()?;
              Ok(Some(Event::EndObject))
            }
            Some(b'"') => {
              let (key, offset) = read_string(self.bytes, self.offset + 1)?;
              self.offset = offset;
              self.advance_past_colon()?;
              self.stack.push(State::Value);
              Ok(Some(Event::Key(key)))
            }
            _ => Err(JsonError::malformed("expected a key", self.offset)),
          };
        }
        State::Array => {
          if self.peek_byte() == Some(b']') {
            self.close()?;
            return Ok(Some(Event::EndArray));
          }
          // Since the array doesn't terminate, read the next value
          self.stack.push(State::Value);
        }
        State::Value => {
          self.stack.pop();
          return match self.peek_byte() {
            Some(b'{') => {
              self.open(State::Object)?;
              Ok(Some(Event::StartObject))
            }
            Some(b'[') => {
              self.open(State::Array)?;
              Ok(Some(Event::StartArray))
            }
            Some(b'"') => {
              let (string, offset) = read_string(self.bytes, self.offset + 1)?;
              self.offset = offset;
              self.advance_past_comma_or_to_close()?;
              Ok(Some(Event::String(string)))
            }
            Some(b't') => self.literal(b"true", Event::Bool(true)).map(Some),
            Some(b'f') => self.literal(b"false", Event::Bool(false)).map(Some),
            Some(b'n') => self.literal(b"null", Event::Null).map(Some),
            Some(b'-' | b'0' ..= b'9') => {
              let (number, offset) = read_number(self.bytes, self.offset)?;
              self.offset = offset;
              self.advance_past_comma_or_to_close()?;
              Ok(Some(Event::Number(number)))
            }
            None => Err(JsonError::malformed("unexpected end of document", self.offset)),
            Some(_) => Err(JsonError::malformed("invalid value", self.offset)),
          };
        }
      }
    }
  }

  fn step(&mut self) -> Result<Option<Event>, JsonError> {
    if let Some(err) = &self.error {
      Err(err.clone())?;
    }
    let res = self.single_step();
    if let Err(e) = &res {
      self.error = Some(e.clone());
    }
    res
  }
}

impl Cursor for Tokenizer<'_> {
  fn peek(&mut self) -> Result<Option<&Event>, JsonError> {
    if self.peeked.is_none() {
      self.peeked = self.step()?;
    }
    Ok(self.peeked.as_ref())
  }

  fn next_event(&mut self) -> Result<Option<Event>, JsonError> {
    match self.peeked.take() {
      Some(event) => Ok(Some(event)),
      None => self.step(),
    }
  }

  fn position(&self) -> usize {
    self.offset
  }
}

#[cfg(test)]
fn tokenize(json: &str) -> Result<Vec<Event>, JsonError> {
  let mut tokenizer = Tokenizer::new(json.as_bytes());
  let mut events = vec![];
  while let Some(event) = tokenizer.next_event()? {
    events.push(event);
  }
  tokenizer.finish()?;
  Ok(events)
}

#[test]
fn tokenizes() {
  use crate::Number;

  assert_eq!(
    tokenize(r#" { "a" : [1, -2.5, "x", true, false, null, {}], "b": {"c": []} } "#).unwrap(),
    vec![
      Event::StartObject,
      Event::Key("a".to_string()),
      Event::StartArray,
      Event::Number(Number::Integer(1)),
      Event::Number(Number::Float(-2.5)),
      Event::String("x".to_string()),
      Event::Bool(true),
      Event::Bool(false),
      Event::Null,
      Event::StartObject,
      Event::EndObject,
      Event::EndArray,
      Event::Key("b".to_string()),
      Event::StartObject,
      Event::Key("c".to_string()),
      Event::StartArray,
      Event::EndArray,
      Event::EndObject,
      Event::EndObject,
    ]
  );
  assert_eq!(tokenize("3").unwrap(), vec![Event::Number(Number::Integer(3))]);
  assert_eq!(tokenize(r#""s""#).unwrap(), vec![Event::String("s".to_string())]);
}

#[test]
fn rejects_malformed() {
  for json in [
    "",
    "{",
    "[1,]",
    r#"{"a":1,}"#,
    "[1 2]",
    "[1}",
    r#"{"a":1]"#,
    r#"{"a" 1}"#,
    "{1:2}",
    "[01]",
    "tru",
    "nul",
    "[1] 2",
    r#"{"a":}"#,
    "[,1]",
  ] {
    assert!(
      matches!(tokenize(json), Err(JsonError::MalformedStream { .. })),
      "{json} was not rejected"
    );
  }
}

#[test]
fn depth_limit() {
  let mut tokenizer = Tokenizer::with_max_depth(b"[[[]]]", 2);
  assert_eq!(tokenizer.next_event().unwrap(), Some(Event::StartArray));
  assert_eq!(tokenizer.next_event().unwrap(), Some(Event::StartArray));
  assert_eq!(tokenizer.next_event(), Err(JsonError::DepthExceeded { max: 2 }));
  // The error is sticky
  assert_eq!(tokenizer.next_event(), Err(JsonError::DepthExceeded { max: 2 }));
}

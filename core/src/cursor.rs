use crate::{Event, EventKind, JsonError};

/// A cursor over a stream of JSON events.
///
/// The events yielded are expected to be well-formed (balanced structures, a value after every
/// key). `Tokenizer` guarantees this for text. `Replay` only guarantees it for events captured
/// from another cursor or recorded by an `EventRecorder`.
pub trait Cursor {
  /// Peek at the next event without consuming it.
  ///
  /// `None` is returned once the stream has ended.
  fn peek(&mut self) -> Result<Option<&Event>, JsonError>;

  /// Consume the next event.
  ///
  /// `None` is returned once the stream has ended.
  fn next_event(&mut self) -> Result<Option<Event>, JsonError>;

  /// The current position within the stream, for diagnostics.
  fn position(&self) -> usize;

  /// Consume the next event, erroring if the stream has ended.
  fn expect_next(&mut self) -> Result<Event, JsonError> {
    let position = self.position();
    self.next_event()?.ok_or(JsonError::malformed("unexpected end of stream", position))
  }

  /// The kind of the next event, without consuming it.
  fn peek_kind(&mut self) -> Result<EventKind, JsonError> {
    Ok(self.peek()?.map_or(EventKind::End, Event::kind))
  }

  /// Advance past the next value, whatever its shape.
  ///
  /// This consumes exactly one complete value (a scalar, or an object/array with everything
  /// within it), leaving the cursor positioned at whatever follows it.
  fn skip_value(&mut self) -> Result<(), JsonError> {
    let mut depth = 0usize;
    loop {
      let position = self.position();
      match self.expect_next()? {
        Event::StartObject | Event::StartArray => depth += 1,
        Event::EndObject | Event::EndArray => {
          depth = depth
            .checked_sub(1)
            .ok_or(JsonError::malformed("end of a structure which wasn't opened", position))?;
        }
        Event::Key(_) => {
          if depth == 0 {
            Err(JsonError::malformed("key where a value was expected", position))?;
          }
        }
        Event::String(_) | Event::Number(_) | Event::Bool(_) | Event::Null => {}
      }
      if depth == 0 {
        return Ok(());
      }
    }
  }

  /// Move the next value, whatever its shape, into a `Replay`.
  fn capture_value(&mut self) -> Result<Replay, JsonError> {
    let mut events = vec![];
    let mut depth = 0usize;
    loop {
      let position = self.position();
      let event = self.expect_next()?;
      match &event {
        Event::StartObject | Event::StartArray => depth += 1,
        Event::EndObject | Event::EndArray => {
          depth = depth
            .checked_sub(1)
            .ok_or(JsonError::malformed("end of a structure which wasn't opened", position))?;
        }
        Event::Key(_) => {
          if depth == 0 {
            Err(JsonError::malformed("key where a value was expected", position))?;
          }
        }
        Event::String(_) | Event::Number(_) | Event::Bool(_) | Event::Null => {}
      }
      events.push(event);
      if depth == 0 {
        return Ok(Replay::new(events));
      }
    }
  }
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
  fn peek(&mut self) -> Result<Option<&Event>, JsonError> {
    (**self).peek()
  }
  fn next_event(&mut self) -> Result<Option<Event>, JsonError> {
    (**self).next_event()
  }
  fn position(&self) -> usize {
    (**self).position()
  }
}

/// A buffered sequence of events which may be read, rewound, and read again.
#[derive(Clone, PartialEq, Default, Debug)]
pub struct Replay {
  events: Vec<Event>,
  position: usize,
}

impl Replay {
  /// Create a replay of the specified events, positioned at the first.
  pub fn new(events: Vec<Event>) -> Self {
    Replay { events, position: 0 }
  }

  /// The events within this replay.
  pub fn events(&self) -> &[Event] {
    &self.events
  }

  /// Move the position back to the first event.
  pub fn rewind(&mut self) {
    self.position = 0;
  }

  /// If every event has been read.
  pub fn is_exhausted(&self) -> bool {
    self.position == self.events.len()
  }

  /// Find a field within the object at the current position, without consuming anything.
  ///
  /// The field is searched for solely within the object itself, not any structures nested within
  /// it. Returns the first event of the field's value, or `None` if the current position isn't an
  /// object or the object doesn't have this field.
  pub fn find_field(&self, name: &str) -> Option<&Event> {
    if self.events.get(self.position) != Some(&Event::StartObject) {
      None?;
    }
    let mut depth = 0usize;
    let mut events = self.events[self.position ..].iter();
    while let Some(event) = events.next() {
      match event {
        Event::StartObject | Event::StartArray => depth += 1,
        Event::EndObject | Event::EndArray => {
          depth -= 1;
          if depth == 0 {
            break;
          }
        }
        Event::Key(key) if (depth == 1) && (key == name) => return events.next(),
        _ => {}
      }
    }
    None
  }
}

impl From<Vec<Event>> for Replay {
  fn from(events: Vec<Event>) -> Self {
    Replay::new(events)
  }
}

impl Cursor for Replay {
  fn peek(&mut self) -> Result<Option<&Event>, JsonError> {
    Ok(self.events.get(self.position))
  }

  fn next_event(&mut self) -> Result<Option<Event>, JsonError> {
    let event = self.events.get(self.position).cloned();
    if event.is_some() {
      self.position += 1;
    }
    Ok(event)
  }

  fn position(&self) -> usize {
    self.position
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{Number, Tokenizer};

  const DOCUMENT: &str = r#"{"skip": {"a": [1, {"b": null}], "c": "d"}, "after": 5}"#;

  #[test]
  fn skip_value_realigns() {
    let mut tokenizer = Tokenizer::new(DOCUMENT.as_bytes());
    assert_eq!(tokenizer.expect_next().unwrap(), Event::StartObject);
    assert_eq!(tokenizer.expect_next().unwrap(), Event::Key("skip".to_string()));
    tokenizer.skip_value().unwrap();
    assert_eq!(tokenizer.expect_next().unwrap(), Event::Key("after".to_string()));
    tokenizer.skip_value().unwrap();
    assert_eq!(tokenizer.expect_next().unwrap(), Event::EndObject);
    tokenizer.finish().unwrap();
  }

  #[test]
  fn capture_and_find() {
    let mut tokenizer = Tokenizer::new(DOCUMENT.as_bytes());
    let mut replay = tokenizer.capture_value().unwrap();
    tokenizer.finish().unwrap();

    // Only top-level fields are found
    assert_eq!(replay.find_field("after"), Some(&Event::Number(Number::Integer(5))));
    assert_eq!(replay.find_field("skip"), Some(&Event::StartObject));
    assert_eq!(replay.find_field("c"), None);
    assert_eq!(replay.find_field("b"), None);

    let events = replay.events().len();
    replay.skip_value().unwrap();
    assert!(replay.is_exhausted());
    assert_eq!(replay.position(), events);
    replay.rewind();
    assert_eq!(replay.peek().unwrap(), Some(&Event::StartObject));
  }

  #[test]
  fn skip_rejects_unbalanced() {
    let mut replay = Replay::new(vec![Event::EndArray]);
    assert!(matches!(replay.skip_value(), Err(JsonError::MalformedStream { .. })));
    let mut replay = Replay::new(vec![Event::StartArray, Event::Null]);
    assert!(matches!(replay.skip_value(), Err(JsonError::MalformedStream { .. })));
  }
}

use crate::{Number, JsonError};

/// Read a number starting at `start`.
///
/// This applies the syntax from RFC-8259:
/// `[ minus ] int [ decimal-point 1*DIGIT ] [ e [ minus / plus ] 1*DIGIT ]`.
///
/// Returns the number and the offset immediately after it. This does not check what follows the
/// number, leaving it to the caller to require a delimiter.
pub(crate) fn read_number(bytes: &[u8], start: usize) -> Result<(Number, usize), JsonError> {
  let digits = |mut i: usize| {
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
      i += 1;
    }
    i
  };

  let mut i = start;
  if bytes.get(i) == Some(&b'-') {
    i += 1;
  }
  match bytes.get(i) {
    // Leading zeroes are not allowed, so a leading `0` is the entire integer part
    Some(b'0') => i += 1,
    Some(b'1' ..= b'9') => i = digits(i),
    _ => Err(JsonError::malformed("invalid number", start))?,
  }

  let mut integer = true;
  if bytes.get(i) == Some(&b'.') {
    integer = false;
    let end = digits(i + 1);
    if end == (i + 1) {
      Err(JsonError::malformed("number without digits after its decimal point", i))?;
    }
    i = end;
  }
  if matches!(bytes.get(i), Some(b'e' | b'E')) {
    integer = false;
    i += 1;
    if matches!(bytes.get(i), Some(b'+' | b'-')) {
      i += 1;
    }
    let end = digits(i);
    if end == i {
      Err(JsonError::malformed("number without digits in its exponent", i))?;
    }
    i = end;
  }

  let text = core::str::from_utf8(&bytes[start .. i])
    .map_err(|_| JsonError::malformed("invalid number", start))?;
  if integer {
    // Integers which don't fit within an `i64` fall through to being read as a float
    if let Ok(value) = text.parse::<i64>() {
      return Ok((Number::Integer(value), i));
    }
  }
  let value = text.parse::<f64>().map_err(|_| JsonError::malformed("invalid number", start))?;
  if !value.is_finite() {
    Err(JsonError::malformed("number out of range", start))?;
  }
  Ok((Number::Float(value), i))
}

#[test]
fn numbers() {
  let read = |s: &str| read_number(s.as_bytes(), 0);
  assert_eq!(read("0").unwrap(), (Number::Integer(0), 1));
  assert_eq!(read("-12,").unwrap(), (Number::Integer(-12), 3));
  assert_eq!(read("3.15]").unwrap(), (Number::Float(3.15), 4));
  assert_eq!(read("1e3").unwrap(), (Number::Float(1000.0), 3));
  assert_eq!(read("-2.5E-1").unwrap(), (Number::Float(-0.25), 7));
  assert_eq!(read("18446744073709551616").unwrap().0, Number::Float(18446744073709551616.0));
  // `01` is read as `0`, leaving the `1` for the caller to reject as a missing delimiter
  assert_eq!(read("01").unwrap(), (Number::Integer(0), 1));
  assert!(read("-").is_err());
  assert!(read("1.").is_err());
  assert!(read("1e").is_err());
  assert!(read(".5").is_err());
  assert!(read("1e999").is_err());
}

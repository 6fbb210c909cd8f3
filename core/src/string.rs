use crate::JsonError;

/// The value of a hex character.
#[inline(always)]
fn hex(b: u8) -> Option<u16> {
  match b {
    b'0' ..= b'9' => Some(u16::from(b - b'0')),
    b'a' ..= b'f' => Some(u16::from(b - b'a') + 10),
    b'A' ..= b'F' => Some(u16::from(b - b'A') + 10),
    _ => None,
  }
}

/// Read the four hex characters of a `\u` escape as a UTF-16 code unit.
fn read_code_unit(bytes: &[u8], offset: usize) -> Result<u16, JsonError> {
  let Some(digits) = bytes.get(offset .. (offset + 4)) else {
    return Err(JsonError::malformed("unterminated string", bytes.len()));
  };
  let mut unit = 0;
  for digit in digits {
    unit = (unit << 4) | hex(*digit).ok_or(JsonError::malformed("invalid `\\u` escape", offset))?;
  }
  Ok(unit)
}

/// Read a string, with its escape sequences handled.
///
/// `offset` is the offset immediately after the opening `"`. Returns the string and the offset
/// immediately after the closing `"`.
/*
  https://datatracker.ietf.org/doc/html/rfc8259#section-7 permits escaped surrogates which don't
  form a pair. As we yield a Rust `String`, such strings are rejected.
*/
pub(crate) fn read_string(bytes: &[u8], mut offset: usize) -> Result<(String, usize), JsonError> {
  let mut result = Vec::new();
  loop {
    let Some(&byte) = bytes.get(offset) else {
      return Err(JsonError::malformed("unterminated string", offset));
    };
    offset += 1;
    match byte {
      b'"' => break,
      b'\\' => {
        let Some(&escaped) = bytes.get(offset) else {
          return Err(JsonError::malformed("unterminated string", offset));
        };
        offset += 1;
        let char = match escaped {
          b'"' => '"',
          b'\\' => '\\',
          b'/' => '/',
          b'b' => '\x08',
          b'f' => '\x0c',
          b'n' => '\n',
          b'r' => '\r',
          b't' => '\t',
          b'u' => {
            let unit = read_code_unit(bytes, offset)?;
            offset += 4;
            match unit {
              // A high surrogate, which must be immediately followed by an escaped low surrogate
              0xd800 ..= 0xdbff => {
                if bytes.get(offset .. (offset + 2)) != Some(b"\\u".as_slice()) {
                  Err(JsonError::malformed("unpaired surrogate", offset))?;
                }
                let low = read_code_unit(bytes, offset + 2)?;
                if !(0xdc00 ..= 0xdfff).contains(&low) {
                  Err(JsonError::malformed("unpaired surrogate", offset))?;
                }
                offset += 6;
                let code_point =
                  0x10000 + ((u32::from(unit) - 0xd800) << 10) + (u32::from(low) - 0xdc00);
                char::from_u32(code_point)
                  .ok_or(JsonError::malformed("invalid code point", offset))?
              }
              0xdc00 ..= 0xdfff => Err(JsonError::malformed("unpaired surrogate", offset))?,
              _ => char::from_u32(u32::from(unit))
                .ok_or(JsonError::malformed("invalid code point", offset))?,
            }
          }
          _ => Err(JsonError::malformed("invalid escape", offset - 1))?,
        };
        let mut buf = [0; 4];
        result.extend_from_slice(char.encode_utf8(&mut buf).as_bytes());
      }
      0x00 ..= 0x1f => Err(JsonError::malformed("unescaped control character", offset - 1))?,
      _ => result.push(byte),
    }
  }
  let string =
    String::from_utf8(result).map_err(|_| JsonError::malformed("invalid UTF-8", offset))?;
  Ok((string, offset))
}

#[test]
fn escapes() {
  let read = |s: &str| read_string(s.as_bytes(), 0).map(|(string, _)| string);
  assert_eq!(read(r#"abc""#).unwrap(), "abc");
  assert_eq!(read(r#"a\"b\\c\/\n\t""#).unwrap(), "a\"b\\c/\n\t");
  assert_eq!(read(r#"é€""#).unwrap(), "é€");
  assert_eq!(read(r#"😀""#).unwrap(), "😀");
  assert_eq!(read("é\"").unwrap(), "é");
  assert!(read(r#"\ud83d""#).is_err());
  assert!(read(r#"\ude00""#).is_err());
  assert!(read(r#"\x""#).is_err());
  assert!(read("a\nb\"").is_err());
  assert!(read("abc").is_err());
  assert_eq!(read_string(br#"ab" , 1"#, 0).unwrap().1, 3);
}

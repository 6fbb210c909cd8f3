use crate::{
  Number, Event, Cursor, Generator, JsonError, Result, DecodeOptions, JsonDeserialize,
  JsonSerialize,
};

fn read_number(cursor: &mut dyn Cursor, context: &'static str) -> Result<Number> {
  match cursor.expect_next()? {
    Event::Number(number) => Ok(number),
    other => Err(JsonError::unexpected("a number", other.kind(), context)),
  }
}

fn read_integer(cursor: &mut dyn Cursor, context: &'static str) -> Result<i64> {
  let number = read_number(cursor, context)?;
  number.as_i64().ok_or_else(|| JsonError::UnexpectedTokenShape {
    expected: "an integer",
    found: number.to_string(),
    context,
  })
}

macro_rules! integer {
  ($($ty: ident),*) => {
    $(
      impl JsonDeserialize for $ty {
        fn deserialize(cursor: &mut dyn Cursor, _options: &DecodeOptions) -> Result<Self> {
          let value = read_integer(cursor, stringify!($ty))?;
          $ty::try_from(value).map_err(|_| JsonError::UnexpectedTokenShape {
            expected: concat!("an integer within the range of `", stringify!($ty), "`"),
            found: value.to_string(),
            context: stringify!($ty),
          })
        }
      }
      impl JsonSerialize for $ty {
        fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
          generator.write_i64(i64::from(*self))
        }
      }
    )*
  }
}
integer!(i32, i64, u32);

impl JsonDeserialize for f64 {
  /// Integers are accepted and converted.
  fn deserialize(cursor: &mut dyn Cursor, _options: &DecodeOptions) -> Result<Self> {
    Ok(read_number(cursor, "f64")?.as_f64())
  }
}
impl JsonSerialize for f64 {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    generator.write_f64(*self)
  }
}

impl JsonDeserialize for bool {
  fn deserialize(cursor: &mut dyn Cursor, _options: &DecodeOptions) -> Result<Self> {
    match cursor.expect_next()? {
      Event::Bool(value) => Ok(value),
      other => Err(JsonError::unexpected("a boolean", other.kind(), "bool")),
    }
  }
}
impl JsonSerialize for bool {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    generator.write_bool(*self)
  }
}

impl JsonDeserialize for String {
  fn deserialize(cursor: &mut dyn Cursor, _options: &DecodeOptions) -> Result<Self> {
    match cursor.expect_next()? {
      Event::String(value) => Ok(value),
      other => Err(JsonError::unexpected("a string", other.kind(), "String")),
    }
  }
}
impl JsonSerialize for String {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    generator.write_str(self)
  }
}
impl JsonSerialize for str {
  fn serialize(&self, generator: &mut dyn Generator) -> Result<()> {
    generator.write_str(self)
  }
}

#[test]
fn primitives() {
  use crate::{from_str, to_string};

  let options = DecodeOptions::strict();
  assert_eq!(from_str::<i32>("-5", &options).unwrap(), -5);
  assert_eq!(from_str::<i64>("3.0", &options).unwrap(), 3);
  assert_eq!(from_str::<u32>("4294967295", &options).unwrap(), u32::MAX);
  assert!(matches!(
    from_str::<u32>("-1", &options),
    Err(JsonError::UnexpectedTokenShape { context: "u32", .. })
  ));
  assert!(matches!(
    from_str::<i32>("1.5", &options),
    Err(JsonError::UnexpectedTokenShape { expected: "an integer", .. })
  ));
  assert_eq!(from_str::<f64>("7", &options).unwrap().to_bits(), 7f64.to_bits());
  assert!(from_str::<bool>("true", &options).unwrap());
  assert_eq!(from_str::<String>(r#""aé""#, &options).unwrap(), "aé");
  assert_eq!(
    from_str::<String>("1", &options),
    Err(JsonError::UnexpectedTokenShape {
      expected: "a string",
      found: "a number".to_string(),
      context: "String"
    })
  );

  assert_eq!(to_string(&-5i32).unwrap(), "-5");
  assert_eq!(to_string(&3f64).unwrap(), "3.0");
  assert_eq!(to_string("\"").unwrap(), r#""\"""#);
}

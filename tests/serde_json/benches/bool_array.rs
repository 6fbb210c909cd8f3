use rand_core::{RngCore, OsRng};

use typed_json_traits::{DecodeOptions, from_slice, to_string};

fn main() {
  // Generate a array which will be ~128 MB once serialized
  let mut array = Vec::with_capacity(128 * 1024 * 1024 / 4);
  while array.len() < (128 * 1024 * 1024 / 4) {
    let mut bits = OsRng.next_u64();
    for _ in 0 .. 64 {
      array.push((bits & 1) == 1);
      bits >>= 1;
    }
  }

  {
    let start = std::time::Instant::now();
    let mut serialization = vec![];
    serde_json::to_writer(&mut serialization, &array).unwrap();
    let _ = core::hint::black_box(serialization);
    println!("serde_json took {}ms to serialize a 128 MB bool array", start.elapsed().as_millis());
  }

  {
    let start = std::time::Instant::now();
    let _ = core::hint::black_box(to_string(&array).unwrap());
    println!("typed-json took {}ms to serialize a 128 MB bool array", start.elapsed().as_millis());
  }

  let serialization = serde_json::to_string(&array).unwrap();

  {
    let start = std::time::Instant::now();
    for value in serde_json::from_reader::<&[u8], Vec<bool>>(serialization.as_bytes()).unwrap() {
      let _ = core::hint::black_box(value);
    }
    println!(
      "serde_json took {}ms to deserialize and statically-typed read a 128 MB bool array",
      start.elapsed().as_millis()
    );
  }

  {
    let start = std::time::Instant::now();
    let options = DecodeOptions::strict();
    for value in from_slice::<Vec<bool>>(serialization.as_bytes(), &options).unwrap() {
      let _ = core::hint::black_box(value);
    }
    println!(
      "typed-json took {}ms to deserialize and statically-typed read a 128 MB bool array",
      start.elapsed().as_millis()
    );
  }
}

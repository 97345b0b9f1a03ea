use xxhash_rust::xxh3::xxh3_64;

pub fn xxhash_hex(input: &[u8]) -> String {
  format!("{:016x}", xxh3_64(input))
}

#[test]
fn test_xxhash_hex() {
  assert_eq!(xxhash_hex(b"hello").len(), 16);
  assert_eq!(xxhash_hex(b"hello"), xxhash_hex(b"hello"));
  assert_ne!(xxhash_hex(b"hello"), xxhash_hex(b"hello!"));
}

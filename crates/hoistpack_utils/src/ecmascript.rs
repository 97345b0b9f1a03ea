use std::borrow::Cow;

use oxc::syntax::identifier;

pub fn is_validate_identifier_name(name: &str) -> bool {
  identifier::is_identifier_name(name)
}

/// Replace every character that can't appear in an identifier with `_`.
pub fn legitimize_identifier_name(name: &str) -> Cow<str> {
  let mut chars = name.chars();
  let first_is_valid = chars.next().is_some_and(identifier::is_identifier_start);
  if first_is_valid && chars.all(identifier::is_identifier_part) {
    return Cow::Borrowed(name);
  }

  let mut legitimized = String::with_capacity(name.len() + 1);
  for (i, char) in name.chars().enumerate() {
    let valid =
      if i == 0 { identifier::is_identifier_start(char) } else { identifier::is_identifier_part(char) };
    if valid {
      legitimized.push(char);
    } else if i == 0 && identifier::is_identifier_part(char) {
      legitimized.push('_');
      legitimized.push(char);
    } else {
      legitimized.push('_');
    }
  }
  Cow::Owned(legitimized)
}

#[test]
fn test_is_validate_identifier_name() {
  assert!(is_validate_identifier_name("foo"));
  assert!(!is_validate_identifier_name("1aaaa"));
  assert!(!is_validate_identifier_name("😈"));
}

#[test]
fn test_legitimize_identifier_name() {
  assert_eq!(legitimize_identifier_name("foo"), "foo");
  assert_eq!(legitimize_identifier_name("src/a-b.js"), "src_a_b_js");
  assert_eq!(legitimize_identifier_name("1abc"), "_1abc");
  assert_eq!(legitimize_identifier_name(""), "");
}

//! Typed failures of a concatenation run. They travel inside `anyhow::Error`, callers that care
//! about the exact kind use `BuildError::downcast_first`.

use std::fmt::{self, Display};

use arcstr::ArcStr;

/// A `$hoist$require(local, "specifier")` call whose specifier matches none of the dependencies
/// of the module it appears in.
#[derive(Debug)]
pub struct UnresolvedRequire {
  pub module: ArcStr,
  pub specifier: ArcStr,
  pub position: u32,
}

impl Display for UnresolvedRequire {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Could not find a dependency for \"{}\" required at {}:{}",
      self.specifier, self.module, self.position
    )
  }
}

impl std::error::Error for UnresolvedRequire {}

/// A runtime require call whose second argument is not a string literal.
#[derive(Debug)]
pub struct InvalidRequireCall {
  pub module: ArcStr,
  pub position: u32,
}

impl Display for InvalidRequireCall {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Runtime require call at {}:{} must pass the module specifier as a string literal",
      self.module, self.position
    )
  }
}

impl std::error::Error for InvalidRequireCall {}

#[derive(Debug)]
pub struct MalformedModule {
  pub module: ArcStr,
  pub position: u32,
  pub reason: String,
}

impl Display for MalformedModule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Cannot wrap {}:{}: {}", self.module, self.position, self.reason)
  }
}

impl std::error::Error for MalformedModule {}

/// Named re-exports that point back at themselves, e.g. `a` re-exports `x` from `b` and `b`
/// re-exports `x` from `a`.
#[derive(Debug)]
pub struct CircularReexport {
  pub module: ArcStr,
  pub symbol: ArcStr,
}

impl Display for CircularReexport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Re-export of \"{}\" in {} never reaches a declaration", self.symbol, self.module)
  }
}

impl std::error::Error for CircularReexport {}

#[derive(Debug)]
pub struct ParseFailure {
  pub module: ArcStr,
  pub errors: Vec<String>,
}

impl Display for ParseFailure {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Failed to parse {}: {}", self.module, self.errors.join("; "))
  }
}

impl std::error::Error for ParseFailure {}

/// The merge step reached a module that has no prepared statement list.
#[derive(Debug)]
pub struct MissingPreparedModule {
  pub module: ArcStr,
}

impl Display for MissingPreparedModule {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Module {} was emitted before it was prepared", self.module)
  }
}

impl std::error::Error for MissingPreparedModule {}

#[test]
fn malformed_module_names_the_module_once() {
  let err = MalformedModule {
    module: "src/esm.js".into(),
    position: 0,
    reason: "module syntax survived compilation".to_string(),
  };
  assert_eq!(err.to_string(), "Cannot wrap src/esm.js:0: module syntax survived compilation");
}

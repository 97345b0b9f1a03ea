mod build_error;
mod diagnostics;

pub use crate::{
  build_error::{BuildError, BuildResult},
  diagnostics::{
    CircularReexport, InvalidRequireCall, MalformedModule, MissingPreparedModule, ParseFailure,
    UnresolvedRequire,
  },
};

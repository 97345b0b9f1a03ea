mod generate_stage;
mod link_stage;
mod prepare_stage;
mod runtime;
mod scope_hoister;
mod types;
mod utils;

pub use crate::{
  generate_stage::formats::esm,
  link_stage::symbol_resolver::{ResolvedSymbol, SymbolResolver},
  runtime::{DEFINE_INTEROP_FLAG, INTEROP_DEFAULT, PRELUDE, RUNTIME_REQUIRE, RuntimeHelpers},
  scope_hoister::ScopeHoister,
  types::{WrappedModules, concat_output::ConcatOutput, used_exports::UsedExports},
};
pub use hoistpack_common::*;
pub use hoistpack_ecmascript::{EcmaAst, EcmaCompiler};
pub use hoistpack_error::{
  BuildError, BuildResult, CircularReexport, InvalidRequireCall, MalformedModule,
  MissingPreparedModule, ParseFailure, UnresolvedRequire,
};

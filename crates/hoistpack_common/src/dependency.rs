use arcstr::ArcStr;
use hoistpack_utils::indexmap::FxIndexMap;

use crate::{DependencyIdx, ModuleIdx};

bitflags::bitflags! {
  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
  pub struct DependencyMeta: u8 {
    /// The graph builder asks for the resolved module to be wrapped.
    const SHOULD_WRAP = 1;
    /// The request comes from `require(...)` in a CommonJS module.
    const IS_COMMONJS = 1 << 1;
  }
}

/// The export name that stands for the whole namespace, `import * as ns`.
pub const WILDCARD: &str = "*";

#[derive(Debug)]
pub struct Dependency {
  pub idx: DependencyIdx,
  /// `None` for the edges that load an entry module.
  pub importer: Option<ModuleIdx>,
  /// `./lib.js` in `$hoist$require("lib", "./lib.js")`
  pub specifier: ArcStr,
  /// Requested export name -> local alias in the importer.
  pub symbols: FxIndexMap<ArcStr, ArcStr>,
  pub meta: DependencyMeta,
  /// `None` when resolution failed or the edge was optimized away.
  pub resolved: Option<ModuleIdx>,
}

impl Dependency {
  #[inline]
  pub fn should_wrap(&self) -> bool {
    self.meta.contains(DependencyMeta::SHOULD_WRAP)
  }

  #[inline]
  pub fn is_commonjs(&self) -> bool {
    self.meta.contains(DependencyMeta::IS_COMMONJS)
  }

  #[inline]
  pub fn requests(&self, export: &str) -> bool {
    self.symbols.contains_key(export)
  }

  #[inline]
  pub fn requests_namespace(&self) -> bool {
    self.requests(WILDCARD)
  }
}

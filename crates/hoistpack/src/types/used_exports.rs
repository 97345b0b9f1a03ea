use arcstr::ArcStr;
use hoistpack_common::{ModuleIdx, WILDCARD};
use hoistpack_utils::indexmap::FxIndexSet;
use rustc_hash::FxHashMap;

/// Module -> export names that something in or outside the bundle reads. `*` means every export
/// is reachable.
#[derive(Debug, Default)]
pub struct UsedExports {
  inner: FxHashMap<ModuleIdx, FxIndexSet<ArcStr>>,
}

impl UsedExports {
  pub fn mark(&mut self, module: ModuleIdx, symbol: ArcStr) {
    self.inner.entry(module).or_default().insert(symbol);
  }

  pub fn get(&self, module: ModuleIdx) -> Option<&FxIndexSet<ArcStr>> {
    self.inner.get(&module)
  }

  pub fn is_used(&self, module: ModuleIdx, symbol: &str) -> bool {
    self.inner.get(&module).is_some_and(|used| used.contains(symbol) || used.contains(WILDCARD))
  }

  pub fn has_any(&self, module: ModuleIdx) -> bool {
    self.inner.get(&module).is_some_and(|used| !used.is_empty())
  }
}

use arcstr::ArcStr;
use hoistpack_common::{ModuleIdx, WILDCARD};

use super::{LinkStage, symbol_resolver::SymbolResolver};

impl LinkStage<'_> {
  /// Seeds with the main entry's exports and with every module another bundle reaches, then
  /// marks what each edge of the bundle requests. Marking only ever adds, so modules can be
  /// processed in any order.
  pub(crate) fn compute_used_exports(&mut self) -> anyhow::Result<()> {
    let graph = self.graph;
    let resolver = SymbolResolver::new(graph);

    if let Some(entry) = self.bundle().main_entry {
      for resolved in resolver.exported_symbols(entry)? {
        self.used_exports.mark(resolved.module, resolved.symbol);
      }
    }

    for module in self.modules.clone() {
      for dep in graph.outgoing_dependencies(module) {
        let Some(target) = dep.resolved else {
          continue;
        };

        for (symbol, local) in &dep.symbols {
          // The importer only forwards the namespace, it doesn't read it here.
          if local.as_str() == WILDCARD {
            continue;
          }
          if symbol.as_str() == WILDCARD {
            self.mark_all_exports(&resolver, target)?;
          }
          self.mark_used(&resolver, target, symbol)?;
        }
      }

      if graph.is_module_referenced_by_dependant(self.bundle_idx, module) {
        self.mark_used(&resolver, module, &ArcStr::from(WILDCARD))?;
        self.mark_all_exports(&resolver, module)?;
      }
    }

    Ok(())
  }

  fn mark_used(
    &mut self,
    resolver: &SymbolResolver,
    module: ModuleIdx,
    symbol: &ArcStr,
  ) -> anyhow::Result<()> {
    let resolved = resolver.resolve(module, symbol)?;
    self.used_exports.mark(resolved.module, resolved.symbol);
    Ok(())
  }

  fn mark_all_exports(&mut self, resolver: &SymbolResolver, module: ModuleIdx) -> anyhow::Result<()> {
    for resolved in resolver.exported_symbols(module)? {
      self.used_exports.mark(resolved.module, resolved.symbol);
    }
    Ok(())
  }
}

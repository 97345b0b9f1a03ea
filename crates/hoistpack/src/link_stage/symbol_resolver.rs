use arcstr::ArcStr;
use hoistpack_common::{BundleGraph, ExportEntry, ModuleIdx, WILDCARD};
use hoistpack_error::CircularReexport;
use rustc_hash::FxHashSet;

/// The module that actually declares a binding, and the name it is exported under there.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedSymbol {
  pub module: ModuleIdx,
  pub symbol: ArcStr,
}

/// Follows re-export chains. Named chains must terminate, `export *` chains may loop.
pub struct SymbolResolver<'a> {
  graph: &'a BundleGraph,
}

impl<'a> SymbolResolver<'a> {
  pub fn new(graph: &'a BundleGraph) -> Self {
    Self { graph }
  }

  /// A symbol nobody provides resolves to itself.
  pub fn resolve(&self, module: ModuleIdx, symbol: &ArcStr) -> anyhow::Result<ResolvedSymbol> {
    let mut visited_star_exports = FxHashSet::default();
    Ok(
      self
        .resolve_in(module, symbol, &mut visited_star_exports)?
        .unwrap_or_else(|| ResolvedSymbol { module, symbol: symbol.clone() }),
    )
  }

  /// Every export of `module`, including the ones pulled in through `export *`, resolved to its
  /// declaring module.
  pub fn exported_symbols(&self, module: ModuleIdx) -> anyhow::Result<Vec<ResolvedSymbol>> {
    let mut result = vec![];
    let mut visited = FxHashSet::default();
    self.collect_exported_symbols(module, true, &mut visited, &mut result)?;
    Ok(result)
  }

  fn collect_exported_symbols(
    &self,
    module: ModuleIdx,
    include_default: bool,
    visited: &mut FxHashSet<ModuleIdx>,
    result: &mut Vec<ResolvedSymbol>,
  ) -> anyhow::Result<()> {
    if !visited.insert(module) {
      return Ok(());
    }
    for name in self.graph.modules[module].exports.keys() {
      // `export *` never forwards `default`.
      if !include_default && name.as_str() == "default" {
        continue;
      }
      result.push(self.resolve(module, name)?);
    }
    for dep in &self.graph.modules[module].star_exports {
      if let Some(target) = self.graph.resolution(*dep) {
        self.collect_exported_symbols(target, false, visited, result)?;
      }
    }
    Ok(())
  }

  /// `Ok(None)` when `module` doesn't provide `symbol` at all.
  fn resolve_in(
    &self,
    module: ModuleIdx,
    symbol: &ArcStr,
    visited_star_exports: &mut FxHashSet<ModuleIdx>,
  ) -> anyhow::Result<Option<ResolvedSymbol>> {
    let mut chain = FxHashSet::default();
    let mut current = ResolvedSymbol { module, symbol: symbol.clone() };

    loop {
      if !chain.insert(current.clone()) {
        return Err(
          CircularReexport {
            module: self.graph.modules[module].id.inner().clone(),
            symbol: symbol.clone(),
          }
          .into(),
        );
      }

      let owner = &self.graph.modules[current.module];
      match owner.exports.get(&current.symbol) {
        Some(ExportEntry::Local { .. }) => return Ok(Some(current)),
        Some(ExportEntry::ReExport { dependency, imported }) => {
          let Some(target) = self.graph.resolution(*dependency) else {
            // The edge was optimized away, nothing further to follow.
            return Ok(Some(current));
          };
          current = ResolvedSymbol { module: target, symbol: imported.clone() };
          // `export * as ns from '...'`
          if imported.as_str() == WILDCARD {
            return Ok(Some(current));
          }
        }
        None => {
          if current.symbol.as_str() == WILDCARD {
            return Ok(Some(current));
          }
          if current.symbol.as_str() == "default" {
            return Ok(None);
          }
          for dep in &owner.star_exports {
            let Some(target) = self.graph.resolution(*dep) else {
              continue;
            };
            if !visited_star_exports.insert(target) {
              continue;
            }
            if let Some(found) = self.resolve_in(target, &current.symbol, visited_star_exports)? {
              return Ok(Some(found));
            }
          }
          return Ok(None);
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use arcstr::ArcStr;
  use hoistpack_common::{BundleGraph, ModuleBody, ModuleIdx};
  use hoistpack_error::CircularReexport;

  use super::{ResolvedSymbol, SymbolResolver};

  fn module(graph: &mut BundleGraph, id: &str) -> ModuleIdx {
    graph.add_module(id, format!("{id}.js"), ModuleBody::Compiled(ArcStr::new()))
  }

  #[test]
  fn follows_named_reexport_chain() {
    let mut graph = BundleGraph::new();
    let a = module(&mut graph, "a");
    let b = module(&mut graph, "b");
    let c = module(&mut graph, "c");
    let a_to_b = graph.add_dependency(Some(a), "./b", Some(b));
    let b_to_c = graph.add_dependency(Some(b), "./c", Some(c));
    graph.add_reexport(a, "x", a_to_b, "y");
    graph.add_reexport(b, "y", b_to_c, "z");
    graph.add_export(c, "z", "$c$var$z");
    graph.add_export(b, "unrelated", "$b$var$unrelated");

    let resolver = SymbolResolver::new(&graph);
    let resolved = resolver.resolve(a, &"x".into()).unwrap();
    assert_eq!(resolved, ResolvedSymbol { module: c, symbol: "z".into() });
  }

  #[test]
  fn searches_star_exports_but_not_for_default() {
    let mut graph = BundleGraph::new();
    let a = module(&mut graph, "a");
    let b = module(&mut graph, "b");
    let a_to_b = graph.add_dependency(Some(a), "./b", Some(b));
    graph.add_star_export(a, a_to_b);
    graph.add_export(b, "x", "$b$var$x");
    graph.add_export(b, "default", "$b$var$default");

    let resolver = SymbolResolver::new(&graph);
    assert_eq!(resolver.resolve(a, &"x".into()).unwrap().module, b);
    assert_eq!(resolver.resolve(a, &"default".into()).unwrap().module, a);

    let exported = resolver.exported_symbols(a).unwrap();
    assert_eq!(exported, vec![ResolvedSymbol { module: b, symbol: "x".into() }]);
  }

  #[test]
  fn star_export_cycle_stops() {
    let mut graph = BundleGraph::new();
    let a = module(&mut graph, "a");
    let b = module(&mut graph, "b");
    let a_to_b = graph.add_dependency(Some(a), "./b", Some(b));
    let b_to_a = graph.add_dependency(Some(b), "./a", Some(a));
    graph.add_star_export(a, a_to_b);
    graph.add_star_export(b, b_to_a);

    let resolver = SymbolResolver::new(&graph);
    let resolved = resolver.resolve(a, &"missing".into()).unwrap();
    assert_eq!(resolved.module, a);
  }

  #[test]
  fn named_reexport_cycle_is_an_error() {
    let mut graph = BundleGraph::new();
    let a = module(&mut graph, "a");
    let b = module(&mut graph, "b");
    let a_to_b = graph.add_dependency(Some(a), "./b", Some(b));
    let b_to_a = graph.add_dependency(Some(b), "./a", Some(a));
    graph.add_reexport(a, "x", a_to_b, "x");
    graph.add_reexport(b, "x", b_to_a, "x");

    let err = SymbolResolver::new(&graph).resolve(a, &"x".into()).unwrap_err();
    let err = err.downcast_ref::<CircularReexport>().expect("should be a CircularReexport");
    assert_eq!(err.symbol.as_str(), "x");
  }

  #[test]
  fn unresolved_reexport_stops_at_the_reexporting_module() {
    let mut graph = BundleGraph::new();
    let a = module(&mut graph, "a");
    let deferred = graph.add_dependency(Some(a), "./gone", None);
    graph.add_reexport(a, "x", deferred, "x");

    let resolved = SymbolResolver::new(&graph).resolve(a, &"x".into()).unwrap();
    assert_eq!(resolved, ResolvedSymbol { module: a, symbol: "x".into() });
  }
}

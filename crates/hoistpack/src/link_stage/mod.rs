mod compute_used_exports;
pub mod symbol_resolver;
mod wrap_modules;

use hoistpack_common::{Bundle, BundleGraph, BundleIdx, DependencyIdx, ModuleIdx};
use hoistpack_utils::indexmap::FxIndexSet;

use crate::types::{SharedOptions, WrappedModules, used_exports::UsedExports};

#[derive(Debug)]
pub struct LinkStageOutput {
  /// The bundle's module tree in traversal order.
  pub modules: FxIndexSet<ModuleIdx>,
  pub wrapped: WrappedModules,
  pub used_exports: UsedExports,
  pub referenced_modules: Vec<ModuleIdx>,
  pub warnings: Vec<anyhow::Error>,
}

/// Whole-bundle analysis that has to finish before any module body is touched.
#[derive(Debug)]
pub struct LinkStage<'a> {
  pub graph: &'a BundleGraph,
  pub bundle_idx: BundleIdx,
  pub options: &'a SharedOptions,
  pub modules: FxIndexSet<ModuleIdx>,
  pub wrapped: WrappedModules,
  pub used_exports: UsedExports,
  pub warnings: Vec<anyhow::Error>,
}

impl<'a> LinkStage<'a> {
  pub fn new(graph: &'a BundleGraph, bundle_idx: BundleIdx, options: &'a SharedOptions) -> Self {
    Self {
      graph,
      bundle_idx,
      options,
      modules: FxIndexSet::default(),
      wrapped: WrappedModules::default(),
      used_exports: UsedExports::default(),
      warnings: vec![],
    }
  }

  pub fn link(mut self) -> anyhow::Result<LinkStageOutput> {
    let circular_edges = if self.options.wrap_circular_dependencies {
      self.find_circular_edges()
    } else {
      Default::default()
    };
    self.wrap_modules(&circular_edges);
    self.compute_used_exports()?;

    let referenced_modules = self
      .modules
      .iter()
      .copied()
      .filter(|module| self.graph.is_module_referenced_by_dependant(self.bundle_idx, *module))
      .collect();

    Ok(LinkStageOutput {
      modules: self.modules,
      wrapped: self.wrapped,
      used_exports: self.used_exports,
      referenced_modules,
      warnings: self.warnings,
    })
  }

  fn bundle(&self) -> &'a Bundle {
    &self.graph.bundles[self.bundle_idx]
  }

  /// Outgoing edges of `module` whose target lives in this bundle.
  fn children_in_bundle(
    &self,
    module: ModuleIdx,
  ) -> impl Iterator<Item = (DependencyIdx, ModuleIdx)> + 'a {
    let graph = self.graph;
    let bundle = self.bundle();
    graph.modules[module].dependencies.iter().filter_map(move |dep| {
      graph.resolution(*dep).filter(|target| bundle.contains(*target)).map(|target| (*dep, target))
    })
  }
}

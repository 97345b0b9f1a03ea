use std::path::PathBuf;

use arcstr::ArcStr;
use oxc_index::IndexVec;

use crate::{
  Bundle, BundleIdx, Dependency, DependencyIdx, DependencyMeta, ExportEntry, Module, ModuleBody,
  ModuleId, ModuleIdx, OutputFormat,
};

/// Everything the graph builder knows about modules, edges and bundles. The concatenation
/// engine only reads it.
#[derive(Debug, Default)]
pub struct BundleGraph {
  pub modules: IndexVec<ModuleIdx, Module>,
  pub dependencies: IndexVec<DependencyIdx, Dependency>,
  pub bundles: IndexVec<BundleIdx, Bundle>,
}

impl BundleGraph {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn add_module(
    &mut self,
    id: impl Into<ModuleId>,
    file_path: impl Into<PathBuf>,
    body: ModuleBody,
  ) -> ModuleIdx {
    let idx = self.modules.next_idx();
    self.modules.push(Module::new(idx, id.into(), file_path.into(), body))
  }

  /// Record an edge. The edge order of one importer must match the order of its runtime require
  /// calls.
  pub fn add_dependency(
    &mut self,
    importer: Option<ModuleIdx>,
    specifier: impl Into<ArcStr>,
    resolved: Option<ModuleIdx>,
  ) -> DependencyIdx {
    let idx = self.dependencies.push(Dependency {
      idx: self.dependencies.next_idx(),
      importer,
      specifier: specifier.into(),
      symbols: Default::default(),
      meta: DependencyMeta::empty(),
      resolved,
    });
    if let Some(importer) = importer {
      self.modules[importer].dependencies.push(idx);
    }
    if let Some(resolved) = resolved {
      self.modules[resolved].importers.push(idx);
    }
    idx
  }

  pub fn add_symbol(
    &mut self,
    dependency: DependencyIdx,
    imported: impl Into<ArcStr>,
    local: impl Into<ArcStr>,
  ) {
    self.dependencies[dependency].symbols.insert(imported.into(), local.into());
  }

  pub fn add_export(
    &mut self,
    module: ModuleIdx,
    exported: impl Into<ArcStr>,
    local: impl Into<ArcStr>,
  ) {
    self.modules[module].exports.insert(exported.into(), ExportEntry::Local { local: local.into() });
  }

  pub fn add_reexport(
    &mut self,
    module: ModuleIdx,
    exported: impl Into<ArcStr>,
    dependency: DependencyIdx,
    imported: impl Into<ArcStr>,
  ) {
    self.modules[module]
      .exports
      .insert(exported.into(), ExportEntry::ReExport { dependency, imported: imported.into() });
  }

  pub fn add_star_export(&mut self, module: ModuleIdx, dependency: DependencyIdx) {
    self.modules[module].star_exports.push(dependency);
  }

  pub fn add_bundle(
    &mut self,
    name: impl Into<ArcStr>,
    format: OutputFormat,
    parent: Option<BundleIdx>,
  ) -> BundleIdx {
    let name = name.into();
    let idx = self.bundles.push(Bundle {
      idx: self.bundles.next_idx(),
      file_name: arcstr::format!("{name}.js"),
      name,
      format,
      entries: vec![],
      main_entry: None,
      modules: Default::default(),
      parent,
      children: vec![],
    });
    if let Some(parent) = parent {
      self.bundles[parent].children.push(idx);
    }
    idx
  }

  /// The first entry added to a bundle becomes its main entry.
  pub fn add_entry(&mut self, bundle: BundleIdx, module: ModuleIdx) {
    let bundle = &mut self.bundles[bundle];
    bundle.entries.push(module);
    bundle.main_entry.get_or_insert(module);
    bundle.modules.insert(module);
  }

  pub fn add_to_bundle(&mut self, bundle: BundleIdx, module: ModuleIdx) {
    self.bundles[bundle].modules.insert(module);
  }

  #[inline]
  pub fn resolution(&self, dependency: DependencyIdx) -> Option<ModuleIdx> {
    self.dependencies[dependency].resolved
  }

  /// Whether the edge starts inside `bundle`.
  pub fn has_dependency(&self, bundle: BundleIdx, dependency: DependencyIdx) -> bool {
    self.dependencies[dependency].importer.is_some_and(|importer| self.bundles[bundle].contains(importer))
  }

  pub fn outgoing_dependencies(&self, module: ModuleIdx) -> impl Iterator<Item = &Dependency> {
    self.modules[module].dependencies.iter().map(|idx| &self.dependencies[*idx])
  }

  pub fn incoming_dependencies(&self, module: ModuleIdx) -> impl Iterator<Item = &Dependency> {
    self.modules[module].importers.iter().map(|idx| &self.dependencies[*idx])
  }

  /// Whether some module of another bundle depends on `module` without carrying its own copy,
  /// so that it has to reach the one in `bundle` at runtime.
  pub fn is_module_referenced_by_dependant(&self, bundle: BundleIdx, module: ModuleIdx) -> bool {
    self.incoming_dependencies(module).filter_map(|dep| dep.importer).any(|importer| {
      self.bundles.iter().any(|other| {
        other.idx != bundle && other.contains(importer) && !other.contains(module)
      })
    })
  }

  /// `bundle` followed by all of its descendants, depth first.
  pub fn bundle_with_descendants(&self, bundle: BundleIdx) -> Vec<BundleIdx> {
    let mut result = vec![];
    let mut stack = vec![bundle];
    while let Some(idx) = stack.pop() {
      result.push(idx);
      stack.extend(self.bundles[idx].children.iter().rev().copied());
    }
    result
  }

  /// Only an entry bundle in the global format hosts the shared module registry, and only when
  /// something in its tree of bundles is looked up from outside the bundle that defines it.
  pub fn needs_prelude(&self, bundle: BundleIdx) -> bool {
    let root = &self.bundles[bundle];
    if !root.format.may_need_prelude() || !root.is_entry_bundle() {
      return false;
    }
    self.bundle_with_descendants(bundle).into_iter().any(|idx| {
      self.bundles[idx]
        .modules
        .iter()
        .any(|module| self.is_module_referenced_by_dependant(idx, *module))
    })
  }
}

#[cfg(test)]
fn empty_module(graph: &mut BundleGraph, id: &str) -> ModuleIdx {
  graph.add_module(id, format!("/project/{id}.js"), ModuleBody::Compiled(ArcStr::new()))
}

#[test]
fn test_referenced_by_dependant() {
  let mut graph = BundleGraph::new();
  let main = empty_module(&mut graph, "main");
  let shared = empty_module(&mut graph, "shared");
  let lazy = empty_module(&mut graph, "lazy");
  graph.add_dependency(Some(main), "./shared", Some(shared));
  graph.add_dependency(Some(lazy), "./shared", Some(shared));

  let entry = graph.add_bundle("main", OutputFormat::Global, None);
  graph.add_entry(entry, main);
  graph.add_to_bundle(entry, shared);
  let child = graph.add_bundle("lazy", OutputFormat::Global, Some(entry));
  graph.add_entry(child, lazy);

  assert!(graph.is_module_referenced_by_dependant(entry, shared));
  assert!(!graph.is_module_referenced_by_dependant(entry, main));
  assert!(graph.needs_prelude(entry));
  // Child bundles never host the registry.
  assert!(!graph.needs_prelude(child));
}

#[test]
fn test_prelude_needs_global_format() {
  let mut graph = BundleGraph::new();
  let main = empty_module(&mut graph, "main");
  let shared = empty_module(&mut graph, "shared");
  let lazy = empty_module(&mut graph, "lazy");
  graph.add_dependency(Some(lazy), "./shared", Some(shared));

  let entry = graph.add_bundle("main", OutputFormat::Esm, None);
  graph.add_entry(entry, main);
  graph.add_to_bundle(entry, shared);
  let child = graph.add_bundle("lazy", OutputFormat::Esm, Some(entry));
  graph.add_entry(child, lazy);

  assert!(graph.is_module_referenced_by_dependant(entry, shared));
  assert!(!graph.needs_prelude(entry));
}

mod find_requires;
mod interop;
mod module_wrapper;

use hoistpack_common::{BundleGraph, BundleIdx, ModuleBody, ModuleIdx};
use hoistpack_ecmascript::EcmaCompiler;
use hoistpack_ecmascript_utils::AstSnippet;
use hoistpack_error::BuildResult;
use hoistpack_utils::{
  indexmap::FxIndexSet,
  rayon::{IntoParallelRefIterator, ParallelIterator, ThreadPool},
};
use itertools::Itertools;
use oxc::span::SourceType;
use rustc_hash::FxHashMap;

use crate::{
  runtime::RuntimeHelpers,
  types::{SharedOptions, WrappedModules, prepared_module::PreparedModule},
};

use self::{find_requires::find_requires, module_wrapper::ModuleWrapper};

pub type PreparedModules = FxHashMap<ModuleIdx, PreparedModule>;

/// Turns every module of the bundle into its final statement list. Modules don't depend on each
/// other here, so they are prepared on the worker pool.
pub struct PrepareStage<'a> {
  graph: &'a BundleGraph,
  bundle_idx: BundleIdx,
  options: &'a SharedOptions,
  wrapped: &'a WrappedModules,
}

impl<'a> PrepareStage<'a> {
  pub fn new(
    graph: &'a BundleGraph,
    bundle_idx: BundleIdx,
    options: &'a SharedOptions,
    wrapped: &'a WrappedModules,
  ) -> Self {
    Self { graph, bundle_idx, options, wrapped }
  }

  /// Returns only once every module is prepared. Any failure fails the whole bundle.
  pub fn prepare(
    &self,
    modules: &FxIndexSet<ModuleIdx>,
    pool: &ThreadPool,
  ) -> BuildResult<PreparedModules> {
    let modules = modules.iter().copied().collect::<Vec<_>>();
    let results = pool.install(|| {
      modules
        .par_iter()
        .map(|idx| self.prepare_module(*idx).map(|prepared| (*idx, prepared)))
        .collect::<Vec<_>>()
    });

    let (prepared, errors): (Vec<_>, Vec<_>) = results.into_iter().partition_result();
    if !errors.is_empty() {
      return Err(errors.into());
    }
    Ok(prepared.into_iter().collect())
  }

  fn prepare_module(&self, idx: ModuleIdx) -> anyhow::Result<PreparedModule> {
    let module = &self.graph.modules[idx];
    let stable_path = module.stable_path(&self.options.project_root);

    let mut ast = match &module.body {
      ModuleBody::Parsed(ast) => ast.clone_with_another_arena(),
      ModuleBody::Compiled(code) if module.is_commonjs() => {
        EcmaCompiler::parse_commonjs(&stable_path, code.clone())?
      }
      ModuleBody::Compiled(code) => {
        EcmaCompiler::parse_module(&stable_path, code.clone(), SourceType::mjs())?
      }
    };

    let needs_interop_default = interop::needs_interop_default(self.graph, self.bundle_idx, module);
    let needs_interop_flag = interop::needs_interop_flag(self.graph, self.bundle_idx, module);
    let should_wrap = self.wrapped.contains(&idx);

    let mut helpers = RuntimeHelpers::empty();
    ast.program.with_mut(|fields| -> anyhow::Result<()> {
      let snippet = AstSnippet::new(fields.allocator);
      if needs_interop_default {
        fields.program.body.push(interop::interop_default_stmt(&snippet, module));
        helpers |= RuntimeHelpers::INTEROP_DEFAULT;
      }
      if needs_interop_flag {
        fields.program.body.push(interop::interop_flag_stmt(&snippet, module));
        helpers |= RuntimeHelpers::DEFINE_INTEROP_FLAG;
      }
      if should_wrap {
        ModuleWrapper::new(snippet, module, &stable_path).wrap(fields.program)?;
      }
      Ok(())
    })?;

    let require_indices = find_requires(self.graph, module, &stable_path, &ast)?;
    let marker =
      (!ast.program().body.is_empty()).then(|| arcstr::format!(" ASSET: {stable_path}"));

    tracing::trace!(
      module = %module.id,
      wrapped = should_wrap,
      statements = ast.program().body.len(),
      "prepared module"
    );

    Ok(PreparedModule { ast, marker, helpers, require_indices })
  }
}

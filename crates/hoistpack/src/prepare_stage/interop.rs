use hoistpack_common::{BundleGraph, BundleIdx, Module, SyntheticName};
use hoistpack_ecmascript_utils::AstSnippet;
use oxc::{ast::ast::Statement, span::SPAN};

use crate::runtime::{DEFINE_INTEROP_FLAG, INTEROP_DEFAULT};

/// A CommonJS module whose `default` is imported from inside the bundle.
pub fn needs_interop_default(graph: &BundleGraph, bundle: BundleIdx, module: &Module) -> bool {
  module.is_commonjs()
    && graph
      .incoming_dependencies(module.idx)
      .any(|dep| dep.requests("default") && graph.has_dependency(bundle, dep.idx))
}

/// An ES module exporting `default` that is consumed by CommonJS code, or by a module of another
/// bundle that may be CommonJS.
pub fn needs_interop_flag(graph: &BundleGraph, bundle: BundleIdx, module: &Module) -> bool {
  module.is_esm()
    && module.has_export("default")
    && graph.incoming_dependencies(module.idx).any(|dep| {
      dep.is_commonjs() || (dep.importer.is_some() && !graph.has_dependency(bundle, dep.idx))
    })
}

/// `var $id$interop$default = $hoist$interopDefault($id$exports);`
pub fn interop_default_stmt<'ast>(snippet: &AstSnippet<'ast>, module: &Module) -> Statement<'ast> {
  snippet.var_decl_stmt(
    &module.synthetic_name(SyntheticName::InteropDefault),
    snippet.call_expr_with_arg_expr_expr(
      INTEROP_DEFAULT,
      snippet.id_ref_expr(&module.exports_identifier, SPAN),
    ),
  )
}

/// `$hoist$defineInteropFlag($id$exports);`
pub fn interop_flag_stmt<'ast>(snippet: &AstSnippet<'ast>, module: &Module) -> Statement<'ast> {
  snippet
    .call_expr_with_arg_stmt(DEFINE_INTEROP_FLAG, snippet.id_ref_expr(&module.exports_identifier, SPAN))
}

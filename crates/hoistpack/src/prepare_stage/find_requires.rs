use arcstr::ArcStr;
use hoistpack_common::{BundleGraph, Module, ModuleIdx};
use hoistpack_ecmascript::EcmaAst;
use hoistpack_error::{InvalidRequireCall, UnresolvedRequire};
use hoistpack_utils::indexmap::FxIndexMap;
use oxc::{
  ast::ast::{self, Argument, Expression, Statement},
  ast_visit::{Visit, walk},
};

use crate::runtime::RUNTIME_REQUIRE;

/// Collects the specifiers of `$hoist$require(local, "specifier")` calls, nested ones included.
#[derive(Default)]
struct RequireCollector {
  requires: Vec<(ArcStr, u32)>,
  invalid: Option<u32>,
}

impl<'a> Visit<'a> for RequireCollector {
  fn visit_call_expression(&mut self, expr: &ast::CallExpression<'a>) {
    if matches!(&expr.callee, Expression::Identifier(callee) if callee.name.as_str() == RUNTIME_REQUIRE) {
      match expr.arguments.get(1) {
        Some(Argument::StringLiteral(specifier)) => {
          self.requires.push((specifier.value.as_str().into(), expr.span.start));
        }
        _ => {
          self.invalid.get_or_insert(expr.span.start);
        }
      }
    }
    walk::walk_call_expression(self, expr);
  }
}

/// For each module the prepared body requires, the index of the first top-level statement that
/// does so. Only variable declarations and expression statements are scanned, requires inside a
/// wrapped module's functions don't pin a position.
pub fn find_requires(
  graph: &BundleGraph,
  module: &Module,
  stable_path: &str,
  ast: &EcmaAst,
) -> anyhow::Result<FxIndexMap<ModuleIdx, usize>> {
  let mut indices = FxIndexMap::default();

  for (index, stmt) in ast.program().body.iter().enumerate() {
    if !matches!(stmt, Statement::VariableDeclaration(_) | Statement::ExpressionStatement(_)) {
      continue;
    }

    let mut collector = RequireCollector::default();
    collector.visit_statement(stmt);
    if let Some(position) = collector.invalid {
      return Err(InvalidRequireCall { module: stable_path.into(), position }.into());
    }

    for (specifier, position) in collector.requires {
      let Some(dep) = graph.outgoing_dependencies(module.idx).find(|dep| dep.specifier == specifier)
      else {
        return Err(UnresolvedRequire { module: stable_path.into(), specifier, position }.into());
      };
      // Resolution can be missing when the edge was an unused re-export that got deferred.
      if let Some(resolved) = dep.resolved {
        indices.entry(resolved).or_insert(index);
      }
    }
  }

  Ok(indices)
}

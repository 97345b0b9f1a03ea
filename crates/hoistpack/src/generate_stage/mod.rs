pub mod formats;
mod hoisted_statements;

use arcstr::ArcStr;
use hoistpack_common::{BundleGraph, BundleIdx, ModuleIdx};
use hoistpack_ecmascript::{EcmaAst, EcmaCompiler};
use hoistpack_error::{MissingPreparedModule, ParseFailure};
use hoistpack_utils::indexmap::FxIndexMap;
use oxc::{
  allocator::{Allocator, CloneIn},
  ast::ast::Statement,
  parser::Parser,
  span::SourceType,
};
use rustc_hash::FxHashSet;

use crate::{
  link_stage::LinkStageOutput,
  prepare_stage::PreparedModules,
  runtime::{PRELUDE, RuntimeHelpers},
};

use self::hoisted_statements::HoistedStatements;

enum Action {
  Enter(ModuleIdx),
  Exit(ModuleIdx),
}

/// Statements collected for the children of one module that is being emitted.
struct Frame<'ast> {
  children: FxIndexMap<ModuleIdx, HoistedStatements<'ast>>,
}

pub struct GenerateOutput {
  pub ast: EcmaAst,
  pub markers: Vec<(usize, ArcStr)>,
}

/// Merges the prepared module bodies of one bundle into a single program. Every module lands
/// right before the first statement of its importer that requires it.
pub struct GenerateStage<'a> {
  graph: &'a BundleGraph,
  bundle_idx: BundleIdx,
  link_output: &'a LinkStageOutput,
  prepared: &'a PreparedModules,
}

impl<'a> GenerateStage<'a> {
  pub fn new(
    graph: &'a BundleGraph,
    bundle_idx: BundleIdx,
    link_output: &'a LinkStageOutput,
    prepared: &'a PreparedModules,
  ) -> Self {
    Self { graph, bundle_idx, link_output, prepared }
  }

  pub fn generate(&self) -> anyhow::Result<GenerateOutput> {
    let mut ast = EcmaCompiler::parse("", SourceType::mjs())?;
    let markers = ast.program.with_mut(|fields| -> anyhow::Result<_> {
      let (mut output, helpers) = self.hoist(fields.allocator)?;

      let mut preamble = HoistedStatements::default();
      if self.graph.needs_prelude(self.bundle_idx) {
        tracing::debug!("injecting the module registry prelude");
        preamble.stmts.extend(parse_runtime(fields.allocator, "<prelude>", PRELUDE)?);
      }
      for (name, source) in helpers.sources() {
        tracing::debug!("injecting runtime helper {name}");
        preamble.stmts.extend(parse_runtime(fields.allocator, name, source)?);
      }
      output.prepend(preamble);

      fields.program.body.extend(output.stmts);
      let mut markers = output.markers;
      markers.sort_by_key(|(index, _)| *index);
      Ok(markers)
    })?;

    Ok(GenerateOutput { ast, markers })
  }

  /// Depth-first over the bundle's module tree with an explicit stack. A module's statements
  /// are complete on exit, when all of its children have handed theirs up.
  fn hoist<'ast>(
    &self,
    alloc: &'ast Allocator,
  ) -> anyhow::Result<(HoistedStatements<'ast>, RuntimeHelpers)> {
    let bundle = &self.graph.bundles[self.bundle_idx];
    let mut output = HoistedStatements::default();
    let mut helpers = RuntimeHelpers::empty();
    let mut frames: Vec<Frame<'ast>> = vec![];
    let mut visited = FxHashSet::default();
    let mut skipped = 0usize;

    let mut stack = bundle.entries.iter().rev().map(|entry| Action::Enter(*entry)).collect::<Vec<_>>();

    while let Some(action) = stack.pop() {
      match action {
        Action::Enter(id) => {
          if !visited.insert(id) {
            continue;
          }
          let children = self.graph.modules[id]
            .dependencies
            .iter()
            .filter_map(|dep| self.graph.resolution(*dep))
            .filter(|target| bundle.contains(*target))
            .collect::<Vec<_>>();

          if self.should_skip(id) {
            // Children of a skipped module attach to the closest emitted ancestor.
            skipped += 1;
          } else {
            stack.push(Action::Exit(id));
            frames.push(Frame { children: FxIndexMap::default() });
          }
          stack.extend(children.into_iter().rev().map(Action::Enter));
        }
        Action::Exit(id) => {
          let Some(frame) = frames.pop() else {
            continue;
          };
          let Some(prepared) = self.prepared.get(&id) else {
            return Err(
              MissingPreparedModule { module: self.graph.modules[id].id.inner().clone() }.into(),
            );
          };
          helpers |= prepared.helpers;

          let mut statements = HoistedStatements {
            stmts: prepared.ast.program().body.iter().map(|stmt| stmt.clone_in(alloc)).collect(),
            markers: prepared.marker.iter().map(|marker| (0, marker.clone())).collect(),
          };
          // Back to front, so that splicing one child doesn't move the position of another.
          for (child, block) in frame.children.into_iter().rev() {
            let index = prepared.require_indices.get(&child).copied().unwrap_or(0);
            statements.splice(index, block);
          }

          match frames.last_mut() {
            Some(parent) => {
              parent.children.insert(id, statements);
            }
            None => output.append(statements),
          }
        }
      }
    }

    tracing::debug!(
      "{} modules emitted, {skipped} removed as unused",
      visited.len() - skipped
    );
    Ok((output, helpers))
  }

  /// A module nothing reads and whose evaluation can't be observed.
  fn should_skip(&self, id: ModuleIdx) -> bool {
    let module = &self.graph.modules[id];
    !module.has_side_effects()
      && !self.link_output.used_exports.has_any(id)
      && !self.graph.incoming_dependencies(id).any(|dep| dep.requests_namespace())
  }
}

fn parse_runtime<'ast>(
  alloc: &'ast Allocator,
  name: &str,
  source: &'static str,
) -> anyhow::Result<impl Iterator<Item = Statement<'ast>>> {
  let ret = Parser::new(alloc, source, SourceType::mjs()).parse();
  if !ret.errors.is_empty() {
    return Err(
      ParseFailure { module: name.into(), errors: ret.errors.iter().map(ToString::to_string).collect() }
        .into(),
    );
  }
  Ok(ret.program.body.into_iter())
}

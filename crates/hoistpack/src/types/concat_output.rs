use std::ops::Range;

use arcstr::ArcStr;
use hoistpack_common::ModuleIdx;
use hoistpack_ecmascript::EcmaAst;
use oxc::{
  allocator::{Allocator, CloneIn},
  ast::{AstBuilder, ast::Program},
  codegen::Codegen,
  span::SPAN,
};

use super::{WrappedModules, used_exports::UsedExports};

#[derive(Debug)]
pub struct ConcatOutput {
  /// One program holding every emitted statement of the bundle, in order.
  pub ast: EcmaAst,
  /// `(statement index, text)` of the comment that opens each module's code.
  pub markers: Vec<(usize, ArcStr)>,
  pub wrapped: WrappedModules,
  pub used_exports: UsedExports,
  /// Modules of this bundle that other bundles reach at runtime.
  pub referenced_modules: Vec<ModuleIdx>,
  pub warnings: Vec<anyhow::Error>,
}

impl ConcatOutput {
  pub fn marker_at(&self, index: usize) -> Option<&str> {
    self.markers.iter().find(|(i, _)| *i == index).map(|(_, text)| text.as_str())
  }

  /// Prints the bundle with each marker as a line comment ahead of the statement it points at.
  pub fn print(&self) -> String {
    let program = self.ast.program();
    let mut code = String::new();
    let mut start = 0;
    for (index, text) in &self.markers {
      code.push_str(&print_statements(program, start..*index));
      code.push_str("//");
      code.push_str(text);
      code.push('\n');
      start = *index;
    }
    code.push_str(&print_statements(program, start..program.body.len()));
    code
  }
}

fn print_statements(program: &Program, range: Range<usize>) -> String {
  if range.is_empty() {
    return String::new();
  }
  let allocator = Allocator::default();
  let builder = AstBuilder::new(&allocator);
  let body =
    builder.vec_from_iter(program.body[range].iter().map(|stmt| stmt.clone_in(&allocator)));
  let program =
    builder.program(SPAN, program.source_type, "", builder.vec(), None, builder.vec(), body);
  Codegen::new().build(&program).code
}

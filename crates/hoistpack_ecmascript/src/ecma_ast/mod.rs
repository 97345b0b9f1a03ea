pub mod program_cell;

use std::fmt::Debug;

use arcstr::ArcStr;
use oxc::{
  allocator::CloneIn,
  ast::ast::Program,
  span::SourceType,
};

use self::program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner};

/// - To access `&mut ast::Program`, use `ast.program.with_mut(|fields| { fields.program; })`.
pub struct EcmaAst {
  pub program: ProgramCell,
  pub source_type: SourceType,
}

impl EcmaAst {
  pub fn source(&self) -> &ArcStr {
    &self.program.borrow_owner().source
  }

  pub fn program(&self) -> &Program {
    &self.program.borrow_dependent().program
  }

  /// Deep-copy the program into a new arena. The copy can be rewritten freely while `self`
  /// stays untouched, and the two can live on different threads.
  pub fn clone_with_another_arena(&self) -> Self {
    let owner = ProgramCellOwner::new(self.source().clone());
    let program = ProgramCell::new(owner, |owner| ProgramCellDependent {
      program: self.program().clone_in(&owner.allocator),
    });
    Self { program, source_type: self.source_type }
  }
}

impl Debug for EcmaAst {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Ast").field("source", &self.source()).finish_non_exhaustive()
  }
}

unsafe impl Send for EcmaAst {}
unsafe impl Sync for EcmaAst {}

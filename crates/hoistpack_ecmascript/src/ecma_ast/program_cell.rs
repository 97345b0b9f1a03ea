use arcstr::ArcStr;
use oxc::{allocator::Allocator, ast::ast::Program};
use self_cell::self_cell;

pub struct ProgramCellOwner {
  pub source: ArcStr,
  pub allocator: Allocator,
}

impl ProgramCellOwner {
  pub fn new(source: ArcStr) -> Self {
    Self { source, allocator: Allocator::default() }
  }
}

pub struct ProgramCellDependent<'cell> {
  pub program: Program<'cell>,
}

self_cell!(
  /// Owns a `Program<'ast>` together with the arena it was allocated in, so a module body can be
  /// stored, sent to another thread and handed back without tracking `'ast`.
  pub struct ProgramCell {
    owner: ProgramCellOwner,

    #[covariant]
    dependent: ProgramCellDependent,
  }
);

/// Borrowed view of a `ProgramCell` that allows building new nodes in the program's own arena.
pub struct WithMutFields<'outer, 'inner> {
  pub source: &'inner ArcStr,
  pub allocator: &'inner Allocator,
  pub program: &'outer mut Program<'inner>,
}

impl ProgramCell {
  pub fn with_mut<'outer, Ret>(
    &'outer mut self,
    func: impl for<'inner> ::core::ops::FnOnce(WithMutFields<'outer, 'inner>) -> Ret,
  ) -> Ret {
    self.with_dependent_mut::<'outer, Ret>(
      |owner: &ProgramCellOwner, dependent: &'outer mut ProgramCellDependent| {
        func(WithMutFields {
          source: &owner.source,
          allocator: &owner.allocator,
          program: &mut dependent.program,
        })
      },
    )
  }
}

use arcstr::ArcStr;
use oxc::ast::ast::Statement;

/// A run of output statements together with the provenance markers that point into it.
#[derive(Default)]
pub struct HoistedStatements<'ast> {
  pub stmts: Vec<Statement<'ast>>,
  /// `(index into stmts, marker text)`
  pub markers: Vec<(usize, ArcStr)>,
}

impl<'ast> HoistedStatements<'ast> {
  /// Inserts `other` before `self.stmts[index]`. Markers behind the insertion point move with
  /// their statements.
  pub fn splice(&mut self, index: usize, other: Self) {
    let index = index.min(self.stmts.len());
    let len = other.stmts.len();
    for (position, _) in &mut self.markers {
      if *position >= index {
        *position += len;
      }
    }
    self.markers.extend(other.markers.into_iter().map(|(position, text)| (position + index, text)));
    self.stmts.splice(index..index, other.stmts);
  }

  pub fn append(&mut self, other: Self) {
    self.splice(self.stmts.len(), other);
  }

  pub fn prepend(&mut self, other: Self) {
    self.splice(0, other);
  }
}

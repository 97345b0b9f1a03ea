use oxc::{
  allocator::{TakeIn, Vec as ArenaVec},
  ast::ast::{
    Class, Expression, ForInStatement, ForOfStatement, ForStatement, ForStatementInit,
    ForStatementLeft, Function, Statement, VariableDeclarationKind,
  },
  ast_visit::{VisitMut, walk_mut},
  span::SPAN,
  syntax::scope::ScopeFlags,
};

use super::{ModuleWrapper, Rewrite};

impl<'ast> VisitMut<'ast> for ModuleWrapper<'_, 'ast> {
  fn visit_statements(&mut self, it: &mut ArenaVec<'ast, Statement<'ast>>) {
    let stmts = it.take_in(self.alloc);
    for stmt in stmts {
      match self.rewrite(stmt, false) {
        Rewrite::Keep(mut stmt) => {
          walk_mut::walk_statement(self, &mut stmt);
          it.push(stmt);
        }
        Rewrite::Skip(stmt) | Rewrite::Replace(stmt) => it.push(stmt),
        Rewrite::Remove => {}
      }
    }
  }

  // `if (x) var a = 1;` and friends, where a single statement stands without a block.
  fn visit_statement(&mut self, it: &mut Statement<'ast>) {
    let stmt = it.take_in(self.alloc);
    *it = match self.rewrite(stmt, false) {
      Rewrite::Keep(mut stmt) => {
        walk_mut::walk_statement(self, &mut stmt);
        stmt
      }
      Rewrite::Skip(stmt) | Rewrite::Replace(stmt) => stmt,
      Rewrite::Remove => self.snippet.builder.statement_empty(SPAN),
    };
  }

  fn visit_for_statement(&mut self, it: &mut ForStatement<'ast>) {
    it.init = match it.init.take() {
      Some(ForStatementInit::VariableDeclaration(decl)) if decl.kind == VariableDeclarationKind::Var => {
        self.hoist_declaration(decl).map(ForStatementInit::from)
      }
      init => init,
    };
    self.visit_statement(&mut it.body);
  }

  fn visit_for_in_statement(&mut self, it: &mut ForInStatement<'ast>) {
    self.rewrite_loop_left(&mut it.left);
    self.visit_statement(&mut it.body);
  }

  fn visit_for_of_statement(&mut self, it: &mut ForOfStatement<'ast>) {
    self.rewrite_loop_left(&mut it.left);
    self.visit_statement(&mut it.body);
  }

  // Nothing inside expressions, functions or classes belongs to the module scope.
  fn visit_expression(&mut self, _it: &mut Expression<'ast>) {}

  fn visit_function(&mut self, _it: &mut Function<'ast>, _flags: ScopeFlags) {}

  fn visit_class(&mut self, _it: &mut Class<'ast>) {}
}

impl<'ast> ModuleWrapper<'_, 'ast> {
  fn rewrite_loop_left(&mut self, left: &mut ForStatementLeft<'ast>) {
    if !matches!(left, ForStatementLeft::VariableDeclaration(decl) if decl.kind == VariableDeclarationKind::Var)
    {
      return;
    }
    if let ForStatementLeft::VariableDeclaration(decl) = left.take_in(self.alloc) {
      if let Some(target) = self.hoist_loop_declaration(decl) {
        *left = ForStatementLeft::from(target);
      }
    }
  }
}

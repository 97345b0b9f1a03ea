mod impl_visit_mut;

use hoistpack_common::{Module, SyntheticName};
use hoistpack_ecmascript_utils::AstSnippet;
use hoistpack_error::MalformedModule;
use hoistpack_utils::indexmap::FxIndexSet;
use oxc::{
  allocator::{Allocator, Box as ArenaBox, IntoIn, TakeIn},
  ast::ast::{
    self, AssignmentOperator, AssignmentTarget, AssignmentTargetMaybeDefault,
    AssignmentTargetProperty, BindingPattern, BindingPatternKind, ClassType, Expression,
    Statement, VariableDeclaration, VariableDeclarationKind,
  },
  span::{Atom, GetSpan, SPAN},
};

/// What happens to one statement of the body being wrapped.
pub enum Rewrite<'ast> {
  /// Keep it and rewrite the statements nested in it.
  Keep(Statement<'ast>),
  /// Keep it as is, without looking inside.
  Skip(Statement<'ast>),
  Replace(Statement<'ast>),
  Remove,
}

/// Turns a module body into
///
/// ```js
/// var a, b, $id$executed = false;
/// function hoisted() {}
/// function $id$exec() { /* the body, declarations turned into assignments */ }
/// function $id$init() {
///   if (!$id$executed) {
///     $id$executed = true;
///     $id$exec();
///   }
///   return $id$exports;
/// }
/// ```
///
/// so that the body runs once, on first demand, even when it is required from inside a cycle.
pub struct ModuleWrapper<'me, 'ast> {
  pub snippet: AstSnippet<'ast>,
  pub alloc: &'ast Allocator,
  pub module: &'me Module,
  pub stable_path: &'me str,
  hoisted_names: FxIndexSet<Atom<'ast>>,
  hoisted_functions: Vec<Statement<'ast>>,
  errors: Vec<anyhow::Error>,
}

impl<'me, 'ast> ModuleWrapper<'me, 'ast> {
  pub fn new(snippet: AstSnippet<'ast>, module: &'me Module, stable_path: &'me str) -> Self {
    Self {
      alloc: snippet.alloc(),
      snippet,
      module,
      stable_path,
      hoisted_names: FxIndexSet::default(),
      hoisted_functions: vec![],
      errors: vec![],
    }
  }

  pub fn wrap(mut self, program: &mut ast::Program<'ast>) -> anyhow::Result<()> {
    let body = program.body.take_in(self.alloc);
    let mut exec_body = self.snippet.builder.vec_with_capacity(body.len());
    for stmt in body {
      match self.rewrite(stmt, true) {
        Rewrite::Keep(mut stmt) => {
          oxc::ast_visit::walk_mut::walk_statement(&mut self, &mut stmt);
          exec_body.push(stmt);
        }
        Rewrite::Skip(stmt) | Rewrite::Replace(stmt) => exec_body.push(stmt),
        Rewrite::Remove => {}
      }
    }

    if let Some(err) = self.errors.into_iter().next() {
      return Err(err);
    }

    let executed = self.module.synthetic_name(SyntheticName::Executed);
    let exec = self.module.synthetic_name(SyntheticName::Exec);
    let init = self.module.synthetic_name(SyntheticName::Init);
    let snippet = &self.snippet;

    // var a, b, $id$executed = false;
    let declarators = self
      .hoisted_names
      .iter()
      .map(|name| (name.as_str(), None))
      .chain(std::iter::once((executed.as_str(), Some(snippet.bool_expr(false)))));
    program.body.push(snippet.var_decls_stmt(declarators));

    program.body.extend(self.hoisted_functions);
    program.body.push(snippet.function_decl_stmt(&exec, exec_body));

    // if (!$id$executed) { $id$executed = true; $id$exec(); }
    let mut run_once = snippet.builder.vec_with_capacity(2);
    run_once.push(snippet.assign_stmt(&executed, snippet.bool_expr(true)));
    run_once.push(snippet.call_expr_stmt(&exec));
    let mut init_body = snippet.builder.vec_with_capacity(2);
    init_body.push(snippet.if_stmt(snippet.not_expr(snippet.id_ref_expr(&executed, SPAN)), run_once));
    init_body.push(snippet.return_stmt(snippet.id_ref_expr(&self.module.exports_identifier, SPAN)));
    program.body.push(snippet.function_decl_stmt(&init, init_body));

    Ok(())
  }

  /// The dispatch for one statement. Function and class declarations are lifted only from the
  /// top level, `var` declarations from every block, `let`/`const` only from the top level.
  fn rewrite(&mut self, stmt: Statement<'ast>, top_level: bool) -> Rewrite<'ast> {
    match stmt {
      Statement::VariableDeclaration(decl) => {
        if matches!(decl.kind, VariableDeclarationKind::Using | VariableDeclarationKind::AwaitUsing) {
          if top_level {
            self.error(decl.span.start, "`using` declarations can't be hoisted out of a module");
          }
          return Rewrite::Skip(Statement::VariableDeclaration(decl));
        }
        if decl.kind != VariableDeclarationKind::Var && !top_level {
          return Rewrite::Skip(Statement::VariableDeclaration(decl));
        }
        match self.hoist_declaration(decl) {
          Some(expr) => Rewrite::Replace(self.snippet.builder.statement_expression(SPAN, expr)),
          None => Rewrite::Remove,
        }
      }
      Statement::FunctionDeclaration(_) if top_level => {
        self.hoisted_functions.push(stmt);
        Rewrite::Remove
      }
      Statement::ClassDeclaration(mut class) if top_level => {
        let Some(name) = class.id.as_ref().map(|id| id.name) else {
          self.error(class.span.start, "class declaration without a name");
          return Rewrite::Skip(Statement::ClassDeclaration(class));
        };
        self.hoisted_names.insert(name);
        // Class bindings aren't hoisted like functions, so the declaration becomes
        // `Name = class Name {}` and the binding moves out.
        class.r#type = ClassType::ClassExpression;
        Rewrite::Replace(self.snippet.assign_stmt(&name, Expression::ClassExpression(class)))
      }
      Statement::FunctionDeclaration(_) | Statement::ClassDeclaration(_) => Rewrite::Skip(stmt),
      stmt @ ast::match_module_declaration!(Statement) => {
        if top_level {
          self.error(stmt.span().start, "import/export statements must be compiled away first");
        }
        Rewrite::Skip(stmt)
      }
      _ => Rewrite::Keep(stmt),
    }
  }

  /// Collects every binding of the declaration and returns the assignments that replace it,
  /// `None` if nothing is left to assign.
  fn hoist_declaration(
    &mut self,
    decl: ArenaBox<'ast, VariableDeclaration<'ast>>,
  ) -> Option<Expression<'ast>> {
    let decl = decl.unbox();
    let mut assignments = vec![];
    for declarator in decl.declarations {
      let span = declarator.span;
      let Some(target) = self.binding_pattern_to_target(declarator.id) else {
        continue;
      };
      if let Some(init) = declarator.init {
        assignments.push(self.snippet.builder.expression_assignment(
          span,
          AssignmentOperator::Assign,
          target,
          init,
        ));
      }
    }

    match assignments.len() {
      0 => None,
      1 => assignments.pop(),
      _ => Some(
        self.snippet.builder.expression_sequence(SPAN, self.snippet.builder.vec_from_iter(assignments)),
      ),
    }
  }

  /// `for (var [a, b] of list)` becomes `for ([a, b] of list)`, the loop does the assignment.
  fn hoist_loop_declaration(
    &mut self,
    decl: ArenaBox<'ast, VariableDeclaration<'ast>>,
  ) -> Option<AssignmentTarget<'ast>> {
    let decl = decl.unbox();
    let span = decl.span;
    let Some(declarator) = decl.declarations.into_iter().next() else {
      self.error(span.start, "loop declaration without a binding");
      return None;
    };
    self.binding_pattern_to_target(declarator.id)
  }

  /// Records every bound name of `pattern` as hoisted and rebuilds the pattern as an assignment
  /// target.
  fn binding_pattern_to_target(
    &mut self,
    pattern: BindingPattern<'ast>,
  ) -> Option<AssignmentTarget<'ast>> {
    match pattern.kind {
      BindingPatternKind::BindingIdentifier(id) => {
        self.hoisted_names.insert(id.name);
        Some(self.snippet.simple_id_assignment_target(&id.name, id.span))
      }
      BindingPatternKind::ObjectPattern(object) => {
        let object = object.unbox();
        let mut properties = self.snippet.builder.vec_with_capacity(object.properties.len());
        for property in object.properties {
          properties.push(self.binding_property_to_target(property)?);
        }
        let rest = match object.rest {
          Some(rest) => Some(self.rest_to_target(rest.unbox())?),
          None => None,
        };
        Some(AssignmentTarget::ObjectAssignmentTarget(
          ast::ObjectAssignmentTarget {
            span: object.span,
            properties,
            rest: rest.map(|rest| rest.into_in(self.alloc)),
          }
          .into_in(self.alloc),
        ))
      }
      BindingPatternKind::ArrayPattern(array) => {
        let array = array.unbox();
        let mut elements = self.snippet.builder.vec_with_capacity(array.elements.len());
        for element in array.elements {
          elements.push(match element {
            Some(element) => Some(self.binding_pattern_to_maybe_default(element)?),
            None => None,
          });
        }
        let rest = match array.rest {
          Some(rest) => Some(self.rest_to_target(rest.unbox())?),
          None => None,
        };
        Some(AssignmentTarget::ArrayAssignmentTarget(
          ast::ArrayAssignmentTarget {
            span: array.span,
            elements,
            rest: rest.map(|rest| rest.into_in(self.alloc)),
          }
          .into_in(self.alloc),
        ))
      }
      BindingPatternKind::AssignmentPattern(assign) => {
        self.error(assign.span.start, "default value outside of a destructuring pattern");
        None
      }
    }
  }

  fn binding_pattern_to_maybe_default(
    &mut self,
    pattern: BindingPattern<'ast>,
  ) -> Option<AssignmentTargetMaybeDefault<'ast>> {
    if let BindingPatternKind::AssignmentPattern(assign) = pattern.kind {
      let assign = assign.unbox();
      let binding = self.binding_pattern_to_target(assign.left)?;
      return Some(AssignmentTargetMaybeDefault::AssignmentTargetWithDefault(
        ast::AssignmentTargetWithDefault { binding, init: assign.right, span: assign.span }
          .into_in(self.alloc),
      ));
    }
    self.binding_pattern_to_target(pattern).map(AssignmentTargetMaybeDefault::from)
  }

  fn binding_property_to_target(
    &mut self,
    property: ast::BindingProperty<'ast>,
  ) -> Option<AssignmentTargetProperty<'ast>> {
    if property.shorthand {
      // `{ a }` and `{ a = 1 }`
      let (id, init) = match property.value.kind {
        BindingPatternKind::BindingIdentifier(id) => (id, None),
        BindingPatternKind::AssignmentPattern(assign) => {
          let assign = assign.unbox();
          match assign.left.kind {
            BindingPatternKind::BindingIdentifier(id) => (id, Some(assign.right)),
            _ => {
              self.error(assign.span.start, "unexpected shorthand property pattern");
              return None;
            }
          }
        }
        _ => {
          self.error(property.span.start, "unexpected shorthand property pattern");
          return None;
        }
      };
      self.hoisted_names.insert(id.name);
      return Some(AssignmentTargetProperty::AssignmentTargetPropertyIdentifier(
        ast::AssignmentTargetPropertyIdentifier {
          span: property.span,
          binding: self.snippet.builder.identifier_reference(id.span, id.name),
          init,
        }
        .into_in(self.alloc),
      ));
    }

    let binding = self.binding_pattern_to_maybe_default(property.value)?;
    Some(AssignmentTargetProperty::AssignmentTargetPropertyProperty(
      ast::AssignmentTargetPropertyProperty {
        name: property.key,
        binding,
        span: property.span,
        computed: property.computed,
      }
      .into_in(self.alloc),
    ))
  }

  fn rest_to_target(
    &mut self,
    rest: ast::BindingRestElement<'ast>,
  ) -> Option<ast::AssignmentTargetRest<'ast>> {
    let target = self.binding_pattern_to_target(rest.argument)?;
    Some(ast::AssignmentTargetRest { span: rest.span, target })
  }

  fn error(&mut self, position: u32, reason: &str) {
    self.errors.push(
      MalformedModule {
        module: self.stable_path.into(),
        position,
        reason: reason.to_string(),
      }
      .into(),
    );
  }
}

use oxc::{
  allocator::{self, Allocator, Box},
  ast::{
    AstBuilder, NONE,
    ast::{
      self, Argument, Expression, ImportOrExportKind, Statement, UnaryOperator,
      VariableDeclarationKind,
    },
  },
  span::{SPAN, Span},
};

type PassedStr<'a> = &'a str;

// `AstBuilder` is more suitable name, but it's already used in oxc.
pub struct AstSnippet<'ast> {
  pub builder: AstBuilder<'ast>,
}

impl<'ast> AstSnippet<'ast> {
  pub fn new(alloc: &'ast Allocator) -> Self {
    Self { builder: AstBuilder::new(alloc) }
  }

  #[inline]
  pub fn alloc(&self) -> &'ast Allocator {
    self.builder.allocator
  }

  #[inline]
  pub fn id(&self, name: PassedStr, span: Span) -> ast::BindingIdentifier<'ast> {
    self.builder.binding_identifier(span, self.builder.atom(name))
  }

  #[inline]
  pub fn alloc_id_ref(
    &self,
    name: PassedStr,
    span: Span,
  ) -> Box<'ast, ast::IdentifierReference<'ast>> {
    self.builder.alloc_identifier_reference(span, self.builder.atom(name))
  }

  #[inline]
  pub fn id_ref_expr(&self, name: PassedStr, span: Span) -> ast::Expression<'ast> {
    self.builder.expression_identifier(span, self.builder.atom(name))
  }

  /// ```js
  ///  id = ...
  /// ￣￣ AssignmentTarget
  /// ```
  pub fn simple_id_assignment_target(
    &self,
    id: PassedStr,
    span: Span,
  ) -> ast::AssignmentTarget<'ast> {
    ast::AssignmentTarget::AssignmentTargetIdentifier(self.alloc_id_ref(id, span))
  }

  /// `name()`
  pub fn call_expr_expr(&self, name: PassedStr) -> ast::Expression<'ast> {
    self.builder.expression_call(
      SPAN,
      self.builder.expression_identifier(SPAN, self.builder.atom(name)),
      NONE,
      self.builder.vec(),
      false,
    )
  }

  /// `name()`
  #[inline]
  pub fn call_expr_stmt(&self, name: PassedStr) -> ast::Statement<'ast> {
    self.builder.statement_expression(SPAN, self.call_expr_expr(name))
  }

  /// `name(arg)`
  pub fn call_expr_with_arg_expr_expr(
    &self,
    name: PassedStr,
    arg: ast::Expression<'ast>,
  ) -> ast::Expression<'ast> {
    self.builder.expression_call(
      SPAN,
      self.builder.expression_identifier(SPAN, self.builder.atom(name)),
      NONE,
      self.builder.vec1(Argument::from(arg)),
      false,
    )
  }

  /// `name(arg);`
  pub fn call_expr_with_arg_stmt(
    &self,
    name: PassedStr,
    arg: ast::Expression<'ast>,
  ) -> ast::Statement<'ast> {
    self.builder.statement_expression(SPAN, self.call_expr_with_arg_expr_expr(name, arg))
  }

  /// `var [name] = [init]`
  #[inline]
  pub fn var_decl_stmt(
    &self,
    name: PassedStr,
    init: ast::Expression<'ast>,
  ) -> ast::Statement<'ast> {
    self.var_decls_stmt([(name, Some(init))])
  }

  /// `var a, b = [init], ...`
  pub fn var_decls_stmt<'n>(
    &self,
    declarators: impl IntoIterator<Item = (&'n str, Option<ast::Expression<'ast>>)>,
  ) -> ast::Statement<'ast> {
    let declarations =
      self.builder.vec_from_iter(declarators.into_iter().map(|(name, init)| {
        self.builder.variable_declarator(
          SPAN,
          VariableDeclarationKind::Var,
          self.builder.binding_pattern(
            self.builder.binding_pattern_kind_binding_identifier(SPAN, self.builder.atom(name)),
            NONE,
            false,
          ),
          init,
          false,
        )
      }));

    Statement::VariableDeclaration(self.builder.alloc_variable_declaration(
      SPAN,
      VariableDeclarationKind::Var,
      declarations,
      false,
    ))
  }

  /// `[name] = [value];`
  pub fn assign_stmt(&self, name: PassedStr, value: ast::Expression<'ast>) -> ast::Statement<'ast> {
    self.builder.statement_expression(
      SPAN,
      self.builder.expression_assignment(
        SPAN,
        ast::AssignmentOperator::Assign,
        self.simple_id_assignment_target(name, SPAN),
        value,
      ),
    )
  }

  pub fn bool_expr(&self, value: bool) -> ast::Expression<'ast> {
    self.builder.expression_boolean_literal(SPAN, value)
  }

  /// `!expr`
  pub fn not_expr(&self, expr: ast::Expression<'ast>) -> ast::Expression<'ast> {
    self.builder.expression_unary(SPAN, UnaryOperator::LogicalNot, expr)
  }

  /// `if ([test]) { [body] }`
  pub fn if_stmt(
    &self,
    test: ast::Expression<'ast>,
    body: allocator::Vec<'ast, Statement<'ast>>,
  ) -> ast::Statement<'ast> {
    self.builder.statement_if(SPAN, test, self.builder.statement_block(SPAN, body), None)
  }

  // return xxx
  pub fn return_stmt(&self, argument: ast::Expression<'ast>) -> ast::Statement<'ast> {
    self.builder.statement_return(SPAN, Some(argument))
  }

  /// `function [name]() { [body] }`
  pub fn function_decl_stmt(
    &self,
    name: PassedStr,
    body: allocator::Vec<'ast, Statement<'ast>>,
  ) -> ast::Statement<'ast> {
    Statement::FunctionDeclaration(self.builder.alloc_function(
      SPAN,
      ast::FunctionType::FunctionDeclaration,
      Some(self.id(name, SPAN)),
      false,
      false,
      false,
      NONE,
      NONE,
      self.builder.formal_parameters(
        SPAN,
        ast::FormalParameterKind::FormalParameter,
        self.builder.vec(),
        NONE,
      ),
      NONE,
      Some(self.builder.function_body(SPAN, self.builder.vec(), body)),
    ))
  }

  /// `import [default], * as [namespace] from '[source]'` or
  /// `import [default], { [imported] as [local] } from '[source]'`
  ///
  /// With no specifiers at all this is a side-effect import, `import '[source]'`.
  pub fn import_stmt(
    &self,
    source: PassedStr,
    default: Option<PassedStr>,
    namespace: Option<PassedStr>,
    named: &[(PassedStr /*imported*/, PassedStr /*local*/)],
  ) -> ast::Statement<'ast> {
    let mut specifiers = self.builder.vec_with_capacity(named.len() + 2);
    if let Some(local) = default {
      specifiers.push(ast::ImportDeclarationSpecifier::ImportDefaultSpecifier(
        self.builder.alloc_import_default_specifier(SPAN, self.id(local, SPAN)),
      ));
    }
    if let Some(local) = namespace {
      specifiers.push(ast::ImportDeclarationSpecifier::ImportNamespaceSpecifier(
        self.builder.alloc_import_namespace_specifier(SPAN, self.id(local, SPAN)),
      ));
    }
    for (imported, local) in named {
      specifiers.push(ast::ImportDeclarationSpecifier::ImportSpecifier(
        self.builder.alloc_import_specifier(
          SPAN,
          self.builder.module_export_name_identifier_name(SPAN, self.builder.atom(imported)),
          self.id(local, SPAN),
          ImportOrExportKind::Value,
        ),
      ));
    }

    let specifiers = if specifiers.is_empty() { None } else { Some(specifiers) };
    ast::Statement::ImportDeclaration(self.builder.alloc_import_declaration(
      SPAN,
      specifiers,
      self.builder.string_literal(SPAN, self.builder.atom(source), None),
      None,
      NONE,
      ImportOrExportKind::Value,
    ))
  }

  /// convert `Expression` to
  /// export default ${Expression}
  pub fn export_default_expr_stmt(&self, expr: Expression<'ast>) -> Statement<'ast> {
    self.export_default_decl_stmt(ast::ExportDefaultDeclarationKind::from(expr))
  }

  /// `export default function foo() {}`, `export default class Foo {}` or `export default expr`
  pub fn export_default_decl_stmt(
    &self,
    declaration: ast::ExportDefaultDeclarationKind<'ast>,
  ) -> Statement<'ast> {
    let ast_builder = &self.builder;
    Statement::from(ast_builder.module_declaration_export_default_declaration(
      SPAN,
      ast_builder.module_export_name_identifier_name(SPAN, "default"),
      declaration,
    ))
  }

  /// `export [declaration]`
  pub fn export_decl_stmt(&self, declaration: ast::Declaration<'ast>) -> Statement<'ast> {
    Statement::from(self.builder.module_declaration_export_named_declaration(
      SPAN,
      Some(declaration),
      self.builder.vec(),
      None,
      ImportOrExportKind::Value,
      NONE,
    ))
  }

  /// `export { [local] as [exported], ... }`
  pub fn export_named_stmt<T: AsRef<str>>(
    &self,
    specifiers: &[(T /*local*/, T /*exported*/, bool /*legal ident*/)],
  ) -> Statement<'ast> {
    Statement::from(self.builder.module_declaration_export_named_declaration(
      SPAN,
      None,
      {
        let mut vec = self.builder.vec_with_capacity(specifiers.len());
        for (local, exported, legal_ident) in specifiers {
          vec.push(self.builder.export_specifier(
            SPAN,
            self.builder.module_export_name_identifier_reference(SPAN, self.builder.atom(local.as_ref())),
            if *legal_ident {
              self.builder.module_export_name_identifier_name(SPAN, self.builder.atom(exported.as_ref()))
            } else {
              self.builder.module_export_name_string_literal(SPAN, self.builder.atom(exported.as_ref()), None)
            },
            ImportOrExportKind::Value,
          ));
        }
        vec
      },
      None,
      ImportOrExportKind::Value,
      NONE,
    ))
  }
}

#[test]
fn test_synthesized_statements() {
  use hoistpack_ecmascript::EcmaCompiler;
  use oxc::span::SourceType;

  let mut ast = EcmaCompiler::parse("", SourceType::default()).unwrap();
  ast.program.with_mut(|fields| {
    let snippet = AstSnippet::new(fields.allocator);
    let body = snippet.builder.vec1(snippet.assign_stmt("done", snippet.bool_expr(true)));
    fields.program.body.push(snippet.var_decls_stmt([("a", None), ("done", Some(snippet.bool_expr(false)))]));
    fields.program.body.push(snippet.if_stmt(snippet.not_expr(snippet.id_ref_expr("done", SPAN)), body));
    fields.program.body.push(snippet.function_decl_stmt(
      "init",
      snippet.builder.vec1(snippet.return_stmt(snippet.id_ref_expr("exports", SPAN))),
    ));
  });

  let code = EcmaCompiler::print(&ast).code;
  assert!(code.contains("var a, done = false;"));
  assert!(code.contains("if (!done)"));
  assert!(code.contains("done = true;"));
  assert!(code.contains("function init()"));
  assert!(code.contains("return exports;"));
}

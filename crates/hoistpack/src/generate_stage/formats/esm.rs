use arcstr::ArcStr;
use hoistpack_common::{BundleGraph, BundleIdx, ModuleIdx, SyntheticName, WILDCARD};
use hoistpack_ecmascript_utils::AstSnippet;
use hoistpack_utils::{ecmascript::is_validate_identifier_name, indexmap::FxIndexMap};
use oxc::{
  ast::ast::{Declaration, ExportDefaultDeclarationKind, Statement},
  span::SPAN,
};

/// A module the bundle imports from outside the bundle graph.
#[derive(Debug, Default)]
pub struct ExternalModule {
  pub source: ArcStr,
  /// Imported name -> local binding.
  pub specifiers: FxIndexMap<ArcStr, ArcStr>,
  pub is_commonjs: bool,
}

/// A binding the bundle exports under another name.
#[derive(Debug, Clone)]
pub struct Reexport {
  pub local: ArcStr,
  pub exported: ArcStr,
}

/// `import { $a$init, $b$init } from "./other.js";` for modules of `to` that `from` initializes.
pub fn generate_bundle_imports<'ast>(
  snippet: &AstSnippet<'ast>,
  graph: &BundleGraph,
  from: BundleIdx,
  to: BundleIdx,
  modules: &[ModuleIdx],
) -> Vec<Statement<'ast>> {
  let names = modules
    .iter()
    .map(|module| graph.modules[*module].synthetic_name(SyntheticName::Init))
    .collect::<Vec<_>>();
  let named = names.iter().map(|name| (name.as_str(), name.as_str())).collect::<Vec<_>>();
  let source = graph.bundles[from].import_path_for(&graph.bundles[to]);
  vec![snippet.import_stmt(&source, None, None, &named)]
}

/// ES modules can combine a default import with either a namespace import or named imports,
/// never with both. A namespace import therefore gets a declaration of its own.
pub fn generate_external_import<'ast>(
  snippet: &AstSnippet<'ast>,
  external: &ExternalModule,
) -> Vec<Statement<'ast>> {
  let mut default = None;
  let mut namespace = None;
  let mut named = vec![];
  for (imported, local) in &external.specifiers {
    if external.is_commonjs || imported.as_str() == "default" {
      default = Some(local.as_str());
    } else if imported.as_str() == WILDCARD {
      namespace = Some(local.as_str());
    } else {
      named.push((imported.as_str(), local.as_str()));
    }
  }

  let mut stmts = vec![];
  if namespace.is_some() {
    stmts.push(snippet.import_stmt(&external.source, default.take(), namespace, &[]));
  }
  if default.is_some() || !named.is_empty() || stmts.is_empty() {
    stmts.push(snippet.import_stmt(&external.source, default, None, &named));
  }
  stmts
}

/// `export { $a$init, local as exported };` for what other bundles read from this one, plus
/// `export default $entry$exports;` when the main entry is CommonJS.
pub fn generate_bundle_exports<'ast>(
  snippet: &AstSnippet<'ast>,
  graph: &BundleGraph,
  bundle: BundleIdx,
  referenced_modules: &[ModuleIdx],
  reexports: &[Reexport],
) -> Vec<Statement<'ast>> {
  let mut stmts = vec![];

  if !referenced_modules.is_empty() || !reexports.is_empty() {
    let specifiers = referenced_modules
      .iter()
      .map(|module| {
        let name = graph.modules[*module].synthetic_name(SyntheticName::Init);
        (name.clone(), name, true)
      })
      .chain(reexports.iter().map(|reexport| {
        (
          reexport.local.to_string(),
          reexport.exported.to_string(),
          is_validate_identifier_name(&reexport.exported),
        )
      }))
      .collect::<Vec<_>>();
    stmts.push(snippet.export_named_stmt(&specifiers));
  }

  if let Some(entry) = graph.bundles[bundle].main_entry {
    let entry = &graph.modules[entry];
    if entry.is_commonjs() {
      stmts.push(snippet.export_default_expr_stmt(snippet.id_ref_expr(&entry.exports_identifier, SPAN)));
    }
  }

  stmts
}

/// Exports a top-level statement of the main entry under the names in `exported`.
///
/// A declaration exported only as `default` becomes `export default <decl>`, one whose bindings
/// are all exported under their own names becomes `export <decl>`. Anything else is kept as is
/// and followed by `export default local;` and `export { local as exported };`.
pub fn generate_main_export<'ast>(
  snippet: &AstSnippet<'ast>,
  stmt: Statement<'ast>,
  exported: &[Reexport],
) -> Vec<Statement<'ast>> {
  if matches!(stmt, Statement::ExpressionStatement(_)) {
    return vec![stmt];
  }

  let default = exported.iter().find(|export| export.exported.as_str() == "default");
  let named = exported.iter().filter(|export| export.exported.as_str() != "default").collect::<Vec<_>>();

  let stmt = if exported.len() == 1 && default.is_some() {
    match stmt {
      Statement::FunctionDeclaration(func) => {
        return vec![
          snippet.export_default_decl_stmt(ExportDefaultDeclarationKind::FunctionDeclaration(func)),
        ];
      }
      Statement::ClassDeclaration(class) => {
        return vec![
          snippet.export_default_decl_stmt(ExportDefaultDeclarationKind::ClassDeclaration(class)),
        ];
      }
      stmt => stmt,
    }
  } else {
    stmt
  };

  let declared = declared_names(&stmt);
  let exports_every_binding = named.len() == exported.len()
    && named.len() == declared.len()
    && named
      .iter()
      .all(|export| export.local == export.exported && declared.contains(&export.local.as_str()));
  let stmt = if exports_every_binding {
    match stmt {
      Statement::VariableDeclaration(decl) => {
        return vec![snippet.export_decl_stmt(Declaration::VariableDeclaration(decl))];
      }
      Statement::FunctionDeclaration(func) => {
        return vec![snippet.export_decl_stmt(Declaration::FunctionDeclaration(func))];
      }
      Statement::ClassDeclaration(class) => {
        return vec![snippet.export_decl_stmt(Declaration::ClassDeclaration(class))];
      }
      stmt => stmt,
    }
  } else {
    stmt
  };

  let mut stmts = vec![stmt];
  if let Some(default) = default {
    stmts.push(snippet.export_default_expr_stmt(snippet.id_ref_expr(&default.local, SPAN)));
  }
  if !named.is_empty() {
    let specifiers = named
      .iter()
      .map(|export| {
        (export.local.as_str(), export.exported.as_str(), is_validate_identifier_name(&export.exported))
      })
      .collect::<Vec<_>>();
    stmts.push(snippet.export_named_stmt(&specifiers));
  }
  stmts
}

fn declared_names<'s>(stmt: &'s Statement<'_>) -> Vec<&'s str> {
  match stmt {
    Statement::VariableDeclaration(decl) => decl
      .declarations
      .iter()
      .flat_map(|declarator| declarator.id.get_binding_identifiers())
      .map(|id| id.name.as_str())
      .collect(),
    Statement::FunctionDeclaration(func) => func.id.iter().map(|id| id.name.as_str()).collect(),
    Statement::ClassDeclaration(class) => class.id.iter().map(|id| id.name.as_str()).collect(),
    _ => vec![],
  }
}

#[cfg(test)]
mod tests {
  use arcstr::ArcStr;
  use hoistpack_common::{BundleGraph, ModuleBody, ModuleMeta, OutputFormat};
  use hoistpack_ecmascript::EcmaCompiler;
  use hoistpack_ecmascript_utils::AstSnippet;
  use oxc::span::SourceType;

  use super::{
    ExternalModule, Reexport, generate_bundle_exports, generate_bundle_imports,
    generate_external_import, generate_main_export,
  };

  fn print(build: impl for<'ast> FnOnce(&AstSnippet<'ast>) -> Vec<oxc::ast::ast::Statement<'ast>>) -> String {
    let mut ast = EcmaCompiler::parse("", SourceType::mjs()).unwrap();
    ast.program.with_mut(|fields| {
      let snippet = AstSnippet::new(fields.allocator);
      fields.program.body.extend(build(&snippet));
    });
    EcmaCompiler::print(&ast).code
  }

  fn external(specifiers: &[(&str, &str)], is_commonjs: bool) -> ExternalModule {
    ExternalModule {
      source: "lib".into(),
      specifiers: specifiers.iter().map(|(imported, local)| ((*imported).into(), (*local).into())).collect(),
      is_commonjs,
    }
  }

  #[test]
  fn external_import_splits_namespace_from_named() {
    let code = print(|snippet| {
      generate_external_import(snippet, &external(&[("default", "d"), ("*", "ns"), ("a", "b")], false))
    });
    assert!(code.contains("import d, * as ns from \"lib\";"), "{code}");
    assert!(code.contains("import { a as b } from \"lib\";"), "{code}");
  }

  #[test]
  fn external_import_of_commonjs_is_a_default_import() {
    let code = print(|snippet| generate_external_import(snippet, &external(&[("a", "a")], true)));
    assert_eq!(code.trim(), "import a from \"lib\";");

    let code = print(|snippet| generate_external_import(snippet, &external(&[], false)));
    assert_eq!(code.trim(), "import \"lib\";");
  }

  #[test]
  fn bundle_imports_and_exports() {
    let mut graph = BundleGraph::new();
    let entry = graph.add_module("entry", "entry.js", ModuleBody::Compiled(ArcStr::new()));
    let shared = graph.add_module("shared", "shared.js", ModuleBody::Compiled(ArcStr::new()));
    graph.modules[entry].meta = ModuleMeta::IS_COMMONJS;
    let main = graph.add_bundle("main", OutputFormat::Esm, None);
    graph.add_entry(main, entry);
    graph.add_to_bundle(main, shared);
    let lazy = graph.add_bundle("lazy", OutputFormat::Esm, Some(main));

    let code = print(|snippet| generate_bundle_imports(snippet, &graph, lazy, main, &[shared]));
    assert_eq!(code.trim(), "import { $shared$init } from \"./main.js\";");

    let code = print(|snippet| {
      generate_bundle_exports(
        snippet,
        &graph,
        main,
        &[shared],
        &[Reexport { local: "$shared$var$x".into(), exported: "x".into() }],
      )
    });
    assert!(code.contains("export { $shared$init, $shared$var$x as x };"), "{code}");
    assert!(code.contains("export default $entry$exports;"), "{code}");
  }

  fn main_export(code: &str, exported: &[(&str, &str)]) -> String {
    let exported = exported
      .iter()
      .map(|(local, exported)| Reexport { local: (*local).into(), exported: (*exported).into() })
      .collect::<Vec<_>>();
    let mut ast = EcmaCompiler::parse(code.to_string(), SourceType::mjs()).unwrap();
    ast.program.with_mut(|fields| {
      let snippet = AstSnippet::new(fields.allocator);
      let stmt = fields.program.body.pop().unwrap();
      fields.program.body.extend(generate_main_export(&snippet, stmt, &exported));
    });
    EcmaCompiler::print(&ast).code
  }

  #[test]
  fn main_export_of_a_lone_default_exports_the_declaration() {
    let code = main_export("function foo() {}", &[("foo", "default")]);
    assert!(code.starts_with("export default function foo()"), "{code}");

    let code = main_export("class Foo {}", &[("Foo", "default")]);
    assert!(code.starts_with("export default class Foo"), "{code}");
  }

  #[test]
  fn main_export_of_every_binding_exports_the_declaration() {
    let code = main_export("var a = 1, { b } = obj;", &[("a", "a"), ("b", "b")]);
    assert!(code.starts_with("export var a = 1,"), "{code}");
    assert!(!code.contains("export {"), "{code}");

    let code = main_export("function foo() {}", &[("foo", "foo")]);
    assert!(code.starts_with("export function foo()"), "{code}");
    assert!(!code.contains("export {"), "{code}");
  }

  #[test]
  fn main_export_otherwise_follows_the_declaration() {
    let code = main_export("var a = 1, b = 2;", &[("a", "default"), ("b", "b")]);
    let lines = code.lines().map(str::trim).collect::<Vec<_>>();
    assert_eq!(lines, vec!["var a = 1, b = 2;", "export default a;", "export { b };"]);

    // A variable declaration never becomes `export default var`.
    let code = main_export("var a = 1;", &[("a", "default")]);
    assert!(code.starts_with("var a = 1;"), "{code}");
    assert!(code.contains("export default a;"), "{code}");

    // Only some bindings, or a renamed one.
    let code = main_export("var a = 1, b = 2;", &[("a", "a")]);
    assert!(code.contains("export { a };"), "{code}");
    let code = main_export("function foo() {}", &[("foo", "bar")]);
    assert!(code.starts_with("function foo()"), "{code}");
    assert!(code.contains("export { foo as bar };"), "{code}");
  }

  #[test]
  fn main_export_keeps_expression_statements() {
    assert_eq!(main_export("foo();", &[("foo", "default")]).trim(), "foo();");
  }
}

use arcstr::ArcStr;
use hoistpack_error::ParseFailure;
use oxc::{
  codegen::{Codegen, CodegenReturn},
  parser::{ParseOptions, Parser},
  span::SourceType,
};

use crate::ecma_ast::{
  EcmaAst,
  program_cell::{ProgramCell, ProgramCellDependent, ProgramCellOwner},
};

pub struct EcmaCompiler;

impl EcmaCompiler {
  pub fn parse(source: impl Into<ArcStr>, source_type: SourceType) -> anyhow::Result<EcmaAst> {
    Self::parse_module("<input>", source, source_type)
  }

  /// Parse already-compiled module code. `module` only names the input in diagnostics.
  pub fn parse_module(
    module: &str,
    source: impl Into<ArcStr>,
    source_type: SourceType,
  ) -> anyhow::Result<EcmaAst> {
    Self::parse_with_options(module, source, source_type, ParseOptions::default())
  }

  /// CommonJS bodies are sloppy scripts and may `return` from the module function.
  pub fn parse_commonjs(module: &str, source: impl Into<ArcStr>) -> anyhow::Result<EcmaAst> {
    let options = ParseOptions { allow_return_outside_function: true, ..ParseOptions::default() };
    Self::parse_with_options(module, source, SourceType::cjs(), options)
  }

  fn parse_with_options(
    module: &str,
    source: impl Into<ArcStr>,
    source_type: SourceType,
    options: ParseOptions,
  ) -> anyhow::Result<EcmaAst> {
    let owner = ProgramCellOwner::new(source.into());
    let program = ProgramCell::try_new(owner, |owner| {
      let ret =
        Parser::new(&owner.allocator, &owner.source, source_type).with_options(options).parse();
      if ret.errors.is_empty() {
        Ok(ProgramCellDependent { program: ret.program })
      } else {
        Err(ParseFailure {
          module: module.into(),
          errors: ret.errors.iter().map(ToString::to_string).collect(),
        })
      }
    })?;

    Ok(EcmaAst { program, source_type })
  }

  pub fn print(ast: &EcmaAst) -> CodegenReturn {
    Codegen::new().build(ast.program())
  }
}

#[test]
fn basic_test() {
  let ast = EcmaCompiler::parse("const a = 1;", SourceType::default()).unwrap();
  let code = EcmaCompiler::print(&ast).code;
  assert_eq!(code, "const a = 1;\n");
}

#[test]
fn parse_failure_names_the_module() {
  let err = EcmaCompiler::parse_module("src/broken.js", "var = ;", SourceType::default())
    .expect_err("should fail to parse");
  let failure = err.downcast_ref::<ParseFailure>().expect("should be a ParseFailure");
  assert_eq!(failure.module.as_str(), "src/broken.js");
  assert!(!failure.errors.is_empty());
}

#[test]
fn commonjs_body_may_return_early() {
  let source = "if (done) return; main();";
  assert!(EcmaCompiler::parse_module("src/lib.js", source, SourceType::mjs()).is_err());

  let ast = EcmaCompiler::parse_commonjs("src/lib.js", source).unwrap();
  assert_eq!(ast.program().body.len(), 2);
  assert!(EcmaCompiler::print(&ast).code.contains("return;"));
}

#[test]
fn cloned_ast_is_independent() {
  let ast = EcmaCompiler::parse("var a = 1; foo(a);", SourceType::default()).unwrap();
  let mut cloned = ast.clone_with_another_arena();
  cloned.program.with_mut(|fields| {
    fields.program.body.pop();
  });
  assert_eq!(ast.program().body.len(), 2);
  assert_eq!(cloned.program().body.len(), 1);
}

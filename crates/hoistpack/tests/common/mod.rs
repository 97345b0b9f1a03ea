#![allow(dead_code)]

use std::{io::ErrorKind, process::Command};

use hoistpack::{
  BundleGraph, BundleIdx, ConcatOptions, ConcatOutput, EcmaCompiler, ModuleBody, ModuleIdx,
  OutputFormat, ScopeHoister,
};

pub fn hoister() -> ScopeHoister {
  ScopeHoister::new(ConcatOptions {
    max_concurrency: Some(4),
    project_root: Some("/project".into()),
    wrap_circular_dependencies: None,
  })
  .unwrap()
}

/// A module at `/project/src/<id>.js` whose body is compiled code still to be parsed.
pub fn add_module(graph: &mut BundleGraph, id: &str, code: &str) -> ModuleIdx {
  graph.add_module(id, format!("/project/src/{id}.js"), ModuleBody::Compiled(code.into()))
}

/// A bundle holding `entry` and every module in `modules`.
pub fn add_bundle(
  graph: &mut BundleGraph,
  name: &str,
  format: OutputFormat,
  parent: Option<BundleIdx>,
  entry: ModuleIdx,
  modules: &[ModuleIdx],
) -> BundleIdx {
  let bundle = graph.add_bundle(name, format, parent);
  graph.add_entry(bundle, entry);
  for module in modules {
    graph.add_to_bundle(bundle, *module);
  }
  bundle
}

pub fn print(output: &ConcatOutput) -> String {
  EcmaCompiler::print(&output.ast).code
}

/// Byte offset of `needle` in `code`, failing the test when it's missing.
pub fn position(code: &str, needle: &str) -> usize {
  code.find(needle).unwrap_or_else(|| panic!("expected to find {needle:?} in:\n{code}"))
}

/// Runs `code` and then `epilogue` as one script under node, with `$hoist$require` calling the
/// init function of the requested module. Returns stdout, or `None` when node isn't installed.
pub fn run_in_node(code: &str, epilogue: &str) -> Option<String> {
  let script = format!(
    "function $hoist$require(id) {{ return eval('$' + id + '$init')(); }}\n{code}\n{epilogue}"
  );
  let output = match Command::new("node").arg("-e").arg(&script).output() {
    Ok(output) => output,
    Err(err) if err.kind() == ErrorKind::NotFound => return None,
    Err(err) => panic!("failed to spawn node: {err}"),
  };
  assert!(
    output.status.success(),
    "{}\n{script}",
    String::from_utf8_lossy(&output.stderr)
  );
  Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

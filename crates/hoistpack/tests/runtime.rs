mod common;

use hoistpack::{BundleGraph, DependencyMeta, ModuleMeta, OutputFormat};

use crate::common::{add_bundle, add_module, hoister, position, print};

fn commonjs_default_import(requested: &str) -> String {
  let mut graph = BundleGraph::new();
  let main = add_module(&mut graph, "main", r#"var lib = $hoist$require("lib", "./lib");"#);
  let lib = add_module(&mut graph, "lib", "var $lib$exports = {}; $lib$exports.value = 1;");
  graph.modules[lib].meta = ModuleMeta::IS_COMMONJS;
  let dep = graph.add_dependency(Some(main), "./lib", Some(lib));
  graph.add_symbol(dep, requested, "lib");
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[lib]);
  print(&hoister().concat(&graph, bundle).unwrap())
}

#[test]
fn commonjs_default_import_gets_one_interop_declaration() {
  let code = commonjs_default_import("default");
  assert_eq!(
    code.matches("var $lib$interop$default = $hoist$interopDefault($lib$exports);").count(),
    1,
    "{code}"
  );
  assert_eq!(code.matches("function $hoist$interopDefault(").count(), 1, "{code}");
  assert!(position(&code, "function $hoist$interopDefault(") < position(&code, "$lib$exports = {}"));
}

#[test]
fn named_import_of_commonjs_needs_no_interop() {
  let code = commonjs_default_import("value");
  assert!(!code.contains("interopDefault"), "{code}");
}

fn esm_default_consumed_by(meta: DependencyMeta) -> String {
  let mut graph = BundleGraph::new();
  let main = add_module(&mut graph, "main", r#"var esm = $hoist$require("esm", "./esm");"#);
  let esm = add_module(&mut graph, "esm", "var $esm$exports = {}; var $esm$var$default = 1;");
  graph.add_export(esm, "default", "$esm$var$default");
  let dep = graph.add_dependency(Some(main), "./esm", Some(esm));
  graph.add_symbol(dep, "default", "esm");
  graph.dependencies[dep].meta = meta;
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[esm]);
  print(&hoister().concat(&graph, bundle).unwrap())
}

#[test]
fn esm_default_consumed_by_commonjs_is_flagged_once() {
  let code = esm_default_consumed_by(DependencyMeta::IS_COMMONJS);
  assert_eq!(code.matches("$hoist$defineInteropFlag($esm$exports);").count(), 1, "{code}");
  assert_eq!(code.matches("function $hoist$defineInteropFlag(").count(), 1, "{code}");
}

#[test]
fn esm_default_consumed_by_esm_is_not_flagged() {
  let code = esm_default_consumed_by(DependencyMeta::empty());
  assert!(!code.contains("defineInteropFlag"), "{code}");
}

#[test]
fn esm_default_read_from_another_bundle_is_flagged() {
  let mut graph = BundleGraph::new();
  let main = add_module(&mut graph, "main", "main();");
  let esm = add_module(&mut graph, "esm", "var $esm$exports = {};");
  let lazy = add_module(&mut graph, "lazy", r#"var esm = $hoist$require("esm", "./esm");"#);
  graph.add_export(esm, "default", "$esm$var$default");
  graph.add_dependency(Some(main), "./esm", Some(esm));
  graph.add_dependency(Some(lazy), "./esm", Some(esm));
  let entry = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[esm]);
  add_bundle(&mut graph, "lazy", OutputFormat::Esm, Some(entry), lazy, &[]);

  let output = hoister().concat(&graph, entry).unwrap();
  assert_eq!(output.referenced_modules, vec![esm]);
  assert!(output.used_exports.is_used(esm, "default"));
  assert!(print(&output).contains("$hoist$defineInteropFlag($esm$exports);"));
}

fn shared_across_bundles(format: OutputFormat) -> hoistpack::ConcatOutput {
  let mut graph = BundleGraph::new();
  let main = add_module(&mut graph, "main", r#"$hoist$require("shared", "./shared");"#);
  let shared = add_module(&mut graph, "shared", "shared();");
  let lazy = add_module(&mut graph, "lazy", r#"$hoist$require("shared", "./shared");"#);
  graph.add_dependency(Some(main), "./shared", Some(shared));
  graph.add_dependency(Some(lazy), "./shared", Some(shared));
  let entry = add_bundle(&mut graph, "main", format, None, main, &[shared]);
  add_bundle(&mut graph, "lazy", format, Some(entry), lazy, &[]);
  hoister().concat(&graph, entry).unwrap()
}

#[test]
fn global_entry_bundle_gets_the_prelude_first() {
  let output = shared_across_bundles(OutputFormat::Global);
  let code = print(&output);
  assert_eq!(code.matches("hoistRequire.register").count(), 1, "{code}");
  assert!(position(&code, "hoistRequire.register") < position(&code, "shared();"), "{code}");

  // Markers point past the prelude.
  let (index, marker) = &output.markers[0];
  assert_eq!(marker.as_str(), " ASSET: src/shared.js");
  assert!(*index > 0);
}

#[test]
fn esm_bundle_never_gets_the_prelude() {
  let code = print(&shared_across_bundles(OutputFormat::Esm));
  assert!(!code.contains("hoistRequire"), "{code}");
}

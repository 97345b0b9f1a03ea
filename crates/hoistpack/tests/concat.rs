mod common;

use hoistpack::{
  BundleGraph, DependencyIdx, InvalidRequireCall, ModuleIdx, ModuleMeta, OutputFormat,
  UnresolvedRequire,
};

use crate::common::{add_bundle, add_module, hoister, position, print};

#[test]
fn dependencies_land_before_their_require_sites_in_order() {
  let mut graph = BundleGraph::new();
  let main = add_module(
    &mut graph,
    "main",
    r#"
      before();
      var d1 = $hoist$require("d1", "./d1");
      var d2 = $hoist$require("d2", "./d2");
      after(d1, d2);
    "#,
  );
  let d1 = add_module(&mut graph, "d1", "first();");
  let d2 = add_module(&mut graph, "d2", "second();");
  graph.add_dependency(Some(main), "./d1", Some(d1));
  graph.add_dependency(Some(main), "./d2", Some(d2));
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[d1, d2]);

  let output = hoister().concat(&graph, bundle).unwrap();
  let code = print(&output);

  let before = position(&code, "before();");
  let first = position(&code, "first();");
  let require_d1 = position(&code, "var d1 =");
  let second = position(&code, "second();");
  let require_d2 = position(&code, "var d2 =");
  assert!(before < first, "{code}");
  assert!(first < require_d1, "{code}");
  assert!(require_d1 < second, "{code}");
  assert!(second < require_d2, "{code}");

  assert_eq!(output.marker_at(0), Some(" ASSET: src/main.js"));
  assert_eq!(output.marker_at(1), Some(" ASSET: src/d1.js"));
  assert_eq!(output.marker_at(3), Some(" ASSET: src/d2.js"));
  assert_eq!(output.ast.program().body.len(), 6);
  assert!(output.warnings.is_empty());
}

#[test]
fn printed_bundle_carries_the_markers() {
  let mut graph = BundleGraph::new();
  let main = add_module(&mut graph, "main", r#"var lib = $hoist$require("lib", "./lib"); main();"#);
  let lib = add_module(&mut graph, "lib", "lib();");
  graph.add_dependency(Some(main), "./lib", Some(lib));
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[lib]);

  let code = hoister().concat(&graph, bundle).unwrap().print();
  assert_eq!(code.lines().next(), Some("// ASSET: src/lib.js"), "{code}");
  assert_eq!(code.matches("// ASSET:").count(), 2, "{code}");
  assert!(position(&code, "lib();") < position(&code, "// ASSET: src/main.js"), "{code}");
  assert!(position(&code, "// ASSET: src/main.js") < position(&code, "var lib ="), "{code}");
}

#[test]
fn commonjs_module_may_return_early() {
  let mut graph = BundleGraph::new();
  let main = add_module(&mut graph, "main", "var $main$exports = {}; if (done) return; main();");
  graph.modules[main].meta = ModuleMeta::IS_COMMONJS;
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[]);

  let code = print(&hoister().concat(&graph, bundle).unwrap());
  assert!(code.contains("return;"), "{code}");
  assert!(code.contains("main();"), "{code}");
}

#[test]
fn a_dependency_without_a_require_site_goes_first() {
  let mut graph = BundleGraph::new();
  let main = add_module(&mut graph, "main", "main();");
  let lib = add_module(&mut graph, "lib", "lib();");
  graph.add_dependency(Some(main), "./lib", Some(lib));
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[lib]);

  let code = print(&hoister().concat(&graph, bundle).unwrap());
  assert!(position(&code, "lib();") < position(&code, "main();"), "{code}");
}

#[test]
fn a_shared_module_is_emitted_once() {
  let mut graph = BundleGraph::new();
  let main = add_module(
    &mut graph,
    "main",
    r#"$hoist$require("a", "./a"); $hoist$require("b", "./b");"#,
  );
  let a = add_module(&mut graph, "a", r#"$hoist$require("shared", "./shared"); a();"#);
  let b = add_module(&mut graph, "b", r#"$hoist$require("shared", "./shared"); b();"#);
  let shared = add_module(&mut graph, "shared", "shared();");
  graph.add_dependency(Some(main), "./a", Some(a));
  graph.add_dependency(Some(main), "./b", Some(b));
  graph.add_dependency(Some(a), "./shared", Some(shared));
  graph.add_dependency(Some(b), "./shared", Some(shared));
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[a, b, shared]);

  let code = print(&hoister().concat(&graph, bundle).unwrap());
  assert_eq!(code.matches("shared();").count(), 1, "{code}");
  assert!(position(&code, "shared();") < position(&code, "a();"), "{code}");
}

/// Builds `main -> lib` where `lib` is side-effect free, unused and imported without a
/// wildcard, then lets `tweak` flip one of those conditions.
fn lib_is_emitted(tweak: impl FnOnce(&mut BundleGraph, ModuleIdx, DependencyIdx)) -> bool {
  let mut graph = BundleGraph::new();
  let main = add_module(&mut graph, "main", r#"var lib = $hoist$require("lib", "./lib");"#);
  let lib = add_module(&mut graph, "lib", "var $lib$var$x = compute();");
  graph.modules[lib].side_effects = false;
  graph.add_export(lib, "x", "$lib$var$x");
  let dep = graph.add_dependency(Some(main), "./lib", Some(lib));
  tweak(&mut graph, lib, dep);
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[lib]);

  let code = print(&hoister().concat(&graph, bundle).unwrap());
  code.contains("compute()")
}

#[test]
fn unused_side_effect_free_module_is_removed() {
  assert!(!lib_is_emitted(|_, _, _| {}));
}

#[test]
fn each_condition_keeps_the_module() {
  assert!(lib_is_emitted(|graph, lib, _| graph.modules[lib].side_effects = true));
  assert!(lib_is_emitted(|graph, lib, _| graph.modules[lib].meta = ModuleMeta::IS_COMMONJS));
  assert!(lib_is_emitted(|graph, _, dep| graph.add_symbol(dep, "x", "x")));
  assert!(lib_is_emitted(|graph, _, dep| graph.add_symbol(dep, "*", "lib")));
}

#[test]
fn only_the_requested_export_is_used() {
  let mut graph = BundleGraph::new();
  let entry = add_module(&mut graph, "entry", r#"var { x } = $hoist$require("a", "./a");"#);
  let a = add_module(&mut graph, "a", "var $a$var$x = 1, $a$var$y = 2;");
  graph.modules[a].side_effects = false;
  graph.add_export(a, "x", "$a$var$x");
  graph.add_export(a, "y", "$a$var$y");
  let dep = graph.add_dependency(Some(entry), "./a", Some(a));
  graph.add_symbol(dep, "x", "x");
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, entry, &[a]);

  let output = hoister().concat(&graph, bundle).unwrap();
  let used = output.used_exports.get(a).unwrap();
  assert_eq!(used.iter().map(|symbol| symbol.as_str()).collect::<Vec<_>>(), vec!["x"]);
  assert!(print(&output).contains("$a$var$x = 1"));
}

#[test]
fn reexport_chain_marks_only_the_declaring_module() {
  let mut graph = BundleGraph::new();
  let entry = add_module(&mut graph, "entry", r#"var { x } = $hoist$require("r", "./r");"#);
  let r = add_module(&mut graph, "r", r#"$hoist$require("a", "./a"); var $r$var$own = 1;"#);
  let a = add_module(&mut graph, "a", "var $a$var$x = 1;");
  graph.modules[r].side_effects = false;
  graph.modules[a].side_effects = false;
  let entry_to_r = graph.add_dependency(Some(entry), "./r", Some(r));
  let r_to_a = graph.add_dependency(Some(r), "./a", Some(a));
  graph.add_symbol(entry_to_r, "x", "x");
  graph.add_reexport(r, "x", r_to_a, "x");
  graph.add_export(r, "own", "$r$var$own");
  graph.add_export(a, "x", "$a$var$x");
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, entry, &[r, a]);

  let output = hoister().concat(&graph, bundle).unwrap();
  assert!(output.used_exports.is_used(a, "x"));
  assert!(!output.used_exports.has_any(r));

  let code = print(&output);
  assert!(code.contains("$a$var$x = 1"), "{code}");
  assert!(!code.contains("$r$var$own"), "{code}");
}

#[test]
fn main_entry_exports_are_used() {
  let mut graph = BundleGraph::new();
  let entry = add_module(&mut graph, "entry", "var $entry$var$api = 1;");
  graph.add_export(entry, "api", "$entry$var$api");
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, entry, &[]);

  let output = hoister().concat(&graph, bundle).unwrap();
  assert!(output.used_exports.is_used(entry, "api"));
}

#[test]
fn require_without_a_matching_edge_fails_the_bundle() {
  let mut graph = BundleGraph::new();
  let main = add_module(&mut graph, "main", r#"var x = $hoist$require("x", "./missing");"#);
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[]);

  let err = hoister().concat(&graph, bundle).unwrap_err();
  let unresolved = err.downcast_first::<UnresolvedRequire>().unwrap();
  assert_eq!(unresolved.specifier.as_str(), "./missing");
  assert_eq!(unresolved.module.as_str(), "src/main.js");
}

#[test]
fn require_with_a_computed_specifier_is_rejected() {
  let mut graph = BundleGraph::new();
  let main = add_module(&mut graph, "main", r#"var x = $hoist$require("x", name);"#);
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[]);

  let err = hoister().concat(&graph, bundle).unwrap_err();
  assert!(err.downcast_first::<InvalidRequireCall>().is_some(), "{err}");
}

#[test]
fn unresolved_edges_are_skipped() {
  let mut graph = BundleGraph::new();
  let main = add_module(&mut graph, "main", r#"var x = $hoist$require("x", "./deferred"); main();"#);
  graph.add_dependency(Some(main), "./deferred", None);
  let bundle = add_bundle(&mut graph, "main", OutputFormat::Esm, None, main, &[]);

  let code = print(&hoister().concat(&graph, bundle).unwrap());
  assert!(code.contains("main();"));
}

#[test]
fn concat_bundles_reports_every_failure() {
  let mut graph = BundleGraph::new();
  let ok = add_module(&mut graph, "ok", "ok();");
  let broken_a = add_module(&mut graph, "broken_a", r#"$hoist$require("x", "./x");"#);
  let broken_b = add_module(&mut graph, "broken_b", r#"$hoist$require("y", "./y");"#);
  let ok_bundle = add_bundle(&mut graph, "ok", OutputFormat::Esm, None, ok, &[]);
  add_bundle(&mut graph, "a", OutputFormat::Esm, None, broken_a, &[]);
  add_bundle(&mut graph, "b", OutputFormat::Esm, None, broken_b, &[]);

  let err = hoister().concat_bundles(&graph).unwrap_err();
  assert_eq!(err.len(), 2);

  assert!(err.downcast_first::<UnresolvedRequire>().is_some());
  assert!(hoister().concat(&graph, ok_bundle).is_ok());
}

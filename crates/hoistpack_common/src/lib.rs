mod bundle;
mod bundle_graph;
mod concat_options;
mod dependency;
mod module;
mod types;

pub use crate::{
  bundle::Bundle,
  bundle_graph::BundleGraph,
  concat_options::{ConcatOptions, normalized_concat_options::NormalizedConcatOptions},
  dependency::{Dependency, DependencyMeta, WILDCARD},
  module::{ExportEntry, Module, ModuleBody, ModuleMeta, SyntheticName},
  types::{
    module_id::ModuleId,
    output_format::OutputFormat,
    raw_idx::{BundleIdx, DependencyIdx, ModuleIdx},
  },
};

#[test]
fn test_deserialize_options() {
  let options: ConcatOptions =
    serde_json::from_str(r#"{ "maxConcurrency": 4, "wrapCircularDependencies": false }"#).unwrap();
  assert_eq!(options.max_concurrency, Some(4));
  assert_eq!(options.wrap_circular_dependencies, Some(false));
  assert!(options.project_root.is_none());

  let format: OutputFormat = serde_json::from_str(r#""global""#).unwrap();
  assert_eq!(format, OutputFormat::Global);
}

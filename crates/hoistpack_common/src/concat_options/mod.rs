pub mod normalized_concat_options;

use std::path::PathBuf;

use serde::Deserialize;

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConcatOptions {
  /// Size of the worker pool that prepares module bodies.
  pub max_concurrency: Option<usize>,
  /// Provenance markers and diagnostics show module paths relative to this directory.
  pub project_root: Option<PathBuf>,
  /// Wrap the modules that close an import cycle.
  pub wrap_circular_dependencies: Option<bool>,
}

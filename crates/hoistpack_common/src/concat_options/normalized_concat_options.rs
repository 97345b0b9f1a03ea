use std::path::PathBuf;

#[derive(Debug)]
pub struct NormalizedConcatOptions {
  pub max_concurrency: usize,
  pub project_root: PathBuf,
  pub wrap_circular_dependencies: bool,
}

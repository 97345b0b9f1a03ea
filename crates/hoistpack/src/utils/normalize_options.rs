use hoistpack_common::{ConcatOptions, NormalizedConcatOptions};

pub fn normalize_options(raw_options: ConcatOptions) -> NormalizedConcatOptions {
  NormalizedConcatOptions {
    max_concurrency: raw_options.max_concurrency.filter(|n| *n > 0).unwrap_or(32),
    project_root: raw_options
      .project_root
      .unwrap_or_else(|| std::env::current_dir().unwrap_or_default()),
    wrap_circular_dependencies: raw_options.wrap_circular_dependencies.unwrap_or(true),
  }
}

#[test]
fn test_defaults() {
  let options = normalize_options(ConcatOptions { max_concurrency: Some(0), ..Default::default() });
  assert_eq!(options.max_concurrency, 32);
  assert!(options.wrap_circular_dependencies);
}

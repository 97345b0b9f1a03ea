use std::sync::Arc;

use hoistpack_common::{BundleGraph, BundleIdx, ConcatOptions};
use hoistpack_error::{BuildError, BuildResult};
use hoistpack_utils::rayon::{
  IntoParallelIterator, ParallelIterator, ThreadPool, ThreadPoolBuilder,
};

use crate::{
  generate_stage::{GenerateOutput, GenerateStage},
  link_stage::LinkStage,
  prepare_stage::PrepareStage,
  types::{SharedOptions, concat_output::ConcatOutput},
  utils::normalize_options::normalize_options,
};

/// Concatenates the modules of a bundle into one program.
pub struct ScopeHoister {
  options: SharedOptions,
  pool: ThreadPool,
}

impl ScopeHoister {
  pub fn new(options: ConcatOptions) -> BuildResult<Self> {
    let options = normalize_options(options);
    let pool = ThreadPoolBuilder::new()
      .num_threads(options.max_concurrency)
      .thread_name(|index| format!("hoistpack-prepare-{index}"))
      .build()
      .map_err(anyhow::Error::from)?;
    Ok(Self { options: Arc::new(options), pool })
  }

  /// Runs the three stages for one bundle: whole-bundle analysis, per-module preparation on the
  /// worker pool, then the merge. Any failure fails the bundle, there is no partial output.
  #[tracing::instrument(level = "debug", skip_all, fields(bundle = %graph.bundles[bundle_idx].name))]
  pub fn concat(&self, graph: &BundleGraph, bundle_idx: BundleIdx) -> BuildResult<ConcatOutput> {
    let link_output = LinkStage::new(graph, bundle_idx, &self.options).link()?;

    let prepared = PrepareStage::new(graph, bundle_idx, &self.options, &link_output.wrapped)
      .prepare(&link_output.modules, &self.pool)?;

    let GenerateOutput { ast, markers } =
      GenerateStage::new(graph, bundle_idx, &link_output, &prepared).generate()?;

    Ok(ConcatOutput {
      ast,
      markers,
      wrapped: link_output.wrapped,
      used_exports: link_output.used_exports,
      referenced_modules: link_output.referenced_modules,
      warnings: link_output.warnings,
    })
  }

  /// Concatenates every bundle of the graph. Bundles are independent, failures of all of them
  /// are reported together.
  pub fn concat_bundles(&self, graph: &BundleGraph) -> BuildResult<Vec<ConcatOutput>> {
    let results = graph
      .bundles
      .indices()
      .collect::<Vec<_>>()
      .into_par_iter()
      .map(|bundle_idx| self.concat(graph, bundle_idx))
      .collect::<Vec<_>>();

    let mut outputs = Vec::with_capacity(results.len());
    let mut errors = vec![];
    for result in results {
      match result {
        Ok(output) => outputs.push(output),
        Err(BuildError(errs)) => errors.extend(errs),
      }
    }
    if !errors.is_empty() {
      return Err(errors.into());
    }
    Ok(outputs)
  }
}

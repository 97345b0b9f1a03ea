pub mod concat_output;
pub mod prepared_module;
pub mod used_exports;

use std::sync::Arc;

use hoistpack_common::{ModuleIdx, NormalizedConcatOptions};
use hoistpack_utils::indexmap::FxIndexSet;

pub type SharedOptions = Arc<NormalizedConcatOptions>;

/// Modules of one bundle that are emitted as lazily initialized units. Filled by the link stage,
/// read-only afterwards.
pub type WrappedModules = FxIndexSet<ModuleIdx>;

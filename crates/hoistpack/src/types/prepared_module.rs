use arcstr::ArcStr;
use hoistpack_common::ModuleIdx;
use hoistpack_ecmascript::EcmaAst;
use hoistpack_utils::indexmap::FxIndexMap;

use crate::runtime::RuntimeHelpers;

/// A module body ready to be spliced, in its own arena.
#[derive(Debug)]
pub struct PreparedModule {
  pub ast: EcmaAst,
  /// ` ASSET: <path>`, attached to the first statement. `None` for an empty body.
  pub marker: Option<ArcStr>,
  pub helpers: RuntimeHelpers,
  /// Dependency module -> index of the first statement that requires it.
  pub require_indices: FxIndexMap<ModuleIdx, usize>,
}

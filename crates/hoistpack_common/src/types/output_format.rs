use std::fmt::Display;

use serde::Deserialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
  #[default]
  Esm,
  Cjs,
  /// Plain script that shares modules with other bundles through the runtime registry.
  Global,
}

impl OutputFormat {
  #[inline]
  pub fn may_need_prelude(&self) -> bool {
    matches!(self, Self::Global)
  }
}

impl Display for OutputFormat {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Esm => write!(f, "esm"),
      Self::Cjs => write!(f, "cjs"),
      Self::Global => write!(f, "global"),
    }
  }
}

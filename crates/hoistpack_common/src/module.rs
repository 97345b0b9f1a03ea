use std::path::{Path, PathBuf};

use arcstr::ArcStr;
use hoistpack_ecmascript::EcmaAst;
use hoistpack_utils::{ecmascript::legitimize_identifier_name, indexmap::FxIndexMap, xxhash::xxhash_hex};
use sugar_path::SugarPath;

use crate::{DependencyIdx, ModuleId, ModuleIdx};

bitflags::bitflags! {
  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
  pub struct ModuleMeta: u8 {
    const IS_COMMONJS = 1;
    const IS_ESM = 1 << 1;
  }
}

/// The body a module arrives with from the compile pipeline.
#[derive(Debug)]
pub enum ModuleBody {
  /// A cached syntax tree. It is cloned, never rewritten in place.
  Parsed(EcmaAst),
  /// Already-transpiled code that still needs to be parsed.
  Compiled(ArcStr),
}

#[derive(Debug, Clone)]
pub enum ExportEntry {
  /// `export { local as exported }`
  Local { local: ArcStr },
  /// `export { imported as exported } from '...'`
  ReExport { dependency: DependencyIdx, imported: ArcStr },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntheticName {
  Executed,
  Exec,
  Init,
  InteropDefault,
}

impl SyntheticName {
  fn suffix(self) -> &'static str {
    match self {
      Self::Executed => "executed",
      Self::Exec => "exec",
      Self::Init => "init",
      Self::InteropDefault => "interop$default",
    }
  }
}

#[derive(Debug)]
pub struct Module {
  pub idx: ModuleIdx,
  pub id: ModuleId,
  pub file_path: PathBuf,
  pub body: ModuleBody,
  pub side_effects: bool,
  pub meta: ModuleMeta,
  /// The top-level binding that holds the module's exports object.
  pub exports_identifier: ArcStr,
  /// Exported name -> where the binding lives.
  pub exports: FxIndexMap<ArcStr, ExportEntry>,
  /// `export * from '...'`
  pub star_exports: Vec<DependencyIdx>,
  /// Outgoing edges, in the order their require calls appear in the body.
  pub dependencies: Vec<DependencyIdx>,
  /// Incoming edges.
  pub importers: Vec<DependencyIdx>,
  name_prefix: String,
}

impl Module {
  pub fn new(idx: ModuleIdx, id: ModuleId, file_path: PathBuf, body: ModuleBody) -> Self {
    let name_prefix = name_prefix_for(&id);
    Self {
      idx,
      exports_identifier: format!("{name_prefix}$exports").into(),
      id,
      file_path,
      body,
      side_effects: true,
      meta: ModuleMeta::IS_ESM,
      exports: FxIndexMap::default(),
      star_exports: vec![],
      dependencies: vec![],
      importers: vec![],
      name_prefix,
    }
  }

  #[inline]
  pub fn is_commonjs(&self) -> bool {
    self.meta.contains(ModuleMeta::IS_COMMONJS)
  }

  #[inline]
  pub fn is_esm(&self) -> bool {
    self.meta.contains(ModuleMeta::IS_ESM)
  }

  /// CommonJS exports can't be analyzed statically, such a module always counts as effectful.
  #[inline]
  pub fn has_side_effects(&self) -> bool {
    self.side_effects || self.is_commonjs()
  }

  #[inline]
  pub fn has_export(&self, name: &str) -> bool {
    self.exports.contains_key(name)
  }

  pub fn synthetic_name(&self, kind: SyntheticName) -> String {
    format!("{}${}", self.name_prefix, kind.suffix())
  }

  /// Path used in provenance markers and diagnostics, relative to `project_root` when possible.
  pub fn stable_path(&self, project_root: &Path) -> String {
    if self.file_path.is_absolute() {
      self.file_path.relative(project_root).as_path().to_slash_lossy().into_owned()
    } else {
      self.file_path.to_slash_lossy().into_owned()
    }
  }
}

/// `$<id>` for ids that are already identifier fragments, otherwise the legitimized id plus a
/// short hash so that `a-b` and `a_b` stay apart.
fn name_prefix_for(id: &ModuleId) -> String {
  let is_fragment = !id.is_empty() && id.chars().all(is_name_fragment_char);
  if is_fragment {
    format!("${id}")
  } else {
    let hash = xxhash_hex(id.as_bytes());
    format!("${}_{}", legitimize_identifier_name(id).trim_start_matches('_'), &hash[..8])
  }
}

fn is_name_fragment_char(c: char) -> bool {
  c == '$' || c == '_' || c.is_ascii_alphanumeric()
}

#[test]
fn test_name_prefix() {
  assert_eq!(name_prefix_for(&"abc123".into()), "$abc123");
  let prefix = name_prefix_for(&"src/a-b.js".into());
  assert!(prefix.starts_with("$src_a_b_js_"), "{prefix}");
  assert_eq!(prefix.len(), "$src_a_b_js_".len() + 8);
  assert_ne!(name_prefix_for(&"a-b".into()), name_prefix_for(&"a_b".into()));
}

use std::path::Path;

use arcstr::ArcStr;
use hoistpack_utils::indexmap::FxIndexSet;

use sugar_path::SugarPath;

use crate::{BundleIdx, ModuleIdx, OutputFormat};

#[derive(Debug)]
pub struct Bundle {
  pub idx: BundleIdx,
  pub name: ArcStr,
  /// Output file name, relative to the output directory.
  pub file_name: ArcStr,
  pub format: OutputFormat,
  pub entries: Vec<ModuleIdx>,
  pub main_entry: Option<ModuleIdx>,
  /// Every module whose code lives in this bundle.
  pub modules: FxIndexSet<ModuleIdx>,
  pub parent: Option<BundleIdx>,
  pub children: Vec<BundleIdx>,
}

impl Bundle {
  #[inline]
  pub fn contains(&self, module: ModuleIdx) -> bool {
    self.modules.contains(&module)
  }

  #[inline]
  pub fn is_entry_bundle(&self) -> bool {
    self.parent.is_none()
  }

  /// Specifier that loads `importee` from this bundle's output file, always starting with `.`.
  pub fn import_path_for(&self, importee: &Bundle) -> String {
    let root = Path::new("/");
    let source = root.join(self.file_name.as_str());
    let source_dir = source.parent().unwrap_or(root);
    let import_path = root
      .join(importee.file_name.as_str())
      .relative(source_dir)
      .as_path()
      .to_slash_lossy()
      .into_owned();
    if import_path.starts_with('.') { import_path } else { format!("./{import_path}") }
  }
}

#[test]
fn test_import_path_for() {
  let bundle = |file_name: &str| Bundle {
    idx: BundleIdx::from_usize(0),
    name: "b".into(),
    file_name: file_name.into(),
    format: OutputFormat::Esm,
    entries: vec![],
    main_entry: None,
    modules: FxIndexSet::default(),
    parent: None,
    children: vec![],
  };
  assert_eq!(bundle("main.js").import_path_for(&bundle("lazy.js")), "./lazy.js");
  assert_eq!(bundle("pages/a.js").import_path_for(&bundle("shared.js")), "../shared.js");
}

use std::ops::{Deref, DerefMut};

#[derive(Debug)]
pub struct BuildError(pub Vec<anyhow::Error>);

impl BuildError {
  /// Find the first error of type `T`, looking through the `anyhow` wrappers.
  pub fn downcast_first<T>(&self) -> Option<&T>
  where
    T: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
  {
    self.0.iter().find_map(|err| err.downcast_ref::<T>())
  }
}

impl Deref for BuildError {
  type Target = Vec<anyhow::Error>;

  fn deref(&self) -> &Self::Target {
    &self.0
  }
}

impl DerefMut for BuildError {
  fn deref_mut(&mut self) -> &mut Self::Target {
    &mut self.0
  }
}

impl From<anyhow::Error> for BuildError {
  fn from(error: anyhow::Error) -> Self {
    Self(vec![error])
  }
}

impl From<Vec<anyhow::Error>> for BuildError {
  fn from(errors: Vec<anyhow::Error>) -> Self {
    Self(errors)
  }
}

impl std::fmt::Display for BuildError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    for (i, err) in self.0.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{err:#}")?;
    }
    Ok(())
  }
}

pub type BuildResult<T> = anyhow::Result<T, BuildError>;

#[test]
fn test_downcast_first() {
  use crate::UnresolvedRequire;

  let err = BuildError::from(vec![
    anyhow::anyhow!("unrelated"),
    UnresolvedRequire { module: "src/a.js".into(), specifier: "./b".into(), position: 4 }.into(),
  ]);
  let found = err.downcast_first::<UnresolvedRequire>().expect("should find the typed error");
  assert_eq!(found.specifier.as_str(), "./b");
  assert_eq!(err.len(), 2);
}

//! Code shared by every concatenated bundle: the module registry and the interop helpers.

/// Callee of the runtime require calls left in prepared module bodies,
/// `$hoist$require(local, "./specifier")`.
pub const RUNTIME_REQUIRE: &str = "$hoist$require";

pub const INTEROP_DEFAULT: &str = "$hoist$interopDefault";
pub const DEFINE_INTEROP_FLAG: &str = "$hoist$defineInteropFlag";

pub const PRELUDE: &str = include_str!("./prelude.js");

bitflags::bitflags! {
  #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
  pub struct RuntimeHelpers: u8 {
    const INTEROP_DEFAULT = 1;
    const DEFINE_INTEROP_FLAG = 1 << 1;
  }
}

impl RuntimeHelpers {
  /// `(name, source)` of every helper in the set, in a fixed order.
  pub fn sources(self) -> impl Iterator<Item = (&'static str, &'static str)> {
    [
      (Self::INTEROP_DEFAULT, INTEROP_DEFAULT, include_str!("./interop_default.js")),
      (Self::DEFINE_INTEROP_FLAG, DEFINE_INTEROP_FLAG, include_str!("./define_interop_flag.js")),
    ]
    .into_iter()
    .filter(move |(flag, _, _)| self.contains(*flag))
    .map(|(_, name, source)| (name, source))
  }
}

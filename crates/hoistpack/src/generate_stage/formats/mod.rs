//! Statements a downstream format generator wraps around a concatenated bundle.

pub mod esm;

pub mod ecmascript;
pub mod indexmap;
pub mod rayon;
pub mod xxhash;

pub use rayon::{
  ThreadPool, ThreadPoolBuilder,
  iter::{IntoParallelIterator, IntoParallelRefIterator, ParallelIterator},
};

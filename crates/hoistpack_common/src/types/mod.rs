pub mod module_id;
pub mod output_format;
pub mod raw_idx;

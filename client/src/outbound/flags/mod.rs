//! On-disk flag store.

mod atomic_io;
mod json_file_store;

pub use json_file_store::{FLAGS_FILE, JsonFileFlagStore};

// src/reader/mod.rs
mod family_reader;
mod fetch;
mod handle;
mod options;
mod selection;
mod time;

pub use family_reader::{FamilyReader, ReaderState};
pub use fetch::{fetch, fetch_scalar};
pub use handle::ReaderHandle;
pub use options::ReaderOptions;
pub use selection::{apply_selection, update_active_partitions, update_active_variables};
pub use time::{resolve_time, Resolution};

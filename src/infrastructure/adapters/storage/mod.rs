//! Sound Store 适配器

mod file_sound_store;

pub use file_sound_store::{FileSoundStore, FileSoundStoreConfig, ReconcileReport};

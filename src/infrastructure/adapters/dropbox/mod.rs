//! Dropbox 适配器 - Filebin

mod filebin_client;

pub use filebin_client::{FilebinClient, FilebinClientConfig};

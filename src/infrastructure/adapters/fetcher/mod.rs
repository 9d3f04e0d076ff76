//! Sound Fetcher 适配器 - HTTP 下载

mod http_fetcher;

pub use http_fetcher::{HttpSoundFetcher, HttpSoundFetcherConfig};

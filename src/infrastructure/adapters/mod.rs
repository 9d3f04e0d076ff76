//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod dropbox;
pub mod fetcher;
pub mod storage;
pub mod transport;
pub mod validator;

pub use dropbox::*;
pub use fetcher::*;
pub use storage::*;
pub use transport::*;
pub use validator::*;

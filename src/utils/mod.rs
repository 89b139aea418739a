// Shared utilities module
pub mod concurrency;
pub mod config_loader;
pub mod errors;
pub mod format;
pub mod logging;

pub use concurrency::*;
pub use config_loader::*;
pub use errors::*;
pub use format::*;
pub use logging::*;

// Infrastructure layer
pub mod file_filter;
pub mod processors;

pub use file_filter::*;
pub use processors::*;

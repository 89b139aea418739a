// Processors module
pub mod cleanup_processor;
pub mod common;
pub mod compression_processor;
pub mod css_processor;
pub mod html_processor;
pub mod js_processor;
pub mod minifier;
pub mod report_processor;

pub use cleanup_processor::*;
pub use compression_processor::*;
pub use css_processor::*;
pub use html_processor::*;
pub use js_processor::*;
pub use minifier::*;
pub use report_processor::*;

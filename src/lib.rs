// Postbuild - static site output optimizer
// Minification, pre-compression and cleanup of a build directory

pub mod cli;
pub mod core;
pub mod infrastructure;
pub mod utils;

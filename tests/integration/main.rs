// End-to-end pipeline tests against temporary build directories

mod cleanup_tests;
mod compression_tests;
mod pipeline_tests;

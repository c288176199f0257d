//! Integration tests for the meshglb binary and the native pipeline.

mod cli_test;
mod helpers;
mod pipeline_test;

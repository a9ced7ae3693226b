//! Integration tests for bootlayer-lib.

mod common;
mod pipeline_tests;

#![allow(dead_code)]

use std::sync::Once;

use donor_ir::{FunctionBuilder, FunctionTags};

static INIT_LOGGING: Once = Once::new();

/// Trace-level logging into the test writer. Only the first call installs it.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .with_target(true)
            .with_ansi(false)
            .try_init();
    });
}

pub fn program(name: &str) -> FunctionBuilder {
    FunctionBuilder::new(name).tags(FunctionTags::program())
}

pub fn reshard_fn(name: &str) -> FunctionBuilder {
    FunctionBuilder::new(name).tags(FunctionTags::reshard())
}

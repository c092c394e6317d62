#[macro_use]
extern crate lazy_static;

pub mod chart_state;
pub mod data;
pub mod tokio_runtime;

use env_logger::{Builder, Target};
use std::sync::Once;

static INIT: Once = Once::new();

/// Install the `env_logger` backend, filtered by `RUST_LOG`. Later calls do nothing.
pub fn initialize_logging() {
    INIT.call_once(|| {
        // Init logger to write to stdout
        let mut builder = Builder::from_default_env();
        builder.target(Target::Stdout);
        if builder.try_init().is_err() {
            log::debug!("A global logger was already installed");
        }
    });
}

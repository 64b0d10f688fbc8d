use std::sync::Once;

use log::LevelFilter;

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are ignored.
///
/// `RUST_LOG` overrides the default of `info` with wgpu's crates held at `warn`.
pub(crate) fn init_logging() {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        match std::env::var("RUST_LOG") {
            Ok(filter) => {
                builder.parse_filters(&filter);
            }
            Err(_) => {
                builder
                    .filter_level(LevelFilter::Info)
                    .filter_module("wgpu_core", LevelFilter::Warn)
                    .filter_module("wgpu_hal", LevelFilter::Warn)
                    .filter_module("naga", LevelFilter::Warn);
            }
        }

        builder.init();

        log::debug!("logging initialized");
    });
}

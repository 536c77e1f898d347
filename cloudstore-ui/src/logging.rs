//! Console Logging
//!
//! Routes `tracing` events to the browser console through `tracing-wasm`.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_wasm::{WASMLayer, WASMLayerConfigBuilder};

/// Level from the config string, falling back to `INFO`
fn max_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

/// Install the console subscriber; later calls keep the first one
pub fn init(level: &str) {
    let config = WASMLayerConfigBuilder::new()
        .set_max_level(max_level(level))
        .set_report_logs_in_timings(false)
        .build();

    let subscriber = tracing_subscriber::registry().with(WASMLayer::new(config));
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_max_level_parses_config_strings() {
        assert_eq!(max_level("debug"), Level::DEBUG);
        assert_eq!(max_level(" WARN "), Level::WARN);
        assert_eq!(max_level("verbose"), Level::INFO);
    }

    #[wasm_bindgen_test]
    fn test_init_twice_keeps_first_subscriber() {
        init("debug");
        init("error");
        tracing::info!("still logging");
    }
}

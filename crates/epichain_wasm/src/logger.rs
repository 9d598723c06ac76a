//! A logger that writes to the browser console.

use anyhow::{anyhow, Result};
use fern::Dispatch;
use log::{debug, Level, LevelFilter, Record};
use std::str::FromStr;
use wasm_bindgen::prelude::*;
use web_sys::console;

/// Installs the console logger (once) and sets the maximum level.
///
/// `level` is one of `off`, `error`, `warn`, `info`, `debug` or `trace`. Calling this
/// again only changes the level.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let installed = Dispatch::new()
        .level(LevelFilter::Trace)
        .chain(fern::Output::call(log_to_browser_console))
        .apply();
    log::set_max_level(filter);
    if installed.is_err() {
        debug!("Console logger already installed; level set to {}.", filter);
    }
    Ok(())
}

pub(crate) fn parse_level(level: &str) -> Result<LevelFilter> {
    LevelFilter::from_str(level.trim()).map_err(|_| anyhow!("Unknown log level \"{}\".", level))
}

type ConsoleFn = fn(&JsValue, &JsValue, &JsValue);

/// Console method and badge colour for each level.
fn console_target(level: Level) -> (ConsoleFn, &'static str) {
    match level {
        Level::Error => (console::error_3 as ConsoleFn, "color: white; background: crimson"),
        Level::Warn => (console::warn_3, "color: black; background: gold"),
        Level::Info => (console::info_3, "color: white; background: seagreen"),
        Level::Debug => (console::log_3, "color: white; background: steelblue"),
        Level::Trace => (console::debug_3, "color: white; background: slategray"),
    }
}

fn log_to_browser_console(record: &Record) {
    let (console_fn, badge) = console_target(record.level());
    let location = match (record.module_path(), record.line()) {
        (Some(module), Some(line)) => format!("{module}:{line}"),
        _ => record.target().to_string(),
    };
    let message = format!("%c {} %c [{}] {}", record.level(), location, record.args());
    console_fn(
        &JsValue::from_str(&message),
        &JsValue::from_str(badge),
        &JsValue::from_str(""),
    );
}

#[cfg(test)]
mod tests {
    use super::parse_level;
    use log::LevelFilter;

    #[test]
    fn parse_level_accepts_known_levels() {
        assert_eq!(parse_level("trace").unwrap(), LevelFilter::Trace);
        assert_eq!(parse_level("WARN").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level(" off ").unwrap(), LevelFilter::Off);
    }

    #[test]
    fn parse_level_rejects_unknown_level() {
        let err = parse_level("loud").expect_err("expected error");
        assert!(err.to_string().contains("loud"));
    }
}

//! WASM bridge for `epichain_core`.
//!
//! The page owns the DOM, the chart library and the math typesetter. It registers JS
//! callbacks on a `WasmWidget` and forwards slider events to `set_control`; the widget
//! pushes fresh chart series and formula markup back through those callbacks.

mod logger;
mod model;
mod widget;

pub use logger::init_logging;
pub use model::{chain_summary, day_sequence, state_at_day};
pub use widget::WasmWidget;

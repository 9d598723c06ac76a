//! `WasmWidget`: the presentation state object exposed to the page.

use epichain_core::config::WidgetConfig;
use epichain_core::widget::{ChartSeries, Control, Widget};
use js_sys::{Array, Float64Array, Function};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[wasm_bindgen]
pub struct WasmWidget {
    widget: Widget,
}

fn parse_control(name: &str) -> Result<Control, JsValue> {
    Control::from_name(name)
        .ok_or_else(|| JsValue::from_str(&format!("Unknown control \"{name}\"")))
}

fn serialize<T: serde::Serialize>(value: &T, what: &str) -> Result<JsValue, JsValue> {
    to_value(value).map_err(|e| JsValue::from_str(&format!("Failed to serialize {what}: {e}")))
}

/// Adapts a JS `(labels, infected, recovered) => void` callback into a chart renderer.
fn chart_callback(callback: Function) -> impl FnMut(&ChartSeries) + 'static {
    move |series: &ChartSeries| {
        let labels: Array = series.labels.iter().map(|day| JsValue::from(*day)).collect();
        let infected = Float64Array::from(series.infected.as_slice());
        let recovered = Float64Array::from(series.recovered.as_slice());
        if let Err(err) = callback.call3(&JsValue::NULL, &labels, &infected, &recovered) {
            log::error!("Chart callback threw: {:?}", err);
        }
    }
}

/// Adapts a JS `(markup) => void` callback into a formula renderer.
fn formula_callback(callback: Function) -> impl FnMut(&str) + 'static {
    move |markup: &str| {
        if let Err(err) = callback.call1(&JsValue::NULL, &JsValue::from_str(markup)) {
            log::error!("Formula callback threw: {:?}", err);
        }
    }
}

impl WasmWidget {
    pub(crate) fn from_config(config: WidgetConfig) -> Result<WasmWidget, JsValue> {
        console_error_panic_hook::set_once();
        let widget = Widget::new(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid widget config: {e}")))?;
        Ok(WasmWidget { widget })
    }
}

#[wasm_bindgen]
impl WasmWidget {
    /// Builds a widget from an optional config object; `undefined` or `null` uses the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<WasmWidget, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            WidgetConfig::default()
        } else {
            from_value::<WidgetConfig>(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse widget config: {e}")))?
        };
        Self::from_config(config)
    }

    pub fn on_chart(&mut self, callback: Function) {
        self.widget.add_chart_renderer(chart_callback(callback));
    }

    pub fn on_formula(&mut self, callback: Function) {
        self.widget.add_formula_renderer(formula_callback(callback));
    }

    /// Handles a slider change. Returns `false` when the value was ignored.
    pub fn set_control(&mut self, name: &str, value: f64) -> Result<bool, JsValue> {
        let control = parse_control(name)?;
        self.widget
            .handle_input(control, value)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn refresh(&mut self) -> Result<(), JsValue> {
        self.widget
            .refresh()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn value(&self, name: &str) -> Result<f64, JsValue> {
        Ok(self.widget.value(parse_control(name)?))
    }

    /// Returns `{ min, max, step }` for the named control.
    pub fn bounds(&self, name: &str) -> Result<JsValue, JsValue> {
        let bounds = self.widget.config().bounds(parse_control(name)?);
        serialize(&bounds, "bounds")
    }

    pub fn parameters(&self) -> Result<JsValue, JsValue> {
        serialize(self.widget.parameters(), "parameters")
    }

    pub fn series(&self) -> Result<JsValue, JsValue> {
        let series = self
            .widget
            .series()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        serialize(&series, "series")
    }

    pub fn formula(&self) -> String {
        self.widget.formula()
    }

    pub fn summary(&self) -> Result<JsValue, JsValue> {
        let summary = self
            .widget
            .summary()
            .map_err(|e| JsValue::from_str(&format!("Chain summary failed: {e}")))?;
        serialize(&summary, "summary")
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::WasmWidget;
    use epichain_core::config::WidgetConfig;
    use epichain_core::widget::ChartSeries;
    use js_sys::{Function, Reflect};
    use serde_wasm_bindgen::{from_value, to_value};
    use wasm_bindgen::JsValue;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn global(name: &str) -> JsValue {
        Reflect::get(&js_sys::global(), &JsValue::from_str(name)).expect("global lookup")
    }

    #[wasm_bindgen_test]
    fn unknown_control_is_rejected() {
        let mut widget = WasmWidget::new(JsValue::UNDEFINED).expect("widget");
        assert!(widget.set_control("speed", 1.0).is_err());
        assert!(widget.value("speed").is_err());
    }

    #[wasm_bindgen_test]
    fn constructor_accepts_undefined_config() {
        let widget = WasmWidget::new(JsValue::UNDEFINED).expect("widget");
        assert_eq!(widget.value("days").expect("value"), 32.0);
        let series: ChartSeries = from_value(widget.series().expect("series")).expect("series");
        assert_eq!(series.len(), 33);
        assert!(widget.summary().is_ok());
    }

    #[wasm_bindgen_test]
    fn constructor_reads_js_config_object() {
        let config = WidgetConfig {
            max_days: 60,
            ..WidgetConfig::default()
        };
        let mut widget = WasmWidget::new(to_value(&config).expect("config")).expect("widget");
        widget.set_control("days", 45.0).expect("control");
        assert_eq!(widget.value("days").expect("value"), 45.0);

        let invalid = WidgetConfig {
            tolerance: -1.0,
            ..WidgetConfig::default()
        };
        assert!(WasmWidget::new(to_value(&invalid).expect("config")).is_err());
    }

    #[wasm_bindgen_test]
    fn callbacks_receive_series_and_formula() {
        let mut widget = WasmWidget::new(JsValue::NULL).expect("widget");
        widget.on_chart(Function::new_with_args(
            "labels, infected, recovered",
            "globalThis.__epichainChartLength = labels.length + infected.length + recovered.length;",
        ));
        widget.on_formula(Function::new_with_args(
            "markup",
            "globalThis.__epichainFormula = markup;",
        ));
        widget.set_control("days", 4.0).expect("control");

        assert_eq!(global("__epichainChartLength").as_f64(), Some(15.0));
        let markup = global("__epichainFormula").as_string().expect("markup");
        assert!(markup.ends_with("^{4}"), "{markup}");
    }
}

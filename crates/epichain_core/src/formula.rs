//! LaTeX markup for the transition equation shown above the chart.

use crate::model::{CompartmentOrder, ModelParameters};

/// Formats a probability as a percentage with at most two decimals, e.g. `0.125` -> `12.5`.
pub fn format_percent(probability: f64) -> String {
    let rounded = (probability * 100.0 * 100.0).round() / 100.0;
    if rounded == 0.0 {
        // Avoids printing "-0".
        return "0".to_string();
    }
    let text = format!("{rounded:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn row_vector(symbols: [&str; 2], subscript: &str) -> String {
    format!(
        "\\begin{{bmatrix}} {}_{{{subscript}}} & {}_{{{subscript}}} \\end{{bmatrix}}",
        symbols[0], symbols[1]
    )
}

/// Renders `x_d = x_0 M^d` for the current parameters.
///
/// Symbols are `I` (infected) and `H` (healthy/recovered), ordered to match the state slots.
pub fn transition_formula(params: &ModelParameters, order: CompartmentOrder) -> String {
    let symbols = match order {
        CompartmentOrder::InfectedFirst => ["I", "H"],
        CompartmentOrder::HealthyFirst => ["H", "I"],
    };
    let p = params.infection_probability;
    let r = params.recovery_probability;
    let days = params.days.to_string();
    format!(
        "{} = {} \\begin{{bmatrix}} {}\\% & {}\\% \\\\ {}\\% & {}\\% \\end{{bmatrix}}^{{{}}}",
        row_vector(symbols, &days),
        row_vector(symbols, "0"),
        format_percent(1.0 - p),
        format_percent(p),
        format_percent(r),
        format_percent(1.0 - r),
        days
    )
}

use serde_json::Value;

use super::{format_value, Sections};

/// Headline fields, most specific first.
const PRIORITY_KEYS: [&str; 7] = [
    "probability",
    "threshold_probability.probability",
    "payment",
    "max_payment",
    "mean",
    "sample.mean",
    "std_dev",
];

/// Print just the headline number of a command result.
pub fn print_minimal(value: &Value) {
    let sections = Sections::from_value(value);

    for key in PRIORITY_KEYS {
        if let Some(val) = sections.field(key) {
            println!("{}", format_value(val));
            return;
        }
    }

    if let Some((key, val)) = sections.fields.first() {
        println!("{}: {}", key, format_value(val));
    }
}

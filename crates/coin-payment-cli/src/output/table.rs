use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{format_value, Sections};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    let sections = Sections::from_value(value);

    if !sections.fields.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in &sections.fields {
            builder.push_record([key.clone(), format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }

    for (name, rows) in &sections.row_sets {
        println!("\n{}:", name);
        println!("{}", rows_table(rows));
    }

    if !sections.warnings.is_empty() {
        println!("\nWarnings:");
        for w in &sections.warnings {
            println!("  - {}", w);
        }
    }

    if let Some(meth) = &sections.methodology {
        println!("\nMethodology: {}", meth);
    }
}

fn rows_table(rows: &[Map<String, Value>]) -> Table {
    let headers: Vec<String> = rows
        .first()
        .map(|first| first.keys().cloned().collect())
        .unwrap_or_default();

    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        builder.push_record(
            headers
                .iter()
                .map(|h| row.get(h).map(format_value).unwrap_or_default()),
        );
    }
    Table::from(builder)
}

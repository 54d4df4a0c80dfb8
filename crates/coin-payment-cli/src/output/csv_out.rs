use serde_json::Value;
use std::io;

use super::{format_value, Sections};

/// Write output as CSV to stdout.
///
/// Scalar fields come first as `field,value` records. Each row set (e.g. a
/// distribution's frequencies) follows with its own header row, so the
/// writer runs in flexible mode.
pub fn print_csv(value: &Value) {
    let sections = Sections::from_value(value);
    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(stdout.lock());

    if let Err(e) = write_sections(&mut wtr, &sections) {
        eprintln!("CSV output error: {}", e);
    }
    let _ = wtr.flush();
}

fn write_sections<W: io::Write>(wtr: &mut csv::Writer<W>, sections: &Sections) -> csv::Result<()> {
    if !sections.fields.is_empty() {
        wtr.write_record(["field", "value"])?;
        for (key, val) in &sections.fields {
            wtr.write_record([key.as_str(), &format_value(val)])?;
        }
    }

    for (_, rows) in &sections.row_sets {
        let Some(first) = rows.first() else {
            continue;
        };
        let headers: Vec<&String> = first.keys().collect();
        wtr.write_record(&headers)?;
        for row in rows {
            wtr.write_record(
                headers
                    .iter()
                    .map(|h| row.get(h.as_str()).map(format_value).unwrap_or_default()),
            )?;
        }
    }
    Ok(())
}

use serde_json::{json, Value};
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let (Some(Value::Object(extra)), Some(body)) = (data, response.as_object_mut()) {
                body.extend(extra);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Print rows as aligned text columns, or as a JSON array under `collection_name`
pub fn output_table(
    output_format: &OutputFormat,
    collection_name: &str,
    headers: &[&str],
    rows: Vec<Vec<String>>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let items: Vec<Value> = rows
                .iter()
                .map(|row| {
                    let object = headers
                        .iter()
                        .zip(row)
                        .map(|(h, v)| (h.to_string(), Value::String(v.clone())))
                        .collect::<serde_json::Map<_, _>>();
                    Value::Object(object)
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&json!({ collection_name: items }))?);
        }
        OutputFormat::Text => {
            let widths: Vec<usize> = headers
                .iter()
                .enumerate()
                .map(|(i, h)| rows.iter().map(|r| r.get(i).map_or(0, |c| c.len())).max().unwrap_or(0).max(h.len()))
                .collect();

            let line = |cells: Vec<&str>| {
                cells
                    .iter()
                    .zip(&widths)
                    .map(|(c, w)| format!("{:<width$}", c, width = *w))
                    .collect::<Vec<_>>()
                    .join("  ")
            };

            println!("{}", line(headers.to_vec()));
            for row in &rows {
                println!("{}", line(row.iter().map(String::as_str).collect()));
            }
        }
    }
    Ok(())
}

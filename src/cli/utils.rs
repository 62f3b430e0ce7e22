use serde_json::{json, Value};
use std::io::Write;

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

            if let Some(Value::Object(map)) = data {
                response.as_object_mut().unwrap().extend(map);
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a collection either as pretty JSON or via a per-item line renderer
pub fn output_list<T, F>(
    output_format: &OutputFormat,
    key: &str,
    items: &[T],
    empty_message: &str,
    render: F,
) -> anyhow::Result<()>
where
    T: serde::Serialize,
    F: Fn(&T) -> String,
{
    match output_format {
        OutputFormat::Json => {
            let mut envelope = serde_json::Map::new();
            envelope.insert(key.to_string(), serde_json::to_value(items)?);
            println!("{}", serde_json::to_string_pretty(&Value::Object(envelope))?);
        }
        OutputFormat::Text => {
            if items.is_empty() {
                println!("{}", empty_message);
                return Ok(());
            }
            for item in items {
                println!("{}", render(item));
            }
        }
    }
    Ok(())
}

/// Print a value as pretty JSON regardless of format (used for raw API passthrough)
pub fn output_value(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prompt for a line on stdin. Used for passwords not passed as flags; input
/// is echoed, so --password exists for scripted use.
pub fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}: ", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}

/// Fail unless an API envelope says success, extracting the error if not.
pub fn expect_success(payload: &Value) -> anyhow::Result<()> {
    if payload["success"].as_bool().unwrap_or(false) {
        Ok(())
    } else {
        let message = payload["error"].as_str().unwrap_or("request failed");
        Err(anyhow::anyhow!("{}", message))
    }
}

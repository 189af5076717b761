use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&success_body(message, data))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// `{success, message, ...data}`; non-object data lands under `data`.
fn success_body(message: &str, data: Option<Value>) -> Value {
    let mut body = Map::new();
    body.insert("success".into(), Value::Bool(true));
    body.insert("message".into(), json!(message));

    match data {
        Some(Value::Object(fields)) => body.extend(fields),
        Some(other) => {
            body.insert("data".into(), other);
        }
        None => {}
    }
    Value::Object(body)
}

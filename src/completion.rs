//! Reshapes a single buffered upstream result into an OpenAI-style chat
//! completion object.

use crate::models::Driver;
use serde_json::{Value, json};

const MISSING_CONTENT: &str = "No text, maybe error?";

/// Build the non-stream completion response from the raw upstream body.
pub fn completion_from_upstream(driver: Driver, body: &Value) -> Value {
    let mut content = body
        .get("result")
        .and_then(|v| v.get("message"))
        .and_then(|v| v.get("content"))
        .cloned()
        .unwrap_or_else(|| Value::String(MISSING_CONTENT.to_string()));

    // Claude returns content as an array of blocks; unwrap the first one.
    if driver == Driver::Claude {
        if let Some(blocks) = content.as_array() {
            content = Value::String(
                blocks
                    .first()
                    .and_then(|block| block.get("text"))
                    .and_then(|v| v.as_str())
                    .unwrap_or(MISSING_CONTENT)
                    .to_string(),
            );
        }
    }

    let usage = body.get("result").and_then(|v| v.get("usage"));
    let (prompt_tokens, completion_tokens, total_tokens) = normalize_usage(usage);

    json!({
        "choices": [{
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": prompt_tokens,
            "completion_tokens": completion_tokens,
            "total_tokens": total_tokens
        }
    })
}

/// Upstream usage is either an ordered list of `{amount}` entries or an
/// object with `input_tokens`/`output_tokens`. Either way it normalizes to
/// (prompt, completion, total).
pub fn normalize_usage(usage: Option<&Value>) -> (i64, i64, i64) {
    match usage {
        Some(Value::Array(entries)) => {
            let amounts: Vec<i64> = entries
                .iter()
                .map(|entry| entry.get("amount").and_then(|v| v.as_i64()).unwrap_or(0))
                .collect();
            let total = amounts.iter().sum();
            (
                amounts.first().copied().unwrap_or(0),
                amounts.get(1).copied().unwrap_or(0),
                total,
            )
        }
        Some(Value::Object(obj)) => {
            let input = obj.get("input_tokens").and_then(|v| v.as_i64()).unwrap_or(0);
            let output = obj
                .get("output_tokens")
                .and_then(|v| v.as_i64())
                .unwrap_or(0);
            (input, output, input + output)
        }
        _ => (0, 0, 0),
    }
}

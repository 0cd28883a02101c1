//! Re-frames the upstream newline-delimited JSON stream into OpenAI-style
//! `chat.completion.chunk` SSE events.
//!
//! The producer half runs in its own task and feeds an mpsc channel; the
//! handler returns the receiver half as the SSE body immediately, so the
//! client holds a response before any upstream byte has arrived.

use axum::response::sse::Event;
use futures_util::StreamExt;
use serde_json::{Value, json};
use tokio::sync::mpsc;

fn now_ts() -> i64 {
    chrono::Utc::now().timestamp()
}

/// One outbound chunk. Ids are fresh per chunk; only ordering within the
/// stream matters to clients.
pub fn chat_chunk(model: &str, delta: Value, finish_reason: Option<&str>) -> Value {
    json!({
        "id": format!("chatcmpl_{}", uuid::Uuid::new_v4()),
        "object": "chat.completion.chunk",
        "created": now_ts(),
        "model": model,
        "choices": [{ "index": 0, "delta": delta, "finish_reason": finish_reason }]
    })
}

/// Carry-over buffer for line-delimited framing. A single upstream read may
/// end mid-record, so bytes are accumulated until a newline completes a line.
#[derive(Default)]
pub struct LineBuffer {
    carry: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one read's worth of bytes and drain every completed line.
    /// Whatever trails the last newline stays buffered for the next read.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        self.carry.push_str(&String::from_utf8_lossy(bytes));
        let mut lines = Vec::new();
        while let Some(pos) = self.carry.find('\n') {
            let line: String = self.carry.drain(..=pos).collect();
            lines.push(line.trim_end_matches('\n').to_string());
        }
        lines
    }
}

/// Extract the text delta from one upstream record. Two shapes occur:
/// a bare `{"text": ...}` frame, or a full driver result whose
/// `result.message.content` is either a plain string or a content-block
/// array where the first `"text"`-typed block carries the delta.
pub fn extract_text(frame: &Value) -> Option<String> {
    if let Some(text) = frame.get("text").and_then(|v| v.as_str()) {
        if !text.is_empty() {
            return Some(text.to_string());
        }
        return None;
    }
    let content = frame.get("result")?.get("message")?.get("content")?;
    if let Some(text) = content.as_str() {
        if !text.is_empty() {
            return Some(text.to_string());
        }
        return None;
    }
    if let Some(blocks) = content.as_array() {
        let text = blocks
            .iter()
            .find(|block| block.get("type").and_then(|v| v.as_str()) == Some("text"))
            .and_then(|block| block.get("text"))
            .and_then(|v| v.as_str())
            .unwrap_or("");
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }
    None
}

/// Pump one upstream response into `tx` as chat chunks.
///
/// Lifecycle contract: the role-opening chunk goes out before the first
/// upstream read, and the stop chunk plus `[DONE]` sentinel go out on every
/// exit path, whether the upstream ended normally, errored mid-stream, or
/// the consumer hung up. Dropping `tx` afterwards closes the SSE body.
pub async fn pump_chat_stream(model: String, upstream: reqwest::Response, tx: mpsc::Sender<Event>) {
    let role_open = chat_chunk(&model, json!({ "role": "assistant" }), None);
    let _ = tx.send(Event::default().data(role_open.to_string())).await;

    if let Err(reason) = relay_deltas(&model, upstream, &tx).await {
        tracing::warn!("chat stream ended early: {reason}");
    }

    let stop = chat_chunk(&model, json!({}), Some("stop"));
    let _ = tx.send(Event::default().data(stop.to_string())).await;
    let _ = tx.send(Event::default().data("[DONE]")).await;
}

async fn relay_deltas(
    model: &str,
    upstream: reqwest::Response,
    tx: &mpsc::Sender<Event>,
) -> Result<(), String> {
    let mut body = upstream.bytes_stream();
    let mut buffer = LineBuffer::new();
    while let Some(read) = body.next().await {
        let bytes = read.map_err(|err| format!("upstream read failed: {err}"))?;
        for line in buffer.push(&bytes) {
            if line.trim().is_empty() {
                continue;
            }
            let frame: Value = match serde_json::from_str(&line) {
                Ok(v) => v,
                Err(err) => {
                    // Malformed records are dropped, not fatal to the stream.
                    tracing::warn!("skipping malformed upstream record: {err}");
                    continue;
                }
            };
            let Some(text) = extract_text(&frame) else {
                continue;
            };
            let chunk = chat_chunk(model, json!({ "content": text }), None);
            tx.send(Event::default().data(chunk.to_string()))
                .await
                .map_err(|_| "consumer disconnected".to_string())?;
        }
    }
    // A trailing partial line without its newline can never parse as a
    // complete record; it is discarded with the buffer.
    Ok(())
}

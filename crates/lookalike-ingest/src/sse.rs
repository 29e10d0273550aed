//! Server-sent-event framing for reindex progress.

use lookalike_core::errors::LookalikeResult;
use lookalike_core::models::RebuildProgressEvent;

/// `data: <json>\n\n`.
pub fn encode_event(event: &RebuildProgressEvent) -> LookalikeResult<String> {
    Ok(format!("data: {}\n\n", serde_json::to_string(event)?))
}

/// Frame each event of `events` lazily.
pub fn encode_stream<I>(events: I) -> impl Iterator<Item = LookalikeResult<String>>
where
    I: IntoIterator<Item = RebuildProgressEvent>,
{
    events.into_iter().map(|event| encode_event(&event))
}

//! Just enough of the Debug Adapter Protocol to recognise telemetry
//! output events inside a relayed stream. Everything the relay does not
//! need to look at deserialises into a catch-all and is left alone.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The base protocol message, in which all other messages are wrapped.
#[derive(Debug, Clone, Deserialize)]
pub struct BaseMessage {
    pub seq: i64,
    #[serde(flatten)]
    pub message: Sendable,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Sendable {
    Request(Value),
    Response(Value),
    Event(Event),
}

#[derive(Debug, Clone)]
pub enum Event {
    Output(OutputEventBody),
    /// Any event the relay has no interest in.
    Unknown,
}

// A hand-written deserializer so an event type we do not model never fails
// the whole frame.
impl<'de> Deserialize<'de> for Event {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match serde_json::from_value::<EventHelper>(value.clone()) {
            Ok(EventHelper::Output(body)) => Ok(Event::Output(body)),
            Err(_) => {
                if let Some(event_name) = value.get("event").and_then(Value::as_str) {
                    tracing::trace!(event = event_name, "unmodelled event");
                }
                Ok(Event::Unknown)
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "body", rename_all = "camelCase")]
enum EventHelper {
    Output(OutputEventBody),
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputEventBody {
    pub category: Option<String>,
    #[serde(default)]
    pub output: String,
    pub data: Option<Value>,
}

const TELEMETRY_CATEGORY: &str = "telemetry";

/// Extracts the telemetry payload from a raw frame body, when the frame is
/// an output event with category `telemetry` carrying a named payload.
/// Anything else, including frames that do not parse at all, yields `None`.
pub fn telemetry_payload(frame: &[u8]) -> Option<Value> {
    let message: BaseMessage = serde_json::from_slice(frame).ok()?;
    let Sendable::Event(Event::Output(body)) = message.message else {
        return None;
    };
    if body.category.as_deref() != Some(TELEMETRY_CATEGORY) {
        return None;
    }
    let data = body.data?;
    data.get("name")?;
    Some(data)
}

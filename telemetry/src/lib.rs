//! Fire-and-forget usage telemetry.
//!
//! The sink is constructed once at startup and handed by reference to
//! everything that reports events. Sending never fails from the caller's
//! point of view; a slow or broken backend drops events instead of
//! blocking a launch.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TelemetryEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub properties: BTreeMap<String, Value>,
}

impl TelemetryEvent {
    /// The "a command was used" event, keyed by the command identifier.
    pub fn command(identifier: &str) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert("identifier".to_string(), Value::from(identifier));
        Self {
            kind: "track".to_string(),
            name: "command".to_string(),
            properties,
        }
    }

    /// Builds an event from a payload forwarded off the debug-adapter
    /// stream. Returns `None` when the payload carries no name.
    pub fn from_payload(payload: Value) -> Option<Self> {
        let name = payload.get("name")?.as_str()?.to_string();
        let properties = payload
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| props.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        Some(Self {
            kind: "track".to_string(),
            name,
            properties,
        })
    }
}

pub trait TelemetrySink: Send + Sync {
    fn send(&self, event: TelemetryEvent);
}

/// Sink that only logs, used as the default backend and in tests.
#[derive(Debug, Default)]
pub struct LogSink;

impl TelemetrySink for LogSink {
    fn send(&self, event: TelemetryEvent) {
        tracing::debug!(name = %event.name, properties = ?event.properties, "telemetry event");
    }
}

/// Decouples reporting call sites from the backend with a bounded channel
/// and a worker thread. A full channel drops the event.
pub struct ChannelSink {
    tx: crossbeam_channel::Sender<TelemetryEvent>,
}

impl ChannelSink {
    pub fn new(backend: Box<dyn TelemetrySink>) -> Self {
        let (tx, rx) = crossbeam_channel::bounded::<TelemetryEvent>(256);
        std::thread::spawn(move || {
            for event in rx {
                backend.send(event);
            }
            tracing::debug!("telemetry channel closed");
        });
        Self { tx }
    }
}

impl TelemetrySink for ChannelSink {
    fn send(&self, event: TelemetryEvent) {
        if self.tx.try_send(event).is_err() {
            tracing::debug!("telemetry backend saturated, dropping event");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Default, Clone)]
    pub struct RecordingSink {
        events: Arc<Mutex<Vec<TelemetryEvent>>>,
    }

    impl TelemetrySink for RecordingSink {
        fn send(&self, event: TelemetryEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn command_event_shape() {
        let event = TelemetryEvent::command("camel.jbang.routes.run");
        assert_eq!(event.kind, "track");
        assert_eq!(event.name, "command");
        assert_eq!(
            event.properties.get("identifier"),
            Some(&Value::from("camel.jbang.routes.run"))
        );
    }

    #[test]
    fn payload_without_a_name_is_rejected() {
        assert!(TelemetryEvent::from_payload(serde_json::json!({"value": 1})).is_none());
    }

    #[test]
    fn payload_properties_are_carried_over() {
        let event = TelemetryEvent::from_payload(serde_json::json!({
            "name": "camel.dap.attach",
            "properties": {"camel.version": "4.4.0"}
        }))
        .unwrap();
        assert_eq!(event.name, "camel.dap.attach");
        assert_eq!(
            event.properties.get("camel.version"),
            Some(&Value::from("4.4.0"))
        );
    }

    #[test]
    fn channel_sink_forwards_to_the_backend() {
        let recording = RecordingSink::default();
        let sink = ChannelSink::new(Box::new(recording.clone()));
        sink.send(TelemetryEvent::command("camel.jbang.deploy"));

        // worker thread runs asynchronously
        for _ in 0..100 {
            if !recording.events.lock().unwrap().is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        let events = recording.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "command");
    }
}

use std::sync::{Arc, Mutex};

use telemetry::{TelemetryEvent, TelemetrySink};
use tokio::io::AsyncReadExt;

#[derive(Default, Clone)]
struct RecordingSink {
    events: Arc<Mutex<Vec<TelemetryEvent>>>,
}

impl TelemetrySink for RecordingSink {
    fn send(&self, event: TelemetryEvent) {
        self.events.lock().unwrap().push(event);
    }
}

fn frame(value: serde_json::Value) -> Vec<u8> {
    codec::encode_frame(&serde_json::to_vec(&value).unwrap())
}

#[tokio::test]
async fn frames_reach_the_editor_unmodified() {
    let response = serde_json::json!({
        "seq": 2,
        "type": "response",
        "request_seq": 1,
        "success": true,
        "command": "initialize"
    });
    let server_output = frame(response);

    let (editor_out, mut editor_remote) = tokio::io::duplex(4096);
    let sink = RecordingSink::default();

    relay::relay_streams(
        tokio::io::empty(),
        editor_out,
        tokio::io::sink(),
        &server_output[..],
        &sink,
    )
    .await
    .unwrap();

    let mut forwarded = Vec::new();
    editor_remote.read_to_end(&mut forwarded).await.unwrap();
    assert_eq!(forwarded, server_output);
    assert!(sink.events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn telemetry_events_are_siphoned_and_still_forwarded() {
    let telemetry_event = serde_json::json!({
        "seq": 5,
        "type": "event",
        "event": "output",
        "body": {
            "category": "telemetry",
            "output": "",
            "data": {"name": "camel.dap.attach", "properties": {"camel.version": "4.4.0"}}
        }
    });
    let console_event = serde_json::json!({
        "seq": 6,
        "type": "event",
        "event": "output",
        "body": {"category": "console", "output": "Routes started"}
    });
    let mut server_output = frame(telemetry_event);
    server_output.extend(frame(console_event));

    let (editor_out, mut editor_remote) = tokio::io::duplex(4096);
    let sink = RecordingSink::default();

    relay::relay_streams(
        tokio::io::empty(),
        editor_out,
        tokio::io::sink(),
        &server_output[..],
        &sink,
    )
    .await
    .unwrap();

    let mut forwarded = Vec::new();
    editor_remote.read_to_end(&mut forwarded).await.unwrap();
    // both frames still reach the editor, in order
    assert_eq!(forwarded, server_output);

    let events = sink.events.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "camel.dap.attach");
    assert_eq!(
        events[0].properties.get("camel.version"),
        Some(&serde_json::Value::from("4.4.0"))
    );
}

#[tokio::test]
async fn editor_input_is_copied_to_the_server() {
    let request = frame(serde_json::json!({
        "seq": 1,
        "type": "request",
        "command": "initialize"
    }));

    let (server_in, mut server_remote) = tokio::io::duplex(4096);
    // held open so the relay keeps running while we inspect server input
    let (server_out_writer, server_out) = tokio::io::duplex(4096);

    let relay_task = tokio::spawn({
        let request = request.clone();
        async move {
            let sink = RecordingSink::default();
            relay::relay_streams(
                std::io::Cursor::new(request),
                tokio::io::sink(),
                server_in,
                server_out,
                &sink,
            )
            .await
        }
    });

    let mut received = vec![0u8; request.len()];
    tokio::time::timeout(
        std::time::Duration::from_secs(5),
        server_remote.read_exact(&mut received),
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(received, request);

    // server closing its output ends the session
    drop(server_out_writer);
    relay_task.await.unwrap().unwrap();
}

//! Spawning the external Camel debug-server and relaying its Debug
//! Adapter Protocol traffic.
//!
//! The relay is transparent: every frame from the server reaches the
//! editor byte-for-byte. The single side effect is that output events in
//! the telemetry category have their payload forwarded to the telemetry
//! sink.

use std::path::PathBuf;
use std::process::Stdio;

use eyre::WrapErr;
use futures::stream::StreamExt;
use telemetry::{TelemetryEvent, TelemetrySink};
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::FramedRead;

use codec::DapDecoder;

/// How to start the debug-server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugAdapterDescriptor {
    pub program: String,
    pub args: Vec<String>,
}

impl DebugAdapterDescriptor {
    /// The bundled invocation: `java -jar <path>`.
    pub fn from_jar(jar_path: impl Into<PathBuf>) -> Self {
        Self {
            program: "java".to_string(),
            args: vec![
                "-jar".to_string(),
                jar_path.into().to_string_lossy().into_owned(),
            ],
        }
    }

    /// An explicitly configured executable wins over the bundled jar.
    pub fn resolve(explicit: Option<Self>, jar_path: impl Into<PathBuf>) -> Self {
        explicit.unwrap_or_else(|| Self::from_jar(jar_path))
    }
}

/// Default location of the bundled server archive, next to the running
/// executable.
pub fn bundled_jar_path() -> eyre::Result<PathBuf> {
    let exe = std::env::current_exe().wrap_err("locating current executable")?;
    let dir = exe
        .parent()
        .ok_or_else(|| eyre::eyre!("executable has no parent directory"))?;
    Ok(dir.join("jars").join("camel-dap-server.jar"))
}

/// The spawned debug-server child, killed when dropped.
pub struct AdapterProcess {
    child: tokio::process::Child,
}

impl AdapterProcess {
    pub fn spawn(descriptor: &DebugAdapterDescriptor) -> eyre::Result<Self> {
        tracing::debug!(program = %descriptor.program, args = ?descriptor.args, "starting debug server");
        let child = tokio::process::Command::new(&descriptor.program)
            .args(&descriptor.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .wrap_err("spawning debug server process")?;
        Ok(Self { child })
    }

    /// Relays editor stdio to and from this server process.
    pub async fn relay<I, O>(
        &mut self,
        editor_in: I,
        editor_out: O,
        sink: &dyn TelemetrySink,
    ) -> eyre::Result<()>
    where
        I: AsyncRead + Unpin + Send + 'static,
        O: AsyncWrite + Unpin,
    {
        let server_in = self
            .child
            .stdin
            .take()
            .ok_or_else(|| eyre::eyre!("server stdin not piped"))?;
        let server_out = self
            .child
            .stdout
            .take()
            .ok_or_else(|| eyre::eyre!("server stdout not piped"))?;
        relay_streams(editor_in, editor_out, server_in, server_out, sink).await
    }
}

/// Forwards editor input to the server verbatim, and server frames back to
/// the editor verbatim, siphoning telemetry payloads along the way. Ends
/// when the server closes its output.
pub async fn relay_streams<I, O, SI, SO>(
    mut editor_in: I,
    mut editor_out: O,
    mut server_in: SI,
    server_out: SO,
    sink: &dyn TelemetrySink,
) -> eyre::Result<()>
where
    I: AsyncRead + Unpin + Send + 'static,
    O: AsyncWrite + Unpin,
    SI: AsyncWrite + Unpin + Send + 'static,
    SO: AsyncRead + Unpin,
{
    // editor -> server needs no inspection at all
    let forward = tokio::spawn(async move {
        if let Err(e) = tokio::io::copy(&mut editor_in, &mut server_in).await {
            tracing::debug!(error = %e, "editor input closed");
        }
    });

    let mut frames = FramedRead::new(server_out, DapDecoder::default());
    while let Some(frame) = frames.next().await {
        let body = frame.wrap_err("decoding server frame")?;
        if let Some(payload) = protocol::telemetry_payload(&body) {
            if let Some(event) = TelemetryEvent::from_payload(payload) {
                sink.send(event);
            }
        }
        editor_out
            .write_all(&codec::encode_frame(&body))
            .await
            .wrap_err("forwarding frame to editor")?;
        editor_out.flush().await.wrap_err("flushing editor output")?;
    }

    forward.abort();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_descriptor_wins_over_the_bundled_jar() {
        let explicit = DebugAdapterDescriptor {
            program: "/opt/custom/camel-dap".to_string(),
            args: vec![],
        };
        let resolved = DebugAdapterDescriptor::resolve(Some(explicit.clone()), "/unused.jar");
        assert_eq!(resolved, explicit);
    }

    #[test]
    fn bundled_jar_descriptor_invokes_java() {
        let descriptor = DebugAdapterDescriptor::resolve(None, "/opt/jars/camel-dap-server.jar");
        assert_eq!(descriptor.program, "java");
        assert_eq!(
            descriptor.args,
            vec!["-jar".to_string(), "/opt/jars/camel-dap-server.jar".to_string()]
        );
    }
}

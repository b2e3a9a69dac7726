// Line-oriented host for the archive bridge: one JSON call per stdin line,
// one JSON reply per stdout line, in completion order.

use std::fs;
use std::io::{self, BufRead, Write};
use std::thread;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ziparchive_bridge::{ArchiveBridge, ArchiveError, ArchiveResponse, BridgeConfig, MethodCall, Reply};

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    id: Value,
    #[serde(flatten)]
    call: MethodCall,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Outgoing {
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<ArchiveResponse>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    not_implemented: bool,
}

impl Outgoing {
    fn new(id: Value, reply: Reply) -> Self {
        match reply {
            Reply::Response(response) => Self { id, reply: Some(response), not_implemented: false },
            Reply::NotImplemented => Self { id, reply: None, not_implemented: true },
        }
    }
}

fn load_config() -> Result<BridgeConfig, ArchiveError> {
    match std::env::args().nth(1) {
        Some(path) => {
            let contents = fs::read_to_string(&path)?;
            serde_json::from_str(&contents).map_err(|e| {
                ArchiveError::InvalidConfig(format!("Failed to parse {}: {}", path, e))
            })
        }
        None => Ok(BridgeConfig::default()),
    }
}

fn main() -> Result<(), ArchiveError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let bridge = ArchiveBridge::new(load_config()?)?;
    info!(threads = bridge.thread_count(), "Archive bridge ready");

    let (tx, rx) = crossbeam_channel::unbounded::<Outgoing>();

    thread::scope(|scope| {
        let bridge = &bridge;
        scope.spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "Failed to read stdin");
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                let envelope: Envelope = match serde_json::from_str(&line) {
                    Ok(envelope) => envelope,
                    Err(e) => {
                        warn!(error = %e, "Ignoring a line that is not a JSON call object");
                        continue;
                    }
                };

                let tx = tx.clone();
                let id = envelope.id;
                bridge.handle(envelope.call, move |reply| {
                    let _ = tx.send(Outgoing::new(id, reply));
                });
            }
        });

        // Ends once stdin is exhausted and every pending call has replied
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for outgoing in rx {
            let line = serde_json::to_string(&outgoing)
                .map_err(|e| ArchiveError::Archive(format!("Failed to encode reply: {}", e)))?;
            writeln!(out, "{}", line)?;
            out.flush()?;
        }
        Ok::<(), ArchiveError>(())
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use ziparchive_bridge::{dispatch, ArchiveProcessor};

    fn reply_line(line: &str) -> Value {
        let envelope: Envelope = serde_json::from_str(line).unwrap();
        let reply = dispatch(&envelope.call, &ArchiveProcessor::new());
        serde_json::to_value(Outgoing::new(envelope.id, reply)).unwrap()
    }

    #[test]
    fn test_every_call_with_an_id_is_answered() {
        assert_eq!(
            reply_line(r#"{"id":1,"method":"zip","arguments":null}"#),
            json!({"id": 1, "reply": {"result": "fail"}})
        );
        assert_eq!(
            reply_line(r#"{"id":2,"method":"unzip","arguments":["x"]}"#),
            json!({"id": 2, "reply": {"result": "fail"}})
        );
        assert_eq!(
            reply_line(r#"{"id":3,"method":"zip"}"#),
            json!({"id": 3, "reply": {"result": "fail"}})
        );
        assert_eq!(
            reply_line(r#"{"id":4,"method":"frob"}"#),
            json!({"id": 4, "notImplemented": true})
        );
        assert_eq!(
            reply_line(r#"{"id":5}"#),
            json!({"id": 5, "notImplemented": true})
        );
    }
}

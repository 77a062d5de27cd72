//! Analysis engine boundary.
//!
//! The multi-agent reasoning engine is an external collaborator: the
//! pipeline hands it named inputs and an execution verb, and gets back
//! an opaque JSON value. [`BridgeEngine`] reaches a real engine over a
//! one-shot subprocess protocol; tests inject their own
//! [`AnalysisEngine`] implementations.

use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

use tracing::{info, instrument};

use landeval_shared::{EngineCommand, EngineConfig, EngineInputs, LandEvalError, Result};

/// The opaque engine boundary. `inputs` is `None` for replay runs, which
/// re-execute from an engine-side checkpoint without fresh extracts.
pub trait AnalysisEngine {
    /// Execute the given verb and return the engine's raw result value.
    fn execute(
        &self,
        command: &EngineCommand,
        inputs: Option<&EngineInputs>,
    ) -> Result<serde_json::Value>;
}

// ---------------------------------------------------------------------------
// Bridge protocol
// ---------------------------------------------------------------------------

/// Request line written to the bridge's stdin.
#[derive(Debug, serde::Serialize)]
struct BridgeRequest<'a> {
    command: &'a EngineCommand,
    #[serde(skip_serializing_if = "Option::is_none")]
    inputs: Option<&'a EngineInputs>,
}

/// Response line read from the bridge's stdout.
#[derive(Debug, serde::Deserialize)]
#[serde(tag = "type")]
enum BridgeResponse {
    #[serde(rename = "result")]
    Result { result: serde_json::Value },
    #[serde(rename = "error")]
    Error { error: String },
}

/// Subprocess-backed engine: spawns the configured bridge command, sends
/// one JSON request line on stdin, and reads one JSON response line from
/// stdout. Bridge logs go to the parent's stderr.
#[derive(Debug, Clone)]
pub struct BridgeEngine {
    config: EngineConfig,
}

impl BridgeEngine {
    /// Create a bridge engine from the `[engine]` config section.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }
}

impl AnalysisEngine for BridgeEngine {
    #[instrument(skip_all, fields(cmd = %self.config.bridge_cmd))]
    fn execute(
        &self,
        command: &EngineCommand,
        inputs: Option<&EngineInputs>,
    ) -> Result<serde_json::Value> {
        info!(script = %self.config.bridge_script, "spawning analysis engine bridge");

        let mut builder = Command::new(&self.config.bridge_cmd);
        builder
            .arg(&self.config.bridge_script)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());

        if !self.config.working_dir.is_empty() {
            builder.current_dir(&self.config.working_dir);
        }

        let mut child = builder.spawn().map_err(|e| {
            LandEvalError::Engine(format!(
                "failed to spawn bridge: {e}. Is `{}` installed?",
                self.config.bridge_cmd
            ))
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| LandEvalError::Engine("failed to capture bridge stdin".into()))?;

        let request = BridgeRequest { command, inputs };
        let mut line = serde_json::to_string(&request)
            .map_err(|e| LandEvalError::Engine(format!("request serialization: {e}")))?;
        line.push('\n');

        stdin
            .write_all(line.as_bytes())
            .map_err(|e| LandEvalError::Engine(format!("bridge stdin write: {e}")))?;
        drop(stdin);

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| LandEvalError::Engine("failed to capture bridge stdout".into()))?;

        let mut response_line = String::new();
        BufReader::new(stdout)
            .read_line(&mut response_line)
            .map_err(|e| LandEvalError::Engine(format!("bridge stdout read: {e}")))?;

        let status = child
            .wait()
            .map_err(|e| LandEvalError::Engine(format!("bridge wait: {e}")))?;
        if !status.success() {
            return Err(LandEvalError::Engine(format!(
                "bridge exited with {status}"
            )));
        }

        let response: BridgeResponse = serde_json::from_str(response_line.trim())
            .map_err(|e| LandEvalError::Engine(format!("malformed bridge response: {e}")))?;

        match response {
            BridgeResponse::Result { result } => Ok(result),
            BridgeResponse::Error { error } => Err(LandEvalError::Engine(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_verb_and_inputs() {
        let command = EngineCommand::Run;
        let inputs = EngineInputs {
            listing_id: "A1".into(),
            city: "Springfield".into(),
            state: "IL".into(),
            property_address: "123 Main St".into(),
            extract_paths: Default::default(),
        };
        let request = BridgeRequest {
            command: &command,
            inputs: Some(&inputs),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["command"]["verb"], "run");
        assert_eq!(value["inputs"]["city"], "Springfield");
    }

    #[test]
    fn replay_request_omits_inputs() {
        let command = EngineCommand::Replay {
            task_id: "t-1".into(),
        };
        let request = BridgeRequest {
            command: &command,
            inputs: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("inputs").is_none());
        assert_eq!(value["command"]["task_id"], "t-1");
    }

    #[test]
    fn response_parses_result_and_error() {
        let ok: BridgeResponse =
            serde_json::from_str(r#"{"type":"result","result":{"task_results":[]}}"#).unwrap();
        assert!(matches!(ok, BridgeResponse::Result { .. }));

        let err: BridgeResponse =
            serde_json::from_str(r#"{"type":"error","error":"model unavailable"}"#).unwrap();
        match err {
            BridgeResponse::Error { error } => assert_eq!(error, "model unavailable"),
            other => panic!("expected error response, got {other:?}"),
        }
    }

    #[test]
    fn missing_bridge_command_is_engine_error() {
        let engine = BridgeEngine::new(EngineConfig {
            bridge_cmd: "definitely-not-a-real-command".into(),
            bridge_script: "x.py".into(),
            working_dir: String::new(),
        });

        let err = engine.execute(&EngineCommand::Run, None).unwrap_err();
        assert!(matches!(err, LandEvalError::Engine(_)));
    }

    #[test]
    fn bridge_roundtrip_via_cat() {
        // `cat` echoes the request line back; it parses as neither a
        // result nor an error envelope, which must surface as a protocol
        // error rather than a panic.
        let engine = BridgeEngine::new(EngineConfig {
            bridge_cmd: "cat".into(),
            bridge_script: "-".into(),
            working_dir: String::new(),
        });

        let err = engine.execute(&EngineCommand::Run, None).unwrap_err();
        assert!(err.to_string().contains("malformed bridge response"));
    }
}

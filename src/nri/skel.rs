//! Plugin skeleton: the contract between a plugin and the runner that serves it.
//!
//! The runtime executes the plugin binary once per event with the command as
//! its first argument. For `invoke` the request arrives as JSON on stdin and
//! the result is expected as JSON on stdout; nothing else may be written to
//! stdout.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

use crate::error::{NriError, Result};

use super::types::{PluginResult, Request};

/// Command that asks the plugin to handle one request.
pub const CMD_INVOKE: &str = "invoke";

/// Command that prints the plugin type and version.
pub const CMD_VERSION: &str = "version";

// ---- Context ----

/// Request-scoped context passed to every invocation.
///
/// Only the root context exists: it is never cancelled and has no deadline.
#[derive(Clone, Copy, Default)]
pub struct Context;

impl Context {
    /// The root context.
    pub fn background() -> Self {
        Context
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("context.Background")
    }
}

// ---- Plugin / Runner traits ----

/// A handler the runner dispatches requests to.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Identifier the runtime addresses this plugin by.
    fn plugin_type(&self) -> &str;

    /// Handles one request.
    async fn invoke(&self, ctx: &Context, request: &Request) -> Result<PluginResult>;
}

/// Serves a plugin until the runtime is done with it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Runner: Send + Sync {
    async fn run(&self, ctx: &Context, plugin: Arc<dyn Plugin>) -> Result<()>;
}

// ---- Stdio runner ----

/// Runner for the exec-style protocol: one command per process, request on
/// stdin, result on stdout.
#[derive(Debug, Clone)]
pub struct StdioRunner {
    command: Option<String>,
}

impl StdioRunner {
    /// Creates a runner for the given command (normally the first CLI argument).
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }

    /// Serves the command against arbitrary streams.
    pub async fn serve<R, W>(
        &self,
        ctx: &Context,
        plugin: &dyn Plugin,
        mut input: R,
        mut output: W,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        match self.command.as_deref() {
            None => Err(NriError::Protocol("command not provided".to_string())),
            Some(CMD_INVOKE) => {
                let mut buf = Vec::new();
                input.read_to_end(&mut buf).await?;

                // Only the first document counts; trailing input is ignored.
                let request: Request = serde_json::Deserializer::from_slice(&buf)
                    .into_iter::<Request>()
                    .next()
                    .ok_or_else(|| NriError::Protocol("no request on stdin".to_string()))??;
                trace!("dispatching {} for {}", request.state, request.id);

                let result = plugin.invoke(ctx, &request).await?;

                let mut encoded = serde_json::to_vec(&result)?;
                encoded.push(b'\n');
                output.write_all(&encoded).await?;
                output.flush().await?;
                Ok(())
            }
            Some(CMD_VERSION) => {
                let line = format!("{} {}\n", plugin.plugin_type(), env!("CARGO_PKG_VERSION"));
                output.write_all(line.as_bytes()).await?;
                output.flush().await?;
                Ok(())
            }
            Some(other) => Err(NriError::Protocol(format!(
                "unsupported command {:?}",
                other
            ))),
        }
    }
}

#[async_trait]
impl Runner for StdioRunner {
    async fn run(&self, ctx: &Context, plugin: Arc<dyn Plugin>) -> Result<()> {
        self.serve(ctx, plugin.as_ref(), tokio::io::stdin(), tokio::io::stdout())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Plugin for Echo {
        fn plugin_type(&self) -> &str {
            "echo"
        }

        async fn invoke(&self, _ctx: &Context, request: &Request) -> Result<PluginResult> {
            let mut result = request.new_result(self.plugin_type());
            result.metadata.insert("id".into(), request.id.clone());
            Ok(result)
        }
    }

    struct Failing;

    #[async_trait]
    impl Plugin for Failing {
        fn plugin_type(&self) -> &str {
            "failing"
        }

        async fn invoke(&self, _ctx: &Context, _request: &Request) -> Result<PluginResult> {
            Err(NriError::Invoke("boom".into()))
        }
    }

    async fn serve(
        command: Option<&str>,
        plugin: &dyn Plugin,
        input: &str,
    ) -> (Result<()>, String) {
        let runner = StdioRunner::new(command.map(String::from));
        let mut out = Vec::new();
        let res = runner
            .serve(&Context::background(), plugin, input.as_bytes(), &mut out)
            .await;
        (res, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_background_context() {
        assert_eq!(format!("{:?}", Context::background()), "context.Background");
    }

    #[tokio::test]
    async fn test_invoke_writes_result_line() {
        let input = json!({"version": "0.1", "id": "c1", "state": "create"}).to_string();
        let (res, out) = serve(Some("invoke"), &Echo, &input).await;

        res.unwrap();
        assert!(out.ends_with('\n'));
        let result: PluginResult = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(result.plugin, "echo");
        assert_eq!(result.version, "0.1");
        assert_eq!(result.metadata["id"], "c1");
    }

    #[tokio::test]
    async fn test_invoke_ignores_trailing_documents() {
        let input = r#"{"id": "first"} {"id": "second"}"#;
        let (res, out) = serve(Some("invoke"), &Echo, input).await;

        res.unwrap();
        let result: PluginResult = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(result.metadata["id"], "first");
    }

    #[tokio::test]
    async fn test_invoke_accepts_null_collections() {
        let input = r#"{"version":"0.1","id":"c1","sandboxID":"c1","pid":1,"state":"create",
            "spec":{"namespaces":null,"cgroupsPath":"/pod/c1","annotations":null},
            "labels":null,"results":null,"conf":null}"#;
        let (res, out) = serve(Some("invoke"), &Echo, input).await;

        res.unwrap();
        let result: PluginResult = serde_json::from_str(out.trim()).unwrap();
        assert_eq!(result.plugin, "echo");
        assert_eq!(result.metadata["id"], "c1");
    }

    #[tokio::test]
    async fn test_invoke_empty_stdin() {
        let (res, out) = serve(Some("invoke"), &Echo, "").await;
        assert!(matches!(res, Err(NriError::Protocol(_))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_invoke_malformed_request() {
        let (res, out) = serve(Some("invoke"), &Echo, "{not json").await;
        assert!(matches!(res, Err(NriError::Json(_))));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_invoke_error_propagates() {
        let (res, out) = serve(Some("invoke"), &Failing, "{}").await;
        assert!(matches!(res, Err(NriError::Invoke(ref m)) if m == "boom"));
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_version_command() {
        let (res, out) = serve(Some("version"), &Echo, "").await;
        res.unwrap();
        assert_eq!(out, format!("echo {}\n", env!("CARGO_PKG_VERSION")));
    }

    #[tokio::test]
    async fn test_version_writes_single_line() {
        let expected = format!("echo {}\n", env!("CARGO_PKG_VERSION"));
        let output = tokio_test::io::Builder::new()
            .write(expected.as_bytes())
            .build();

        StdioRunner::new(Some(CMD_VERSION.to_string()))
            .serve(&Context::background(), &Echo, tokio::io::empty(), output)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_command() {
        let (res, _) = serve(None, &Echo, "").await;
        assert_eq!(res.unwrap_err().to_string(), "command not provided");
    }

    #[tokio::test]
    async fn test_unsupported_command() {
        let (res, out) = serve(Some("setup"), &Echo, "{}").await;
        assert_eq!(res.unwrap_err().to_string(), "unsupported command \"setup\"");
        assert!(out.is_empty());
    }
}

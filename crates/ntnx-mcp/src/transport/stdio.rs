//! Stdio Transport
//!
//! Standard MCP transport over stdin/stdout: one JSON-RPC message per line.
//! Each request runs on its own task so a slow tool call does not hold up
//! the ones behind it; responses are written by a single writer task.

use super::{McpHandler, Transport};
use crate::{JsonRpcError, McpRequest, McpResponse};
use anyhow::Result;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Responses waiting for the writer
const OUTBOX_CAPACITY: usize = 64;

/// Stdio transport - reads JSON-RPC from stdin, writes to stdout
pub struct StdioTransport;

impl StdioTransport {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdioTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Transport for StdioTransport {
    async fn serve<H: McpHandler + 'static>(self, handler: Arc<H>) -> Result<()> {
        info!("Starting MCP stdio transport");
        serve_io(handler, tokio::io::stdin(), tokio::io::stdout()).await?;
        info!("Stdio transport shutting down");
        Ok(())
    }
}

/// Serve line-delimited JSON-RPC over any reader/writer pair.
///
/// Returns once the reader hits EOF and every in-flight request has been
/// answered.
pub async fn serve_io<H, R, W>(handler: Arc<H>, reader: R, writer: W) -> Result<()>
where
    H: McpHandler + 'static,
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<McpResponse>(OUTBOX_CAPACITY);
    let writer_task = tokio::spawn(write_responses(rx, writer));

    let read_result = read_requests(handler, reader, &tx).await;

    // The writer finishes once every spawned request has dropped its sender
    drop(tx);
    let write_result = writer_task.await?;
    read_result?;
    write_result
}

async fn read_requests<H, R>(
    handler: Arc<H>,
    reader: R,
    tx: &mpsc::Sender<McpResponse>,
) -> Result<()>
where
    H: McpHandler + 'static,
    R: AsyncRead + Unpin + Send,
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(());
        }

        let request = match std::str::from_utf8(&buf) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(request = %line, "Received request");
                decode(line)
            }
            Err(e) => {
                error!(error = %e, "Parse error");
                Err(McpResponse::error(
                    None,
                    JsonRpcError::parse_error(format!("Parse error: {}", e)),
                ))
            }
        };

        let request = match request {
            Ok(request) => request,
            Err(response) => {
                if tx.send(response).await.is_err() {
                    return Ok(());
                }
                continue;
            }
        };

        let handler = handler.clone();
        let tx = tx.clone();
        tokio::spawn(async move {
            if let Some(response) = handler.handle_request(request).await {
                if tx.send(response).await.is_err() {
                    warn!("Output closed before response could be written");
                }
            }
        });
    }
}

/// Parse one line, producing the JSON-RPC error response when it is not a request
fn decode(line: &str) -> std::result::Result<McpRequest, McpResponse> {
    let value: Value = serde_json::from_str(line).map_err(|e| {
        error!(error = %e, "Parse error");
        McpResponse::error(None, JsonRpcError::parse_error(format!("Parse error: {}", e)))
    })?;

    let id = value.get("id").cloned().filter(|id| !id.is_null());
    serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "Invalid request");
        McpResponse::error(id, JsonRpcError::invalid_request(format!("Invalid request: {}", e)))
    })
}

async fn write_responses<W>(mut rx: mpsc::Receiver<McpResponse>, mut writer: W) -> Result<()>
where
    W: AsyncWrite + Unpin + Send,
{
    while let Some(response) = rx.recv().await {
        let response_json = serde_json::to_string(&response)?;
        debug!(response = %response_json, "Sending response");

        writer.write_all(response_json.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::ReadBuf;

    struct PingHandler;

    #[async_trait::async_trait]
    impl McpHandler for PingHandler {
        async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
            Some(McpResponse::success(request.id, json!({})))
        }
    }

    /// Yields `data`, then fails every further read
    struct FailingReader {
        data: Option<&'static [u8]>,
    }

    impl AsyncRead for FailingReader {
        fn poll_read(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &mut ReadBuf<'_>,
        ) -> Poll<io::Result<()>> {
            match self.data.take() {
                Some(data) => {
                    buf.put_slice(data);
                    Poll::Ready(Ok(()))
                }
                None => Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdin gone"))),
            }
        }
    }

    async fn collect(output: tokio::io::DuplexStream) -> Vec<Value> {
        let mut lines = BufReader::new(output).lines();
        let mut responses = Vec::new();
        while let Some(line) = lines.next_line().await.unwrap() {
            responses.push(serde_json::from_str(&line).unwrap());
        }
        responses
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_answered_and_session_continues() {
        let input: &[u8] = b"{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\",\"x\":\"\xff\"}\n\
              {\"jsonrpc\":\"2.0\",\"id\":2,\"method\":\"ping\"}\n";
        let (server_out, client_out) = tokio::io::duplex(4096);

        serve_io(Arc::new(PingHandler), input, server_out).await.unwrap();
        let responses = collect(client_out).await;

        assert_eq!(responses.len(), 2);
        let parse_error = responses.iter().find(|r| r["id"].is_null()).unwrap();
        assert_eq!(parse_error["error"]["code"], -32700);
        let ping = responses.iter().find(|r| r["id"] == json!(2)).unwrap();
        assert_eq!(ping["result"], json!({}));
    }

    #[tokio::test]
    async fn test_read_error_still_flushes_answered_requests() {
        let reader = FailingReader {
            data: Some(b"{\"jsonrpc\":\"2.0\",\"id\":7,\"method\":\"ping\"}\n"),
        };
        let (server_out, client_out) = tokio::io::duplex(4096);

        let result = serve_io(Arc::new(PingHandler), reader, server_out).await;
        assert!(result.is_err());

        let responses = collect(client_out).await;
        assert_eq!(responses.len(), 1);
        assert_eq!(responses[0]["id"], 7);
    }

    #[test]
    fn test_decode_parse_error() {
        let response = decode("{not json").unwrap_err();
        assert_eq!(response.error.unwrap().code, -32700);
        assert!(response.id.is_none());
    }

    #[test]
    fn test_decode_invalid_request_keeps_id() {
        let response = decode(r#"{"jsonrpc":"2.0","id":9,"params":{}}"#).unwrap_err();
        assert_eq!(response.error.unwrap().code, -32600);
        assert_eq!(response.id, Some(serde_json::json!(9)));
    }

    #[test]
    fn test_decode_request() {
        let request = decode(r#"{"jsonrpc":"2.0","id":"a","method":"ping"}"#).unwrap();
        assert_eq!(request.method, "ping");
    }
}

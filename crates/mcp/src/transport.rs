// Newline-delimited JSON-RPC transport shared by the server and the bridge

use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse};
use anyhow::{Context, Result};
use bytes::BytesMut;
use futures::StreamExt;
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::task::JoinSet;
use tokio_util::codec::{Decoder, FramedRead, LinesCodec, LinesCodecError};

/// Anything that answers JSON-RPC requests.
#[async_trait::async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    /// Answer one request. Notifications get `None`.
    async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse>;

    /// Parse and answer one raw message.
    async fn handle_message(&self, message: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(message) {
            Ok(value) => value,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    JsonRpcError::parse_error(e.to_string()),
                ))
            }
        };

        let id = value.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(value) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                tracing::warn!(error = %e, "Invalid JSON-RPC request");
                Some(JsonRpcResponse::error(id, JsonRpcError::invalid_request()))
            }
        }
    }
}

/// Upper bound on a single request line.
pub const MAX_MESSAGE_BYTES: usize = 16 * 1024 * 1024;

/// One framed input line. Lines that are not valid UTF-8 or exceed the
/// length limit are reported instead of ending the stream.
enum Line {
    Message(String),
    Invalid(String),
}

struct MessageCodec(LinesCodec);

impl MessageCodec {
    fn new(max_length: usize) -> Self {
        Self(LinesCodec::new_with_max_length(max_length))
    }

    fn recover(
        result: Result<Option<String>, LinesCodecError>,
    ) -> Result<Option<Line>, LinesCodecError> {
        match result {
            Ok(line) => Ok(line.map(Line::Message)),
            Err(LinesCodecError::MaxLineLengthExceeded) => {
                Ok(Some(Line::Invalid("request line exceeds maximum length".to_string())))
            }
            Err(LinesCodecError::Io(e)) if e.kind() == std::io::ErrorKind::InvalidData => {
                Ok(Some(Line::Invalid(e.to_string())))
            }
            Err(e) => Err(e),
        }
    }
}

impl Decoder for MessageCodec {
    type Item = Line;
    type Error = LinesCodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<Line>, LinesCodecError> {
        Self::recover(self.0.decode(buf))
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<Line>, LinesCodecError> {
        Self::recover(self.0.decode_eof(buf))
    }
}

/// Serve requests read line by line from `reader`, writing one response per
/// line to `writer`. Requests run concurrently; responses are written as
/// they complete. Returns once the input is closed and every in-flight
/// request has been answered.
pub async fn serve<H, R, W>(handler: Arc<H>, reader: R, writer: W) -> Result<()>
where
    H: RequestHandler,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    serve_with_max_length(handler, reader, writer, MAX_MESSAGE_BYTES).await
}

/// Like [`serve`], with an explicit line length limit.
pub async fn serve_with_max_length<H, R, W>(
    handler: Arc<H>,
    reader: R,
    mut writer: W,
    max_length: usize,
) -> Result<()>
where
    H: RequestHandler,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = FramedRead::new(reader, MessageCodec::new(max_length));
    let mut in_flight = JoinSet::new();
    let mut input_open = true;

    while input_open || !in_flight.is_empty() {
        tokio::select! {
            line = lines.next(), if input_open => match line {
                Some(Ok(Line::Message(line))) => {
                    if !line.trim().is_empty() {
                        let handler = handler.clone();
                        in_flight.spawn(async move { handler.handle_message(&line).await });
                    }
                }
                Some(Ok(Line::Invalid(reason))) => {
                    tracing::warn!(reason = %reason, "Unreadable request line");
                    let response = JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error(reason));
                    write_response(&mut writer, &response).await?;
                }
                Some(Err(e)) => {
                    tracing::error!(error = %e, "Failed to read input, finishing in-flight requests");
                    input_open = false;
                }
                None => input_open = false,
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => match joined {
                Ok(Some(response)) => write_response(&mut writer, &response).await?,
                Ok(None) => {}
                Err(e) => tracing::error!(error = %e, "Request task failed"),
            },
        }
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}

/// Serve over the process's stdin and stdout.
pub async fn serve_stdio<H: RequestHandler>(handler: Arc<H>) -> Result<()> {
    serve(handler, tokio::io::stdin(), tokio::io::stdout()).await
}

async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &JsonRpcResponse,
) -> Result<()> {
    let mut line = serde_json::to_string(response).context("Failed to serialize response")?;
    line.push('\n');
    writer
        .write_all(line.as_bytes())
        .await
        .context("Failed to write response")?;
    writer.flush().await.context("Failed to flush output")?;
    Ok(())
}

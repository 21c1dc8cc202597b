//! Line-delimited request/response loop
//!
//! `Idle -> Reading -> Dispatching -> Responding -> Idle`, one request at a
//! time in arrival order. End of input ends the loop cleanly; the only error
//! that escapes is a failure to read from or write to the channel itself.

use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::Instrument;

use crate::error::ProtocolError;
use crate::protocol::{decode_request, encode_response, Request, Response};
use crate::registry::ToolRegistry;

#[derive(Debug, Deserialize)]
struct CallParams {
    name: String,
    #[serde(default)]
    arguments: Option<Value>,
}

/// Serve a registry over stdin/stdout until stdin closes
pub async fn serve_stdio(registry: &ToolRegistry) -> std::io::Result<()> {
    let reader = BufReader::new(tokio::io::stdin());
    let writer = tokio::io::stdout();
    serve(registry, reader, writer).await
}

/// Serve a registry over any line-oriented reader/writer pair
pub async fn serve<R, W>(registry: &ToolRegistry, reader: R, mut writer: W) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.split(b'\n');

    while let Some(mut raw) = lines.next_segment().await? {
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }

        let response = match String::from_utf8(raw) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_line(registry, &line).await,
            Err(e) => Some(Response::err(
                Value::Null,
                ProtocolError::parse_failure(format!("Parse error: {}", e)),
            )),
        };

        if let Some(response) = response {
            write_response(&mut writer, &response).await?;
        }
    }

    tracing::debug!("input closed");
    Ok(())
}

/// Decode and dispatch a single line, returning the response to write (if any)
pub async fn handle_line(registry: &ToolRegistry, line: &str) -> Option<Response> {
    match decode_request(line) {
        Ok(request) => handle_request(registry, request).await,
        Err(decode) => {
            tracing::warn!(error = %decode.error, "rejected request line");
            Some(Response::err(decode.id, decode.error))
        }
    }
}

/// Dispatch a decoded request; notifications produce no response
pub async fn handle_request(registry: &ToolRegistry, request: Request) -> Option<Response> {
    let span = tracing::info_span!(
        "request",
        method = %request.method,
        id = %request.response_id()
    );

    async move {
        if request.is_notification() {
            tracing::debug!("notification received");
            return None;
        }

        let id = request.response_id();
        let outcome = match request.method.as_str() {
            "initialize" => Ok(registry.initialize_result()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(registry.catalog()),
            "tools/call" => call_from_envelope(registry, request.params).await,
            method => registry.call(method, request.params).await,
        };

        Some(match outcome {
            Ok(result) => Response::ok(id, result),
            Err(error) => Response::err(id, error),
        })
    }
    .instrument(span)
    .await
}

async fn call_from_envelope(
    registry: &ToolRegistry,
    params: Option<Value>,
) -> Result<Value, ProtocolError> {
    let params: CallParams = serde_json::from_value(params.unwrap_or(Value::Null))
        .map_err(|e| ProtocolError::invalid_params(format!("tools/call: {}", e)))?;
    registry.call(&params.name, params.arguments).await
}

async fn write_response<W>(writer: &mut W, response: &Response) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let line = match encode_response(response) {
        Ok(line) => line,
        Err(e) => {
            tracing::error!(error = %e, "failed to encode response");
            let fallback = Response::err(
                response.id.clone(),
                ProtocolError::internal(format!("failed to encode response: {}", e)),
            );
            encode_response(&fallback)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?
        }
    };

    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

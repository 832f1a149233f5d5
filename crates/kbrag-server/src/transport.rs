//! The stdio line-delimited JSON-RPC loop (spec.md §5): one request
//! object per line on stdin, one response object per line on stdout,
//! each request's handling running on its own task so a slow or stuck
//! `Query` never blocks the next line from being read.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;
use tracing::{error, warn};

use crate::dispatch::dispatch;
use crate::protocol::{RpcError, RpcResponse};
use crate::state::ServerState;

/// Reads lines from `input` until EOF, dispatching each to its own task
/// and writing the resulting response line to `output` as soon as it's
/// ready. Responses can complete out of order relative to requests;
/// `id` round-trips so the caller can match them back up.
pub async fn serve<R, W>(state: ServerState, input: R, output: W) -> std::io::Result<()>
where
    R: tokio::io::AsyncRead + Unpin + Send + 'static,
    W: tokio::io::AsyncWrite + Unpin + Send + 'static,
{
    let mut lines = BufReader::new(input).lines();
    let output = Arc::new(Mutex::new(output));
    let mut inflight = Vec::new();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let state = state.clone();
        let output = Arc::clone(&output);
        let handle = tokio::spawn(async move {
            let response = decode_and_dispatch(state, &line).await;
            write_response(&output, &response).await;
        });
        inflight.push(handle);
        inflight.retain(|h| !h.is_finished());
    }

    for handle in inflight {
        if let Err(err) = handle.await {
            warn!(error = %err, "an in-flight request task panicked after stdin closed");
        }
    }

    Ok(())
}

async fn decode_and_dispatch(state: ServerState, line: &str) -> RpcResponse {
    match serde_json::from_str::<crate::protocol::RpcRequest>(line) {
        Ok(request) => dispatch(state, request).await,
        Err(err) => {
            warn!(error = %err, "received malformed JSON-RPC request line");
            RpcResponse::failure(
                serde_json::Value::Null,
                RpcError {
                    code: 4000,
                    message: format!("invalid request: malformed JSON ({err})"),
                    details: None,
                },
            )
        }
    }
}

async fn write_response<W>(output: &Arc<Mutex<W>>, response: &RpcResponse)
where
    W: tokio::io::AsyncWrite + Unpin,
{
    let Ok(mut encoded) = serde_json::to_vec(response) else {
        error!("failed to encode an outgoing response; this should be unreachable");
        return;
    };
    encoded.push(b'\n');

    let mut guard = output.lock().await;
    if let Err(err) = guard.write_all(&encoded).await {
        error!(error = %err, "failed to write response to stdout");
    }
    if let Err(err) = guard.flush().await {
        error!(error = %err, "failed to flush stdout");
    }
}

//! Per-connection handling: upgrade, ticker spawn, inbound loop.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::SplitStream;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{WebSocketStream, accept_async};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use pulse_core::outcome::{RecvOutcome, TickExit};
use pulse_core::sink::MessageSink;

use crate::errors::ConnectionError;
use crate::ticker::run_ticker;

/// Read half of an accepted connection.
pub type WsReader = SplitStream<WebSocketStream<TcpStream>>;

/// Handle one accepted TCP stream for its whole lifetime.
///
/// Upgrades the stream, starts the outbound ticker as its own task before
/// the inbound loop begins waiting, then runs the inbound loop on this
/// task. A clean close by either side ends both loops silently; any other
/// failure is returned and logged by the accept loop that spawned this
/// handler. The ticker observes the same closure independently and winds
/// down on its own within one tick.
pub(crate) async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    conn_id: u64,
    tick_interval: Duration,
    sink: Arc<dyn MessageSink>,
    cancel: CancellationToken,
) -> Result<(), ConnectionError> {
    let ws = accept_async(stream)
        .await
        .map_err(ConnectionError::Handshake)?;
    info!(conn_id, peer = %peer, "connection established");

    let (write, mut read) = ws.split();

    let ticker_cancel = cancel.clone();
    drop(tokio::spawn(async move {
        match run_ticker(write, tick_interval, ticker_cancel).await {
            Ok(TickExit::Closed) => debug!(conn_id, "outbound loop: connection closed"),
            Ok(TickExit::Cancelled) => debug!(conn_id, "outbound loop cancelled"),
            Err(e) => error!(conn_id, error = %e, "outbound loop failed"),
        }
    }));

    run_inbound(&mut read, conn_id, sink.as_ref(), &cancel).await?;
    info!(conn_id, "connection closed");
    Ok(())
}

/// The inbound loop: wait for the next frame, emit text, stop on close.
async fn run_inbound(
    read: &mut WsReader,
    conn_id: u64,
    sink: &dyn MessageSink,
    cancel: &CancellationToken,
) -> Result<(), ConnectionError> {
    loop {
        tokio::select! {
            item = read.next() => match classify_recv(item)? {
                RecvOutcome::Text(text) => sink.emit(&text),
                RecvOutcome::Ignored => debug!(conn_id, "ignoring non-text frame"),
                RecvOutcome::Closed => return Ok(()),
            },
            () = cancel.cancelled() => return Ok(()),
        }
    }
}

/// Classify one item from the read half.
///
/// A `Close` frame, the end of the stream, and the post-handshake
/// `ConnectionClosed` / `AlreadyClosed` results are all the graceful
/// path; any other error ends this connection's handling.
fn classify_recv(
    item: Option<Result<Message, tungstenite::Error>>,
) -> Result<RecvOutcome, ConnectionError> {
    match item {
        None | Some(Ok(Message::Close(_))) => Ok(RecvOutcome::Closed),
        Some(Ok(Message::Text(text))) => Ok(RecvOutcome::Text(text.as_str().to_owned())),
        Some(Ok(_)) => Ok(RecvOutcome::Ignored),
        Some(Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed)) => {
            Ok(RecvOutcome::Closed)
        }
        Some(Err(e)) => Err(ConnectionError::Transport(e)),
    }
}

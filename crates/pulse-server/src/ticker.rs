//! The outbound loop: stream the constant payload on a fixed cadence.

use std::time::Duration;

use futures::SinkExt;
use futures::stream::SplitSink;
use tokio::net::TcpStream;
use tokio::time;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_util::sync::CancellationToken;

use pulse_core::outcome::{SendOutcome, TickExit};
use pulse_core::payload::tick_frame;

use crate::errors::ConnectionError;

/// Write half of an accepted connection.
pub type WsWriter = SplitSink<WebSocketStream<TcpStream>, Message>;

/// Run the outbound loop for one connection.
///
/// The first tick fires immediately, so a client receives its first frame
/// right after connecting; each subsequent frame follows after `interval`.
/// The payload is re-serialized on every tick. Exits with
/// [`TickExit::Closed`] once a send observes the clean close, with
/// [`TickExit::Cancelled`] on server shutdown, and with an error for any
/// other send failure. There is no backpressure handling: a transport that
/// cannot accept the write surfaces as the error case.
pub async fn run_ticker(
    mut write: WsWriter,
    interval: Duration,
    cancel: CancellationToken,
) -> Result<TickExit, ConnectionError> {
    let mut ticks = time::interval(interval);
    loop {
        tokio::select! {
            _ = ticks.tick() => {
                match classify_send(write.send(Message::text(tick_frame())).await) {
                    Ok(SendOutcome::Sent) => {}
                    Ok(SendOutcome::Closed) => return Ok(TickExit::Closed),
                    Err(e) => return Err(e),
                }
            }
            () = cancel.cancelled() => return Ok(TickExit::Cancelled),
        }
    }
}

/// Classify one send attempt: clean close is a value, not an error.
fn classify_send(result: Result<(), tungstenite::Error>) -> Result<SendOutcome, ConnectionError> {
    match result {
        Ok(()) => Ok(SendOutcome::Sent),
        Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
            Ok(SendOutcome::Closed)
        }
        Err(e) => Err(ConnectionError::Transport(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use futures::StreamExt;
    use tokio::net::TcpListener;
    use tokio::time::timeout;
    use tokio_tungstenite::{accept_async, connect_async};

    const TIMEOUT: Duration = Duration::from_secs(5);

    type Client = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// A connected (server write half, server read half, client) triple.
    async fn ws_pair() -> (WsWriter, crate::connection::WsReader, Client) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            accept_async(stream).await.unwrap()
        });
        let (client, _) = connect_async(format!("ws://{addr}")).await.unwrap();
        let ws = server.await.unwrap();
        let (write, read) = ws.split();
        (write, read, client)
    }

    async fn next_text(client: &mut Client) -> String {
        loop {
            let item = timeout(TIMEOUT, client.next())
                .await
                .expect("timed out waiting for frame")
                .expect("stream ended")
                .expect("read failed");
            if let Message::Text(text) = item {
                return text.as_str().to_owned();
            }
        }
    }

    #[tokio::test]
    async fn ticker_sends_the_empty_array() {
        let (write, _read, mut client) = ws_pair().await;
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_ticker(write, Duration::from_millis(20), cancel.clone()));

        for _ in 0..3 {
            assert_eq!(next_text(&mut client).await, "[]");
        }

        cancel.cancel();
        let result = timeout(TIMEOUT, handle).await.unwrap().unwrap();
        assert_matches!(result, Ok(TickExit::Cancelled));
    }

    #[tokio::test]
    async fn first_frame_arrives_without_waiting_a_full_interval() {
        let (write, _read, mut client) = ws_pair().await;
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_ticker(
            write,
            Duration::from_secs(60),
            cancel.clone(),
        ));

        // With a 60s interval, only the immediate first tick can produce this.
        assert_eq!(next_text(&mut client).await, "[]");

        cancel.cancel();
        let result = timeout(TIMEOUT, handle).await.unwrap().unwrap();
        assert_matches!(result, Ok(TickExit::Cancelled));
    }

    #[tokio::test]
    async fn ticker_exits_on_cancellation() {
        let (write, _read, _client) = ws_pair().await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = timeout(
            TIMEOUT,
            run_ticker(write, Duration::from_millis(10), cancel),
        )
        .await
        .unwrap();
        assert_matches!(result, Ok(TickExit::Cancelled));
    }

    #[tokio::test]
    async fn ticker_exits_closed_after_clean_close() {
        let (write, mut read, mut client) = ws_pair().await;

        // Drain the server read half so the closing handshake completes.
        let reader = tokio::spawn(async move {
            while let Some(item) = read.next().await {
                if item.is_err() {
                    break;
                }
            }
        });

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_ticker(write, Duration::from_millis(10), cancel));

        client.close(None).await.unwrap();
        // Swallow frames until the client's stream ends.
        while let Ok(Some(_)) = timeout(TIMEOUT, client.next()).await {}

        let result = timeout(TIMEOUT, handle).await.unwrap().unwrap();
        assert_matches!(result, Ok(TickExit::Closed));
        timeout(TIMEOUT, reader).await.unwrap().unwrap();
    }

    #[test]
    fn classify_send_success() {
        assert_matches!(classify_send(Ok(())), Ok(SendOutcome::Sent));
    }

    #[test]
    fn classify_send_clean_close() {
        assert_matches!(
            classify_send(Err(tungstenite::Error::ConnectionClosed)),
            Ok(SendOutcome::Closed)
        );
        assert_matches!(
            classify_send(Err(tungstenite::Error::AlreadyClosed)),
            Ok(SendOutcome::Closed)
        );
    }

    #[test]
    fn classify_send_io_failure_is_transport() {
        let io = std::io::Error::from(std::io::ErrorKind::BrokenPipe);
        assert_matches!(
            classify_send(Err(tungstenite::Error::Io(io))),
            Err(ConnectionError::Transport(_))
        );
    }
}

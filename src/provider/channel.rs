// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push-event channel over WebSocket.
//!
//! The dispatcher owns exactly one open channel at a time and recreates
//! it on every disconnect; the [`EventLink`] trait is the seam that lets
//! tests substitute a scripted channel for the real socket.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use crate::error::TransportError;

/// A live connection to the provider push channel.
///
/// Yields raw text frames; parsing happens in the dispatcher. A channel
/// that has reported `None` or an error is spent and must be reopened
/// through the [`EventLink`].
#[async_trait]
pub trait EventChannel: Send {
    /// Receives the next raw frame.
    ///
    /// `None` means the remote side closed the connection cleanly;
    /// `Some(Err(_))` is a socket error. Both leave the channel closed.
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>>;

    /// Returns true while the connection is believed open.
    fn is_open(&self) -> bool;
}

/// Capability to open a fresh push-event channel.
#[async_trait]
pub trait EventLink: Send + Sync {
    /// Opens a new channel, performing any required handshake.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] when the connection or the
    /// handshake fails.
    async fn open(&self) -> Result<Box<dyn EventChannel>, TransportError>;
}

/// WebSocket-backed event channel.
pub struct WsEventChannel {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    open: bool,
}

impl WsEventChannel {
    /// Connects to `url` and sends `handshake` as the first text frame.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Connect`] if the upgrade or the
    /// handshake send fails.
    pub async fn connect(url: &str, handshake: String) -> Result<Self, TransportError> {
        tracing::info!(url, "opening push-event connection");

        let (mut stream, _response) = connect_async(url)
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        stream
            .send(Message::text(handshake))
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        tracing::debug!("push-event connection established");

        Ok(Self { stream, open: true })
    }
}

#[async_trait]
impl EventChannel for WsEventChannel {
    async fn next_frame(&mut self) -> Option<Result<String, TransportError>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(Ok(text.to_string())),
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                    // tungstenite answers pings itself
                    tracing::trace!("websocket keepalive frame");
                }
                Some(Ok(Message::Close(frame))) => {
                    if let Some(cf) = frame {
                        tracing::info!(code = %cf.code, reason = %cf.reason, "close frame received");
                    } else {
                        tracing::info!("close frame received");
                    }
                    self.open = false;
                    return None;
                }
                Some(Ok(_)) => {
                    // binary and raw frames carry nothing for us
                }
                Some(Err(e)) => {
                    self.open = false;
                    return Some(Err(TransportError::Socket(e.to_string())));
                }
                None => {
                    tracing::info!("push-event stream ended");
                    self.open = false;
                    return None;
                }
            }
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

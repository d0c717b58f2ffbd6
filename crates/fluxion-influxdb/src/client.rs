// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Client for the InfluxDB 0.8 series API.
//!
//! Two transports carry the same JSON array of series:
//!
//! - HTTP: `POST /db/<database>/series?u=<user>&p=<password>&time_precision=ms`
//! - UDP: one datagram per batch, sent to the configured server address.
//!   The 0.8 UDP listener reads into a 2048-byte buffer, so larger batches
//!   are refused before anything is sent.
//!
//! Neither transport sets a timeout; a slow store blocks the caller.

use crate::config::OutputConfig;
use crate::error::ClientError;
use crate::series::Series;
use std::net::{ToSocketAddrs, UdpSocket};

/// Credentials used when the configuration leaves them unset.
pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_PASSWORD: &str = "root";

/// Time precision of the `time` column written by the encoder.
const TIME_PRECISION: &str = "ms";

/// Datagrams at or above this size are truncated by the store's UDP listener.
pub const UDP_MAX_MESSAGE_SIZE: usize = 2048;

/// Connection to a time-series store able to accept series batches.
pub trait SeriesClient: Send {
    /// Open the client described by `config`.
    fn connect(config: &OutputConfig) -> Result<Self, ClientError>
    where
        Self: Sized;

    /// Submit a batch over the reliable stream transport.
    fn write_series(&self, series: &[&Series]) -> Result<(), ClientError>;

    /// Submit a batch as a single datagram.
    fn write_series_over_udp(&self, series: &[&Series]) -> Result<(), ClientError>;
}

/// Default client: blocking HTTP via `reqwest`, plus a connected UDP socket
/// when `use_udp` is set.
pub struct InfluxClient {
    http: reqwest::blocking::Client,
    series_url: reqwest::Url,
    user: String,
    password: String,
    udp: Option<UdpSocket>,
}

impl InfluxClient {
    /// URL the HTTP transport posts to.
    pub fn series_url(&self) -> &str {
        self.series_url.as_str()
    }

    /// `{scheme}://{server}/db/{database}/series`, with the database name
    /// escaped as a single path segment.
    fn build_series_url(config: &OutputConfig) -> Result<reqwest::Url, ClientError> {
        let scheme = if config.secure { "https" } else { "http" };
        let mut url = reqwest::Url::parse(&format!("{}://{}", scheme, config.server))
            .map_err(|e| ClientError::InvalidUrl(format!("{}: {}", config.server, e)))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(config.server.clone()))?
            .pop_if_empty()
            .push("db")
            .push(&config.database)
            .push("series");
        Ok(url)
    }

    fn connect_udp(server: &str) -> Result<UdpSocket, ClientError> {
        let addr = server
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| ClientError::Resolve(server.to_string()))?;
        let local = if addr.is_ipv4() { "0.0.0.0:0" } else { "[::]:0" };
        let socket = UdpSocket::bind(local)?;
        socket.connect(addr)?;
        Ok(socket)
    }
}

impl SeriesClient for InfluxClient {
    fn connect(config: &OutputConfig) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()?;
        let series_url = Self::build_series_url(config)?;

        let udp = if config.use_udp {
            let socket = Self::connect_udp(&config.server)?;
            tracing::info!(server = %config.server, "UDP transport connected");
            Some(socket)
        } else {
            None
        };

        Ok(Self {
            http,
            series_url,
            user: config.user.clone().unwrap_or_else(|| DEFAULT_USER.to_string()),
            password: config
                .password
                .clone()
                .unwrap_or_else(|| DEFAULT_PASSWORD.to_string()),
            udp,
        })
    }

    fn write_series(&self, series: &[&Series]) -> Result<(), ClientError> {
        let response = self
            .http
            .post(self.series_url.clone())
            .query(&[
                ("u", self.user.as_str()),
                ("p", self.password.as_str()),
                ("time_precision", TIME_PRECISION),
            ])
            .json(series)
            .send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            body,
        })
    }

    fn write_series_over_udp(&self, series: &[&Series]) -> Result<(), ClientError> {
        let socket = self.udp.as_ref().ok_or(ClientError::UdpDisabled)?;
        let payload = serde_json::to_vec(series)?;
        if payload.len() >= UDP_MAX_MESSAGE_SIZE {
            return Err(ClientError::PayloadTooLarge {
                size: payload.len(),
                limit: UDP_MAX_MESSAGE_SIZE,
            });
        }
        socket.send(&payload)?;
        Ok(())
    }
}

impl std::fmt::Debug for InfluxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InfluxClient")
            .field("series_url", &self.series_url.as_str())
            .field("user", &self.user)
            .field("udp", &self.udp.as_ref().and_then(|s| s.peer_addr().ok()))
            .finish_non_exhaustive()
    }
}

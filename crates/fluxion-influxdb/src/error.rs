// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for configuration, the store client and the output adapter.

use thiserror::Error;

/// Configuration errors. Fatal at start-up.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors reported by the time-series store client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("Server returned ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot resolve server address: {0}")]
    Resolve(String),

    #[error("Invalid server address: {0}")]
    InvalidUrl(String),

    /// The batch does not fit in one datagram the store can read.
    #[error("UDP payload of {size} bytes exceeds the {limit}-byte message limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("UDP isn't enabled, set use_udp to true")]
    UdpDisabled,
}

/// Errors surfaced by the output adapter to its host.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The client handle could not be established at start-up.
    #[error("connection error: {0}")]
    Connect(#[source] ClientError),

    /// A batch submission failed; the client error is passed through as is.
    #[error(transparent)]
    Transport(ClientError),

    /// A unit handed to `write` was not produced by this adapter's encoder.
    #[error("unit at index {index} is not a series produced by this output")]
    UnexpectedUnit { index: usize },

    #[error("output is not connected, call start() first")]
    NotConnected,

    #[error("output is already started")]
    AlreadyStarted,

    #[error("output is closed")]
    Closed,
}

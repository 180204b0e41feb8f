// Copyright (C) 2026  winnyboy5
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Upstream query errors

use std::time::Duration;
use thiserror::Error;

/// Errors returned by upstream queries
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Connection-level failure before a response was received
    #[error("transport error: {0}")]
    Transport(String),

    /// The gRPC server answered with a non-OK status
    #[error("rpc error: code = {code:?} desc = {message}")]
    Status {
        /// gRPC status code
        code: tonic::Code,
        /// Server supplied description
        message: String,
    },

    /// HTTP request to the RPC endpoint or price directory failed
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON-RPC error object returned by the node
    #[error("json-rpc error {code}: {message}")]
    JsonRpc {
        /// JSON-RPC error code
        code: i64,
        /// Error message
        message: String,
    },

    /// Response received but its content could not be interpreted
    #[error("decode error: {0}")]
    Decode(String),

    /// A decimal amount is not a valid number
    #[error("invalid decimal '{0}'")]
    InvalidDecimal(String),

    /// The requested entity is not present upstream
    #[error("not found: {0}")]
    NotFound(String),

    /// The per-query deadline elapsed
    #[error("query timed out after {0:?}")]
    Timeout(Duration),

    /// Client could not be constructed from its settings
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<tonic::Status> for UpstreamError {
    fn from(status: tonic::Status) -> Self {
        UpstreamError::Status {
            code: status.code(),
            message: status.message().to_string(),
        }
    }
}

/// Result alias for upstream queries
pub type UpstreamResult<T> = Result<T, UpstreamError>;

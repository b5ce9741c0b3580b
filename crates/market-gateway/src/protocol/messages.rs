//! Gateway frame format

use super::{CloseCode, HelloPayload, OpCode, ReadyPayload};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A frame sent in either direction over the socket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: OpCode,

    /// Event type (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Per-connection sequence number (only for op=0 Dispatch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

/// Incoming frame before the op code is checked
#[derive(Deserialize)]
struct RawFrame {
    op: u8,
    #[serde(default)]
    d: Option<Value>,
}

impl GatewayMessage {
    fn bare(op: OpCode, d: Option<Value>) -> Self {
        Self { op, t: None, s: None, d }
    }

    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            op: OpCode::Dispatch,
            t: Some(event_type.into()),
            s: Some(sequence),
            d: Some(data),
        }
    }

    #[must_use]
    pub fn hello(payload: &HelloPayload) -> Self {
        Self::bare(OpCode::Hello, serde_json::to_value(payload).ok())
    }

    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::bare(OpCode::HeartbeatAck, None)
    }

    #[must_use]
    pub fn ready(payload: &ReadyPayload) -> Self {
        Self::bare(OpCode::Ready, serde_json::to_value(payload).ok())
    }

    /// Parse a client frame
    ///
    /// Broken JSON maps to `DecodeError`; a number outside the client ops
    /// maps to `UnknownOpcode`.
    pub fn parse(text: &str) -> Result<Self, CloseCode> {
        let raw: RawFrame = serde_json::from_str(text).map_err(|_| CloseCode::DecodeError)?;
        let op = OpCode::from_u8(raw.op)
            .filter(|op| op.is_client_op())
            .ok_or(CloseCode::UnknownOpcode)?;
        Ok(Self::bare(op, raw.d))
    }

    /// Decode the `d` field into an op-specific payload
    pub fn payload<T: DeserializeOwned>(&self) -> Option<T> {
        self.d.as_ref().and_then(|d| T::deserialize(d).ok())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl std::fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.t, self.s) {
            (Some(t), Some(s)) => write!(f, "GatewayMessage(op={}, t={t}, s={s})", self.op),
            (Some(t), None) => write!(f, "GatewayMessage(op={}, t={t})", self.op),
            _ => write!(f, "GatewayMessage(op={})", self.op),
        }
    }
}

use thiserror::Error;

/// Errors from encoding or decoding a [`Snapshot`](crate::Snapshot).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SnapshotError {
    #[cfg(feature = "json")]
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "msgpack")]
    #[error("msgpack encode: {0}")]
    MsgpackEncode(#[from] rmp_serde::encode::Error),

    #[cfg(feature = "msgpack")]
    #[error("msgpack decode: {0}")]
    MsgpackDecode(#[from] rmp_serde::decode::Error),
}

//! JSON request bodies.

use serde::de::DeserializeOwned;

use crate::error::BindError;

/// Rejects bodies larger than `limit` bytes.
///
/// # Errors
///
/// [`BindError::PayloadTooLarge`] when `len > limit`.
pub fn check_body_limit(len: usize, limit: usize) -> Result<(), BindError> {
    if len > limit {
        return Err(BindError::PayloadTooLarge { limit, actual: len });
    }
    Ok(())
}

/// Decodes a JSON body into `T`.
///
/// Keys missing from the body keep whatever `T`'s serde attributes give
/// them; records meant for bodies use `#[serde(default)]`.
///
/// # Errors
///
/// [`BindError::Body`] carrying the decoder's message.
///
/// # Example
///
/// ```rust
/// use serde::Deserialize;
/// use waymark_extract::decode_json;
///
/// #[derive(Debug, Default, Deserialize)]
/// #[serde(default)]
/// struct Setting {
///     path: String,
///     count: i64,
/// }
///
/// let setting: Setting = decode_json(br#"{"path": "p"}"#).unwrap();
/// assert_eq!(setting.count, 0);
///
/// let err = decode_json::<Setting>(br#"{"count": "mm"}"#).unwrap_err();
/// assert!(err.to_string().starts_with("invalid type: string \"mm\""));
/// ```
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, BindError> {
    serde_json::from_slice(body).map_err(|e| BindError::Body(e.to_string()))
}

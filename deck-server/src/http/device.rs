//! `X-Device-ID` extractor.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use swipedeck_types::{DeviceId, SwipeError, DEVICE_ID_HEADER};

use crate::error::ServerError;

/// The calling device, taken from the `X-Device-ID` header.
///
/// Missing or blank headers reject with 400 before the handler runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device(pub DeviceId);

#[async_trait]
impl<S> FromRequestParts<S> for Device
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(DEVICE_ID_HEADER)
            .ok_or(ServerError::MissingDeviceId)?;
        let raw = value.to_str().map_err(|_| {
            ServerError::InvalidDeviceId(SwipeError::InvalidData(
                "header is not visible ASCII".to_string(),
            ))
        })?;

        match DeviceId::parse(raw) {
            Ok(device) => Ok(Device(device)),
            Err(SwipeError::EmptyDeviceId) => Err(ServerError::MissingDeviceId),
            Err(e) => Err(e.into()),
        }
    }
}

//! Decoding of the SDK's terminal-callback error argument.

use ca_payments_core::{CallbackStatus, StatusCode};
use serde_json::Value;

/// Turn the (already JSON-converted) error argument into a status.
///
/// `null`/`undefined` mean success. Anything else is an error, even if it
/// does not have the documented `{ code, message }` shape.
#[must_use]
pub fn callback_status(error: Option<Value>) -> Option<CallbackStatus> {
    let error = error.filter(|value| !value.is_null())?;

    match serde_json::from_value::<CallbackStatus>(error.clone()) {
        Ok(status) => Some(status),
        Err(_) => {
            let message = match error {
                Value::String(message) => message,
                other => other.to_string(),
            };
            Some(CallbackStatus::new(StatusCode::General, message))
        }
    }
}

//! Bindings to the `window.ChargeAfter` object.

use async_trait::async_trait;
use ca_payments::{FlowKind, PresentRequest, VendorConfig, VendorSdk};
use ca_payments_core::{CallbackStatus, PaymentsError, Result, StatusCode};
use js_sys::{Function, Promise, Reflect};
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::convert::{self, describe, to_json};
use crate::page::config_object;
use crate::status::callback_status;

/// The SDK object installed by the script.
pub struct JsVendor {
    sdk: JsValue,
}

impl JsVendor {
    /// Wrap `sdk` if it is the loaded SDK.
    ///
    /// The page publishes a bare `{ cfg }` object under the same global
    /// before the script runs; that object has no `init` and is rejected.
    #[must_use]
    pub fn from_global(sdk: JsValue) -> Option<Self> {
        let init = Reflect::get(&sdk, &JsValue::from_str("init")).ok()?;
        init.is_function().then_some(Self { sdk })
    }

    fn method(target: &JsValue, name: &str) -> std::result::Result<Function, JsValue> {
        Reflect::get(target, &JsValue::from_str(name))?
            .dyn_into::<Function>()
            .map_err(|_| JsValue::from_str(&format!("{name} is not a function")))
    }

    fn try_present(&self, request: PresentRequest) -> std::result::Result<(), JsValue> {
        let options = convert::to_js(&request.options)?;

        let callback = request.callback;
        let terminal = match request.flow {
            FlowKind::Checkout => {
                Closure::<dyn FnMut(JsValue, JsValue, JsValue)>::new(
                    move |token: JsValue, data: JsValue, error: JsValue| {
                        callback.call_with_token(
                            token.as_string(),
                            to_json(&data),
                            callback_status(to_json(&error)),
                        );
                    },
                )
            }
            FlowKind::Apply | FlowKind::Identify => {
                Closure::<dyn FnMut(JsValue, JsValue, JsValue)>::new(
                    move |data: JsValue, error: JsValue, _: JsValue| {
                        callback.call(to_json(&data), callback_status(to_json(&error)));
                    },
                )
            }
        };
        // Closures below are owned by the option bag from here on.
        convert::set(&options, "callback", &terminal.into_js_value())?;

        if let Some(adapter) = request.on_data_update {
            let on_data_update = Closure::<dyn FnMut(JsValue, Function)>::new(
                move |updated: JsValue, reply: Function| {
                    let continuation = Box::new(move |value: Value| {
                        let result = convert::to_js(&value)
                            .and_then(|value| reply.call1(&JsValue::NULL, &value));
                        if let Err(err) = result {
                            tracing::warn!(error = %describe(&err), "data update reply failed");
                        }
                    });
                    adapter.call(to_json(&updated).unwrap_or(Value::Null), continuation);
                },
            );
            convert::set(&options, "onDataUpdate", &on_data_update.into_js_value())?;
        }

        if let Some(hook) = request.on_confirm {
            let on_confirm = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
                hook(to_json(&payload).unwrap_or(Value::Null));
            });
            convert::set(&options, "onConfirm", &on_confirm.into_js_value())?;
        }

        if let Some(hook) = request.on_approval_status_change {
            let on_change = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
                hook(to_json(&payload).unwrap_or(Value::Null));
            });
            convert::set(&options, "onApprovalStatusChange", &on_change.into_js_value())?;
        }

        let payments = Reflect::get(&self.sdk, &JsValue::from_str("payments"))?;
        let present = Self::method(&payments, "present")?;
        present.call2(&payments, &JsValue::from_str(request.flow.as_str()), &options)?;
        Ok(())
    }
}

#[async_trait(?Send)]
impl VendorSdk for JsVendor {
    async fn init(&self, config: &VendorConfig) -> Result<()> {
        let vendor_error = |err: JsValue| PaymentsError::VendorInit(describe(&err));

        let cfg = config_object(config).map_err(vendor_error)?;
        let init = Self::method(&self.sdk, "init").map_err(vendor_error)?;
        let returned = init.call1(&self.sdk, &cfg).map_err(vendor_error)?;

        // `init` may or may not return a promise.
        JsFuture::from(Promise::resolve(&returned))
            .await
            .map_err(vendor_error)?;
        Ok(())
    }

    fn present(&self, request: PresentRequest) {
        let flow = request.flow;
        let callback = request.callback.clone();

        if let Err(err) = self.try_present(request) {
            let message = describe(&err);
            tracing::error!(flow = %flow, error = %message, "payments SDK present failed");
            callback.call(None, Some(CallbackStatus::new(StatusCode::General, message)));
        }
    }
}

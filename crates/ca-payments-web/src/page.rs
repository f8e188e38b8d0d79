//! `web-sys` page host.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use ca_payments::{PageHost, ScriptCallback, ScriptLoad, ScriptTag, VendorConfig, VendorSdk};
use futures::future::{FutureExt, LocalBoxFuture};
use gloo_timers::future::TimeoutFuture;
use js_sys::{Object, Reflect};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Event, HtmlElement, HtmlScriptElement, Window};

use crate::convert::{self, describe};
use crate::vendor::JsVendor;

/// Global the SDK reads its bootstrap config from.
const CONFIG_GLOBAL: &str = "caConfig";

/// Global the SDK installs itself on.
pub(crate) const SDK_GLOBAL: &str = "ChargeAfter";

type Slot = Rc<RefCell<Option<ScriptCallback>>>;

/// The browser window the bridge runs in.
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    /// The current window, or `None` outside a document context.
    #[must_use]
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn try_append(&self, tag: &ScriptTag, slot: &Slot) -> Result<(), JsValue> {
        let script: HtmlScriptElement = self
            .document
            .create_element("script")?
            .dyn_into()
            .map_err(JsValue::from)?;
        script.set_id(&tag.id);
        script.set_src(&tag.src);
        script.set_async(tag.async_load);

        // Both listeners share the slot; whichever event fires first wins.
        let onload = settle_listener(Rc::clone(slot), ScriptLoad::Loaded);
        let onerror = settle_listener(Rc::clone(slot), ScriptLoad::Failed);
        script.set_onload(Some(onload.unchecked_ref()));
        script.set_onerror(Some(onerror.unchecked_ref()));

        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.append_child(&script)?;
        Ok(())
    }

    fn try_publish(&self, config: &VendorConfig) -> Result<(), JsValue> {
        let cfg = config_object(config)?;
        convert::set(&self.window, CONFIG_GLOBAL, &cfg)?;

        let sdk = Reflect::get(&self.window, &JsValue::from_str(SDK_GLOBAL))?;
        let sdk = if sdk.is_object() { sdk } else { Object::new().into() };
        convert::set(&sdk, "cfg", &cfg)?;
        convert::set(&self.window, SDK_GLOBAL, &sdk)
    }
}

impl PageHost for WebPage {
    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn append_script(&self, tag: ScriptTag, on_settled: ScriptCallback) {
        let slot: Slot = Rc::new(RefCell::new(Some(on_settled)));

        if let Err(err) = self.try_append(&tag, &slot) {
            tracing::warn!(src = %tag.src, error = %describe(&err), "failed to append payments SDK script");
            let callback = slot.borrow_mut().take();
            if let Some(callback) = callback {
                callback(ScriptLoad::Failed);
            }
        }
    }

    fn remove_element(&self, id: &str) {
        let Some(element) = self.document.get_element_by_id(id) else {
            return;
        };
        if let Some(element) = element.dyn_ref::<HtmlElement>() {
            element.set_onload(None);
            element.set_onerror(None);
        }
        element.remove();
    }

    fn publish_config(&self, config: &VendorConfig) {
        if let Err(err) = self.try_publish(config) {
            tracing::warn!(error = %describe(&err), "failed to publish payments SDK config");
        }
    }

    fn vendor(&self) -> Option<Rc<dyn VendorSdk>> {
        let sdk = Reflect::get(&self.window, &JsValue::from_str(SDK_GLOBAL)).ok()?;
        JsVendor::from_global(sdk).map(|vendor| Rc::new(vendor) as Rc<dyn VendorSdk>)
    }

    fn delay(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).boxed_local()
    }
}

/// The SDK config as a JS object, with `onLoaded` attached when set.
pub(crate) fn config_object(config: &VendorConfig) -> Result<JsValue, JsValue> {
    let cfg = convert::to_js(config)?;
    if let Some(on_loaded) = config.on_loaded.clone() {
        let closure = Closure::<dyn FnMut()>::new(move || on_loaded());
        convert::set(&cfg, "onLoaded", &closure.into_js_value())?;
    }
    Ok(cfg)
}

fn settle_listener(slot: Slot, outcome: ScriptLoad) -> JsValue {
    Closure::<dyn FnMut(Event)>::new(move |_event: Event| {
        let callback = slot.borrow_mut().take();
        if let Some(callback) = callback {
            callback(outcome);
        }
    })
    .into_js_value()
}

//! Common test utilities for ca-payments integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use async_trait::async_trait;
use ca_payments::{
    DataUpdateAdapter, FlowKind, MerchantOptions, PageHost, Payments, PaymentsOptions,
    PresentRequest, ScriptCallback, ScriptLoad, ScriptTag, TerminalCallback, VendorConfig,
    VendorSdk, SCRIPT_ELEMENT_ID,
};
use ca_payments_core::{
    CallbackStatus, Environment, EnvironmentName, PaymentsError, SessionConfig,
};
use futures::future::{FutureExt, LocalBoxFuture};
use serde_json::Value;

// ============================================================================
// Fake page
// ============================================================================

/// What the page does when a script is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Load immediately and install the SDK object.
    Auto,
    /// Wait for [`FakePage::fire_load`].
    Manual,
    /// Fire the `error` event immediately.
    Fail,
    /// Load immediately but never install the SDK object.
    NoSdk,
}

/// In-memory page: a document with script elements, a global SDK slot and a
/// config slot.
pub struct FakePage {
    mode: Cell<LoadMode>,
    sdk: Rc<FakeVendor>,
    elements: RefCell<Vec<ScriptTag>>,
    appended: Cell<usize>,
    pending: RefCell<Vec<ScriptCallback>>,
    published: RefCell<Vec<VendorConfig>>,
    installed: RefCell<Option<Rc<FakeVendor>>>,
}

impl FakePage {
    pub fn new(mode: LoadMode) -> Rc<Self> {
        Rc::new(Self {
            mode: Cell::new(mode),
            sdk: FakeVendor::new(),
            elements: RefCell::new(Vec::new()),
            appended: Cell::new(0),
            pending: RefCell::new(Vec::new()),
            published: RefCell::new(Vec::new()),
            installed: RefCell::new(None),
        })
    }

    /// A page where the SDK was already loaded by other means.
    pub fn preloaded() -> Rc<Self> {
        let page = Self::new(LoadMode::Auto);
        page.elements.borrow_mut().push(ScriptTag {
            id: SCRIPT_ELEMENT_ID.to_string(),
            src: "https://cdn.chargeafter.com/web/v2/chargeafter.min.js".into(),
            async_load: true,
        });
        page.install();
        page
    }

    pub fn set_mode(&self, mode: LoadMode) {
        self.mode.set(mode);
    }

    /// The SDK object this page installs when its script loads.
    pub fn sdk(&self) -> Rc<FakeVendor> {
        Rc::clone(&self.sdk)
    }

    /// Fire `load` for every pending script.
    pub fn fire_load(&self) {
        self.install();
        let pending: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        for callback in pending {
            callback(ScriptLoad::Loaded);
        }
    }

    pub fn pending_loads(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Script elements carrying the SDK id.
    pub fn script_count(&self) -> usize {
        self.elements
            .borrow()
            .iter()
            .filter(|tag| tag.id == SCRIPT_ELEMENT_ID)
            .count()
    }

    /// Total number of `append_script` calls.
    pub fn appended(&self) -> usize {
        self.appended.get()
    }

    pub fn scripts(&self) -> Vec<ScriptTag> {
        self.elements.borrow().clone()
    }

    pub fn published(&self) -> Vec<VendorConfig> {
        self.published.borrow().clone()
    }

    fn install(&self) {
        *self.installed.borrow_mut() = Some(Rc::clone(&self.sdk));
    }
}

impl PageHost for FakePage {
    fn has_element(&self, id: &str) -> bool {
        self.elements.borrow().iter().any(|tag| tag.id == id)
    }

    fn append_script(&self, tag: ScriptTag, on_settled: ScriptCallback) {
        self.elements.borrow_mut().push(tag);
        self.appended.set(self.appended.get() + 1);

        match self.mode.get() {
            LoadMode::Auto => {
                self.install();
                on_settled(ScriptLoad::Loaded);
            }
            LoadMode::Manual => self.pending.borrow_mut().push(on_settled),
            LoadMode::Fail => on_settled(ScriptLoad::Failed),
            LoadMode::NoSdk => on_settled(ScriptLoad::Loaded),
        }
    }

    fn remove_element(&self, id: &str) {
        self.elements.borrow_mut().retain(|tag| tag.id != id);
    }

    fn publish_config(&self, config: &VendorConfig) {
        self.published.borrow_mut().push(config.clone());
    }

    fn vendor(&self) -> Option<Rc<dyn VendorSdk>> {
        self.installed
            .borrow()
            .as_ref()
            .map(|sdk| Rc::clone(sdk) as Rc<dyn VendorSdk>)
    }

    fn delay(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        tokio::time::sleep(duration).boxed_local()
    }
}

// ============================================================================
// Fake vendor SDK
// ============================================================================

/// Scripted terminal callback invocation.
#[derive(Debug, Clone)]
pub enum Response {
    /// `(data, error)`.
    Apply(Option<Value>, Option<CallbackStatus>),
    /// `(token, data, error)`.
    Checkout(Option<String>, Option<Value>, Option<CallbackStatus>),
    /// Drop the request without ever calling back.
    Drop,
}

/// Recorded `present` call.
pub struct Presented {
    pub flow: FlowKind,
    pub options: MerchantOptions,
    pub callback: TerminalCallback,
    pub on_data_update: Option<DataUpdateAdapter>,
    pub on_confirm: Option<ca_payments::ValueHook>,
}

pub struct FakeVendor {
    init_calls: RefCell<Vec<VendorConfig>>,
    init_error: RefCell<Option<String>>,
    responses: RefCell<VecDeque<Response>>,
    presented: RefCell<Vec<Presented>>,
}

impl FakeVendor {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            init_calls: RefCell::new(Vec::new()),
            init_error: RefCell::new(None),
            responses: RefCell::new(VecDeque::new()),
            presented: RefCell::new(Vec::new()),
        })
    }

    /// Queue the callback invocation for the next `present`.
    pub fn respond(&self, response: Response) {
        self.responses.borrow_mut().push_back(response);
    }

    pub fn fail_init(&self, message: &str) {
        *self.init_error.borrow_mut() = Some(message.to_string());
    }

    pub fn init_count(&self) -> usize {
        self.init_calls.borrow().len()
    }

    pub fn init_calls(&self) -> Vec<VendorConfig> {
        self.init_calls.borrow().clone()
    }

    pub fn present_count(&self) -> usize {
        self.presented.borrow().len()
    }

    pub fn flows(&self) -> Vec<FlowKind> {
        self.presented.borrow().iter().map(|p| p.flow).collect()
    }

    pub fn options(&self, index: usize) -> MerchantOptions {
        self.presented.borrow()[index].options.clone()
    }

    pub fn callback(&self, index: usize) -> TerminalCallback {
        self.presented.borrow()[index].callback.clone()
    }

    pub fn data_update(&self, index: usize) -> Option<DataUpdateAdapter> {
        self.presented.borrow()[index].on_data_update.clone()
    }

    pub fn confirm(&self, index: usize, payload: Value) {
        let hook = self.presented.borrow()[index].on_confirm.clone();
        if let Some(hook) = hook {
            hook(payload);
        }
    }
}

#[async_trait(?Send)]
impl VendorSdk for FakeVendor {
    async fn init(&self, config: &VendorConfig) -> ca_payments_core::Result<()> {
        self.init_calls.borrow_mut().push(config.clone());
        if let Some(message) = self.init_error.borrow().clone() {
            return Err(PaymentsError::VendorInit(message));
        }
        // The real SDK fires `onLoaded` from the published config.
        config.notify_loaded();
        Ok(())
    }

    fn present(&self, request: PresentRequest) {
        let response = self.responses.borrow_mut().pop_front();
        match response {
            Some(Response::Apply(data, error)) => request.callback.call(data, error),
            Some(Response::Checkout(token, data, error)) => {
                request.callback.call_with_token(token, data, error);
            }
            Some(Response::Drop) => return,
            None => {}
        }

        self.presented.borrow_mut().push(Presented {
            flow: request.flow,
            options: request.options,
            callback: request.callback,
            on_data_update: request.on_data_update,
            on_confirm: request.on_confirm,
        });
    }
}

// ============================================================================
// Helpers
// ============================================================================

pub fn session(env: EnvironmentName, api_key: &str) -> SessionConfig {
    SessionConfig::new(Environment::new(api_key).with_name(env))
}

pub fn payments(page: &Rc<FakePage>) -> Payments {
    Payments::new(Rc::clone(page) as Rc<dyn PageHost>)
}

pub fn payments_with(page: &Rc<FakePage>, options: PaymentsOptions) -> Payments {
    Payments::with_options(Rc::clone(page) as Rc<dyn PageHost>, options)
}

/// A hook that counts its invocations.
pub fn counter() -> (Rc<Cell<usize>>, impl Fn() + 'static) {
    let count = Rc::new(Cell::new(0));
    let hook_count = Rc::clone(&count);
    (count, move || hook_count.set(hook_count.get() + 1))
}

/// Yield until `condition` holds.
pub async fn until(condition: impl Fn() -> bool) {
    while !condition() {
        tokio::task::yield_now().await;
    }
}

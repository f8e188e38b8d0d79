//! The page the bridge runs in.
//!
//! [`PageHost`] is the only way the bridge touches the document, the global
//! config slot and timers. The browser implementation lives in
//! `ca-payments-web`; tests use an in-memory page.

use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;

use crate::vendor::{VendorConfig, VendorSdk};

/// Fixed id of the SDK script element. At most one element with this id
/// exists in the document.
pub const SCRIPT_ELEMENT_ID: &str = "chargeafter-checkout-finance-sdk";

/// A `<script>` element to append to the document body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptTag {
    /// Element id.
    pub id: String,
    /// Script source, including the cache-busting query.
    pub src: String,
    /// Load without blocking the parser.
    pub async_load: bool,
}

/// How a script element settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptLoad {
    /// The `load` event fired.
    Loaded,
    /// The `error` event fired (network error, blocked resource).
    Failed,
}

/// Called once when a script element settles.
pub type ScriptCallback = Box<dyn FnOnce(ScriptLoad)>;

/// Document, global scope and timer access for one page.
pub trait PageHost {
    /// Whether an element with `id` exists in the document.
    fn has_element(&self, id: &str) -> bool;

    /// Append `tag` to the document body.
    ///
    /// Implementations call `on_settled` at most once, after the element's
    /// `load` or `error` event.
    fn append_script(&self, tag: ScriptTag, on_settled: ScriptCallback);

    /// Remove the element with `id`, if present.
    fn remove_element(&self, id: &str);

    /// Publish `config` on the process-wide slot the SDK reads while it
    /// bootstraps.
    fn publish_config(&self, config: &VendorConfig);

    /// The SDK object, once the script has populated it.
    fn vendor(&self) -> Option<Rc<dyn VendorSdk>>;

    /// Resolve after `duration`.
    fn delay(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
}

//! SDK initialization coordinator.
//!
//! Turns the one-shot script load into a reusable handle. The coordinator is
//! single-flight: while a load is in progress every caller attaches to the
//! same shared future, so the page never holds more than one SDK script.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::time::Duration;

use ca_payments_core::{EnvironmentName, PaymentsError, Result};
use futures::channel::oneshot;
use futures::future::{self, Either, FutureExt, LocalBoxFuture, Shared};

use crate::host::{PageHost, ScriptLoad, SCRIPT_ELEMENT_ID};
use crate::loader;
use crate::options::PaymentsOptions;
use crate::vendor::{VendorConfig, VendorSdk};

/// Shared handle to the initialized SDK.
pub type VendorHandle = Rc<dyn VendorSdk>;

type InitFuture = Shared<LocalBoxFuture<'static, Result<VendorHandle>>>;

enum InitState {
    Idle,
    Loading(InitFuture),
    Ready(VendorHandle),
}

enum Step {
    Reuse(VendorHandle),
    Attach(InitFuture),
    Load,
}

/// Produces the SDK handle, injecting the script at most once per page.
pub struct Coordinator {
    host: Rc<dyn PageHost>,
    options: PaymentsOptions,
    state: Rc<RefCell<InitState>>,
}

impl Coordinator {
    /// Create a coordinator for `host`.
    #[must_use]
    pub fn new(host: Rc<dyn PageHost>, options: PaymentsOptions) -> Self {
        Self {
            host,
            options,
            state: Rc::new(RefCell::new(InitState::Idle)),
        }
    }

    /// Runtime options.
    #[must_use]
    pub fn options(&self) -> &PaymentsOptions {
        &self.options
    }

    /// Whether a handle is available without loading.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(*self.state.borrow(), InitState::Ready(_))
    }

    /// Whether a script load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(*self.state.borrow(), InitState::Loading(_))
    }

    /// Return a ready SDK handle.
    ///
    /// If the script is present and the SDK is ready, `config.on_loaded` is
    /// called right away and the existing handle is returned. Otherwise the
    /// config is published, the script for `env` is injected (unless a late
    /// script already installed the SDK object), and the SDK's own `init`
    /// runs before the handle is returned. Callers that join an
    /// in-flight load get their `on_loaded` hook called once it completes.
    ///
    /// # Errors
    ///
    /// Returns an error if the script fails or times out, if it does not
    /// expose the SDK, or if the SDK's `init` fails.
    pub async fn initialize(&self, config: VendorConfig, env: EnvironmentName) -> Result<VendorHandle> {
        match self.next_step() {
            Step::Reuse(handle) => {
                tracing::debug!(env = %env, "payments SDK already loaded; reusing handle");
                config.notify_loaded();
                Ok(handle)
            }
            Step::Attach(pending) => {
                tracing::debug!(env = %env, "payments SDK load in flight; waiting on it");
                let handle = pending.await?;
                config.notify_loaded();
                Ok(handle)
            }
            Step::Load => {
                let pending = self.start_load(config, env);
                pending.await
            }
        }
    }

    fn next_step(&self) -> Step {
        let present = self.host.has_element(SCRIPT_ELEMENT_ID);

        match &*self.state.borrow() {
            InitState::Ready(handle) if present => return Step::Reuse(Rc::clone(handle)),
            InitState::Loading(pending) => return Step::Attach(pending.clone()),
            InitState::Idle if present => {}
            InitState::Ready(_) | InitState::Idle => return Step::Load,
        }

        // Script present but never loaded by this coordinator.
        if let Some(handle) = self.host.vendor() {
            *self.state.borrow_mut() = InitState::Ready(Rc::clone(&handle));
            return Step::Reuse(handle);
        }

        tracing::debug!("stale payments SDK script without SDK object; replacing it");
        self.host.remove_element(SCRIPT_ELEMENT_ID);
        Step::Load
    }

    fn start_load(&self, config: VendorConfig, env: EnvironmentName) -> InitFuture {
        let url = self.options.script_url(env).to_string();
        tracing::debug!(env = %env, url = %url, "loading payments SDK");

        self.host.publish_config(&config);

        let pending = load(
            Rc::clone(&self.host),
            url,
            config,
            self.options.load_timeout(),
            Rc::downgrade(&self.state),
        )
        .boxed_local()
        .shared();

        *self.state.borrow_mut() = InitState::Loading(pending.clone());
        pending
    }
}

async fn load(
    host: Rc<dyn PageHost>,
    url: String,
    config: VendorConfig,
    timeout: Option<Duration>,
    state: Weak<RefCell<InitState>>,
) -> Result<VendorHandle> {
    let result = load_and_init(host.as_ref(), &url, &config, timeout).await;

    match &result {
        Ok(_) => tracing::debug!(url = %url, "payments SDK ready"),
        Err(err) => {
            tracing::error!(url = %url, error = %err, "payments SDK failed to initialize");
            host.remove_element(SCRIPT_ELEMENT_ID);
        }
    }

    if let Some(state) = state.upgrade() {
        *state.borrow_mut() = match &result {
            Ok(handle) => InitState::Ready(Rc::clone(handle)),
            Err(_) => InitState::Idle,
        };
    }

    result
}

async fn load_and_init(
    host: &dyn PageHost,
    url: &str,
    config: &VendorConfig,
    timeout: Option<Duration>,
) -> Result<VendorHandle> {
    // A script abandoned by an earlier timeout may still have run after its
    // element was removed. Its SDK object is usable as is.
    if let Some(vendor) = host.vendor() {
        tracing::debug!(url = %url, "payments SDK object already installed; skipping injection");
        vendor.init(config).await?;
        return Ok(vendor);
    }

    let (tx, rx) = oneshot::channel();
    let src = loader::inject_script(host, url, move |outcome| {
        let _ = tx.send(outcome);
    });

    let outcome = match timeout {
        Some(limit) => match future::select(rx, host.delay(limit)).await {
            Either::Left((outcome, _)) => outcome,
            Either::Right(((), _)) => {
                return Err(PaymentsError::ScriptLoadTimeout {
                    url: src,
                    timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                });
            }
        },
        None => rx.await,
    };

    match outcome {
        Ok(ScriptLoad::Loaded) => {}
        // A host that drops the callback without calling it never loaded the script.
        Ok(ScriptLoad::Failed) | Err(oneshot::Canceled) => {
            return Err(PaymentsError::ScriptLoad { url: src });
        }
    }

    let vendor = host.vendor().ok_or(PaymentsError::NotInitialized)?;
    vendor.init(config).await?;
    Ok(vendor)
}

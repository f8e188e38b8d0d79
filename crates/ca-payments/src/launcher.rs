//! Flow launcher.
//!
//! Runs exactly one flow: builds the option bag, obtains the SDK handle,
//! presents the flow and waits for the terminal callback.

use std::fmt;
use std::rc::Rc;

use ca_payments_core::{CartDetails, ConsumerDetails, FlowId, Result, SessionConfig};
use futures::channel::mpsc;
use futures::stream::FuturesUnordered;
use futures::StreamExt;

use crate::callbacks::{DataUpdateAdapter, FlowOutcome, PendingUpdate, TerminalCallback};
use crate::completion::{self, Completion};
use crate::coordinator::Coordinator;
use crate::hooks::{FlowHooks, OnDataUpdate};
use crate::vendor::{FlowKind, MerchantOptions, PresentRequest, VendorConfig};

/// Everything one flow invocation needs.
#[derive(Clone)]
pub struct FlowRequest {
    /// Session config.
    pub config: SessionConfig,
    /// Flow to run.
    pub kind: FlowKind,
    /// ISO 4217 currency.
    pub currency: Option<String>,
    /// Consumer pre-fill.
    pub consumer_details: Option<ConsumerDetails>,
    /// Cart (checkout only).
    pub cart_details: Option<CartDetails>,
    /// Prequalification token to resume from (checkout only).
    pub application_id: Option<String>,
    /// Lender/offer filter.
    pub filter: Option<serde_json::Value>,
    /// Point-of-sale id.
    pub pos_id: Option<String>,
    /// Point-of-sale type.
    pub pos_type: Option<String>,
    /// Promotion code.
    pub promo_code: Option<String>,
    /// Lifecycle hooks.
    pub hooks: FlowHooks,
    /// Data-update hook (checkout only).
    pub on_data_update: Option<OnDataUpdate>,
}

impl FlowRequest {
    /// A request with no optional fields set.
    #[must_use]
    pub fn new(config: SessionConfig, kind: FlowKind) -> Self {
        Self {
            config,
            kind,
            currency: None,
            consumer_details: None,
            cart_details: None,
            application_id: None,
            filter: None,
            pos_id: None,
            pos_type: None,
            promo_code: None,
            hooks: FlowHooks::default(),
            on_data_update: None,
        }
    }

    /// Option bag passed to `present`.
    ///
    /// Cart details and the resume token are only included for checkout.
    #[must_use]
    pub fn merchant_options(&self) -> MerchantOptions {
        let mut options = MerchantOptions {
            consumer_details: self.consumer_details.clone(),
            channel: self.config.channel,
            preferences: self.config.preferences.clone(),
            filter: self.filter.clone(),
            currency: self.currency.clone(),
            browser_session_id: self.config.env.browser_session_id.clone(),
            pos_id: self.pos_id.clone(),
            pos_type: self.pos_type.clone(),
            promo_code: self.promo_code.clone(),
            ..MerchantOptions::default()
        };

        if self.kind == FlowKind::Checkout {
            options.cart_details = self.cart_details.clone();
            options.application_id = self.application_id.clone();
        }

        options
    }
}

impl fmt::Debug for FlowRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowRequest")
            .field("kind", &self.kind)
            .field("env", &self.config.env.name)
            .field("currency", &self.currency)
            .field("application_id", &self.application_id)
            .field("hooks", &self.hooks)
            .field("on_data_update", &self.on_data_update.is_some())
            .finish_non_exhaustive()
    }
}

/// Launches flows against the shared coordinator.
#[derive(Clone)]
pub struct FlowLauncher {
    coordinator: Rc<Coordinator>,
}

impl FlowLauncher {
    /// Create a launcher over `coordinator`.
    #[must_use]
    pub fn new(coordinator: Rc<Coordinator>) -> Self {
        Self { coordinator }
    }

    /// The coordinator this launcher uses.
    #[must_use]
    pub fn coordinator(&self) -> &Coordinator {
        &self.coordinator
    }

    /// Run one flow to completion.
    ///
    /// Resolves once the SDK calls the terminal callback. If the consumer
    /// abandons the modal and the SDK never calls back, the future stays
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns the SDK bootstrap error, the vendor-reported flow error, or
    /// [`ca_payments_core::PaymentsError::Abandoned`] if the SDK drops the
    /// callback.
    pub async fn launch(&self, request: FlowRequest) -> Result<FlowOutcome> {
        let flow_id = FlowId::generate();
        let kind = request.kind;
        let options = request.merchant_options();

        let (completer, completion) = completion::channel();
        let (pending_tx, pending_rx) = mpsc::unbounded();

        let on_data_update = match (kind, request.on_data_update) {
            (FlowKind::Checkout, Some(hook)) => Some(DataUpdateAdapter::new(flow_id, hook, pending_tx)),
            _ => None,
        };

        let vendor_config =
            VendorConfig::from_session(&request.config, request.hooks.on_modal_open.clone());
        let vendor = self
            .coordinator
            .initialize(vendor_config, request.config.env.name)
            .await?;

        tracing::info!(
            flow = %kind,
            flow_id = %flow_id,
            resume_token = ?options.application_id,
            "calling payments SDK"
        );

        vendor.present(PresentRequest {
            flow: kind,
            options,
            on_data_update,
            on_confirm: request.hooks.on_confirm,
            on_approval_status_change: request.hooks.on_approval_status_change,
            callback: TerminalCallback::new(kind, flow_id, completer),
        });

        settle(completion, pending_rx).await
    }
}

/// Wait for the terminal callback while driving pending data-update replies.
async fn settle(
    mut completion: Completion<FlowOutcome>,
    mut pending_rx: mpsc::UnboundedReceiver<PendingUpdate>,
) -> Result<FlowOutcome> {
    let mut in_progress = FuturesUnordered::new();

    loop {
        futures::select! {
            outcome = completion => return outcome,
            update = pending_rx.select_next_some() => in_progress.push(update),
            () = in_progress.select_next_some() => {}
        }
    }
}

//! Public entry points: `prequalify`, `checkout` and `identify`.

use std::fmt;
use std::rc::Rc;

use ca_payments_core::{
    CartDetails, CheckoutData, CheckoutResult, ConsumerDetails, FromPayload, IdentifyResult,
    PaymentsError, PrequalifyResult, Result, SessionConfig,
};

use crate::coordinator::Coordinator;
use crate::hooks::{hook, value_hook, FlowHooks, OnDataUpdate};
use crate::host::PageHost;
use crate::launcher::{FlowLauncher, FlowRequest};
use crate::options::PaymentsOptions;
use crate::vendor::FlowKind;

/// Props for [`Payments::prequalify`] and [`Payments::identify`].
#[derive(Clone)]
pub struct PrequalifyProps {
    /// Session config.
    pub config: SessionConfig,
    /// ISO 4217 currency.
    pub currency: Option<String>,
    /// Consumer pre-fill.
    pub consumer_details: Option<ConsumerDetails>,
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
}

/// Props for [`Payments::identify`].
pub type IdentifyProps = PrequalifyProps;

impl PrequalifyProps {
    /// Props with only the session config set.
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            currency: None,
            consumer_details: None,
            filter: None,
            pos_id: None,
            pos_type: None,
            promo_code: None,
            hooks: FlowHooks::default(),
        }
    }

    /// Set the currency.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    /// Set the consumer pre-fill.
    #[must_use]
    pub fn with_consumer_details(mut self, consumer_details: ConsumerDetails) -> Self {
        self.consumer_details = Some(consumer_details);
        self
    }

    /// Set the lender/offer filter.
    #[must_use]
    pub fn with_filter(mut self, filter: serde_json::Value) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the point-of-sale id and type.
    #[must_use]
    pub fn with_pos(mut self, pos_id: impl Into<String>, pos_type: impl Into<String>) -> Self {
        self.pos_id = Some(pos_id.into());
        self.pos_type = Some(pos_type.into());
        self
    }

    /// Set the promotion code.
    #[must_use]
    pub fn with_promo_code(mut self, promo_code: impl Into<String>) -> Self {
        self.promo_code = Some(promo_code.into());
        self
    }

    /// Fire `f` just before the modal opens.
    #[must_use]
    pub fn on_modal_open(mut self, f: impl Fn() + 'static) -> Self {
        self.hooks.on_modal_open = Some(hook(f));
        self
    }

    /// Fire `f` when the consumer confirms the loan.
    #[must_use]
    pub fn on_confirm(mut self, f: impl Fn(serde_json::Value) + 'static) -> Self {
        self.hooks.on_confirm = Some(value_hook(f));
        self
    }

    /// Fire `f` when the approval status changes.
    #[must_use]
    pub fn on_approval_status_change(mut self, f: impl Fn(serde_json::Value) + 'static) -> Self {
        self.hooks.on_approval_status_change = Some(value_hook(f));
        self
    }

    fn into_request(self, kind: FlowKind) -> FlowRequest {
        FlowRequest {
            currency: self.currency,
            consumer_details: self.consumer_details,
            filter: self.filter,
            pos_id: self.pos_id,
            pos_type: self.pos_type,
            promo_code: self.promo_code,
            hooks: self.hooks,
            ..FlowRequest::new(self.config, kind)
        }
    }
}

impl fmt::Debug for PrequalifyProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrequalifyProps")
            .field("env", &self.config.env.name)
            .field("currency", &self.currency)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// Props for [`Payments::checkout`].
#[derive(Clone)]
pub struct CheckoutProps {
    /// Fields shared with prequalification.
    pub base: PrequalifyProps,
    /// Cart to finance.
    pub cart_details: CartDetails,
    /// Prequalification token to resume from. The cart total must not
    /// exceed the prequalified amount; the widget enforces this.
    pub application_id: Option<String>,
    /// Data-update hook.
    pub on_data_update: Option<OnDataUpdate>,
}

impl CheckoutProps {
    /// Props for financing `cart_details`.
    #[must_use]
    pub fn new(config: SessionConfig, cart_details: CartDetails) -> Self {
        Self {
            base: PrequalifyProps::new(config),
            cart_details,
            application_id: None,
            on_data_update: None,
        }
    }

    /// Resume from a prequalification token.
    #[must_use]
    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }

    /// Set the data-update hook.
    #[must_use]
    pub fn on_data_update(mut self, hook: OnDataUpdate) -> Self {
        self.on_data_update = Some(hook);
        self
    }

    /// Adjust the shared fields.
    #[must_use]
    pub fn map_base(mut self, f: impl FnOnce(PrequalifyProps) -> PrequalifyProps) -> Self {
        self.base = f(self.base);
        self
    }

    fn into_request(self) -> FlowRequest {
        FlowRequest {
            cart_details: Some(self.cart_details),
            application_id: self.application_id,
            on_data_update: self.on_data_update,
            ..self.base.into_request(FlowKind::Checkout)
        }
    }
}

impl fmt::Debug for CheckoutProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutProps")
            .field("base", &self.base)
            .field("cart_details", &self.cart_details)
            .field("application_id", &self.application_id)
            .field("on_data_update", &self.on_data_update.is_some())
            .finish()
    }
}

/// Payments SDK bridge for one page.
///
/// Construct once per page and share it; every flow goes through the same
/// coordinator, so the SDK script is injected at most once.
#[derive(Clone)]
pub struct Payments {
    launcher: FlowLauncher,
}

impl Payments {
    /// Create a bridge with default options.
    #[must_use]
    pub fn new(host: Rc<dyn PageHost>) -> Self {
        Self::with_options(host, PaymentsOptions::default())
    }

    /// Create a bridge with custom options.
    #[must_use]
    pub fn with_options(host: Rc<dyn PageHost>, options: PaymentsOptions) -> Self {
        let coordinator = Rc::new(Coordinator::new(host, options));
        Self {
            launcher: FlowLauncher::new(coordinator),
        }
    }

    /// The underlying launcher.
    #[must_use]
    pub fn launcher(&self) -> &FlowLauncher {
        &self.launcher
    }

    /// Run the prequalification (apply) flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, the SDK cannot be loaded,
    /// or the widget reports an error. A success payload is always decoded;
    /// fields with an unexpected shape are left at their defaults.
    pub async fn prequalify(&self, props: PrequalifyProps) -> Result<PrequalifyResult> {
        validate(&props.config)?;
        let outcome = self.launcher.launch(props.into_request(FlowKind::Apply)).await?;
        Ok(decode(outcome.data))
    }

    /// Run the checkout flow.
    ///
    /// The result merges the widget's completion data with the post-sale
    /// token.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, the SDK cannot be loaded,
    /// or the widget reports an error. A success payload is always decoded;
    /// fields with an unexpected shape are left at their defaults.
    pub async fn checkout(&self, props: CheckoutProps) -> Result<CheckoutResult> {
        validate(&props.base.config)?;
        let outcome = self.launcher.launch(props.into_request()).await?;
        let data: CheckoutData = decode(outcome.data);
        Ok(CheckoutResult {
            token: outcome.token,
            data,
        })
    }

    /// Run the identify flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, the SDK cannot be loaded,
    /// or the widget reports an error. A success payload is always decoded;
    /// fields with an unexpected shape are left at their defaults.
    pub async fn identify(&self, props: IdentifyProps) -> Result<IdentifyResult> {
        validate(&props.config)?;
        let outcome = self
            .launcher
            .launch(props.into_request(FlowKind::Identify))
            .await?;
        Ok(decode(outcome.data))
    }
}

fn validate(config: &SessionConfig) -> Result<()> {
    if config.env.api_key.trim().is_empty() {
        return Err(PaymentsError::Configuration("api key is required".into()));
    }
    Ok(())
}

fn decode<T: FromPayload>(data: Option<serde_json::Value>) -> T {
    if let Some(value) = data.as_ref().filter(|value| !value.is_object() && !value.is_null()) {
        tracing::warn!(payload = %value, "flow result is not an object; keeping it under `data`");
    }
    T::from_payload(data)
}

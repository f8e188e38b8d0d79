//! Script loading and single-flight initialization.

mod common;

use std::time::Duration;

use ca_payments::{PaymentsOptions, PrequalifyProps};
use ca_payments_core::{EnvironmentName, PaymentsError};
use common::{counter, payments, payments_with, session, until, FakePage, LoadMode, Response};
use serde_json::json;

fn approved() -> Response {
    Response::Apply(Some(json!({ "approved": true })), None)
}

// ============================================================================
// Injection
// ============================================================================

#[tokio::test]
async fn test_injects_script_for_each_environment() {
    for env in EnvironmentName::ALL {
        let page = FakePage::new(LoadMode::Auto);
        let sdk = page.sdk();
        sdk.respond(approved());
        sdk.respond(approved());

        let payments = payments(&page);
        for _ in 0..2 {
            payments
                .prequalify(PrequalifyProps::new(session(env, "k1")))
                .await
                .unwrap();
        }

        assert_eq!(page.appended(), 1, "second flow on {env} reinjected the script");
        assert_eq!(sdk.init_count(), 1);
        assert_eq!(sdk.present_count(), 2);
        let scripts = page.scripts();
        assert_eq!(scripts.len(), 1);
        assert_eq!(scripts[0].id, "chargeafter-checkout-finance-sdk");
        assert!(scripts[0].async_load);
        assert!(
            scripts[0].src.starts_with(&format!("{}?t=", env.script_url())),
            "unexpected src {} for {env}",
            scripts[0].src
        );
    }
}

#[tokio::test]
async fn test_publishes_config_before_loading() {
    let page = FakePage::new(LoadMode::Auto);
    page.sdk().respond(approved());

    let mut config = session(EnvironmentName::Sandbox, "k1").with_store_id("store-7");
    config.env.delegated_merchant_id = Some("dm-1".into());

    payments(&page)
        .prequalify(PrequalifyProps::new(config))
        .await
        .unwrap();

    let published = page.published();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].api_key, "k1");
    assert_eq!(published[0].store_id.as_deref(), Some("store-7"));
    assert_eq!(published[0].delegated_merchant_id.as_deref(), Some("dm-1"));

    let inits = page.sdk().init_calls();
    assert_eq!(inits.len(), 1);
    assert_eq!(inits[0].api_key, "k1");
}

#[tokio::test]
async fn test_script_url_override() {
    let page = FakePage::new(LoadMode::Auto);
    page.sdk().respond(approved());
    let options = PaymentsOptions::default()
        .with_script_url(EnvironmentName::Qa, "https://cdn.test/sdk.js?v=2");

    payments_with(&page, options)
        .prequalify(PrequalifyProps::new(session(EnvironmentName::Qa, "k1")))
        .await
        .unwrap();

    assert!(page.scripts()[0].src.starts_with("https://cdn.test/sdk.js?v=2&t="));
}

// ============================================================================
// Reuse
// ============================================================================

#[tokio::test]
async fn test_second_flow_reuses_script() {
    let page = FakePage::new(LoadMode::Auto);
    let sdk = page.sdk();
    sdk.respond(approved());
    sdk.respond(approved());

    let payments = payments(&page);
    let (opened, on_open) = counter();
    let props = PrequalifyProps::new(session(EnvironmentName::Production, "k1"))
        .on_modal_open(on_open);

    payments.prequalify(props.clone()).await.unwrap();
    assert_eq!(opened.get(), 1);

    payments.prequalify(props).await.unwrap();

    assert_eq!(page.appended(), 1);
    assert_eq!(page.script_count(), 1);
    assert_eq!(sdk.init_count(), 1);
    assert_eq!(page.published().len(), 1);
    assert_eq!(opened.get(), 2, "fast path fires the modal hook");
    assert!(payments.launcher().coordinator().is_ready());
}

#[tokio::test]
async fn test_adopts_sdk_already_on_page() {
    let page = FakePage::preloaded();
    let sdk = page.sdk();
    sdk.respond(approved());

    let (opened, on_open) = counter();
    payments(&page)
        .prequalify(
            PrequalifyProps::new(session(EnvironmentName::Production, "k1"))
                .on_modal_open(on_open),
        )
        .await
        .unwrap();

    assert_eq!(page.appended(), 0);
    assert_eq!(sdk.init_count(), 0);
    assert_eq!(sdk.present_count(), 1);
    assert_eq!(opened.get(), 1);
}

#[tokio::test]
async fn test_concurrent_first_calls_share_one_load() {
    let page = FakePage::new(LoadMode::Manual);
    let sdk = page.sdk();
    sdk.respond(approved());
    sdk.respond(approved());

    let payments = payments(&page);
    let (opened, on_open) = counter();
    let props = PrequalifyProps::new(session(EnvironmentName::Sandbox, "k1"))
        .on_modal_open(on_open);

    let (first, second, ()) = futures::join!(
        payments.prequalify(props.clone()),
        payments.prequalify(props),
        async {
            until(|| page.pending_loads() == 1).await;
            assert!(payments.launcher().coordinator().is_loading());
            page.fire_load();
        }
    );

    first.unwrap();
    second.unwrap();
    assert_eq!(page.appended(), 1);
    assert_eq!(page.script_count(), 1);
    assert_eq!(sdk.init_count(), 1);
    assert_eq!(sdk.present_count(), 2);
    assert_eq!(opened.get(), 2, "each caller's modal hook fires once");
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_script_error_rejects_and_allows_retry() {
    let page = FakePage::new(LoadMode::Fail);
    let sdk = page.sdk();
    let payments = payments(&page);
    let props = PrequalifyProps::new(session(EnvironmentName::Develop, "k1"));

    let err = payments.prequalify(props.clone()).await.unwrap_err();
    match err {
        PaymentsError::ScriptLoad { url } => {
            assert!(url.starts_with(EnvironmentName::Develop.script_url()));
        }
        other => panic!("expected ScriptLoad, got {other:?}"),
    }
    assert_eq!(page.script_count(), 0);
    assert!(!payments.launcher().coordinator().is_loading());

    page.set_mode(LoadMode::Auto);
    sdk.respond(approved());
    payments.prequalify(props).await.unwrap();

    assert_eq!(page.appended(), 2);
    assert_eq!(page.script_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_script_load_times_out() {
    let page = FakePage::new(LoadMode::Manual);
    let options = PaymentsOptions::default().with_load_timeout(Duration::from_secs(5));

    let err = payments_with(&page, options)
        .prequalify(PrequalifyProps::new(session(EnvironmentName::Qa, "k1")))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PaymentsError::ScriptLoadTimeout { timeout_ms: 5000, .. }
    ));
    assert_eq!(page.script_count(), 0);
    assert_eq!(page.sdk().present_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_late_script_after_timeout_is_not_reinjected() {
    let page = FakePage::new(LoadMode::Manual);
    let sdk = page.sdk();
    let options = PaymentsOptions::default().with_load_timeout(Duration::from_secs(5));
    let payments = payments_with(&page, options);
    let props = PrequalifyProps::new(session(EnvironmentName::Qa, "k1"));

    let err = payments.prequalify(props.clone()).await.unwrap_err();
    assert!(matches!(err, PaymentsError::ScriptLoadTimeout { .. }));
    assert_eq!(page.script_count(), 0);

    // The removed script finishes downloading and installs the SDK anyway.
    page.fire_load();
    sdk.respond(approved());
    payments.prequalify(props).await.unwrap();

    assert_eq!(page.appended(), 1);
    assert_eq!(sdk.init_count(), 1);
    assert_eq!(sdk.present_count(), 1);
    assert!(payments.launcher().coordinator().is_ready());
}

#[tokio::test]
async fn test_missing_sdk_object_is_not_initialized() {
    let page = FakePage::new(LoadMode::NoSdk);

    let err = payments(&page)
        .prequalify(PrequalifyProps::new(session(EnvironmentName::Production, "k1")))
        .await
        .unwrap_err();

    assert_eq!(err, PaymentsError::NotInitialized);
    assert_eq!(err.to_string(), "ChargeAfter not initialized");
    assert_eq!(page.script_count(), 0);
}

#[tokio::test]
async fn test_vendor_init_failure() {
    let page = FakePage::new(LoadMode::Auto);
    page.sdk().fail_init("bad api key");

    let err = payments(&page)
        .prequalify(PrequalifyProps::new(session(EnvironmentName::Production, "k1")))
        .await
        .unwrap_err();

    assert_eq!(err, PaymentsError::VendorInit("bad api key".into()));
    assert_eq!(page.sdk().present_count(), 0);
}

#[tokio::test]
async fn test_blank_api_key_never_touches_page() {
    let page = FakePage::new(LoadMode::Auto);

    let err = payments(&page)
        .prequalify(PrequalifyProps::new(session(EnvironmentName::Production, "")))
        .await
        .unwrap_err();

    assert!(matches!(err, PaymentsError::Configuration(_)));
    assert_eq!(page.appended(), 0);
}

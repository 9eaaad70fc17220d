//! End-to-end tests driving the engine the way a test harness would:
//! register expectations, fire immediate and deferred invocations, flush,
//! and verify.

use ersatz::{
    Ersatz, ErsatzConfig, ErsatzError, FlushMode, RequestDescriptor, ResponseDescriptor,
};
use serde_json::json;

fn fixture_a() -> (RequestDescriptor, ResponseDescriptor) {
    (
        RequestDescriptor::get("/a").with_header("accept", "application/hal+json"),
        ResponseDescriptor::ok()
            .with_header("content-type", "application/json")
            .with_body(json!({"name": "a"})),
    )
}

fn fixture_x() -> (RequestDescriptor, ResponseDescriptor) {
    (
        RequestDescriptor::post("/x")
            .with_header("accept", "application/hal+json")
            .with_header("x-foo", "bar")
            .with_body(json!({"name": "x"})),
        ResponseDescriptor::ok()
            .with_header("content-type", "application/hal+json")
            .with_body(json!({"name": "x"})),
    )
}

#[test]
fn matched_invocations_return_their_responses() {
    let ersatz = Ersatz::new();
    let (req_a, res_a) = fixture_a();
    let (req_x, res_x) = fixture_x();
    ersatz.expect(req_a.clone(), res_a.clone()).unwrap();
    ersatz.expect(req_x.clone(), res_x.clone()).unwrap();

    assert_eq!(ersatz.invoke(&req_a).unwrap(), res_a);
    assert_eq!(ersatz.invoke(&req_x).unwrap(), res_x);
    ersatz.verify().unwrap();
}

#[test]
fn wrong_method_surfaces_the_full_diagnostic() {
    let ersatz = Ersatz::new();
    let (req_x, res_x) = fixture_x();
    ersatz.expect(req_x.clone(), res_x).unwrap();

    let mut wrong = req_x;
    wrong.method = Some("GET".into());
    let err = ersatz.invoke(&wrong).unwrap_err();
    assert!(err
        .to_string()
        .contains("Expected request for /x with method POST, but got method GET"));
}

#[test]
fn strict_order_fails_against_the_positional_expectation() {
    let ersatz = Ersatz::new();
    let (req_a, res_a) = fixture_a();
    let (req_x, res_x) = fixture_x();
    ersatz.expect(req_a, res_a).unwrap();
    ersatz.expect(req_x.clone(), res_x).unwrap();

    let err = ersatz.invoke(&req_x).unwrap_err();
    assert!(err
        .to_string()
        .contains("Expected request for /a, but got /x"));
}

#[test]
fn non_strict_order_accepts_any_registered_order() {
    let ersatz = Ersatz::with_config(ErsatzConfig::default().strict_order(false));
    let (req_a, res_a) = fixture_a();
    let (req_x, res_x) = fixture_x();
    ersatz.expect(req_a.clone(), res_a.clone()).unwrap();
    ersatz.expect(req_x.clone(), res_x.clone()).unwrap();

    assert_eq!(ersatz.invoke(&req_x).unwrap(), res_x);
    assert_eq!(ersatz.pending_count(), 1);
    assert_eq!(ersatz.invoke(&req_a).unwrap(), res_a);
    assert_eq!(ersatz.pending_count(), 0);
    ersatz.verify().unwrap();
}

#[test]
fn extra_actual_headers_do_not_fail_the_match() {
    let ersatz = Ersatz::new();
    let (req_x, res_x) = fixture_x();
    ersatz.expect(req_x.clone(), res_x.clone()).unwrap();

    let with_extra = req_x.with_header("x-booze", "baz");
    assert_eq!(ersatz.invoke(&with_extra).unwrap(), res_x);
}

#[test]
fn params_expected_but_none_received() {
    let ersatz = Ersatz::new();
    let req_y = RequestDescriptor::post("/y")
        .with_body(json!({"name": "y"}))
        .with_param("good", "param");
    ersatz.expect(req_y.clone(), ResponseDescriptor::ok()).unwrap();

    // Params live in the actual URL's query string, not the params field.
    let err = ersatz.invoke(&req_y).unwrap_err();
    assert!(err
        .to_string()
        .contains("Expected request for /y with params \"good=param\", but got \"<NONE RECEIVED>\""));
}

#[test]
fn params_match_regardless_of_query_order() {
    let ersatz = Ersatz::new();
    let expected = RequestDescriptor::get("/list")
        .with_param("a", "1")
        .with_param("b", "2");
    ersatz.expect(expected, ResponseDescriptor::ok()).unwrap();

    ersatz
        .invoke(&RequestDescriptor::get("/list?b=2&a=1"))
        .unwrap();
    ersatz.verify().unwrap();
}

#[test]
fn unconsumed_expectations_fail_verification() {
    let ersatz = Ersatz::new();
    let (req_a, res_a) = fixture_a();
    ersatz.expect(req_a, res_a).unwrap();

    let err = ersatz.verify().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("There are 1 pending requests"));
    assert!(message.contains("GET /a"));
}

#[tokio::test]
async fn deferred_invocations_resolve_on_flush() {
    let ersatz = Ersatz::new();
    let (req_a, res_a) = fixture_a();
    let (req_x, res_x) = fixture_x();
    ersatz.expect(req_a.clone(), res_a.clone()).unwrap();
    ersatz.expect(req_x.clone(), res_x.clone()).unwrap();

    let first = ersatz.enqueue(req_a);
    let second = ersatz.enqueue(req_x);

    ersatz.flush().await.unwrap();
    assert_eq!(first.await.unwrap(), res_a);
    assert_eq!(second.await.unwrap(), res_x);
    ersatz.verify().unwrap();
}

#[tokio::test]
async fn double_flush_drains_the_queue_once() {
    let ersatz = Ersatz::new();
    let (req_a, res_a) = fixture_a();
    ersatz.expect(req_a.clone(), res_a).unwrap();
    let pending = ersatz.enqueue(req_a);

    let f1 = ersatz.flush();
    let f2 = ersatz.flush();
    f1.await.unwrap();
    // Same drain: were the queue drained twice, the second invocation would
    // hit an exhausted registry and fail.
    f2.await.unwrap();
    pending.await.unwrap();
    ersatz.verify().unwrap();
}

#[tokio::test]
async fn serial_flush_propagates_the_first_failure_and_skips_the_rest() {
    let ersatz = Ersatz::new();
    let (req_a, res_a) = fixture_a();
    let (req_x, res_x) = fixture_x();
    ersatz.expect(req_a, res_a).unwrap();
    ersatz.expect(req_x.clone(), res_x).unwrap();

    let bad = ersatz.enqueue(RequestDescriptor::get("/nope"));
    let skipped = ersatz.enqueue(req_x);

    let err = ersatz.flush().await.unwrap_err();
    assert!(err
        .to_string()
        .contains("Expected request for /a, but got /nope"));
    assert!(bad.await.is_err());
    assert_eq!(skipped.await.unwrap_err(), ErsatzError::NeverInvoked);
}

#[tokio::test]
async fn concurrent_flush_aggregates_failures_after_running_everything() {
    let ersatz =
        Ersatz::with_config(ErsatzConfig::default().flush_mode(FlushMode::Concurrent));
    let (req_a, res_a) = fixture_a();
    let (req_x, res_x) = fixture_x();
    ersatz.expect(req_a, res_a).unwrap();
    ersatz.expect(req_x.clone(), res_x.clone()).unwrap();

    let bad = ersatz.enqueue(RequestDescriptor::get("/nope"));
    let good = ersatz.enqueue(req_x);

    assert!(ersatz.flush().await.is_err());
    assert!(bad.await.is_err());
    assert_eq!(good.await.unwrap(), res_x);
    ersatz.verify().unwrap();
}

#[tokio::test]
async fn verify_before_flush_is_an_explicit_failure() {
    let ersatz = Ersatz::new();
    let (req_a, res_a) = fixture_a();
    ersatz.expect(req_a.clone(), res_a).unwrap();
    let _pending = ersatz.enqueue(req_a);

    assert_eq!(ersatz.verify().unwrap_err(), ErsatzError::NotFlushed);
    ersatz.flush().await.unwrap();
    ersatz.verify().unwrap();
}

#[test]
fn describe_all_is_a_bulleted_listing() {
    let ersatz = Ersatz::new();
    let (req_a, res_a) = fixture_a();
    let (req_x, res_x) = fixture_x();
    ersatz.expect(req_a, res_a).unwrap();
    ersatz.expect(req_x, res_x).unwrap();

    let listing = ersatz.describe_all();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|l| l.starts_with("\u{25B8} ")));
}

// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end dispatch tests against a mock collection endpoint.

use std::collections::{HashMap, HashSet};

use loom_measurement::{
	EventOptions, HitOptions, HitParams, HitType, MeasurementClient, MeasurementError,
	RefundOptions, TransactionOptions,
};
use loom_measurement_core::client_id::is_uuid_v4;
use reqwest::Url;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

fn client_for(server: &MockServer, debug: bool) -> MeasurementClient {
	MeasurementClient::builder()
		.tracking_id("UA-12345-1")
		.base_url(server.uri())
		.debug(debug)
		.build()
		.unwrap()
}

async fn mount(server: &MockServer, route: &str, response: ResponseTemplate) {
	Mock::given(method("POST"))
		.and(path(route))
		.respond_with(response)
		.mount(server)
		.await;
}

async fn only_request(server: &MockServer) -> Request {
	let mut requests = server.received_requests().await.unwrap();
	assert_eq!(requests.len(), 1, "expected exactly one request");
	requests.remove(0)
}

fn form(request: &Request) -> HashMap<String, String> {
	let body = String::from_utf8(request.body.clone()).unwrap();
	let url = Url::parse(&format!("http://form.invalid/?{body}")).unwrap();
	url.query_pairs().into_owned().collect()
}

fn keys(form: &HashMap<String, String>) -> HashSet<&str> {
	form.keys().map(String::as_str).collect()
}

fn with_identity(fields: &[&'static str]) -> HashSet<&'static str> {
	["v", "tid", "cid", "t"].iter().chain(fields).copied().collect()
}

fn valid_debug_body() -> serde_json::Value {
	json!({
		"hitParsingResult": [{"valid": true, "parserMessage": [], "hit": "/debug/collect?v=1"}],
		"parserMessage": [{"messageType": "INFO", "description": "Found 1 hit in the request."}]
	})
}

fn invalid_debug_body() -> serde_json::Value {
	json!({
		"hitParsingResult": [{
			"valid": false,
			"parserMessage": [{
				"messageType": "ERROR",
				"description": "The value provided for parameter 'tid' is invalid.",
				"parameter": "tid"
			}],
			"hit": "/debug/collect?v=1"
		}],
		"parserMessage": [{"messageType": "INFO", "description": "Found 1 hit in the request."}]
	})
}

#[tokio::test]
async fn production_success_generates_uuid_client_id() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	let sent = client
		.pageview("example.com", "/home", "Home", HitOptions::default())
		.await
		.unwrap();

	assert!(is_uuid_v4(&sent.client_id));

	let request = only_request(&server).await;
	let form = form(&request);
	assert_eq!(form["cid"], sent.client_id);
	assert_eq!(form["v"], "1");
	assert_eq!(form["tid"], "UA-12345-1");
	assert_eq!(form["t"], "pageview");
}

#[tokio::test]
async fn production_posts_form_encoded_body() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/collect"))
		.and(header("content-type", "application/x-www-form-urlencoded"))
		.respond_with(ResponseTemplate::new(200))
		.expect(1)
		.mount(&server)
		.await;

	let client = client_for(&server, false);
	client
		.pageview("example.com", "/a b&c", "Tom & Jerry", HitOptions::default())
		.await
		.unwrap();

	let form = form(&only_request(&server).await);
	assert_eq!(form["dp"], "/a b&c");
	assert_eq!(form["dt"], "Tom & Jerry");
}

#[tokio::test]
async fn production_ignores_body_validity() {
	let server = MockServer::start().await;
	mount(
		&server,
		"/collect",
		ResponseTemplate::new(200).set_body_json(invalid_debug_body()),
	)
	.await;

	let client = client_for(&server, false);
	let sent = client
		.event("Video", "Play", EventOptions::default())
		.await
		.unwrap();
	assert!(is_uuid_v4(&sent.client_id));
}

#[tokio::test]
async fn production_malformed_body_is_decode_failure() {
	let server = MockServer::start().await;
	mount(
		&server,
		"/collect",
		ResponseTemplate::new(200).set_body_string("GIF89a"),
	)
	.await;

	let client = client_for(&server, false);
	let result = client.event("Video", "Play", EventOptions::default()).await;
	assert!(matches!(result, Err(MeasurementError::DecodeFailed(_))));
}

#[tokio::test]
async fn debug_valid_result_succeeds() {
	let server = MockServer::start().await;
	mount(
		&server,
		"/debug/collect",
		ResponseTemplate::new(200).set_body_json(valid_debug_body()),
	)
	.await;

	let client = client_for(&server, true);
	let sent = client
		.event(
			"Video",
			"Play",
			EventOptions {
				client_id: Some("abc-123".to_string()),
				..Default::default()
			},
		)
		.await
		.unwrap();

	assert_eq!(sent.client_id, "abc-123");
	assert_eq!(only_request(&server).await.url.path(), "/debug/collect");
}

#[tokio::test]
async fn debug_invalid_result_rejects_with_full_body() {
	let server = MockServer::start().await;
	mount(
		&server,
		"/debug/collect",
		ResponseTemplate::new(200).set_body_json(invalid_debug_body()),
	)
	.await;

	let client = client_for(&server, true);
	let err = client
		.event("Video", "Play", EventOptions::default())
		.await
		.unwrap_err();

	match &err {
		MeasurementError::ValidationFailed { body } => assert_eq!(body, &invalid_debug_body()),
		other => panic!("expected ValidationFailed, got {other:?}"),
	}

	let diagnostics = err.debug_response().unwrap();
	let errors: Vec<_> = diagnostics.errors().collect();
	assert_eq!(errors.len(), 1);
	assert_eq!(errors[0].parameter.as_deref(), Some("tid"));
}

#[tokio::test]
async fn debug_empty_body_rejects_with_empty_object() {
	let server = MockServer::start().await;
	mount(&server, "/debug/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, true);
	let result = client
		.pageview("example.com", "/", "Root", HitOptions::default())
		.await;

	match result {
		Err(MeasurementError::ValidationFailed { body }) => assert_eq!(body, json!({})),
		other => panic!("expected ValidationFailed, got {other:?}"),
	}
}

#[tokio::test]
async fn server_error_rejects_with_body_in_both_modes() {
	for debug in [false, true] {
		let server = MockServer::start().await;
		let route = if debug { "/debug/collect" } else { "/collect" };
		mount(
			&server,
			route,
			ResponseTemplate::new(500).set_body_json(json!({"error": "backend unavailable"})),
		)
		.await;

		let client = client_for(&server, debug);
		let result = client
			.social("like", "facebook", "/post/1", HitOptions::default())
			.await;

		match result {
			Err(MeasurementError::ServerError { status, body }) => {
				assert_eq!(status, 500);
				assert_eq!(body, json!({"error": "backend unavailable"}));
			}
			other => panic!("debug={debug}: expected ServerError, got {other:?}"),
		}
	}
}

#[tokio::test]
async fn non_200_success_status_is_server_error() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(204)).await;

	let client = client_for(&server, false);
	let result = client.refund("T1", RefundOptions::default()).await;

	match result {
		Err(MeasurementError::ServerError { status, body }) => {
			assert_eq!(status, 204);
			assert_eq!(body, json!({}));
		}
		other => panic!("expected ServerError, got {other:?}"),
	}
}

#[tokio::test]
async fn server_error_with_malformed_body_is_decode_failure() {
	let server = MockServer::start().await;
	mount(
		&server,
		"/collect",
		ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"),
	)
	.await;

	let client = client_for(&server, false);
	let result = client.refund("T1", RefundOptions::default()).await;
	assert!(matches!(result, Err(MeasurementError::DecodeFailed(_))));
}

#[tokio::test]
async fn transport_failure_is_request_failed() {
	// Reserve a port, then release it so nothing is listening there.
	let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
	let port = listener.local_addr().unwrap().port();
	drop(listener);

	let client = MeasurementClient::builder()
		.tracking_id("UA-12345-1")
		.base_url(format!("http://127.0.0.1:{port}"))
		.build()
		.unwrap();

	let result = client.refund("T1", RefundOptions::default()).await;
	assert!(matches!(result, Err(MeasurementError::RequestFailed(_))));
}

#[tokio::test]
async fn user_agent_header_sent_when_configured() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/collect"))
		.and(header("user-agent", "loom-test/1.0"))
		.respond_with(ResponseTemplate::new(200))
		.expect(1)
		.mount(&server)
		.await;

	let client = MeasurementClient::builder()
		.tracking_id("UA-12345-1")
		.base_url(server.uri())
		.user_agent("loom-test/1.0")
		.build()
		.unwrap();

	client
		.exception("boom", false, HitOptions::default())
		.await
		.unwrap();
}

#[tokio::test]
async fn user_agent_header_omitted_by_default() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	client
		.exception("boom", false, HitOptions::default())
		.await
		.unwrap();

	let request = only_request(&server).await;
	assert!(request.headers.get("user-agent").is_none());
}

#[tokio::test]
async fn event_without_optionals_sends_only_mandatory_fields() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	let sent = client
		.event(
			"Video",
			"Play",
			EventOptions {
				client_id: Some("abc-123".to_string()),
				..Default::default()
			},
		)
		.await
		.unwrap();

	assert_eq!(sent.client_id, "abc-123");

	let form = form(&only_request(&server).await);
	assert_eq!(keys(&form), with_identity(&["ec", "ea"]));
	assert_eq!(form["ec"], "Video");
	assert_eq!(form["ea"], "Play");
	assert_eq!(form["t"], "event");
	assert_eq!(form["cid"], "abc-123");
}

#[tokio::test]
async fn event_with_optionals() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	client
		.event(
			"Video",
			"Play",
			EventOptions {
				label: Some("Intro".to_string()),
				value: Some(42),
				client_id: None,
			},
		)
		.await
		.unwrap();

	let form = form(&only_request(&server).await);
	assert_eq!(keys(&form), with_identity(&["ec", "ea", "el", "ev"]));
	assert_eq!(form["ev"], "42");
}

#[tokio::test]
async fn refund_defaults() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	client.refund("T123", RefundOptions::default()).await.unwrap();

	let form = form(&only_request(&server).await);
	assert_eq!(keys(&form), with_identity(&["ec", "ea", "ni", "ti", "pa"]));
	assert_eq!(form["t"], "event");
	assert_eq!(form["ec"], "Ecommerce");
	assert_eq!(form["ea"], "Refund");
	assert_eq!(form["ni"], "1");
	assert_eq!(form["ti"], "T123");
	assert_eq!(form["pa"], "refund");
}

#[tokio::test]
async fn refund_overrides_keep_product_action() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	client
		.refund(
			"T123",
			RefundOptions {
				category: Some("Store".to_string()),
				action: Some("Chargeback".to_string()),
				non_interaction: Some(false),
				client_id: None,
			},
		)
		.await
		.unwrap();

	let form = form(&only_request(&server).await);
	assert_eq!(form["ec"], "Store");
	assert_eq!(form["ea"], "Chargeback");
	assert_eq!(form["ni"], "0");
	assert_eq!(form["pa"], "refund");
}

#[tokio::test]
async fn screen_fields() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	client
		.screen(
			"Loom",
			"1.2.3",
			"com.loom.app",
			"com.android.vending",
			"Settings",
			HitOptions::default(),
		)
		.await
		.unwrap();

	let form = form(&only_request(&server).await);
	assert_eq!(keys(&form), with_identity(&["an", "av", "aid", "aiid", "cd"]));
	assert_eq!(form["t"], "screenview");
	assert_eq!(form["cd"], "Settings");
}

#[tokio::test]
async fn transaction_only_truthy_optionals() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	client
		.transaction(
			"T42",
			TransactionOptions {
				affiliation: Some(String::new()),
				revenue: Some(25.5),
				shipping: Some(0.0),
				tax: None,
				currency: Some("EUR".to_string()),
				client_id: None,
			},
		)
		.await
		.unwrap();

	let form = form(&only_request(&server).await);
	assert_eq!(keys(&form), with_identity(&["ti", "tr", "cu"]));
	assert_eq!(form["t"], "transaction");
	assert_eq!(form["tr"], "25.5");
}

#[tokio::test]
async fn social_and_exception_fields() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	client
		.social("like", "facebook", "/post/1", HitOptions::default())
		.await
		.unwrap();
	client
		.exception("OutOfMemory", true, HitOptions::default())
		.await
		.unwrap();

	let requests = server.received_requests().await.unwrap();
	assert_eq!(requests.len(), 2);

	let social = form(&requests[0]);
	assert_eq!(keys(&social), with_identity(&["sa", "sn", "st"]));
	assert_eq!(social["t"], "social");

	let exception = form(&requests[1]);
	assert_eq!(keys(&exception), with_identity(&["exd", "exf"]));
	assert_eq!(exception["t"], "exception");
	assert_eq!(exception["exf"], "1");
}

#[tokio::test]
async fn send_without_params_sends_identity_only() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	client.send(HitType::Pageview, None, None).await.unwrap();

	let form = form(&only_request(&server).await);
	assert_eq!(keys(&form), with_identity(&[]));
}

#[tokio::test]
async fn send_resolves_overridden_client_id() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	let params = HitParams::new().with("cid", "from-params");
	let sent = client
		.send(HitType::Event, Some(params), Some("from-caller"))
		.await
		.unwrap();

	assert_eq!(sent.client_id, "from-params");
}

#[tokio::test]
async fn concurrent_sends_use_distinct_client_ids() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;

	let client = client_for(&server, false);
	let sends = (0..8).map(|_| client.event("Video", "Play", EventOptions::default()));
	let results = futures::future::join_all(sends).await;

	let ids: HashSet<String> = results
		.into_iter()
		.map(|result| result.unwrap().client_id)
		.collect();
	assert_eq!(ids.len(), 8);
	assert!(ids.iter().all(|id| is_uuid_v4(id)));
	assert_eq!(server.received_requests().await.unwrap().len(), 8);
}

#[tokio::test]
async fn protocol_version_and_debug_toggle_apply_per_call() {
	let server = MockServer::start().await;
	mount(&server, "/collect", ResponseTemplate::new(200)).await;
	mount(
		&server,
		"/debug/collect",
		ResponseTemplate::new(200).set_body_json(valid_debug_body()),
	)
	.await;

	let mut client = client_for(&server, false);
	client.set_protocol_version(2);
	client
		.pageview("example.com", "/", "Root", HitOptions::default())
		.await
		.unwrap();

	client.set_debug(true);
	client
		.pageview("example.com", "/", "Root", HitOptions::default())
		.await
		.unwrap();

	let requests = server.received_requests().await.unwrap();
	assert_eq!(requests[0].url.path(), "/collect");
	assert_eq!(form(&requests[0])["v"], "2");
	assert_eq!(requests[1].url.path(), "/debug/collect");
}

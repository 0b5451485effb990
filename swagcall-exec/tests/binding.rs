mod common;

use common::{config, harness};
use serde_json::json;
use swagcall_core::HttpMethod;
use swagcall_exec::{CallArgs, ErrorKind};

#[tokio::test(start_paused = true)]
async fn missing_required_query_parameter_fails_before_sending() {
    let h = harness(config());

    let err = h
        .client
        .invoke("Search", "get_search", CallArgs::new())
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Error);
    assert_eq!(err.message, "Parameter search must be specified.");
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn explicit_null_counts_as_missing() {
    let h = harness(config());

    let err = h
        .client
        .invoke(
            "Search",
            "get_search",
            CallArgs::new().param("search", serde_json::Value::Null),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Error);
    assert_eq!(err.message, "Parameter search must be specified.");
    assert_eq!(h.transport.call_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn query_values_are_encoded_and_implicit_params_are_added() {
    let h = harness(config());

    h.client
        .invoke(
            "Search",
            "get_search",
            CallArgs::new().param("search", "hello world"),
        )
        .await
        .unwrap();

    let req = h.transport.last_request();
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.url.path(), "/latest/search/");
    let query = req.url.query().unwrap();
    assert!(query.contains("search=hello%20world"), "{query}");
    assert!(query.contains("datasource=tranquility"), "{query}");
    assert_eq!(req.header("Accept-Language"), Some("en-us"));
    assert_eq!(req.header("User-Agent"), Some("swagcall tests (by nobody)"));
}

#[tokio::test(start_paused = true)]
async fn caller_values_override_implicit_ones() {
    let h = harness(config());

    h.client
        .call(
            "get_search",
            CallArgs::new()
                .param("search", "x")
                .param("datasource", "singularity")
                .param("Accept-Language", "de"),
        )
        .await
        .unwrap();

    let req = h.transport.last_request();
    assert!(req.url.query().unwrap().contains("datasource=singularity"));
    assert_eq!(req.header("Accept-Language"), Some("de"));
}

#[tokio::test(start_paused = true)]
async fn arrays_are_comma_joined_and_headers_bound() {
    let h = harness(config());

    h.client
        .call(
            "get_search",
            CallArgs::new()
                .param("search", "jita")
                .param("categories", json!(["solar_system", "station"]))
                .param("X-Trace", "abc"),
        )
        .await
        .unwrap();

    let req = h.transport.last_request();
    assert!(req
        .url
        .query()
        .unwrap()
        .contains("categories=solar_system%2Cstation"));
    assert_eq!(req.header("X-Trace"), Some("abc"));
}

#[tokio::test(start_paused = true)]
async fn undeclared_parameters_are_ignored() {
    let h = harness(config());

    h.client
        .call("get_status", CallArgs::new().param("bogus", 1))
        .await
        .unwrap();

    let req = h.transport.last_request();
    assert!(!req.url.query().unwrap_or_default().contains("bogus"));
    assert!(req.header("bogus").is_none());
}

#[tokio::test(start_paused = true)]
async fn path_placeholders_are_substituted() {
    let h = harness(config());

    h.client
        .invoke(
            "Wallet",
            "get_characters_character_id_wallet",
            CallArgs::new().param("character_id", 90000001),
        )
        .await
        .unwrap();

    let req = h.transport.last_request();
    assert_eq!(req.url.path(), "/latest/characters/90000001/wallet/");
}

#[tokio::test(start_paused = true)]
async fn later_body_parameter_wins_with_a_warning() {
    let h = harness(config());

    h.client
        .invoke(
            "User Interface",
            "post_ui_autopilot_waypoint",
            CallArgs::new()
                .param("first", json!({"a": 1}))
                .param("second", json!({"b": 2})),
        )
        .await
        .unwrap();

    let req = h.transport.last_request();
    assert_eq!(req.method, HttpMethod::Post);
    assert_eq!(req.body, Some(json!({"b": 2})));
    assert!(h.log.contains("Body was set multiple times"));
}

#[tokio::test(start_paused = true)]
async fn token_is_attached_only_to_scoped_operations() {
    let h = harness(config());

    h.client
        .call(
            "get_characters_character_id_wallet",
            CallArgs::new().param("character_id", 1).token("secret"),
        )
        .await
        .unwrap();
    assert_eq!(
        h.transport.last_request().header("Authorization"),
        Some("Bearer secret")
    );

    h.client
        .call("get_status", CallArgs::new().token("secret"))
        .await
        .unwrap();
    assert!(h.transport.last_request().header("Authorization").is_none());
}

#[tokio::test(start_paused = true)]
async fn legacy_token_parameter_becomes_the_token() {
    let h = harness(config());

    h.client
        .call(
            "get_characters_character_id_wallet",
            CallArgs::new().param("character_id", 1).param("token", "legacy"),
        )
        .await
        .unwrap();

    let req = h.transport.last_request();
    assert_eq!(req.header("Authorization"), Some("Bearer legacy"));
    assert!(!req.url.query().unwrap_or_default().contains("legacy"));
}

#[tokio::test(start_paused = true)]
async fn unknown_operation_is_an_error() {
    let h = harness(config());

    let err = h
        .client
        .invoke("Search", "get_status", CallArgs::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Error);

    let err = h.client.call("nope", CallArgs::new()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Error);
    assert_eq!(h.transport.call_count(), 0);
}

mod common;

use std::time::Duration;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use common::{config, feed_entry, harness, ok_json, RecordingLog};
use serde_json::json;
use swagcall_core::HealthStatus;
use swagcall_exec::health::HealthMonitor;
use swagcall_exec::{CallArgs, RequestDescriptor, Response, Transport, TransportError};
use tokio::sync::Semaphore;

#[tokio::test(start_paused = true)]
async fn score_reflects_feed_weights() {
    let h = harness(config());
    h.transport.set_feed(json!([
        feed_entry("get", "/status/", "green"),
        feed_entry("get", "/search/", "red"),
    ]));

    h.client.refresh_health().await;

    assert_eq!(h.client.health_score(), 50);
    assert_eq!(h.client.health_status("get_status"), HealthStatus::Green);
    assert_eq!(h.client.health_status("get_search"), HealthStatus::Red);
    assert_eq!(
        h.client.health_status("get_characters_character_id_wallet"),
        HealthStatus::Unknown
    );
    assert!(h.log.contains("Upstream health is 50%"));
}

#[tokio::test(start_paused = true)]
async fn feed_routes_map_to_operation_ids() {
    let h = harness(config());
    h.transport.set_feed(json!([feed_entry(
        "get",
        "/characters/{character_id}/wallet/",
        "yellow"
    )]));

    let status = h.client.health("get_characters_character_id_wallet").await;
    assert_eq!(status, HealthStatus::Yellow);
}

#[tokio::test(start_paused = true)]
async fn refresh_is_skipped_within_ttl() {
    let h = harness(config().with_status_ttl(Duration::from_secs(300)));

    h.client.refresh_health().await;
    h.client.call("get_status", CallArgs::new()).await.unwrap();
    h.client.call("get_status", CallArgs::new()).await.unwrap();
    assert_eq!(h.transport.feed_count(), 1);

    tokio::time::advance(Duration::from_secs(301)).await;
    h.client.call("get_status", CallArgs::new()).await.unwrap();
    assert_eq!(h.transport.feed_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn failed_fetch_assumes_full_health_and_retries_next_time() {
    let h = harness(config());
    h.transport.fail_feed();

    h.client.refresh_health().await;
    assert_eq!(h.client.health_score(), 100);
    assert_eq!(h.client.health_status("get_status"), HealthStatus::Unknown);
    assert!(!h.client.health_monitor().is_fresh());
    assert!(h.log.contains("Upstream health is unknown"));

    let before = h.transport.feed_count();
    h.client.call("get_status", CallArgs::new()).await.unwrap();
    assert!(h.transport.feed_count() > before);
}

#[tokio::test(start_paused = true)]
async fn listing_reports_current_statuses() {
    let h = harness(config());
    h.transport
        .set_feed(json!([feed_entry("get", "/status/", "yellow")]));
    h.client.refresh_health().await;

    let listing = h.client.listing();
    let entry = &listing["Status"]["get_status"];
    assert_eq!(entry.status, HealthStatus::Yellow);
    assert_eq!(entry.scope, None);

    let wallet = &listing["Wallet"]["get_characters_character_id_wallet"];
    assert_eq!(
        wallet.scope.as_deref(),
        Some("esi-wallet.read_character_wallet.v1")
    );
    assert_eq!(wallet.status, HealthStatus::Unknown);
}

#[tokio::test(start_paused = true)]
async fn reload_forgets_statuses() {
    let h = harness(config());
    h.transport
        .set_feed(json!([feed_entry("get", "/status/", "red")]));
    h.client.refresh_health().await;
    assert_eq!(h.client.health_status("get_status"), HealthStatus::Red);

    h.transport.set_feed(json!([]));
    h.client.load_str(common::SPEC).unwrap();
    assert_eq!(h.client.health_status("get_status"), HealthStatus::Unknown);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn refresh_waits_for_the_fetch_started_by_load() {
    let h = harness(config());
    h.transport.set_feed(json!([
        feed_entry("get", "/status/", "green"),
        feed_entry("get", "/search/", "yellow"),
        feed_entry("get", "/ui/autopilot/waypoint/", "red"),
    ]));
    h.transport.set_feed_delay(Duration::from_millis(50));

    // The load spawned a fetch; whether or not it already started, this must see its data.
    h.client.load_str(common::SPEC).unwrap();
    h.client.refresh_health().await;

    assert_eq!(h.client.health_score(), 50);
    assert_eq!(h.client.health_status("get_search"), HealthStatus::Yellow);
}

/// Feed whose first fetch blocks until released and reports red; later fetches report green.
struct GatedFeed {
    gate: Semaphore,
    fetches: AtomicUsize,
}

#[async_trait]
impl Transport for GatedFeed {
    async fn send(&self, _req: RequestDescriptor) -> Result<Response, TransportError> {
        let status = if self.fetches.fetch_add(1, Ordering::SeqCst) == 0 {
            let _permit = self.gate.acquire().await.unwrap();
            "red"
        } else {
            "green"
        };
        Ok(ok_json(json!([feed_entry("get", "/status/", status)])))
    }
}

#[tokio::test(start_paused = true)]
async fn fetch_in_flight_during_reset_is_discarded() {
    let transport = Arc::new(GatedFeed {
        gate: Semaphore::new(0),
        fetches: AtomicUsize::new(0),
    });
    let monitor = Arc::new(HealthMonitor::new(
        transport.clone(),
        Arc::new(RecordingLog::default()),
        "swagcall tests (by nobody)",
        Duration::from_secs(300),
    ));
    monitor.reset(Some(HealthMonitor::feed_url("https://old.test", "latest").unwrap()));

    let stale = tokio::spawn({
        let monitor = Arc::clone(&monitor);
        async move { monitor.refresh().await }
    });
    while transport.fetches.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    monitor.reset(Some(HealthMonitor::feed_url("https://new.test", "latest").unwrap()));
    transport.gate.add_permits(1);
    stale.await.unwrap();

    assert_eq!(monitor.status("get_status"), HealthStatus::Unknown);
    assert!(!monitor.is_fresh());

    monitor.refresh().await;
    assert_eq!(monitor.status("get_status"), HealthStatus::Green);
}

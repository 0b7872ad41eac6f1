//! End-to-end crawl scenarios against a mocked remote catalog and a real
//! SQLite mirror.

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use starsync_client::CatalogClient;
use starsync_core::{Coordinate, EntityKey, EntityKind};
use starsync_crawler::SpatialCrawler;
use starsync_store::{ConnectionConfig, MirrorStore};

fn open_store(dir: &tempfile::TempDir) -> Arc<MirrorStore> {
    Arc::new(MirrorStore::open(&ConnectionConfig::new(dir.path().join("mirror.db"))).unwrap())
}

fn crawler(server: &MockServer, store: &Arc<MirrorStore>) -> SpatialCrawler {
    let client = Arc::new(CatalogClient::new(server.uri()));
    SpatialCrawler::new(client, Arc::clone(store))
}

fn sol() -> serde_json::Value {
    json!({
        "id": 27, "id64": 10, "name": "Sol",
        "coords": {"x": 0.0, "y": 0.0, "z": 0.0},
        "requirePermit": false,
    })
}

fn sol_bodies() -> serde_json::Value {
    json!({
        "bodies": [
            {"id": 301, "id64": 11, "name": "Earth", "type": "Planet"},
            {"id": 302, "id64": 12, "name": "Moon", "type": "Moon"},
        ],
    })
}

async fn mount_single_system_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api-v1/cube-systems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([sol()])))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api-system-v1/bodies"))
        .and(query_param("systemId", "27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sol_bodies()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn first_crawl_of_single_system_creates_everything() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    Mock::given(method("GET"))
        .and(path("/api-v1/cube-systems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([sol()])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api-system-v1/bodies"))
        .and(query_param("systemId", "27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sol_bodies()))
        .expect(1)
        .mount(&server)
        .await;
    // The crawl works from search results; the single-system endpoint is
    // never needed.
    Mock::given(method("GET"))
        .and(path("/api-v1/system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sol()))
        .expect(0)
        .mount(&server)
        .await;

    let crawler = crawler(&server, &store);
    let report = crawler.full_scan(Coordinate::new(0.0, 0.0, 0.0)).await;

    assert_eq!(report.systems_created, 1);
    assert_eq!(report.bodies_created, 2);
    assert_eq!(report.regions_scanned, 1);
    assert_eq!(report.failures, 0);

    assert_eq!(store.system_count().unwrap(), 1);
    assert_eq!(store.body_count().unwrap(), 2);
    assert_eq!(store.sync_state_count().unwrap(), 3);
}

#[tokio::test]
async fn second_identical_crawl_writes_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    mount_single_system_catalog(&server).await;

    let first = crawler(&server, &store);
    let _ = first.full_scan(Coordinate::new(0.0, 0.0, 0.0)).await;

    let key = EntityKey::new(27, 10);
    let system_before = store.system(&key).unwrap().unwrap();
    let state_before = store.sync_state(&key, EntityKind::System).unwrap().unwrap();

    // Fresh crawler, fresh visited registries, same remote data.
    let second = crawler(&server, &store);
    let report = second.full_scan(Coordinate::new(0.0, 0.0, 0.0)).await;

    assert_eq!(report.systems_unchanged, 1);
    assert_eq!(report.bodies_unchanged, 2);
    assert_eq!(report.systems_created + report.systems_updated, 0);
    assert_eq!(report.bodies_created + report.bodies_updated, 0);

    // Zero writes: neither the entity nor the sync row was touched.
    assert_eq!(store.system(&key).unwrap().unwrap(), system_before);
    assert_eq!(
        store.sync_state(&key, EntityKind::System).unwrap().unwrap(),
        state_before
    );
}

#[tokio::test]
async fn changed_remote_field_yields_one_update_with_prior_snapshot() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);
    mount_single_system_catalog(&server).await;

    let first = crawler(&server, &store);
    let _ = first.full_scan(Coordinate::new(0.0, 0.0, 0.0)).await;

    let key = EntityKey::new(27, 10);
    let first_run_row = store.system(&key).unwrap().unwrap();

    // Remote changes one field between runs.
    server.reset().await;
    let mut changed = sol();
    changed["requirePermit"] = json!(true);
    Mock::given(method("GET"))
        .and(path("/api-v1/cube-systems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([changed])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api-system-v1/bodies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sol_bodies()))
        .mount(&server)
        .await;

    let second = crawler(&server, &store);
    let report = second.full_scan(Coordinate::new(0.0, 0.0, 0.0)).await;

    assert_eq!(report.systems_updated, 1);
    assert_eq!(report.bodies_unchanged, 2);

    let state = store.sync_state(&key, EntityKind::System).unwrap().unwrap();
    let snapshot = state.previous_state_value().unwrap().unwrap();
    assert_eq!(snapshot, first_run_row.snapshot().unwrap());
    assert!(store.system(&key).unwrap().unwrap().require_permit);
}

#[tokio::test]
async fn edge_system_opens_one_new_region_and_nothing_twice() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    let near = json!({
        "id": 1, "id64": 101, "name": "Near",
        "coords": {"x": 0.0, "y": 0.0, "z": 0.0},
    });
    let edge = json!({
        "id": 2, "id64": 102, "name": "Edge",
        "coords": {"x": 95.0, "y": 95.0, "z": 95.0},
    });

    // Origin region sees both; the edge system's region sees the same pair
    // again, which must not trigger any re-reconciliation or a third scan.
    Mock::given(method("GET"))
        .and(path("/api-v1/cube-systems"))
        .and(query_param("x", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([near, edge])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api-v1/cube-systems"))
        .and(query_param("x", "95"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([near, edge])))
        .expect(1)
        .mount(&server)
        .await;
    for id in ["1", "2"] {
        Mock::given(method("GET"))
            .and(path("/api-system-v1/bodies"))
            .and(query_param("systemId", id))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bodies": []})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let crawler = crawler(&server, &store);
    let report = crawler.full_scan(Coordinate::new(0.0, 0.0, 0.0)).await;

    // Each system reconciled exactly once, each region scanned exactly once.
    assert_eq!(report.systems_created, 2);
    assert_eq!(report.regions_scanned, 2);
    assert_eq!(report.failures, 0);
    assert_eq!(store.system_count().unwrap(), 2);
    assert_eq!(store.sync_state_count().unwrap(), 2);
}

#[tokio::test]
async fn unreachable_record_does_not_abort_the_crawl() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    let a = json!({
        "id": 1, "id64": 101, "name": "A",
        "coords": {"x": 0.0, "y": 0.0, "z": 0.0},
    });
    let b = json!({
        "id": 2, "id64": 102, "name": "B",
        "coords": {"x": 5.0, "y": 5.0, "z": 5.0},
    });

    Mock::given(method("GET"))
        .and(path("/api-v1/cube-systems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([a, b])))
        .mount(&server)
        .await;
    // System 1's body list is down; system 2's works.
    Mock::given(method("GET"))
        .and(path("/api-system-v1/bodies"))
        .and(query_param("systemId", "1"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api-system-v1/bodies"))
        .and(query_param("systemId", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"bodies": []})))
        .mount(&server)
        .await;

    let crawler = crawler(&server, &store);
    let report = crawler.full_scan(Coordinate::new(0.0, 0.0, 0.0)).await;

    // Both systems were still created; the failed body fetch is contained.
    assert_eq!(report.systems_created, 2);
    assert_eq!(report.failures, 1);
    assert_eq!(store.system_count().unwrap(), 2);
}

#[tokio::test]
async fn refresh_known_list_skips_already_synced_keys() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    Mock::given(method("GET"))
        .and(path("/api-v1/system"))
        .and(query_param("systemId", "27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sol()))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api-system-v1/bodies"))
        .and(query_param("systemId", "27"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sol_bodies()))
        .expect(1)
        .mount(&server)
        .await;

    let key = EntityKey::new(27, 10);

    let first = crawler(&server, &store);
    let report = first.refresh_known_list(&[key]).await;
    assert_eq!(report.systems_created, 1);
    assert_eq!(report.bodies_created, 2);

    // Second pass: the sync row exists, so no remote call is made at all
    // (the expect(1) counts above would fail otherwise).
    let second = crawler(&server, &store);
    let report = second.refresh_known_list(&[key]).await;
    assert_eq!(report.systems_created, 0);
    assert_eq!(report.failures, 0);
}

#[tokio::test]
async fn refresh_of_unknown_system_is_a_no_op() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let store = open_store(&dir);

    Mock::given(method("GET"))
        .and(path("/api-v1/system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let crawler = crawler(&server, &store);
    let report = crawler.refresh_known_list(&[EntityKey::new(999, 999)]).await;

    assert_eq!(report.systems_created, 0);
    assert_eq!(report.failures, 0);
    assert_eq!(store.system_count().unwrap(), 0);
    // No sync row either: the remote never produced a record to reconcile.
    assert_eq!(store.sync_state_count().unwrap(), 0);
}

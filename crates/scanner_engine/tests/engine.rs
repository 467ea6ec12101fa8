use std::sync::Arc;
use std::time::Duration;

use scanner_engine::{
    ApiSettings, EngineEvent, EngineHandle, FailureKind, ReqwestBackend, SourceCollection,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

fn engine_for(base_url: String) -> EngineHandle {
    let settings = ApiSettings {
        base_url,
        ..ApiSettings::default()
    };
    let backend = ReqwestBackend::new(&settings).expect("backend");
    EngineHandle::new(Arc::new(backend)).expect("engine")
}

#[test]
fn armed_timer_fires_once() {
    let engine = engine_for("http://localhost:9/api/v1".to_string());
    engine.arm_timer(7, Duration::from_millis(20));

    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::TimerFired { token: 7 })
    );
    assert_eq!(engine.recv_timeout(Duration::from_millis(100)), None);
}

#[test]
fn disarmed_timer_never_fires() {
    let engine = engine_for("http://localhost:9/api/v1".to_string());
    engine.arm_timer(1, Duration::from_millis(150));
    engine.disarm_timer(1);
    engine.arm_timer(2, Duration::from_millis(20));

    assert_eq!(
        engine.recv_timeout(WAIT),
        Some(EngineEvent::TimerFired { token: 2 })
    );
    assert_eq!(engine.recv_timeout(Duration::from_millis(300)), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn listings_complete_independently() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/known-sources"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "db down"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/new-sources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"domain": "a.example", "name": "A", "url": "https://a.example"},
            {"domain": "b.example", "name": "B", "url": "https://b.example"}
        ])))
        .mount(&server)
        .await;

    let engine = engine_for(format!("{}/api/v1", server.uri()));
    engine.list_sources(SourceCollection::Known, 1);
    engine.list_sources(SourceCollection::New, 1);

    let events = tokio::task::spawn_blocking(move || {
        let first = engine.recv_timeout(WAIT);
        let second = engine.recv_timeout(WAIT);
        [first, second]
    })
    .await
    .expect("join");

    let mut known_failed = false;
    let mut new_count = None;
    for event in events.into_iter().flatten() {
        match event {
            EngineEvent::SourcesLoaded {
                collection: SourceCollection::Known,
                seq: 1,
                result: Err(err),
            } => {
                assert_eq!(err.kind, FailureKind::HttpStatus(500));
                known_failed = true;
            }
            EngineEvent::SourcesLoaded {
                collection: SourceCollection::New,
                seq: 1,
                result: Ok(sources),
            } => new_count = Some(sources.len()),
            other => panic!("unexpected event {other:?}"),
        }
    }
    assert!(known_failed);
    assert_eq!(new_count, Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn search_completion_echoes_sequence_number() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/search-media"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"title": "One", "link": "https://one.example", "domain": "one.example", "description": "", "is_new": true}
        ])))
        .mount(&server)
        .await;

    let engine = engine_for(format!("{}/api/v1", server.uri()));
    engine.search(42, "news");

    let event = tokio::task::spawn_blocking(move || engine.recv_timeout(WAIT))
        .await
        .expect("join");
    match event {
        Some(EngineEvent::SearchCompleted {
            seq: 42,
            result: Ok(results),
        }) => assert_eq!(results.len(), 1),
        other => panic!("unexpected event {other:?}"),
    }
}

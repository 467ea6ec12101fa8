use std::sync::Arc;
use std::time::Duration;

use scanner_core::{Effect, Listing, Msg, RequestError, SearchResult, Source, SourceTimestamp};
use scanner_engine::{
    ApiError, ApiSearchResult, ApiSettings, ApiSource, EngineEvent, EngineHandle, ReqwestBackend,
    SourceCollection,
};
use scanner_logging::{scanner_debug, scanner_info, scanner_warn};

/// Executes core effects on the engine and turns engine events back into
/// core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: &ApiSettings) -> anyhow::Result<Self> {
        let backend = ReqwestBackend::new(settings)?;
        scanner_info!("Backend base url {}", backend.base_url());
        let engine = EngineHandle::new(Arc::new(backend))?;
        Ok(Self { engine })
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Upload { seq, path } => {
                    scanner_info!("Upload seq={} path={}", seq, path.display());
                    self.engine.upload(seq, path);
                }
                Effect::Search { seq, query } => {
                    scanner_info!("Search seq={} query={:?}", seq, query);
                    self.engine.search(seq, query);
                }
                Effect::FetchListing { listing, seq } => {
                    scanner_debug!("FetchListing {:?} seq={}", listing, seq);
                    self.engine.list_sources(collection_for(listing), seq);
                }
                Effect::ScheduleDismiss { token, after } => {
                    self.engine.arm_timer(token, after);
                }
                Effect::CancelDismiss { token } => {
                    self.engine.disarm_timer(token);
                }
                Effect::Diagnostic { flow, message } => {
                    scanner_warn!("[{}] {}", flow, message);
                }
            }
        }
    }

    /// Next finished engine event as a core message, if any.
    pub fn poll(&self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }

    /// Blocks up to `timeout` for the next engine event.
    pub fn wait(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::UploadCompleted { seq, result } => Msg::UploadDone {
            seq,
            result: result.map_err(map_error),
        },
        EngineEvent::SearchCompleted { seq, result } => Msg::SearchDone {
            seq,
            result: result
                .map(|results| results.into_iter().map(map_search_result).collect())
                .map_err(map_error),
        },
        EngineEvent::SourcesLoaded {
            collection,
            seq,
            result,
        } => Msg::ListingLoaded {
            listing: listing_for(collection),
            seq,
            result: result
                .map(|sources| sources.into_iter().map(map_source).collect())
                .map_err(map_error),
        },
        EngineEvent::TimerFired { token } => Msg::DismissTimerElapsed { token },
    }
}

fn map_error(err: ApiError) -> RequestError {
    RequestError::new(err.detail.clone(), err.to_string())
}

fn map_search_result(result: ApiSearchResult) -> SearchResult {
    SearchResult {
        title: result.title,
        link: result.link,
        domain: result.domain,
        description: result.description,
        is_new: result.is_new,
    }
}

fn map_source(source: ApiSource) -> Source {
    let timestamp = match (source.created_at, source.found_at) {
        (Some(created), _) => Some(SourceTimestamp::Created(created)),
        (None, Some(found)) => Some(SourceTimestamp::Discovered(found)),
        (None, None) => None,
    };
    Source {
        domain: source.domain,
        name: source.name,
        url: source.url,
        timestamp,
    }
}

fn collection_for(listing: Listing) -> SourceCollection {
    match listing {
        Listing::Known => SourceCollection::Known,
        Listing::New => SourceCollection::New,
    }
}

fn listing_for(collection: SourceCollection) -> Listing {
    match collection {
        SourceCollection::Known => Listing::Known,
        SourceCollection::New => Listing::New,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_source(created_at: Option<&str>, found_at: Option<&str>) -> ApiSource {
        ApiSource {
            domain: "a.example".to_string(),
            name: "A".to_string(),
            url: "https://a.example".to_string(),
            created_at: created_at.map(ToOwned::to_owned),
            found_at: found_at.map(ToOwned::to_owned),
        }
    }

    #[test]
    fn source_prefers_creation_time() {
        let source = map_source(api_source(Some("2024-01-01"), Some("2024-02-02")));
        assert_eq!(
            source.timestamp,
            Some(SourceTimestamp::Created("2024-01-01".to_string()))
        );

        let source = map_source(api_source(None, Some("2024-02-02")));
        assert_eq!(
            source.timestamp,
            Some(SourceTimestamp::Discovered("2024-02-02".to_string()))
        );

        assert_eq!(map_source(api_source(None, None)).timestamp, None);
    }

    #[test]
    fn timer_event_becomes_dismiss_message() {
        assert_eq!(
            map_event(EngineEvent::TimerFired { token: 3 }),
            Msg::DismissTimerElapsed { token: 3 }
        );
    }

    #[test]
    fn listing_and_collection_round_trip() {
        for listing in [Listing::Known, Listing::New] {
            assert_eq!(listing_for(collection_for(listing)), listing);
        }
    }
}

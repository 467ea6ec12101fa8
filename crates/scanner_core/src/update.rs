use std::path::PathBuf;

use crate::{
    AppState, Completion, Effect, FlowKind, Listing, Msg, NotificationToken, Phase, RequestError,
    RequestSeq, SearchResult, Severity, Source, ViewMode,
};

pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully";
pub const UPLOAD_FALLBACK_REASON: &str = "File upload failed";
pub const SEARCH_FALLBACK_REASON: &str = "Search failed";
pub const LISTING_FALLBACK_REASON: &str = "Could not load sources";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::SearchSubmitted(raw) => {
            let query = raw.trim();
            if query.is_empty() {
                return (state, Vec::new());
            }
            let query = query.to_owned();
            let seq = state.begin_search(query.clone());
            vec![Effect::Search { seq, query }]
        }
        Msg::UploadSubmitted(path) => {
            if state.options().single_upload_in_flight && state.upload().is_pending() {
                let message = format!(
                    "rejected upload of {}: another upload is still in flight",
                    path.display()
                );
                return (state, vec![diagnostic(FlowKind::Upload, message)]);
            }
            let seq = state.begin_upload(path.clone());
            vec![Effect::Upload { seq, path }]
        }
        Msg::ViewSelected(mode) => {
            state.set_view(mode);
            if mode == ViewMode::Listings && listings_never_requested(&state) {
                load_listings(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::ListingTabSelected(tab) => {
            state.set_listing_tab(tab);
            Vec::new()
        }
        Msg::RefreshListings => load_listings(&mut state),
        Msg::DismissClicked => match state.dismiss_notification() {
            Some(token) => vec![Effect::CancelDismiss { token }],
            None => Vec::new(),
        },
        Msg::DismissTimerElapsed { token } => {
            state.expire_notification(token);
            Vec::new()
        }
        Msg::UploadDone { seq, result } => settle_upload(&mut state, seq, result),
        Msg::SearchDone { seq, result } => settle_search(&mut state, seq, result),
        Msg::ListingLoaded {
            listing,
            seq,
            result,
        } => settle_listing(&mut state, listing, seq, result),
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

fn listings_never_requested(state: &AppState) -> bool {
    state.listing(Listing::Known).phase() == Phase::Idle
        && state.listing(Listing::New).phase() == Phase::Idle
}

fn load_listings(state: &mut AppState) -> Vec<Effect> {
    [Listing::Known, Listing::New]
        .into_iter()
        .map(|listing| {
            let seq = state.listing_mut(listing).begin();
            Effect::FetchListing { listing, seq }
        })
        .collect()
}

fn settle_upload(
    state: &mut AppState,
    seq: RequestSeq,
    result: Result<(), RequestError>,
) -> Vec<Effect> {
    let Some(completion) = state.finish_request(FlowKind::Upload, seq) else {
        return vec![ignored_completion(FlowKind::Upload, seq)];
    };
    let path = state.take_upload(seq).unwrap_or_else(PathBuf::new);
    let is_latest = completion == Completion::Latest;

    // Every finished upload was an explicit action and gets its own
    // notification; only the latest one drives the flow's phase.
    let mut effects = Vec::new();
    let token = match result {
        Ok(()) => {
            if is_latest {
                state.upload_mut().succeed(path);
            }
            state.notify(UPLOAD_SUCCESS_MESSAGE.to_string(), Severity::Success)
        }
        Err(err) => {
            let reason = err.reason(UPLOAD_FALLBACK_REASON);
            effects.push(diagnostic(
                FlowKind::Upload,
                format!("upload of {} failed: {}", path.display(), err.cause),
            ));
            if is_latest {
                state.upload_mut().fail(reason.clone());
            }
            state.notify(reason, Severity::Error)
        }
    };
    effects.push(schedule_dismiss(state, token));
    effects
}

fn settle_search(
    state: &mut AppState,
    seq: RequestSeq,
    result: Result<Vec<SearchResult>, RequestError>,
) -> Vec<Effect> {
    let Some(completion) = state.finish_request(FlowKind::Search, seq) else {
        return vec![ignored_completion(FlowKind::Search, seq)];
    };
    if completion == Completion::Superseded && state.options().fence_stale_search {
        let latest = state.search().latest_seq();
        return vec![diagnostic(
            FlowKind::Search,
            format!("discarded response #{seq}: superseded by request #{latest}"),
        )];
    }

    let mut effects = Vec::new();
    let token = match result {
        Ok(results) => {
            let count = results.len();
            state.search_mut().succeed(results);
            state.notify(format!("Found {count} results"), Severity::Success)
        }
        Err(err) => {
            let reason = err.reason(SEARCH_FALLBACK_REASON);
            effects.push(diagnostic(
                FlowKind::Search,
                format!("request #{seq} failed: {}", err.cause),
            ));
            let flow = state.search_mut();
            flow.set_data(Vec::new());
            flow.fail(reason.clone());
            state.notify(reason, Severity::Error)
        }
    };
    effects.push(schedule_dismiss(state, token));
    effects
}

fn settle_listing(
    state: &mut AppState,
    listing: Listing,
    seq: RequestSeq,
    result: Result<Vec<Source>, RequestError>,
) -> Vec<Effect> {
    let kind = FlowKind::Listing(listing);
    match state.finish_request(kind, seq) {
        Some(Completion::Latest) => {}
        Some(Completion::Superseded) => {
            return vec![diagnostic(
                kind,
                format!("discarded response #{seq}: a reload is in progress"),
            )];
        }
        None => return vec![ignored_completion(kind, seq)],
    }

    match result {
        Ok(sources) => {
            state.listing_mut(listing).succeed(sources);
            Vec::new()
        }
        Err(err) => {
            // Listings load in the background; failures are only logged.
            let flow = state.listing_mut(listing);
            flow.ensure_data();
            flow.fail(err.reason(LISTING_FALLBACK_REASON));
            vec![diagnostic(kind, format!("loading failed: {}", err.cause))]
        }
    }
}

fn schedule_dismiss(state: &AppState, token: NotificationToken) -> Effect {
    Effect::ScheduleDismiss {
        token,
        after: state.options().notification_timeout,
    }
}

fn ignored_completion(flow: FlowKind, seq: RequestSeq) -> Effect {
    diagnostic(
        flow,
        format!("ignored completion #{seq}: unknown or already settled"),
    )
}

fn diagnostic(flow: FlowKind, message: String) -> Effect {
    Effect::Diagnostic { flow, message }
}

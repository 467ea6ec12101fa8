use crate::{AppState, Listing, Phase, SearchResult, Severity, Source, ViewMode};

/// Shown in place of a source date when the backend supplied none.
pub const UNKNOWN_TIMESTAMP: &str = "unknown";
pub const NEW_SOURCE_LABEL: &str = "New source";
pub const KNOWN_SOURCE_LABEL: &str = "Known source";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub view: ViewMode,
    pub search: SearchView,
    pub upload: UploadView,
    pub listings: ListingsView,
    pub notification: Option<NotificationView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchView {
    pub phase: Phase,
    pub is_loading: bool,
    pub query: Option<String>,
    pub rows: Vec<SearchRowView>,
    pub summary: Option<SearchSummary>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchSummary {
    pub total: usize,
    pub new_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRowView {
    pub title: String,
    pub link: String,
    pub domain: String,
    pub description: String,
    pub is_new: bool,
    pub status_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadView {
    pub phase: Phase,
    pub in_flight: Vec<String>,
    pub last_uploaded: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingsView {
    pub active: Listing,
    pub known: ListingView,
    pub new: ListingView,
}

impl ListingsView {
    pub fn active_listing(&self) -> &ListingView {
        match self.active {
            Listing::Known => &self.known,
            Listing::New => &self.new,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListingView {
    pub phase: Phase,
    pub heading: String,
    pub rows: Vec<SourceRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRowView {
    pub domain: String,
    pub name: String,
    pub url: String,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationView {
    pub message: String,
    pub severity: Severity,
}

impl AppViewModel {
    pub(crate) fn from_state(state: &AppState, dirty: bool) -> Self {
        let notification = state.notification();
        Self {
            view: state.view_mode(),
            search: search_view(state),
            upload: upload_view(state),
            listings: ListingsView {
                active: state.listing_tab(),
                known: listing_view(state, Listing::Known),
                new: listing_view(state, Listing::New),
            },
            notification: notification.is_visible().then(|| NotificationView {
                message: notification.message().to_string(),
                severity: notification.severity(),
            }),
            dirty,
        }
    }
}

fn search_view(state: &AppState) -> SearchView {
    let flow = state.search();
    let results = flow.data().map(Vec::as_slice).unwrap_or_default();
    let summary = (flow.phase() == Phase::Succeeded).then(|| SearchSummary {
        total: results.len(),
        new_count: results.iter().filter(|result| result.is_new).count(),
    });
    SearchView {
        phase: flow.phase(),
        is_loading: flow.is_pending(),
        query: state.last_query().map(ToOwned::to_owned),
        rows: results.iter().map(search_row).collect(),
        summary,
        error: flow.error().map(ToOwned::to_owned),
    }
}

fn search_row(result: &SearchResult) -> SearchRowView {
    SearchRowView {
        title: result.title.clone(),
        link: result.link.clone(),
        domain: result.domain.clone(),
        description: result.description.clone(),
        is_new: result.is_new,
        status_label: if result.is_new {
            NEW_SOURCE_LABEL
        } else {
            KNOWN_SOURCE_LABEL
        },
    }
}

fn upload_view(state: &AppState) -> UploadView {
    let flow = state.upload();
    UploadView {
        phase: flow.phase(),
        in_flight: state
            .uploads_in_flight()
            .map(|path| path.display().to_string())
            .collect(),
        last_uploaded: flow.data().map(|path| path.display().to_string()),
        error: flow.error().map(ToOwned::to_owned),
    }
}

fn listing_view(state: &AppState, listing: Listing) -> ListingView {
    let flow = state.listing(listing);
    let sources = flow.data().map(Vec::as_slice).unwrap_or_default();
    let label = match listing {
        Listing::Known => "Known sources",
        Listing::New => "New sources",
    };
    ListingView {
        phase: flow.phase(),
        heading: format!("{label} ({})", sources.len()),
        rows: sources.iter().map(source_row).collect(),
    }
}

fn source_row(source: &Source) -> SourceRowView {
    SourceRowView {
        domain: source.domain.clone(),
        name: source.name.clone(),
        url: source.url.clone(),
        date: source
            .timestamp
            .as_ref()
            .map(|timestamp| timestamp.as_str().to_string())
            .unwrap_or_else(|| UNKNOWN_TIMESTAMP.to_string()),
    }
}

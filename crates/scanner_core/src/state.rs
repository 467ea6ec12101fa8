use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::flow::{Completion, FlowState, RequestSeq};
use crate::notification::{NotificationState, NotificationToken, Severity};
use crate::view_model::AppViewModel;
use crate::{FlowKind, Listing, SearchResult, Source};

/// How long a notification stays visible before the auto-dismiss timer fires.
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(6);

/// Which top-level view the front end presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Search,
    Listings,
    Upload,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Search, ViewMode::Listings, ViewMode::Upload];

    pub fn index(self) -> usize {
        match self {
            ViewMode::Search => 0,
            ViewMode::Listings => 1,
            ViewMode::Upload => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Behaviour switches for the orchestration core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreOptions {
    pub notification_timeout: Duration,
    /// Discard search completions that are not from the latest issued query.
    pub fence_stale_search: bool,
    /// Reject a new upload while one is already pending.
    pub single_upload_in_flight: bool,
}

impl Default for CoreOptions {
    fn default() -> Self {
        Self {
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
            fence_stale_search: true,
            single_upload_in_flight: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    options: CoreOptions,
    view: ViewMode,
    listing_tab: Listing,
    upload: FlowState<PathBuf>,
    uploads_in_flight: BTreeMap<RequestSeq, PathBuf>,
    search: FlowState<Vec<SearchResult>>,
    last_query: Option<String>,
    known_sources: FlowState<Vec<Source>>,
    new_sources: FlowState<Vec<Source>>,
    notification: NotificationState,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CoreOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &CoreOptions {
        &self.options
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view
    }

    pub fn listing_tab(&self) -> Listing {
        self.listing_tab
    }

    pub fn upload(&self) -> &FlowState<PathBuf> {
        &self.upload
    }

    pub fn uploads_in_flight(&self) -> impl Iterator<Item = &PathBuf> {
        self.uploads_in_flight.values()
    }

    pub fn search(&self) -> &FlowState<Vec<SearchResult>> {
        &self.search
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    pub fn listing(&self, listing: Listing) -> &FlowState<Vec<Source>> {
        match listing {
            Listing::Known => &self.known_sources,
            Listing::New => &self.new_sources,
        }
    }

    pub fn notification(&self) -> &NotificationState {
        &self.notification
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel::from_state(self, self.dirty)
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_view(&mut self, view: ViewMode) {
        if self.view != view {
            self.view = view;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_listing_tab(&mut self, tab: Listing) {
        if self.listing_tab != tab {
            self.listing_tab = tab;
            self.mark_dirty();
        }
    }

    pub(crate) fn notify(&mut self, message: String, severity: Severity) -> NotificationToken {
        self.mark_dirty();
        self.notification.notify(message, severity)
    }

    pub(crate) fn dismiss_notification(&mut self) -> Option<NotificationToken> {
        let hidden = self.notification.dismiss();
        if hidden.is_some() {
            self.mark_dirty();
        }
        hidden
    }

    pub(crate) fn expire_notification(&mut self, token: NotificationToken) -> bool {
        let hidden = self.notification.expire(token);
        if hidden {
            self.mark_dirty();
        }
        hidden
    }

    /// Settles the bookkeeping for request `seq` of `flow` without touching
    /// its phase or data.
    pub(crate) fn finish_request(&mut self, flow: FlowKind, seq: RequestSeq) -> Option<Completion> {
        match flow {
            FlowKind::Upload => self.upload.finish(seq),
            FlowKind::Search => self.search.finish(seq),
            FlowKind::Listing(Listing::Known) => self.known_sources.finish(seq),
            FlowKind::Listing(Listing::New) => self.new_sources.finish(seq),
        }
    }

    pub(crate) fn begin_upload(&mut self, path: PathBuf) -> RequestSeq {
        let seq = self.upload.begin();
        self.uploads_in_flight.insert(seq, path);
        self.mark_dirty();
        seq
    }

    /// Removes the in-flight record for `seq`, returning the file it carried.
    pub(crate) fn take_upload(&mut self, seq: RequestSeq) -> Option<PathBuf> {
        self.uploads_in_flight.remove(&seq)
    }

    pub(crate) fn upload_mut(&mut self) -> &mut FlowState<PathBuf> {
        self.mark_dirty();
        &mut self.upload
    }

    pub(crate) fn begin_search(&mut self, query: String) -> RequestSeq {
        let seq = self.search.begin();
        self.search.set_data(Vec::new());
        self.last_query = Some(query);
        self.mark_dirty();
        seq
    }

    pub(crate) fn search_mut(&mut self) -> &mut FlowState<Vec<SearchResult>> {
        self.mark_dirty();
        &mut self.search
    }

    pub(crate) fn listing_mut(&mut self, listing: Listing) -> &mut FlowState<Vec<Source>> {
        self.mark_dirty();
        match listing {
            Listing::Known => &mut self.known_sources,
            Listing::New => &mut self.new_sources,
        }
    }
}

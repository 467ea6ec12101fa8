//! Scanner core: pure request/notification state machine and view-model helpers.
mod effect;
mod flow;
mod model;
mod msg;
mod notification;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use flow::{Completion, FlowState, Phase, RequestSeq};
pub use model::{FlowKind, Listing, RequestError, SearchResult, Source, SourceTimestamp};
pub use msg::Msg;
pub use notification::{NotificationState, NotificationToken, Severity};
pub use state::{AppState, CoreOptions, ViewMode, DEFAULT_NOTIFICATION_TIMEOUT};
pub use update::{
    update, LISTING_FALLBACK_REASON, SEARCH_FALLBACK_REASON, UPLOAD_FALLBACK_REASON,
    UPLOAD_SUCCESS_MESSAGE,
};
pub use view_model::{
    AppViewModel, ListingView, ListingsView, NotificationView, SearchRowView, SearchSummary,
    SearchView, SourceRowView, UploadView, KNOWN_SOURCE_LABEL, NEW_SOURCE_LABEL,
    UNKNOWN_TIMESTAMP,
};

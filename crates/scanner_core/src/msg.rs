use std::path::PathBuf;

use crate::{Listing, NotificationToken, RequestError, RequestSeq, SearchResult, Source, ViewMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User submitted a search query (raw, untrimmed).
    SearchSubmitted(String),
    /// User picked a file to import.
    UploadSubmitted(PathBuf),
    /// User switched the top-level view.
    ViewSelected(ViewMode),
    /// User switched between the known/new tables in the listings view.
    ListingTabSelected(Listing),
    /// User asked to reload both listings.
    RefreshListings,
    /// User closed the notification.
    DismissClicked,
    /// Auto-dismiss timer for the notification `token` ran out.
    DismissTimerElapsed { token: NotificationToken },
    /// Engine completion for an upload.
    UploadDone {
        seq: RequestSeq,
        result: Result<(), RequestError>,
    },
    /// Engine completion for a search.
    SearchDone {
        seq: RequestSeq,
        result: Result<Vec<SearchResult>, RequestError>,
    },
    /// Engine completion for one of the source listings.
    ListingLoaded {
        listing: Listing,
        seq: RequestSeq,
        result: Result<Vec<Source>, RequestError>,
    },
    /// UI/render tick to coalesce rendering.
    Tick,
}

use std::path::PathBuf;
use std::time::Duration;

use crate::{FlowKind, Listing, NotificationToken, RequestSeq};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Upload { seq: RequestSeq, path: PathBuf },
    Search { seq: RequestSeq, query: String },
    FetchListing { listing: Listing, seq: RequestSeq },
    ScheduleDismiss { token: NotificationToken, after: Duration },
    CancelDismiss { token: NotificationToken },
    /// Something worth logging that the operator is not told about.
    Diagnostic { flow: FlowKind, message: String },
}

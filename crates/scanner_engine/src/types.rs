use std::fmt;
use std::time::Duration;

use crate::wire::{ApiSearchResult, ApiSource};

/// Per-flow request sequence number, echoed back on completion.
pub type RequestSeq = u64;
pub type TimerToken = u64;

/// The two source listings the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCollection {
    Known,
    New,
}

impl SourceCollection {
    pub fn endpoint(self) -> &'static str {
        match self {
            SourceCollection::Known => "known-sources",
            SourceCollection::New => "new-sources",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    UploadCompleted {
        seq: RequestSeq,
        result: Result<(), ApiError>,
    },
    SearchCompleted {
        seq: RequestSeq,
        result: Result<Vec<ApiSearchResult>, ApiError>,
    },
    SourcesLoaded {
        collection: SourceCollection,
        seq: RequestSeq,
        result: Result<Vec<ApiSource>, ApiError>,
    },
    TimerFired {
        token: TimerToken,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EngineCommand {
    Upload {
        seq: RequestSeq,
        path: std::path::PathBuf,
    },
    Search {
        seq: RequestSeq,
        query: String,
    },
    ListSources {
        collection: SourceCollection,
        seq: RequestSeq,
    },
    ArmTimer {
        token: TimerToken,
        after: Duration,
    },
    DisarmTimer {
        token: TimerToken,
    },
}

/// Failure of one backend request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
    /// `detail` field of the backend's error body, when it sent one.
    pub detail: Option<String>,
}

impl ApiError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    pub(crate) fn with_detail(mut self, detail: Option<String>) -> Self {
        self.detail = detail;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    Decode,
    FileRead,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::FileRead => write!(f, "file read error"),
        }
    }
}

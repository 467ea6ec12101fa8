use std::fmt;

/// One search hit as classified by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub domain: String,
    pub description: String,
    pub is_new: bool,
}

/// When a source entered the system. Known sources carry a creation time,
/// newly discovered ones a discovery time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTimestamp {
    Created(String),
    Discovered(String),
}

impl SourceTimestamp {
    pub fn as_str(&self) -> &str {
        match self {
            SourceTimestamp::Created(value) | SourceTimestamp::Discovered(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub domain: String,
    pub name: String,
    pub url: String,
    pub timestamp: Option<SourceTimestamp>,
}

/// The two backend source collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Listing {
    #[default]
    Known,
    New,
}

/// Flows tracked by the core, used to tag diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    Upload,
    Search,
    Listing(Listing),
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowKind::Upload => write!(f, "upload"),
            FlowKind::Search => write!(f, "search"),
            FlowKind::Listing(Listing::Known) => write!(f, "known-sources"),
            FlowKind::Listing(Listing::New) => write!(f, "new-sources"),
        }
    }
}

/// Failure of one backend request as seen by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestError {
    /// Human-readable reason supplied by the backend, if any.
    pub detail: Option<String>,
    /// Diagnostic description of what went wrong (status, transport error).
    pub cause: String,
}

impl RequestError {
    pub fn new(detail: Option<String>, cause: impl Into<String>) -> Self {
        Self {
            detail: detail.filter(|text| !text.trim().is_empty()),
            cause: cause.into(),
        }
    }

    /// Reason to show the operator: backend detail, else `fallback`.
    pub fn reason(&self, fallback: &str) -> String {
        self.detail
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

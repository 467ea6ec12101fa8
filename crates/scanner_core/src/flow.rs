use std::collections::BTreeSet;

/// Per-flow request sequence number. `0` means no request has been issued yet.
pub type RequestSeq = u64;

/// How a finished request relates to the rest of its flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The request is the most recently issued one.
    Latest,
    /// A newer request of the same flow was issued after this one.
    Superseded,
}

/// Lifecycle stage of a flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_settled(self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }
}

/// Lifecycle state of one flow, generic over its payload.
///
/// `data` keeps the last successful payload; a failure never clears it.
/// `Idle` is only the initial phase: once a request has been issued the flow
/// moves between `Pending` and the two settled phases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowState<T> {
    phase: Phase,
    data: Option<T>,
    error: Option<String>,
    latest_seq: RequestSeq,
    in_flight: BTreeSet<RequestSeq>,
}

impl<T> Default for FlowState<T> {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            data: None,
            error: None,
            latest_seq: 0,
            in_flight: BTreeSet::new(),
        }
    }
}

impl<T> FlowState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn latest_seq(&self) -> RequestSeq {
        self.latest_seq
    }

    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }

    /// Issues a new request and returns its sequence number.
    pub(crate) fn begin(&mut self) -> RequestSeq {
        self.latest_seq += 1;
        self.phase = Phase::Pending;
        self.error = None;
        self.in_flight.insert(self.latest_seq);
        self.latest_seq
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Marks request `seq` as finished.
    ///
    /// Returns `None` for a sequence number that was never issued or has
    /// already finished, so each request settles at most once.
    pub(crate) fn finish(&mut self, seq: RequestSeq) -> Option<Completion> {
        if !self.in_flight.remove(&seq) {
            return None;
        }
        if seq == self.latest_seq {
            Some(Completion::Latest)
        } else {
            Some(Completion::Superseded)
        }
    }

    pub(crate) fn succeed(&mut self, data: T) {
        self.phase = Phase::Succeeded;
        self.data = Some(data);
        self.error = None;
    }

    pub(crate) fn fail(&mut self, reason: String) {
        self.phase = Phase::Failed;
        self.error = Some(reason);
    }

    pub(crate) fn set_data(&mut self, data: T) {
        self.data = Some(data);
    }

    pub(crate) fn ensure_data(&mut self)
    where
        T: Default,
    {
        if self.data.is_none() {
            self.data = Some(T::default());
        }
    }
}

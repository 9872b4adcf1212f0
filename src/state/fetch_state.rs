use std::fmt;

/// Represents where a URL is in its fetch lifecycle
///
/// ```text
/// Queued -> Dispatched -> Fetching -> ContentReady -> Extracted -> Saved -----> Done
///                                  \                           \-> SaveFailed -/
///                                   \-> Failed ----------------------------> Done
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchState {
    // ===== Waiting =====
    /// In the frontier queue
    Queued,

    /// Selected into a batch and marked visited
    Dispatched,

    // ===== In flight =====
    /// A page is open and navigating
    Fetching,

    /// The rendered document was retrieved
    ContentReady,

    /// Navigation timed out, gave no response, or returned status >= 400
    Failed,

    /// Main content was extracted for the artifact writer
    Extracted,

    /// The markdown artifact was written
    Saved,

    /// Conversion or writing of the artifact failed
    SaveFailed,

    // ===== Finished =====
    /// The page was released and the pacing delay has elapsed
    Done,
}

impl FetchState {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: FetchState) -> bool {
        use FetchState::*;

        matches!(
            (self, next),
            (Queued, Dispatched)
                | (Dispatched, Fetching)
                | (Fetching, ContentReady)
                | (Fetching, Failed)
                | (ContentReady, Extracted)
                | (Extracted, Saved)
                | (Extracted, SaveFailed)
                | (Saved, Done)
                | (SaveFailed, Done)
                | (Failed, Done)
        )
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Dispatched => "dispatched",
            Self::Fetching => "fetching",
            Self::ContentReady => "content_ready",
            Self::Failed => "failed",
            Self::Extracted => "extracted",
            Self::Saved => "saved",
            Self::SaveFailed => "save_failed",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for FetchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

//! Per-entry records collected for the run summary.

/// Result of one mapping entry, for summary reporting.
#[derive(Debug, Clone)]
pub struct EntryRecord {
    /// Human-readable description of the link (`target -> source`).
    pub name: String,
    /// Final status of the entry.
    pub status: EntryStatus,
    /// Optional detail (e.g. the backup path or the failure reason).
    pub message: Option<String>,
}

/// Final status of a mapping entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// The link was created.
    Linked,
    /// The link already pointed to the source.
    AlreadyLinked,
    /// A conflicting target was backed up or removed and the link created.
    Replaced,
    /// Nothing exists at the target yet; reported by `check` only.
    Pending,
    /// The target is occupied and was left alone.
    Conflict,
    /// The entry could not be brought into the desired state.
    Failed,
}

impl EntryStatus {
    /// Every status, in summary order.
    pub const ALL: [Self; 6] = [
        Self::Linked,
        Self::AlreadyLinked,
        Self::Replaced,
        Self::Pending,
        Self::Conflict,
        Self::Failed,
    ];

    /// Returns `true` for statuses that make a `link` run fail.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Conflict | Self::Failed)
    }

    /// Short label used in the summary.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Linked => "linked",
            Self::AlreadyLinked => "already linked",
            Self::Replaced => "replaced",
            Self::Pending => "pending",
            Self::Conflict => "conflict",
            Self::Failed => "failed",
        }
    }

    /// Inverse of [`label`](Self::label).
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Marker printed in front of the entry in the summary.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Linked | Self::Replaced => "✓",
            Self::AlreadyLinked => "·",
            Self::Pending => "○",
            Self::Conflict | Self::Failed => "✗",
        }
    }
}

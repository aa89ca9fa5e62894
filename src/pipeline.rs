//! Pipeline stage ladder.
//!
//! The pipeline is strictly linear; stages advance in this order and never
//! transition backward. A failure is terminal for the invocation, and
//! recovery is always a fresh run from `Pending`.

use std::fmt;

/// Progress states shared by the build, fix, and bundle commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    /// Nothing has run yet
    Pending,
    /// A container engine passed both probes
    RuntimeSelected,
    /// The build image is available locally
    ImagePulled,
    /// The containerized build exited zero
    Built,
    /// The artifact exists at the conventional path
    Validated,
    /// Packaging metadata was regenerated
    Postprocessed,
    /// The store bundle was assembled
    Bundled,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::RuntimeSelected => "runtime selected",
            Self::ImagePulled => "image pulled",
            Self::Built => "built",
            Self::Validated => "validated",
            Self::Postprocessed => "postprocessed",
            Self::Bundled => "bundled",
        };
        f.write_str(label)
    }
}

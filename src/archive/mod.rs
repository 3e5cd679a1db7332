pub mod empty;
pub mod finalize;
pub mod populate;

/// Extension the finished archive is renamed to
pub const EXTENSION: &str = "tcx";

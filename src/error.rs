use std::path::PathBuf;

/// Errors surfaced to the host. Element-level misuse (unknown ids, wrong element kind)
/// is never an error: those calls are no-ops.
#[derive(thiserror::Error, Debug)]
pub enum WidgetError {
    #[error("failed to load font {}: {source}", path.display())]
    FontLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font file {} does not declare a family name", path.display())]
    FontFamilyMissing { path: PathBuf },

    #[error("invalid hex color literal: {0:?}")]
    InvalidColor(String),

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

pub type Result<T, E = WidgetError> = std::result::Result<T, E>;

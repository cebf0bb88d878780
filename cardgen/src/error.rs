use thiserror::Error;

/// Failures while rendering a batch of cards.
///
/// Input and font failures abort the whole run. Asset failures are
/// per-card and the batch keeps going without the asset.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The input table could not be read or parsed.
    #[error("cannot read input table {path}: {reason}")]
    InvalidInputSource { path: String, reason: String },

    /// An expected asset file is absent on disk.
    #[error("missing asset: {0}")]
    MissingAsset(String),

    /// An asset file exists but could not be decoded.
    #[error("corrupt asset: {0}")]
    CorruptAsset(String),

    /// None of the serif font files under the fonts directory loaded.
    #[error("no usable serif font under {0}")]
    NoUsableFont(String),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

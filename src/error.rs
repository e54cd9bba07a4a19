use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("asset missing: {name}")]
    AssetMissing { name: String },

    #[error("asset {name} is unusable: {reason}")]
    AssetInvalid { name: String, reason: String },

    #[error("no audio output: {0}")]
    AudioStream(#[from] rodio::StreamError),

    #[error("cannot play audio: {0}")]
    AudioPlay(#[from] rodio::PlayError),
}

impl Error {
    pub(crate) fn invalid(name: &str, reason: impl Into<String>) -> Self {
        Error::AssetInvalid {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

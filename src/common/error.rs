use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Id3WriterError {
    #[error("First argument should be a byte buffer holding the audio data")]
    InvalidConstructionArgument,

    #[error("Unsupported frame {0}")]
    UnsupportedFrame(String),

    #[error("{id} frame value should be {reason}")]
    InvalidFrameValue { id: String, reason: String },

    #[error("Unknown picture MIME type")]
    UnknownPictureMimeType,

    #[error("Tag size {0} does not fit in a 28-bit synchsafe integer")]
    TagTooLarge(u64),
}

impl Id3WriterError {
    pub(crate) fn invalid_value(id: &str, reason: impl Into<String>) -> Self {
        Id3WriterError::InvalidFrameValue {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(feature = "python")]
mod python {
    use super::Id3WriterError;
    use pyo3::create_exception;
    use pyo3::exceptions::PyException;

    // Python exception hierarchy rooted at ID3WriterError
    create_exception!(id3_writer, ID3WriterPyError, PyException);
    create_exception!(id3_writer, InvalidConstructionArgumentError, ID3WriterPyError);
    create_exception!(id3_writer, UnsupportedFrameError, ID3WriterPyError);
    create_exception!(id3_writer, InvalidFrameValueError, ID3WriterPyError);
    create_exception!(id3_writer, UnknownPictureMimeTypeError, ID3WriterPyError);
    create_exception!(id3_writer, TagTooLargeError, ID3WriterPyError);

    impl From<Id3WriterError> for pyo3::PyErr {
        fn from(err: Id3WriterError) -> pyo3::PyErr {
            let msg = err.to_string();
            match err {
                Id3WriterError::InvalidConstructionArgument => {
                    InvalidConstructionArgumentError::new_err(msg)
                }
                Id3WriterError::UnsupportedFrame(_) => UnsupportedFrameError::new_err(msg),
                Id3WriterError::InvalidFrameValue { .. } => InvalidFrameValueError::new_err(msg),
                Id3WriterError::UnknownPictureMimeType => {
                    UnknownPictureMimeTypeError::new_err(msg)
                }
                Id3WriterError::TagTooLarge(_) => TagTooLargeError::new_err(msg),
            }
        }
    }
}

#[cfg(feature = "python")]
pub use python::*;

pub type Result<T> = std::result::Result<T, Id3WriterError>;

use std::fmt;

#[derive(Debug)]
pub struct InvalidParameter {
    pub(crate) name: &'static str,
    pub(crate) value: String,
    pub(crate) expected: &'static str,
}

impl fmt::Display for InvalidParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "parameter '{}' - value '{}' is not one of {}",
            self.name, self.value, self.expected
        )
    }
}

#[derive(Debug)]
pub struct SizeMismatch {
    pub(crate) image: (u32, u32),
    pub(crate) mask: (u32, u32),
}

impl fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "the mask size ({}x{}) must match the image size ({}x{})",
            self.mask.0, self.mask.1, self.image.0, self.image.1
        )
    }
}

#[derive(Debug)]
pub enum Error {
    /// An error in the image library occurred, eg failed to load/save
    Image(image::ImageError),
    /// Io is notoriously error free with no problems, but we cover it just in case!
    Io(std::io::Error),
    /// A mask doesn't have the same dimensions as the image it applies to
    SizeMismatch(SizeMismatch),
    /// An enumerated parameter was given a value it doesn't have
    InvalidParameter(InvalidParameter),
    /// The selection doesn't cover any pixel of the image
    EmptySelection,
    /// There are no pixels around the selection to sample from
    NoSourcePoints,
    /// There are no selected pixels to fill
    NoTargetPoints,
    /// The user specified an image format we don't support as the output
    UnsupportedOutputFormat(String),
    /// The background fill worker went away before answering
    WorkerDisconnected,
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(ie) => write!(f, "{}", ie),
            Self::Io(io) => write!(f, "{}", io),
            Self::SizeMismatch(sm) => write!(f, "{}", sm),
            Self::InvalidParameter(ip) => write!(f, "{}", ip),
            Self::EmptySelection => write!(f, "the selection does not cover any part of the image"),
            Self::NoSourcePoints => write!(
                f,
                "there are no pixels around the selection to sample from, try a larger sample size"
            ),
            Self::NoTargetPoints => write!(f, "the selection does not contain any pixels to fill"),
            Self::UnsupportedOutputFormat(fmt) => {
                write!(f, "the output format '{}' is not supported", fmt)
            }
            Self::WorkerDisconnected => write!(f, "the fill worker thread has shut down"),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(ie: image::ImageError) -> Self {
        Self::Image(ie)
    }
}

impl From<std::io::Error> for Error {
    fn from(io: std::io::Error) -> Self {
        Self::Io(io)
    }
}

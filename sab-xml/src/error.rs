use std::fmt;

#[derive(Debug)]
pub enum Error {
    Write(String),
    Utf8(std::string::FromUtf8Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Write(detail) => write!(f, "failed to serialize XML document: {}", detail),
            Self::Utf8(e) => write!(f, "XML writer produced non-UTF-8 output: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::string::FromUtf8Error> for Error {
    fn from(e: std::string::FromUtf8Error) -> Self {
        Self::Utf8(e)
    }
}

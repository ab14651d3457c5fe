use std::fmt;

/// Per-file conversion failure, aggregating the error types a single
/// `Build`/`Xml`/`Html` conversion can fail with. Caught and logged at the
/// site-driver boundary (§7) rather than bubbled past a single file.
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Format(sab_format::Error),
    Xml(sab_xml::Error),
}

impl Error {
    /// A short tag for the error kind, for the `FAIL: {path} - {kind}: {message}`
    /// log line (§7).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io(_) => "Io",
            Self::Format(_) => "FormatError",
            Self::Xml(_) => "XmlError",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "{}", e),
            Self::Format(e) => write!(f, "{}", e),
            Self::Xml(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<sab_format::Error> for Error {
    fn from(e: sab_format::Error) -> Self {
        Self::Format(e)
    }
}

impl From<sab_xml::Error> for Error {
    fn from(e: sab_xml::Error) -> Self {
        Self::Xml(e)
    }
}

use std::fmt;

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    UnexpectedEof { offset: usize, needed: usize, available: usize },
    UnknownOpcode { offset: usize, byte: u8 },
    BadFormatVersion { obtained: u8 },
    UnexpectedEnd { offset: usize },
    UnknownKeywordIndex { offset: usize, index: u8 },
    RasterEncode(String),
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof { offset, needed, available }
                => write!(f, "unexpected EOF at offset {:#x}: needed {} byte(s), {} available", offset, needed, available),
            Self::UnknownOpcode { offset, byte }
                => write!(f, "unknown graphics opcode {} at offset {:#x}", byte, offset),
            Self::BadFormatVersion { obtained }
                => write!(f, "Bad graphics format version {}", obtained),
            Self::UnexpectedEnd { offset }
                => write!(f, "unexpected end-of-value sentinel at offset {:#x}", offset),
            Self::UnknownKeywordIndex { offset, index }
                => write!(f, "keyword index {} out of range at offset {:#x}", index, offset),
            Self::RasterEncode(detail)
                => write!(f, "failed to encode raster image as PNG: {}", detail),
        }
    }
}
impl std::error::Error for Error {}
impl From<genera_encoding::stream::Error> for Error {
    fn from(e: genera_encoding::stream::Error) -> Self {
        Self::UnexpectedEof { offset: e.offset, needed: e.needed, available: e.available }
    }
}

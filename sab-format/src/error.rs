use std::fmt;

use crate::opcode;


#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Error {
    BadIdPattern { obtained: u32 },
    BadVersion { obtained: u8 },
    UnexpectedEof { offset: usize, needed: usize, available: usize },
    UnknownOpcode { offset: usize, opcode: u8 },
    OpcodeMismatch { offset: usize, expected: u8, obtained: u8 },
    UnknownFieldName { offset: usize, name: String },
    SymbolIndexOutOfRange { offset: usize, index: u16, table_len: usize },
    MalformedFatString { offset: usize, detail: &'static str },
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadIdPattern { .. }
                => write!(f, "Not a SAB file"),
            Self::BadVersion { obtained }
                => write!(f, "Incompatible SAB version {}", obtained),
            Self::UnexpectedEof { offset, needed, available }
                => write!(f, "unexpected EOF at offset {:#x}: needed {} byte(s), {} available", offset, needed, available),
            Self::UnknownOpcode { offset, opcode }
                => write!(f, "unknown opcode {} at offset {:#x}", opcode, offset),
            Self::OpcodeMismatch { offset, expected, obtained }
                => write!(
                    f,
                    "opcode mismatch at offset {:#x}: expected {} ({}), found {} ({})",
                    offset, expected, opcode::name(*expected), obtained, opcode::name(*obtained),
                ),
            Self::UnknownFieldName { offset, name }
                => write!(f, "unknown field name {:?} at offset {:#x}", name, offset),
            Self::SymbolIndexOutOfRange { offset, index, table_len }
                => write!(f, "symbol index {} out of range at offset {:#x} (table has {} entries)", index, offset, table_len),
            Self::MalformedFatString { offset, detail }
                => write!(f, "malformed fat-string at offset {:#x}: {}", offset, detail),
        }
    }
}
impl std::error::Error for Error {}
impl From<genera_encoding::stream::Error> for Error {
    fn from(e: genera_encoding::stream::Error) -> Self {
        Self::UnexpectedEof { offset: e.offset, needed: e.needed, available: e.available }
    }
}

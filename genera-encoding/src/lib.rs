pub mod charset;
pub mod sexpr;
pub mod stream;

pub use charset::{LINE_BREAK_MARKER, PARAGRAPH_MARKER};
pub use stream::ByteStream;

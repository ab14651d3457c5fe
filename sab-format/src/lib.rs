pub mod error;
pub mod fat_string;
pub mod field_table;
pub mod file;
pub mod opcode;
pub mod reader;
pub mod symbol_table;
pub mod value;

pub use error::Error;
pub use file::{read_index_only, SabFile};
pub use reader::{value_to_unique_id, Reader};
pub use value::{
    CalleeEntry, CalleeTriple, Command, Environment, ExampleRecordMarker, IndexItem, Name,
    Picture, Record, Reference, UniqueId, Value,
};

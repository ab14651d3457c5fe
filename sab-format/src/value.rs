//! The SAB content-item AST (§3 DATA MODEL's "content item sum type"),
//! plus the record and index structures built on top of it.
//!
//! Ported from the dataclasses in `original_source/sab2html/sab_types.py`
//! (`SageRecord`, `SageEnvr`, `SageCommand`, `SageReference`, `SagePicture`,
//! `SageFunctionSpec`, `SageExampleRecordMarker`), reshaped into an enum so
//! the renderers downstream can exhaustively `match` on content kind instead
//! of duck-typing on a Python `Any`.

use display_bytes::DisplayBytesVec;
use genera_encoding::sexpr::Sexpr;

/// A record/reference/index-item name: either a plain symbol string or a
/// function-spec, which the Scheme original marks as "this names a callable"
/// (e.g. `(setf foo)`) rather than a plain symbol.
#[derive(Clone, Debug, PartialEq)]
pub enum Name {
    Plain(String),
    FunctionSpec(String),
}

impl Name {
    pub fn text(&self) -> &str {
        match self {
            Self::Plain(s) | Self::FunctionSpec(s) => s,
        }
    }

    pub fn is_function_spec(&self) -> bool {
        matches!(self, Self::FunctionSpec(_))
    }
}

/// `unique_id` may be a string or an integer (§3).
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum UniqueId {
    Str(String),
    Int(i64),
}

/// One content item. Mirrors the sum type in §3 DATA MODEL, with the
/// physical opcodes that are pure wire-format plumbing (field-alist,
/// field-name, envr-mods, ...) folded into the structures that use them
/// rather than appearing as their own variants here.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(String),
    Name(Name),
    Number(i64),
    Envr(Box<Environment>),
    Command(Box<Command>),
    Reference(Box<Reference>),
    Picture(Box<Picture>),
    ExampleRecordMarker(ExampleRecordMarker),
    List(Vec<Value>),
    LocationPair(i64, i64),
    CalleeList(Vec<CalleeEntry>),
    CalleeTripleList(Vec<CalleeTriple>),
    Index(Vec<IndexItem>),
    Sexpr(Sexpr),
    Bytes(DisplayBytesVec),
}

impl Value {
    /// Lisp nil, normalized the way opcodes 21/33/44 require: an empty list.
    pub fn nil() -> Self {
        Value::List(Vec::new())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::List(items) if items.is_empty())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Name(n) => Some(n.text()),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Environment {
    pub name: String,
    pub mods: Vec<(String, Value)>,
    pub contents: Vec<Value>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    pub name: String,
    pub parameter: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Reference {
    pub topic: Name,
    pub type_name: String,
    pub unique_id: Option<UniqueId>,
    pub view: Value,
    pub appearance: Option<String>,
    pub booleans: Vec<String>,
    pub field: Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Picture {
    pub type_name: String,
    pub file_name: Option<String>,
    pub display_name: String,
    pub raw: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExampleRecordMarker {
    pub type_name: String,
    pub encoding: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalleeEntry {
    pub topic: Name,
    pub type_name: String,
    pub called_how: String,
    pub unique_id: Option<UniqueId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalleeTriple {
    pub topic: Name,
    pub type_name: String,
    pub called_how: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct IndexItem {
    pub topic: Name,
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    pub name: Name,
    pub type_name: String,
    pub fields: Vec<(String, Value)>,
}

impl Record {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

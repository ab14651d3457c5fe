//! The SAB opcode dispatcher (§4.4). `Reader` owns a `ByteStream` and the
//! symbol table for whichever section is currently being read; callers reset
//! the table with [`Reader::begin_section`] at each section boundary (file
//! attributes, each record, the index), since symbol references never cross
//! one.
//!
//! Rather than the original's array of per-opcode reader functions, this
//! dispatches opcodes through one `match` in [`Reader::dispatch`] — the
//! exhaustiveness check is the compiler's job now, not a runtime lookup.

use genera_encoding::ByteStream;
use tracing::trace;

use crate::error::Error;
use crate::field_table;
use crate::fat_string;
use crate::opcode;
use crate::symbol_table::SymbolTable;
use crate::value::{
    CalleeEntry, CalleeTriple, Command, Environment, ExampleRecordMarker, IndexItem, Name,
    Picture, Record, Reference, UniqueId, Value,
};

pub struct Reader<'d> {
    stream: ByteStream<'d>,
    symbols: SymbolTable,
}

impl<'d> Reader<'d> {
    pub fn new(data: &'d [u8]) -> Self {
        Self { stream: ByteStream::new(data), symbols: SymbolTable::new() }
    }

    pub fn offset(&self) -> usize {
        self.stream.offset()
    }

    pub fn seek(&mut self, position: usize) {
        self.stream.seek(position);
    }

    pub fn eof(&self) -> bool {
        self.stream.eof()
    }

    /// Raw header reads that sit outside the opcode dispatch (id-pattern,
    /// version, the two section offsets).
    pub fn read_u32_raw(&mut self) -> Result<u32, Error> {
        Ok(self.stream.read_u32_le()?)
    }

    pub fn read_u8_raw(&mut self) -> Result<u8, Error> {
        Ok(self.stream.read_u8()?)
    }

    /// Symbol references never cross a section boundary; call this whenever
    /// crossing into file attributes, a fresh record, or the index.
    pub fn begin_section(&mut self) {
        self.symbols = SymbolTable::new();
    }

    fn expect_opcode(&mut self, expected: u8) -> Result<(), Error> {
        let offset = self.stream.offset();
        let obtained = self.stream.read_u8()?;
        if obtained != expected {
            return Err(Error::OpcodeMismatch { offset, expected, obtained });
        }
        Ok(())
    }

    /// Top-level dispatch: read one opcode byte and, if `expected` is given,
    /// enforce equality, else dispatch freely.
    pub fn read_thing(&mut self, expected: Option<u8>) -> Result<Value, Error> {
        let offset = self.stream.offset();
        let opcode = self.stream.read_u8()?;
        if let Some(exp) = expected {
            if opcode != exp {
                return Err(Error::OpcodeMismatch { offset, expected: exp, obtained: opcode });
            }
        }
        trace!(offset, opcode, name = opcode::name(opcode), "read_thing");
        self.dispatch(offset, opcode)
    }

    fn dispatch(&mut self, offset: usize, opcode: u8) -> Result<Value, Error> {
        use crate::opcode as op;
        match opcode {
            op::FUNCTION_SPEC => {
                let name = self.read_raw_short_string()?;
                Ok(Value::Name(Name::FunctionSpec(name)))
            },
            op::ENVR => Ok(Value::Envr(Box::new(self.read_envr()?))),
            op::CONTENTS_LIST | op::LIST => Ok(Value::List(self.read_value_list()?)),
            op::FIXNUM => Ok(Value::Number(self.stream.read_u32_le()? as i64)),
            op::STRING => Ok(Value::Text(self.read_short_latin1()?)),
            op::LONG_STRING => Ok(Value::Text(self.read_long_latin1()?)),
            op::SYMBOL_REF => {
                let index = self.stream.read_u16_le()?;
                let text = self.symbols.get(offset, index)?.to_string();
                Ok(Value::Name(Name::Plain(text)))
            },
            op::UNINTERNED_SYMBOL_DEF => self.read_symbol_def("uninterned:"),
            op::SAGE_PKG_SYMBOL_DEF => self.read_symbol_def(""),
            op::PKG_SYMBOL_DEF => self.read_symbol_def("<pkg>:"),
            op::DOC_PKG_SYMBOL_DEF => self.read_symbol_def("doc:"),
            op::KEYWORD_PKG_SYMBOL_DEF => self.read_symbol_def(":"),
            op::READ_FROM_STRING => {
                let text = self.read_short_latin1()?;
                Ok(Value::Sexpr(genera_encoding::sexpr::parse(&text)))
            },
            op::SIMPLE_COMMAND => {
                let name = self.read_symbol_opcode(op::SIMPLE_COMMAND_NAME)?;
                Ok(Value::Command(Box::new(Command { name, parameter: Value::nil() })))
            },
            op::COMMAND => {
                let name = self.read_symbol_opcode(op::COMMAND_NAME)?;
                let parameter = normalize_nil(self.read_thing(None)?);
                Ok(Value::Command(Box::new(Command { name, parameter })))
            },
            op::TYPE_SYMBOL
            | op::ENVR_NAME
            | op::ATTRIBUTE_NAME
            | op::SIMPLE_COMMAND_NAME
            | op::COMMAND_NAME
            | op::MACRO_NAME => self.read_thing(None),
            op::MACRO_CALL => {
                let name = self.read_symbol_opcode(op::MACRO_NAME)?;
                let parameter = normalize_nil(self.read_thing(None)?);
                Ok(Value::Command(Box::new(Command { name, parameter })))
            },
            op::LOCATION_PAIR => {
                let a = self.read_fixnum()?;
                let b = self.read_fixnum()?;
                Ok(Value::LocationPair(a, b))
            },
            op::INDEX => Ok(Value::Index(self.read_index_items()?)),
            op::CALLEE_TRIPLE_LIST => Ok(Value::CalleeTripleList(self.read_callee_triples()?)),
            op::FILE_ATTRIBUTE_ALIST | op::TOKEN_LIST | op::UNIQUE_ID | op::MODIFICATION_HISTORY => {
                self.read_thing(None)
            },
            op::REFERENCE | op::EXTENSIBLE_REFERENCE => {
                Ok(Value::Reference(Box::new(self.read_reference_v1()?)))
            },
            op::FAT_STRING => Ok(Value::Text(fat_string::read(&mut self.stream)?)),
            op::FILE_ATTRIBUTE_STRING => self.read_file_attribute_string(),
            op::CALLEE_4PLE_LIST => Ok(Value::CalleeList(self.read_callee_4ples()?)),
            op::PICTURE => Ok(Value::Picture(Box::new(self.read_picture()?))),
            op::EIGHT_BIT_ARRAY => {
                let len = self.stream.read_u32_le()? as usize;
                Ok(Value::Bytes(self.stream.read_bytes(len)?.to_vec().into()))
            },
            op::EXAMPLE_RECORD_MARKER => {
                let type_name = self.read_symbol_text()?;
                let encoding = self.read_symbol_text()?;
                Ok(Value::ExampleRecordMarker(ExampleRecordMarker { type_name, encoding }))
            },
            op::EXTENSIBLE_REFERENCE_TAKE_TWO => {
                Ok(Value::Reference(Box::new(self.read_reference_v2()?)))
            },
            op::CHARACTER => Ok(Value::Text(self.read_raw_short_string()?)),
            _ => Err(Error::UnknownOpcode { offset, opcode }),
        }
    }

    // -- symbols --------------------------------------------------------

    fn read_symbol_def(&mut self, prefix: &str) -> Result<Value, Error> {
        let raw = self.read_raw_short_string()?;
        let full = format!("{}{}", prefix, raw.to_lowercase());
        self.symbols.define(full.clone());
        Ok(Value::Name(Name::Plain(full)))
    }

    /// Read a "pass-through child" opcode (e.g. type-symbol, envr-name) that
    /// expects `expected` as its own leading byte and then delegates the
    /// rest of the read straight through.
    fn read_symbol_opcode(&mut self, expected: u8) -> Result<String, Error> {
        self.expect_opcode(expected)?;
        self.read_symbol_text()
    }

    fn read_symbol_text(&mut self) -> Result<String, Error> {
        let value = self.read_thing(None)?;
        Ok(value.as_text().unwrap_or_default().to_string())
    }

    fn read_name(&mut self) -> Result<Name, Error> {
        match self.read_thing(None)? {
            Value::Name(name) => Ok(name),
            Value::Text(text) => Ok(Name::Plain(text)),
            other => Ok(Name::Plain(other.as_text().unwrap_or_default().to_string())),
        }
    }

    // -- strings ----------------------------------------------------------

    fn read_raw_short_string(&mut self) -> Result<String, Error> {
        let len = self.stream.read_u8()? as usize;
        let raw = self.stream.read_bytes(len)?;
        Ok(genera_encoding::charset::recode(raw))
    }

    fn read_short_latin1(&mut self) -> Result<String, Error> {
        self.read_raw_short_string()
    }

    fn read_long_latin1(&mut self) -> Result<String, Error> {
        let len = self.stream.read_u32_le()? as usize;
        let raw = self.stream.read_bytes(len)?;
        Ok(genera_encoding::charset::recode(raw))
    }

    fn read_fixnum(&mut self) -> Result<i64, Error> {
        match self.read_thing(Some(opcode::FIXNUM))? {
            Value::Number(n) => Ok(n),
            _ => Ok(0),
        }
    }

    // -- composite structures ---------------------------------------------

    fn read_value_list(&mut self) -> Result<Vec<Value>, Error> {
        let count = self.stream.read_u16_le()?;
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(self.read_thing(None)?);
        }
        Ok(items)
    }

    fn read_field_name(&mut self) -> Result<(String, u8), Error> {
        let offset = self.stream.offset();
        self.expect_opcode(opcode::FIELD_NAME)?;
        let name = self.read_symbol_text()?;
        match field_table::expected_opcode(&name) {
            Some(expected) => Ok((name, expected)),
            None => Err(Error::UnknownFieldName { offset, name }),
        }
    }

    pub fn read_field_alist(&mut self) -> Result<Vec<(String, Value)>, Error> {
        let count = self.stream.read_u16_le()?;
        let mut fields = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (name, expected_opcode) = self.read_field_name()?;
            let value = self.read_thing(Some(expected_opcode))?;
            fields.push((name, value));
        }
        Ok(fields)
    }

    fn read_envr_mods(&mut self) -> Result<Vec<(String, Value)>, Error> {
        let count = self.stream.read_u16_le()?;
        let mut mods = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name = self.read_symbol_opcode(opcode::ATTRIBUTE_NAME)?;
            let value = self.read_thing(None)?;
            mods.push((name, value));
        }
        Ok(mods)
    }

    fn read_envr(&mut self) -> Result<Environment, Error> {
        let name = self.read_symbol_opcode(opcode::ENVR_NAME)?;
        self.expect_opcode(opcode::ENVR_MODS)?;
        let mods = self.read_envr_mods()?;
        self.expect_opcode(opcode::CONTENTS_LIST)?;
        let contents = self.read_value_list()?;
        Ok(Environment { name, mods, contents })
    }

    fn read_index_items(&mut self) -> Result<Vec<IndexItem>, Error> {
        let count = self.stream.read_u32_le()?;
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(self.read_index_item()?);
        }
        Ok(items)
    }

    fn read_index_item(&mut self) -> Result<IndexItem, Error> {
        self.expect_opcode(opcode::INDEX_ITEM)?;
        let topic = self.read_name()?;
        let type_name = self.read_symbol_text()?;
        let count = self.stream.read_u16_le()?;
        let mut fields = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (name, expected_opcode) = self.read_field_name()?;
            let value = self.read_thing(Some(expected_opcode))?;
            fields.push((name, value));
        }
        Ok(IndexItem { topic, type_name, fields })
    }

    fn read_callee_triples(&mut self) -> Result<Vec<CalleeTriple>, Error> {
        let count = self.stream.read_u16_le()?;
        let mut triples = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let topic = self.read_name()?;
            let type_name = self.read_symbol_text()?;
            let called_how = self.read_symbol_text()?;
            triples.push(CalleeTriple { topic, type_name, called_how });
        }
        Ok(triples)
    }

    fn read_callee_4ples(&mut self) -> Result<Vec<CalleeEntry>, Error> {
        let count = self.stream.read_u16_le()?;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let topic = self.read_name()?;
            let type_name = self.read_symbol_text()?;
            let called_how = self.read_symbol_text()?;
            let unique_id = value_to_unique_id(self.read_thing(Some(opcode::UNIQUE_ID))?);
            entries.push(CalleeEntry { topic, type_name, called_how, unique_id });
        }
        Ok(entries)
    }

    fn read_file_attribute_string(&mut self) -> Result<Value, Error> {
        let value = self.read_thing(None)?;
        match &value {
            Value::Name(Name::Plain(sym)) if opcode::is_nil_symbol(sym) => Ok(Value::Text(String::new())),
            Value::Text(_) => Ok(value),
            _ => Ok(Value::Text(value.as_text().unwrap_or_default().to_string())),
        }
    }

    fn read_picture(&mut self) -> Result<Picture, Error> {
        let type_name = self.read_symbol_text()?;
        let file_name_value = self.read_thing(None)?;
        let file_name = match &file_name_value {
            Value::Name(Name::Plain(sym)) if opcode::is_nil_symbol(sym) => None,
            other => other.as_text().map(|s| s.to_string()),
        };
        let display_name = self.read_raw_short_string()?;
        let raw = match self.read_thing(Some(opcode::EIGHT_BIT_ARRAY))? {
            Value::Bytes(bytes) => bytes.into(),
            _ => Vec::new(),
        };
        Ok(Picture { type_name, file_name, display_name, raw })
    }

    fn read_reference_v1(&mut self) -> Result<Reference, Error> {
        let topic = self.read_name()?;
        let type_name = self.read_symbol_text()?;
        let unique_id = value_to_unique_id(self.read_thing(Some(opcode::UNIQUE_ID))?);
        let view = self.read_thing(None)?;
        let field = normalize_nil(self.read_thing(None)?);
        Ok(Reference { topic, type_name, unique_id, view, appearance: None, booleans: Vec::new(), field })
    }

    fn read_reference_v2(&mut self) -> Result<Reference, Error> {
        let topic = self.read_name()?;
        let type_name = self.read_symbol_text()?;
        let unique_id = value_to_unique_id(self.read_thing(Some(opcode::UNIQUE_ID))?);
        let view = normalize_nil(self.read_thing(None)?);
        let appearance_value = normalize_nil(self.read_thing(None)?);
        let appearance = appearance_value.as_text().filter(|s| !s.is_empty()).map(|s| s.to_string());
        let booleans_value = normalize_nil(self.read_thing(None)?);
        let booleans = match booleans_value {
            Value::List(items) => items.iter().filter_map(Value::as_text).map(str::to_string).collect(),
            _ => Vec::new(),
        };
        let field = normalize_nil(self.read_thing(None)?);
        Ok(Reference { topic, type_name, unique_id, view, appearance, booleans, field })
    }

    // -- top level ----------------------------------------------------------

    pub fn read_record(&mut self) -> Result<Record, Error> {
        self.expect_opcode(opcode::RECORD)?;
        let name = self.read_name()?;
        let type_name = self.read_symbol_opcode(opcode::TYPE_SYMBOL)?;
        self.expect_opcode(opcode::FIELD_ALIST)?;
        let fields = self.read_field_alist()?;
        Ok(Record { name, type_name, fields })
    }

    pub fn read_index(&mut self) -> Result<Vec<IndexItem>, Error> {
        self.expect_opcode(opcode::INDEX)?;
        self.read_index_items()
    }
}

fn normalize_nil(value: Value) -> Value {
    if matches!(&value, Value::Name(Name::Plain(sym)) if opcode::is_nil_symbol(sym)) {
        Value::nil()
    } else {
        value
    }
}

pub fn value_to_unique_id(value: Value) -> Option<UniqueId> {
    match value {
        Value::Text(s) if !s.is_empty() => Some(UniqueId::Str(s)),
        Value::Name(Name::Plain(s)) if !opcode::is_nil_symbol(&s) => Some(UniqueId::Str(s)),
        Value::Number(n) => Some(UniqueId::Int(n)),
        _ => None,
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn short_string_bytes(s: &str) -> Vec<u8> {
        let mut v = vec![s.len() as u8];
        v.extend_from_slice(s.as_bytes());
        v
    }

    #[test]
    fn reads_fixnum() {
        let data = [opcode::FIXNUM, 0x2A, 0x00, 0x00, 0x00];
        let mut reader = Reader::new(&data);
        assert_eq!(reader.read_thing(None).unwrap(), Value::Number(42));
    }

    #[test]
    fn reads_short_string() {
        let mut data = vec![opcode::STRING];
        data.extend(short_string_bytes("hi"));
        let mut reader = Reader::new(&data);
        assert_eq!(reader.read_thing(None).unwrap(), Value::Text("hi".to_string()));
    }

    #[test]
    fn defines_and_resolves_symbol() {
        let mut data = vec![opcode::SAGE_PKG_SYMBOL_DEF];
        data.extend(short_string_bytes("FOO"));
        data.push(opcode::SYMBOL_REF);
        data.extend_from_slice(&0u16.to_le_bytes());
        let mut reader = Reader::new(&data);
        let def = reader.read_thing(None).unwrap();
        assert_eq!(def, Value::Name(Name::Plain("foo".to_string())));
        let reference = reader.read_thing(None).unwrap();
        assert_eq!(reference, Value::Name(Name::Plain("foo".to_string())));
    }

    #[test]
    fn opcode_mismatch_is_reported() {
        let data = [opcode::STRING];
        let mut reader = Reader::new(&data);
        let err = reader.read_thing(Some(opcode::FIXNUM)).unwrap_err();
        assert_eq!(err, Error::OpcodeMismatch { offset: 0, expected: opcode::FIXNUM, obtained: opcode::STRING });
    }

    #[test]
    fn reads_simple_command_with_nil_parameter() {
        let mut data = vec![opcode::SIMPLE_COMMAND, opcode::SIMPLE_COMMAND_NAME, opcode::SAGE_PKG_SYMBOL_DEF];
        data.extend(short_string_bytes("b"));
        let mut reader = Reader::new(&data);
        let got = reader.read_thing(None).unwrap();
        match got {
            Value::Command(cmd) => {
                assert_eq!(cmd.name, "b");
                assert!(cmd.parameter.is_nil());
            },
            other => panic!("expected a command, got {:?}", other),
        }
    }

    #[test]
    fn reads_contents_list_of_mixed_values() {
        let mut data = vec![opcode::CONTENTS_LIST];
        data.extend_from_slice(&2u16.to_le_bytes());
        data.push(opcode::FIXNUM);
        data.extend_from_slice(&7u32.to_le_bytes());
        data.push(opcode::STRING);
        data.extend(short_string_bytes("x"));
        let mut reader = Reader::new(&data);
        let got = reader.read_thing(None).unwrap();
        assert_eq!(got, Value::List(vec![Value::Number(7), Value::Text("x".to_string())]));
    }

    #[test]
    fn reads_record_with_field_alist() {
        let mut data = vec![opcode::RECORD];
        data.push(opcode::SAGE_PKG_SYMBOL_DEF);
        data.extend(short_string_bytes("my-func"));
        data.push(opcode::TYPE_SYMBOL);
        data.push(opcode::SAGE_PKG_SYMBOL_DEF);
        data.extend(short_string_bytes("function"));
        data.push(opcode::FIELD_ALIST);
        data.extend_from_slice(&1u16.to_le_bytes());
        data.push(opcode::FIELD_NAME);
        data.push(opcode::SAGE_PKG_SYMBOL_DEF);
        data.extend(short_string_bytes("unique-index"));
        data.push(opcode::FIXNUM);
        data.extend_from_slice(&9u32.to_le_bytes());

        let mut reader = Reader::new(&data);
        let record = reader.read_record().unwrap();
        assert_eq!(record.name, Name::Plain("my-func".to_string()));
        assert_eq!(record.type_name, "function");
        assert_eq!(record.field("unique-index"), Some(&Value::Number(9)));
    }

    #[test]
    fn unknown_field_name_fails() {
        let mut data = vec![opcode::RECORD];
        data.push(opcode::SAGE_PKG_SYMBOL_DEF);
        data.extend(short_string_bytes("x"));
        data.push(opcode::TYPE_SYMBOL);
        data.push(opcode::SAGE_PKG_SYMBOL_DEF);
        data.extend(short_string_bytes("section"));
        data.push(opcode::FIELD_ALIST);
        data.extend_from_slice(&1u16.to_le_bytes());
        data.push(opcode::FIELD_NAME);
        data.push(opcode::SAGE_PKG_SYMBOL_DEF);
        data.extend(short_string_bytes("not-a-field"));

        let mut reader = Reader::new(&data);
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, Error::UnknownFieldName { .. }));
    }
}

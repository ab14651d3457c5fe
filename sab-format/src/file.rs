//! Top-level SAB file layout (§6 EXTERNAL INTERFACES): header, a
//! file-attribute-alist, the records section, and the index section, each
//! of the latter three starting with a fresh symbol table.

use tracing::{debug, instrument};

use crate::error::Error;
use crate::opcode;
use crate::reader::Reader;
use crate::value::{IndexItem, Record, Value};

const ID_PATTERN: u32 = 0;
const VERSION: u8 = 7;

#[derive(Debug)]
pub struct SabFile {
    pub file_attributes: Value,
    pub records: Vec<Record>,
    pub index: Vec<IndexItem>,
}

struct Header {
    file_attributes: Value,
    records_offset: u32,
    index_offset: u32,
}

fn read_header(reader: &mut Reader) -> Result<Header, Error> {
    let id_pattern = reader.read_u32_raw()?;
    if id_pattern != ID_PATTERN {
        return Err(Error::BadIdPattern { obtained: id_pattern });
    }
    let version = reader.read_u8_raw()?;
    if version != VERSION {
        return Err(Error::BadVersion { obtained: version });
    }

    reader.begin_section();
    let file_attributes = reader.read_thing(Some(opcode::FILE_ATTRIBUTE_ALIST))?;

    let records_offset = reader.read_u32_raw()?;
    let index_offset = reader.read_u32_raw()?;
    Ok(Header { file_attributes, records_offset, index_offset })
}

impl SabFile {
    #[instrument(skip_all)]
    pub fn read(data: &[u8]) -> Result<Self, Error> {
        let mut reader = Reader::new(data);
        let header = read_header(&mut reader)?;

        reader.seek(header.records_offset as usize);
        let mut records = Vec::new();
        while reader.offset() < header.index_offset as usize {
            reader.begin_section();
            records.push(reader.read_record()?);
        }
        debug!(count = records.len(), "read records section");

        reader.seek(header.index_offset as usize);
        reader.begin_section();
        let index = reader.read_index()?;
        debug!(count = index.len(), "read index section");

        Ok(Self { file_attributes: header.file_attributes, records, index })
    }
}

/// Pass 1's fast path: header + file-attributes + offsets, then straight to
/// the index, skipping every record in between.
#[instrument(skip_all)]
pub fn read_index_only(data: &[u8]) -> Result<Vec<IndexItem>, Error> {
    let mut reader = Reader::new(data);
    let header = read_header(&mut reader)?;
    reader.seek(header.index_offset as usize);
    reader.begin_section();
    reader.read_index()
}


#[cfg(test)]
mod tests {
    use super::*;

    fn short_string_bytes(s: &str) -> Vec<u8> {
        let mut v = vec![s.len() as u8];
        v.extend_from_slice(s.as_bytes());
        v
    }

    fn build_minimal_file() -> Vec<u8> {
        // file attrs: empty contents-list under opcode 31 pass-through
        let mut file_attrs = vec![opcode::FILE_ATTRIBUTE_ALIST, opcode::CONTENTS_LIST];
        file_attrs.extend_from_slice(&0u16.to_le_bytes());

        // one record: (name="r", type="section", fields={})
        let mut record = vec![opcode::RECORD];
        record.push(opcode::SAGE_PKG_SYMBOL_DEF);
        record.extend(short_string_bytes("r"));
        record.push(opcode::TYPE_SYMBOL);
        record.push(opcode::SAGE_PKG_SYMBOL_DEF);
        record.extend(short_string_bytes("section"));
        record.push(opcode::FIELD_ALIST);
        record.extend_from_slice(&0u16.to_le_bytes());

        // index: opcode 28 + u32 count=0
        let index = vec![opcode::INDEX, 0, 0, 0, 0];

        let mut data = Vec::new();
        data.extend_from_slice(&ID_PATTERN.to_le_bytes());
        data.push(VERSION);
        data.extend_from_slice(&file_attrs);

        let records_offset = (data.len() + 8) as u32;
        let index_offset = records_offset + record.len() as u32;
        data.extend_from_slice(&records_offset.to_le_bytes());
        data.extend_from_slice(&index_offset.to_le_bytes());
        data.extend_from_slice(&record);
        data.extend_from_slice(&index);
        data
    }

    #[test]
    fn reads_a_minimal_file() {
        let data = build_minimal_file();
        let file = SabFile::read(&data).unwrap();
        assert_eq!(file.records.len(), 1);
        assert_eq!(file.records[0].type_name, "section");
        assert!(file.index.is_empty());
    }

    #[test]
    fn index_only_path_matches_full_parse() {
        let data = build_minimal_file();
        let index = read_index_only(&data).unwrap();
        assert_eq!(index, SabFile::read(&data).unwrap().index);
    }

    #[test]
    fn rejects_bad_id_pattern() {
        let mut data = build_minimal_file();
        data[0] = 0xFF;
        let err = SabFile::read(&data).unwrap_err();
        assert!(matches!(err, Error::BadIdPattern { .. }));
    }

    #[test]
    fn rejects_bad_version() {
        let mut data = build_minimal_file();
        data[4] = 3;
        let err = SabFile::read(&data).unwrap_err();
        assert!(matches!(err, Error::BadVersion { obtained: 3 }));
    }
}

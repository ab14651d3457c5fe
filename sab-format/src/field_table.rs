//! `*field-name-to-sab-code-alist*`: the fixed set of record/index-item field
//! names a SAB file is allowed to carry, each with the opcode its value is
//! encoded under. A name outside this table is a malformed file (§4.4:
//! "Unknown field names fail").

use crate::opcode;

const TABLE: &[(&str, u8)] = &[
    ("unique-id", opcode::UNIQUE_ID),
    ("version-number", opcode::FIXNUM),
    ("flags", opcode::FIXNUM),
    ("location", opcode::LOCATION_PAIR),
    ("tokens", opcode::TOKEN_LIST),
    ("keywords", opcode::CONTENTS_LIST),
    ("callee-list", opcode::CALLEE_4PLE_LIST),
    ("source-topic", opcode::CONTENTS_LIST),
    ("file-attribute-string", opcode::FILE_ATTRIBUTE_STRING),
    ("contents", opcode::CONTENTS_LIST),
    ("arglist", opcode::CONTENTS_LIST),
    ("symbolics-common-lisp:arglist", opcode::CONTENTS_LIST),
    ("modification-history", opcode::MODIFICATION_HISTORY),
    ("source-title", opcode::CONTENTS_LIST),
    ("oneliner", opcode::CONTENTS_LIST),
    ("related", opcode::CONTENTS_LIST),
    ("releasenumber", opcode::CONTENTS_LIST),
    ("abbrev", opcode::CONTENTS_LIST),
    ("notes", opcode::CONTENTS_LIST),
    ("glossary", opcode::CONTENTS_LIST),
    ("patched-from", opcode::STRING),
    ("unique-index", opcode::FIXNUM),
];

pub fn expected_opcode(field_name: &str) -> Option<u8> {
    TABLE.iter().find(|(name, _)| *name == field_name).map(|(_, op)| *op)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_fields_resolve() {
        assert_eq!(expected_opcode("contents"), Some(opcode::CONTENTS_LIST));
        assert_eq!(expected_opcode("unique-id"), Some(opcode::UNIQUE_ID));
        assert_eq!(expected_opcode("patched-from"), Some(opcode::STRING));
    }

    #[test]
    fn unknown_field_is_none() {
        assert_eq!(expected_opcode("not-a-real-field"), None);
    }
}

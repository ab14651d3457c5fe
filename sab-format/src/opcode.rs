//! The 46-entry opcode table (`*sab-code-names*` in the Scheme original).
//!
//! Kept as plain `u8` constants rather than a Rust enum: the wire format uses
//! raw byte values straight out of `ByteStream`, and the symbolic names are
//! only needed for error messages, so a lookup table is a better fit than a
//! `from_to_repr`-style enum (there is no closed match over "all opcodes" to
//! exhaustively dispatch other than the one in `reader.rs`, which already has
//! to special-case the missing 26).

pub const RECORD: u8 = 0;
pub const TYPE_SYMBOL: u8 = 1;
pub const FUNCTION_SPEC: u8 = 2;
pub const FIELD_ALIST: u8 = 3;
pub const FIELD_NAME: u8 = 4;
pub const ENVR: u8 = 5;
pub const ENVR_NAME: u8 = 6;
pub const ENVR_MODS: u8 = 7;
pub const ATTRIBUTE_NAME: u8 = 8;
pub const CONTENTS_LIST: u8 = 9;
pub const FIXNUM: u8 = 10;
pub const STRING: u8 = 11;
pub const LONG_STRING: u8 = 12;
pub const LIST: u8 = 13;
pub const SYMBOL_REF: u8 = 14;
pub const UNINTERNED_SYMBOL_DEF: u8 = 15;
pub const SAGE_PKG_SYMBOL_DEF: u8 = 16;
pub const PKG_SYMBOL_DEF: u8 = 17;
pub const DOC_PKG_SYMBOL_DEF: u8 = 18;
pub const READ_FROM_STRING: u8 = 19;
pub const SIMPLE_COMMAND: u8 = 20;
pub const COMMAND: u8 = 21;
pub const SIMPLE_COMMAND_NAME: u8 = 22;
pub const COMMAND_NAME: u8 = 23;
pub const MACRO_CALL: u8 = 24;
pub const MACRO_NAME: u8 = 25;
pub const MACRO_ARGLIST: u8 = 26;
pub const LOCATION_PAIR: u8 = 27;
pub const INDEX: u8 = 28;
pub const CALLEE_TRIPLE_LIST: u8 = 29;
pub const INDEX_ITEM: u8 = 30;
pub const FILE_ATTRIBUTE_ALIST: u8 = 31;
pub const KEYWORD_PKG_SYMBOL_DEF: u8 = 32;
pub const REFERENCE: u8 = 33;
pub const FAT_STRING: u8 = 34;
pub const UNIQUE_ID: u8 = 35;
pub const MODIFICATION_HISTORY: u8 = 36;
pub const TOKEN_LIST: u8 = 37;
pub const FILE_ATTRIBUTE_STRING: u8 = 38;
pub const CALLEE_4PLE_LIST: u8 = 39;
pub const PICTURE: u8 = 40;
pub const EIGHT_BIT_ARRAY: u8 = 41;
pub const EXAMPLE_RECORD_MARKER: u8 = 42;
pub const EXTENSIBLE_REFERENCE: u8 = 43;
pub const EXTENSIBLE_REFERENCE_TAKE_TWO: u8 = 44;
pub const CHARACTER: u8 = 45;

pub const NAMES: [&str; 46] = [
    "record",
    "type-symbol",
    "function-spec",
    "field-alist",
    "field-name",
    "envr",
    "envr-name",
    "envr-mods",
    "attribute-name",
    "contents-list",
    "fixnum",
    "string",
    "long-string",
    "list",
    "symbol-ref",
    "uninterned-symbol-def",
    "sage-pkg-symbol-def",
    "pkg-symbol-def",
    "doc-pkg-symbol-def",
    "read-from-string",
    "simple-command",
    "command",
    "simple-command-name",
    "command-name",
    "macro-call",
    "macro-name",
    "macro-arglist",
    "location-pair",
    "index",
    "callee-triple-list",
    "index-item",
    "file-attribute-alist",
    "keyword-pkg-symbol-def",
    "reference",
    "fat-string",
    "unique-id",
    "modification-history",
    "token-list",
    "file-attribute-string",
    "callee-4ple-list",
    "picture",
    "8-bit-array",
    "example-record-marker",
    "extensible-reference",
    "extensible-reference-take-two",
    "character",
];

pub fn name(opcode: u8) -> &'static str {
    NAMES.get(opcode as usize).copied().unwrap_or("unknown")
}

/// The Lisp symbols that stand for `nil`, as seen where the format reads a
/// symbol but means "absent" (e.g. opcode 38's "a string or nil").
pub fn is_nil_symbol(sym: &str) -> bool {
    sym == "lisp:nil" || sym == "common-lisp:nil"
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_table_has_46_entries() {
        assert_eq!(NAMES.len(), 46);
        assert_eq!(NAMES[0], "record");
        assert_eq!(NAMES[45], "character");
    }

    #[test]
    fn recognizes_nil_symbols() {
        assert!(is_nil_symbol("lisp:nil"));
        assert!(is_nil_symbol("common-lisp:nil"));
        assert!(!is_nil_symbol("lisp:t"));
    }
}

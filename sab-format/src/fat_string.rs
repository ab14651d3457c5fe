//! Opcode 34, fat-string: Genera's styled-text sub-format. A dimension
//! header describes how many characters the string holds and how much
//! style/font framing follows; the framing itself is discarded (this reader
//! only needs the recoded text, not the styling), then the character
//! payload arrives in length-prefixed chunks.

use genera_encoding::ByteStream;

use crate::error::Error;

const FRAMING_TYPE_RUN: u8 = 0x0C;
const FRAMING_TYPE_STYLE: u8 = 0x14;
const FRAMING_END: u8 = 0x10;

pub fn read(stream: &mut ByteStream) -> Result<String, Error> {
    let offset = stream.offset();
    let dim_count = stream.read_u8()?;
    let mut dims = Vec::with_capacity(dim_count as usize);
    for _ in 0..dim_count {
        dims.push(stream.read_u8()?);
    }
    let char_count = *dims.first().unwrap_or(&0) as usize;

    if dims.get(1).copied().unwrap_or(0) > 0 {
        skip(stream, dims[1] as usize)?;
        read_framing(stream, offset)?;
    }

    let mut raw = Vec::with_capacity(char_count);
    while raw.len() < char_count {
        let chunk_len = stream.read_u8()? as usize;
        let _discarded = stream.read_u8()?;
        raw.extend_from_slice(stream.read_bytes(chunk_len)?);
    }

    Ok(genera_encoding::charset::recode(&raw))
}

fn read_framing(stream: &mut ByteStream, offset: usize) -> Result<(), Error> {
    let type_code = stream.read_u8()?;
    match type_code {
        FRAMING_TYPE_RUN => {
            let l1 = stream.read_u8()? as usize;
            skip(stream, l1)?;
            let l2 = stream.read_u8()? as usize;
            skip(stream, l2)?;
            expect_byte(stream, offset, FRAMING_END)?;
        },
        FRAMING_TYPE_STYLE => loop {
            let style_len = stream.read_u8()? as usize;
            skip(stream, style_len)?;
            let next = stream.read_u8()?;
            if next == FRAMING_END {
                break;
            }
            if next != FRAMING_TYPE_STYLE {
                return Err(Error::MalformedFatString {
                    offset,
                    detail: "style framing block not terminated by 0x14 or 0x10",
                });
            }
        },
        _ => {
            return Err(Error::MalformedFatString {
                offset,
                detail: "unknown fat-string framing type code",
            });
        },
    }

    let font_name_len = stream.read_u8()? as usize;
    skip(stream, font_name_len)?;
    expect_byte(stream, offset, 0x00)
}

fn skip(stream: &mut ByteStream, n: usize) -> Result<(), Error> {
    stream.read_bytes(n)?;
    Ok(())
}

fn expect_byte(stream: &mut ByteStream, offset: usize, expected: u8) -> Result<(), Error> {
    let obtained = stream.read_u8()?;
    if obtained != expected {
        return Err(Error::MalformedFatString {
            offset,
            detail: "expected framing terminator byte not found",
        });
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_fat_string_with_no_framing() {
        // dims = [5, 0]: 5 characters, no style/font framing at all.
        let mut data = vec![2u8, 5, 0];
        data.extend_from_slice(&[3, 0, b'h', b'e', b'l']);
        data.extend_from_slice(&[2, 0, b'l', b'o']);
        let mut stream = ByteStream::new(&data);
        let got = read(&mut stream).unwrap();
        assert_eq!(got, "hello");
    }

    #[test]
    fn reads_fat_string_with_run_framing() {
        let mut data = vec![2u8, 3, 1]; // dims = [3, 1]
        data.push(0xAA); // the one skipped framing byte
        data.push(FRAMING_TYPE_RUN);
        data.push(2); // l1
        data.extend_from_slice(&[0, 0]);
        data.push(1); // l2
        data.push(0);
        data.push(FRAMING_END);
        data.push(0); // font-name-len
        data.push(0x00); // trailer
        data.extend_from_slice(&[3, 0, b'a', b'b', b'c']);
        let mut stream = ByteStream::new(&data);
        let got = read(&mut stream).unwrap();
        assert_eq!(got, "abc");
    }

    #[test]
    fn rejects_unknown_framing_type() {
        let data = vec![2u8, 1, 1, 0xAA, 0xFF];
        let mut stream = ByteStream::new(&data);
        assert!(read(&mut stream).is_err());
    }
}

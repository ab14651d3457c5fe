//! Cursor over an immutable byte buffer with little-endian reads.
//!
//! Mirrors the Scheme `myport`/Python `SabStream` plumbing that the SAB and
//! binary-graphics decoders are both built on: a flat `&[u8]` plus an offset,
//! with every read failing loudly rather than panicking once it would run
//! past the end of the buffer.

use std::fmt;


#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Error {
    pub offset: usize,
    pub needed: usize,
    pub available: usize,
}
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unexpected EOF at offset {:#x}: needed {} byte(s), {} available",
            self.offset, self.needed, self.available,
        )
    }
}
impl std::error::Error for Error {}


#[derive(Clone, Copy, Debug)]
pub struct ByteStream<'d> {
    data: &'d [u8],
    offset: usize,
}
impl<'d> ByteStream<'d> {
    pub fn new(data: &'d [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn eof(&self) -> bool {
        self.offset >= self.data.len()
    }

    pub fn seek(&mut self, position: usize) {
        self.offset = position;
    }

    fn take(&mut self, n: usize) -> Result<&'d [u8], Error> {
        let available = self.data.len().saturating_sub(self.offset);
        if n > available {
            return Err(Error { offset: self.offset, needed: n, available });
        }
        let slice = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }

    pub fn peek(&self) -> Result<u8, Error> {
        self.data.get(self.offset).copied().ok_or(Error {
            offset: self.offset,
            needed: 1,
            available: self.data.len().saturating_sub(self.offset),
        })
    }

    pub fn read_u8(&mut self) -> Result<u8, Error> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, Error> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, Error> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_f32_le(&mut self) -> Result<f32, Error> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_f64_le(&mut self) -> Result<f64, Error> {
        let bytes = self.take(8)?;
        Ok(f64::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'d [u8], Error> {
        self.take(n)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_le_integers_and_advances() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];
        let mut stream = ByteStream::new(&data);
        assert_eq!(stream.read_u8().unwrap(), 0x01);
        assert_eq!(stream.read_u16_le().unwrap(), 0x0403);
        assert_eq!(stream.read_u32_le().unwrap(), 0x0807_0605);
        assert!(stream.eof());
    }

    #[test]
    fn read_bytes_is_a_view_not_a_copy() {
        let data = [1u8, 2, 3, 4, 5];
        let mut stream = ByteStream::new(&data);
        let view = stream.read_bytes(3).unwrap();
        assert_eq!(view, &[1, 2, 3]);
        assert_eq!(stream.offset(), 3);
    }

    #[test]
    fn fails_on_short_read() {
        let data = [0x01];
        let mut stream = ByteStream::new(&data);
        let err = stream.read_u32_le().unwrap_err();
        assert_eq!(err.offset, 0);
        assert_eq!(err.needed, 4);
        assert_eq!(err.available, 1);
    }

    #[test]
    fn seek_and_peek_do_not_advance() {
        let data = [9u8, 8, 7];
        let mut stream = ByteStream::new(&data);
        stream.seek(2);
        assert_eq!(stream.peek().unwrap(), 7);
        assert_eq!(stream.offset(), 2);
    }
}

//! The binary graphics decoder (§4.5). Commands and operations occupy
//! disjoint byte ranges in practice (operations use 1-19, commands use
//! 20-74), so rather than keeping two parallel 256-entry tables this merges
//! them into one `match` in [`GraphicsReader::read_one`] — "try the command
//! table, then fall back to operations" reduces to one dispatch when the two
//! tables never actually collide.

use genera_encoding::ByteStream;
use tracing::trace;

use crate::error::Error;
use crate::form::{Form, GValue, Options};
use crate::keyword;

const FORMAT_VERSION: u8 = 1;

enum Thing {
    Value(GValue),
    Form(Form),
    End,
}

pub struct GraphicsReader<'d> {
    stream: ByteStream<'d>,
}

impl<'d> GraphicsReader<'d> {
    pub fn new(data: &'d [u8]) -> Self {
        Self { stream: ByteStream::new(data) }
    }

    /// Top-level entry point: checks the leading format-version command,
    /// then reads forms until EOF.
    pub fn decode(data: &'d [u8]) -> Result<Vec<Form>, Error> {
        let mut reader = Self::new(data);
        reader.expect_format_version()?;
        reader.read_form_list_until_eof()
    }

    fn expect_format_version(&mut self) -> Result<(), Error> {
        let offset = self.stream.offset();
        let opcode = self.stream.read_u8()?;
        if opcode != OP_FORMAT_VERSION {
            return Err(Error::UnknownOpcode { offset, byte: opcode });
        }
        let version = self.stream.read_u8()?;
        if version != FORMAT_VERSION {
            return Err(Error::BadFormatVersion { obtained: version });
        }
        Ok(())
    }

    fn read_form_list_until_eof(&mut self) -> Result<Vec<Form>, Error> {
        let mut forms = Vec::new();
        while !self.stream.eof() {
            match self.read_one()? {
                Thing::Form(f) => forms.push(f),
                Thing::Value(_) | Thing::End => {},
            }
        }
        Ok(forms)
    }

    /// Forms nested inside a `path` or `scan-conversion-mode`: read things
    /// until the end sentinel, keeping only forms.
    fn read_form_list_until_end(&mut self) -> Result<Vec<Form>, Error> {
        let mut forms = Vec::new();
        loop {
            match self.read_one()? {
                Thing::Form(f) => forms.push(f),
                Thing::Value(_) => {},
                Thing::End => break,
            }
        }
        Ok(forms)
    }

    /// `next_value`: skip over forms until a value (or the end sentinel)
    /// turns up.
    fn next_value(&mut self) -> Result<Option<GValue>, Error> {
        loop {
            match self.read_one()? {
                Thing::Value(v) => return Ok(Some(v)),
                Thing::End => return Ok(None),
                Thing::Form(_) => continue,
            }
        }
    }

    fn read_value(&mut self) -> Result<GValue, Error> {
        let offset = self.stream.offset();
        self.next_value()?.ok_or(Error::UnexpectedEnd { offset })
    }

    fn read_f64(&mut self) -> Result<f64, Error> {
        Ok(self.read_value()?.as_f64())
    }

    fn read_point_sequence(&mut self) -> Result<Vec<f64>, Error> {
        match self.read_value()? {
            GValue::FloatList(points) => Ok(points),
            other => Ok(vec![other.as_f64()]),
        }
    }

    /// `read_until_done`: collect `next_value` results until the end
    /// sentinel.
    fn read_value_list_until_end(&mut self) -> Result<Vec<GValue>, Error> {
        let mut values = Vec::new();
        while let Some(v) = self.next_value()? {
            values.push(v);
        }
        Ok(values)
    }

    fn read_options(&mut self) -> Result<Options, Error> {
        let values = self.read_value_list_until_end()?;
        let mut options = Vec::with_capacity(values.len() / 2);
        let mut it = values.into_iter();
        while let (Some(key), Some(value)) = (it.next(), it.next()) {
            if let GValue::Keyword(k) = key {
                options.push((k, value));
            }
        }
        Ok(options)
    }

    fn read_one(&mut self) -> Result<Thing, Error> {
        let offset = self.stream.offset();
        let opcode = self.stream.read_u8()?;
        trace!(offset, opcode, "graphics read_one");
        self.dispatch(offset, opcode)
    }

    fn dispatch(&mut self, offset: usize, opcode: u8) -> Result<Thing, Error> {
        match opcode {
            // -- operations (1-19): fixed geometry operands, then options --
            OP_POINT => {
                let x = self.read_f64()?;
                let y = self.read_f64()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::Point { x, y, options }))
            },
            OP_LINE => {
                let start_x = self.read_f64()?;
                let start_y = self.read_f64()?;
                let end_x = self.read_f64()?;
                let end_y = self.read_f64()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::Line { start_x, start_y, end_x, end_y, options }))
            },
            OP_LINES => {
                let points = self.read_point_sequence()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::Lines { points, options }))
            },
            OP_RECTANGLE => {
                let left = self.read_f64()?;
                let top = self.read_f64()?;
                let right = self.read_f64()?;
                let bottom = self.read_f64()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::Rectangle { left, top, right, bottom, options }))
            },
            OP_TRIANGLE => {
                let x1 = self.read_f64()?;
                let y1 = self.read_f64()?;
                let x2 = self.read_f64()?;
                let y2 = self.read_f64()?;
                let x3 = self.read_f64()?;
                let y3 = self.read_f64()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::Triangle { x1, y1, x2, y2, x3, y3, options }))
            },
            OP_POLYGON => {
                let points = self.read_point_sequence()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::Polygon { points, options }))
            },
            OP_ELLIPSE => {
                let center_x = self.read_f64()?;
                let center_y = self.read_f64()?;
                let radius_x = self.read_f64()?;
                let radius_y = self.read_f64()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::Ellipse { center_x, center_y, radius_x, radius_y, options }))
            },
            OP_BEZIER_CURVE => {
                let start_x = self.read_f64()?;
                let start_y = self.read_f64()?;
                let control_1_x = self.read_f64()?;
                let control_1_y = self.read_f64()?;
                let control_2_x = self.read_f64()?;
                let control_2_y = self.read_f64()?;
                let end_x = self.read_f64()?;
                let end_y = self.read_f64()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::BezierCurve {
                    start_x, start_y, control_1_x, control_1_y, control_2_x, control_2_y, end_x, end_y, options,
                }))
            },
            OP_CUBIC_SPLINE => {
                let points = self.read_point_sequence()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::CubicSpline { points, options }))
            },
            OP_PATH_OP => {
                let function = self.read_value()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::PathOp { function, options }))
            },
            OP_STRING => {
                let x = self.read_f64()?;
                let y = self.read_f64()?;
                let text = self.read_thin_string_text()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::Str { x, y, text, options }))
            },
            OP_CIRCULAR_ARC_TO => {
                let to_x = self.read_f64()?;
                let to_y = self.read_f64()?;
                let center_x = self.read_f64()?;
                let center_y = self.read_f64()?;
                let radius = self.read_f64()?;
                let start_angle = self.read_f64()?;
                let end_angle = self.read_f64()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::CircularArcTo {
                    to_x, to_y, center_x, center_y, radius, start_angle, end_angle, options,
                }))
            },
            OP_IMAGE => {
                let left = self.read_f64()?;
                let top = self.read_f64()?;
                let image = match self.read_one()? {
                    Thing::Form(f) => Box::new(f),
                    _ => return Err(Error::UnexpectedEnd { offset }),
                };
                let options = self.read_options()?;
                Ok(Thing::Form(Form::Image { left, top, image, options }))
            },
            OP_STRING_IMAGE => {
                let x = self.read_f64()?;
                let y = self.read_f64()?;
                let text = self.read_thin_string_text()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::StringImage { x, y, text, options }))
            },
            OP_LINE_TO => {
                let end_x = self.read_f64()?;
                let end_y = self.read_f64()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::LineTo { end_x, end_y, options }))
            },
            OP_CLOSE_PATH => {
                let options = self.read_options()?;
                Ok(Thing::Form(Form::ClosePath { options }))
            },

            // -- commands (20-74) --
            CMD_THIN_STRING => {
                let len = self.stream.read_u8()? as usize;
                let raw = self.stream.read_bytes(len)?;
                Ok(Thing::Value(GValue::Str(genera_encoding::charset::recode(raw))))
            },
            CMD_PATH => {
                let path_function = self.read_form_list_until_end()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::Path { path_function, options }))
            },
            CMD_RASTER_IMAGE => {
                let byte_size = self.stream.read_u8()?;
                let width = self.read_value()?.as_f64() as i64;
                let height = self.read_value()?.as_f64() as i64;
                let row_bytes = ((width as i64 * byte_size as i64) + 7) / 8;
                let len = (row_bytes * height).max(0) as usize;
                let data = self.stream.read_bytes(len)?.to_vec();
                Ok(Thing::Form(Form::RasterImage { byte_size, width, height, data }))
            },
            CMD_CHARACTER_STYLE => {
                let len = self.stream.read_u8()? as usize;
                let raw = self.stream.read_bytes(len)?;
                Ok(Thing::Value(GValue::Str(genera_encoding::charset::recode(raw))))
            },
            CMD_END => Ok(Thing::End),
            CMD_FORMAT_VERSION => {
                let version = self.stream.read_u8()?;
                if version != FORMAT_VERSION {
                    return Err(Error::BadFormatVersion { obtained: version });
                }
                Ok(Thing::Value(GValue::Integer(version as i64)))
            },
            CMD_SMALL_INTEGER => {
                let n = self.stream.read_u8()? as i64 - 128;
                Ok(Thing::Value(GValue::Integer(n)))
            },
            CMD_MEDIUM_INTEGER => {
                let n = self.stream.read_u16_le()? as i64 - 32768;
                Ok(Thing::Value(GValue::Integer(n)))
            },
            CMD_LARGE_INTEGER => Ok(Thing::Value(GValue::Integer(self.stream.read_u32_le()? as i64))),
            CMD_VERY_LARGE_INTEGER => {
                let bit_length = self.stream.read_u16_le()? as u32;
                let byte_count = bit_length.div_ceil(8) as usize;
                let bytes = self.stream.read_bytes(byte_count)?;
                let mut value: i128 = 0;
                for (i, b) in bytes.iter().enumerate() {
                    value |= (*b as i128) << (8 * i);
                }
                Ok(Thing::Value(GValue::Integer(value as i64)))
            },
            CMD_RATIO => {
                let numerator = self.read_f64()?;
                let denominator = self.read_f64()?;
                Ok(Thing::Value(GValue::Float(numerator / denominator)))
            },
            CMD_SINGLE_FLOAT => Ok(Thing::Value(GValue::Float(self.stream.read_f32_le()? as f64))),
            CMD_DOUBLE_FLOAT => Ok(Thing::Value(GValue::Float(self.stream.read_f64_le()?))),
            CMD_POINT_SEQUENCE => {
                let length = self.read_value()?.as_f64() as usize;
                let mut points = Vec::with_capacity(length * 2);
                for _ in 0..(length * 2) {
                    points.push(self.read_f64()?);
                }
                Ok(Thing::Value(GValue::FloatList(points)))
            },
            CMD_ANGLE => {
                let tenths_of_degrees = self.read_f64()?;
                Ok(Thing::Value(GValue::Float(tenths_of_degrees / 10.0 * std::f64::consts::PI / 180.0)))
            },
            CMD_TRUE => Ok(Thing::Value(GValue::Bool(true))),
            CMD_FALSE => Ok(Thing::Value(GValue::Bool(false))),
            CMD_KEYWORD => {
                let index = self.stream.read_u8()?;
                let keyword = keyword::lookup(index).ok_or(Error::UnknownKeywordIndex { offset, index })?;
                Ok(Thing::Value(GValue::Keyword(keyword.to_string())))
            },
            CMD_SET_POSITION => {
                let x = self.read_f64()?;
                let y = self.read_f64()?;
                Ok(Thing::Form(Form::SetCurrentPosition { x, y }))
            },
            CMD_TRANSFORM_MATRIX => {
                let r11 = self.read_f64()?;
                let r12 = self.read_f64()?;
                let r21 = self.read_f64()?;
                let r22 = self.read_f64()?;
                let tx = self.read_f64()?;
                let ty = self.read_f64()?;
                Ok(Thing::Form(Form::GraphicsTransform { r11, r12, r21, r22, tx, ty }))
            },
            CMD_DASH_PATTERN => {
                let length = self.read_value()?.as_f64() as usize;
                let mut values = Vec::with_capacity(length);
                for _ in 0..length {
                    values.push(self.read_f64()?);
                }
                Ok(Thing::Value(GValue::FloatList(values)))
            },
            CMD_SCAN_CONVERSION_MODE => {
                let output_forms = self.read_form_list_until_end()?;
                let options = self.read_options()?;
                Ok(Thing::Form(Form::ScanConversionMode { output_forms, options }))
            },
            _ => Err(Error::UnknownOpcode { offset, byte: opcode }),
        }
    }

    /// Reads a nested opcode-20 thin-string value at an operand position
    /// (OP_STRING/OP_STRING_IMAGE), where the opcode has NOT already been
    /// consumed by `read_one`'s dispatch. Command arms that receive their
    /// own opcode pre-consumed (CMD_THIN_STRING, CMD_CHARACTER_STYLE) must
    /// read their length+bytes payload inline instead of calling this.
    fn read_thin_string_text(&mut self) -> Result<String, Error> {
        let offset = self.stream.offset();
        let opcode = self.stream.read_u8()?;
        if opcode != CMD_THIN_STRING {
            return Err(Error::UnknownOpcode { offset, byte: opcode });
        }
        let len = self.stream.read_u8()? as usize;
        let raw = self.stream.read_bytes(len)?;
        Ok(genera_encoding::charset::recode(raw))
    }
}

const OP_POINT: u8 = 1;
const OP_LINE: u8 = 2;
const OP_LINES: u8 = 3;
const OP_RECTANGLE: u8 = 4;
const OP_TRIANGLE: u8 = 5;
const OP_POLYGON: u8 = 6;
const OP_ELLIPSE: u8 = 8;
const OP_BEZIER_CURVE: u8 = 9;
const OP_CUBIC_SPLINE: u8 = 10;
const OP_PATH_OP: u8 = 11;
const OP_STRING: u8 = 12;
const OP_CIRCULAR_ARC_TO: u8 = 14;
const OP_IMAGE: u8 = 16;
const OP_STRING_IMAGE: u8 = 17;
const OP_LINE_TO: u8 = 18;
const OP_CLOSE_PATH: u8 = 19;

const CMD_THIN_STRING: u8 = 20;
const CMD_PATH: u8 = 22;
const CMD_RASTER_IMAGE: u8 = 23;
const CMD_CHARACTER_STYLE: u8 = 24;
const CMD_END: u8 = 50;
const CMD_FORMAT_VERSION: u8 = 51;
const CMD_SMALL_INTEGER: u8 = 52;
const CMD_MEDIUM_INTEGER: u8 = 53;
const CMD_LARGE_INTEGER: u8 = 54;
const CMD_VERY_LARGE_INTEGER: u8 = 55;
const CMD_RATIO: u8 = 56;
const CMD_SINGLE_FLOAT: u8 = 57;
const CMD_DOUBLE_FLOAT: u8 = 58;
const CMD_POINT_SEQUENCE: u8 = 59;
const CMD_ANGLE: u8 = 60;
const CMD_TRUE: u8 = 62;
const CMD_FALSE: u8 = 63;
const CMD_KEYWORD: u8 = 64;
const CMD_SET_POSITION: u8 = 67;
const CMD_TRANSFORM_MATRIX: u8 = 68;
const CMD_DASH_PATTERN: u8 = 72;
const CMD_SCAN_CONVERSION_MODE: u8 = 74;

const OP_FORMAT_VERSION: u8 = CMD_FORMAT_VERSION;


#[cfg(test)]
mod tests {
    use super::*;

    fn with_header(mut body: Vec<u8>) -> Vec<u8> {
        let mut data = vec![CMD_FORMAT_VERSION, 1];
        data.append(&mut body);
        data
    }

    #[test]
    fn decodes_a_single_point() {
        let mut body = vec![OP_POINT];
        body.extend_from_slice(&[CMD_SMALL_INTEGER, 128 + 5]); // x = 5
        body.extend_from_slice(&[CMD_SMALL_INTEGER, 128 - 3]); // y = -3
        body.push(CMD_END); // empty options
        let data = with_header(body);
        let forms = GraphicsReader::decode(&data).unwrap();
        assert_eq!(forms.len(), 1);
        match &forms[0] {
            Form::Point { x, y, options } => {
                assert_eq!(*x, 5.0);
                assert_eq!(*y, -3.0);
                assert!(options.is_empty());
            },
            other => panic!("expected a point, got {:?}", other),
        }
    }

    #[test]
    fn decodes_rectangle_with_options() {
        let mut body = vec![OP_RECTANGLE];
        for v in [128, 128, 138, 138] {
            body.extend_from_slice(&[CMD_SMALL_INTEGER, v]);
        }
        body.push(CMD_KEYWORD);
        body.push(37); // ':filled'
        body.push(CMD_TRUE);
        body.push(CMD_END);
        let data = with_header(body);
        let forms = GraphicsReader::decode(&data).unwrap();
        match &forms[0] {
            Form::Rectangle { options, .. } => {
                assert_eq!(crate::form::option_get(options, ":filled"), Some(&GValue::Bool(true)));
            },
            other => panic!("expected a rectangle, got {:?}", other),
        }
    }

    #[test]
    fn rejects_wrong_format_version() {
        let data = vec![CMD_FORMAT_VERSION, 2];
        let err = GraphicsReader::decode(&data).unwrap_err();
        assert_eq!(err, Error::BadFormatVersion { obtained: 2 });
    }

    #[test]
    fn rejects_unknown_opcode() {
        let data = vec![CMD_FORMAT_VERSION, 1, 0xFE];
        let err = GraphicsReader::decode(&data).unwrap_err();
        assert!(matches!(err, Error::UnknownOpcode { byte: 0xFE, .. }));
    }
}

//! Binary vector-graphics decoding and rendering (§4.5-§4.7): the nested
//! command/operation stream embedded in a picture record, its SVG
//! rendering, and raster-image-to-PNG conversion.

pub mod error;
pub mod form;
pub mod keyword;
pub mod raster;
pub mod reader;
pub mod svg;

pub use error::Error;
pub use form::{Form, GValue, Options};
pub use reader::GraphicsReader;
pub use svg::{render_picture_to_svg, LinkResolver};

pub fn decode(data: &[u8]) -> Result<Vec<Form>, Error> {
    GraphicsReader::decode(data)
}

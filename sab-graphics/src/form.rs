//! The graphics-form sum type (§3 DATA MODEL's "Graphics form"), plus the
//! scalar value kinds that commands can yield. Ported from the
//! `Op*`/value dataclasses used across `original_source/sab2html/svg_renderer.py`
//! and `binary_graphics.py` (those dataclasses' own field lists weren't in
//! the retrieved source, so field names here are reconstructed from how the
//! renderer uses each attribute).

pub type Options = Vec<(String, GValue)>;

#[derive(Clone, Debug, PartialEq)]
pub enum GValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Keyword(String),
    Str(String),
    FloatList(Vec<f64>),
}

impl GValue {
    pub fn as_f64(&self) -> f64 {
        match self {
            GValue::Integer(i) => *i as f64,
            GValue::Float(f) => *f,
            _ => 0.0,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            GValue::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

pub fn option_get<'a>(options: &'a Options, key: &str) -> Option<&'a GValue> {
    options.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

#[derive(Clone, Debug, PartialEq)]
pub enum Form {
    Point { x: f64, y: f64, options: Options },
    Line { start_x: f64, start_y: f64, end_x: f64, end_y: f64, options: Options },
    Lines { points: Vec<f64>, options: Options },
    Rectangle { left: f64, top: f64, right: f64, bottom: f64, options: Options },
    Triangle { x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64, options: Options },
    Polygon { points: Vec<f64>, options: Options },
    Ellipse { center_x: f64, center_y: f64, radius_x: f64, radius_y: f64, options: Options },
    BezierCurve {
        start_x: f64, start_y: f64,
        control_1_x: f64, control_1_y: f64,
        control_2_x: f64, control_2_y: f64,
        end_x: f64, end_y: f64,
        options: Options,
    },
    CubicSpline { points: Vec<f64>, options: Options },
    PathOp { function: GValue, options: Options },
    Str { x: f64, y: f64, text: String, options: Options },
    StringImage { x: f64, y: f64, text: String, options: Options },
    CircularArcTo {
        to_x: f64, to_y: f64,
        center_x: f64, center_y: f64, radius: f64,
        start_angle: f64, end_angle: f64,
        options: Options,
    },
    Image { left: f64, top: f64, image: Box<Form>, options: Options },
    LineTo { end_x: f64, end_y: f64, options: Options },
    ClosePath { options: Options },
    SetCurrentPosition { x: f64, y: f64 },
    GraphicsTransform { r11: f64, r12: f64, r21: f64, r22: f64, tx: f64, ty: f64 },
    Path { path_function: Vec<Form>, options: Options },
    RasterImage { byte_size: u8, width: i64, height: i64, data: Vec<u8> },
    ScanConversionMode { output_forms: Vec<Form>, options: Options },
}

impl Form {
    pub fn identity_transform() -> Form {
        Form::GraphicsTransform { r11: 1.0, r12: 0.0, r21: 0.0, r22: 1.0, tx: 0.0, ty: 0.0 }
    }
}

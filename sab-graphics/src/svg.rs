//! Graphics forms to SVG (§4.6). Ported from
//! `original_source/sab2html/svg_renderer.py`'s `_render_ops`/
//! `render_picture_to_svg`, including its exact number-formatting
//! convention (`_fmt`): round to 3 decimals, strip trailing zeros, keep at
//! least one digit after the point.

use crate::form::{option_get, Form, GValue};
use crate::raster;

/// `text -> href?`: resolves a reference's link text to a URL, if any.
pub trait LinkResolver {
    fn resolve(&self, text: &str) -> Option<String>;
}

impl<F: Fn(&str) -> Option<String>> LinkResolver for F {
    fn resolve(&self, text: &str) -> Option<String> {
        self(text)
    }
}

struct NoLinks;
impl LinkResolver for NoLinks {
    fn resolve(&self, _text: &str) -> Option<String> {
        None
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct BoundingBox {
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
}

impl BoundingBox {
    fn extend_point(&mut self, x: f64, y: f64) {
        self.x1 = self.x1.min(x);
        self.y1 = self.y1.min(y);
        self.x2 = self.x2.max(x);
        self.y2 = self.y2.max(y);
    }

    fn extend_box(&mut self, other: &BoundingBox) {
        self.x1 = self.x1.min(other.x1);
        self.y1 = self.y1.min(other.y1);
        self.x2 = self.x2.max(other.x2);
        self.y2 = self.y2.max(other.y2);
    }
}

fn fmt(n: f64) -> String {
    let rounded = (n * 1000.0).round() / 1000.0;
    let mut s = format!("{:.3}", rounded);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.push('0');
    }
    s
}

fn gray_to_rgb(gray_level: f64) -> String {
    let v = (255.0 * (1.0 - gray_level)).round() as i64;
    format!("rgb({},{},{})", v, v, v)
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c if is_illegal_xml_char(c) => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    out
}

fn is_illegal_xml_char(c: char) -> bool {
    let code = c as u32;
    matches!(code, 0x00..=0x08 | 0x0B | 0x0C | 0x0E..=0x1F | 0x7F..=0x84 | 0x86..=0x9F)
}

fn points_to_string(points: &[f64], invert_y: bool) -> String {
    points
        .chunks(2)
        .filter(|pair| pair.len() == 2)
        .map(|pair| {
            let y = if invert_y { -pair[1] } else { pair[1] };
            format!("{},{}", fmt(pair[0]), fmt(y))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn points_to_cubic(points: &[f64], invert_y: bool) -> String {
    let pairs: Vec<String> = points
        .chunks(2)
        .filter(|pair| pair.len() == 2)
        .map(|pair| {
            let y = if invert_y { -pair[1] } else { pair[1] };
            format!("{},{}", fmt(pair[0]), fmt(y))
        })
        .collect();
    if pairs.len() < 2 {
        return String::new();
    }
    let mut path = format!("M {}", pairs[0]);
    let rest = &pairs[1..];
    if rest.len() == 3 {
        path.push_str(&format!(" C {}", rest.join(" ")));
    } else {
        path.push_str(&format!(" Q {}", rest.join(" ")));
    }
    path
}

fn path_to_svg(path_ops: &[Form]) -> String {
    let mut parts = Vec::new();
    for el in path_ops {
        match el {
            Form::ClosePath { .. } => parts.push("Z".to_string()),
            Form::LineTo { end_x, end_y, .. } => parts.push(format!("l{},{}", fmt(*end_x), fmt(-end_y))),
            Form::SetCurrentPosition { x, y } => parts.push(format!("M{},{}", fmt(*x), fmt(-y))),
            Form::CircularArcTo { to_x, to_y, .. } => parts.push(format!("L{} {}", fmt(*to_x), fmt(-to_y))),
            Form::Lines { points, .. } => parts.push(format!("L{}", points_to_string(points, false))),
            _ => {},
        }
    }
    parts.join(" ")
}

fn transform_attr(t: &Form) -> String {
    match t {
        Form::GraphicsTransform { r11, r12, r21, r22, tx, ty } => format!(
            "matrix({} {} {} {} {} {})",
            fmt(*r11), fmt(*r12), fmt(*r21), fmt(*r22), fmt(*tx), fmt(-ty),
        ),
        _ => String::new(),
    }
}

fn option_bool(options: &[(String, GValue)], key: &str, default: bool) -> bool {
    option_get(options, key).and_then(GValue::as_bool).unwrap_or(default)
}

fn option_f64(options: &[(String, GValue)], key: &str, default: f64) -> f64 {
    option_get(options, key).map(GValue::as_f64).unwrap_or(default)
}

fn option_gray(options: &[(String, GValue)]) -> Option<f64> {
    option_get(options, ":gray-level").map(GValue::as_f64)
}

fn render_ops(ops: &[Form], transform: Form, link_resolver: &dyn LinkResolver) -> (String, BoundingBox) {
    let mut transform = transform;
    let mut bb = BoundingBox::default();
    let mut elements = Vec::new();

    let tx = |t: &Form, x: f64| match t {
        Form::GraphicsTransform { tx, .. } => x + tx,
        _ => x,
    };
    let ty = |t: &Form, y: f64| match t {
        Form::GraphicsTransform { ty, .. } => y - ty,
        _ => y,
    };

    for op in ops {
        match op {
            Form::GraphicsTransform { .. } => {
                transform = op.clone();
            },
            Form::ScanConversionMode { output_forms, .. } => {
                let (sub_svg, sub_bb) = render_ops(output_forms, transform.clone(), link_resolver);
                elements.push(sub_svg);
                bb.extend_box(&sub_bb);
            },
            Form::Line { start_x, start_y, end_x, end_y, .. } => {
                let x1 = tx(&transform, *start_x);
                let y1 = ty(&transform, -start_y);
                let x2 = tx(&transform, *end_x);
                let y2 = ty(&transform, -end_y);
                bb.extend_point(x1, y1);
                bb.extend_point(x2, y2);
                elements.push(format!(
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="#000000" fill="none"/>"#,
                    fmt(x1), fmt(y1), fmt(x2), fmt(y2),
                ));
            },
            Form::Rectangle { left, top, right, bottom, options } => {
                let filled = option_bool(options, ":filled", true);
                let thickness = option_f64(options, ":thickness", 1.0);
                let gray_level = option_gray(options);
                let x = tx(&transform, left.min(*right));
                let y = ty(&transform, -top.max(*bottom));
                let w = (right - left).abs();
                let h = (bottom - top).abs();
                bb.extend_point(x, y);
                bb.extend_point(x + w, y + h);
                if filled {
                    let fill = gray_level.map(gray_to_rgb).unwrap_or_else(|| "#000000".to_string());
                    elements.push(format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                        fmt(x), fmt(y), fmt(w), fmt(h), fill,
                    ));
                } else {
                    elements.push(format!(
                        r#"<rect x="{}" y="{}" width="{}" height="{}" stroke="#000000" stroke-width="{}" fill="none"/>"#,
                        fmt(x), fmt(y), fmt(w), fmt(h), thickness,
                    ));
                }
            },
            Form::Ellipse { center_x, center_y, radius_x, radius_y, options } => {
                let filled = option_bool(options, ":filled", true);
                let thickness = option_f64(options, ":thickness", 1.0);
                let gray_level = option_gray(options);
                let cx = fmt(tx(&transform, *center_x));
                let cy = fmt(ty(&transform, *center_y));
                let rx = fmt(*radius_x);
                let ry = fmt(*radius_y);
                if filled {
                    let fill = gray_level.map(gray_to_rgb).unwrap_or_else(|| "#000000".to_string());
                    elements.push(format!(r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" fill="{}"/>"#, cx, cy, rx, ry, fill));
                } else {
                    elements.push(format!(
                        r#"<ellipse cx="{}" cy="{}" rx="{}" ry="{}" stroke="#000000" stroke-width="{}" fill="none"/>"#,
                        cx, cy, rx, ry, thickness,
                    ));
                }
            },
            Form::Triangle { x1, y1, x2, y2, x3, y3, options } => {
                let filled = option_bool(options, ":filled", true);
                let thickness = option_f64(options, ":thickness", 1.0);
                let gray_level = option_gray(options);
                let pts = points_to_string(
                    &[tx(&transform, *x1), ty(&transform, -y1), tx(&transform, *x2), ty(&transform, -y2), tx(&transform, *x3), ty(&transform, -y3)],
                    false,
                );
                if filled {
                    let fill = gray_level.map(gray_to_rgb).unwrap_or_else(|| "#000000".to_string());
                    elements.push(format!(r#"<polygon points="{}" fill="{}"/>"#, pts, fill));
                } else {
                    elements.push(format!(r#"<polygon points="{}" stroke="#000000" stroke-width="{}" fill="none"/>"#, pts, thickness));
                }
            },
            Form::Polygon { points, .. } => {
                let pts = points_to_string(points, false);
                elements.push(format!(r#"<polygon points="{}" stroke="#000000"/>"#, pts));
            },
            Form::Lines { points, options } => {
                let thickness = option_f64(options, ":thickness", 1.0);
                let pts = points_to_string(points, true);
                let t_attr = transform_attr(&transform);
                elements.push(format!(
                    r#"<polyline points="{}" stroke="#000000" fill="none" stroke-width="{}" transform="{}"/>"#,
                    pts, thickness, t_attr,
                ));
            },
            Form::Str { x, y, text, .. } | Form::StringImage { x, y, text, .. } => {
                let ex = tx(&transform, *x);
                let ey = ty(&transform, -y);
                bb.extend_point(ex, ey);
                bb.extend_point(ex + text.chars().count() as f64 * 10.0, ey - 16.0);
                let escaped = xml_escape(text);
                match link_resolver.resolve(text) {
                    Some(href) => elements.push(format!(
                        r#"<a href="{}"><text x="{}" y="{}" fill="#1a5fa0">{}</text></a>"#,
                        href, fmt(ex), fmt(ey), escaped,
                    )),
                    None => elements.push(format!(r#"<text x="{}" y="{}">{}</text>"#, fmt(ex), fmt(ey), escaped)),
                }
            },
            Form::Path { path_function, options } => {
                let filled = option_bool(options, ":filled", true);
                let thickness = option_f64(options, ":thickness", 1.0);
                let d = path_to_svg(path_function);
                let t_attr = transform_attr(&transform);
                if filled {
                    elements.push(format!(r#"<path d="{}" fill="#000000" transform="{}"/>"#, d, t_attr));
                } else {
                    elements.push(format!(
                        r#"<path d="{}" fill="none" stroke="#000000" stroke-width="{}" transform="{}"/>"#,
                        d, thickness, t_attr,
                    ));
                }
            },
            Form::BezierCurve { start_x, start_y, control_1_x, control_1_y, control_2_x, control_2_y, end_x, end_y, options } => {
                let thickness = option_f64(options, ":thickness", 1.0);
                let d = points_to_cubic(
                    &[*start_x, *start_y, *control_1_x, *control_1_y, *control_2_x, *control_2_y, *end_x, *end_y],
                    true,
                );
                let t_attr = transform_attr(&transform);
                elements.push(format!(
                    r#"<path d="{}" stroke="#000000" fill="none" stroke-width="{}" transform="{}"/>"#,
                    d, thickness, t_attr,
                ));
            },
            Form::CubicSpline { points, options } => {
                let thickness = option_f64(options, ":thickness", 1.0);
                let d = points_to_cubic(points, true);
                let t_attr = transform_attr(&transform);
                elements.push(format!(
                    r#"<path d="{}" stroke="#000000" fill="none" stroke-width="{}" transform="{}"/>"#,
                    d, thickness, t_attr,
                ));
            },
            Form::Image { left, top, image, options } => {
                let x = tx(&transform, *left);
                let y = ty(&transform, *top);
                if let Form::RasterImage { width, height, .. } = image.as_ref() {
                    let image_right = option_get(options, ":image-right").map(GValue::as_f64);
                    let image_bottom = option_get(options, ":image-bottom").map(GValue::as_f64);
                    let w = image_right.unwrap_or(*width as f64);
                    let h = image_bottom.unwrap_or(*height as f64);
                    bb.extend_point(x, y);
                    bb.extend_point(x + w, y + h);
                    if let Ok(Some(data_uri)) = raster::data_uri_for_raster(image) {
                        elements.push(format!(
                            r#"<image x="{}" y="{}" width="{}px" height="{}px" href="{}"/>"#,
                            fmt(x), fmt(y), fmt(w), fmt(h), data_uri,
                        ));
                    }
                }
            },
            Form::Point { x, y, .. } => {
                let ex = tx(&transform, *x);
                let ey = ty(&transform, *y);
                bb.extend_point(ex, ey);
                elements.push(format!(r#"<circle cx="{}" cy="{}" r="1"/>"#, fmt(ex), fmt(ey)));
            },
            _ => {},
        }
    }

    (elements.join("\n"), bb)
}

pub fn render_picture_to_svg(ops: &[Form], link_resolver: Option<&dyn LinkResolver>) -> String {
    let resolver: &dyn LinkResolver = link_resolver.unwrap_or(&NoLinks);
    let (content, bb) = render_ops(ops, Form::identity_transform(), resolver);
    let x = fmt(bb.x1);
    let y = fmt(bb.y1);
    let w = fmt(bb.x2 - bb.x1);
    let h = fmt(bb.y2 - bb.y1);
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"{x} {y} {w} {h}\">\n<g>\n{content}\n</g>\n</svg>",
    )
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_strips_trailing_zeros_but_keeps_one_digit() {
        assert_eq!(fmt(3.0), "3.0");
        assert_eq!(fmt(3.14159), "3.142");
        assert_eq!(fmt(-0.5), "-0.5");
    }

    #[test]
    fn renders_a_point_as_a_circle() {
        let ops = vec![Form::Point { x: 1.0, y: 2.0, options: vec![] }];
        let svg = render_picture_to_svg(&ops, None);
        assert!(svg.contains("<circle"));
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn filled_rectangle_uses_gray_level() {
        let ops = vec![Form::Rectangle {
            left: 0.0, top: 0.0, right: 10.0, bottom: 10.0,
            options: vec![(":gray-level".to_string(), GValue::Float(0.5))],
        }];
        let svg = render_picture_to_svg(&ops, None);
        assert!(svg.contains("rgb(128,128,128)"));
    }

    #[test]
    fn string_with_link_resolver_wraps_anchor() {
        let ops = vec![Form::Str { x: 0.0, y: 0.0, text: "topic".to_string(), options: vec![] }];
        let resolver = |t: &str| if t == "topic" { Some("topic.html".to_string()) } else { None };
        let svg = render_picture_to_svg(&ops, Some(&resolver));
        assert!(svg.contains(r#"<a href="topic.html">"#));
    }
}

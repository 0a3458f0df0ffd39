//! Reading and writing the compact surface specification lines.
//!
//! A line is `[id] keyword p1 p2 ...`, e.g. `"12 c/y 0 0 1"` or `"so 2"`.

use crate::error::{GeomError, Result};
use crate::{Cone, Cylinder, General, Plane, Sphere, Surface};

/// Significant digits used when writing surface parameters.
pub const PRECISION: usize = 10;

/// A tokenized specification line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SpecTokens {
    /// Leading surface number, if given.
    pub id: Option<i32>,
    /// Lower-case keyword.
    pub keyword: String,
    /// Numeric parameters following the keyword.
    pub values: Vec<f64>,
}

impl SpecTokens {
    /// Fail unless the parameter count is one of `counts`.
    pub fn expect_len(&self, counts: &[usize], expected: &'static str) -> Result<()> {
        if counts.contains(&self.values.len()) {
            Ok(())
        } else {
            Err(GeomError::arity(&self.keyword, expected, self.values.len()))
        }
    }
}

/// Split a specification line into id, keyword and numbers.
pub(crate) fn tokenize(spec: &str) -> Result<SpecTokens> {
    let mut tokens = spec.split_whitespace().peekable();
    let mut id = None;
    if let Some(first) = tokens.peek() {
        if let Ok(n) = first.parse::<i32>() {
            id = Some(n);
            tokens.next();
        }
    }
    let keyword = match tokens.next() {
        Some(k) if k.starts_with(|c: char| c.is_ascii_alphabetic()) => k.to_ascii_lowercase(),
        Some(k) => return Err(GeomError::unknown("surface", k)),
        None => return Err(GeomError::Empty),
    };
    let values = tokens
        .map(|t| t.parse::<f64>().map_err(|_| GeomError::InvalidNumber(t.to_string())))
        .collect::<Result<Vec<_>>>()?;
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(GeomError::InvalidNumber(bad.to_string()));
    }
    Ok(SpecTokens {
        id,
        keyword,
        values,
    })
}

/// Axis index encoded by the trailing letter of keywords such as `px` or `c/z`.
pub(crate) fn axis_letter(keyword: &str) -> Option<usize> {
    match keyword.chars().last()? {
        'x' => Some(0),
        'y' => Some(1),
        'z' => Some(2),
        _ => None,
    }
}

/// Letter for a cardinal axis index.
pub(crate) fn axis_name(index: usize) -> char {
    ['x', 'y', 'z'][index % 3]
}

/// Format a number with [`PRECISION`] significant digits, trimming zeros.
///
/// ```
/// use quadric_kernel_geom::format_number;
/// assert_eq!(format_number(2.0), "2");
/// assert_eq!(format_number(-0.125), "-0.125");
/// assert_eq!(format_number(1.0 / 3.0), "0.3333333333");
/// ```
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }
    let exponent = value.abs().log10().floor() as i32;
    if exponent < -5 || exponent >= PRECISION as i32 {
        let text = format!("{:.*e}", PRECISION - 1, value);
        return match text.split_once('e') {
            Some((mantissa, exp)) => format!("{}e{}", trim_zeros(mantissa), exp),
            None => text,
        };
    }
    let decimals = (PRECISION as i32 - 1 - exponent).max(0) as usize;
    let text = trim_zeros(&format!("{:.*}", decimals, value));
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

fn trim_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

/// Format a list of numbers separated by single spaces.
pub(crate) fn format_list(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_number(*v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Build the surface named by the keyword of `spec`.
///
/// An optional leading integer sets the surface number.
pub fn surface_from_spec(spec: &str) -> Result<Box<dyn Surface>> {
    let tokens = tokenize(spec)?;
    let mut surface: Box<dyn Surface> = match tokens.keyword.as_str() {
        "p" | "px" | "py" | "pz" => Box::new(Plane::default()),
        "so" | "s" | "sx" | "sy" | "sz" => Box::new(Sphere::default()),
        "cx" | "cy" | "cz" | "c/x" | "c/y" | "c/z" => Box::new(Cylinder::default()),
        "kx" | "ky" | "kz" | "k/x" | "k/y" | "k/z" => Box::new(Cone::default()),
        "gq" | "sq" => Box::new(General::default()),
        other => {
            log::debug!("no surface type for keyword '{}' in '{}'", other, spec);
            return Err(GeomError::unknown("surface", other));
        }
    };
    surface.set_surface(spec)?;
    log::debug!("built {} from '{}'", surface.class_name(), spec.trim());
    Ok(surface)
}

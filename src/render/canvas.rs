//! Canvas - a logical drawing surface holding one stroke path
//!
//! Coordinates follow the usual raster convention: origin top-left, y grows
//! downward. Frontends decide how to rasterise; the canvas only keeps the
//! geometry and the stroke gradient.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    fn lerp(self, other: Rgb, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgb(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{0}' is not a #rrggbb colour")]
pub struct ParseColourError(String);

impl FromStr for Rgb {
    type Err = ParseColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColourError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ParseColourError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(rgb: Rgb) -> Self {
        rgb.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Horizontal three-stop gradient: stops at 0, 0.5 and 1 of the width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gradient {
    pub stops: [Rgb; 3],
}

impl Gradient {
    pub fn new(start: Rgb, middle: Rgb, end: Rgb) -> Self {
        Self {
            stops: [start, middle, end],
        }
    }

    /// Colour at `t` in [0, 1]; outside the range the end stops extend.
    pub fn color_at(&self, t: f64) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        if t <= 0.5 {
            self.stops[0].lerp(self.stops[1], t * 2.0)
        } else {
            self.stops[1].lerp(self.stops[2], (t - 0.5) * 2.0)
        }
    }
}

impl Default for Gradient {
    fn default() -> Self {
        Self::new(Rgb(0x8a, 0x2b, 0xe2), Rgb(0xff, 0x14, 0x93), Rgb(0x00, 0xbf, 0xff))
    }
}

#[derive(Debug, Clone)]
pub struct Canvas {
    width: u32,
    height: u32,
    /// Pen position
    cursor: Point,
    /// Current path; the first point is where the path starts
    path: Vec<Point>,
    gradient: Gradient,
}

/// Immutable copy of the canvas geometry, e.g. for capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasFrame {
    pub width: u32,
    pub height: u32,
    pub gradient: Gradient,
    pub path: Vec<Point>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            cursor: Point { x: 0.0, y: 0.0 },
            path: Vec::new(),
            gradient: Gradient::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn gradient(&self) -> &Gradient {
        &self.gradient
    }

    pub fn set_gradient(&mut self, gradient: Gradient) {
        self.gradient = gradient;
    }

    /// Erase everything drawn so far and park the pen at the origin.
    pub fn clear(&mut self) {
        self.begin_path();
        self.cursor = Point { x: 0.0, y: 0.0 };
    }

    /// Forget the current path but keep the pen where it is; the next
    /// `line_to` starts from there.
    pub fn begin_path(&mut self) {
        self.path.clear();
    }

    pub fn move_to(&mut self, x: f64, y: f64) {
        self.cursor = Point { x, y };
        self.path.clear();
        self.path.push(self.cursor);
    }

    /// Extend the path with a segment from the pen to (x, y).
    pub fn line_to(&mut self, x: f64, y: f64) {
        if self.path.is_empty() {
            self.path.push(self.cursor);
        }
        self.cursor = Point { x, y };
        self.path.push(self.cursor);
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    /// Segments with their stroke colour, sampled at each segment's midpoint.
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point, Rgb)> + '_ {
        let width = self.width as f64;
        self.path.windows(2).map(move |w| {
            let mid = (w[0].x + w[1].x) / 2.0;
            (w[0], w[1], self.gradient.color_at(mid / width))
        })
    }

    pub fn snapshot(&self) -> CanvasFrame {
        CanvasFrame {
            width: self.width,
            height: self.height,
            gradient: self.gradient,
            path: self.path.clone(),
        }
    }
}

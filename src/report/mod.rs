//! Presentation helpers: fields derived from a record at display time.
//!
//! Records only carry raw upstream values; everything here is computed on
//! demand so the parser stays a plain mapping.

use crossterm::style::Color;

pub mod format;

pub use format::*;

/// Qualifier shown when a location has no directional prefix.
pub const NEAR_THE: &str = "Near the";

/// Split a location at its first comma into `(qualifier, primary)`.
///
/// `"5km NW of Reno, NV"` gives `("5km NW of Reno", " NV")`; the primary part
/// is not trimmed. Without a comma the qualifier is `"Near the"`.
pub fn split_location(location: &str) -> (&str, &str) {
    match location.split_once(',') {
        Some((qualifier, primary)) => (qualifier, primary),
        None => (NEAR_THE, location),
    }
}

/// Color band for a magnitude badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MagnitudeBucket {
    UpTo2,
    UpTo3,
    UpTo4,
    UpTo5,
    UpTo6,
    UpTo7,
    UpTo8,
    UpTo9,
    UpTo10,
    Above10,
}

impl MagnitudeBucket {
    pub fn from_magnitude(magnitude: f64) -> Self {
        const BANDS: [(f64, MagnitudeBucket); 9] = [
            (2.0, MagnitudeBucket::UpTo2),
            (3.0, MagnitudeBucket::UpTo3),
            (4.0, MagnitudeBucket::UpTo4),
            (5.0, MagnitudeBucket::UpTo5),
            (6.0, MagnitudeBucket::UpTo6),
            (7.0, MagnitudeBucket::UpTo7),
            (8.0, MagnitudeBucket::UpTo8),
            (9.0, MagnitudeBucket::UpTo9),
            (10.0, MagnitudeBucket::UpTo10),
        ];
        BANDS
            .iter()
            .find(|(upper, _)| magnitude <= *upper)
            .map(|(_, bucket)| *bucket)
            .unwrap_or(MagnitudeBucket::Above10)
    }

    pub fn color(self) -> Color {
        let (r, g, b) = match self {
            MagnitudeBucket::UpTo2 => (0x4A, 0x7B, 0xA7),
            MagnitudeBucket::UpTo3 => (0x04, 0xB4, 0xB3),
            MagnitudeBucket::UpTo4 => (0x10, 0xCA, 0xC9),
            MagnitudeBucket::UpTo5 => (0xF5, 0xA6, 0x23),
            MagnitudeBucket::UpTo6 => (0xFF, 0x7D, 0x50),
            MagnitudeBucket::UpTo7 => (0xFC, 0x66, 0x44),
            MagnitudeBucket::UpTo8 => (0xE7, 0x5F, 0x40),
            MagnitudeBucket::UpTo9 => (0xE1, 0x3A, 0x20),
            MagnitudeBucket::UpTo10 => (0xD9, 0x32, 0x18),
            MagnitudeBucket::Above10 => (0xC0, 0x38, 0x23),
        };
        Color::Rgb { r, g, b }
    }
}

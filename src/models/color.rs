// src/models/color.rs
//
// RGBA color as stored in the settings file ("#RRGGBB" or "#RRGGBBAA")

use nannou::prelude::*;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}', expected #RRGGBB or #RRGGBBAA", self.0)
    }
}

impl std::error::Error for ParseColorError {}

fn hex_pattern() -> Option<&'static Regex> {
    static HEX: OnceLock<Option<Regex>> = OnceLock::new();
    HEX.get_or_init(|| {
        Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})?$").ok()
    })
    .as_ref()
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse "#RRGGBB" / "#RRGGBBAA"; the leading '#' is optional.
    pub fn parse_hex(input: &str) -> Option<Self> {
        let caps = hex_pattern()?.captures(input.trim())?;
        let channel = |i: usize| u8::from_str_radix(caps.get(i)?.as_str(), 16).ok();

        Some(Self {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
            a: channel(4).unwrap_or(255),
        })
    }

    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    pub fn to_rgba(&self) -> Rgba {
        rgba(
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        )
    }

    pub fn from_rgba(color: Rgba) -> Self {
        let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: to_u8(color.red),
            g: to_u8(color.green),
            b: to_u8(color.blue),
            a: to_u8(color.alpha),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse_hex(s).ok_or_else(|| ParseColorError(s.to_string()))
    }
}

impl Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let tests = vec![
            ("#FF8000", Some(Color::rgb(255, 128, 0))),
            ("ff8000", Some(Color::rgb(255, 128, 0))),
            ("#10203040", Some(Color::rgba(16, 32, 48, 64))),
            (" #000000 ", Some(Color::BLACK)),
            ("#12345", None),
            ("#GG0000", None),
            ("", None),
        ];

        for (input, expected) in tests {
            assert_eq!(Color::parse_hex(input), expected, "Failed for '{}'", input);
        }
    }

    #[test]
    fn test_hex_pattern_is_compiled_once() {
        let first = hex_pattern().unwrap();
        assert!(std::ptr::eq(first, hex_pattern().unwrap()));
        assert!(first.is_match("#A1B2C3"));
    }

    #[test]
    fn test_hex_output_drops_opaque_alpha() {
        assert_eq!(Color::rgb(1, 2, 3).to_hex(), "#010203");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::rgba(255, 0, 0, 128)).unwrap();
        assert_eq!(json, "\"#FF000080\"");

        let parsed: Color = serde_json::from_str("\"#00ff00\"").unwrap();
        assert_eq!(parsed, Color::rgb(0, 255, 0));

        assert!(serde_json::from_str::<Color>("\"green\"").is_err());
    }

    #[test]
    fn test_rgba_conversion() {
        let color = Color::rgba(255, 0, 51, 255);
        let converted = color.to_rgba();
        assert!((converted.red - 1.0).abs() < 1e-6);
        assert!((converted.blue - 0.2).abs() < 1e-6);
        assert_eq!(Color::from_rgba(converted), color);
    }
}

//! RGB colour value shared by the light and display palettes

use std::fmt;

use serde::{Deserialize, Serialize};

/// 24-bit colour. Deserialises from `"#rrggbb"` or `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "String")]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const OFF: Rgb = Rgb(0, 0, 0);

    pub const fn from_hex(value: u32) -> Self {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }

    /// ANSI 24-bit foreground escape sequence
    pub fn ansi_fg(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.0, self.1, self.2)
    }

    /// ANSI 24-bit background escape sequence
    pub fn ansi_bg(&self) -> String {
        format!("\x1b[48;2;{};{};{}m", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Channels([u8; 3]),
}

impl TryFrom<ColorRepr> for Rgb {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Channels([r, g, b]) => Ok(Rgb(r, g, b)),
            ColorRepr::Hex(text) => {
                let digits = text.trim_start_matches('#').trim_start_matches("0x");
                if digits.len() != 6 {
                    return Err(format!("invalid colour '{}', expected #rrggbb", text));
                }
                u32::from_str_radix(digits, 16)
                    .map(Rgb::from_hex)
                    .map_err(|_| format!("invalid colour '{}', expected #rrggbb", text))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_array_forms() {
        let hex: Rgb = serde_json::from_str("\"#9e6e57\"").unwrap();
        assert_eq!(hex, Rgb(0x9e, 0x6e, 0x57));

        let prefixed: Rgb = serde_json::from_str("\"0xDAAE46\"").unwrap();
        assert_eq!(prefixed, Rgb::from_hex(0xDAAE46));

        let array: Rgb = serde_json::from_str("[36, 200, 36]").unwrap();
        assert_eq!(array, Rgb(36, 200, 36));
    }

    #[test]
    fn rejects_malformed_colours() {
        assert!(serde_json::from_str::<Rgb>("\"#12345\"").is_err());
        assert!(serde_json::from_str::<Rgb>("\"#zzzzzz\"").is_err());
        assert!(serde_json::from_str::<Rgb>("[1, 2]").is_err());
    }

    #[test]
    fn serialises_as_hex_string() {
        assert_eq!(serde_json::to_string(&Rgb(252, 118, 121)).unwrap(), "\"#fc7679\"");
    }
}

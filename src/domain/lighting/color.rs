//! 16進カラーコードの変換

use serde::{Deserialize, Serialize};

/// WLED の `col` フィールドに渡す RGB 値
///
/// JSON 上では `[r, g, b]` の配列としてシリアライズされる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

/// `#RRGGBB` または `RRGGBB` 形式の文字列を RGB に変換する
///
/// 大文字・小文字は区別しない。形式に合わない入力はエラーにせず黒を返す。
pub fn hex_to_rgb(hex: &str) -> Rgb {
    parse_hex(hex).unwrap_or(Rgb::BLACK)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }

    let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Rgb(r, g, b))
}

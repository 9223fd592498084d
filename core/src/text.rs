//! Fixed-width text helpers.
//!
//! All widths are counted in characters, never bytes: a column of 20
//! holds 20 kana just as it holds 20 ASCII letters.

use crate::error::{GenError, GenResult};
use std::collections::HashMap;

/// First `limit` characters of `s`.
pub fn limit_string(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

/// Left-pads `s` with `pad` until it is `length` characters long.
/// Longer input is returned unchanged.
pub fn add_prefix_string(s: &str, pad: &str, length: usize) -> String {
    let current = s.chars().count();
    if current >= length || pad.is_empty() {
        return s.to_string();
    }
    let mut out = String::new();
    let mut filled = current;
    while filled < length {
        out.push_str(pad);
        filled += pad.chars().count();
    }
    out.push_str(s);
    limit_string(&out, length.max(current))
}

/// Left-pads to `limit` then cuts to exactly `limit` characters.
pub fn add_prefix_string_with_limit(s: &str, pad: &str, limit: usize) -> String {
    limit_string(&add_prefix_string(s, pad, limit), limit)
}

/// Right-pads to `limit` then cuts to exactly `limit` characters.
pub fn add_suffix_string_with_limit(s: &str, pad: &str, limit: usize) -> String {
    let mut out = s.to_string();
    if !pad.is_empty() {
        let mut filled = out.chars().count();
        while filled < limit {
            out.push_str(pad);
            filled += pad.chars().count();
        }
    }
    limit_string(&out, limit)
}

/// `n` copies of `c`.
pub fn repeat_char(c: char, n: usize) -> String {
    std::iter::repeat(c).take(n).collect()
}

// ── Width normalisation ─────────────────────────────────────────

const HALF_KANA: &str = "｡｢｣､･ｦｧｨｩｪｫｬｭｮｯｰｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄﾅﾆﾇﾈﾉﾊﾋﾌﾍﾎﾏﾐﾑﾒﾓﾔﾕﾖﾗﾘﾙﾚﾛﾜﾝﾞﾟ";
const FULL_KANA: &str = "。「」、・ヲァィゥェォャュョッーアイウエオカキクケコサシスセソタチツテトナニヌネノハヒフヘホマミムメモヤユヨラリルレロワン゛゜";

/// Kana that take a voiced mark (dakuten): カ行 サ行 タ行 ハ行.
const VOICEABLE: &str = "カキクケコサシスセソタチツテトハヒフヘホ";
/// Kana that take a semi-voiced mark (handakuten): ハ行.
const SEMI_VOICEABLE: &str = "ハヒフヘホ";

const HALF_VOICED_MARK: char = 'ﾞ';
const HALF_SEMI_VOICED_MARK: char = 'ﾟ';
const FULL_WIDTH_SPACE: char = '\u{3000}';
const ASCII_TO_FULL_WIDTH: u32 = 0xFEE0;

/// Converts between half-width and full-width renderings of ASCII and
/// katakana, as required by bank and convenience-store character sets.
#[derive(Debug, Clone)]
pub struct StringNormalizer {
    half_to_full: HashMap<char, char>,
    full_to_half: HashMap<char, String>,
}

impl Default for StringNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl StringNormalizer {
    pub fn new() -> Self {
        let mut half_to_full = HashMap::new();
        let mut full_to_half = HashMap::new();
        for (half, full) in HALF_KANA.chars().zip(FULL_KANA.chars()) {
            half_to_full.insert(half, full);
            full_to_half.insert(full, half.to_string());
        }
        for base in VOICEABLE.chars() {
            if let (Some(voiced), Some(half)) = (shift(base, 1), full_to_half.get(&base).cloned()) {
                full_to_half.insert(voiced, format!("{half}{HALF_VOICED_MARK}"));
            }
        }
        for base in SEMI_VOICEABLE.chars() {
            if let (Some(semi), Some(half)) = (shift(base, 2), full_to_half.get(&base).cloned()) {
                full_to_half.insert(semi, format!("{half}{HALF_SEMI_VOICED_MARK}"));
            }
        }
        full_to_half.insert('ヴ', format!("ｳ{HALF_VOICED_MARK}"));
        Self { half_to_full, full_to_half }
    }

    /// Full-width ASCII, ideographic space and half-width katakana become
    /// their half-width forms. Hiragana is first lifted to katakana.
    pub fn to_half_width(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len());
        for c in s.chars() {
            let c = hiragana_to_katakana(c);
            match c {
                FULL_WIDTH_SPACE => out.push(' '),
                '\u{FF01}'..='\u{FF5E}' => {
                    out.push(char::from_u32(c as u32 - ASCII_TO_FULL_WIDTH).unwrap_or(c))
                }
                _ => match self.full_to_half.get(&c) {
                    Some(half) => out.push_str(half),
                    None => out.push(c),
                },
            }
        }
        out
    }

    /// Half-width ASCII and katakana become full-width. A half-width kana
    /// followed by a voicing mark is folded into the single voiced kana.
    pub fn to_full_width(&self, s: &str) -> String {
        let mut out = String::with_capacity(s.len() * 3);
        let mut chars = s.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                ' ' => out.push(FULL_WIDTH_SPACE),
                '!'..='~' => out.push(char::from_u32(c as u32 + ASCII_TO_FULL_WIDTH).unwrap_or(c)),
                _ => match self.half_to_full.get(&c).copied() {
                    Some(full) => {
                        let folded = match chars.peek() {
                            Some(&HALF_VOICED_MARK) => voiced(full),
                            Some(&HALF_SEMI_VOICED_MARK) => semi_voiced(full),
                            _ => None,
                        };
                        match folded {
                            Some(v) => {
                                chars.next();
                                out.push(v);
                            }
                            None => out.push(full),
                        }
                    }
                    None => out.push(c),
                },
            }
        }
        out
    }
}

fn shift(c: char, by: u32) -> Option<char> {
    char::from_u32(c as u32 + by)
}

fn voiced(full: char) -> Option<char> {
    if full == 'ウ' {
        return Some('ヴ');
    }
    VOICEABLE.contains(full).then(|| shift(full, 1)).flatten()
}

fn semi_voiced(full: char) -> Option<char> {
    SEMI_VOICEABLE.contains(full).then(|| shift(full, 2)).flatten()
}

fn hiragana_to_katakana(c: char) -> char {
    match c {
        '\u{3041}'..='\u{3096}' => char::from_u32(c as u32 + 0x60).unwrap_or(c),
        _ => c,
    }
}

// ── Shift-JIS ───────────────────────────────────────────────────

/// Transcodes UTF-8 file content to Shift-JIS. Characters with no
/// Shift-JIS mapping are an error rather than a silent substitution.
pub fn encode_shift_jis(content: &[u8]) -> GenResult<Vec<u8>> {
    let text = std::str::from_utf8(content)
        .map_err(|e| GenError::Encoding(format!("content is not valid UTF-8: {e}")))?;
    let (bytes, _, had_errors) = encoding_rs::SHIFT_JIS.encode(text);
    if had_errors {
        return Err(GenError::Encoding(
            "content has characters that cannot be encoded to Shift-JIS".into(),
        ));
    }
    Ok(bytes.into_owned())
}

pub fn decode_shift_jis(content: &[u8]) -> GenResult<String> {
    let (text, _, had_errors) = encoding_rs::SHIFT_JIS.decode(content);
    if had_errors {
        return Err(GenError::Encoding("content is not valid Shift-JIS".into()));
    }
    Ok(text.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_padding_and_truncation() {
        assert_eq!(add_prefix_string_with_limit("test", "0", 10), "000000test");
        assert_eq!(add_prefix_string_with_limit("test", "0", 2), "te");
        assert_eq!(add_prefix_string_with_limit("1", "0", 17), "00000000000000001");
        assert_eq!(add_prefix_string("", " ", 17), " ".repeat(17));
    }

    #[test]
    fn suffix_padding_and_truncation() {
        assert_eq!(add_suffix_string_with_limit("12", "0", 4), "1200");
        assert_eq!(add_suffix_string_with_limit("abcdef", " ", 3), "abc");
        assert_eq!(add_suffix_string_with_limit("ｶﾅ", " ", 4), "ｶﾅ  ");
    }

    #[test]
    fn limit_counts_characters() {
        assert_eq!(limit_string("ありがとう", 3), "ありが");
        assert_eq!(limit_string("abc", 10), "abc");
    }

    #[test]
    fn kana_tables_line_up() {
        assert_eq!(HALF_KANA.chars().count(), FULL_KANA.chars().count());
    }

    #[test]
    fn half_width_folds_voiced_kana() {
        let n = StringNormalizer::new();
        assert_eq!(n.to_half_width("ガギグ"), "ｶﾞｷﾞｸﾞ");
        assert_eq!(n.to_half_width("パピプ"), "ﾊﾟﾋﾟﾌﾟ");
        assert_eq!(n.to_half_width("ヤマダ　タロウ"), "ﾔﾏﾀﾞ ﾀﾛｳ");
        assert_eq!(n.to_half_width("やまだ"), "ﾔﾏﾀﾞ");
        assert_eq!(n.to_half_width("０１２－ＡＢ"), "012-AB");
        assert_eq!(n.to_half_width("ヴ"), "ｳﾞ");
    }

    #[test]
    fn full_width_joins_voiced_marks() {
        let n = StringNormalizer::new();
        assert_eq!(n.to_full_width("ｶﾞｷﾞ"), "ガギ");
        assert_eq!(n.to_full_width("ﾊﾟ"), "パ");
        assert_eq!(n.to_full_width("ｱｲｳ"), "アイウ");
        assert_eq!(n.to_full_width("1,500円"), "１，５００円");
        assert_eq!(n.to_full_width("a b"), "ａ\u{3000}ｂ");
        assert_eq!(n.to_full_width("東京都"), "東京都");
    }

    #[test]
    fn shift_jis_round_trip_keeps_half_width_kana_single_byte() {
        let encoded = encode_shift_jis("ｱｲｳ".as_bytes()).unwrap();
        assert_eq!(encoded.len(), 3);
        assert_eq!(decode_shift_jis(&encoded).unwrap(), "ｱｲｳ");

        let kanji = encode_shift_jis("合計".as_bytes()).unwrap();
        assert_eq!(kanji.len(), 4);
    }

    #[test]
    fn shift_jis_rejects_unmappable_characters() {
        assert!(encode_shift_jis("😀".as_bytes()).is_err());
    }
}

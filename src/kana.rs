//! 日文字符分类与假名转换

/// 片假名转平假名时的码位偏移
const KANA_OFFSET: u32 = 0x60;

/// 是否为可注音的汉字（CJK 统一表意文字 U+4E00..=U+9FAF）
pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FAF}').contains(&c)
}

/// 文本中是否至少包含一个汉字
pub fn contains_kanji(s: &str) -> bool {
    s.chars().any(is_kanji)
}

/// 是否为可转换为平假名的片假名（ァ U+30A1 ..= ヶ U+30F6）
pub fn is_convertible_katakana(c: char) -> bool {
    ('\u{30A1}'..='\u{30F6}').contains(&c)
}

/// 片假名转平假名
///
/// 仅转换 U+30A1..=U+30F6 范围内的字符，其余字符（长音符 ー、ASCII 等）原样保留
pub fn katakana_to_hiragana(s: &str) -> String {
    s.chars()
        .map(|c| {
            if is_convertible_katakana(c) {
                char::from_u32(c as u32 - KANA_OFFSET).unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

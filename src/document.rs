use encoding_rs::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 标题为空时显示的默认标题
pub const UNTITLED: &str = "タイトルなし";

/// 输入文档
///
/// 转换时由用户输入构造，之后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// 标题
    pub title: String,
    /// 正文原文
    pub body: String,
}

impl Document {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }

    /// 从字节数据创建文档，自动检测编码（UTF-8、EUC-JP、Shift_JIS 等）
    ///
    /// 解码出错时以替换字符代替，不中断转换
    pub fn from_bytes(title: impl Into<String>, bytes: &[u8]) -> Self {
        let encoding = detect_encoding(bytes);
        let (body, _encoding_used, had_errors) = encoding.decode(bytes);
        if had_errors {
            warn!(encoding = encoding.name(), "文本解码时出现错误，可能存在乱码");
        }

        Self::new(title, body.into_owned())
    }

    /// 显示用标题，空白时为"タイトルなし"
    pub fn display_title(&self) -> &str {
        let title = self.title.trim();
        if title.is_empty() {
            UNTITLED
        } else {
            title
        }
    }

    /// 内置示例文档
    pub fn sample() -> Self {
        Self::new(SAMPLE_TITLE, SAMPLE_TEXT)
    }
}

/// 示例标题
pub const SAMPLE_TITLE: &str = "青い海の彼方";

/// 示例正文
pub const SAMPLE_TEXT: &str = "第1章：青空と少女

海の色は、まるで空の反映のようだった。
碧い波が静かに寄せ合い、砂浜に優しく触れる。
夏の日差しは強く、少女の肌に輝く汗の粒を作りだす。
彼女は瞳を閉じ、深い呼吸を繰り返す。
そう、この場所は彼女にとっての特別な逃避処だった。

第2章：海風と記憶

潮風が髪を撫で、心地よい涼しさを運ぶ。
少女は目を開け、遠く水平線を見つめる。
彼女の記憶には、同じような景色が焼き付けられていた。
それは幼い頃、家族と訪れた夏の日、初めて海を見た時のこと。
今はもう、その日のように手を繋ぐ家族はいない。
しかし、この場所が彼女に与える安らぎは変わらない。";

/// 检测文本编码
///
/// 1. BOM
/// 2. 合法 UTF-8
/// 3. 所有非 ASCII 字节都能组成 EUC-JP 双字节序列
/// 4. 能无错解码为 Shift_JIS
/// 5. 默认 UTF-8
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_length)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }

    if looks_like_euc_jp(bytes) {
        return EUC_JP;
    }

    if SHIFT_JIS
        .decode_without_bom_handling_and_without_replacement(bytes)
        .is_some()
    {
        return SHIFT_JIS;
    }

    UTF_8
}

/// 检测字节序列是否像 EUC-JP 编码
///
/// EUC-JP 编码特征：
/// - 双字节字符：两个字节都在 0xA1-0xFE
/// - 半角片假名：0x8E 后跟 0xA1-0xDF
fn looks_like_euc_jp(bytes: &[u8]) -> bool {
    let mut pairs = 0;
    let mut i = 0;

    while i < bytes.len() {
        let b1 = bytes[i];
        if b1 < 0x80 {
            i += 1;
            continue;
        }

        let Some(&b2) = bytes.get(i + 1) else {
            return false;
        };

        let valid = match b1 {
            0x8E => (0xA1..=0xDF).contains(&b2),
            0xA1..=0xFE => (0xA1..=0xFE).contains(&b2),
            _ => false,
        };
        if !valid {
            return false;
        }

        pairs += 1;
        i += 2;
    }

    pairs > 0
}

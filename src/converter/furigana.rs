use html_escape::encode_text;
use tracing::warn;

use super::AnnotationConfig;
use crate::kana::{contains_kanji, katakana_to_hiragana};
use crate::tokenizer::{Token, Tokenizer};

/// 生成 ruby 注音标记
///
/// 底字与读音均做 HTML 转义
pub fn ruby(base: &str, reading: &str) -> String {
    format!(
        "<ruby>{}<rt>{}</rt></ruby>",
        encode_text(base),
        encode_text(reading)
    )
}

/// 词元是否需要注音
///
/// 表层形至少含一个汉字，且不被排除正则命中（子串匹配，非全串匹配）。
/// 空排除正则命中一切词元。
pub fn is_annotation_eligible(surface: &str, config: &AnnotationConfig) -> bool {
    contains_kanji(surface) && !config.exclusion_pattern.is_match(surface)
}

/// 确定词元的注音读音
///
/// 1. 自定义词典优先（读音为空串的条目忽略）
/// 2. 其次使用分词器读音：已知且与表层形不同，转换为平假名
///
/// # 返回
/// 不需要注音时返回 None
pub fn reading_for(token: &Token, config: &AnnotationConfig) -> Option<String> {
    if !is_annotation_eligible(&token.surface, config) {
        return None;
    }

    if let Some(reading) = config
        .custom_dictionary
        .get(&token.surface)
        .filter(|r| !r.is_empty())
    {
        return Some(reading.clone());
    }

    token
        .reading
        .as_deref()
        .filter(|reading| *reading != token.surface)
        .map(katakana_to_hiragana)
}

/// 将词元序列拼接为带注音的 HTML 文本
pub fn annotate_tokens(tokens: &[Token], config: &AnnotationConfig) -> String {
    let mut result = String::new();

    for token in tokens {
        match reading_for(token, config) {
            Some(reading) => result.push_str(&ruby(&token.surface, &reading)),
            None => result.push_str(&encode_text(&token.surface)),
        }
    }

    result
}

/// 为一段文本添加振假名
///
/// 整段只分词一次。未开启自动注音、分词器不可用或分词失败时不注音，
/// 结果是仅经 HTML 转义的原文：`&`、`<`、`>` 被转义，其余字节不变。
/// 不含这三个字符的文本原样返回。
///
/// # 参数
/// - `text`: 段落文本（纯文本，非 HTML）
/// - `config`: 注音配置
/// - `tokenizer`: 分词器，None 表示尚未就绪
///
/// # 返回
/// 可直接嵌入 HTML 的文本
pub fn annotate(text: &str, config: &AnnotationConfig, tokenizer: Option<&dyn Tokenizer>) -> String {
    if !config.auto_furigana {
        return encode_text(text).into_owned();
    }

    let Some(tokenizer) = tokenizer else {
        return encode_text(text).into_owned();
    };

    match tokenizer.tokenize(text) {
        Ok(tokens) => annotate_tokens(&tokens, config),
        Err(e) => {
            warn!(error = %e, "分词失败，跳过振假名");
            encode_text(text).into_owned()
        }
    }
}

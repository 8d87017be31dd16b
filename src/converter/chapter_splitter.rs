use std::ops::Range;

use regex::Regex;

use super::Chapter;

/// 序章的章节号与标题
pub const PREAMBLE_NUMBER: &str = "0";
pub const PREAMBLE_TITLE: &str = "序章";

/// 未识别到章节时默认章节的章节号与标题
pub const DEFAULT_NUMBER: &str = "1";
pub const DEFAULT_TITLE: &str = "テキスト";

/// 章节标题匹配
///
/// 一次匹配在原文中的位置及两个捕获组的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingSpan {
    /// 整个标题匹配的字节范围
    pub span: Range<usize>,
    /// 章节号
    pub number: String,
    /// 章节标题（已去除首尾空白）
    pub title: String,
}

/// 从左到右扫描所有互不重叠的章节标题匹配
///
/// # 参数
/// - `text`: 原文
/// - `pattern`: 含 2 个捕获组的章节正则
///
/// # 返回
/// 按出现顺序排列的标题匹配列表
pub fn heading_spans(text: &str, pattern: &Regex) -> Vec<HeadingSpan> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let group = |i: usize| caps.get(i).map(|m| m.as_str()).unwrap_or("");
            Some(HeadingSpan {
                span: whole.range(),
                number: group(1).to_string(),
                title: group(2).trim().to_string(),
            })
        })
        .collect()
}

/// 拆分章节
///
/// 1. 第一个标题之前有文本时，作为序章（章节号 "0"）插入
/// 2. 每章正文为本章标题结束到下一章标题开始之间的文本
/// 3. 未匹配到任何标题时，整篇文本作为单个默认章节
///
/// # 参数
/// - `text`: 原文
/// - `pattern`: 含 2 个捕获组的章节正则
///
/// # 返回
/// 按阅读顺序排列的章节列表，至少包含一个章节
pub fn split(text: &str, pattern: &Regex) -> Vec<Chapter> {
    let spans = heading_spans(text, pattern);

    if spans.is_empty() {
        return vec![Chapter {
            number: DEFAULT_NUMBER.to_string(),
            title: DEFAULT_TITLE.to_string(),
            content: text.trim().to_string(),
            start_index: 0,
        }];
    }

    let mut chapters = Vec::with_capacity(spans.len() + 1);

    let first_start = spans[0].span.start;
    if first_start > 0 {
        chapters.push(Chapter {
            number: PREAMBLE_NUMBER.to_string(),
            title: PREAMBLE_TITLE.to_string(),
            content: text[..first_start].trim().to_string(),
            start_index: 0,
        });
    }

    for (i, heading) in spans.iter().enumerate() {
        let body_end = spans
            .get(i + 1)
            .map(|next| next.span.start)
            .unwrap_or(text.len());

        chapters.push(Chapter {
            number: heading.number.clone(),
            title: heading.title.clone(),
            content: text[heading.span.end..body_end].trim().to_string(),
            start_index: heading.span.start,
        });
    }

    chapters
}

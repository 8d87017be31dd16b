use std::ops::Range;

use super::ParagraphSeparator;

/// 查找段落分界
///
/// 每个分界都从一个换行符开始：
/// - 空行分界：换行符 + 任意空白 + 换行符（吞掉中间所有空行）
/// - 缩进分界：换行符且下一行以空白开头（只吞掉换行符，缩进留给下一段后被修剪）
///
/// # 参数
/// - `text`: 章节正文
/// - `mode`: 分割方式
///
/// # 返回
/// 互不重叠、按顺序排列的分界字节范围
pub fn boundary_spans(text: &str, mode: ParagraphSeparator) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('\n') {
        let start = pos + offset;
        let end = match mode {
            ParagraphSeparator::EmptyLine => empty_line_end(text, start),
            ParagraphSeparator::Indent => indent_end(text, start),
            ParagraphSeparator::Both => {
                empty_line_end(text, start).or_else(|| indent_end(text, start))
            }
        };

        match end {
            Some(end) => {
                spans.push(start..end);
                pos = end;
            }
            None => pos = start + 1,
        }
    }

    spans
}

/// 空行分界的结束位置
///
/// 从 `newline` 之后的连续空白中取最后一个换行符
fn empty_line_end(text: &str, newline: usize) -> Option<usize> {
    let rest = &text[newline + 1..];
    let blank_len = rest
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(rest.len());

    rest[..blank_len]
        .rfind('\n')
        .map(|i| newline + 1 + i + 1)
}

/// 缩进分界的结束位置
fn indent_end(text: &str, newline: usize) -> Option<usize> {
    text[newline + 1..]
        .chars()
        .next()
        .filter(|c| c.is_whitespace())
        .map(|_| newline + 1)
}

/// 分割段落
///
/// # 参数
/// - `content`: 章节正文
/// - `mode`: 分割方式
///
/// # 返回
/// 去除首尾空白后的非空段落列表，顺序与原文一致
pub fn segment(content: &str, mode: ParagraphSeparator) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut start = 0;

    for span in boundary_spans(content, mode) {
        push_paragraph(&mut paragraphs, &content[start..span.start]);
        start = span.end;
    }
    push_paragraph(&mut paragraphs, &content[start..]);

    paragraphs
}

fn push_paragraph(paragraphs: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        paragraphs.push(trimmed.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_by_empty_line() {
        let content = "一段目。\n一段目の続き。\n\n二段目。\n\n\n\n三段目。";
        let paragraphs = segment(content, ParagraphSeparator::EmptyLine);

        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0], "一段目。\n一段目の続き。");
        assert_eq!(paragraphs[1], "二段目。");
        assert_eq!(paragraphs[2], "三段目。");
    }

    #[test]
    fn test_empty_line_with_spaces() {
        let content = "一段目。\n  \t\n二段目。";
        let paragraphs = segment(content, ParagraphSeparator::EmptyLine);
        assert_eq!(paragraphs, vec!["一段目。", "二段目。"]);
    }

    #[test]
    fn test_empty_line_mode_ignores_indent() {
        let content = "一段目。\n　字下げの行。";
        let paragraphs = segment(content, ParagraphSeparator::EmptyLine);
        assert_eq!(paragraphs, vec!["一段目。\n　字下げの行。"]);
    }

    #[test]
    fn test_split_by_indent() {
        // 全角空格缩进
        let content = "　一段目。\n続き。\n　二段目。\n\t三段目。";
        let paragraphs = segment(content, ParagraphSeparator::Indent);

        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0], "一段目。\n続き。");
        assert_eq!(paragraphs[1], "二段目。");
        assert_eq!(paragraphs[2], "三段目。");
    }

    #[test]
    fn test_indent_mode_treats_blank_line_as_indent() {
        // 空行的下一字符是换行符，同样视为行首空白
        let content = "一段目。\n\n二段目。";
        let paragraphs = segment(content, ParagraphSeparator::Indent);
        assert_eq!(paragraphs, vec!["一段目。", "二段目。"]);
    }

    #[test]
    fn test_indent_mode_keeps_plain_lines_together() {
        let content = "一行目。\n二行目。";
        let paragraphs = segment(content, ParagraphSeparator::Indent);
        assert_eq!(paragraphs, vec!["一行目。\n二行目。"]);
    }

    #[test]
    fn test_split_by_both() {
        let content = "一段目。\n続き。\n\n二段目。\n　三段目。\n続き。";
        let paragraphs = segment(content, ParagraphSeparator::Both);

        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0], "一段目。\n続き。");
        assert_eq!(paragraphs[1], "二段目。");
        assert_eq!(paragraphs[2], "三段目。\n続き。");
    }

    #[test]
    fn test_boundary_spans_do_not_overlap() {
        let content = "あ\n\n\n　い\nう";
        let spans = boundary_spans(content, ParagraphSeparator::Both);

        assert_eq!(spans.len(), 1);
        // 空行分界吞到最后一个换行符为止，缩进留在下一段
        assert_eq!(&content[spans[0].clone()], "\n\n\n");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert!(segment("", ParagraphSeparator::Both).is_empty());
        assert!(segment("   \n\n   \n   ", ParagraphSeparator::Both).is_empty());
        assert!(segment("\n\n", ParagraphSeparator::EmptyLine).is_empty());
    }

    #[test]
    fn test_single_paragraph() {
        let paragraphs = segment("改行のない文章。", ParagraphSeparator::Both);
        assert_eq!(paragraphs, vec!["改行のない文章。"]);
    }

    proptest! {
        #[test]
        fn prop_paragraphs_never_empty(content in "[あい漢。 　\\t\\n]{0,60}", mode_index in 0usize..3) {
            let mode = [
                ParagraphSeparator::EmptyLine,
                ParagraphSeparator::Indent,
                ParagraphSeparator::Both,
            ][mode_index];

            for paragraph in segment(&content, mode) {
                prop_assert!(!paragraph.trim().is_empty());
                prop_assert_eq!(paragraph.trim(), paragraph.as_str());
            }
        }

        #[test]
        fn prop_segment_preserves_visible_text(content in "[あい漢。 \\n]{0,60}") {
            let visible = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
            let joined: String = segment(&content, ParagraphSeparator::Both).concat();
            prop_assert_eq!(visible(&joined), visible(&content));
        }
    }
}

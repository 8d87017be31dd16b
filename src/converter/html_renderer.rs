use std::fmt::Write;

use html_escape::encode_text;
use tracing::debug;

use super::Chapter;
use crate::document::Document;

/// 章节锚点 ID（从 1 开始编号）
pub fn chapter_anchor(index: usize) -> String {
    format!("chapter{}", index + 1)
}

/// 章节显示标签：第N章：标题
pub fn chapter_label(chapter: &Chapter) -> String {
    format!("第{}章：{}", chapter.number, chapter.title)
}

/// 生成 HTML 片段
///
/// 先输出目录块，再输出正文块。每章正文先分段、再逐段注音。
///
/// # 参数
/// - `document`: 输入文档（提供标题）
/// - `chapters`: 拆分后的章节
/// - `annotate`: 段落注音函数，返回可直接嵌入 HTML 的文本
/// - `segment`: 段落分割函数
///
/// # 返回
/// HTML 字符串；相同输入总是得到相同输出
pub fn render<A, S>(document: &Document, chapters: &[Chapter], annotate: A, segment: S) -> String
where
    A: Fn(&str) -> String,
    S: Fn(&str) -> Vec<String>,
{
    let mut html = String::new();

    // 目次
    html.push_str("<!-- 目次セクション -->\n<div class=\"toc\">\n");
    let _ = writeln!(html, "<h1>{}</h1>", encode_text(document.display_title()));
    html.push_str("<h3>目次</h3>\n<ul>\n");
    for (index, chapter) in chapters.iter().enumerate() {
        let _ = writeln!(
            html,
            "<li><a href=\"#{}\">{}</a></li>",
            chapter_anchor(index),
            encode_text(&chapter_label(chapter))
        );
    }
    html.push_str("</ul>\n</div>\n\n");

    // 本文
    html.push_str("<!-- 本文コンテンツ -->\n<div id=\"content\" class=\"content\">\n");
    for (index, chapter) in chapters.iter().enumerate() {
        let _ = writeln!(
            html,
            "<h4 id=\"{}\">{}</h4>",
            chapter_anchor(index),
            encode_text(&chapter_label(chapter))
        );

        let paragraphs = segment(&chapter.content);
        debug!(chapter = index + 1, paragraphs = paragraphs.len(), "生成章节正文");

        for paragraph in &paragraphs {
            let trimmed = paragraph.trim();
            if !trimmed.is_empty() {
                let _ = writeln!(html, "<p>{}</p>", annotate(trimmed));
            }
        }
    }
    html.push_str("</div>");

    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chapter(number: &str, title: &str, content: &str) -> Chapter {
        Chapter {
            number: number.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            start_index: 0,
        }
    }

    fn plain(text: &str) -> String {
        encode_text(text).into_owned()
    }

    fn by_line(content: &str) -> Vec<String> {
        content.lines().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_chapter_anchor_and_label() {
        assert_eq!(chapter_anchor(0), "chapter1");
        assert_eq!(chapter_anchor(9), "chapter10");
        assert_eq!(chapter_label(&chapter("0", "序章", "")), "第0章：序章");
    }

    #[test]
    fn test_render_layout() {
        let document = Document::new("青い海", "unused");
        let chapters = vec![
            chapter("1", "始まり", "一行目\n二行目"),
            chapter("2", "終わり", "最後"),
        ];

        let html = render(&document, &chapters, plain, by_line);

        let expected = "<!-- 目次セクション -->\n<div class=\"toc\">\n<h1>青い海</h1>\n<h3>目次</h3>\n<ul>\n\
<li><a href=\"#chapter1\">第1章：始まり</a></li>\n\
<li><a href=\"#chapter2\">第2章：終わり</a></li>\n\
</ul>\n</div>\n\n<!-- 本文コンテンツ -->\n<div id=\"content\" class=\"content\">\n\
<h4 id=\"chapter1\">第1章：始まり</h4>\n<p>一行目</p>\n<p>二行目</p>\n\
<h4 id=\"chapter2\">第2章：終わり</h4>\n<p>最後</p>\n</div>";
        assert_eq!(html, expected);
    }

    #[test]
    fn test_render_uses_default_title() {
        let document = Document::new("   ", "body");
        let html = render(&document, &[chapter("1", "テキスト", "body")], plain, by_line);
        assert!(html.contains("<h1>タイトルなし</h1>"));
    }

    #[test]
    fn test_render_escapes_titles() {
        let document = Document::new("A & B", "body");
        let html = render(&document, &[chapter("1", "<script>", "x")], plain, by_line);
        assert!(html.contains("<h1>A &amp; B</h1>"));
        assert!(html.contains("第1章：&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_render_skips_blank_paragraphs() {
        let document = Document::new("t", "body");
        let segment = |_: &str| vec!["  ".to_string(), " 本文 ".to_string()];
        let html = render(&document, &[chapter("1", "一", "ignored")], plain, segment);
        assert!(html.contains("<p>本文</p>"));
        assert_eq!(html.matches("<p>").count(), 1);
    }

    #[test]
    fn test_render_is_deterministic() {
        let document = Document::new("題", "body");
        let chapters = vec![chapter("1", "一", "あ\nい"), chapter("2", "二", "う")];
        let first = render(&document, &chapters, plain, by_line);
        let second = render(&document, &chapters, plain, by_line);
        assert_eq!(first, second);
    }
}

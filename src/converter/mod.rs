use std::collections::HashMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::{ConfigError, ConvertError};
use crate::settings::ConverterSettings;
use crate::tokenizer::Tokenizer;

// 子模块声明
pub mod chapter_splitter;
pub mod paragraph_segmenter;
pub mod furigana;
pub mod html_renderer;


/// 段落分割方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParagraphSeparator {
    /// 按空行分割
    EmptyLine,
    /// 按行首缩进分割
    Indent,
    /// 空行或行首缩进均分割
    #[default]
    Both,
}

/// 章节数据
///
/// 表示拆分后的一个章节
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 章节号（第一个捕获组），序章为 "0"
    pub number: String,
    /// 章节标题（第二个捕获组，已去除首尾空白）
    pub title: String,
    /// 章节正文（已去除首尾空白，不含标题行）
    pub content: String,
    /// 章节标题在原文中的字节偏移
    pub start_index: usize,
}

/// 注音配置
///
/// 由 `ConverterSettings` 编译而来，正则只编译一次。流水线只读取，不修改。
#[derive(Debug, Clone)]
pub struct AnnotationConfig {
    /// 章节识别正则
    pub chapter_pattern: Regex,
    /// 是否自动添加振假名
    pub auto_furigana: bool,
    /// 自定义词典：表层形 -> 读音
    pub custom_dictionary: HashMap<String, String>,
    /// 排除正则，按原样编译；空串匹配任何词元，即不注音
    pub exclusion_pattern: Regex,
    /// 段落分割方式
    pub paragraph_separator: ParagraphSeparator,
}

impl AnnotationConfig {
    /// 编译设置
    ///
    /// # 返回
    /// 章节正则无效、捕获组数量不为 2 或排除正则无效时返回错误
    pub fn from_settings(settings: &ConverterSettings) -> Result<Self, ConfigError> {
        let chapter_pattern = Regex::new(&settings.chapter_pattern)
            .map_err(ConfigError::InvalidChapterPattern)?;

        // captures_len 包含整体匹配的第 0 组
        let groups = chapter_pattern.captures_len() - 1;
        if groups != 2 {
            return Err(ConfigError::ChapterPatternGroups { found: groups });
        }

        let exclusion_pattern = Regex::new(&settings.exclude_patterns)
            .map_err(ConfigError::InvalidExclusionPattern)?;

        Ok(Self {
            chapter_pattern,
            auto_furigana: settings.auto_furigana,
            custom_dictionary: settings.custom_dict.clone(),
            exclusion_pattern,
            paragraph_separator: settings.paragraph_separator,
        })
    }
}

/// 默认配置，等同于 `AnnotationConfig::from_settings(&ConverterSettings::default())`
///
/// # Panics
/// 仅当内置常量 `DEFAULT_CHAPTER_PATTERN` 或 `DEFAULT_EXCLUDE_PATTERNS` 无效时崩溃（程序缺陷）。
/// 用户设置请使用 `from_settings`，错误以 `ConfigError` 返回。
impl Default for AnnotationConfig {
    fn default() -> Self {
        match Self::from_settings(&ConverterSettings::default()) {
            Ok(config) => config,
            Err(e) => panic!("内置默认设置无效: {}", e),
        }
    }
}

/// 转换器
///
/// 串联章节拆分、段落分割、振假名注音和 HTML 生成
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: AnnotationConfig,
}

impl Converter {
    /// 使用已编译的配置创建转换器
    pub fn new(config: AnnotationConfig) -> Self {
        Self { config }
    }

    /// 从设置创建转换器，配置错误在此处同步报告
    pub fn from_settings(settings: &ConverterSettings) -> Result<Self, ConfigError> {
        Ok(Self::new(AnnotationConfig::from_settings(settings)?))
    }

    pub fn config(&self) -> &AnnotationConfig {
        &self.config
    }

    /// 拆分章节
    pub fn parse(&self, document: &Document) -> Vec<Chapter> {
        chapter_splitter::split(&document.body, &self.config.chapter_pattern)
    }

    /// 完整转换流程
    ///
    /// # 参数
    /// - `document`: 输入文档
    /// - `tokenizer`: 分词器，None 表示尚未就绪（注音回退为纯文本）
    ///
    /// # 返回
    /// 生成的 HTML 片段；输入为空时返回错误
    pub fn convert(
        &self,
        document: &Document,
        tokenizer: Option<&dyn Tokenizer>,
    ) -> Result<String, ConvertError> {
        if document.body.trim().is_empty() {
            return Err(ConvertError::EmptyInput);
        }

        if self.config.auto_furigana && tokenizer.is_none() {
            warn!("分词器尚未就绪，输出不含振假名");
        }

        let chapters = self.parse(document);
        debug!(chapters = chapters.len(), "章节拆分完成");

        let config = &self.config;
        let html = html_renderer::render(
            document,
            &chapters,
            |text| furigana::annotate(text, config, tokenizer),
            |content| paragraph_segmenter::segment(content, config.paragraph_separator),
        );

        Ok(html)
    }
}

/// 按设置一次性完成转换
///
/// 配置在产生任何输出之前校验
pub fn convert(
    document: &Document,
    settings: &ConverterSettings,
    tokenizer: Option<&dyn Tokenizer>,
) -> Result<String, ConvertError> {
    Converter::from_settings(settings)?.convert(document, tokenizer)
}

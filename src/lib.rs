//! 日文纯文本转换器
//!
//! 将纯文本拆分为章节与段落，借助外部分词器为汉字加注振假名，
//! 最终生成带目录的 HTML 片段供阅读页面使用。

pub mod converter;
pub mod document;
pub mod error;
pub mod kana;
pub mod settings;
pub mod tokenizer;

// 重新导出主要类型
pub use converter::{convert, AnnotationConfig, Chapter, Converter, ParagraphSeparator};
pub use document::Document;
pub use error::{ConfigError, ConvertError, SettingsError, TokenizerError};
pub use settings::{
    load_settings, reset_settings, save_settings, ConverterSettings, JsonFileStore, MemoryStore,
    SettingsStore,
};
pub use tokenizer::{LoadState, Token, Tokenizer, TokenizerLoader};

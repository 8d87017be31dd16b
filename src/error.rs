use thiserror::Error;

/// 配置错误
///
/// 在转换开始之前同步报告，出现时不会产生任何输出
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("章节正则表达式无效: {0}")]
    InvalidChapterPattern(#[source] regex::Error),
    #[error("章节正则表达式必须恰好包含 2 个捕获组（章节号、章节标题），实际为 {found} 个")]
    ChapterPatternGroups { found: usize },
    #[error("排除正则表达式无效: {0}")]
    InvalidExclusionPattern(#[source] regex::Error),
}

/// 转换错误
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("输入文本为空")]
    EmptyInput,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// 设置读写错误
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("设置 JSON 解析失败: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("设置 JSON 序列化失败: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("自定义词典 JSON 格式不正确: {0}")]
    Dictionary(#[source] serde_json::Error),
    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),
}

/// 分词器错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenizerError {
    #[error("分词器尚未就绪")]
    Unavailable,
    #[error("分词器加载失败: {0}")]
    LoadFailed(String),
    #[error("分词失败: {0}")]
    Tokenize(String),
}

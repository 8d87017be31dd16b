//! 转换设置与持久化
//!
//! 设置以 JSON 形式保存在键值存储中，键名为 `converterSettings`。
//! 存储能力由调用方注入，流水线本身只接收不可变的设置值。

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::converter::ParagraphSeparator;
use crate::error::SettingsError;

/// 存储中保存设置使用的键
pub const SETTINGS_KEY: &str = "converterSettings";

/// 默认章节识别模式：第N章：标题，N 仅限半角数字
pub const DEFAULT_CHAPTER_PATTERN: &str = r"第([0-9]+)章[:：](.+)";

/// 默认排除模式：常见助词、助动词和人称代词
pub const DEFAULT_EXCLUDE_PATTERNS: &str = "(のだ|した|です|ます|でした|ました|である|ている|でも|けれど|から|まで|など|それ|これ|あれ|どれ|私|僕|俺|あなた|君|彼|彼女)";

/// 转换设置
///
/// 字段名与浏览器端保存的 JSON 保持一致
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConverterSettings {
    /// 章节识别正则（2 个捕获组：章节号、章节标题）
    pub chapter_pattern: String,
    /// 是否自动添加振假名
    pub auto_furigana: bool,
    /// 自定义词典：表层形 -> 读音
    pub custom_dict: HashMap<String, String>,
    /// 排除正则，匹配到的词元不加注音
    pub exclude_patterns: String,
    /// 段落分割方式
    pub paragraph_separator: ParagraphSeparator,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            chapter_pattern: DEFAULT_CHAPTER_PATTERN.to_string(),
            auto_furigana: true,
            custom_dict: HashMap::new(),
            exclude_patterns: DEFAULT_EXCLUDE_PATTERNS.to_string(),
            paragraph_separator: ParagraphSeparator::Both,
        }
    }
}

impl ConverterSettings {
    /// 从编辑框文本设置自定义词典
    ///
    /// 空白文本视为空词典。JSON 格式不正确时词典被重置为空并返回错误。
    pub fn set_custom_dictionary_json(&mut self, text: &str) -> Result<(), SettingsError> {
        let text = text.trim();
        if text.is_empty() {
            self.custom_dict.clear();
            return Ok(());
        }

        match serde_json::from_str::<HashMap<String, String>>(text) {
            Ok(dict) => {
                self.custom_dict = dict;
                Ok(())
            }
            Err(e) => {
                self.custom_dict.clear();
                Err(SettingsError::Dictionary(e))
            }
        }
    }

    /// 将自定义词典格式化为便于编辑的 JSON
    ///
    /// 词典为空时返回空串，键按字典序排列
    pub fn custom_dictionary_json(&self) -> String {
        if self.custom_dict.is_empty() {
            return String::new();
        }

        let sorted: BTreeMap<&str, &str> = self
            .custom_dict
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        serde_json::to_string_pretty(&sorted).unwrap_or_default()
    }
}

/// 键值存储 trait
///
/// 设置的持久化能力，由调用方提供
pub trait SettingsStore {
    /// 读取键对应的值，不存在时返回 None
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;

    /// 写入键值
    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError>;
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let entries = self.entries.lock().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::Other, format!("锁定存储失败: {}", e))
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut entries = self.entries.lock().map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::Other, format!("锁定存储失败: {}", e))
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// JSON 文件存储
///
/// 整个存储是磁盘上的一个 JSON 对象，每次写入都会重写整个文件
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SettingsError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(SettingsError::Parse)
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SettingsError> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());

        // 确保目录存在
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_string_pretty(&entries).map_err(SettingsError::Serialize)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// 读取设置
///
/// 存储中没有设置时返回默认值
pub fn load_settings(store: &dyn SettingsStore) -> Result<ConverterSettings, SettingsError> {
    match store.get(SETTINGS_KEY)? {
        Some(json) => {
            debug!("从存储读取设置");
            serde_json::from_str(&json).map_err(SettingsError::Parse)
        }
        None => Ok(ConverterSettings::default()),
    }
}

/// 保存设置
pub fn save_settings(
    store: &dyn SettingsStore,
    settings: &ConverterSettings,
) -> Result<(), SettingsError> {
    let json = serde_json::to_string(settings).map_err(SettingsError::Serialize)?;
    store.set(SETTINGS_KEY, &json)?;
    info!("设置已保存");
    Ok(())
}

/// 恢复默认设置并写回存储
pub fn reset_settings(store: &dyn SettingsStore) -> Result<ConverterSettings, SettingsError> {
    let settings = ConverterSettings::default();
    save_settings(store, &settings)?;
    info!("设置已恢复默认值");
    Ok(settings)
}

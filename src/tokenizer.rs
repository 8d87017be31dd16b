//! 分词器接入模块
//!
//! 分词器本身是外部服务：输入纯文本，输出带表层形与读音的词元序列。
//! 字典资源需要异步加载，加载完成前注音功能不可用。

use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::TokenizerError;

/// 分词器表示"读音未知"的占位符
pub const UNKNOWN_READING: &str = "*";

/// 词元
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// 表层形
    pub surface: String,
    /// 读音（片假名），未知时为 None
    pub reading: Option<String>,
}

impl Token {
    /// 由分词器原始输出创建词元
    ///
    /// 读音为 `"*"` 或空串时视为未知
    pub fn new(surface: impl Into<String>, reading: impl Into<String>) -> Self {
        let reading = reading.into();
        let reading = if reading.is_empty() || reading == UNKNOWN_READING {
            None
        } else {
            Some(reading)
        };

        Self {
            surface: surface.into(),
            reading,
        }
    }
}

/// 分词器 trait
///
/// 所有外部分词器必须实现此 trait
pub trait Tokenizer: Send + Sync {
    /// 对整段文本分词
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizerError>;
}

impl<F> Tokenizer for F
where
    F: Fn(&str) -> Result<Vec<Token>, TokenizerError> + Send + Sync,
{
    fn tokenize(&self, text: &str) -> Result<Vec<Token>, TokenizerError> {
        self(text)
    }
}

/// 分词器加载状态
#[derive(Clone)]
pub enum LoadState {
    /// 正在加载
    Loading,
    /// 加载完成
    Ready(Arc<dyn Tokenizer>),
    /// 加载失败
    Failed(TokenizerError),
}

/// 分词器加载器
///
/// 一次性异步加载分词器，不设超时。调用方可以用 `current()` 轮询，
/// 也可以 `ready().await` 等待加载结束。
#[derive(Clone)]
pub struct TokenizerLoader {
    state: watch::Receiver<LoadState>,
}

impl TokenizerLoader {
    /// 在 tokio 运行时中启动加载任务
    ///
    /// 必须在 tokio 运行时上下文中调用
    pub fn spawn<F, T>(load: F) -> Self
    where
        F: Future<Output = Result<T, TokenizerError>> + Send + 'static,
        T: Tokenizer + 'static,
    {
        let (tx, rx) = watch::channel(LoadState::Loading);

        tokio::spawn(async move {
            let state = match load.await {
                Ok(tokenizer) => {
                    info!("分词器加载完成");
                    LoadState::Ready(Arc::new(tokenizer))
                }
                Err(e) => {
                    warn!(error = %e, "分词器加载失败");
                    LoadState::Failed(e)
                }
            };
            // 所有接收端都已释放时无需通知
            let _ = tx.send(state);
        });

        Self { state: rx }
    }

    /// 包装一个已经构建好的分词器
    pub fn ready_now<T: Tokenizer + 'static>(tokenizer: T) -> Self {
        let (_tx, rx) = watch::channel(LoadState::Ready(Arc::new(tokenizer)));
        Self { state: rx }
    }

    /// 当前状态的快照
    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// 非阻塞获取分词器，未就绪时返回 None
    pub fn current(&self) -> Option<Arc<dyn Tokenizer>> {
        match &*self.state.borrow() {
            LoadState::Ready(tokenizer) => Some(Arc::clone(tokenizer)),
            _ => None,
        }
    }

    /// 是否已就绪
    pub fn is_ready(&self) -> bool {
        matches!(&*self.state.borrow(), LoadState::Ready(_))
    }

    /// 等待加载结束
    ///
    /// # 返回
    /// 加载成功返回分词器，失败返回加载错误
    pub async fn ready(&self) -> Result<Arc<dyn Tokenizer>, TokenizerError> {
        let mut rx = self.state.clone();
        let state = rx
            .wait_for(|s| !matches!(s, LoadState::Loading))
            .await
            .map_err(|_| TokenizerError::LoadFailed("加载任务意外终止".to_string()))?;

        match &*state {
            LoadState::Ready(tokenizer) => Ok(Arc::clone(tokenizer)),
            LoadState::Failed(e) => Err(e.clone()),
            LoadState::Loading => Err(TokenizerError::Unavailable),
        }
    }
}

//! 错误类型定义
//!
//! 只有启动阶段（浏览器获取、登录）的错误会终止进程；
//! 扫描阶段的单条评论、单页失败全部就地吸收，轮询循环保持前进。
//! 翻页失败与回复提交失败按约定以 `Ok(false)` 信号表达，不走错误通道。

use thiserror::Error;

/// 应用错误类型
#[derive(Error, Debug)]
pub enum AutoReplyError {
    /// 浏览器获取失败（致命，终止启动）
    #[error("浏览器启动失败: {0}")]
    BrowserSetup(String),

    /// 登录 / 凭证获取失败（致命，终止启动）
    #[error("用户登录失败: {0}")]
    Credential(String),

    /// 配置文件无法解析
    #[error("配置文件无效 ({path}): {reason}")]
    ConfigFile { path: String, reason: String },

    /// 评论时间文本无法解析（单条评论级别，调用方跳过该评论）
    #[error("无法解析时间文本: '{0}'")]
    TimeParse(String),
}

/// 应用结果类型
pub type AppResult<T> = Result<T, AutoReplyError>;

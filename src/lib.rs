//! # Bilibili Autoreply
//!
//! 哔哩哔哩创作中心评论自动回复工具
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() / 导航能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单条评论
//! - `CommentFeed` - 评论流能力契约（列举 / 字段查询 / 提交回复 / 翻页）
//! - `MemberCommentPage` - 契约在创作中心评论页上的实现
//! - `classifier` - 评论分类（纯逻辑）
//! - `ReplyDecisionEngine` - 回复决策与话术选择
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一轮会话扫描"的完整流程
//! - `ScanCtx` - 会话上下文（时间水位 + 已回复集合 + 本人用户名）
//! - `ScanFlow` - 逐页扫描、容错探测、水位收束
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/poll_loop` - 轮询调度，持有浏览器资源，保证释放
//!
//! 认证（`auth/`）与浏览器获取（`browser/`）是外部协作方：
//! 登录失败终止启动，扫描核心对它们没有其他依赖。

pub mod auth;
pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppResult, AutoReplyError};
pub use infrastructure::JsExecutor;
pub use models::{CommentId, CommentRecord};
pub use orchestrator::App;
pub use services::{classify, Classification, CommentFeed, ItemRef, MemberCommentPage};
pub use workflow::{ScanCtx, ScanFlow, ScanReport};

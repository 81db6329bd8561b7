//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! poll_loop::App (轮询调度、资源持有)
//!     ↓
//! workflow::ScanFlow (一轮会话扫描)
//!     ↓
//! services (能力层：评论流 / 分类 / 回复决策)
//!     ↓
//! infrastructure (基础设施：JsExecutor)
//! ```
//!
//! 只有编排层持有 Browser；向下只做调度和统计，不做业务判断。

pub mod poll_loop;

pub use poll_loop::App;

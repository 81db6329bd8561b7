//! 评论流能力契约 - 业务能力层
//!
//! 扫描核心只面对这份契约，不关心背后是无头浏览器还是别的什么页面来源。
//! 约定：
//! - 字段查询失败（`Err` 或 `Ok(None)`）→ 调用方跳过该条评论，继续本页；
//! - `submit_reply` 返回 `Ok(false)` 表示提交未成功，标识不被记录；
//! - `next_page` 返回 `Ok(false)` 表示没有下一页或翻页失败，本轮会话的
//!   页面推进到此为止（不致命）。
//!
//! 所有方法取 `&mut self`：页面不支持并发操作，借用规则直接排除了
//! 两次页面往返的重叠执行。

use anyhow::Result;
use async_trait::async_trait;

/// 当前页面上一条评论的不透明句柄
///
/// 只在一次 `items()` 返回到下一次页面变动之间有效。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRef(pub usize);

/// 评论流
#[async_trait]
pub trait CommentFeed {
    /// 回到评论列表首页并等待渲染
    async fn refresh(&mut self) -> Result<()>;

    /// 列出当前页渲染出的全部评论项（页面自然顺序）
    async fn items(&mut self) -> Result<Vec<ItemRef>>;

    /// 作者 mid，元素缺失时为 `None`
    async fn author_mid(&mut self, item: ItemRef) -> Result<Option<String>>;

    /// 作者显示名，元素缺失时为 `None`
    async fn author_name(&mut self, item: ItemRef) -> Result<Option<String>>;

    /// 页面渲染的评论时间文本，元素缺失时为 `None`
    async fn time_text(&mut self, item: ItemRef) -> Result<Option<String>>;

    /// 可见的关注关系标签文本，无标签时为 `None`
    async fn follow_label(&mut self, item: ItemRef) -> Result<Option<String>>;

    /// 标题区域是否带"回复"标签
    async fn has_reply_tag(&mut self, item: ItemRef) -> Result<bool>;

    /// 对指定评论提交一条回复，返回是否提交成功
    async fn submit_reply(&mut self, item: ItemRef, text: &str) -> Result<bool>;

    /// 前往下一页，返回是否成功（`false` = 没有下一页或翻页失败）
    async fn next_page(&mut self) -> Result<bool>;
}

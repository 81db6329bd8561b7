//! 创作中心评论页 - 业务能力层
//!
//! `CommentFeed` 契约在创作中心评论管理页上的实现。所有 DOM 访问都编译成
//! JS 片段交给 `JsExecutor` 执行；选择器对应页面当前的 class 命名
//! （comment-list-item / user-avatar / ci-action / relation-label /
//! ci-title-split / reply-wrap / bcc-pagination-next）。
//! 页面布局变化不在本模块的容错范围内，表现为查询返回空。

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::infrastructure::JsExecutor;
use crate::services::comment_feed::{CommentFeed, ItemRef};

/// 评论列表项选择器
const ITEM_SELECTOR: &str = "div[class*='comment-list-item']";

/// 创作中心评论页
pub struct MemberCommentPage {
    executor: JsExecutor,
    feed_url: String,
    /// 回复框出现 / 提交落地的固定等待
    reply_settle: Duration,
    /// 翻页、刷新后的固定渲染等待
    page_settle: Duration,
}

impl MemberCommentPage {
    pub fn new(executor: JsExecutor, config: &Config) -> Self {
        Self {
            executor,
            feed_url: config.comment_page_url.clone(),
            reply_settle: Duration::from_secs(config.reply_settle_secs),
            page_settle: Duration::from_secs(config.page_settle_secs),
        }
    }

    /// 包一层立即执行函数，item 不存在时整体返回 null
    fn item_script(&self, item: ItemRef, body: &str) -> String {
        format!(
            r#"
            (() => {{
                const item = document.querySelectorAll("{selector}")[{index}];
                if (!item) return null;
                {body}
            }})()
            "#,
            selector = ITEM_SELECTOR,
            index = item.0,
            body = body
        )
    }
}

#[async_trait]
impl CommentFeed for MemberCommentPage {
    async fn refresh(&mut self) -> Result<()> {
        self.executor
            .goto_and_settle(&self.feed_url, self.page_settle)
            .await
    }

    async fn items(&mut self) -> Result<Vec<ItemRef>> {
        let count: usize = self
            .executor
            .eval_as(format!(
                r#"document.querySelectorAll("{}").length"#,
                ITEM_SELECTOR
            ))
            .await?;
        debug!("当前加载评论数量: {}", count);
        Ok((0..count).map(ItemRef).collect())
    }

    async fn author_mid(&mut self, item: ItemRef) -> Result<Option<String>> {
        let script = self.item_script(
            item,
            r#"
            const avatar = item.querySelector("a[class*='user-avatar']");
            if (!avatar) return null;
            return avatar.getAttribute("mid");
            "#,
        );
        self.executor.eval_as(script).await
    }

    async fn author_name(&mut self, item: ItemRef) -> Result<Option<String>> {
        let script = self.item_script(
            item,
            r#"
            const avatar = item.querySelector("a[class*='user-avatar']");
            if (!avatar) return null;
            const card = avatar.getAttribute("card");
            if (card && card.trim()) return card.trim();
            const text = (avatar.textContent || "").trim();
            return text ? text : null;
            "#,
        );
        self.executor.eval_as(script).await
    }

    async fn time_text(&mut self, item: ItemRef) -> Result<Option<String>> {
        let script = self.item_script(
            item,
            r#"
            const date = item.querySelector("div[class*='ci-action'] span.date");
            if (!date) return null;
            const text = (date.textContent || "").trim();
            return text ? text : null;
            "#,
        );
        self.executor.eval_as(script).await
    }

    async fn follow_label(&mut self, item: ItemRef) -> Result<Option<String>> {
        // relation-label 可能渲染多个，取第一个可见且非空的
        let script = self.item_script(
            item,
            r#"
            const labels = item.querySelectorAll("div[class*='ci-title'] span[class*='relation-label']");
            for (const label of labels) {
                const style = label.getAttribute("style") || "";
                const text = (label.textContent || "").trim();
                if (!style.includes("display: none") && text) return text;
            }
            return null;
            "#,
        );
        self.executor.eval_as(script).await
    }

    async fn has_reply_tag(&mut self, item: ItemRef) -> Result<bool> {
        let script = self.item_script(
            item,
            r#"
            const tags = item.querySelectorAll("div[class*='ci-title'] span[class*='ci-title-split']");
            for (const tag of tags) {
                if ((tag.textContent || "").trim() === "回复") return true;
            }
            return false;
            "#,
        );
        let tagged: Option<bool> = self.executor.eval_as(script).await?;
        Ok(tagged.unwrap_or(false))
    }

    async fn submit_reply(&mut self, item: ItemRef, text: &str) -> Result<bool> {
        // 1. 点开回复链接
        let open_script = self.item_script(
            item,
            r#"
            const links = item.querySelectorAll("span[class*='reply action'] a");
            for (const link of links) {
                if ((link.textContent || "").trim() === "回复") {
                    link.click();
                    return true;
                }
            }
            return false;
            "#,
        );
        let opened: Option<bool> = self.executor.eval_as(open_script).await?;
        if !opened.unwrap_or(false) {
            warn!("点击回复按钮失败，未找到回复链接");
            return Ok(false);
        }

        // 等待回复框出现
        tokio::time::sleep(self.reply_settle).await;

        // 2. 写入回复内容（通过 input 事件让前端框架感知变化）
        let reply_json = serde_json::to_string(text)?;
        let fill_body = format!(
            r#"
            const box = item.querySelector("div[class*='reply-wrap'] textarea");
            if (!box) return false;
            box.value = {};
            box.dispatchEvent(new Event('input', {{ bubbles: true }}));
            return true;
            "#,
            reply_json
        );
        let fill_script = self.item_script(item, &fill_body);
        let filled: Option<bool> = self.executor.eval_as(fill_script).await?;
        if !filled.unwrap_or(false) {
            warn!("无法找到回复输入框");
            return Ok(false);
        }

        // 3. 点提交按钮
        let submit_script = self.item_script(
            item,
            r#"
            const buttons = item.querySelectorAll("div[class*='reply-wrap'] button");
            for (const button of buttons) {
                const span = button.querySelector("span");
                if (span && (span.textContent || "").trim() === "发表回复") {
                    button.click();
                    return true;
                }
            }
            return false;
            "#,
        );
        let submitted: Option<bool> = self.executor.eval_as(submit_script).await?;
        if !submitted.unwrap_or(false) {
            warn!("点击提交按钮失败");
            return Ok(false);
        }

        // 等待提交落地
        tokio::time::sleep(self.reply_settle).await;
        Ok(true)
    }

    async fn next_page(&mut self) -> Result<bool> {
        let clicked: bool = self
            .executor
            .eval_as(
                r#"
                (() => {
                    const next = document.querySelector("li[class*='bcc-pagination-next']");
                    if (!next) return false;
                    next.click();
                    return true;
                })()
                "#,
            )
            .await?;

        if !clicked {
            debug!("下一页按钮不存在");
            return Ok(false);
        }

        // 等待页面加载
        tokio::time::sleep(self.page_settle).await;
        Ok(true)
    }
}

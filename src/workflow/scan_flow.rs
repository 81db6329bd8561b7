//! 会话扫描流程 - 流程层
//!
//! 一轮会话从当前页出发逐页向后扫：
//! 1. 逐条评论取快照 → 分类 → 决策 → 提交回复；
//! 2. 本页有成功回复则直接翻页继续；
//! 3. 本页没有时翻一页做容错探测，探测页仍无成功回复即收束本轮
//!    （连续两页零成功回复是整轮扫描的终止条件）；
//! 4. 会话收束时一次性把时间水位推进到本轮见到的最大评论时间，
//!    扫描途中绝不动水位。
//!
//! 单条评论的字段查询失败只跳过该条；列表读取失败按空页处理；
//! 翻页失败等同"没有下一页"。本模块没有任何会让轮询停摆的错误出口。

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::models::{parse_comment_time, CommentRecord};
use crate::services::comment_feed::{CommentFeed, ItemRef};
use crate::services::{classify, Classification, Decision, ReplyDecisionEngine, SkipReason};
use crate::workflow::scan_ctx::ScanCtx;

/// 一轮会话的统计
#[derive(Debug, Default)]
pub struct ScanReport {
    /// 扫过的页数（含容错探测页）
    pub pages: usize,
    /// 成功提交的回复数
    pub replied: usize,
    /// 水位之前的旧评论数
    pub stale: usize,
    /// 页面已带回复标签的评论数
    pub tagged: usize,
    /// 已回复集合命中的评论数
    pub recorded: usize,
    /// 本人评论跳过数
    pub skipped_self: usize,
    /// 回复提交失败数（标识未记录，后续重新浮现时再试）
    pub submit_failed: usize,
    /// 字段不全 / 时间无法解析而跳过的评论数
    pub unreadable: usize,
}

/// 单页扫描结果
#[derive(Debug)]
struct PageOutcome {
    /// 本页是否发生过至少一次成功回复
    replied_any: bool,
    /// 本页比水位新的评论中的最大时间（无新评论时等于水位）
    max_time: NaiveDateTime,
}

impl PageOutcome {
    fn track(&mut self, timestamp: NaiveDateTime) {
        if timestamp > self.max_time {
            self.max_time = timestamp;
        }
    }
}

/// 会话扫描流程
///
/// 不持有页面资源，只依赖 `CommentFeed` 契约与回复决策引擎。
pub struct ScanFlow {
    engine: ReplyDecisionEngine,
}

impl ScanFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            engine: ReplyDecisionEngine::new(
                config.followed_labels.clone(),
                config.followed_reply_template.clone(),
                config.not_followed_reply_template.clone(),
            ),
        }
    }

    /// 执行一轮会话扫描，返回本轮统计。
    ///
    /// 水位推进发生在返回前，且只发生这一次。
    pub async fn run<F: CommentFeed>(&self, feed: &mut F, ctx: &mut ScanCtx) -> ScanReport {
        info!("当前时间水位: {}", ctx.cursor().format("%Y-%m-%d %H:%M:%S"));

        let mut session_max = ctx.cursor();
        let mut report = ScanReport::default();

        loop {
            let page = self.scan_page(feed, ctx, &mut report).await;
            session_max = session_max.max(page.max_time);

            if page.replied_any {
                // 本页有成功回复，直接翻页继续
                if !advance(feed).await {
                    break;
                }
                continue;
            }

            // 本页无成功回复，翻一页做容错探测
            info!("当前页面无符合回复条件的评论，进行容错扫描下一页");
            if !advance(feed).await {
                break;
            }

            let fault_page = self.scan_page(feed, ctx, &mut report).await;
            session_max = session_max.max(fault_page.max_time);

            if fault_page.replied_any {
                if !advance(feed).await {
                    break;
                }
            } else {
                info!("容错扫描页面无符合回复条件的评论，本轮会话扫描结束");
                break;
            }
        }

        ctx.advance_cursor(session_max);
        info!(
            "更新时间水位为: {}",
            ctx.cursor().format("%Y-%m-%d %H:%M:%S")
        );
        report
    }

    /// 扫描当前页的全部评论项（页面自然顺序，不重排）
    async fn scan_page<F: CommentFeed>(
        &self,
        feed: &mut F,
        ctx: &mut ScanCtx,
        report: &mut ScanReport,
    ) -> PageOutcome {
        let mut outcome = PageOutcome {
            replied_any: false,
            max_time: ctx.cursor(),
        };
        report.pages += 1;

        let items = match feed.items().await {
            Ok(items) => items,
            Err(e) => {
                warn!("读取评论列表失败，按空页处理: {:#}", e);
                return outcome;
            }
        };
        info!("当前加载评论数量: {}", items.len());

        for item in items {
            let record = match read_record(feed, item).await {
                Some(record) => record,
                None => {
                    report.unreadable += 1;
                    continue;
                }
            };

            match classify(&record, ctx.cursor(), ctx.replied()) {
                Classification::Stale => {
                    report.stale += 1;
                }
                Classification::AlreadyTagged => {
                    // 比水位新就推进水位候选，带标签的也算新活动
                    outcome.track(record.timestamp);
                    debug!("评论包含回复标签，视为已回复，跳过");
                    report.tagged += 1;
                }
                Classification::AlreadyRecorded => {
                    outcome.track(record.timestamp);
                    debug!("评论 {} 已回复，跳过", record.author_name);
                    report.recorded += 1;
                }
                Classification::Eligible => {
                    outcome.track(record.timestamp);
                    self.reply_to(feed, item, &record, ctx, report, &mut outcome)
                        .await;
                }
            }
        }

        outcome
    }

    /// 对一条 Eligible 评论执行决策与提交
    async fn reply_to<F: CommentFeed>(
        &self,
        feed: &mut F,
        item: ItemRef,
        record: &CommentRecord,
        ctx: &mut ScanCtx,
        report: &mut ScanReport,
        outcome: &mut PageOutcome,
    ) {
        match self.engine.decide(record, ctx.self_username()) {
            Decision::Skip(SkipReason::SelfComment) => {
                info!("跳过用户 {}（排除回复）", record.author_name);
                report.skipped_self += 1;
            }
            Decision::Reply(kind) => {
                let text = self.engine.template(kind);
                info!("准备回复用户: {}，回复内容: {}", record.author_name, text);

                match feed.submit_reply(item, text).await {
                    Ok(true) => {
                        // 提交成功才记录标识
                        ctx.record_replied(record.identifier());
                        outcome.replied_any = true;
                        report.replied += 1;
                        info!("已成功回复 {}", record.author_name);
                    }
                    Ok(false) => {
                        warn!("回复 {} 提交失败，标识不记录", record.author_name);
                        report.submit_failed += 1;
                    }
                    Err(e) => {
                        warn!("回复 {} 提交异常: {:#}", record.author_name, e);
                        report.submit_failed += 1;
                    }
                }
            }
        }
    }
}

/// 翻页；失败与"没有下一页"同样处理，结束本轮页面推进
async fn advance<F: CommentFeed>(feed: &mut F) -> bool {
    match feed.next_page().await {
        Ok(true) => true,
        Ok(false) => {
            info!("下一页按钮不存在，结束本轮会话扫描");
            false
        }
        Err(e) => {
            warn!("点击下一页失败: {:#}", e);
            false
        }
    }
}

/// 从页面提取一条评论的快照。
///
/// 时间与作者 mid 是必需字段，缺失或无法解析时返回 `None`（跳过该条）；
/// 显示名缺失回落到占位名，关注标签缺失按空串处理，
/// 回复标签查询失败按"无标签"处理。
async fn read_record<F: CommentFeed>(feed: &mut F, item: ItemRef) -> Option<CommentRecord> {
    let time_text = match feed.time_text(item).await {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!("未获取到时间文本，跳过该评论");
            return None;
        }
        Err(e) => {
            warn!("查询评论时间异常: {:#}", e);
            return None;
        }
    };

    let timestamp = match parse_comment_time(&time_text) {
        Ok(t) => t,
        Err(e) => {
            warn!("{}", e);
            return None;
        }
    };

    let author_mid = match feed.author_mid(item).await {
        Ok(Some(mid)) => mid,
        Ok(None) => {
            debug!("未获取到作者 mid，跳过该评论");
            return None;
        }
        Err(e) => {
            warn!("查询作者 mid 异常: {:#}", e);
            return None;
        }
    };

    let author_name = match feed.author_name(item).await {
        Ok(Some(name)) => name,
        _ => "未知用户".to_string(),
    };

    let follow_label = match feed.follow_label(item).await {
        Ok(Some(label)) => label,
        _ => String::new(),
    };

    let has_reply_tag = feed.has_reply_tag(item).await.unwrap_or(false);

    Some(CommentRecord {
        author_mid,
        author_name,
        timestamp,
        time_text,
        follow_label,
        has_reply_tag,
    })
}

//! 回复决策 - 业务能力层
//!
//! 对分类为 Eligible 的评论决定是否回复、用哪套话术。

use crate::models::CommentRecord;

/// 回复话术类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyKind {
    /// 已关注 / 粉丝用户
    Followed,
    /// 未关注用户
    NotFollowed,
}

/// 回复决策结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// 执行回复
    Reply(ReplyKind),
    /// 跳过，不回复也不记录标识
    Skip(SkipReason),
}

/// 跳过原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// 评论来自账号本人
    SelfComment,
}

/// 回复决策引擎
///
/// 持有两套话术与关注标签哨兵值；本人评论一律跳过且不记录标识，
/// 它会在每轮会话中被重新评估，直到时间落到水位之下自然消失。
#[derive(Debug, Clone)]
pub struct ReplyDecisionEngine {
    followed_labels: Vec<String>,
    followed_reply: String,
    not_followed_reply: String,
}

impl ReplyDecisionEngine {
    pub fn new(
        followed_labels: Vec<String>,
        followed_reply: String,
        not_followed_reply: String,
    ) -> Self {
        Self {
            followed_labels,
            followed_reply,
            not_followed_reply,
        }
    }

    /// 对一条 Eligible 评论做决策
    pub fn decide(&self, record: &CommentRecord, exclude_username: &str) -> Decision {
        if !exclude_username.is_empty() && record.author_name == exclude_username {
            return Decision::Skip(SkipReason::SelfComment);
        }

        if self.followed_labels.iter().any(|l| l == &record.follow_label) {
            Decision::Reply(ReplyKind::Followed)
        } else {
            Decision::Reply(ReplyKind::NotFollowed)
        }
    }

    /// 取话术文本
    pub fn template(&self, kind: ReplyKind) -> &str {
        match kind {
            ReplyKind::Followed => &self.followed_reply,
            ReplyKind::NotFollowed => &self.not_followed_reply,
        }
    }
}

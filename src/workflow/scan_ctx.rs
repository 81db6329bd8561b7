//! 扫描会话上下文
//!
//! 时间水位、已回复集合与本人用户名的唯一权威实例，由轮询循环持有，
//! 以 `&mut` 传入每轮会话。两条不变量：
//! - 已回复集合只增不减，进程存活期间不清理；
//! - 时间水位只会向前推进，且只在一轮会话结束时推进一次。

use std::collections::HashSet;
use std::fmt::Display;

use chrono::NaiveDateTime;

use crate::models::CommentId;

/// 扫描会话上下文
#[derive(Debug, Clone)]
pub struct ScanCtx {
    /// 时间水位：不晚于此时间的评论不再考虑
    cursor: NaiveDateTime,
    /// 本进程内已回复过的评论标识
    replied: HashSet<CommentId>,
    /// 不回复的用户名（账号本人）
    self_username: String,
}

impl ScanCtx {
    pub fn new(cursor: NaiveDateTime, self_username: String) -> Self {
        Self {
            cursor,
            replied: HashSet::new(),
            self_username,
        }
    }

    pub fn cursor(&self) -> NaiveDateTime {
        self.cursor
    }

    pub fn self_username(&self) -> &str {
        &self.self_username
    }

    pub fn replied(&self) -> &HashSet<CommentId> {
        &self.replied
    }

    pub fn replied_count(&self) -> usize {
        self.replied.len()
    }

    /// 记录一条已成功回复的评论标识
    pub fn record_replied(&mut self, id: CommentId) {
        self.replied.insert(id);
    }

    /// 推进时间水位；候选值不晚于当前水位时保持不变
    pub fn advance_cursor(&mut self, candidate: NaiveDateTime) {
        if candidate > self.cursor {
            self.cursor = candidate;
        }
    }
}

impl Display for ScanCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[水位 {} | 已回复 {} 条]",
            self.cursor.format("%Y-%m-%d %H:%M:%S"),
            self.replied.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_comment_time;

    fn ctx() -> ScanCtx {
        ScanCtx::new(
            parse_comment_time("2025-03-25 21:00:00").unwrap(),
            "UP主本人".to_string(),
        )
    }

    #[test]
    fn cursor_only_moves_forward() {
        let mut ctx = ctx();
        let before = ctx.cursor();

        // 更早的候选值不回退水位
        ctx.advance_cursor(parse_comment_time("2025-03-25 20:00:00").unwrap());
        assert_eq!(ctx.cursor(), before);

        // 相等的候选值保持不变
        ctx.advance_cursor(before);
        assert_eq!(ctx.cursor(), before);

        let newer = parse_comment_time("2025-03-25 21:27:38").unwrap();
        ctx.advance_cursor(newer);
        assert_eq!(ctx.cursor(), newer);
    }

    #[test]
    fn replied_set_is_append_only() {
        let mut ctx = ctx();
        let id = CommentId::of("10001", "2025-03-25 21:27:38");
        assert!(!ctx.replied().contains(&id));

        ctx.record_replied(id.clone());
        assert!(ctx.replied().contains(&id));
        assert_eq!(ctx.replied_count(), 1);

        // 重复记录不增长
        ctx.record_replied(id);
        assert_eq!(ctx.replied_count(), 1);
    }
}

//! 评论分类 - 业务能力层
//!
//! 纯逻辑：一条评论快照 + 当前水位 + 已回复集合 → 分类结果，无任何 I/O。

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::models::{CommentId, CommentRecord};

/// 评论分类结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// 时间不晚于水位，本轮及以后都不再考虑（即使它其实没被回复过）
    Stale,
    /// 页面上已带"回复"标签
    AlreadyTagged,
    /// 本进程已经回复过（标识在已回复集合中）
    AlreadyRecorded,
    /// 可以进入回复决策
    Eligible,
}

/// 对单条评论分类。
///
/// 判定顺序固定：Stale 最先（水位之前的评论无条件忽略，
/// 把扫描范围限定在真正的新增活动上），其次回复标签，再查已回复集合。
pub fn classify(
    record: &CommentRecord,
    cursor: NaiveDateTime,
    replied: &HashSet<CommentId>,
) -> Classification {
    if record.timestamp <= cursor {
        return Classification::Stale;
    }
    if record.has_reply_tag {
        return Classification::AlreadyTagged;
    }
    if replied.contains(&record.identifier()) {
        return Classification::AlreadyRecorded;
    }
    Classification::Eligible
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_comment_time;

    fn record(time: &str, tagged: bool) -> CommentRecord {
        CommentRecord {
            author_mid: "10001".to_string(),
            author_name: "某用户".to_string(),
            timestamp: parse_comment_time(time).unwrap(),
            time_text: time.to_string(),
            follow_label: String::new(),
            has_reply_tag: tagged,
        }
    }

    fn cursor() -> NaiveDateTime {
        parse_comment_time("2025-03-25 21:00:00").unwrap()
    }

    #[test]
    fn stale_wins_over_everything() {
        // 水位之前的评论即使没有回复标签、也没回复过，仍然是 Stale
        let old = record("2025-03-25 20:59:59", false);
        assert_eq!(classify(&old, cursor(), &HashSet::new()), Classification::Stale);

        // 带标签也不改变 Stale 判定
        let old_tagged = record("2025-03-25 20:30:00", true);
        assert_eq!(classify(&old_tagged, cursor(), &HashSet::new()), Classification::Stale);
    }

    #[test]
    fn cursor_boundary_is_inclusive() {
        // 与水位恰好相等的评论同样不参与回复
        let at_cursor = record("2025-03-25 21:00:00", false);
        assert_eq!(classify(&at_cursor, cursor(), &HashSet::new()), Classification::Stale);
    }

    #[test]
    fn tagged_before_recorded() {
        let r = record("2025-03-25 21:27:38", true);
        let mut replied = HashSet::new();
        replied.insert(r.identifier());
        // 同时带标签又在集合中时，报告 AlreadyTagged
        assert_eq!(classify(&r, cursor(), &replied), Classification::AlreadyTagged);
    }

    #[test]
    fn recorded_identifier_never_eligible_again() {
        let r = record("2025-03-25 21:27:38", false);
        let mut replied = HashSet::new();
        assert_eq!(classify(&r, cursor(), &replied), Classification::Eligible);

        replied.insert(r.identifier());
        assert_eq!(classify(&r, cursor(), &replied), Classification::AlreadyRecorded);
    }

    #[test]
    fn new_untagged_unrecorded_is_eligible() {
        let r = record("2025-03-25 21:27:38", false);
        assert_eq!(classify(&r, cursor(), &HashSet::new()), Classification::Eligible);
    }
}

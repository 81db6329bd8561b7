//! 评论数据模型
//!
//! 每轮扫描时从页面现场提取，不做任何持久化。

use chrono::NaiveDateTime;

use crate::error::AutoReplyError;

/// 一条评论在当前页面上的快照
#[derive(Debug, Clone)]
pub struct CommentRecord {
    /// 评论作者的 mid（用户 id）
    pub author_mid: String,
    /// 评论作者的显示名
    pub author_name: String,
    /// 解析后的评论时间
    pub timestamp: NaiveDateTime,
    /// 页面上渲染的原始时间文本（参与标识拼接，保持原样）
    pub time_text: String,
    /// 关注关系标签文本（"已关注" / "粉丝" 等），无标签时为空串
    pub follow_label: String,
    /// 标题区域是否带"回复"标签（带标签视为已回复过）
    pub has_reply_tag: bool,
}

impl CommentRecord {
    /// 本条评论的去重标识
    pub fn identifier(&self) -> CommentId {
        CommentId::of(&self.author_mid, &self.time_text)
    }
}

/// 评论去重标识：用户 mid 与页面时间文本的组合。
///
/// 同一用户在同一个渲染秒内的两条评论会得到相同标识，
/// 这是页面能提供的最细粒度，按此粒度去重。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentId(String);

impl CommentId {
    pub fn of(mid: &str, time_text: &str) -> Self {
        Self(format!("{}-{}", mid, time_text))
    }
}

impl std::fmt::Display for CommentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 解析页面渲染的评论时间文本，示例格式：`2025-03-25 21:27:38`
pub fn parse_comment_time(text: &str) -> Result<NaiveDateTime, AutoReplyError> {
    NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M:%S")
        .map_err(|_| AutoReplyError::TimeParse(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_comment_time() {
        let t = parse_comment_time("2025-03-25 21:27:38").unwrap();
        assert_eq!(t.format("%Y-%m-%d %H:%M:%S").to_string(), "2025-03-25 21:27:38");
    }

    #[test]
    fn parse_time_with_surrounding_whitespace() {
        assert!(parse_comment_time(" 2025-03-25 21:27:38 ").is_ok());
    }

    #[test]
    fn parse_invalid_time_is_error() {
        assert!(parse_comment_time("3 分钟前").is_err());
        assert!(parse_comment_time("").is_err());
    }

    #[test]
    fn identifier_combines_mid_and_raw_time_text() {
        let id = CommentId::of("12345", "2025-03-25 21:27:38");
        assert_eq!(id.to_string(), "12345-2025-03-25 21:27:38");
    }

    #[test]
    fn same_author_same_second_collides_by_design() {
        let a = CommentId::of("12345", "2025-03-25 21:27:38");
        let b = CommentId::of("12345", "2025-03-25 21:27:38");
        assert_eq!(a, b);
    }
}

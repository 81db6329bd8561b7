pub mod classifier;
pub mod comment_feed;
pub mod decision;
pub mod member_page;

pub use classifier::{classify, Classification};
pub use comment_feed::{CommentFeed, ItemRef};
pub use decision::{Decision, ReplyDecisionEngine, ReplyKind, SkipReason};
pub use member_page::MemberCommentPage;

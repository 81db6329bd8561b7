use std::path::Path;

use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{AppResult, AutoReplyError};

/// 程序配置
///
/// 读取顺序：内置默认值 → `config.toml`（存在时）→ 环境变量覆盖。
/// 注意：已回复集合与时间水位只存在于进程内存中，重启后回复窗口
/// 会退回到操作者重新提供的起始时间（或当前时间），这是刻意设计。
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 评论管理页地址
    pub comment_page_url: String,
    /// 轮询间隔（秒）
    pub poll_interval_secs: u64,
    /// 回复框出现 / 提交落地的等待（秒）
    pub reply_settle_secs: u64,
    /// 翻页、刷新后的渲染等待（秒）
    pub page_settle_secs: u64,
    /// 已关注 / 粉丝用户的回复话术
    pub followed_reply_template: String,
    /// 未关注用户的回复话术
    pub not_followed_reply_template: String,
    /// 视为"已关注"的关系标签文本
    pub followed_labels: Vec<String>,
    /// 不回复的用户名；缺省时使用登录账号自己的用户名
    pub exclude_username: Option<String>,
    /// 开始扫描的时间（`yyyy-MM-dd HH:mm:ss`，可带小数秒）
    pub start_time: Option<String>,
    /// Cookie 持久化文件
    pub cookie_file: String,
    /// 浏览器用户数据目录（跨次运行保留登录态）
    pub user_data_dir: String,
    /// 指定时连接已开启调试端口的浏览器，否则启动无头浏览器
    pub browser_debug_port: Option<u16>,
    /// 浏览器可执行文件路径（不指定时由 chromiumoxide 自行探测）
    pub chrome_executable: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            comment_page_url: "https://member.bilibili.com/platform/comment/article".to_string(),
            poll_interval_secs: 180,
            reply_settle_secs: 1,
            page_settle_secs: 3,
            followed_reply_template: "发过去了，没收到就私我【校招】，再次发给你".to_string(),
            not_followed_reply_template: "麻烦关注一下哈，不然收不到消息～".to_string(),
            followed_labels: vec!["已关注".to_string(), "粉丝".to_string()],
            exclude_username: None,
            start_time: None,
            cookie_file: ".bili-cookies.json".to_string(),
            user_data_dir: "chrome_user_data".to_string(),
            browser_debug_port: None,
            chrome_executable: None,
        }
    }
}

impl Config {
    /// 加载配置：`config.toml`（存在时）+ 环境变量覆盖
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".to_string());
        let mut config = if Path::new(&path).exists() {
            let content =
                std::fs::read_to_string(&path).map_err(|e| AutoReplyError::ConfigFile {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            let parsed: Config =
                toml::from_str(&content).map_err(|e| AutoReplyError::ConfigFile {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
            info!("已加载配置文件: {}", path);
            parsed
        } else {
            Config::default()
        };
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(v) = std::env::var("COMMENT_PAGE_URL") {
            self.comment_page_url = v;
        }
        if let Some(v) = std::env::var("POLL_INTERVAL_SECS").ok().and_then(|v| v.parse().ok()) {
            self.poll_interval_secs = v;
        }
        if let Some(v) = std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()) {
            self.browser_debug_port = Some(v);
        }
        if let Ok(v) = std::env::var("CHROME_EXECUTABLE") {
            self.chrome_executable = Some(v);
        }
        if let Ok(v) = std::env::var("COOKIE_FILE") {
            self.cookie_file = v;
        }
        if let Ok(v) = std::env::var("EXCLUDE_USERNAME") {
            self.exclude_username = Some(v);
        }
        if let Ok(v) = std::env::var("START_TIME") {
            self.start_time = Some(v);
        }
    }

    /// 解析起始扫描时间。
    ///
    /// 优先级：命令行参数 → 环境 / 配置文件；解析失败或都未提供时
    /// 回落到当前时间（不视为错误）。
    pub fn resolve_start_time(&self, cli_arg: Option<&str>) -> NaiveDateTime {
        let candidate = cli_arg.or(self.start_time.as_deref());
        match candidate {
            Some(text) => match parse_start_time(text) {
                Some(t) => {
                    info!("使用输入的起始时间: {}", t);
                    t
                }
                None => {
                    let now = Local::now().naive_local();
                    warn!("解析起始时间失败: '{}'，改用当前时间 {}", text, now);
                    now
                }
            },
            None => Local::now().naive_local(),
        }
    }
}

/// 解析 `yyyy-MM-dd HH:mm:ss`（可带小数秒）格式的时间文本
pub fn parse_start_time(text: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text.trim(), "%Y-%m-%d %H:%M:%S%.f").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_start_time_plain_seconds() {
        let t = parse_start_time("2025-03-25 21:00:00").unwrap();
        assert_eq!(t.format("%H:%M:%S").to_string(), "21:00:00");
    }

    #[test]
    fn parse_start_time_with_fraction() {
        assert!(parse_start_time("2025-03-25 21:00:00.123456").is_some());
    }

    #[test]
    fn parse_start_time_garbage_is_none() {
        assert!(parse_start_time("昨天晚上").is_none());
        assert!(parse_start_time("2025-03-25").is_none());
    }

    #[test]
    fn unparsable_start_time_falls_back_to_now() {
        // 解析失败不报错，回落到当前时间
        let config = Config::default();
        let before = Local::now().naive_local();
        let resolved = config.resolve_start_time(Some("not-a-time"));
        assert!(resolved >= before);
    }

    #[test]
    fn cli_argument_wins_over_config() {
        let config = Config {
            start_time: Some("2025-01-01 00:00:00".to_string()),
            ..Config::default()
        };
        let resolved = config.resolve_start_time(Some("2025-03-25 21:00:00"));
        assert_eq!(resolved, parse_start_time("2025-03-25 21:00:00").unwrap());
    }
}

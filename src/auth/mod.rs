//! 用户认证 - 凭证提供方
//!
//! 登录流程：先尝试用本地 Cookie 文件恢复登录态，校验失败则退回扫码登录。
//! 全部请求都通过浏览器页面完成，拿到的 Cookie 直接落在后续发回复用的
//! 同一个会话里。登录失败对整个程序是致命的，不做重试。

use std::path::Path;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chromiumoxide::cdp::browser_protocol::network::CookieParam;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::AutoReplyError;
use crate::infrastructure::JsExecutor;

const HOME_URL: &str = "https://www.bilibili.com";
const NAV_API_URL: &str = "https://api.bilibili.com/x/web-interface/nav";
const QRCODE_GENERATE_URL: &str =
    "https://passport.bilibili.com/x/passport-login/web/qrcode/generate";
const QRCODE_POLL_URL: &str = "https://passport.bilibili.com/x/passport-login/web/qrcode/poll";

/// 扫码轮询间隔与次数（2 秒 × 90 次 = 二维码 3 分钟有效期）
const QRCODE_POLL_INTERVAL: Duration = Duration::from_secs(2);
const QRCODE_POLL_ATTEMPTS: usize = 90;

/// 登录成功后的账号信息
#[derive(Debug, Clone)]
pub struct UserProfile {
    /// 账号显示名（自动排除回复的缺省用户名）
    pub username: String,
    /// 账号 mid
    pub mid: String,
}

/// 持久化到本地文件的 Cookie 子集
#[derive(Debug, Serialize, Deserialize)]
struct StoredCookie {
    name: String,
    value: String,
    domain: String,
    path: String,
}

/// 哔哩哔哩用户认证
pub struct Auth {
    cookie_file: String,
    settle: Duration,
}

impl Auth {
    pub fn new(config: &Config) -> Self {
        Self {
            cookie_file: config.cookie_file.clone(),
            settle: Duration::from_secs(config.page_settle_secs),
        }
    }

    /// 主登录流程
    pub async fn login(&self, executor: &JsExecutor) -> Result<UserProfile> {
        info!("🔒 哔哩哔哩用户认证");

        match self.try_restore(executor).await {
            Ok(Some(profile)) => {
                info!("✅ 用户数据加载成功～");
                return Ok(profile);
            }
            Ok(None) => {
                info!("本地登录态无效，转扫码登录");
            }
            Err(e) => {
                warn!("恢复登录态失败: {:#}，转扫码登录", e);
            }
        }

        // 失效的 Cookie 文件留着没有意义
        if Path::new(&self.cookie_file).exists() {
            let _ = std::fs::remove_file(&self.cookie_file);
        }

        let profile = self.qrcode_login(executor).await?;
        Ok(profile)
    }

    /// 尝试用本地 Cookie（或用户数据目录里残留的登录态）恢复
    async fn try_restore(&self, executor: &JsExecutor) -> Result<Option<UserProfile>> {
        executor.goto_and_settle(HOME_URL, self.settle).await?;

        if Path::new(&self.cookie_file).exists() {
            info!("🚀 正在加载本地 Cookie...");
            self.load_cookies(executor).await?;
        } else {
            debug!("无有效 Cookie 文件，直接检查浏览器现有登录态");
        }

        self.check_status(executor).await
    }

    /// 通过导航接口检查是否已登录
    async fn check_status(&self, executor: &JsExecutor) -> Result<Option<UserProfile>> {
        debug!("🔍 检查用户是否登录成功...");
        executor.goto_and_settle(NAV_API_URL, self.settle).await?;
        let body = executor.body_text().await?;
        let data: Value = serde_json::from_str(&body).context("导航接口返回的不是合法 JSON")?;

        if data["code"].as_i64() != Some(0) {
            return Ok(None);
        }
        let user = &data["data"];
        if user["isLogin"].as_bool() != Some(true) {
            debug!("当前用户未登录");
            return Ok(None);
        }

        let username = user["uname"].as_str().unwrap_or_default().to_string();
        let mid = match &user["mid"] {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s.clone(),
            _ => String::new(),
        };
        info!("👤 当前登录用户: {}({})", username, mid);
        Ok(Some(UserProfile { username, mid }))
    }

    /// 扫码登录
    async fn qrcode_login(&self, executor: &JsExecutor) -> Result<UserProfile> {
        info!("🚀 开始扫码登录...");

        executor
            .goto_and_settle(QRCODE_GENERATE_URL, self.settle)
            .await?;
        let body = executor.body_text().await?;
        let data: Value = serde_json::from_str(&body).context("二维码生成接口返回异常")?;
        if data["code"].as_i64() != Some(0) {
            return Err(AutoReplyError::Credential(format!(
                "获取二维码失败: {}",
                data["message"].as_str().unwrap_or("未知错误")
            ))
            .into());
        }

        let qr_url = data["data"]["url"]
            .as_str()
            .ok_or_else(|| anyhow!("二维码响应缺少 url 字段"))?
            .to_string();
        let qrcode_key = data["data"]["qrcode_key"]
            .as_str()
            .ok_or_else(|| anyhow!("二维码响应缺少 qrcode_key 字段"))?
            .to_string();

        info!("📱 请使用哔哩哔哩客户端扫描登录二维码（把下面的链接生成二维码）：");
        info!("{}", qr_url);
        info!("⏰ 二维码有效期为 3 分钟～");

        for _ in 0..QRCODE_POLL_ATTEMPTS {
            match self.poll_qrcode(executor, &qrcode_key).await? {
                PollStatus::Confirmed => {
                    info!("🎉 登录成功！");
                    if let Err(e) = self.save_cookies(executor).await {
                        warn!("保存用户数据失败: {:#}", e);
                    }
                    return match self.check_status(executor).await? {
                        Some(profile) => Ok(profile),
                        None => Err(AutoReplyError::Credential(
                            "扫码确认后仍未取得登录态".to_string(),
                        )
                        .into()),
                    };
                }
                PollStatus::Pending => debug!("⏳ 等待扫码中..."),
                PollStatus::Scanned => debug!("📱 已扫码，请在手机上确认登录～"),
                PollStatus::Expired => {
                    return Err(
                        AutoReplyError::Credential("二维码已过期，请重新启动程序".to_string())
                            .into(),
                    )
                }
            }
            sleep(QRCODE_POLL_INTERVAL).await;
        }

        Err(AutoReplyError::Credential("扫码登录超时".to_string()).into())
    }

    async fn poll_qrcode(&self, executor: &JsExecutor, qrcode_key: &str) -> Result<PollStatus> {
        let poll_url = format!("{}?qrcode_key={}", QRCODE_POLL_URL, qrcode_key);
        executor.goto_and_settle(&poll_url, self.settle).await?;
        let body = executor.body_text().await?;
        let data: Value = serde_json::from_str(&body).context("扫码状态接口返回异常")?;

        match data["data"]["code"].as_i64() {
            Some(0) => Ok(PollStatus::Confirmed),
            Some(86101) => Ok(PollStatus::Pending),
            Some(86090) => Ok(PollStatus::Scanned),
            Some(86038) => Ok(PollStatus::Expired),
            other => Err(AutoReplyError::Credential(format!(
                "扫码登录失败: {} (code: {:?})",
                data["data"]["message"].as_str().unwrap_or("未知错误"),
                other
            ))
            .into()),
        }
    }

    /// 把浏览器会话中的 Cookie 保存到本地文件
    async fn save_cookies(&self, executor: &JsExecutor) -> Result<()> {
        let cookies = executor.page().get_cookies().await?;
        let stored: Vec<StoredCookie> = cookies
            .into_iter()
            .map(|c| StoredCookie {
                name: c.name,
                value: c.value,
                domain: c.domain,
                path: c.path,
            })
            .collect();
        let content = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&self.cookie_file, content)
            .with_context(|| format!("写入 Cookie 文件失败: {}", self.cookie_file))?;
        debug!("已保存 {} 条 Cookie 到 {}", stored.len(), self.cookie_file);
        Ok(())
    }

    /// 把本地文件中的 Cookie 注入浏览器会话
    async fn load_cookies(&self, executor: &JsExecutor) -> Result<()> {
        let content = std::fs::read_to_string(&self.cookie_file)
            .with_context(|| format!("读取 Cookie 文件失败: {}", self.cookie_file))?;
        let stored: Vec<StoredCookie> = serde_json::from_str(&content)
            .with_context(|| format!("Cookie 文件格式无效: {}", self.cookie_file))?;

        let mut params = Vec::with_capacity(stored.len());
        for c in stored {
            let param = CookieParam::builder()
                .name(c.name)
                .value(c.value)
                .domain(c.domain)
                .path(c.path)
                .build()
                .map_err(|e| anyhow!("构造 Cookie 失败: {}", e))?;
            params.push(param);
        }
        let count = params.len();
        executor.page().set_cookies(params).await?;
        debug!("已注入 {} 条 Cookie", count);
        Ok(())
    }
}

/// 扫码轮询状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollStatus {
    Pending,
    Scanned,
    Confirmed,
    Expired,
}

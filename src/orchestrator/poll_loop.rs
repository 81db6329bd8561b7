//! 轮询循环 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：获取浏览器、完成登录、装配扫描上下文
//! 2. **轮询调度**：固定间隔刷新评论页并驱动一轮会话扫描
//! 3. **资源管理**：唯一持有 Browser，退出路径上保证释放
//! 4. **统计输出**：每轮会话结束后打印汇总
//!
//! 整个轮询是单一逻辑控制流：页面不支持并发操作，刷新、扫描、回复
//! 严格串行，每次页面往返都是整个进程等待的阻塞点。

use std::time::Duration;

use anyhow::Result;
use chromiumoxide::Browser;
use tokio::time::sleep;
use tracing::{info, warn};

use crate::auth::Auth;
use crate::browser;
use crate::config::Config;
use crate::infrastructure::JsExecutor;
use crate::services::{CommentFeed, MemberCommentPage};
use crate::workflow::{ScanCtx, ScanFlow, ScanReport};

/// 应用主结构
pub struct App {
    config: Config,
    browser: Browser,
    /// 是否由本进程启动（连接外部浏览器时退出不关闭对方）
    launched: bool,
    feed: MemberCommentPage,
    flow: ScanFlow,
    ctx: ScanCtx,
}

impl App {
    /// 初始化应用：浏览器 → 登录 → 扫描上下文
    pub async fn initialize(config: Config, start_time_arg: Option<String>) -> Result<Self> {
        log_startup(&config);

        let launched = config.browser_debug_port.is_none();
        let (browser, page) = browser::acquire(&config).await?;
        let executor = JsExecutor::new(page);

        // 登录失败对整个程序是致命的
        let auth = Auth::new(&config);
        let profile = auth.login(&executor).await?;

        // 缺省排除登录账号自己的评论
        let self_username = config
            .exclude_username
            .clone()
            .unwrap_or_else(|| profile.username.clone());
        info!("排除回复的用户名: {}", self_username);

        let cursor = config.resolve_start_time(start_time_arg.as_deref());
        let ctx = ScanCtx::new(cursor, self_username);
        let flow = ScanFlow::new(&config);
        let feed = MemberCommentPage::new(executor, &config);

        Ok(Self {
            config,
            browser,
            launched,
            feed,
            flow,
            ctx,
        })
    }

    /// 运行轮询直到收到退出信号；任何退出路径都先释放浏览器
    pub async fn run(mut self) -> Result<()> {
        let result = tokio::select! {
            res = self.poll_loop() => res,
            _ = tokio::signal::ctrl_c() => {
                info!("接收到退出信号，停止轮询..");
                Ok(())
            }
        };

        self.shutdown().await;
        result
    }

    /// 主循环：刷新评论页 → 一轮会话扫描 → 固定间隔休眠
    async fn poll_loop(&mut self) -> Result<()> {
        let interval = Duration::from_secs(self.config.poll_interval_secs);

        loop {
            info!(
                "----------> [{}] 开始新一轮检测新评论...",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
            );

            match self.feed.refresh().await {
                Ok(()) => {
                    let report = self.flow.run(&mut self.feed, &mut self.ctx).await;
                    log_session_complete(&report, &self.ctx);
                }
                Err(e) => {
                    // 单轮失败不终止进程，下一轮重新刷新
                    warn!("打开评论页面失败: {:#}，等待下一轮", e);
                }
            }

            info!("本轮检测结束，等待 {} 秒后再次检测。", interval.as_secs());
            sleep(interval).await;
        }
    }

    /// 释放浏览器资源
    async fn shutdown(&mut self) {
        if !self.launched {
            info!("使用的是外部浏览器，保留其运行");
            return;
        }
        info!("正在关闭浏览器...");
        if let Err(e) = self.browser.close().await {
            warn!("关闭浏览器失败: {}", e);
        }
        let _ = self.browser.wait().await;
        info!("浏览器已释放");
    }
}

// ========== 日志辅助函数 ==========

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 哔哩哔哩评论自动回复");
    info!("📮 评论页: {}", config.comment_page_url);
    info!("⏱️ 轮询间隔: {} 秒", config.poll_interval_secs);
    info!("{}", "=".repeat(60));
}

fn log_session_complete(report: &ScanReport, ctx: &ScanCtx) {
    info!("{}", "─".repeat(60));
    info!(
        "✓ 本轮扫描完成: 扫描 {} 页，成功回复 {} 条",
        report.pages, report.replied
    );
    info!(
        "  跳过: 旧评论 {}，已带标签 {}，本进程已回复 {}，本人评论 {}",
        report.stale, report.tagged, report.recorded, report.skipped_self
    );
    if report.submit_failed > 0 || report.unreadable > 0 {
        warn!(
            "  异常: 提交失败 {}，无法读取 {}",
            report.submit_failed, report.unreadable
        );
    }
    info!("  会话状态: {}", ctx);
    info!("{}", "─".repeat(60));
}

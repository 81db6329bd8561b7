use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::AutoReplyError;

/// 启动无头浏览器并打开一个空白页面。
///
/// 用户数据目录跨次运行保留，登录态（Cookie / LocalStorage）随配置目录
/// 持久化；启动参数与登录脚本的加固选项保持一致。
pub async fn launch_headless_browser(
    user_data_dir: &str,
    chrome_executable: Option<&str>,
) -> Result<(Browser, Page)> {
    info!("🚀 正在启动无头浏览器，请稍后...");
    debug!("用户数据目录: {}", user_data_dir);

    let mut builder = BrowserConfig::builder()
        .new_headless_mode()
        .user_data_dir(Path::new(user_data_dir))
        .args(vec![
            "--no-sandbox",
            "--disable-gpu",
            "--disable-dev-shm-usage",
            "--disable-extensions",
            "--disable-popup-blocking",
            "--disable-notifications",
            "--disable-infobars",
            "--mute-audio",
            "--lang=zh-CN",
            "--window-size=1920,1080",
            "--disable-blink-features=AutomationControlled",
        ]);

    if let Some(path) = chrome_executable {
        debug!("使用指定的浏览器可执行文件: {}", path);
        builder = builder.chrome_executable(Path::new(path));
    }

    let config = builder.build().map_err(|e| {
        error!("配置无头浏览器失败: {}", e);
        AutoReplyError::BrowserSetup(e)
    })?;

    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        AutoReplyError::BrowserSetup(e.to_string())
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建页面失败: {}", e);
        AutoReplyError::BrowserSetup(e.to_string())
    })?;

    info!("✅ 无头浏览器启动完成");
    Ok((browser, page))
}

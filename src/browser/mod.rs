pub mod connection;
pub mod headless;

use anyhow::Result;
use chromiumoxide::{Browser, Page};

pub use connection::connect_to_browser_and_page;
pub use headless::launch_headless_browser;

use crate::config::Config;

/// 按配置获取浏览器：指定了调试端口就连接现有浏览器，否则启动无头实例
pub async fn acquire(config: &Config) -> Result<(Browser, Page)> {
    match config.browser_debug_port {
        Some(port) => connect_to_browser_and_page(port).await,
        None => {
            launch_headless_browser(&config.user_data_dir, config.chrome_executable.as_deref())
                .await
        }
    }
}

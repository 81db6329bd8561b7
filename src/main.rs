use anyhow::Result;
use bilibili_autoreply::config::Config;
use bilibili_autoreply::logger;
use bilibili_autoreply::orchestrator::App;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logger::init();

    // 加载配置
    let config = Config::load()?;

    // 可选的起始扫描时间作为第一个命令行参数传入
    let start_time_arg = std::env::args().nth(1);

    // 初始化并运行应用
    App::initialize(config, start_time_arg).await?.run().await
}

use bilibili_autoreply::auth::Auth;
use bilibili_autoreply::browser;
use bilibili_autoreply::config::Config;
use bilibili_autoreply::infrastructure::JsExecutor;

#[tokio::test]
#[ignore] // 默认忽略，需要本机浏览器环境：cargo test -- --ignored
async fn test_browser_acquire() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::load().expect("加载配置失败");

    let result = browser::acquire(&config).await;

    assert!(result.is_ok(), "应该能够获取浏览器");
}

#[tokio::test]
#[ignore]
async fn test_login_flow() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::load().expect("加载配置失败");

    let (_browser, page) = browser::acquire(&config).await.expect("获取浏览器失败");
    let executor = JsExecutor::new(page);

    let auth = Auth::new(&config);
    let profile = auth.login(&executor).await.expect("登录失败");

    println!("当前登录用户: {}({})", profile.username, profile.mid);
    assert!(!profile.username.is_empty());
}

#[tokio::test]
#[ignore]
async fn test_open_comment_feed() {
    let _ = tracing_subscriber::fmt::try_init();

    let config = Config::load().expect("加载配置失败");

    let (_browser, page) = browser::acquire(&config).await.expect("获取浏览器失败");
    let executor = JsExecutor::new(page);

    executor
        .goto_and_settle(
            &config.comment_page_url,
            std::time::Duration::from_secs(config.page_settle_secs),
        )
        .await
        .expect("打开评论页失败");

    let title: String = executor
        .eval_as("document.title")
        .await
        .expect("读取页面标题失败");
    println!("评论页标题: {}", title);
}

mod admin;
mod app;
mod common;
mod db;
mod jwt;
mod model;
mod storefront;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use admin::AdminService;
use db::Database;
use jwt::JwtManager;
use model::config::Config;

/// Dress Shop 后端服务
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = Config::default_config_path())]
    config: String,

    /// 监听端口（覆盖配置文件和环境变量）
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    config.apply_env(|key| std::env::var(key).ok())?;
    if let Some(port) = args.port {
        config.port = port;
    }
    config.validate()?;
    tracing::info!(path = ?config.config_path(), "配置已加载");
    tracing::debug!(?config);

    let db = Database::open(&config.database_path)
        .with_context(|| format!("打开数据库失败: {}", config.database_path))?;
    tracing::info!(path = %config.database_path, "数据库已就绪");

    bootstrap_admin(&config, &db).await?;

    let app = app::build_app(&config, db)?;

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("绑定地址失败: {}", addr))?;
    tracing::info!("Server running on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("服务已停止");
    Ok(())
}

/// 配置了默认管理员凭据时，确保该管理员存在
async fn bootstrap_admin(config: &Config, db: &Database) -> anyhow::Result<()> {
    let Some((email, password)) = config.default_admin() else {
        tracing::info!("未配置默认管理员，跳过创建");
        return Ok(());
    };

    let secret = config.jwt_secret().context("未配置 JWT_SECRET")?;
    let service = AdminService::new(
        db.clone(),
        JwtManager::new(secret, config.token_ttl_secs),
        config.bcrypt_cost,
    );
    service
        .ensure_default_admin(&config.admin_name, email, password)
        .await
        .context("创建默认管理员失败")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("监听退出信号失败: {}", e);
    }
}

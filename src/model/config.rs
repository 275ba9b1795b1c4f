use anyhow::{Context, bail};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// 应用配置
///
/// 启动时构建一次，之后以引用形式传入存储、JWT 和各服务，运行期间不再读取环境变量。
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// SQLite 数据库文件路径
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// JWT 签名密钥（必填）
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Token 有效期（秒），默认 7 天
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,

    /// 默认管理员名称
    #[serde(default = "default_admin_name")]
    pub admin_name: String,

    /// 默认管理员邮箱（与密码同时配置时，启动时自动创建）
    #[serde(default)]
    pub admin_email: Option<String>,

    /// 默认管理员密码
    #[serde(default)]
    pub admin_password: Option<String>,

    /// 允许跨域的前端来源
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// 上传文件目录，以 /uploads 路径原样提供
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: String,

    /// bcrypt 计算成本
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,

    /// 配置文件路径（运行时元数据，不写入 JSON）
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_database_path() -> String {
    "shop.db".to_string()
}

fn default_token_ttl_secs() -> u64 {
    crate::jwt::TOKEN_EXPIRY_SECONDS
}

fn default_admin_name() -> String {
    "Admin".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "https://shop-3fje.onrender.com".to_string(),
        "https://dressshops.netlify.app".to_string(),
    ]
}

fn default_uploads_dir() -> String {
    "uploads".to_string()
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
            jwt_secret: None,
            token_ttl_secs: default_token_ttl_secs(),
            admin_name: default_admin_name(),
            admin_email: None,
            admin_password: None,
            cors_origins: default_cors_origins(),
            uploads_dir: default_uploads_dir(),
            bcrypt_cost: default_bcrypt_cost(),
            config_path: None,
        }
    }
}

// 密钥和管理员密码不出现在 Debug 输出中
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_path", &self.database_path)
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("admin_name", &self.admin_name)
            .field("admin_email", &self.admin_email)
            .field("admin_password", &redact(&self.admin_password))
            .field("cors_origins", &self.cors_origins)
            .field("uploads_dir", &self.uploads_dir)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl Config {
    /// 获取默认配置文件路径
    pub fn default_config_path() -> &'static str {
        "config.json"
    }

    /// 从文件加载配置
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            // 配置文件不存在，返回默认配置
            let mut config = Self::default();
            config.config_path = Some(path.to_path_buf());
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let mut config: Config = serde_json::from_str(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// 获取配置文件路径（如果有）
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// 使用环境变量覆盖配置
    ///
    /// `lookup` 通常是 `|k| std::env::var(k).ok()`，测试中可以替换为固定映射。
    pub fn apply_env<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT 不是有效端口: {}", port))?;
        }
        if let Some(path) = lookup("DATABASE_PATH") {
            self.database_path = path;
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.jwt_secret = Some(secret);
        }
        if let Some(name) = lookup("ADMIN_NAME") {
            self.admin_name = name;
        }
        if let Some(email) = lookup("ADMIN_EMAIL") {
            self.admin_email = Some(email);
        }
        if let Some(password) = lookup("ADMIN_PASSWORD") {
            self.admin_password = Some(password);
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(dir) = lookup("UPLOADS_DIR") {
            self.uploads_dir = dir;
        }
        Ok(())
    }

    /// 校验启动所需的配置项
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret().is_none() {
            bail!("未配置 JWT_SECRET");
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            bail!("bcryptCost 必须在 4 到 31 之间: {}", self.bcrypt_cost);
        }
        if self.token_ttl_secs == 0 {
            bail!("tokenTtlSecs 必须大于 0");
        }
        Ok(())
    }

    /// 获取非空的 JWT 密钥
    pub fn jwt_secret(&self) -> Option<&str> {
        self.jwt_secret.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// 获取默认管理员凭据（邮箱和密码都配置时才返回）
    pub fn default_admin(&self) -> Option<(&str, &str)> {
        match (self.admin_email.as_deref(), self.admin_password.as_deref()) {
            (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
                Some((email, password))
            }
            _ => None,
        }
    }

    /// 监听地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

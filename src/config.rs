use config::{Config as ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 覆盖配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "APP_CONFIG_PATH";

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }
    fn default_port() -> u16 {
        8000
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志过滤指令（EnvFilter 语法）；设置了 RUST_LOG 时以环境变量为准
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
    /// 日志格式：full | compact
    #[serde(default = "LoggingConfig::default_format")]
    pub format: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "ecoloop_scanner=info,tower_http=info".to_string()
    }
    fn default_format() -> String {
        "full".to_string()
    }

    /// 是否使用紧凑格式输出
    pub fn is_compact(&self) -> bool {
        self.format.trim().eq_ignore_ascii_case("compact")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            format: Self::default_format(),
        }
    }
}

/// API 文档配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 是否挂载 `/docs`（Swagger UI）与 `/openapi.json`
    #[serde(default = "ApiConfig::default_docs_enabled")]
    pub docs_enabled: bool,
}

impl ApiConfig {
    fn default_docs_enabled() -> bool {
        true
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            docs_enabled: Self::default_docs_enabled(),
        }
    }
}

/// CORS 配置
///
/// 默认全放行（任意 Origin/方法/请求头，且允许凭证），仅适合开发环境；
/// 对外暴露前应收紧 `allowed_origins`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// 是否启用 CORS
    #[serde(default = "CorsConfig::default_enabled")]
    pub enabled: bool,
    /// 允许的 Origin 列表（支持 "*" 表示任意）
    #[serde(default = "CorsConfig::wildcard")]
    pub allowed_origins: Vec<String>,
    /// 允许的方法列表（支持 "*" 表示任意）
    #[serde(default = "CorsConfig::wildcard")]
    pub allowed_methods: Vec<String>,
    /// 允许的请求头列表（支持 "*" 表示任意）
    #[serde(default = "CorsConfig::wildcard")]
    pub allowed_headers: Vec<String>,
    /// 暴露的响应头列表（支持 "*" 表示任意）
    #[serde(default)]
    pub expose_headers: Vec<String>,
    /// 是否允许携带凭证（Cookie/Authorization）
    #[serde(default = "CorsConfig::default_allow_credentials")]
    pub allow_credentials: bool,
    /// 预检缓存时间（秒）
    #[serde(default)]
    pub max_age_secs: Option<u64>,
}

impl CorsConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_allow_credentials() -> bool {
        true
    }

    fn wildcard() -> Vec<String> {
        vec!["*".to_string()]
    }

    /// 空白配置：启用但不放行任何来源，便于在测试/代码中逐项声明
    pub fn strict() -> Self {
        Self {
            enabled: true,
            allowed_origins: Vec::new(),
            allowed_methods: Vec::new(),
            allowed_headers: Vec::new(),
            expose_headers: Vec::new(),
            allow_credentials: false,
            max_age_secs: None,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
            allowed_origins: Self::wildcard(),
            allowed_methods: Self::wildcard(),
            allowed_headers: Self::wildcard(),
            expose_headers: Vec::new(),
            allow_credentials: Self::default_allow_credentials(),
            max_age_secs: None,
        }
    }
}

/// 扫描（模拟推理）配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// 模拟推理耗时（毫秒），每次扫描无条件等待
    #[serde(default = "ScanConfig::default_latency_ms")]
    pub simulated_latency_ms: u64,
    /// 上传体积上限（字节，0=不限制）
    #[serde(default)]
    pub max_upload_bytes: usize,
}

impl ScanConfig {
    fn default_latency_ms() -> u64 {
        2000
    }

    /// 获取模拟推理耗时
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: Self::default_latency_ms(),
            max_upload_bytes: 0,
        }
    }
}

/// 优雅退出配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShutdownConfig {
    /// 收到退出信号后等待在途请求完成的最长时间（秒）
    #[serde(default = "ShutdownConfig::default_timeout")]
    pub timeout_secs: u64,
}

impl ShutdownConfig {
    fn default_timeout() -> u64 {
        30
    }

    /// 获取优雅退出超时时间
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Self::default_timeout(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub api: ApiConfig,
    /// CORS 配置
    #[serde(default)]
    pub cors: CorsConfig,
    /// 扫描配置
    #[serde(default)]
    pub scan: ScanConfig,
    /// 优雅退出配置
    #[serde(default)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// 从配置文件加载配置，支持环境变量覆盖。
    ///
    /// 配置文件可缺省：不存在时全部使用默认值。
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// 从指定路径加载配置（文件可不存在），再叠加 `APP_` 环境变量
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let builder = ConfigBuilder::builder()
            .add_source(File::from(path).required(false))
            // 例如：APP_SERVER__PORT=9000、APP_SCAN__SIMULATED_LATENCY_MS=0
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        builder.try_deserialize()
    }

    /// 从 TOML 文本解析配置（不读取环境变量）
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        ConfigBuilder::builder()
            .add_source(File::from_str(raw, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// 获取配置文件路径
    /// 配置文件路径：`APP_CONFIG_PATH`，缺省为 `config.toml`
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// 获取服务器监听地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

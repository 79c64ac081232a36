use crate::core::error::{Result, StationError};
use crate::printing::TemplateType;
use chrono_tz::Tz;
use shared::models::StoreInfo;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use woo_client::ClientConfig;
use woo_printer::{PaperWidth, PrinterProfile, PrinterVendor};

/// 工作站配置 - 所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖（启动时先加载 `.env`）。
/// 设置了但无法解析的值会在 [`Config::validate`] 中报错，不会回退到默认值：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/woo-station | 工作目录 (redb 数据库) |
/// | WOO_SITE_URL | (必填) | 商店地址 |
/// | WOO_CONSUMER_KEY | (必填) | REST API key |
/// | WOO_CONSUMER_SECRET | (必填) | REST API secret |
/// | POLL_INTERVAL_SECS | 60 | 轮询间隔(秒) |
/// | AUTO_PRINT | true | 新订单自动打印 |
/// | PRINTER_CONNECTION | serial | serial (蓝牙 SPP / USB) 或 network |
/// | PRINTER_ADDRESS | /dev/rfcomm0 | 串口设备或 IP[:端口] |
/// | PRINTER_BAUD_RATE | 9600 | 串口波特率 |
/// | PRINTER_VENDOR | generic | generic (ESC/POS) 或 star |
/// | PAPER_WIDTH_MM | 80 | 58 或 80 |
/// | AUTO_CUT | true | 打印后切纸 |
/// | OPEN_DRAWER | false | 打印前弹钱箱 |
/// | PRINT_COPIES | 1 | 每单份数 |
/// | TEMPLATE | full | full / delivery / kitchen |
/// | STORE_NAME | (空) | 小票抬头 |
/// | STORE_ADDRESS | (空) | 商店地址 |
/// | STORE_PHONE | (空) | 商店电话 |
/// | CURRENCY_SYMBOL | $ | 金额前缀 |
/// | TIMEZONE | UTC | 商店时区 (IANA) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志目录，存在时按天滚动写文件 |
/// | ENVIRONMENT | development | 运行环境 |
/// | REQUEST_TIMEOUT_SECS | 30 | HTTP 请求超时(秒) |
/// | HTTP_PORT | 8080 | 店员端 API 端口，0 表示不开启 |
///
/// # 示例
///
/// ```ignore
/// WOO_SITE_URL=https://shop.example.com PRINTER_VENDOR=star cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录
    pub work_dir: String,
    pub woo_site_url: String,
    pub woo_consumer_key: String,
    pub woo_consumer_secret: String,
    /// 轮询间隔 (秒)
    pub poll_interval_secs: u64,
    pub auto_print: bool,

    // === 打印机 ===
    pub printer_connection: String,
    pub printer_address: String,
    pub printer_baud_rate: u32,
    pub printer_vendor: PrinterVendor,
    pub paper_width: PaperWidth,
    pub auto_cut: bool,
    pub open_drawer: bool,
    pub print_copies: u32,
    pub template: TemplateType,

    // === 商店 ===
    pub store_name: String,
    pub store_address: String,
    pub store_phone: Option<String>,
    pub currency_symbol: String,
    pub timezone: Tz,

    pub log_level: String,
    pub log_dir: Option<String>,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// HTTP 请求超时 (秒)
    pub request_timeout_secs: u64,
    /// API 端口 (0 = 关闭)
    pub http_port: u16,
    /// 无法解析的环境变量 (`KEY="value"`)
    pub rejected_env: Vec<String>,
}

/// 读取配置项，记录设置了但无法解析的变量
struct EnvReader<F> {
    lookup: F,
    rejected: Vec<String>,
}

impl<F: Fn(&str) -> Option<String>> EnvReader<F> {
    fn new(lookup: F) -> Self {
        Self {
            lookup,
            rejected: Vec::new(),
        }
    }

    fn string(&self, key: &str, default: &str) -> String {
        (self.lookup)(key).unwrap_or_else(|| default.into())
    }

    fn optional(&self, key: &str) -> Option<String> {
        (self.lookup)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse<T: FromStr>(&mut self, key: &str, default: T) -> T {
        self.parse_with(key, default, |v| v.parse().ok())
    }

    fn parse_with<T>(&mut self, key: &str, default: T, parse: impl Fn(&str) -> Option<T>) -> T {
        let Some(raw) = self.optional(key) else {
            return default;
        };
        match parse(&raw) {
            Some(value) => value,
            None => {
                self.rejected.push(format!("{}={:?}", key, raw));
                default
            }
        }
    }
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置的变量使用默认值；无法解析的变量记录下来，
    /// 由 [`validate`](Self::validate) 连同必填项一起报错
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut env = EnvReader::new(lookup);
        let mut config = Self {
            work_dir: env.string("WORK_DIR", "/var/lib/woo-station"),
            woo_site_url: env.string("WOO_SITE_URL", ""),
            woo_consumer_key: env.string("WOO_CONSUMER_KEY", ""),
            woo_consumer_secret: env.string("WOO_CONSUMER_SECRET", ""),
            poll_interval_secs: env.parse("POLL_INTERVAL_SECS", 60),
            auto_print: env.parse("AUTO_PRINT", true),

            printer_connection: env.string("PRINTER_CONNECTION", "serial"),
            printer_address: env.string("PRINTER_ADDRESS", "/dev/rfcomm0"),
            printer_baud_rate: env.parse("PRINTER_BAUD_RATE", 9600),
            printer_vendor: env.parse("PRINTER_VENDOR", PrinterVendor::Generic),
            paper_width: env.parse_with("PAPER_WIDTH_MM", PaperWidth::default(), |v| {
                v.parse::<u32>().ok().and_then(|mm| PaperWidth::from_mm(mm).ok())
            }),
            auto_cut: env.parse("AUTO_CUT", true),
            open_drawer: env.parse("OPEN_DRAWER", false),
            print_copies: env.parse("PRINT_COPIES", 1),
            template: env.parse("TEMPLATE", TemplateType::Full),

            store_name: env.string("STORE_NAME", ""),
            store_address: env.string("STORE_ADDRESS", ""),
            store_phone: env.optional("STORE_PHONE"),
            currency_symbol: env.string("CURRENCY_SYMBOL", "$"),
            timezone: env.parse("TIMEZONE", Tz::UTC),

            log_level: env.string("LOG_LEVEL", "info"),
            log_dir: env.optional("LOG_DIR"),
            environment: env.string("ENVIRONMENT", "development"),
            request_timeout_secs: env.parse("REQUEST_TIMEOUT_SECS", 30),
            http_port: env.parse("HTTP_PORT", 8080),
            rejected_env: Vec::new(),
        };
        config.rejected_env = env.rejected;
        config
    }

    /// 使用自定义工作目录和商店地址覆盖配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, site_url: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.woo_site_url = site_url.into();
        config
    }

    /// 检查必填项和取值范围
    pub fn validate(&self) -> Result<()> {
        if !self.rejected_env.is_empty() {
            return Err(StationError::Config(format!(
                "Invalid environment values: {}",
                self.rejected_env.join(", ")
            )));
        }
        if self.woo_site_url.trim().is_empty() {
            return Err(StationError::Config("WOO_SITE_URL is required".into()));
        }
        if self.woo_consumer_key.trim().is_empty() || self.woo_consumer_secret.trim().is_empty() {
            return Err(StationError::Config(
                "WOO_CONSUMER_KEY and WOO_CONSUMER_SECRET are required".into(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(StationError::Config(
                "POLL_INTERVAL_SECS must be positive".into(),
            ));
        }
        if self.print_copies == 0 {
            return Err(StationError::Config("PRINT_COPIES must be positive".into()));
        }
        Ok(())
    }

    /// API 监听地址，端口为 0 时不开启
    pub fn http_addr(&self) -> Option<SocketAddr> {
        (self.http_port != 0).then(|| SocketAddr::from(([0, 0, 0, 0], self.http_port)))
    }

    /// redb 数据库路径
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("station.redb")
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            &self.woo_site_url,
            &self.woo_consumer_key,
            &self.woo_consumer_secret,
        )
        .with_timeout(self.request_timeout_secs)
    }

    pub fn printer_profile(&self) -> PrinterProfile {
        PrinterProfile {
            vendor: self.printer_vendor,
            paper_width: self.paper_width,
            auto_cut: self.auto_cut,
            open_drawer: self.open_drawer,
        }
    }

    pub fn store_info(&self) -> StoreInfo {
        StoreInfo {
            name: self.store_name.clone(),
            address: self.store_address.clone(),
            phone: self.store_phone.clone(),
            currency_symbol: self.currency_symbol.clone(),
        }
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

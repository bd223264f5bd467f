use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum LinkpageError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    DateParse(String),
    Unauthorized(String),
    /// 事件存储不可用（区别于"区间内没有事件"）
    DataUnavailable(String),
    /// 时间范围起点晚于终点
    InvalidRange(String),
    UploadRejected(String),
}

impl LinkpageError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkpageError::DatabaseConfig(_) => "E001",
            LinkpageError::DatabaseConnection(_) => "E002",
            LinkpageError::DatabaseOperation(_) => "E003",
            LinkpageError::FileOperation(_) => "E004",
            LinkpageError::Validation(_) => "E005",
            LinkpageError::NotFound(_) => "E006",
            LinkpageError::Serialization(_) => "E007",
            LinkpageError::DateParse(_) => "E008",
            LinkpageError::Unauthorized(_) => "E009",
            LinkpageError::DataUnavailable(_) => "E010",
            LinkpageError::InvalidRange(_) => "E011",
            LinkpageError::UploadRejected(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkpageError::DatabaseConfig(_) => "Database Configuration Error",
            LinkpageError::DatabaseConnection(_) => "Database Connection Error",
            LinkpageError::DatabaseOperation(_) => "Database Operation Error",
            LinkpageError::FileOperation(_) => "File Operation Error",
            LinkpageError::Validation(_) => "Validation Error",
            LinkpageError::NotFound(_) => "Resource Not Found",
            LinkpageError::Serialization(_) => "Serialization Error",
            LinkpageError::DateParse(_) => "Date Parse Error",
            LinkpageError::Unauthorized(_) => "Unauthorized",
            LinkpageError::DataUnavailable(_) => "Data Unavailable",
            LinkpageError::InvalidRange(_) => "Invalid Range",
            LinkpageError::UploadRejected(_) => "Upload Rejected",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkpageError::DatabaseConfig(msg)
            | LinkpageError::DatabaseConnection(msg)
            | LinkpageError::DatabaseOperation(msg)
            | LinkpageError::FileOperation(msg)
            | LinkpageError::Validation(msg)
            | LinkpageError::NotFound(msg)
            | LinkpageError::Serialization(msg)
            | LinkpageError::DateParse(msg)
            | LinkpageError::Unauthorized(msg)
            | LinkpageError::DataUnavailable(msg)
            | LinkpageError::InvalidRange(msg)
            | LinkpageError::UploadRejected(msg) => msg,
        }
    }

    /// HTTP 状态码映射（API 边界使用）
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinkpageError::Validation(_)
            | LinkpageError::DateParse(_)
            | LinkpageError::InvalidRange(_)
            | LinkpageError::UploadRejected(_) => StatusCode::BAD_REQUEST,
            LinkpageError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkpageError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            LinkpageError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            LinkpageError::DatabaseConfig(_)
            | LinkpageError::DatabaseConnection(_)
            | LinkpageError::DatabaseOperation(_)
            | LinkpageError::FileOperation(_)
            | LinkpageError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出（用于 CLI 模式）
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkpageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkpageError {}

// 便捷的构造函数
impl LinkpageError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        LinkpageError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkpageError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkpageError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        LinkpageError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkpageError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkpageError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        LinkpageError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        LinkpageError::DateParse(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        LinkpageError::Unauthorized(msg.into())
    }

    pub fn data_unavailable<T: Into<String>>(msg: T) -> Self {
        LinkpageError::DataUnavailable(msg.into())
    }

    pub fn invalid_range<T: Into<String>>(msg: T) -> Self {
        LinkpageError::InvalidRange(msg.into())
    }

    pub fn upload_rejected<T: Into<String>>(msg: T) -> Self {
        LinkpageError::UploadRejected(msg.into())
    }
}

impl From<sea_orm::DbErr> for LinkpageError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkpageError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for LinkpageError {
    fn from(err: std::io::Error) -> Self {
        LinkpageError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkpageError {
    fn from(err: serde_json::Error) -> Self {
        LinkpageError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for LinkpageError {
    fn from(err: chrono::ParseError) -> Self {
        LinkpageError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LinkpageError>;

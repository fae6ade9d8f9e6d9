//! # 统一错误处理模块
//!
//! 定义 gauxtb 的所有错误类型，使用 `thiserror` 派生。
//!
//! 三类错误：
//! - 格式错误：请求文件或 xtb 输出不符合约定
//! - 引擎错误：xtb 未找到、非零退出或超时
//! - I/O 错误：文件无法读写
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// gauxtb 统一错误类型
#[derive(Error, Debug)]
pub enum GauXtbError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 格式错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to parse {format} file: {path}\nReason: {reason}")]
    ParseError {
        format: String,
        path: String,
        reason: String,
    },

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed: {command}\n{status}")]
    CommandFailed { command: String, status: String },

    #[error("External command timed out after {seconds:.1} s: {command}")]
    CommandTimeout { command: String, seconds: f64 },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl GauXtbError {
    /// 是否属于格式错误
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            GauXtbError::ParseError { .. } | GauXtbError::InvalidFormat(_)
        )
    }

    /// 是否属于引擎错误
    pub fn is_engine_error(&self) -> bool {
        matches!(
            self,
            GauXtbError::CommandNotFound { .. }
                | GauXtbError::CommandFailed { .. }
                | GauXtbError::CommandTimeout { .. }
        )
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, GauXtbError>;

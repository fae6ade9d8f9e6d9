//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。gauxtb 没有子命令：
//! Gaussian 通过 `External="gauxtb"` 以
//! `layer InputFile OutputFile MsgFile FChkFile MatElFile` 调用，
//! 也可以只给一个请求名手动运行。
//!
//! 所有选项都可以通过环境变量设置，方便写进 Gaussian 输入的 External 行之外。
//!
//! ## 依赖关系
//! - 被 `main.rs`, `commands/external.rs` 使用

use crate::error::{GauXtbError, Result};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// gauxtb - Gaussian External 到 xtb 的桥接
#[derive(Parser, Debug)]
#[command(name = "gauxtb")]
#[command(version)]
#[command(about = "Run xtb as a Gaussian External program", long_about = None)]
pub struct Cli {
    /// Request base name, or the Gaussian External argument list
    /// (layer InputFile OutputFile MsgFile FChkFile MatElFile)
    #[arg(required = true, num_args = 1..=6, value_name = "ARGS")]
    pub args: Vec<String>,

    /// xtb executable name or path
    #[arg(long, env = "GAUXTB_XTB", default_value = "xtb")]
    pub xtb: String,

    /// Extra xtb keywords appended to every run (e.g. '--gfn 1 --alpb water')
    #[arg(long, env = "GAUXTB_KEYWORDS", default_value = "", allow_hyphen_values = true)]
    pub keywords: String,

    /// Timeout for each xtb run in seconds
    #[arg(long, env = "GAUXTB_TIMEOUT")]
    pub timeout: Option<f64>,

    /// Scratch directory for xtb files (default: temporary directory next to the request)
    #[arg(long, env = "GAUXTB_SCRATCH")]
    pub scratch: Option<PathBuf>,

    /// Keep the temporary scratch directory
    #[arg(long, default_value_t = false)]
    pub keep_scratch: bool,

    /// xtb log file (default: xtb_std.out next to the request)
    #[arg(long, env = "GAUXTB_LOG")]
    pub log: Option<PathBuf>,

    /// Run energy-only requests with --sp instead of --grad
    #[arg(long, default_value_t = false)]
    pub sp_energy: bool,

    /// Suppress status output
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl Cli {
    /// 请求名：单参数时即为该参数，Gaussian 调用时为第二个参数 (InputFile)
    pub fn request_name(&self) -> Result<PathBuf> {
        let name = match self.args.as_slice() {
            [single] => single,
            [_layer, input, ..] => input,
            [] => return Err(GauXtbError::InvalidArgument("No request name given".to_string())),
        };
        if name.trim().is_empty() {
            return Err(GauXtbError::InvalidArgument(
                "Request name is empty".to_string(),
            ));
        }
        Ok(PathBuf::from(name))
    }

    /// 超时时间
    pub fn timeout_duration(&self) -> Result<Option<Duration>> {
        match self.timeout {
            None => Ok(None),
            Some(t) if t > 0.0 => Duration::try_from_secs_f64(t).map(Some).map_err(|_| {
                GauXtbError::InvalidArgument(format!("Timeout of {} s is out of range", t))
            }),
            Some(t) => Err(GauXtbError::InvalidArgument(format!(
                "Timeout must be a positive number of seconds, got {}",
                t
            ))),
        }
    }
}

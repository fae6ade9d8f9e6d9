//! # xtb 调用模块
//!
//! 为单次 xtb 计算构造命令行并同步执行：
//!
//! ```text
//! xtb <geometry> --chrg <q> --uhf <n> --grad|--hess|--sp --restart|--norestart [keywords...]
//! ```
//!
//! stdout/stderr 追加写入共享日志文件。进程以 scratch 目录为工作目录，
//! xtb 的 `energy`/`gradient`/`hessian`/`xtbrestart` 都写在那里。
//! 非零退出或超时均视为引擎错误。
//!
//! ## 依赖关系
//! - 被 `workflow/assembler.rs` 使用
//! - 使用 `utils/progress.rs`
//! - 使用 `which` 定位可执行文件，`wait-timeout` 实现超时

use crate::error::{GauXtbError, Result};
use crate::models::EngineLevel;
use crate::utils::progress;

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;
use wait_timeout::ChildExt;

/// xtb 运行配置
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// 可执行文件名或路径
    pub executable: String,
    /// 附加关键词，按空白拆分后原样追加
    pub keywords: String,
    /// 单次运行超时
    pub timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            executable: "xtb".to_string(),
            keywords: String::new(),
            timeout: None,
        }
    }
}

/// 单次调用的参数
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    pub geometry: &'a Path,
    pub charge: i32,
    pub unpaired_electrons: u32,
    pub level: EngineLevel,
    pub restart: bool,
}

/// xtb 执行器
#[derive(Debug)]
pub struct XtbRunner {
    executable: PathBuf,
    keywords: Vec<String>,
    timeout: Option<Duration>,
}

impl XtbRunner {
    /// 在 PATH 中定位 xtb
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let executable =
            which::which(&config.executable).map_err(|_| GauXtbError::CommandNotFound {
                command: config.executable.clone(),
            })?;

        Ok(XtbRunner {
            executable,
            keywords: config
                .keywords
                .split_whitespace()
                .map(str::to_string)
                .collect(),
            timeout: config.timeout,
        })
    }

    /// 构造命令行参数（不含可执行文件）
    pub fn build_args(&self, inv: &Invocation) -> Vec<String> {
        let mut args = vec![
            inv.geometry.display().to_string(),
            "--chrg".to_string(),
            inv.charge.to_string(),
            "--uhf".to_string(),
            inv.unpaired_electrons.to_string(),
            inv.level.flag().to_string(),
            if inv.restart { "--restart" } else { "--norestart" }.to_string(),
        ];
        args.extend(self.keywords.iter().cloned());
        args
    }

    /// 完整命令行，用于日志与错误信息
    pub fn command_line(&self, inv: &Invocation) -> String {
        let mut parts = vec![self.executable.display().to_string()];
        parts.extend(self.build_args(inv));
        parts.join(" ")
    }

    /// 运行 xtb 并等待结束
    pub fn run(&self, inv: &Invocation, workdir: &Path, log_path: &Path) -> Result<()> {
        let command = self.command_line(inv);

        let log = open_log(log_path)?;
        let log_err = log.try_clone().map_err(|e| GauXtbError::FileWriteError {
            path: log_path.display().to_string(),
            source: e,
        })?;

        let mut child = Command::new(&self.executable)
            .args(self.build_args(inv))
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::from(log))
            .stderr(Stdio::from(log_err))
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => GauXtbError::CommandNotFound {
                    command: self.executable.display().to_string(),
                },
                _ => GauXtbError::CommandFailed {
                    command: command.clone(),
                    status: e.to_string(),
                },
            })?;

        let pb = progress::create_spinner(&format!("xtb {}", inv.level.flag()));

        let waited = match self.timeout {
            Some(limit) => child.wait_timeout(limit),
            None => child.wait().map(Some),
        };
        pb.finish_and_clear();

        let status = match waited {
            Ok(Some(status)) => status,
            Ok(None) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(GauXtbError::CommandTimeout {
                    command,
                    seconds: self.timeout.map(|t| t.as_secs_f64()).unwrap_or_default(),
                });
            }
            Err(e) => {
                let _ = child.kill();
                return Err(GauXtbError::CommandFailed {
                    command,
                    status: e.to_string(),
                });
            }
        };

        if !status.success() {
            return Err(GauXtbError::CommandFailed {
                command,
                status: format!("{} (see {})", status, log_path.display()),
            });
        }

        Ok(())
    }
}

/// 以追加模式打开日志
fn open_log(path: &Path) -> Result<File> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| GauXtbError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })
}

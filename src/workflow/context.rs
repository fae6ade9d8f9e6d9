//! # 运行上下文
//!
//! 保存一次调用涉及的全部路径：
//! - `<name>.EIn` / `<name>.EOu`（请求所在目录）
//! - scratch 目录：`gau_xtb.xyz`, `energy`, `gradient`, `hessian`, `xtbrestart`
//! - xtb 日志（默认 `<请求目录>/xtb_std.out`）
//!
//! 未指定 scratch 时在请求目录下创建临时目录，上下文释放时删除。
//!
//! ## 依赖关系
//! - 被 `workflow/assembler.rs`, `commands/external.rs` 使用
//! - 使用 `tempfile` 创建临时目录

use crate::error::{GauXtbError, Result};
use crate::models::Quantity;
use crate::parsers::eou;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// xtb 输入几何文件名
pub const GEOMETRY_FILE: &str = "gau_xtb.xyz";

/// 默认 xtb 日志文件名
pub const LOG_FILE: &str = "xtb_std.out";

/// 一次调用的路径集合
#[derive(Debug)]
pub struct RunContext {
    pub request_path: PathBuf,
    pub response_path: PathBuf,
    pub scratch_dir: PathBuf,
    pub log_path: PathBuf,
    /// 临时 scratch 目录，drop 时删除
    scratch_guard: Option<TempDir>,
}

impl RunContext {
    /// 由请求名构造上下文
    ///
    /// `name` 可以带或不带扩展名，统一替换为 `.EIn` / `.EOu`。
    pub fn new(
        name: &Path,
        scratch: Option<PathBuf>,
        log: Option<PathBuf>,
        keep_scratch: bool,
    ) -> Result<Self> {
        let request_path = name.with_extension("EIn");
        let response_path = eou::response_path(&request_path);

        let request_dir = match request_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (scratch_dir, guard) = match scratch {
            Some(dir) => {
                fs::create_dir_all(&dir).map_err(|e| GauXtbError::FileWriteError {
                    path: dir.display().to_string(),
                    source: e,
                })?;
                (dir, None)
            }
            None => {
                let tmp = tempfile::Builder::new()
                    .prefix("gauxtb.")
                    .tempdir_in(&request_dir)
                    .map_err(|e| GauXtbError::FileWriteError {
                        path: request_dir.display().to_string(),
                        source: e,
                    })?;
                if keep_scratch {
                    (tmp.keep(), None)
                } else {
                    (tmp.path().to_path_buf(), Some(tmp))
                }
            }
        };

        // xtb 以 scratch 为工作目录运行，传给它的路径必须是绝对路径
        let scratch_dir = fs::canonicalize(&scratch_dir).map_err(|e| GauXtbError::FileReadError {
            path: scratch_dir.display().to_string(),
            source: e,
        })?;

        let log_path = log.unwrap_or_else(|| request_dir.join(LOG_FILE));

        Ok(RunContext {
            request_path,
            response_path,
            scratch_dir,
            log_path,
            scratch_guard: guard,
        })
    }

    /// xyz 几何文件路径
    pub fn geometry_path(&self) -> PathBuf {
        self.scratch_dir.join(GEOMETRY_FILE)
    }

    /// xtb 结果文件路径
    pub fn result_path(&self, quantity: Quantity) -> PathBuf {
        self.scratch_dir.join(quantity.file_name())
    }

    /// scratch 目录是否会在结束时删除
    pub fn is_ephemeral(&self) -> bool {
        self.scratch_guard.is_some()
    }
}

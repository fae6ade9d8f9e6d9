//! # 命令执行模块
//!
//! 实现 gauxtb 的入口逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `workflow/`, `engine/`, `utils/`
//! - 子模块: external

pub mod external;

use crate::cli::Cli;
use crate::error::Result;

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    external::execute(cli)
}

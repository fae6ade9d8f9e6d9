//! # gauxtb - Gaussian External 与 xtb 的桥接
//!
//! Gaussian 以 `External` 关键词调用本程序：读取 `.EIn` 请求，
//! 调用 xtb 计算能量/梯度/Hessian，再按 Gaussian 要求的定宽格式写回 `.EOu`。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     └── workflow/  (运行上下文与结果组装)
//!   │           ├── parsers/  (.EIn / xtb 结果 / .EOu / xyz)
//!   │           ├── engine/   (xtb 调用)
//!   │           └── models/   (数据模型)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod cli;
mod commands;
mod engine;
mod error;
mod models;
mod parsers;
mod utils;
mod workflow;

use clap::Parser;
use cli::Cli;
use std::error::Error;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        let kind = if e.is_format_error() {
            "format error"
        } else if e.is_engine_error() {
            "engine error"
        } else {
            "error"
        };
        utils::output::print_error(&format!("({}) {}", kind, e));

        let mut source = e.source();
        while let Some(cause) = source {
            utils::output::print_error(&format!("  caused by: {}", cause));
            source = cause.source();
        }
        std::process::exit(1);
    }
}

//! # 计算流程模块
//!
//! 一次 Gaussian External 调用的完整流程：
//! 读取 `.EIn` -> 写 xyz -> 按计划调用 xtb -> 解析结果 -> 编码 -> 写 `.EOu`。
//!
//! 所有文件路径都由 `RunContext` 显式给出，不依赖进程的当前目录。
//! 同一 scratch 目录中的并发调用不受支持（文件名固定）。
//!
//! ## 依赖关系
//! - 被 `commands/external.rs` 调用
//! - 使用 `parsers/`, `engine/`, `models/`
//! - 子模块: context, assembler

pub mod assembler;
pub mod context;

pub use assembler::{Assembler, Assembly};
pub use context::RunContext;

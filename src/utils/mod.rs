//! # 工具函数模块
//!
//! 提供美化输出、进度 spinner、单位换算、元素表和定宽浮点格式化。
//!
//! ## 依赖关系
//! - 被 `commands/`, `parsers/`, `engine/`, `workflow/` 使用
//! - 子模块: output, progress, units, elements, fortran

pub mod elements;
pub mod fortran;
pub mod output;
pub mod progress;
pub mod units;

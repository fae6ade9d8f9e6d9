//! # 解析器模块
//!
//! Gaussian 与 xtb 之间的文件格式转换。
//!
//! ## 依赖关系
//! - 被 `workflow/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: ein (请求), xtb (引擎结果), eou (响应), xyz (几何)

pub mod eou;
pub mod ein;
pub mod xtb;
pub mod xyz;

//! # 数据模型模块
//!
//! 定义 Gaussian 请求、计算计划和导数结果的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `engine/`, `workflow/` 使用
//! - 子模块: request, plan, results

pub mod plan;
pub mod request;
pub mod results;

pub use plan::{DerivativeOrder, EngineLevel, EngineStep, Quantity};
pub use request::{Atom, Request};
pub use results::{DerivativeData, DerivativeOutputs, EncodedBlocks, Hessian};

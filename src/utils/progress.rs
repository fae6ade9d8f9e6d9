//! # 进度 spinner
//!
//! 封装 `indicatif`，在 xtb 运行期间显示 spinner。
//!
//! ## 依赖关系
//! - 被 `engine/mod.rs` 使用
//! - 使用 `indicatif` crate

use super::output;
use indicatif::{ProgressBar, ProgressStyle};

/// 创建 spinner（用于不确定进度的任务）
///
/// 静默模式下返回隐藏的 spinner，调用方无需区分。
pub fn create_spinner(message: &str) -> ProgressBar {
    if output::is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.green} {elapsed_precise} {msg}") {
        pb.set_style(style.tick_strings(&["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"]));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

//! # Fortran 风格定宽浮点格式
//!
//! Gaussian 以 Fortran 格式读取 `.EOu`，每个字段为 `%20.12E`：
//! 20 字符宽、12 位小数、指数至少两位且带符号，例如
//! ` -1.050000000000E+00`。
//!
//! Rust 的 `{:e}` 输出 `-1.05e0`，因此需要手动拼接指数部分。
//!
//! ## 依赖关系
//! - 被 `parsers/eou.rs` 使用
//! - 无外部模块依赖

/// `.EOu` 字段宽度
pub const FIELD_WIDTH: usize = 20;

/// `.EOu` 字段小数位数
pub const FIELD_PRECISION: usize = 12;

/// 按 `%{width}.{precision}E` 格式化单个数值（右对齐）
pub fn format_sci(value: f64, width: usize, precision: usize) -> String {
    let body = if value.is_nan() {
        "NAN".to_string()
    } else if value.is_infinite() {
        let inf = if value < 0.0 { "-INF" } else { "INF" };
        inf.to_string()
    } else {
        let raw = format!("{:.*e}", precision, value);
        match raw.split_once('e') {
            Some((mantissa, exp)) => {
                let exp: i32 = exp.parse().unwrap_or(0);
                let sign = if exp < 0 { '-' } else { '+' };
                format!("{}E{}{:02}", mantissa, sign, exp.abs())
            }
            None => raw,
        }
    };
    format!("{:>width$}", body, width = width)
}

/// 将一行数值格式化为连续的 `%20.12E` 字段
pub fn format_row(values: &[f64]) -> String {
    values
        .iter()
        .map(|&v| format_sci(v, FIELD_WIDTH, FIELD_PRECISION))
        .collect()
}

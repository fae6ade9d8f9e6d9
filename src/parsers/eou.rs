//! # Gaussian `.EOu` 响应写出
//!
//! ## `.EOu` 格式说明
//! 每个字段 `%20.12E`，块之间换行连接，按导数阶数升序：
//! ```text
//! E  Dx  Dy  Dz                       # 能量 + 偶极（此处恒为 0）
//! dE/dX1 dE/dY1 dE/dZ1                # 梯度，每原子一行 (nderiv >= 1)
//! ...
//! 0 0 0                               # 极化率 (2 行) + 偶极导数 (3N 行)，全零
//! ...
//! FC(1,1) FC(2,1) FC(2,2)             # 力常数下三角，每行 3 个 (nderiv = 2)
//! ...
//! ```
//!
//! 力常数块前的 3N+2 行零占位不可省略，否则 Gaussian 读取的每个字段都会错位。
//!
//! ## 依赖关系
//! - 被 `workflow/assembler.rs` 使用
//! - 使用 `utils/fortran.rs`, `models/results.rs`

use crate::error::{GauXtbError, Result};
use crate::models::{DerivativeData, DerivativeOrder, EncodedBlocks, Hessian};
use crate::utils::fortran::format_row;
use std::fs;
use std::path::{Path, PathBuf};

/// 能量行：能量 + 三个零偶极分量
pub fn encode_energy(energy: f64) -> String {
    format_row(&[energy, 0.0, 0.0, 0.0])
}

/// 梯度块：每原子一行
pub fn encode_gradient(gradient: &[[f64; 3]]) -> String {
    gradient
        .iter()
        .map(|row| format_row(row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 力常数块：3N+2 行零占位，随后是下三角元素，每行 3 个
pub fn encode_hessian(hessian: &Hessian) -> String {
    let zero_rows = hessian.dim() + 2;
    let zeros = format_row(&[0.0; 3]);

    // 3N(3N+1)/2 总能被 3 整除
    let packed = hessian.lower_triangle();

    std::iter::repeat(zeros)
        .take(zero_rows)
        .chain(packed.chunks(3).map(format_row))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 编码单个物理量
pub fn encode(data: &DerivativeData) -> String {
    match data {
        DerivativeData::Energy(e) => encode_energy(*e),
        DerivativeData::Gradient(g) => encode_gradient(g),
        DerivativeData::Hessian(h) => encode_hessian(h),
    }
}

/// 按升序连接所有块
pub fn assemble_response(blocks: &EncodedBlocks, order: DerivativeOrder) -> Result<String> {
    let mut parts = Vec::with_capacity(order.quantities().len());
    for &quantity in order.quantities() {
        let block = blocks.get(quantity).ok_or_else(|| {
            GauXtbError::InvalidFormat(format!(
                "No {} block available for a '{}' request",
                quantity, order
            ))
        })?;
        parts.push(block);
    }
    Ok(parts.join("\n"))
}

/// 由请求文件名推导 `.EOu` 路径
pub fn response_path(request_path: &Path) -> PathBuf {
    request_path.with_extension("EOu")
}

/// 写出 `.EOu`：先写临时文件再重命名，失败时不会留下不完整的响应
pub fn write_response(path: &Path, text: &str) -> Result<()> {
    let tmp = path.with_extension("EOu.tmp");
    fs::write(&tmp, text).map_err(|e| GauXtbError::FileWriteError {
        path: tmp.display().to_string(),
        source: e,
    })?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        GauXtbError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        }
    })
}

//! # xtb 结果文件解析器
//!
//! xtb 以 Turbomole 风格在工作目录写出 `energy`, `gradient`, `hessian`：
//!
//! ```text
//! $energy                                  $grad
//!      1   -5.0705444   -5.0705444  ...      cycle =  1  SCF energy = ...
//! $end                                       0.0  0.0  -0.69   h      # N 行坐标
//!                                            ...
//!                                            1.2E-17  3.4E-17  1.8E-02 # N 行梯度
//!                                          $end
//! ```
//!
//! 统一做法：定位第一个 `$label` 标记块（到最后一个数字为止），再按物理量解释：
//! - energy: 第二个字段
//! - gradient: 跳过前 N+1 行后恰好 3N 个数
//! - hessian: 恰好 (3N)² 个数，行优先
//!
//! ## 依赖关系
//! - 被 `workflow/assembler.rs` 使用
//! - 使用 `models/results.rs`, `parsers/ein.rs` 的浮点解析

use super::ein::parse_float;
use crate::error::{GauXtbError, Result};
use crate::models::{DerivativeData, Hessian, Quantity};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// `$label` 之后直到最后一个数字的内容
static MARKER_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\$\w+\s*(.*\d)").unwrap());

/// 读取并解析 xtb 写出的某个结果文件
pub fn read_quantity(path: &Path, quantity: Quantity, natoms: usize) -> Result<DerivativeData> {
    if !path.exists() {
        return Err(GauXtbError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let text = fs::read_to_string(path).map_err(|e| GauXtbError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let source = path.display().to_string();
    match quantity {
        Quantity::Energy => parse_energy(&text, &source).map(DerivativeData::Energy),
        Quantity::Gradient => {
            parse_gradient(&text, natoms, &source).map(DerivativeData::Gradient)
        }
        Quantity::Hessian => parse_hessian(&text, natoms, &source).map(DerivativeData::Hessian),
    }
}

/// 提取第一个标记块的数值部分
pub fn extract_marker_block(text: &str) -> Option<&str> {
    MARKER_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// 解析 `energy` 文件
pub fn parse_energy(text: &str, source: &str) -> Result<f64> {
    let block = marker_block(text, "energy", source)?;
    let token = block.split_whitespace().nth(1).ok_or_else(|| GauXtbError::ParseError {
        format: "xtb energy".to_string(),
        path: source.to_string(),
        reason: "Energy block has fewer than 2 fields".to_string(),
    })?;
    parse_number(token, "energy", source)
}

/// 解析 `gradient` 文件，返回每原子一行 (x, y, z)
pub fn parse_gradient(text: &str, natoms: usize, source: &str) -> Result<Vec<[f64; 3]>> {
    let block = marker_block(text, "gradient", source)?;

    // 第一行为 cycle 信息，随后 N 行为坐标
    let values = block
        .lines()
        .skip(natoms + 1)
        .flat_map(str::split_whitespace)
        .map(|token| parse_number(token, "gradient", source))
        .collect::<Result<Vec<f64>>>()?;

    if values.len() != 3 * natoms {
        return Err(GauXtbError::InvalidFormat(format!(
            "{}: expected {} gradient components for {} atoms, found {}",
            source,
            3 * natoms,
            natoms,
            values.len()
        )));
    }

    Ok(values
        .chunks_exact(3)
        .map(|c| [c[0], c[1], c[2]])
        .collect())
}

/// 解析 `hessian` 文件，返回 3N x 3N 方阵
pub fn parse_hessian(text: &str, natoms: usize, source: &str) -> Result<Hessian> {
    let block = marker_block(text, "hessian", source)?;
    let values = block
        .split_whitespace()
        .map(|token| parse_number(token, "hessian", source))
        .collect::<Result<Vec<f64>>>()?;

    let dim = 3 * natoms;
    let found = values.len();
    Hessian::from_row_major(dim, values).ok_or_else(|| {
        GauXtbError::InvalidFormat(format!(
            "{}: expected {}x{} = {} hessian elements for {} atoms, found {}",
            source,
            dim,
            dim,
            dim * dim,
            natoms,
            found
        ))
    })
}

fn marker_block<'a>(text: &'a str, what: &str, source: &str) -> Result<&'a str> {
    extract_marker_block(text).ok_or_else(|| GauXtbError::ParseError {
        format: format!("xtb {}", what),
        path: source.to_string(),
        reason: "No '$' marker block followed by numeric data".to_string(),
    })
}

fn parse_number(token: &str, what: &str, source: &str) -> Result<f64> {
    parse_float(token).ok_or_else(|| GauXtbError::ParseError {
        format: format!("xtb {}", what),
        path: source.to_string(),
        reason: format!("'{}' is not a number", token),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENERGY: &str = "$energy\n     1    -5.07054444424    -5.07054444424    -5.07054444424\n$end\n";

    const GRADIENT: &str = r#"$grad
  cycle =      1    SCF energy =    -5.07054444424   |dE/dxyz| =  0.000040
    0.00000000000000      0.00000000000000     -0.69893170591004      h
    0.00000000000000      0.00000000000000      0.69893170591004      h
   1.2345678901234E-17   0.0000000000000E+00  -2.8304919543066E-05
  -1.2345678901234E-17   0.0000000000000D+00   2.8304919543066E-05
$end
"#;

    #[test]
    fn test_extract_marker_block() {
        let block = extract_marker_block(ENERGY).unwrap();
        assert!(block.starts_with('1'));
        assert!(!block.contains("$end"));
        assert!(extract_marker_block("no marker 1 2 3\n").is_none());
    }

    #[test]
    fn test_parse_energy() {
        let e = parse_energy(ENERGY, "energy").unwrap();
        assert!((e - (-5.07054444424)).abs() < 1e-12);
    }

    #[test]
    fn test_parse_gradient() {
        let g = parse_gradient(GRADIENT, 2, "gradient").unwrap();
        assert_eq!(g.len(), 2);
        assert!((g[0][2] - (-2.8304919543066e-5)).abs() < 1e-18);
        assert!((g[1][0] - (-1.2345678901234e-17)).abs() < 1e-28);
        assert_eq!(g[1][1], 0.0);
    }

    #[test]
    fn test_parse_gradient_wrong_atom_count() {
        let err = parse_gradient(GRADIENT, 3, "gradient").unwrap_err();
        assert!(err.is_format_error());
    }

    #[test]
    fn test_parse_hessian() {
        let text = "$hessian\n  1.0  0.1  0.2\n  0.1  2.0  0.3\n  0.2  0.3  3.0\n$end\n";
        let h = parse_hessian(text, 1, "hessian").unwrap();
        assert_eq!(h.dim(), 3);
        assert_eq!(h.get(0, 0), 1.0);
        assert_eq!(h.get(2, 1), 0.3);
    }

    #[test]
    fn test_parse_hessian_not_square() {
        let text = "$hessian\n  1.0  0.1  0.2\n  0.1  2.0\n$end\n";
        let err = parse_hessian(text, 1, "hessian").unwrap_err();
        assert!(matches!(err, GauXtbError::InvalidFormat(_)));
    }

    #[test]
    fn test_missing_marker_is_format_error() {
        assert!(parse_energy("garbage", "energy").unwrap_err().is_format_error());
    }

    #[test]
    fn test_read_quantity_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energy");
        fs::write(&path, ENERGY).unwrap();

        let data = read_quantity(&path, Quantity::Energy, 2).unwrap();
        assert_eq!(data.quantity(), Quantity::Energy);

        let missing = read_quantity(&dir.path().join("hessian"), Quantity::Hessian, 2);
        assert!(matches!(missing, Err(GauXtbError::FileNotFound { .. })));
    }
}

//! # Gaussian `.EIn` 请求解析器
//!
//! ## `.EIn` 格式说明
//! ```text
//! natoms nderiv charge mult      # 第一行：四个整数
//! IAn  x  y  z  [MMCharge]       # 每原子一行，坐标单位 bohr
//! ...                            # 之后的行（连接表等）忽略
//! ```
//!
//! `.EIn` 是 Gaussian 的一次性交接文件：成功读取后立即删除，
//! 解析失败时保留以便检查。
//!
//! ## 依赖关系
//! - 被 `workflow/assembler.rs` 使用
//! - 使用 `models/request.rs`

use crate::error::{GauXtbError, Result};
use crate::models::{Atom, DerivativeOrder, Request};
use std::fs;
use std::path::Path;

/// 读取并删除 `.EIn` 文件
pub fn read_request(path: &Path) -> Result<Request> {
    if !path.exists() {
        return Err(GauXtbError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| GauXtbError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    let request = parse_request_content(&content, &path.display().to_string())?;

    fs::remove_file(path).map_err(|e| GauXtbError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(request)
}

/// 从字符串内容解析 `.EIn` 格式
pub fn parse_request_content(content: &str, source: &str) -> Result<Request> {
    let err = |reason: String| GauXtbError::ParseError {
        format: "EIn".to_string(),
        path: source.to_string(),
        reason,
    };

    let mut lines = content.lines();

    // Line 0: natoms nderiv charge mult
    let header = lines.next().ok_or_else(|| err("Empty request file".to_string()))?;
    let fields: Vec<&str> = header.split_whitespace().collect();
    if fields.len() != 4 {
        return Err(err(format!(
            "Header must contain 4 integers (natoms nderiv charge mult), found {} fields",
            fields.len()
        )));
    }
    let mut header_values = [0i64; 4];
    for (slot, field) in header_values.iter_mut().zip(&fields) {
        *slot = field
            .parse()
            .map_err(|_| err(format!("Header field '{}' is not an integer", field)))?;
    }
    let [natoms, nderiv, charge, mult] = header_values;

    if natoms < 1 {
        return Err(err(format!("Atom count must be positive, got {}", natoms)));
    }
    let order = DerivativeOrder::from_index(nderiv)
        .ok_or_else(|| err(format!("Derivative order must be 0, 1 or 2, got {}", nderiv)))?;
    let charge = i32::try_from(charge).map_err(|_| err(format!("Charge {} out of range", charge)))?;
    let multiplicity = u32::try_from(mult)
        .ok()
        .filter(|&m| m >= 1)
        .ok_or_else(|| err(format!("Spin multiplicity must be >= 1, got {}", mult)))?;

    // Lines 1..=natoms: IAn x y z [MMCharge]
    let natoms = natoms as usize;
    // 原子数未经校验，不能直接用于预分配
    let mut atoms = Vec::new();
    for i in 0..natoms {
        let line = lines.next().ok_or_else(|| {
            err(format!(
                "Expected {} atom lines, found only {}",
                natoms, i
            ))
        })?;
        atoms.push(parse_atom_line(line).map_err(|reason| {
            err(format!("Atom line {}: {}", i + 2, reason))
        })?);
    }

    Ok(Request {
        order,
        charge,
        multiplicity,
        atoms,
    })
}

/// 解析单个原子行
fn parse_atom_line(line: &str) -> std::result::Result<Atom, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() != 4 && parts.len() != 5 {
        return Err(format!(
            "expected 'IAn x y z' (optionally followed by an MM charge), found {} tokens",
            parts.len()
        ));
    }

    let atomic_number: u32 = parts[0]
        .parse()
        .map_err(|_| format!("invalid atomic number '{}'", parts[0]))?;

    let mut position = [0.0; 3];
    for (k, slot) in position.iter_mut().enumerate() {
        *slot = parse_float(parts[1 + k])
            .ok_or_else(|| format!("invalid coordinate '{}'", parts[1 + k]))?;
    }

    let atom = Atom::new(atomic_number, position);
    match parts.get(4) {
        Some(token) => {
            let q = parse_float(token).ok_or_else(|| format!("invalid MM charge '{}'", token))?;
            Ok(atom.with_mm_charge(q))
        }
        None => Ok(atom),
    }
}

/// 解析浮点数，兼容 Fortran 的 `D` 指数
pub(crate) fn parse_float(token: &str) -> Option<f64> {
    token.replace(['D', 'd'], "E").parse().ok()
}

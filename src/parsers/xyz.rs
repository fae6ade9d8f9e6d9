//! # xyz 几何文件写出
//!
//! xtb 读取标准 xyz：原子数、注释行、`Sym x y z`（Å）。
//!
//! ## 依赖关系
//! - 被 `workflow/assembler.rs` 使用
//! - 使用 `utils/units.rs`, `utils/elements.rs`

use crate::error::{GauXtbError, Result};
use crate::models::Request;
use crate::utils::{elements, units};
use std::fs;
use std::path::Path;

/// 将请求中的几何转换为 xyz 文本（坐标转换为 Å）
pub fn to_xyz_string(request: &Request) -> Result<String> {
    let mut result = String::new();
    result.push_str(&format!("{}\n", request.atom_count()));
    result.push_str(&format!(
        "charge={} multiplicity={}\n",
        request.charge, request.multiplicity
    ));

    for (i, atom) in request.atoms.iter().enumerate() {
        let symbol = elements::symbol(atom.atomic_number).ok_or_else(|| {
            GauXtbError::InvalidFormat(format!(
                "Atom {}: unknown atomic number {}",
                i + 1,
                atom.atomic_number
            ))
        })?;
        let [x, y, z] = units::bohr_to_angstrom(atom.position_bohr);
        result.push_str(&format!("{:<2} {:20.12} {:20.12} {:20.12}\n", symbol, x, y, z));
    }

    Ok(result)
}

/// 写出 xyz 文件
pub fn write_xyz(request: &Request, path: &Path) -> Result<()> {
    let content = to_xyz_string(request)?;
    fs::write(path, content).map_err(|e| GauXtbError::FileWriteError {
        path: path.display().to_string(),
        source: e,
    })
}

//! # 长度单位换算
//!
//! Gaussian 以原子单位 (bohr) 传递坐标，xtb 读取的 xyz 文件使用 Å。
//!
//! ## 依赖关系
//! - 被 `parsers/xyz.rs` 使用
//! - 无外部模块依赖

/// 1 bohr 对应的 Å 数 (CODATA 2014)
pub const BOHR_IN_ANGSTROM: f64 = 0.52917721067;

/// bohr -> Å
pub fn bohr_to_angstrom(position: [f64; 3]) -> [f64; 3] {
    position.map(|x| x * BOHR_IN_ANGSTROM)
}

//! # Gaussian External 请求数据模型
//!
//! `.EIn` 文件解码后的内存表示。创建后不再修改。
//!
//! ## 依赖关系
//! - 被 `parsers/ein.rs` 创建
//! - 被 `parsers/xyz.rs`, `engine/`, `workflow/` 使用

use super::plan::DerivativeOrder;

/// 单个原子
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// 原子序数
    pub atomic_number: u32,
    /// 笛卡尔坐标 (bohr)
    pub position_bohr: [f64; 3],
    /// Gaussian 在第五列写出的 MM 电荷（xtb 不使用）
    pub mm_charge: Option<f64>,
}

impl Atom {
    pub fn new(atomic_number: u32, position_bohr: [f64; 3]) -> Self {
        Atom {
            atomic_number,
            position_bohr,
            mm_charge: None,
        }
    }

    pub fn with_mm_charge(mut self, charge: f64) -> Self {
        self.mm_charge = Some(charge);
        self
    }
}

/// 一次 Gaussian External 调用的请求
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// 请求的导数阶数
    pub order: DerivativeOrder,
    /// 总电荷
    pub charge: i32,
    /// 自旋多重度 (2S+1)
    pub multiplicity: u32,
    /// 原子列表，顺序与 `.EIn` 一致
    pub atoms: Vec<Atom>,
}

impl Request {
    /// 原子数
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// 未成对电子数，即 xtb 的 `--uhf` 参数
    pub fn unpaired_electrons(&self) -> u32 {
        self.multiplicity.saturating_sub(1)
    }
}

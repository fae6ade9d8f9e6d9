//! # 导数结果数据模型
//!
//! - `DerivativeOutputs`: 从 xtb 结果文件解析出的原始数组，按物理量索引
//! - `EncodedBlocks`: 已格式化为 `.EOu` 定宽文本的块，按物理量索引
//!
//! 两者都只包含不超过请求阶数的量，按导数阶数升序迭代。
//!
//! ## 依赖关系
//! - 被 `parsers/xtb.rs`, `parsers/eou.rs`, `workflow/` 使用

use super::plan::Quantity;
use std::collections::BTreeMap;

/// 方阵 Hessian，行优先存储
#[derive(Debug, Clone, PartialEq)]
pub struct Hessian {
    dim: usize,
    values: Vec<f64>,
}

impl Hessian {
    /// 由行优先展开的数值构造，长度必须为 `dim * dim`
    pub fn from_row_major(dim: usize, values: Vec<f64>) -> Option<Self> {
        if values.len() != dim * dim {
            return None;
        }
        Some(Hessian { dim, values })
    }

    /// 维度 (3N)
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// 元素 (row, col)
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.dim + col]
    }

    /// 下三角（含对角线）元素，按行扫描顺序
    pub fn lower_triangle(&self) -> Vec<f64> {
        let mut packed = Vec::with_capacity(self.dim * (self.dim + 1) / 2);
        for row in 0..self.dim {
            packed.extend((0..=row).map(|col| self.get(row, col)));
        }
        packed
    }

    /// 全部元素
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// 单个物理量的原始数据
#[derive(Debug, Clone, PartialEq)]
pub enum DerivativeData {
    /// 总能量 (hartree)
    Energy(f64),
    /// 每原子一行的梯度 (hartree/bohr)
    Gradient(Vec<[f64; 3]>),
    /// 3N x 3N Hessian (hartree/bohr²)
    Hessian(Hessian),
}

impl DerivativeData {
    pub fn quantity(&self) -> Quantity {
        match self {
            DerivativeData::Energy(_) => Quantity::Energy,
            DerivativeData::Gradient(_) => Quantity::Gradient,
            DerivativeData::Hessian(_) => Quantity::Hessian,
        }
    }

    /// 数值个数
    pub fn value_count(&self) -> usize {
        match self {
            DerivativeData::Energy(_) => 1,
            DerivativeData::Gradient(rows) => rows.len() * 3,
            DerivativeData::Hessian(h) => h.values().len(),
        }
    }

    /// 最大绝对值
    pub fn max_abs(&self) -> f64 {
        let fold = |acc: f64, v: &f64| acc.max(v.abs());
        match self {
            DerivativeData::Energy(e) => e.abs(),
            DerivativeData::Gradient(rows) => rows.iter().flatten().fold(0.0, fold),
            DerivativeData::Hessian(h) => h.values().iter().fold(0.0, fold),
        }
    }
}

/// 按物理量索引的原始结果
#[derive(Debug, Default)]
pub struct DerivativeOutputs {
    data: BTreeMap<Quantity, DerivativeData>,
}

impl DerivativeOutputs {
    pub fn insert(&mut self, data: DerivativeData) {
        self.data.insert(data.quantity(), data);
    }

    pub fn get(&self, quantity: Quantity) -> Option<&DerivativeData> {
        self.data.get(&quantity)
    }

    /// 按导数阶数升序迭代
    pub fn iter(&self) -> impl Iterator<Item = &DerivativeData> {
        self.data.values()
    }
}

/// 按物理量索引的 `.EOu` 文本块
#[derive(Debug, Default)]
pub struct EncodedBlocks {
    blocks: BTreeMap<Quantity, String>,
}

impl EncodedBlocks {
    pub fn insert(&mut self, quantity: Quantity, block: String) {
        self.blocks.insert(quantity, block);
    }

    pub fn get(&self, quantity: Quantity) -> Option<&str> {
        self.blocks.get(&quantity).map(String::as_str)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }
}

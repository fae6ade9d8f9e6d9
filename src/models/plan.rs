//! # 计算计划
//!
//! 将 Gaussian 请求的导数阶数映射为有序的 xtb 调用步骤：
//!
//! | 阶数 | 调用 | 读取 |
//! |---|---|---|
//! | 0 | `--grad --norestart` | energy |
//! | 1 | `--grad --norestart` | energy, gradient |
//! | 2 | `--grad --norestart`, `--hess --restart` | energy, gradient / hessian |
//!
//! 仅请求能量时 xtb 默认仍以梯度级别运行（`--sp-energy` 可改为 `--sp`）。Hessian 总是接在梯度计算之后，
//! 通过 `--restart` 复用其波函数。
//!
//! ## 依赖关系
//! - 被 `models/request.rs`, `engine/`, `workflow/` 使用
//! - 无外部模块依赖

use std::fmt;

/// Gaussian 请求的导数阶数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivativeOrder {
    /// nderiv = 0
    EnergyOnly,
    /// nderiv = 1
    EnergyAndGradient,
    /// nderiv = 2
    EnergyGradientAndHessian,
}

impl DerivativeOrder {
    /// 从 `.EIn` 头部的整数解析
    pub fn from_index(index: i64) -> Option<Self> {
        match index {
            0 => Some(DerivativeOrder::EnergyOnly),
            1 => Some(DerivativeOrder::EnergyAndGradient),
            2 => Some(DerivativeOrder::EnergyGradientAndHessian),
            _ => None,
        }
    }

    /// 对应的整数阶数
    pub fn index(self) -> usize {
        match self {
            DerivativeOrder::EnergyOnly => 0,
            DerivativeOrder::EnergyAndGradient => 1,
            DerivativeOrder::EnergyGradientAndHessian => 2,
        }
    }

    /// 需要写入 `.EOu` 的量，按升序排列
    pub fn quantities(self) -> &'static [Quantity] {
        match self {
            DerivativeOrder::EnergyOnly => &[Quantity::Energy],
            DerivativeOrder::EnergyAndGradient => &[Quantity::Energy, Quantity::Gradient],
            DerivativeOrder::EnergyGradientAndHessian => {
                &[Quantity::Energy, Quantity::Gradient, Quantity::Hessian]
            }
        }
    }

    /// 按顺序执行的 xtb 调用
    ///
    /// `single_point_energy` 为 true 时，仅能量请求改用 `--sp` 运行。
    pub fn plan(self, single_point_energy: bool) -> Vec<EngineStep> {
        match self {
            DerivativeOrder::EnergyOnly => vec![EngineStep {
                level: if single_point_energy {
                    EngineLevel::SinglePoint
                } else {
                    EngineLevel::Gradient
                },
                restart: false,
                reads: &[Quantity::Energy],
            }],
            DerivativeOrder::EnergyAndGradient => vec![EngineStep {
                level: EngineLevel::Gradient,
                restart: false,
                reads: &[Quantity::Energy, Quantity::Gradient],
            }],
            DerivativeOrder::EnergyGradientAndHessian => vec![
                EngineStep {
                    level: EngineLevel::Gradient,
                    restart: false,
                    reads: &[Quantity::Energy, Quantity::Gradient],
                },
                EngineStep {
                    level: EngineLevel::Hessian,
                    restart: true,
                    reads: &[Quantity::Hessian],
                },
            ],
        }
    }
}

impl fmt::Display for DerivativeOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivativeOrder::EnergyOnly => write!(f, "energy"),
            DerivativeOrder::EnergyAndGradient => write!(f, "energy + gradient"),
            DerivativeOrder::EnergyGradientAndHessian => {
                write!(f, "energy + gradient + hessian")
            }
        }
    }
}

/// xtb 计算级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineLevel {
    SinglePoint,
    Gradient,
    Hessian,
}

impl EngineLevel {
    /// xtb 命令行参数
    pub fn flag(self) -> &'static str {
        match self {
            EngineLevel::SinglePoint => "--sp",
            EngineLevel::Gradient => "--grad",
            EngineLevel::Hessian => "--hess",
        }
    }
}

/// xtb 写出并被回读的物理量
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Quantity {
    Energy,
    Gradient,
    Hessian,
}

impl Quantity {
    /// 导数阶数，同时是 `.EOu` 中块的顺序
    pub fn order(self) -> usize {
        match self {
            Quantity::Energy => 0,
            Quantity::Gradient => 1,
            Quantity::Hessian => 2,
        }
    }

    /// xtb 在工作目录中写出的结果文件名
    pub fn file_name(self) -> &'static str {
        match self {
            Quantity::Energy => "energy",
            Quantity::Gradient => "gradient",
            Quantity::Hessian => "hessian",
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.file_name())
    }
}

/// 一次 xtb 调用及其完成后需要读取的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineStep {
    pub level: EngineLevel,
    pub restart: bool,
    pub reads: &'static [Quantity],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index() {
        assert_eq!(DerivativeOrder::from_index(0), Some(DerivativeOrder::EnergyOnly));
        assert_eq!(
            DerivativeOrder::from_index(2),
            Some(DerivativeOrder::EnergyGradientAndHessian)
        );
        assert_eq!(DerivativeOrder::from_index(3), None);
        assert_eq!(DerivativeOrder::from_index(-1), None);
        for i in 0..3 {
            assert_eq!(DerivativeOrder::from_index(i).unwrap().index(), i as usize);
        }
    }

    #[test]
    fn test_energy_only_runs_at_gradient_level() {
        let plan = DerivativeOrder::EnergyOnly.plan(false);
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].level, EngineLevel::Gradient);
        assert!(!plan[0].restart);
        assert_eq!(plan[0].reads, &[Quantity::Energy]);
    }

    #[test]
    fn test_single_point_energy_only_affects_energy_requests() {
        let plan = DerivativeOrder::EnergyOnly.plan(true);
        assert_eq!(plan[0].level, EngineLevel::SinglePoint);

        let plan = DerivativeOrder::EnergyAndGradient.plan(true);
        assert_eq!(plan[0].level, EngineLevel::Gradient);
    }

    #[test]
    fn test_hessian_plan_restarts_from_gradient_run() {
        let plan = DerivativeOrder::EnergyGradientAndHessian.plan(false);
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].level, EngineLevel::Gradient);
        assert!(!plan[0].restart);
        assert_eq!(plan[1].level, EngineLevel::Hessian);
        assert!(plan[1].restart);
    }

    #[test]
    fn test_plan_reads_cover_quantities_in_order() {
        for order in [
            DerivativeOrder::EnergyOnly,
            DerivativeOrder::EnergyAndGradient,
            DerivativeOrder::EnergyGradientAndHessian,
        ] {
            let reads: Vec<Quantity> = order
                .plan(false)
                .iter()
                .flat_map(|step| step.reads.iter().copied())
                .collect();
            assert_eq!(reads, order.quantities());
            assert!(reads.iter().all(|q| q.order() <= order.index()));
        }
    }

    #[test]
    fn test_level_flags() {
        assert_eq!(EngineLevel::SinglePoint.flag(), "--sp");
        assert_eq!(EngineLevel::Gradient.flag(), "--grad");
        assert_eq!(EngineLevel::Hessian.flag(), "--hess");
    }
}

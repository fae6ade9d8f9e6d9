//! # Gaussian External 调用实现
//!
//! ## 功能
//! - 解析请求名与配置
//! - 定位 xtb、准备 scratch 目录
//! - 运行组装流程并写出 `.EOu`
//! - 打印结果汇总表
//!
//! ## 依赖关系
//! - 使用 `cli/mod.rs` 定义的参数
//! - 使用 `workflow/`, `engine/`, `utils/output.rs`

use crate::cli::Cli;
use crate::engine::{EngineConfig, XtbRunner};
use crate::error::Result;
use crate::models::{DerivativeData, Quantity};
use crate::utils::output;
use crate::workflow::{Assembler, Assembly, RunContext};

use tabled::{Table, Tabled};

/// 汇总表行
#[derive(Debug, Clone, Tabled)]
struct BlockRow {
    #[tabled(rename = "Order")]
    order: usize,
    #[tabled(rename = "Quantity")]
    quantity: String,
    #[tabled(rename = "Values")]
    values: usize,
    #[tabled(rename = "Max |x|")]
    max_abs: String,
}

/// 执行一次 Gaussian External 调用
pub fn execute(cli: Cli) -> Result<()> {
    output::set_quiet(cli.quiet);
    output::print_header("Gaussian External -> xtb");

    let name = cli.request_name()?;
    let config = EngineConfig {
        executable: cli.xtb.clone(),
        keywords: cli.keywords.clone(),
        timeout: cli.timeout_duration()?,
    };
    let runner = XtbRunner::new(&config)?;

    if cli.keep_scratch && cli.scratch.is_some() {
        output::print_warning("--keep-scratch has no effect when --scratch is given");
    }

    let ctx = RunContext::new(&name, cli.scratch.clone(), cli.log.clone(), cli.keep_scratch)?;
    output::print_info(&format!("Request: {}", ctx.request_path.display()));
    output::print_info(&format!(
        "Scratch: {}{}",
        ctx.scratch_dir.display(),
        if ctx.is_ephemeral() { " (temporary)" } else { "" }
    ));

    let assembly = Assembler::new(&ctx, &runner)
        .single_point_energy(cli.sp_energy)
        .run()?;

    print_summary(&assembly);

    output::print_separator();
    output::print_done(&format!(
        "Wrote {} ({}, {} blocks)",
        ctx.response_path.display(),
        assembly.request.order,
        assembly.blocks.block_count()
    ));

    Ok(())
}

/// 打印结果汇总
fn print_summary(assembly: &Assembly) {
    let rows: Vec<BlockRow> = assembly
        .outputs
        .iter()
        .map(|data| BlockRow {
            order: data.quantity().order(),
            quantity: data.quantity().to_string(),
            values: data.value_count(),
            max_abs: format!("{:.6E}", data.max_abs()),
        })
        .collect();

    if let Some(DerivativeData::Energy(e)) = assembly.outputs.get(Quantity::Energy) {
        output::print_success(&format!("E(xtb) = {:.10} Eh", e));
    }

    let table = Table::new(&rows);
    output::print_block(&table.to_string());
}

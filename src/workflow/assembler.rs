//! # 结果组装器
//!
//! 按 `DerivativeOrder::plan` 依次调用 xtb；每次调用结束后立即读取、
//! 解析并编码该步负责的物理量，最后按阶数升序写出 `.EOu`。
//!
//! 任一步失败都会中止整个调用，且不会留下 `.EOu`。
//!
//! ## 依赖关系
//! - 被 `commands/external.rs` 调用
//! - 使用 `parsers/{ein,xyz,xtb,eou}`, `engine/`, `workflow/context.rs`

use super::context::RunContext;
use crate::engine::{Invocation, XtbRunner};
use crate::error::{GauXtbError, Result};
use crate::models::{DerivativeOutputs, EncodedBlocks, EngineStep, Request};
use crate::parsers::{ein, eou, xtb, xyz};
use crate::utils::output;

use std::fs;
use std::path::Path;

/// 一次调用的全部产物
#[derive(Debug)]
pub struct Assembly {
    pub request: Request,
    pub outputs: DerivativeOutputs,
    pub blocks: EncodedBlocks,
}

/// 结果组装器
pub struct Assembler<'a> {
    ctx: &'a RunContext,
    runner: &'a XtbRunner,
    single_point_energy: bool,
}

impl<'a> Assembler<'a> {
    pub fn new(ctx: &'a RunContext, runner: &'a XtbRunner) -> Self {
        Assembler {
            ctx,
            runner,
            single_point_energy: false,
        }
    }

    /// 仅能量请求时用 `--sp` 代替 `--grad`
    pub fn single_point_energy(mut self, enabled: bool) -> Self {
        self.single_point_energy = enabled;
        self
    }

    /// 执行完整流程
    pub fn run(&self) -> Result<Assembly> {
        // 旧的响应文件会被 Gaussian 误读，先删除
        remove_if_exists(&self.ctx.response_path)?;

        let request = ein::read_request(&self.ctx.request_path)?;
        output::print_info(&format!(
            "{} atoms, charge {}, multiplicity {}, nderiv {} ({})",
            request.atom_count(),
            request.charge,
            request.multiplicity,
            request.order.index(),
            request.order
        ));
        if request.atoms.iter().any(|a| a.mm_charge.is_some_and(|q| q != 0.0)) {
            output::print_warning("Non-zero MM charges in the request are ignored by xtb");
        }

        let geometry = self.ctx.geometry_path();
        xyz::write_xyz(&request, &geometry)?;

        let mut outputs = DerivativeOutputs::default();
        let mut blocks = EncodedBlocks::default();

        for step in request.order.plan(self.single_point_energy) {
            self.run_step(&request, &step, &geometry)?;

            for &quantity in step.reads {
                let data = xtb::read_quantity(
                    &self.ctx.result_path(quantity),
                    quantity,
                    request.atom_count(),
                )?;
                blocks.insert(quantity, eou::encode(&data));
                outputs.insert(data);
            }
        }

        let text = eou::assemble_response(&blocks, request.order)?;
        eou::write_response(&self.ctx.response_path, &text)?;

        Ok(Assembly {
            request,
            outputs,
            blocks,
        })
    }

    fn run_step(&self, request: &Request, step: &EngineStep, geometry: &Path) -> Result<()> {
        // 防止读到上一次运行留下的结果
        for &quantity in step.reads {
            remove_if_exists(&self.ctx.result_path(quantity))?;
        }

        let inv = Invocation {
            geometry,
            charge: request.charge,
            unpaired_electrons: request.unpaired_electrons(),
            level: step.level,
            restart: step.restart,
        };
        output::print_info(&format!("Running: {}", self.runner.command_line(&inv)));
        self.runner.run(&inv, &self.ctx.scratch_dir, &self.ctx.log_path)
    }
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(GauXtbError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        }),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::models::{DerivativeData, Quantity};

    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    // 避免并发写脚本与 fork 导致 ETXTBSY
    static SPAWN_LOCK: Mutex<()> = Mutex::new(());

    const FAKE_XTB: &str = r#"#!/bin/sh
echo "$@" >> calls.txt
case " $* " in
  *" --hess "*)
    printf '$hessian\n 1.0 0.1 0.2\n 0.1 2.0 0.3\n 0.2 0.3 3.0\n$end\n' > hessian ;;
  *)
    printf '$energy\n     1    -1.05000000000    -1.05000000000    -1.05000000000\n$end\n' > energy
    printf '$grad\n  cycle =      1    SCF energy =    -1.05000000000   |dE/dxyz| =  0.001\n    0.0 0.0 0.0   o\n   1.0E-03 -2.0E-03 3.0E-03\n$end\n' > gradient ;;
esac
echo "normal termination of xtb"
"#;

    struct Fixture {
        dir: TempDir,
        ctx: RunContext,
        runner: XtbRunner,
    }

    impl Fixture {
        fn new(ein: &str, script: &str, timeout: Option<Duration>) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let engine = dir.path().join("fake-xtb");
            {
                let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
                fs::write(&engine, script).unwrap();
                fs::set_permissions(&engine, fs::Permissions::from_mode(0o755)).unwrap();
            }

            fs::write(dir.path().join("Gau-7.EIn"), ein).unwrap();

            let ctx = RunContext::new(
                &dir.path().join("Gau-7"),
                Some(dir.path().join("scratch")),
                None,
                false,
            )
            .unwrap();
            let runner = XtbRunner::new(&EngineConfig {
                executable: engine.display().to_string(),
                keywords: String::new(),
                timeout,
            })
            .unwrap();

            Fixture { dir, ctx, runner }
        }

        fn run(&self) -> Result<Assembly> {
            let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            Assembler::new(&self.ctx, &self.runner).run()
        }

        fn calls(&self) -> Vec<String> {
            fs::read_to_string(self.ctx.scratch_dir.join("calls.txt"))
                .map(|s| s.lines().map(str::to_string).collect())
                .unwrap_or_default()
        }

        fn response(&self) -> PathBuf {
            self.dir.path().join("Gau-7.EOu")
        }
    }

    #[test]
    fn test_energy_request_end_to_end() {
        let fx = Fixture::new("2 0 0 1\n1 0.0 0.0 0.0\n1 0.0 0.0 1.4\n", FAKE_XTB, None);
        let assembly = fx.run().unwrap();

        let text = fs::read_to_string(fx.response()).unwrap();
        assert_eq!(
            text,
            " -1.050000000000E+00  0.000000000000E+00  0.000000000000E+00  0.000000000000E+00"
        );
        assert!(!fx.ctx.request_path.exists());
        assert_eq!(assembly.blocks.block_count(), 1);
        assert_eq!(
            assembly.outputs.get(Quantity::Energy),
            Some(&DerivativeData::Energy(-1.05))
        );

        let calls = fx.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].ends_with("gau_xtb.xyz --chrg 0 --uhf 0 --grad --norestart"));

        let log = fs::read_to_string(&fx.ctx.log_path).unwrap();
        assert!(log.contains("normal termination"));

        let xyz = fs::read_to_string(fx.ctx.geometry_path()).unwrap();
        assert!(xyz.starts_with("2\n"));
    }

    #[test]
    fn test_hessian_request_end_to_end() {
        let fx = Fixture::new("1 2 0 1\n8 0.0 0.0 0.0\n", FAKE_XTB, None);
        fx.run().unwrap();

        let text = fs::read_to_string(fx.response()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // 1 能量 + 1 梯度 + 5 零行 + 2 下三角
        assert_eq!(lines.len(), 9);

        let fields = |line: &str| -> Vec<f64> {
            line.split_whitespace().map(|s| s.parse().unwrap()).collect()
        };
        assert_eq!(fields(lines[0]), vec![-1.05, 0.0, 0.0, 0.0]);
        assert_eq!(fields(lines[1]), vec![1.0e-3, -2.0e-3, 3.0e-3]);
        for line in &lines[2..7] {
            assert_eq!(fields(line), vec![0.0, 0.0, 0.0]);
        }
        assert_eq!(fields(lines[7]), vec![1.0, 0.1, 2.0]);
        assert_eq!(fields(lines[8]), vec![0.2, 0.3, 3.0]);

        let calls = fx.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].ends_with("--grad --norestart"));
        assert!(calls[1].ends_with("--hess --restart"));
    }

    #[test]
    fn test_gradient_request_with_spin() {
        let fx = Fixture::new("1 1 1 2\n8 0.0 0.0 0.0\n", FAKE_XTB, None);
        let assembly = fx.run().unwrap();
        assert_eq!(assembly.blocks.block_count(), 2);
        assert!(assembly.blocks.get(Quantity::Hessian).is_none());

        let calls = fx.calls();
        assert!(calls[0].contains("--chrg 1 --uhf 1 --grad"));

        let text = fs::read_to_string(fx.response()).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_engine_failure_leaves_no_response() {
        let fx = Fixture::new(
            "1 1 0 1\n8 0.0 0.0 0.0\n",
            "#!/bin/sh\necho boom >&2\nexit 3\n",
            None,
        );
        let err = fx.run().unwrap_err();
        assert!(err.is_engine_error());
        assert!(!fx.response().exists());

        let log = fs::read_to_string(&fx.ctx.log_path).unwrap();
        assert!(log.contains("boom"));
    }

    #[test]
    fn test_engine_timeout() {
        let fx = Fixture::new(
            "1 0 0 1\n8 0.0 0.0 0.0\n",
            "#!/bin/sh\nexec sleep 5\n",
            Some(Duration::from_millis(200)),
        );
        let err = fx.run().unwrap_err();
        assert!(matches!(err, GauXtbError::CommandTimeout { .. }));
        assert!(!fx.response().exists());
    }

    #[test]
    fn test_malformed_request_never_runs_engine() {
        let fx = Fixture::new("2 0 0\n1 0 0 0\n1 0 0 1.4\n", FAKE_XTB, None);
        fs::write(fx.response(), "stale").unwrap();

        let err = fx.run().unwrap_err();
        assert!(err.is_format_error());
        assert!(!fx.response().exists());
        assert!(fx.ctx.request_path.exists());
        assert!(fx.calls().is_empty());
    }

    #[test]
    fn test_relative_scratch_dir_runs_engine() {
        let dir = tempfile::tempdir_in(".").unwrap();
        let rel = dir.path().strip_prefix(".").unwrap_or(dir.path()).to_path_buf();

        let engine = dir.path().join("fake-xtb");
        let script = FAKE_XTB.replacen(
            "#!/bin/sh\n",
            "#!/bin/sh\n[ -f \"$1\" ] || { echo \"no geometry at $1\"; exit 1; }\n",
            1,
        );
        {
            let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
            fs::write(&engine, script).unwrap();
            fs::set_permissions(&engine, fs::Permissions::from_mode(0o755)).unwrap();
        }
        fs::write(rel.join("Gau-9.EIn"), "1 0 0 1\n8 0.0 0.0 0.0\n").unwrap();

        let ctx = RunContext::new(&rel.join("Gau-9"), Some(rel.join("scr")), None, false).unwrap();
        let runner = XtbRunner::new(&EngineConfig {
            executable: fs::canonicalize(&engine).unwrap().display().to_string(),
            keywords: String::new(),
            timeout: None,
        })
        .unwrap();

        let _guard = SPAWN_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        Assembler::new(&ctx, &runner).run().unwrap();
        assert!(rel.join("Gau-9.EOu").exists());
    }

    #[test]
    fn test_stale_results_are_not_reused() {
        let fx = Fixture::new("1 0 0 1\n8 0.0 0.0 0.0\n", "#!/bin/sh\nexit 0\n", None);
        fs::write(
            fx.ctx.result_path(Quantity::Energy),
            "$energy\n  1  -99.0  -99.0  -99.0\n$end\n",
        )
        .unwrap();

        assert!(fx.run().is_err());
        assert!(!fx.response().exists());
    }
}

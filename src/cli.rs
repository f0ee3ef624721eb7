use anyhow::Context;
use monty_hall::*;
use std::io::{self, BufRead, Write};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // 日志输出到 stderr，避免干扰 stdout 上的交互
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let stdin = io::stdin();
    let stdout = io::stdout();

    // 运行模式：1 表示亲自玩一轮，2 表示进行蒙特卡洛试验
    let mode = match std::env::args().nth(1) {
        Some(mode) => mode,
        None => {
            print!("请选择运行模式，1: 亲自玩，2: 试验: ");
            stdout.lock().flush()?;
            let mut line = String::new();
            stdin.lock().read_line(&mut line)?;
            line
        }
    };

    let mode = match mode.parse::<Mode>() {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("用法: monty-hall [1|interactive|2|experiment]");
            std::process::exit(2);
        }
    };

    match mode {
        Mode::Interactive => {
            interactive::play(stdin.lock(), stdout.lock(), &mut rand::thread_rng())?;
        }
        Mode::Experiment => {
            let settings = Settings::from_env().context("failed to read settings")?;

            // 每种策略各进行 trials 轮游戏
            let results = Experiment::new(settings)?.run()?;
            report::print_summary(&results, stdout.lock())?;

            // 导出平均收益曲线，供外部绘图
            if let Some(path) = &results.settings().report {
                report::write_json(&results, path)
                    .with_context(|| format!("failed to export {}", path.display()))?;
                println!("平均收益曲线已导出到 {}", path.display());
            }
        }
    }

    Ok(())
}

//! 输出试验结果：各策略平均收益、平均收益曲线的检查点，以及供外部绘图用的 JSON。

use crate::error::*;
use crate::experiment::{ExperimentReport, Strategy};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// 检查点数量（不含最后一轮）
const CHECKPOINTS: usize = 10;

/// 打印三种策略的平均收益和平均收益曲线的检查点
pub fn print_summary<W: Write>(report: &ExperimentReport, mut output: W) -> Result<()> {
    let settings = report.settings();
    writeln!(
        output,
        "试验设置: 每种策略进行 {} 轮游戏，第一次总是选择 {} 号门；",
        settings.trials, settings.first_pick
    )?;

    for strategy in report.strategies() {
        let tally = strategy.tally();
        writeln!(
            output,
            "\"{}\" 平均收益: {:.4}（赢得奖品 {} 轮，改变选择 {} 轮，坚持选择 {} 轮）",
            strategy.strategy(),
            strategy.average(),
            tally.win(),
            tally.switch(),
            tally.stay()
        )?;
    }

    let curves: Vec<Vec<f64>> = report
        .strategies()
        .iter()
        .map(|s| s.running_average())
        .collect();

    writeln!(output)?;
    write!(output, "{:>8}", "轮数")?;
    for strategy in report.strategies() {
        write!(output, "{:>18}", strategy.strategy().name())?;
    }
    writeln!(output)?;

    for index in checkpoints(settings.trials as usize) {
        write!(output, "{:>8}", index + 1)?;
        for curve in &curves {
            write!(output, "{:>18.4}", curve[index])?;
        }
        writeln!(output)?;
    }
    Ok(())
}

// 平均收益曲线上均匀分布的下标，总是包含最后一轮
fn checkpoints(trials: usize) -> Vec<usize> {
    if trials == 0 {
        return vec![];
    }
    let step = (trials / CHECKPOINTS).max(1);
    let mut indices: Vec<usize> = (step - 1..trials).step_by(step).collect();
    if indices.last() != Some(&(trials - 1)) {
        indices.push(trials - 1);
    }
    indices
}

#[derive(Debug, Serialize)]
struct Curve<'a> {
    strategy: Strategy,
    name: &'a str,
    average: f64,
    running_average: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct Export<'a> {
    trials: u32,
    first_pick: u32,
    curves: Vec<Curve<'a>>,
}

/// 将平均收益曲线以 JSON 写入 `writer`
pub fn to_json<W: Write>(report: &ExperimentReport, writer: W) -> Result<()> {
    let export = Export {
        trials: report.settings().trials,
        first_pick: report.settings().first_pick,
        curves: report
            .strategies()
            .iter()
            .map(|s| Curve {
                strategy: s.strategy(),
                name: s.strategy().name(),
                average: s.average(),
                running_average: s.running_average(),
            })
            .collect(),
    };
    serde_json::to_writer_pretty(writer, &export)?;
    Ok(())
}

/// 将平均收益曲线导出到文件
pub fn write_json(report: &ExperimentReport, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    to_json(report, &mut writer)?;
    writer.flush()?;
    info!(path = %path.display(), "running averages exported");
    Ok(())
}

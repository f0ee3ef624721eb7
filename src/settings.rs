use crate::error::*;
use crate::DOORS;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// 试验设置
#[derive(Debug, Serialize, Deserialize, Clone, Eq, PartialEq)]
pub struct Settings {
    /// 每种策略的试验次数
    pub trials: u32,

    /// 每次试验挑战者第一次选择的门序号
    pub first_pick: u32,

    /// 随机数种子，为空时每次运行结果不同
    pub seed: Option<u64>,

    /// 平均收益曲线导出的 JSON 文件路径
    pub report: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            trials: 2000,
            first_pick: 0,
            seed: None,
            report: None,
        }
    }
}

impl Settings {
    pub fn new(trials: u32, first_pick: u32) -> Self {
        Self {
            trials,
            first_pick,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// 在默认设置上读取 `MONTY_TRIALS`、`MONTY_FIRST_PICK`、`MONTY_SEED`、`MONTY_REPORT` 环境变量
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();
        if let Some(trials) = parse_var(&lookup, "MONTY_TRIALS")? {
            settings.trials = trials;
        }
        if let Some(first_pick) = parse_var(&lookup, "MONTY_FIRST_PICK")? {
            settings.first_pick = first_pick;
        }
        settings.seed = parse_var(&lookup, "MONTY_SEED")?;
        settings.report = lookup("MONTY_REPORT")
            .filter(|path| !path.is_empty())
            .map(PathBuf::from);
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(Error::InvalidSettings("trials must be positive".into()));
        }
        if !DOORS.contains(&self.first_pick) {
            return Err(Error::InvalidSettings(format!(
                "first pick {} is not one of {:?}",
                self.first_pick, DOORS
            )));
        }
        Ok(())
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidSettings(format!("{key}={value:?} is malformed"))),
    }
}

/// 运行模式
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq)]
pub enum Mode {
    /// 挑战者亲自玩一轮
    Interactive,

    /// 蒙特卡洛试验比较三种策略
    Experiment,
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" | "interactive" => Ok(Mode::Interactive),
            "2" | "experiment" => Ok(Mode::Experiment),
            other => Err(Error::InvalidMode(other.to_string())),
        }
    }
}

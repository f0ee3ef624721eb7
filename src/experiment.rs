use crate::error::*;
use crate::settings::Settings;
use crate::{Decision, Game, RoundResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info};

/// 挑战者的抉择策略
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Strategy {
    /// 始终坚持选择
    AlwaysStay,

    /// 始终改变选择
    AlwaysSwitch,

    /// 每轮随机决定
    Random,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::AlwaysStay, Strategy::AlwaysSwitch, Strategy::Random];

    /// 按策略做出抉择
    pub fn decide<R: Rng + ?Sized>(&self, rng: &mut R) -> Decision {
        match self {
            Strategy::AlwaysStay => Decision::Stay,
            Strategy::AlwaysSwitch => Decision::Switch,
            Strategy::Random => rng.gen(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::AlwaysStay => "never switch",
            Strategy::AlwaysSwitch => "always switch",
            Strategy::Random => "randomly decide",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 按抉择分类统计的结果
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, Eq, PartialEq)]
pub struct Tally {
    /// 总轮数
    rounds: u32,
    /// 赢的轮数
    win: u32,
    /// 选择时就选了正确选项
    chosen_win: u32,
    /// 主持人留下的是正确选项
    left_win: u32,
    /// 改变选择的次数
    switch: u32,
    /// 坚持选择的次数
    stay: u32,
    /// 改变选择后赢的次数
    switch_win: u32,
    /// 坚持选择后赢的次数
    stay_win: u32,
}

impl Tally {
    pub fn calculate<R>(results: R) -> Self
    where
        R: AsRef<[RoundResult]>,
    {
        let mut tally = Tally::default();
        for result in results.as_ref() {
            tally.record(result);
        }
        tally
    }

    /// 计入一轮结果
    pub fn record(&mut self, result: &RoundResult) {
        self.rounds += 1;

        if result.chosen() == result.car() {
            self.chosen_win += 1;
        }

        if result.left() == result.car() {
            self.left_win += 1;
        }

        match result.decision() {
            Decision::Switch => {
                self.switch += 1;
                if result.win() {
                    self.win += 1;
                    self.switch_win += 1;
                }
            }
            Decision::Stay => {
                self.stay += 1;
                if result.win() {
                    self.win += 1;
                    self.stay_win += 1;
                }
            }
        }
    }

    /// 总轮数
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// 赢的轮数
    pub fn win(&self) -> u32 {
        self.win
    }

    /// 选择时就选了正确选项
    pub fn chosen_win(&self) -> u32 {
        self.chosen_win
    }

    /// 主持人留下的是正确选项
    pub fn left_win(&self) -> u32 {
        self.left_win
    }

    /// 改变选择的次数
    pub fn switch(&self) -> u32 {
        self.switch
    }

    /// 坚持选择的次数
    pub fn stay(&self) -> u32 {
        self.stay
    }

    /// 改变选择后赢的次数
    pub fn switch_win(&self) -> u32 {
        self.switch_win
    }

    /// 坚持选择后赢的次数
    pub fn stay_win(&self) -> u32 {
        self.stay_win
    }
}

/// 一种策略的试验结果
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StrategyReport {
    strategy: Strategy,
    /// 每轮得分，赢为 1，输为 0
    outcomes: Vec<u8>,
    tally: Tally,
}

impl StrategyReport {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn outcomes(&self) -> &[u8] {
        &self.outcomes
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    /// 平均收益
    pub fn average(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.tally.win() as f64 / self.outcomes.len() as f64
    }

    /// 平均收益随试验次数变化的曲线
    pub fn running_average(&self) -> Vec<f64> {
        running_average(&self.outcomes)
    }
}

/// 三种策略的试验结果，顺序为坚持、改变、随机
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExperimentReport {
    settings: Settings,
    strategies: Vec<StrategyReport>,
}

impl ExperimentReport {
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn strategies(&self) -> &[StrategyReport] {
        &self.strategies
    }

    pub fn strategy(&self, strategy: Strategy) -> Option<&StrategyReport> {
        self.strategies.iter().find(|r| r.strategy == strategy)
    }
}

/// 蒙特卡洛试验：每种策略独立进行若干轮游戏
#[derive(Debug)]
pub struct Experiment {
    settings: Settings,
    rng: StdRng,
}

impl Experiment {
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { settings, rng })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// 依次试验全部策略
    pub fn run(&mut self) -> Result<ExperimentReport> {
        let strategies = Strategy::ALL
            .iter()
            .map(|strategy| self.run_strategy(*strategy))
            .collect::<Result<Vec<_>>>()?;
        Ok(ExperimentReport {
            settings: self.settings.clone(),
            strategies,
        })
    }

    /// 按一种策略进行 `trials` 轮游戏
    pub fn run_strategy(&mut self, strategy: Strategy) -> Result<StrategyReport> {
        let trials = self.settings.trials;
        let mut outcomes = Vec::with_capacity(trials as usize);
        let mut tally = Tally::default();

        for round in 0..trials {
            let mut game = Game::new_with(&mut self.rng);
            game.first_choice_with(self.settings.first_pick, &mut self.rng)?;
            let decision = strategy.decide(&mut self.rng);
            let result = game.decide(decision)?;
            debug!(%strategy, round, win = result.win(), "trial");

            outcomes.push(result.outcome());
            tally.record(&result);
        }

        let report = StrategyReport {
            strategy,
            outcomes,
            tally,
        };
        info!(%strategy, trials, average = report.average(), "strategy finished");
        Ok(report)
    }
}

/// 前缀平均：第 i 项为前 i + 1 轮得分的平均值
pub fn running_average(outcomes: &[u8]) -> Vec<f64> {
    outcomes
        .iter()
        .enumerate()
        .scan(0u64, |sum, (i, outcome)| {
            *sum += u64::from(*outcome);
            Some(*sum as f64 / (i + 1) as f64)
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    fn experiment(seed: u64) -> Experiment {
        Experiment::new(Settings::new(2000, 0).with_seed(seed)).unwrap()
    }

    #[test]
    fn running_average_is_prefix_mean() {
        assert_eq!(running_average(&[]), Vec::<f64>::new());
        assert_eq!(running_average(&[1, 0, 0, 1]), vec![1.0, 0.5, 1.0 / 3.0, 0.5]);
    }

    #[test]
    fn strategies_converge() {
        let report = experiment(2024).run().unwrap();
        let strategies: Vec<_> = report.strategies().iter().map(|r| r.strategy()).collect();
        assert_eq!(strategies, Strategy::ALL);

        let average = |s| report.strategy(s).unwrap().average();
        let stay = average(Strategy::AlwaysStay);
        let switch = average(Strategy::AlwaysSwitch);
        let random = average(Strategy::Random);
        assert!((0.30..=0.36).contains(&stay), "stay = {stay}");
        assert!((0.64..=0.70).contains(&switch), "switch = {switch}");
        assert!((0.44..=0.56).contains(&random), "random = {random}");
    }

    #[test]
    fn running_average_shape() {
        let report = experiment(99).run_strategy(Strategy::Random).unwrap();
        let curve = report.running_average();
        assert_eq!(curve.len(), 2000);
        assert!(curve.iter().all(|v| (0.0..=1.0).contains(v)));

        let mut sum = 0u32;
        for (i, outcome) in report.outcomes().iter().enumerate() {
            sum += u32::from(*outcome);
            assert!((curve[i] - sum as f64 / (i + 1) as f64).abs() < 1e-12);
        }
        assert!((curve[1999] - report.average()).abs() < 1e-12);
    }

    #[test]
    fn tally_matches_decisions() {
        let stay = experiment(5).run_strategy(Strategy::AlwaysStay).unwrap();
        let tally = stay.tally();
        assert_eq!(tally.rounds(), 2000);
        assert_eq!(tally.stay(), 2000);
        assert_eq!(tally.switch(), 0);
        assert_eq!(tally.stay_win(), tally.chosen_win());
        assert_eq!(tally.chosen_win() + tally.left_win(), 2000);

        let random = experiment(6).run_strategy(Strategy::Random).unwrap();
        let tally = random.tally();
        assert_eq!(tally.stay() + tally.switch(), 2000);
        assert_eq!(tally.win(), tally.stay_win() + tally.switch_win());
        assert!(tally.switch() > 0 && tally.stay() > 0);
    }

    #[test]
    fn tally_from_results() {
        let results: Vec<RoundResult> = [Decision::Stay, Decision::Switch, Decision::Switch]
            .into_iter()
            .map(|decision| {
                let mut game = Game::with_car(1).unwrap();
                game.first_choice(0).unwrap();
                game.decide(decision).unwrap()
            })
            .collect();
        let tally = Tally::calculate(&results);
        assert_eq!(tally.rounds(), 3);
        assert_eq!(tally.win(), 2);
        assert_eq!(tally.switch_win(), 2);
        assert_eq!(tally.stay_win(), 0);
        assert_eq!(tally.left_win(), 3);
    }

    #[test]
    fn seeded_runs_repeat() {
        let a = experiment(1).run_strategy(Strategy::Random).unwrap();
        let b = experiment(1).run_strategy(Strategy::Random).unwrap();
        assert_eq!(a.outcomes(), b.outcomes());
    }

    #[test]
    fn rejects_zero_trials() {
        assert!(matches!(
            Experiment::new(Settings::new(0, 0)),
            Err(Error::InvalidSettings(_))
        ));
    }
}

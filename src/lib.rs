mod error;
pub mod experiment;
pub mod interactive;
pub mod report;
pub mod settings;

pub use error::*;
pub use experiment::{running_average, Experiment, ExperimentReport, Strategy, StrategyReport, Tally};
pub use settings::{Mode, Settings};

use rand::distributions::Standard;
use rand::prelude::Distribution;
use rand::seq::IteratorRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 门的序号
pub const DOORS: [u32; 3] = [0, 1, 2];

/// 门后的奖品
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq)]
pub enum Prize {
    /// 汽车
    Car,

    /// 山羊
    Goat,
}

/// 一轮游戏的各个阶段
#[derive(Debug, Serialize, Deserialize, Copy, Clone)]
pub enum Stage {
    /// 挑战者选择
    Choose,

    /// 挑战者抉择
    Decide {
        /// 挑战者已经选择的门序号
        chosen: u32,

        /// 主持人打开的门序号
        opened: u32,
    },

    /// 游戏结束
    End { result: RoundResult },
}

impl Default for Stage {
    fn default() -> Self {
        Self::Choose
    }
}

impl Stage {
    pub fn is_end(&self) -> bool {
        matches!(self, Stage::End { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Choose => "Choose",
            Stage::Decide { .. } => "Decide",
            Stage::End { .. } => "End",
        }
    }
}

/// 一轮游戏的结果
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq)]
pub struct RoundResult {
    /// 奖品所在门序号
    car: u32,

    /// 挑战者选择门序号
    chosen: u32,

    /// 主持人打开的门序号
    opened: u32,

    /// 主持人揭示后剩下的门序号
    left: u32,

    /// 挑战者的抉择
    decision: Decision,

    /// 是否赢的奖品
    win: bool,
}

impl RoundResult {
    /// 奖品所在门序号
    pub fn car(&self) -> u32 {
        self.car
    }

    /// 挑战者选择门序号
    pub fn chosen(&self) -> u32 {
        self.chosen
    }

    /// 主持人打开的门序号
    pub fn opened(&self) -> u32 {
        self.opened
    }

    /// 主持人揭示后剩下的门序号
    pub fn left(&self) -> u32 {
        self.left
    }

    /// 挑战者的抉择
    pub fn decision(&self) -> Decision {
        self.decision
    }

    /// 是否赢的奖品
    pub fn win(&self) -> bool {
        self.win
    }

    /// 最终打开的门序号
    pub fn final_door(&self) -> u32 {
        match self.decision {
            Decision::Stay => self.chosen,
            Decision::Switch => self.left,
        }
    }

    /// 赢得奖品记 1 分，否则记 0 分
    pub fn outcome(&self) -> u8 {
        u8::from(self.win)
    }
}

/// 挑战者抉择
#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq)]
pub enum Decision {
    /// 改变选择
    Switch,

    /// 坚持选择
    Stay,
}

impl Default for Decision {
    fn default() -> Self {
        Self::Switch
    }
}

impl From<bool> for Decision {
    fn from(switch: bool) -> Self {
        if switch {
            Decision::Switch
        } else {
            Decision::Stay
        }
    }
}

impl Distribution<Decision> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Decision {
        Decision::from(rng.gen::<bool>())
    }
}

/// 一轮游戏，每次试验新建一个，结束后丢弃
#[derive(Debug, Serialize, Deserialize)]
pub struct Game {
    /// 奖品所在门序号，其余两扇门后都是山羊
    car: u32,

    /// 尚未被主持人打开的门
    remaining: Vec<u32>,

    /// 当前阶段
    stage: Stage,
}

impl Game {
    /// 创建游戏并将奖品随机放到一个门内
    pub fn new() -> Self {
        Self::new_with(&mut rand::thread_rng())
    }

    /// 使用给定的随机数生成器放置奖品
    pub fn new_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let car = DOORS[rng.gen_range(0..DOORS.len())];
        Self::create(car)
    }

    /// 创建游戏并将奖品放到序号指定的门内
    pub fn with_car(car: u32) -> Result<Self> {
        check_door(car)?;
        Ok(Self::create(car))
    }

    fn create(car: u32) -> Self {
        Self {
            car,
            remaining: DOORS.to_vec(),
            stage: Stage::Choose,
        }
    }

    /// 全部门序号
    pub fn doors(&self) -> &'static [u32] {
        &DOORS
    }

    /// 尚未被打开的门序号
    pub fn remaining_doors(&self) -> &[u32] {
        &self.remaining
    }

    /// 门后的奖品
    pub fn prize(&self, door: u32) -> Result<Prize> {
        check_door(door)?;
        Ok(if door == self.car {
            Prize::Car
        } else {
            Prize::Goat
        })
    }

    /// 三扇门的奖品分布
    pub fn assignment(&self) -> [Prize; 3] {
        DOORS.map(|door| {
            if door == self.car {
                Prize::Car
            } else {
                Prize::Goat
            }
        })
    }

    /// 当前阶段
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn chosen_door(&self) -> Option<u32> {
        match self.stage {
            Stage::Choose => None,
            Stage::Decide { chosen, .. } => Some(chosen),
            Stage::End { result } => Some(result.chosen),
        }
    }

    pub fn opened_door(&self) -> Option<u32> {
        match self.stage {
            Stage::Choose => None,
            Stage::Decide { opened, .. } => Some(opened),
            Stage::End { result } => Some(result.opened),
        }
    }

    /// 本轮结果，未结束时为 `None`
    pub fn result(&self) -> Option<RoundResult> {
        match self.stage {
            Stage::End { result } => Some(result),
            _ => None,
        }
    }

    /// 挑战者第一次选择，主持人随即打开剩下两扇门中的一扇山羊门
    pub fn first_choice(&mut self, door: u32) -> Result<u32> {
        self.first_choice_with(door, &mut rand::thread_rng())
    }

    /// 同 [`Game::first_choice`]，挑战者选中汽车时使用给定的随机数生成器决定打开哪扇门
    pub fn first_choice_with<R: Rng + ?Sized>(&mut self, door: u32, rng: &mut R) -> Result<u32> {
        check_door(door)?;

        match self.stage {
            Stage::Choose => {
                // 1. 不可能打开挑战者已经选择的那个门；
                // 2. 不可能打开奖品所在的门
                let opened = random_door(&[door, self.car], rng).ok_or(Error::Impossible)?;
                self.remaining.retain(|d| *d != opened);
                self.stage = Stage::Decide {
                    chosen: door,
                    opened,
                };
                debug!(chosen = door, opened, "first choice");
                Ok(opened)
            }
            _ => Err(self.out_of_sequence("first_choice")),
        }
    }

    /// 挑战者做出最终抉择，赢得奖品返回 1，否则返回 0
    pub fn final_choice(&mut self, switch: bool) -> Result<u8> {
        self.decide(Decision::from(switch))
            .map(|result| result.outcome())
    }

    /// 挑战者做出最终抉择并输出本轮结果
    pub fn decide(&mut self, decision: Decision) -> Result<RoundResult> {
        let (chosen, opened) = match self.stage {
            Stage::Decide { chosen, opened } => (chosen, opened),
            _ => return Err(self.out_of_sequence("final_choice")),
        };

        let left = self
            .remaining
            .iter()
            .copied()
            .find(|d| *d != chosen)
            .ok_or(Error::Impossible)?;

        let car = self.car;
        let win = matches!((chosen, left, decision), (p, _, Decision::Stay) | (_, p, Decision::Switch) if p == car);
        let result = RoundResult {
            car,
            chosen,
            opened,
            left,
            decision,
            win,
        };

        self.stage = Stage::End { result };
        debug!(?decision, win, "final choice");
        Ok(result)
    }

    fn out_of_sequence(&self, operation: &'static str) -> Error {
        Error::Sequence {
            operation,
            stage: self.stage.name(),
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn check_door(door: u32) -> Result<()> {
    if DOORS.contains(&door) {
        Ok(())
    } else {
        Err(Error::InvalidDoor(door))
    }
}

// 在 DOORS 中随机选取 excluded 之外的门
fn random_door<R: Rng + ?Sized>(excluded: &[u32], rng: &mut R) -> Option<u32> {
    DOORS
        .iter()
        .copied()
        .filter(|door| !excluded.contains(door))
        .choose(rng)
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn random_door_() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100000 {
            let exclusive = rng.gen_range(0..3);
            let door = random_door(&[exclusive], &mut rng).unwrap();
            assert_ne!(door, exclusive);
            assert!(DOORS.contains(&door));
        }
    }

    #[test]
    fn random_door_covers_both_candidates() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; 3];
        for _ in 0..1000 {
            seen[random_door(&[1, 1], &mut rng).unwrap() as usize] = true;
        }
        assert_eq!(seen, [true, false, true]);
    }

    #[test]
    fn fixed_assignment_scenario() {
        let mut game = Game::with_car(1).unwrap();
        assert_eq!(game.assignment(), [Prize::Goat, Prize::Car, Prize::Goat]);
        assert_eq!(game.first_choice(0).unwrap(), 2);
        assert_eq!(game.remaining_doors(), &[0, 1]);
        assert_eq!(game.final_choice(true).unwrap(), 1);

        let mut game = Game::with_car(1).unwrap();
        assert_eq!(game.first_choice(0).unwrap(), 2);
        assert_eq!(game.final_choice(false).unwrap(), 0);
    }

    #[test]
    fn chosen_car_reveals_a_goat() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..100 {
            let mut game = Game::with_car(2).unwrap();
            let opened = game.first_choice_with(2, &mut rng).unwrap();
            assert!(opened == 0 || opened == 1);
            let result = game.decide(Decision::Stay).unwrap();
            assert!(result.win());
            assert_eq!(result.final_door(), 2);
        }
    }

    #[test]
    fn invalid_door_leaves_game_untouched() {
        let mut game = Game::with_car(0).unwrap();
        assert!(matches!(game.first_choice(99), Err(Error::InvalidDoor(99))));
        assert!(matches!(game.stage(), Stage::Choose));
        assert_eq!(game.remaining_doors(), &DOORS);
        assert_eq!(game.chosen_door(), None);
        assert!(matches!(Game::with_car(3), Err(Error::InvalidDoor(3))));
    }

    #[test]
    fn out_of_sequence_calls_fail() {
        let mut game = Game::new();
        assert!(matches!(
            game.final_choice(true),
            Err(Error::Sequence { operation: "final_choice", stage: "Choose" })
        ));

        game.first_choice(1).unwrap();
        assert!(matches!(
            game.first_choice(1),
            Err(Error::Sequence { operation: "first_choice", stage: "Decide" })
        ));

        game.final_choice(false).unwrap();
        assert!(matches!(
            game.final_choice(false),
            Err(Error::Sequence { stage: "End", .. })
        ));
        assert!(game.result().is_some());
    }

    #[test]
    fn decision_from_bool() {
        assert_eq!(Decision::from(true), Decision::Switch);
        assert_eq!(Decision::from(false), Decision::Stay);
    }
}

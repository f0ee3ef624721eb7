//! 挑战者亲自玩一轮：从输入读取选择，向输出讲述游戏过程。

use crate::error::*;
use crate::{Decision, Game, RoundResult};
use rand::Rng;
use std::io::{BufRead, Write};
use tracing::warn;

/// 进行一轮交互式游戏，输入非法时立即返回错误，不会重试
pub fn play<I, O, R>(mut input: I, mut output: O, rng: &mut R) -> Result<RoundResult>
where
    I: BufRead,
    O: Write,
    R: Rng + ?Sized,
{
    let mut game = Game::new_with(rng);

    write!(output, "请选择一扇门 {:?}: ", game.remaining_doors())?;
    output.flush()?;
    let door = read_door(&mut input)?;
    writeln!(output, "你选择了 {door} 号门")?;

    let opened = game.first_choice_with(door, rng)?;
    writeln!(output, "主持人打开了 {opened} 号门，门后是一只山羊")?;

    write!(output, "是否改变选择? (y/n): ")?;
    output.flush()?;
    let decision = read_decision(&mut input)?;

    let result = game.decide(decision)?;
    match decision {
        Decision::Stay => writeln!(output, "你坚持选择 {} 号门", result.final_door())?,
        Decision::Switch => writeln!(output, "你改为选择 {} 号门", result.final_door())?,
    }

    if result.win() {
        writeln!(output, "恭喜，你赢得了一辆汽车!")?;
    } else {
        writeln!(output, "很遗憾，门后是一只山羊，汽车在 {} 号门", result.car())?;
    }
    Ok(result)
}

fn read_line<I: BufRead>(input: &mut I) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// 读取门序号，门是否存在由 [`Game::first_choice`] 校验
pub fn read_door<I: BufRead>(input: &mut I) -> Result<u32> {
    let line = read_line(input)?;
    line.parse().map_err(|_| {
        warn!(input = %line, "rejected door input");
        Error::InvalidDoorInput(line.clone())
    })
}

pub fn read_decision<I: BufRead>(input: &mut I) -> Result<Decision> {
    match read_line(input)?.as_str() {
        "y" => Ok(Decision::Switch),
        "n" => Ok(Decision::Stay),
        other => {
            warn!(input = other, "rejected decision input");
            Err(Error::InvalidDecisionInput(other.to_string()))
        }
    }
}

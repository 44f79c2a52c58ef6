use thiserror::Error;

use crate::tile::{Category, Tile};

/// 规则引擎错误
///
/// 只覆盖"调用方传入了不合法的数据"这一类错误。
/// 手牌上的规则违例（例如未摸牌就打牌）通过 `bool` / `Option` 返回，
/// 由上层的回合编排逻辑自行判断。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MahjongError {
    /// 牌的点数超出该类别允许的范围
    #[error("rank {rank} is out of range for {category:?}")]
    OutOfRange { category: Category, rank: u8 },

    /// 无法识别的牌标识
    #[error("unknown tile identity '{0}'")]
    UnknownTileIdentity(String),

    /// 牌墙剩余牌数不足以完成本次发牌
    #[error("wall has {remaining} tiles left, {requested} requested")]
    InsufficientTiles { requested: usize, remaining: usize },

    /// 参与和牌判定的牌数不合法
    #[error("a scoring hand needs 14 to 18 tiles, got {0}")]
    InvalidHandSize(usize),

    /// 花牌不参与和牌判定
    #[error("bonus tile {0} cannot be part of a scoring hand")]
    BonusTileInHand(Tile),

    /// 不能组成面子的牌
    #[error("tiles {0:?} do not form a meld")]
    InvalidMeld(Vec<Tile>),

    /// 花位编号必须是 1-4
    #[error("flower number {0} is not in 1..=4")]
    InvalidFlowerNumber(u8),

    /// 规则配置无效
    #[error("invalid rule set: {0}")]
    Config(String),
}

pub type MahjongResult<T> = Result<T, MahjongError>;

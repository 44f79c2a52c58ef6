use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::catalog::TileCatalog;
use super::tile::Tile;
use crate::error::MahjongError;

/// 面子
///
/// 反序列化时经过 `classify` 校验，不合法的面子（例如从 9 开始的顺子）会被拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMeld")]
pub enum Meld {
    /// 顺子：同花色连续三张数牌，`start` 为最小的一张
    Consecutive { start: Tile },
    /// 刻子：三张相同的牌
    Triplet { tile: Tile },
    /// 杠：四张相同的牌
    Quad { tile: Tile },
}

impl Meld {
    /// 面子的代表牌（顺子为第一张）
    pub fn tile(&self) -> Tile {
        match self {
            Meld::Consecutive { start } => *start,
            Meld::Triplet { tile } | Meld::Quad { tile } => *tile,
        }
    }

    /// 展开为具体的牌
    pub fn tiles(&self) -> SmallVec<[Tile; 4]> {
        match *self {
            Meld::Consecutive { start } => {
                let mut tiles = SmallVec::new();
                let mut current = Some(start);
                for _ in 0..3 {
                    if let Some(tile) = current {
                        tiles.push(tile);
                        current = TileCatalog::successor(tile);
                    }
                }
                tiles
            }
            Meld::Triplet { tile } => SmallVec::from_elem(tile, 3),
            Meld::Quad { tile } => SmallVec::from_elem(tile, 4),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Meld::Consecutive { .. } | Meld::Triplet { .. } => 3,
            Meld::Quad { .. } => 4,
        }
    }

    pub fn is_consecutive(&self) -> bool {
        matches!(self, Meld::Consecutive { .. })
    }

    /// 刻子或杠
    pub fn is_pung_like(&self) -> bool {
        matches!(self, Meld::Triplet { .. } | Meld::Quad { .. })
    }

    pub fn is_quad(&self) -> bool {
        matches!(self, Meld::Quad { .. })
    }

    /// 识别一组明牌
    ///
    /// 三张或四张相同的牌识别为刻子/杠，同花色连续三张识别为顺子，
    /// 其他组合返回 `None`。
    pub fn classify(tiles: &[Tile]) -> Option<Meld> {
        let first = *tiles.first()?;
        let all_same = tiles.iter().all(|t| *t == first);
        match tiles.len() {
            3 if all_same && !first.is_bonus() => Some(Meld::Triplet { tile: first }),
            4 if all_same && !first.is_bonus() => Some(Meld::Quad { tile: first }),
            3 => {
                let mut sorted: SmallVec<[Tile; 3]> = tiles.iter().copied().collect();
                sorted.sort();
                let start = sorted[0];
                let second = TileCatalog::successor(start)?;
                let third = TileCatalog::successor(second)?;
                (sorted[1] == second && sorted[2] == third).then_some(Meld::Consecutive { start })
            }
            _ => None,
        }
    }
}

/// 未校验的面子（仅用于反序列化）
#[derive(Deserialize)]
enum RawMeld {
    Consecutive { start: Tile },
    Triplet { tile: Tile },
    Quad { tile: Tile },
}

impl TryFrom<RawMeld> for Meld {
    type Error = MahjongError;

    fn try_from(raw: RawMeld) -> Result<Self, Self::Error> {
        let meld = match raw {
            RawMeld::Consecutive { start } => Meld::Consecutive { start },
            RawMeld::Triplet { tile } => Meld::Triplet { tile },
            RawMeld::Quad { tile } => Meld::Quad { tile },
        };
        let tiles = meld.tiles();
        match Meld::classify(&tiles) {
            Some(classified) if classified == meld => Ok(meld),
            _ => Err(MahjongError::InvalidMeld(tiles.to_vec())),
        }
    }
}

use std::collections::BTreeMap;

use serde::Serialize;
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::error::{MahjongError, MahjongResult};
use crate::tile::{Meld, Tile, TileCatalog, Wind};

/// 牌 → 数量（按目录顺序遍历）
pub type TileCounts = BTreeMap<Tile, u8>;

/// 计分上下文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HandContext {
    /// 门风
    pub seat_wind: Wind,
    /// 圈风
    pub round_wind: Wind,
    /// 花位编号（1-4）
    pub flower_number: u8,
    /// 是否门前清
    pub concealed: bool,
    /// 持有的花牌（不参与拆牌）
    pub bonus_tiles: Vec<Tile>,
    /// 已亮出的刻子/杠的牌（三元牌附加番只算亮出的）
    pub exposed_pungs: Vec<Tile>,
}

impl HandContext {
    /// 不带花牌的上下文，花位取门风对应的编号
    pub fn new(seat_wind: Wind, round_wind: Wind, concealed: bool) -> Self {
        Self {
            seat_wind,
            round_wind,
            flower_number: seat_wind.flower_number(),
            concealed,
            bonus_tiles: Vec::new(),
            exposed_pungs: Vec::new(),
        }
    }

    /// 指定已亮出的刻子/杠
    pub fn with_exposed_pungs(mut self, tiles: impl IntoIterator<Item = Tile>) -> Self {
        self.exposed_pungs = tiles.into_iter().collect();
        self
    }

    /// 该牌的刻子/杠是否已亮出
    pub fn is_exposed_pung(&self, tile: Tile) -> bool {
        self.exposed_pungs.contains(&tile)
    }
}

/// 候选雀头
///
/// 从整手牌中取出一对后，剩余的牌以数量表表示，等待拆成四组面子。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidPair {
    pub pair: Tile,
    pub remainder: TileCounts,
    pub context: HandContext,
}

/// 拆牌成功的结果：一个雀头 + 四组面子
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decomposition {
    pub pair: Tile,
    pub melds: SmallVec<[Meld; 4]>,
    pub context: HandContext,
}

impl Decomposition {
    /// 雀头和面子中的全部牌
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        [self.pair, self.pair]
            .into_iter()
            .chain(self.melds.iter().flat_map(|meld| meld.tiles()))
    }
}

/// 拆牌失败的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Rejection {
    /// 从 `start` 开始的顺子缺少后续的牌
    BrokenRun { start: Tile },
    /// 面子数不是 4
    MeldCount { found: usize },
    /// 四组面子之外还有剩余的牌
    Leftover { tiles: Vec<Tile> },
}

/// 拆牌失败的候选雀头
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedPair {
    pub candidate: ValidPair,
    pub reason: Rejection,
}

/// 拆牌报告
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureReport {
    /// 所有成功的拆法（按雀头枚举顺序）
    pub valid: Vec<Decomposition>,
    /// 所有失败的候选雀头
    pub invalid: Vec<RejectedPair>,
    /// 十三幺时为重复的那张牌
    pub thirteen_orphans: Option<Tile>,
    pub context: HandContext,
}

impl StructureReport {
    pub fn is_thirteen_orphans(&self) -> bool {
        self.thirteen_orphans.is_some()
    }

    /// 是否和牌
    pub fn is_win(&self) -> bool {
        self.is_thirteen_orphans() || !self.valid.is_empty()
    }
}

/// 牌型结构判定器
///
/// # 算法
///
/// 1. 统计每种牌的数量
/// 2. 检查十三幺（独立的闭式判定，不进入一般拆牌）
/// 3. 每种数量 >= 2 的牌作为一个候选雀头
/// 4. 剩余数量恰好为 4 的牌先拆成杠
/// 5. 从数量为 1 或 2 的数牌开始向后拆顺子（数量为 3 的留给刻子）
/// 6. 剩余数量恰好为 3 的牌拆成刻子
/// 7. 顺子没有断开且恰好拆出 4 组面子即为成功
///
/// 同一手牌的所有成功拆法都会保留，由计分选择最大的一种。
pub struct StructureValidator;

impl StructureValidator {
    /// 标准和牌张数（每个杠多一张）
    pub const WINNING_SIZE: usize = 14;
    /// 四组面子
    pub const MELD_COUNT: usize = 4;

    /// 拆牌
    ///
    /// # 参数
    ///
    /// - `tiles`: 暗手牌 + 明牌 + 和牌张（14 张，每个杠多 1 张）
    /// - `context`: 门风、圈风、花位、门前清、花牌
    ///
    /// # 错误
    ///
    /// - 张数不在 14-18 之间：`InvalidHandSize`
    /// - 含花牌：`BonusTileInHand`
    /// - 花位编号不在 1-4：`InvalidFlowerNumber`
    ///
    /// 不能和牌不是错误：返回空的 `valid` 且不是十三幺。
    pub fn decompose(tiles: &[Tile], context: HandContext) -> MahjongResult<StructureReport> {
        Self::check_input(tiles, &context)?;

        let counts = Self::tally(tiles);
        if let Some(duplicate) = Self::thirteen_orphans(&counts) {
            debug!(%duplicate, "thirteen orphans");
            return Ok(StructureReport {
                valid: Vec::new(),
                invalid: Vec::new(),
                thirteen_orphans: Some(duplicate),
                context,
            });
        }

        let mut valid = Vec::new();
        let mut invalid = Vec::new();
        for candidate in Self::candidates(&counts, &context) {
            match Self::resolve(&candidate) {
                Ok(melds) => {
                    trace!(pair = %candidate.pair, ?melds, "decomposition accepted");
                    valid.push(Decomposition {
                        pair: candidate.pair,
                        melds,
                        context: candidate.context.clone(),
                    });
                }
                Err(reason) => {
                    debug!(pair = %candidate.pair, ?reason, "candidate pair rejected");
                    invalid.push(RejectedPair { candidate, reason });
                }
            }
        }

        Ok(StructureReport {
            valid,
            invalid,
            thirteen_orphans: None,
            context,
        })
    }

    /// 以标识字符串作为输入拆牌
    ///
    /// # 错误
    ///
    /// 除 `decompose` 的错误外，未知标识返回 `UnknownTileIdentity`
    pub fn decompose_identities<S: AsRef<str>>(
        identities: &[S],
        context: HandContext,
    ) -> MahjongResult<StructureReport> {
        let tiles = identities
            .iter()
            .map(|id| Tile::from_identity(id.as_ref()))
            .collect::<MahjongResult<Vec<_>>>()?;
        Self::decompose(&tiles, context)
    }

    fn check_input(tiles: &[Tile], context: &HandContext) -> MahjongResult<()> {
        let max = Self::WINNING_SIZE + Self::MELD_COUNT;
        if !(Self::WINNING_SIZE..=max).contains(&tiles.len()) {
            return Err(MahjongError::InvalidHandSize(tiles.len()));
        }
        if let Some(bonus) = tiles.iter().find(|t| t.is_bonus()) {
            return Err(MahjongError::BonusTileInHand(*bonus));
        }
        if !(1..=4).contains(&context.flower_number) {
            return Err(MahjongError::InvalidFlowerNumber(context.flower_number));
        }
        Ok(())
    }

    /// 统计每种牌的数量
    pub fn tally(tiles: &[Tile]) -> TileCounts {
        let mut counts = TileCounts::new();
        for tile in tiles {
            *counts.entry(*tile).or_insert(0) += 1;
        }
        counts
    }

    /// 十三幺：13 种幺九字牌各至少一张，第 14 张与其中一种重复
    ///
    /// 返回重复的那张牌
    pub fn thirteen_orphans(counts: &TileCounts) -> Option<Tile> {
        let total: u32 = counts.values().map(|&c| c as u32).sum();
        if total != Self::WINNING_SIZE as u32 || counts.len() != 13 {
            return None;
        }
        if !TileCatalog::terminals_and_honors().all(|t| counts.contains_key(&t)) {
            return None;
        }
        let mut duplicates = counts.iter().filter(|(_, &c)| c == 2).map(|(t, _)| *t);
        let duplicate = duplicates.next()?;
        duplicates.next().is_none().then_some(duplicate)
    }

    /// 枚举候选雀头（按目录顺序）
    pub fn candidates<'a>(
        counts: &'a TileCounts,
        context: &'a HandContext,
    ) -> impl Iterator<Item = ValidPair> + 'a {
        counts.iter().filter(|(_, &c)| c >= 2).map(move |(&pair, _)| {
            let mut remainder = counts.clone();
            take(&mut remainder, pair, 2);
            ValidPair {
                pair,
                remainder,
                context: context.clone(),
            }
        })
    }

    /// 把一个候选雀头的剩余牌拆成面子
    pub fn resolve(candidate: &ValidPair) -> Result<SmallVec<[Meld; 4]>, Rejection> {
        let mut counts = candidate.remainder.clone();
        let mut melds = SmallVec::new();

        Self::extract_quads(&mut counts, &mut melds);
        Self::extract_runs(&mut counts, &mut melds)?;
        Self::extract_triplets(&mut counts, &mut melds);

        if melds.len() != Self::MELD_COUNT {
            return Err(Rejection::MeldCount { found: melds.len() });
        }
        if !counts.is_empty() {
            let tiles = counts
                .iter()
                .flat_map(|(&t, &c)| std::iter::repeat(t).take(c as usize))
                .collect();
            return Err(Rejection::Leftover { tiles });
        }
        Ok(melds)
    }

    /// 四张相同的牌不能拆开，必须作为杠
    fn extract_quads(counts: &mut TileCounts, melds: &mut SmallVec<[Meld; 4]>) {
        counts.retain(|&tile, &mut count| {
            if count == 4 {
                melds.push(Meld::Quad { tile });
                false
            } else {
                true
            }
        });
    }

    /// 从数量为 1 或 2 的数牌开始拆顺子，直到该牌用完
    ///
    /// 数量为 3 的牌不作为顺子的起点。后续的牌不够时整个候选失败。
    fn extract_runs(
        counts: &mut TileCounts,
        melds: &mut SmallVec<[Meld; 4]>,
    ) -> Result<(), Rejection> {
        let starts: SmallVec<[Tile; 14]> =
            counts.keys().copied().filter(Tile::is_simple).collect();

        for start in starts {
            while matches!(counts.get(&start), Some(1 | 2)) {
                let available = |tile: &Tile| counts.contains_key(tile);
                let second = TileCatalog::successor(start).filter(|t| available(t));
                let third = second
                    .and_then(TileCatalog::successor)
                    .filter(|t| available(t));
                let (Some(second), Some(third)) = (second, third) else {
                    return Err(Rejection::BrokenRun { start });
                };
                for tile in [start, second, third] {
                    take(counts, tile, 1);
                }
                melds.push(Meld::Consecutive { start });
            }
        }
        Ok(())
    }

    fn extract_triplets(counts: &mut TileCounts, melds: &mut SmallVec<[Meld; 4]>) {
        counts.retain(|&tile, &mut count| {
            if count == 3 {
                melds.push(Meld::Triplet { tile });
                false
            } else {
                true
            }
        });
    }
}

/// 取走 `n` 张，数量为 0 时删除
fn take(counts: &mut TileCounts, tile: Tile, n: u8) {
    if let Some(count) = counts.get_mut(&tile) {
        *count = count.saturating_sub(n);
        if *count == 0 {
            counts.remove(&tile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile::{BonusKind, Honor, Suit};

    fn dot(rank: u8) -> Tile {
        Tile::simple(Suit::Dots, rank).unwrap()
    }

    fn context() -> HandContext {
        HandContext::new(Wind::East, Wind::East, true)
    }

    fn decompose(tiles: &[Tile]) -> StructureReport {
        StructureValidator::decompose(tiles, context()).unwrap()
    }

    #[test]
    fn test_all_triplets_purity_shape() {
        let tiles = [
            dot(1), dot(1), dot(2), dot(2), dot(2), dot(3), dot(3),
            dot(3), dot(4), dot(4), dot(4), dot(5), dot(5), dot(5),
        ];
        let report = decompose(&tiles);
        assert_eq!(report.valid.len(), 1);
        let hand = &report.valid[0];
        assert_eq!(hand.pair, dot(1));
        assert!(hand.melds.iter().all(|m| matches!(m, Meld::Triplet { .. })));
        // 2、3、4、5 作雀头都拆不开
        assert_eq!(report.invalid.len(), 4);
        assert!(!report.is_thirteen_orphans());
    }

    #[test]
    fn test_runs_and_pair() {
        // 雀头 1筒，顺子 234筒、567筒、123索、567索
        let tiles = [
            dot(1), dot(1), dot(2), dot(3), dot(4), dot(5), dot(6), dot(7),
            Tile::simple(Suit::Bamboo, 1).unwrap(),
            Tile::simple(Suit::Bamboo, 2).unwrap(),
            Tile::simple(Suit::Bamboo, 3).unwrap(),
            Tile::simple(Suit::Bamboo, 5).unwrap(),
            Tile::simple(Suit::Bamboo, 6).unwrap(),
            Tile::simple(Suit::Bamboo, 7).unwrap(),
        ];
        let report = decompose(&tiles);
        assert_eq!(report.valid.len(), 1);
        assert!(report.valid[0].melds.iter().all(Meld::is_consecutive));
        assert_eq!(report.valid[0].tiles().count(), 14);
    }

    #[test]
    fn test_broken_run_is_recorded() {
        let tiles = [
            dot(1), dot(1), dot(2), dot(3), dot(4), dot(5), dot(6), dot(7),
            dot(8), dot(8), dot(8),
            Tile::simple(Suit::Characters, 9).unwrap(),
            Tile::honor(Honor::East),
            Tile::honor(Honor::East),
        ];
        let report = decompose(&tiles);
        assert!(report.valid.is_empty());
        assert!(!report.is_win());
        assert!(report
            .invalid
            .iter()
            .any(|r| matches!(r.reason, Rejection::BrokenRun { .. })));
    }

    #[test]
    fn test_quad_extracted_first() {
        // 1111 + 234 + 999 + 北北北 + 55 共 15 张
        let tiles = [
            dot(1), dot(1), dot(1), dot(1), dot(2), dot(3), dot(4),
            dot(9), dot(9), dot(9),
            Tile::honor(Honor::North), Tile::honor(Honor::North), Tile::honor(Honor::North),
            dot(5), dot(5),
        ];
        let report = decompose(&tiles);
        assert_eq!(report.valid.len(), 1);
        let hand = &report.valid[0];
        assert_eq!(hand.pair, dot(5));
        assert!(hand.melds.contains(&Meld::Quad { tile: dot(1) }));
        assert!(hand.melds.contains(&Meld::Consecutive { start: dot(2) }));
    }

    #[test]
    fn test_thirteen_orphans() {
        let mut tiles: Vec<Tile> = TileCatalog::terminals_and_honors().collect();
        tiles.push(Tile::honor(Honor::RedDragon));
        let report = decompose(&tiles);
        assert!(report.is_thirteen_orphans());
        assert_eq!(report.thirteen_orphans, Some(Tile::honor(Honor::RedDragon)));
        assert!(report.valid.is_empty());
        assert!(report.invalid.is_empty());
        assert!(report.is_win());
    }

    #[test]
    fn test_not_thirteen_orphans_with_simple() {
        let mut tiles: Vec<Tile> = TileCatalog::terminals_and_honors().collect();
        tiles[0] = dot(5);
        tiles.push(dot(5));
        assert!(!decompose(&tiles).is_thirteen_orphans());
    }

    #[test]
    fn test_input_checks() {
        assert_eq!(
            StructureValidator::decompose(&[dot(1); 13], context()),
            Err(MahjongError::InvalidHandSize(13))
        );

        let flower = Tile::bonus(BonusKind::Flower, 1).unwrap();
        let mut tiles = vec![dot(1), dot(1)];
        tiles.extend([dot(2); 11]);
        tiles.push(flower);
        assert_eq!(
            StructureValidator::decompose(&tiles, context()),
            Err(MahjongError::BonusTileInHand(flower))
        );

        let mut bad = context();
        bad.flower_number = 0;
        assert_eq!(
            StructureValidator::decompose(&[dot(1); 14], bad),
            Err(MahjongError::InvalidFlowerNumber(0))
        );
    }

    #[test]
    fn test_identity_input() {
        let ids = [
            "1_DOT", "1_DOT", "2_DOT", "2_DOT", "2_DOT", "3_DOT", "3_DOT",
            "3_DOT", "4_DOT", "4_DOT", "4_DOT", "5_DOT", "5_DOT", "5_DOT",
        ];
        let report = StructureValidator::decompose_identities(&ids, context()).unwrap();
        assert_eq!(report.valid.len(), 1);

        let mut bad = ids;
        bad[0] = "1_DOTS";
        assert!(matches!(
            StructureValidator::decompose_identities(&bad, context()),
            Err(MahjongError::UnknownTileIdentity(_))
        ));
    }

    #[test]
    fn test_candidates_follow_catalog_order() {
        let tiles = [
            Tile::honor(Honor::East), Tile::honor(Honor::East),
            dot(9), dot(9), dot(1), dot(1),
        ];
        let counts = StructureValidator::tally(&tiles);
        let ctx = context();
        let pairs: Vec<Tile> = StructureValidator::candidates(&counts, &ctx)
            .map(|c| c.pair)
            .collect();
        assert_eq!(pairs, vec![dot(1), dot(9), Tile::honor(Honor::East)]);
    }
}

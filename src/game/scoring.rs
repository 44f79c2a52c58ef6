use serde::Serialize;
use smallvec::SmallVec;
use tracing::debug;

use crate::game::rules::ScoringTable;
use crate::game::structure::{Decomposition, HandContext, StructureReport};
use crate::tile::{Meld, Suit, Tile, Wind};

/// 牌型番
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum HandPattern {
    /// 平和
    AllConsecutive,
    /// 对对和
    AllTriplet,
    /// 混一色
    SemiPurity,
    /// 清一色
    Purity,
    /// 字一色
    AllHonors,
    /// 小三元
    SmallDragons,
    /// 大三元
    LargeDragons,
    /// 小四喜
    SmallWinds,
    /// 大四喜
    LargeWinds,
    /// 十三幺
    ThirteenOrphans,
    /// 十八罗汉
    AllKongs,
}

/// 附加番
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BonusPoint {
    /// 三元牌刻子
    DragonMeld(Tile),
    /// 圈风刻子
    RoundWindMeld(Tile),
    /// 门前清
    Concealed,
    /// 本位花
    MatchingBonusTile(Tile),
}

/// 和牌的形状
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum WinningShape {
    /// 一般和牌型
    Decomposed(Decomposition),
    /// 十三幺（没有面子）
    ThirteenOrphans { duplicate: Tile },
}

/// 一种拆法的计分结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredHand {
    pub shape: WinningShape,
    pub patterns: SmallVec<[(HandPattern, u32); 4]>,
    pub bonuses: SmallVec<[(BonusPoint, u32); 4]>,
    /// 总番数（已按番数表封顶）
    pub total: u32,
}

impl ScoredHand {
    pub fn has_pattern(&self, pattern: HandPattern) -> bool {
        self.patterns.iter().any(|(p, _)| *p == pattern)
    }

    /// 牌型番合计
    pub fn pattern_points(&self) -> u32 {
        self.patterns.iter().map(|(_, points)| *points).fold(0, u32::saturating_add)
    }

    /// 附加番合计
    pub fn bonus_points(&self) -> u32 {
        self.bonuses.iter().map(|(_, points)| *points).fold(0, u32::saturating_add)
    }
}

/// 计分结果
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScoreSheet {
    /// 每种拆法的计分（与拆牌报告的顺序一致）
    pub all_hands: Vec<ScoredHand>,
    largest: Option<usize>,
}

impl ScoreSheet {
    /// 番数最大的拆法（并列时取第一个）
    pub fn largest_hand(&self) -> Option<&ScoredHand> {
        self.largest.and_then(|i| self.all_hands.get(i))
    }

    /// 最大番数，不能和牌时为 0
    pub fn best_total(&self) -> u32 {
        self.largest_hand().map_or(0, |hand| hand.total)
    }

    pub fn is_win(&self) -> bool {
        self.largest.is_some()
    }
}

/// 计分器
///
/// 牌型番可以叠加（清一色与混一色互斥），再加上附加番。
/// 番数表可替换，算法不变。
#[derive(Debug, Clone, Default)]
pub struct PointValidator {
    table: ScoringTable,
}

impl PointValidator {
    pub fn new(table: ScoringTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &ScoringTable {
        &self.table
    }

    /// 为拆牌报告中的每种拆法计分，并选出番数最大的一种
    ///
    /// # 参数
    ///
    /// - `report`: 拆牌报告
    /// - `round_wind`: 圈风
    pub fn score(&self, report: &StructureReport, round_wind: Wind) -> ScoreSheet {
        let all_hands: Vec<ScoredHand> = match report.thirteen_orphans {
            Some(duplicate) => vec![self.score_thirteen_orphans(duplicate, &report.context)],
            None => report
                .valid
                .iter()
                .map(|decomposition| self.score_decomposition(decomposition, round_wind))
                .collect(),
        };

        let mut largest: Option<usize> = None;
        for (index, hand) in all_hands.iter().enumerate() {
            // 严格大于：并列时保留先出现的
            if largest.map_or(true, |best| hand.total > all_hands[best].total) {
                largest = Some(index);
            }
        }

        if let Some(best) = largest {
            debug!(total = all_hands[best].total, candidates = all_hands.len(), "largest hand");
        }
        ScoreSheet { all_hands, largest }
    }

    /// 为一种拆法计分
    pub fn score_decomposition(&self, decomposition: &Decomposition, round_wind: Wind) -> ScoredHand {
        let patterns = self.patterns(decomposition);
        let mut bonuses =
            self.meld_bonuses(&decomposition.melds, &decomposition.context, round_wind);
        if decomposition.context.concealed {
            bonuses.push((BonusPoint::Concealed, self.table.concealed));
        }
        bonuses.extend(self.bonus_tile_points(&decomposition.context));

        self.finish(WinningShape::Decomposed(decomposition.clone()), patterns, bonuses)
    }

    /// 十三幺计分：牌型番 + 本位花
    pub fn score_thirteen_orphans(&self, duplicate: Tile, context: &HandContext) -> ScoredHand {
        let mut patterns = SmallVec::new();
        patterns.push((HandPattern::ThirteenOrphans, self.table.thirteen_orphans));
        let bonuses = self.bonus_tile_points(context).collect();
        self.finish(WinningShape::ThirteenOrphans { duplicate }, patterns, bonuses)
    }

    fn finish(
        &self,
        shape: WinningShape,
        patterns: SmallVec<[(HandPattern, u32); 4]>,
        bonuses: SmallVec<[(BonusPoint, u32); 4]>,
    ) -> ScoredHand {
        // 番数表可以由配置替换，合计时饱和而不是溢出
        let sum = patterns
            .iter()
            .map(|(_, p)| *p)
            .chain(bonuses.iter().map(|(_, p)| *p))
            .fold(0u32, u32::saturating_add);
        ScoredHand {
            shape,
            patterns,
            bonuses,
            total: self.table.apply_limit(sum),
        }
    }

    /// 牌型番
    fn patterns(&self, decomposition: &Decomposition) -> SmallVec<[(HandPattern, u32); 4]> {
        let table = &self.table;
        let melds = &decomposition.melds;
        let mut patterns = SmallVec::new();

        if melds.iter().all(Meld::is_consecutive) {
            patterns.push((HandPattern::AllConsecutive, table.all_consecutive));
        }
        if melds.iter().all(Meld::is_pung_like) {
            patterns.push((HandPattern::AllTriplet, table.all_triplet));
        }

        match Self::suit_profile(decomposition) {
            SuitProfile::HonorsOnly => patterns.push((HandPattern::AllHonors, table.all_honors)),
            SuitProfile::OneSuit { with_honors: true } => {
                patterns.push((HandPattern::SemiPurity, table.semi_purity))
            }
            SuitProfile::OneSuit { with_honors: false } => {
                patterns.push((HandPattern::Purity, table.purity))
            }
            SuitProfile::Mixed => {}
        }

        let dragons = melds
            .iter()
            .filter(|m| m.is_pung_like() && m.tile().is_dragon())
            .count();
        match dragons {
            2 => patterns.push((HandPattern::SmallDragons, table.small_dragons)),
            3 => patterns.push((HandPattern::LargeDragons, table.large_dragons)),
            _ => {}
        }

        let winds = melds
            .iter()
            .filter(|m| m.is_pung_like() && m.tile().as_wind().is_some())
            .count();
        match winds {
            3 => patterns.push((HandPattern::SmallWinds, table.small_winds)),
            4 => patterns.push((HandPattern::LargeWinds, table.large_winds)),
            _ => {}
        }

        if melds.iter().all(Meld::is_quad) {
            patterns.push((HandPattern::AllKongs, table.all_kongs));
        }

        patterns
    }

    /// 三元牌刻子（只算亮出的）、圈风刻子
    fn meld_bonuses(
        &self,
        melds: &[Meld],
        context: &HandContext,
        round_wind: Wind,
    ) -> SmallVec<[(BonusPoint, u32); 4]> {
        let mut bonuses = SmallVec::new();
        for meld in melds.iter().filter(|m| m.is_pung_like()) {
            let tile = meld.tile();
            if tile.is_dragon() {
                if context.is_exposed_pung(tile) {
                    bonuses.push((BonusPoint::DragonMeld(tile), self.table.dragon_meld));
                }
            } else if tile.as_wind() == Some(round_wind) {
                bonuses.push((BonusPoint::RoundWindMeld(tile), self.table.round_wind_meld));
            }
        }
        bonuses
    }

    /// 本位花：点数等于花位编号的花牌，每张一番
    fn bonus_tile_points<'a>(
        &'a self,
        context: &'a HandContext,
    ) -> impl Iterator<Item = (BonusPoint, u32)> + 'a {
        context
            .bonus_tiles
            .iter()
            .filter(move |t| t.is_bonus() && t.rank() == Some(context.flower_number))
            .map(move |t| (BonusPoint::MatchingBonusTile(*t), self.table.matching_bonus_tile))
    }

    fn suit_profile(decomposition: &Decomposition) -> SuitProfile {
        let mut suit: Option<Suit> = None;
        let mut with_honors = false;
        for tile in decomposition.tiles() {
            match tile {
                Tile::Simple(simple) => match suit {
                    None => suit = Some(simple.suit()),
                    Some(s) if s != simple.suit() => return SuitProfile::Mixed,
                    _ => {}
                },
                Tile::Honor(_) => with_honors = true,
                // 花牌不会进入拆牌结果
                Tile::Bonus(_) => return SuitProfile::Mixed,
            }
        }
        match suit {
            Some(_) => SuitProfile::OneSuit { with_honors },
            None => SuitProfile::HonorsOnly,
        }
    }
}

/// 花色构成
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SuitProfile {
    HonorsOnly,
    OneSuit { with_honors: bool },
    Mixed,
}

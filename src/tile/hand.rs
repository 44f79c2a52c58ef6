use smallvec::SmallVec;
use tracing::trace;

use super::meld::Meld;
use super::tile::{Tile, Wind};
use super::wall::Wall;
use crate::error::{MahjongError, MahjongResult};
use crate::game::rules::SortWeights;
use crate::game::structure::HandContext;

/// 一组明牌（2-4 张）
pub type ExposedMeld = SmallVec<[Tile; 4]>;

/// 手牌（Hand）
///
/// 包含暗手牌、明牌、花牌以及本回合的摸牌/选牌状态。
///
/// 暗手牌平时 13 张，摸牌后、打牌前短暂为 14 张。
/// 只有摸过牌或刚吃碰过，才允许打出一张牌。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hand {
    /// 暗手牌
    concealed: Vec<Tile>,
    /// 已亮出的明牌
    exposed: Vec<ExposedMeld>,
    /// 花牌
    bonus: Vec<Tile>,
    /// 当前选中的暗手牌位置
    selected: Option<usize>,
    /// 本回合是否已摸牌
    has_drawn: bool,
    /// 本回合是否刚吃碰
    made_meld: bool,
    /// 是否门前清（第一次亮出三张以上的明牌后变为 false，本局内不可恢复）
    is_concealed: bool,
    /// 门风
    seat_wind: Wind,
    /// 花位编号（1-4）
    flower_number: u8,
    /// 理牌权重
    weights: SortWeights,
}

impl Hand {
    /// 创建空手牌，花位编号取门风对应的编号
    pub fn new(seat_wind: Wind) -> Self {
        Self {
            concealed: Vec::with_capacity(14),
            exposed: Vec::new(),
            bonus: Vec::new(),
            selected: None,
            has_drawn: false,
            made_meld: false,
            is_concealed: true,
            seat_wind,
            flower_number: seat_wind.flower_number(),
            weights: SortWeights::default(),
        }
    }

    /// 创建空手牌并指定花位编号
    ///
    /// # 错误
    ///
    /// 花位编号不在 1-4 时返回 `InvalidFlowerNumber`
    pub fn with_flower_number(seat_wind: Wind, flower_number: u8) -> MahjongResult<Self> {
        if !(1..=4).contains(&flower_number) {
            return Err(MahjongError::InvalidFlowerNumber(flower_number));
        }
        let mut hand = Self::new(seat_wind);
        hand.flower_number = flower_number;
        Ok(hand)
    }

    /// 接收起手牌
    ///
    /// 花牌直接放入花牌区，其余放入暗手牌后理牌。
    ///
    /// # 返回
    ///
    /// 收到的花牌张数（调用方需要为每张花牌补牌）
    pub fn receive_deal(&mut self, tiles: impl IntoIterator<Item = Tile>) -> usize {
        let mut bonus_count = 0;
        for tile in tiles {
            if self.collect_bonus(tile) {
                bonus_count += 1;
            } else {
                self.concealed.push(tile);
            }
        }
        self.resort();
        bonus_count
    }

    /// 是否允许打牌（已摸牌或刚吃碰）
    #[inline]
    pub fn may_play(&self) -> bool {
        self.has_drawn || self.made_meld
    }

    /// 摸一张牌
    ///
    /// # 返回
    ///
    /// - `true`：成功摸牌
    /// - `false`：本回合已经可以打牌（不允许连续摸两次）
    pub fn draw(&mut self, tile: Tile) -> bool {
        if self.may_play() {
            return false;
        }
        self.concealed.push(tile);
        self.has_drawn = true;
        true
    }

    /// 从牌墙摸一张可以打的牌
    ///
    /// 摸到花牌时收入花牌区，并从牌墙开头补牌，直到摸到非花牌。
    ///
    /// # 返回
    ///
    /// - `Some(Tile)`：摸入暗手牌的牌
    /// - `None`：本回合已经可以打牌，或牌墙已摸完（已收入的花牌保留）
    pub fn draw_from_wall(&mut self, wall: &mut Wall) -> Option<Tile> {
        if self.may_play() {
            return None;
        }
        let mut tile = wall.draw()?;
        while self.collect_bonus(tile) {
            trace!(%tile, "bonus tile replaced");
            tile = wall.draw_replacement()?;
        }
        self.draw(tile).then_some(tile)
    }

    /// 收入一张花牌
    ///
    /// 非花牌返回 `false`，手牌不变
    pub fn collect_bonus(&mut self, tile: Tile) -> bool {
        if !tile.is_bonus() {
            return false;
        }
        self.bonus.push(tile);
        true
    }

    /// 选牌（再次选择同一位置取消选择）
    ///
    /// 越界返回 `false`，选择状态不变
    pub fn select_tile(&mut self, index: usize) -> bool {
        if index >= self.concealed.len() {
            return false;
        }
        self.selected = match self.selected {
            Some(current) if current == index => None,
            _ => Some(index),
        };
        true
    }

    /// 打出选中的牌
    ///
    /// 需要有选中的牌并且允许打牌。成功后清除选择和两个打牌许可，并重新理牌。
    pub fn throw_selected(&mut self) -> Option<Tile> {
        let index = self.selected?;
        if !self.may_play() || index >= self.concealed.len() {
            return None;
        }
        let tile = self.concealed.remove(index);
        self.selected = None;
        self.has_drawn = false;
        self.made_meld = false;
        self.resort();
        trace!(%tile, "tile thrown");
        Some(tile)
    }

    /// 亮出一组明牌（吃、碰之后）
    ///
    /// 亮出三张以上后不再是门前清。亮牌后本回合允许打牌。
    /// 调用方负责先用 `remove_tiles` 移除对应的暗手牌。
    pub fn expose_meld(&mut self, tiles: &[Tile]) {
        self.push_exposed(tiles);
        self.made_meld = true;
    }

    fn push_exposed(&mut self, tiles: &[Tile]) {
        if tiles.len() >= 3 {
            self.is_concealed = false;
        }
        self.exposed.push(tiles.iter().copied().collect());
    }

    /// 按标识移除暗手牌
    ///
    /// 任意一张不在暗手牌中时返回 `false`，手牌不变。
    pub fn remove_tiles(&mut self, tiles: &[Tile]) -> bool {
        let mut remaining = self.concealed.clone();
        for tile in tiles {
            match remaining.iter().position(|t| t == tile) {
                Some(pos) => {
                    remaining.remove(pos);
                }
                None => return false,
            }
        }
        self.concealed = remaining;
        self.selected = None;
        true
    }

    /// 理牌
    ///
    /// 同花色数牌按点数升序，其他按类别权重排列。相同输入的结果总是相同，
    /// 与原有顺序无关。之后的自动理牌沿用这张权重表。
    pub fn sort(&mut self, weights: &SortWeights) {
        self.weights = weights.clone();
        self.resort();
    }

    fn resort(&mut self) {
        sort_tiles(&mut self.concealed, &self.weights);
    }

    /// 开杠
    ///
    /// - `from_existing_triplet = true`：加杠，把暗手牌中的第四张并入已亮出的刻子
    /// - `from_existing_triplet = false`：暗杠，把四张相同的暗手牌直接亮出
    ///
    /// 成功后清除选择，并清除打牌许可，等待杠后补牌。
    pub fn form_quad(&mut self, tile: Tile, from_existing_triplet: bool) -> bool {
        let formed = if from_existing_triplet {
            self.promote_triplet(tile)
        } else {
            self.expose_concealed_quad(tile)
        };
        if formed {
            self.selected = None;
            self.has_drawn = false;
            self.made_meld = false;
        }
        formed
    }

    fn promote_triplet(&mut self, tile: Tile) -> bool {
        let Some(meld_index) = self
            .exposed
            .iter()
            .position(|meld| meld.len() == 3 && meld.iter().all(|t| *t == tile))
        else {
            return false;
        };
        if !self.remove_tiles(&[tile]) {
            return false;
        }
        self.exposed[meld_index].push(tile);
        true
    }

    fn expose_concealed_quad(&mut self, tile: Tile) -> bool {
        let quad = [tile; 4];
        if !self.remove_tiles(&quad) {
            return false;
        }
        self.push_exposed(&quad);
        true
    }

    /// 某张牌在暗手牌中的数量
    pub fn tile_count(&self, tile: Tile) -> usize {
        self.concealed.iter().filter(|t| **t == tile).count()
    }

    pub fn concealed_tiles(&self) -> &[Tile] {
        &self.concealed
    }

    pub fn exposed_melds(&self) -> &[ExposedMeld] {
        &self.exposed
    }

    pub fn bonus_tiles(&self) -> &[Tile] {
        &self.bonus
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_tile(&self) -> Option<Tile> {
        self.selected.and_then(|i| self.concealed.get(i).copied())
    }

    pub fn has_drawn(&self) -> bool {
        self.has_drawn
    }

    pub fn made_meld_this_turn(&self) -> bool {
        self.made_meld
    }

    pub fn is_concealed(&self) -> bool {
        self.is_concealed
    }

    pub fn seat_wind(&self) -> Wind {
        self.seat_wind
    }

    pub fn flower_number(&self) -> u8 {
        self.flower_number
    }

    /// 暗手牌张数
    pub fn concealed_count(&self) -> usize {
        self.concealed.len()
    }

    /// 和牌判定用的全部牌：暗手牌 + 明牌 + 可选的一张（别人打出的牌）
    pub fn winning_tiles(&self, extra: Option<Tile>) -> Vec<Tile> {
        let mut tiles = self.concealed.clone();
        for meld in &self.exposed {
            tiles.extend(meld.iter().copied());
        }
        tiles.extend(extra);
        tiles
    }

    /// 计分上下文
    pub fn scoring_context(&self, round_wind: Wind) -> HandContext {
        HandContext {
            seat_wind: self.seat_wind,
            round_wind,
            flower_number: self.flower_number,
            concealed: self.is_concealed,
            bonus_tiles: self.bonus.clone(),
            exposed_pungs: self
                .exposed
                .iter()
                .filter_map(|meld| Meld::classify(meld))
                .filter(Meld::is_pung_like)
                .map(|meld| meld.tile())
                .collect(),
        }
    }

    /// 开始新的一局（保留门风、花位和理牌权重）
    pub fn clear(&mut self) {
        self.concealed.clear();
        self.exposed.clear();
        self.bonus.clear();
        self.selected = None;
        self.has_drawn = false;
        self.made_meld = false;
        self.is_concealed = true;
    }
}

/// 按权重表理牌（稳定排序）
pub fn sort_tiles(tiles: &mut [Tile], weights: &SortWeights) {
    tiles.sort_by_key(|tile| (weights.weight(tile.category()), tile.category(), tile.rank()));
}

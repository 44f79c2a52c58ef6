use super::hand::ExposedMeld;
use super::tile::{Tile, Wind};

/// 对手手牌
///
/// 只知道暗手牌的张数，明牌和花牌是公开的。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpponentHand {
    concealed_count: usize,
    exposed: Vec<ExposedMeld>,
    bonus: Vec<Tile>,
    discards: Vec<Tile>,
    seat_wind: Wind,
    has_drawn: bool,
}

impl OpponentHand {
    pub fn new(seat_wind: Wind) -> Self {
        Self {
            concealed_count: 0,
            exposed: Vec::new(),
            bonus: Vec::new(),
            discards: Vec::new(),
            seat_wind,
            has_drawn: false,
        }
    }

    /// 起手发牌
    pub fn receive_deal(&mut self, count: usize) {
        self.concealed_count += count;
    }

    /// 对手摸了一张牌
    ///
    /// 已摸牌未打时返回 `false`
    pub fn draw(&mut self) -> bool {
        if self.has_drawn {
            return false;
        }
        self.concealed_count += 1;
        self.has_drawn = true;
        true
    }

    /// 对手打出一张牌
    pub fn discard(&mut self, tile: Tile) -> bool {
        if self.concealed_count == 0 {
            return false;
        }
        self.concealed_count -= 1;
        self.has_drawn = false;
        self.discards.push(tile);
        true
    }

    /// 对手亮出明牌，`from_concealed` 为其中来自暗手牌的张数
    pub fn expose_meld(&mut self, tiles: &[Tile], from_concealed: usize) -> bool {
        if from_concealed > self.concealed_count || from_concealed > tiles.len() {
            return false;
        }
        self.concealed_count -= from_concealed;
        self.exposed.push(tiles.iter().copied().collect());
        true
    }

    /// 对手亮出一张花牌（补花会另外摸牌）
    pub fn collect_bonus(&mut self, tile: Tile) -> bool {
        if !tile.is_bonus() {
            return false;
        }
        self.bonus.push(tile);
        true
    }

    pub fn concealed_count(&self) -> usize {
        self.concealed_count
    }

    pub fn exposed_melds(&self) -> &[ExposedMeld] {
        &self.exposed
    }

    pub fn bonus_tiles(&self) -> &[Tile] {
        &self.bonus
    }

    pub fn discards(&self) -> &[Tile] {
        &self.discards
    }

    pub fn seat_wind(&self) -> Wind {
        self.seat_wind
    }

    pub fn clear(&mut self) {
        *self = Self::new(self.seat_wind);
    }
}

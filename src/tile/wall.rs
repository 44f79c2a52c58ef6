use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{thread_rng, Rng, SeedableRng};
use tracing::debug;

use super::tile::{BonusKind, Honor, Suit, Tile};
use crate::error::{MahjongError, MahjongResult};
use crate::game::rules::RuleSetVersion;

/// 牌墙（Wall）
///
/// 每局创建一次：初始化、洗牌，随后被发牌和摸牌消耗，
/// 重开一局时先 `clear` 再 `initialize`。
///
/// 正常摸牌从末尾取，补花/杠后补牌从开头取。
#[derive(Debug, Clone)]
pub struct Wall {
    tiles: Vec<Tile>,
    version: RuleSetVersion,
}

impl Wall {
    /// 每手起始牌数
    pub const HAND_SIZE: usize = 13;

    /// 创建空牌墙
    pub fn new() -> Self {
        Self {
            tiles: Vec::new(),
            version: RuleSetVersion::default(),
        }
    }

    /// 创建并初始化（已洗牌）
    pub fn with_version(version: RuleSetVersion) -> Self {
        let mut wall = Self::new();
        wall.initialize(version);
        wall
    }

    /// 使用固定种子创建（用于复现牌局和测试）
    pub fn with_seed(version: RuleSetVersion, seed: u64) -> Self {
        let mut wall = Self::new();
        wall.fill(version);
        wall.shuffle_with(&mut StdRng::seed_from_u64(seed));
        wall
    }

    /// 按规则版本放入全部牌，然后洗牌
    ///
    /// 不会自动清空已有的牌：重开一局请先调用 `clear`，或直接用 `reset`。
    pub fn initialize(&mut self, version: RuleSetVersion) {
        self.fill(version);
        self.shuffle();
    }

    /// 清空并重新初始化
    pub fn reset(&mut self, version: RuleSetVersion) {
        self.clear();
        self.initialize(version);
    }

    fn fill(&mut self, version: RuleSetVersion) {
        self.version = version;
        self.tiles.reserve(version.tile_count());

        // 数牌：每种花色 1-9，每种 4 张
        for suit in Suit::all() {
            for rank in Tile::MIN_RANK..=Tile::MAX_RANK {
                if let Ok(tile) = Tile::simple(suit, rank) {
                    for _ in 0..Tile::COPIES {
                        self.tiles.push(tile);
                    }
                }
            }
        }

        // 字牌：每种 4 张
        for honor in Honor::all() {
            for _ in 0..Tile::COPIES {
                self.tiles.push(Tile::honor(honor));
            }
        }

        // 花牌：花、季各 1-4，每种 1 张
        if version.has_bonus_tiles() {
            for kind in [BonusKind::Flower, BonusKind::Season] {
                for rank in 1..=Tile::MAX_BONUS_RANK {
                    if let Ok(tile) = Tile::bonus(kind, rank) {
                        self.tiles.push(tile);
                    }
                }
            }
        }

        debug!(?version, count = self.tiles.len(), "wall filled");
    }

    /// 洗牌（线程随机数）
    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut thread_rng());
    }

    /// 使用指定随机数发生器洗牌
    ///
    /// Fisher-Yates 洗牌，每种排列等概率，时间复杂度 O(n)
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.tiles.shuffle(rng);
        debug!(count = self.tiles.len(), "wall shuffled");
    }

    /// 发一手牌（13 张）
    ///
    /// # 错误
    ///
    /// 剩余不足 13 张时返回 `InsufficientTiles`，牌墙不变
    pub fn deal_hand(&mut self) -> MahjongResult<Vec<Tile>> {
        if self.tiles.len() < Self::HAND_SIZE {
            return Err(MahjongError::InsufficientTiles {
                requested: Self::HAND_SIZE,
                remaining: self.tiles.len(),
            });
        }
        let split = self.tiles.len() - Self::HAND_SIZE;
        let mut hand = self.tiles.split_off(split);
        // 与逐张摸牌的顺序一致
        hand.reverse();
        Ok(hand)
    }

    /// 摸一张牌（从末尾）
    ///
    /// # 返回
    ///
    /// - `Some(Tile)`：成功摸牌
    /// - `None`：牌墙已摸完（流局，属于正常情况）
    pub fn draw(&mut self) -> Option<Tile> {
        let tile = self.tiles.pop();
        if tile.is_none() {
            debug!("wall exhausted");
        }
        tile
    }

    /// 补牌（从开头），用于补花和杠后补牌
    pub fn draw_replacement(&mut self) -> Option<Tile> {
        if self.tiles.is_empty() {
            debug!("wall exhausted on replacement draw");
            return None;
        }
        Some(self.tiles.remove(0))
    }

    /// 清空牌墙
    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    /// 剩余牌数
    pub fn remaining_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// 当前版本的总牌数
    pub fn total_count(&self) -> usize {
        self.version.tile_count()
    }

    pub fn version(&self) -> RuleSetVersion {
        self.version
    }

    /// 剩余的牌（按摸牌的相反顺序）
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }
}

impl Default for Wall {
    fn default() -> Self {
        Self::new()
    }
}

use smallvec::SmallVec;

use crate::tile::{Hand, Meld, Tile, TileCatalog};

/// 吃碰杠判定器（针对别人打出的牌）
pub struct ClaimValidator;

impl ClaimValidator {
    /// 检查是否可以碰牌
    ///
    /// 碰牌条件：暗手牌中至少有两张相同的牌
    pub fn can_claim_triplet(hand: &Hand, discard: Tile) -> bool {
        !discard.is_bonus() && hand.tile_count(discard) >= 2
    }

    /// 检查是否可以明杠
    ///
    /// 明杠条件：暗手牌中有三张相同的牌
    pub fn can_claim_quad(hand: &Hand, discard: Tile) -> bool {
        !discard.is_bonus() && hand.tile_count(discard) == 3
    }

    /// 列出所有可以吃的顺子
    ///
    /// 打出的牌可以在顺子的第一、二、三张位置，另外两张必须在暗手牌中
    pub fn run_options(hand: &Hand, discard: Tile) -> SmallVec<[Meld; 3]> {
        let mut options = SmallVec::new();
        if !discard.is_simple() {
            return options;
        }

        let one_below = TileCatalog::predecessor(discard);
        let two_below = one_below.and_then(TileCatalog::predecessor);
        for start in [two_below, one_below, Some(discard)].into_iter().flatten() {
            let meld = Meld::Consecutive { start };
            let tiles = meld.tiles();
            if tiles.len() != 3 {
                continue;
            }
            let others_in_hand = tiles
                .iter()
                .filter(|t| **t != discard)
                .all(|t| hand.tile_count(*t) > 0);
            if others_in_hand {
                options.push(meld);
            }
        }
        options
    }

    /// 执行碰牌
    ///
    /// 从暗手牌中移除两张，亮出刻子，本回合允许打牌
    pub fn claim_triplet(hand: &mut Hand, discard: Tile) -> bool {
        if !Self::can_claim_triplet(hand, discard) {
            return false;
        }
        if !hand.remove_tiles(&[discard, discard]) {
            return false;
        }
        hand.expose_meld(&[discard; 3]);
        true
    }

    /// 执行吃牌
    ///
    /// `meld` 必须是 `run_options` 返回的顺子之一
    pub fn claim_run(hand: &mut Hand, discard: Tile, meld: Meld) -> bool {
        if !Self::run_options(hand, discard).contains(&meld) {
            return false;
        }
        let tiles = meld.tiles();
        let from_hand: SmallVec<[Tile; 2]> =
            tiles.iter().copied().filter(|t| *t != discard).collect();
        if !hand.remove_tiles(&from_hand) {
            return false;
        }
        hand.expose_meld(&tiles);
        true
    }
}

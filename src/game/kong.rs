use serde::Serialize;

use crate::game::structure::StructureValidator;
use crate::tile::{Hand, Meld, Tile};

/// 可以开杠的牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuadCandidate {
    pub tile: Tile,
    /// `true`：加杠（已亮出刻子 + 暗手牌第四张）
    /// `false`：暗杠（暗手牌四张）
    pub already_exposed_as_triplet: bool,
}

/// 杠判定器
///
/// 只做判定，不修改手牌；开杠请调用 `Hand::form_quad`。
pub struct QuadValidator;

impl QuadValidator {
    /// 找出所有可以开杠的牌
    ///
    /// # 返回
    ///
    /// 先列出暗杠（按目录顺序），再列出加杠（按亮牌顺序）
    pub fn find_promotable_quads(hand: &Hand) -> Vec<QuadCandidate> {
        let mut candidates: Vec<QuadCandidate> = StructureValidator::tally(hand.concealed_tiles())
            .into_iter()
            .filter(|&(_, count)| count == 4)
            .map(|(tile, _)| QuadCandidate {
                tile,
                already_exposed_as_triplet: false,
            })
            .collect();

        for meld in hand.exposed_melds() {
            if let Some(Meld::Triplet { tile }) = Meld::classify(meld) {
                if hand.tile_count(tile) == 1 {
                    candidates.push(QuadCandidate {
                        tile,
                        already_exposed_as_triplet: true,
                    });
                }
            }
        }

        candidates
    }

    /// 检查某张牌是否可以开杠
    pub fn can_form_quad(hand: &Hand, tile: Tile) -> Option<QuadCandidate> {
        Self::find_promotable_quads(hand)
            .into_iter()
            .find(|candidate| candidate.tile == tile)
    }

    /// 判定并执行开杠
    pub fn form(hand: &mut Hand, candidate: QuadCandidate) -> bool {
        hand.form_quad(candidate.tile, candidate.already_exposed_as_triplet)
    }
}

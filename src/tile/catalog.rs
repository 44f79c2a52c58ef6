use std::collections::HashMap;
use std::sync::OnceLock;

use super::tile::{Category, Tile};
use crate::error::{MahjongError, MahjongResult};

/// 目录条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub tile: Tile,
    pub identity: &'static str,
    pub category: Category,
    /// 点数（字牌为 `None`）
    pub rank: Option<u8>,
    /// 同花色上一张（仅数牌，1 没有）
    pub predecessor: Option<Tile>,
    /// 同花色下一张（仅数牌，9 没有）
    pub successor: Option<Tile>,
}

/// 牌目录
///
/// 静态表：标识 → 类别、点数、前驱/后继。
/// 按牌的种类索引存放，按标识查询通过一次性构建的哈希表完成，均为 O(1)。
pub struct TileCatalog;

static ENTRIES: OnceLock<Vec<CatalogEntry>> = OnceLock::new();
static BY_IDENTITY: OnceLock<HashMap<&'static str, usize>> = OnceLock::new();

impl TileCatalog {
    /// 所有条目（按 `Tile::index()` 排列）
    pub fn entries() -> &'static [CatalogEntry] {
        ENTRIES.get_or_init(|| {
            Tile::all_kinds()
                .map(|tile| CatalogEntry {
                    tile,
                    identity: tile.identity(),
                    category: tile.category(),
                    rank: match tile {
                        Tile::Honor(_) => None,
                        _ => tile.rank(),
                    },
                    predecessor: tile.predecessor(),
                    successor: tile.successor(),
                })
                .collect()
        })
    }

    /// 按标识查询
    ///
    /// # 错误
    ///
    /// 未知标识返回 `UnknownTileIdentity`，不做任何默认回退
    pub fn lookup(identity: &str) -> MahjongResult<&'static CatalogEntry> {
        let by_identity = BY_IDENTITY.get_or_init(|| {
            Self::entries()
                .iter()
                .enumerate()
                .map(|(index, entry)| (entry.identity, index))
                .collect()
        });
        by_identity
            .get(identity)
            .map(|&index| &Self::entries()[index])
            .ok_or_else(|| MahjongError::UnknownTileIdentity(identity.to_string()))
    }

    /// 按牌查询（对所有合法的牌都有定义）
    pub fn entry(tile: Tile) -> &'static CatalogEntry {
        &Self::entries()[tile.index()]
    }

    /// 下一张（顺子用）
    #[inline]
    pub fn successor(tile: Tile) -> Option<Tile> {
        Self::entry(tile).successor
    }

    /// 上一张
    #[inline]
    pub fn predecessor(tile: Tile) -> Option<Tile> {
        Self::entry(tile).predecessor
    }

    /// 十三幺的 13 种牌：各花色的 1、9 以及全部字牌
    pub fn terminals_and_honors() -> impl Iterator<Item = Tile> {
        Self::entries()
            .iter()
            .map(|entry| entry.tile)
            .filter(Tile::is_terminal_or_honor)
    }
}

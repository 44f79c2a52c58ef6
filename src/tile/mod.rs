/// 牌相关模块
///
/// 包含牌（Tile）、牌目录、牌墙（Wall）、面子以及手牌（Hand）的实现

pub mod tile;
pub mod catalog;
pub mod meld;
pub mod wall;
pub mod hand;
pub mod opponent;

// 重新导出常用类型
pub use tile::{BonusKind, BonusTile, Category, Honor, SimpleTile, Suit, Tile, Wind};
pub use catalog::{CatalogEntry, TileCatalog};
pub use meld::Meld;
pub use wall::Wall;
pub use hand::{ExposedMeld, Hand, sort_tiles};
pub use opponent::OpponentHand;

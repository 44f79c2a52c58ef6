use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::catalog::TileCatalog;
use crate::error::{MahjongError, MahjongResult};

/// 麻将牌
///
/// 香港麻将使用 144 张牌：
/// - 数牌：筒、索、万各 36 张（1-9 各 4 张）
/// - 字牌：东南西北中发白各 4 张
/// - 花牌：春夏秋冬、梅兰菊竹各 1 张
///
/// 牌之间按标识（identity）比较，而不是按引用比较。
/// 数牌和花牌的载荷类型字段私有，只能通过检查过点数的构造函数创建。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tile {
    /// 数牌（筒、索、万，1-9）
    Simple(SimpleTile),
    /// 字牌（风牌、三元牌）
    Honor(Honor),
    /// 花牌（花、季，1-4）
    Bonus(BonusTile),
}

/// 数牌载荷
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SimpleTile {
    suit: Suit,
    rank: u8,
}

impl SimpleTile {
    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }
}

/// 花牌载荷
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BonusTile {
    kind: BonusKind,
    rank: u8,
}

impl BonusTile {
    pub fn kind(&self) -> BonusKind {
        self.kind
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }
}

/// 数牌花色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Suit {
    Dots = 0,
    Bamboo = 1,
    Characters = 2,
}

impl Suit {
    /// 所有花色
    pub fn all() -> [Suit; 3] {
        [Suit::Dots, Suit::Bamboo, Suit::Characters]
    }
}

/// 字牌
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Honor {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
    RedDragon = 4,
    GreenDragon = 5,
    WhiteDragon = 6,
}

impl Honor {
    /// 所有字牌（按风牌、三元牌顺序）
    pub fn all() -> [Honor; 7] {
        [
            Honor::East,
            Honor::South,
            Honor::West,
            Honor::North,
            Honor::RedDragon,
            Honor::GreenDragon,
            Honor::WhiteDragon,
        ]
    }

    pub fn is_dragon(&self) -> bool {
        matches!(self, Honor::RedDragon | Honor::GreenDragon | Honor::WhiteDragon)
    }

    /// 风牌对应的风位，三元牌返回 `None`
    pub fn wind(&self) -> Option<Wind> {
        match self {
            Honor::East => Some(Wind::East),
            Honor::South => Some(Wind::South),
            Honor::West => Some(Wind::West),
            Honor::North => Some(Wind::North),
            Honor::RedDragon | Honor::GreenDragon | Honor::WhiteDragon => None,
        }
    }
}

/// 花牌种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BonusKind {
    Flower = 0,
    Season = 1,
}

/// 风位（门风 / 圈风）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Wind {
    East = 0,
    South = 1,
    West = 2,
    North = 3,
}

impl Wind {
    pub fn all() -> [Wind; 4] {
        [Wind::East, Wind::South, Wind::West, Wind::North]
    }

    /// 对应的风牌
    pub fn honor(&self) -> Honor {
        match self {
            Wind::East => Honor::East,
            Wind::South => Honor::South,
            Wind::West => Honor::West,
            Wind::North => Honor::North,
        }
    }

    /// 座位对应的花位编号：东 1、南 2、西 3、北 4
    pub fn flower_number(&self) -> u8 {
        *self as u8 + 1
    }
}

/// 牌的类别（排序权重表和目录都按类别索引）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Dots,
    Bamboo,
    Characters,
    East,
    South,
    West,
    North,
    RedDragon,
    GreenDragon,
    WhiteDragon,
    Flower,
    Season,
}

impl Category {
    pub const COUNT: usize = 12;

    pub fn all() -> [Category; Category::COUNT] {
        [
            Category::Dots,
            Category::Bamboo,
            Category::Characters,
            Category::East,
            Category::South,
            Category::West,
            Category::North,
            Category::RedDragon,
            Category::GreenDragon,
            Category::WhiteDragon,
            Category::Flower,
            Category::Season,
        ]
    }

    /// 在 `all()` 中的位置
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// 各类牌的标识，按 `Tile::index()` 排列
const IDENTITIES: [&str; Tile::KIND_COUNT] = [
    "1_DOT", "2_DOT", "3_DOT", "4_DOT", "5_DOT", "6_DOT", "7_DOT", "8_DOT", "9_DOT",
    "1_BAMBOO", "2_BAMBOO", "3_BAMBOO", "4_BAMBOO", "5_BAMBOO", "6_BAMBOO", "7_BAMBOO", "8_BAMBOO", "9_BAMBOO",
    "1_CHARACTER", "2_CHARACTER", "3_CHARACTER", "4_CHARACTER", "5_CHARACTER", "6_CHARACTER", "7_CHARACTER",
    "8_CHARACTER", "9_CHARACTER",
    "EAST", "SOUTH", "WEST", "NORTH", "RED_DRAGON", "GREEN_DRAGON", "WHITE_DRAGON",
    "1_FLOWER", "2_FLOWER", "3_FLOWER", "4_FLOWER",
    "1_SEASON", "2_SEASON", "3_SEASON", "4_SEASON",
];

impl Tile {
    /// 牌的种类数：27 种数牌 + 7 种字牌 + 8 种花牌
    pub const KIND_COUNT: usize = 42;

    /// 每种数牌/字牌的张数
    pub const COPIES: u8 = 4;

    /// 数牌点数范围：1-9
    pub const MIN_RANK: u8 = 1;
    pub const MAX_RANK: u8 = 9;

    /// 花牌点数范围：1-4
    pub const MAX_BONUS_RANK: u8 = 4;

    const SIMPLE_BASE: usize = 0;
    const HONOR_BASE: usize = 27;
    const BONUS_BASE: usize = 34;

    /// 创建数牌，点数必须在 1-9 之间
    pub fn simple(suit: Suit, rank: u8) -> MahjongResult<Self> {
        if !(Self::MIN_RANK..=Self::MAX_RANK).contains(&rank) {
            return Err(MahjongError::OutOfRange {
                category: Category::from_suit(suit),
                rank,
            });
        }
        Ok(Tile::Simple(SimpleTile { suit, rank }))
    }

    /// 创建字牌
    pub fn honor(honor: Honor) -> Self {
        Tile::Honor(honor)
    }

    /// 创建花牌，点数必须在 1-4 之间
    pub fn bonus(kind: BonusKind, rank: u8) -> MahjongResult<Self> {
        if !(1..=Self::MAX_BONUS_RANK).contains(&rank) {
            let category = match kind {
                BonusKind::Flower => Category::Flower,
                BonusKind::Season => Category::Season,
            };
            return Err(MahjongError::OutOfRange { category, rank });
        }
        Ok(Tile::Bonus(BonusTile { kind, rank }))
    }

    /// 风位对应的风牌
    pub fn wind(wind: Wind) -> Self {
        Tile::Honor(wind.honor())
    }

    /// 从标识创建牌（唯一的反序列化入口）
    ///
    /// # 错误
    ///
    /// 标识不在目录中时返回 `UnknownTileIdentity`
    pub fn from_identity(identity: &str) -> MahjongResult<Self> {
        TileCatalog::lookup(identity).map(|entry| entry.tile)
    }

    /// 牌的标识，例如 `1_DOT`、`RED_DRAGON`、`3_SEASON`
    pub fn identity(&self) -> &'static str {
        IDENTITIES[self.index()]
    }

    /// 牌的类别
    pub fn category(&self) -> Category {
        match self {
            Tile::Simple(s) => Category::from_suit(s.suit),
            Tile::Honor(h) => match h {
                Honor::East => Category::East,
                Honor::South => Category::South,
                Honor::West => Category::West,
                Honor::North => Category::North,
                Honor::RedDragon => Category::RedDragon,
                Honor::GreenDragon => Category::GreenDragon,
                Honor::WhiteDragon => Category::WhiteDragon,
            },
            Tile::Bonus(b) => match b.kind {
                BonusKind::Flower => Category::Flower,
                BonusKind::Season => Category::Season,
            },
        }
    }

    /// 点数（字牌没有点数）
    pub fn rank(&self) -> Option<u8> {
        match self {
            Tile::Simple(s) => Some(s.rank),
            Tile::Honor(_) => None,
            Tile::Bonus(b) => Some(b.rank),
        }
    }

    /// 花色（仅数牌）
    pub fn suit(&self) -> Option<Suit> {
        match self {
            Tile::Simple(s) => Some(s.suit),
            _ => None,
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Tile::Simple(_))
    }

    pub fn is_honor(&self) -> bool {
        matches!(self, Tile::Honor(_))
    }

    pub fn is_bonus(&self) -> bool {
        matches!(self, Tile::Bonus(_))
    }

    pub fn is_dragon(&self) -> bool {
        matches!(self, Tile::Honor(h) if h.is_dragon())
    }

    /// 风牌对应的风位
    pub fn as_wind(&self) -> Option<Wind> {
        match self {
            Tile::Honor(h) => h.wind(),
            _ => None,
        }
    }

    /// 幺九牌或字牌（十三幺的组成牌）
    pub fn is_terminal_or_honor(&self) -> bool {
        match self {
            Tile::Simple(s) => s.rank == Self::MIN_RANK || s.rank == Self::MAX_RANK,
            Tile::Honor(_) => true,
            Tile::Bonus(_) => false,
        }
    }

    /// 同花色的下一张数牌（9 没有下一张）
    pub fn successor(&self) -> Option<Tile> {
        match self {
            Tile::Simple(s) if s.rank < Self::MAX_RANK => Some(Tile::Simple(SimpleTile {
                suit: s.suit,
                rank: s.rank + 1,
            })),
            _ => None,
        }
    }

    /// 同花色的上一张数牌（1 没有上一张）
    pub fn predecessor(&self) -> Option<Tile> {
        match self {
            Tile::Simple(s) if s.rank > Self::MIN_RANK => Some(Tile::Simple(SimpleTile {
                suit: s.suit,
                rank: s.rank - 1,
            })),
            _ => None,
        }
    }

    /// 转换为种类索引（0-41）
    ///
    /// 映射规则：
    /// - 数牌：0-26 = 花色 * 9 + (点数 - 1)
    /// - 字牌：27-33
    /// - 花牌：34-41 = 34 + 种类 * 4 + (点数 - 1)
    pub fn index(&self) -> usize {
        match self {
            Tile::Simple(s) => Self::SIMPLE_BASE + s.suit as usize * 9 + (s.rank - 1) as usize,
            Tile::Honor(h) => Self::HONOR_BASE + *h as usize,
            Tile::Bonus(b) => Self::BONUS_BASE + b.kind as usize * 4 + (b.rank - 1) as usize,
        }
    }

    /// 从种类索引创建牌
    pub fn from_index(index: usize) -> Option<Self> {
        if index < Self::HONOR_BASE {
            let suit = Suit::all()[index / 9];
            let rank = (index % 9) as u8 + 1;
            Some(Tile::Simple(SimpleTile { suit, rank }))
        } else if index < Self::BONUS_BASE {
            Some(Tile::Honor(Honor::all()[index - Self::HONOR_BASE]))
        } else if index < Self::KIND_COUNT {
            let offset = index - Self::BONUS_BASE;
            let kind = if offset < 4 { BonusKind::Flower } else { BonusKind::Season };
            Some(Tile::Bonus(BonusTile {
                kind,
                rank: (offset % 4) as u8 + 1,
            }))
        } else {
            None
        }
    }

    /// 按索引顺序遍历所有种类的牌
    pub fn all_kinds() -> impl Iterator<Item = Tile> {
        (0..Self::KIND_COUNT).filter_map(Tile::from_index)
    }
}

impl Category {
    fn from_suit(suit: Suit) -> Self {
        match suit {
            Suit::Dots => Category::Dots,
            Suit::Bamboo => Category::Bamboo,
            Suit::Characters => Category::Characters,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identity())
    }
}

impl std::str::FromStr for Tile {
    type Err = MahjongError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tile::from_identity(s)
    }
}

// 序列化形式就是标识字符串
impl Serialize for Tile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.identity())
    }
}

impl<'de> Deserialize<'de> for Tile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let identity = String::deserialize(deserializer)?;
        Tile::from_identity(&identity).map_err(serde::de::Error::custom)
    }
}

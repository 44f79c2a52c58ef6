/// 香港麻将规则引擎
/// 
/// 牌、牌墙、手牌、牌型拆解与计分

pub mod error;
pub mod tile;
pub mod game;

// 重新导出常用类型
pub use error::{MahjongError, MahjongResult};
pub use tile::{
    BonusKind, Category, Hand, Honor, Meld, OpponentHand, Suit, Tile, TileCatalog, Wall, Wind,
};
pub use game::rules::{RuleSet, RuleSetVersion, ScoringTable, SortWeights};
pub use game::structure::{
    Decomposition, HandContext, Rejection, StructureReport, StructureValidator, ValidPair,
};
pub use game::scoring::{BonusPoint, HandPattern, PointValidator, ScoreSheet, ScoredHand, WinningShape};
pub use game::kong::{QuadCandidate, QuadValidator};
pub use game::pong::ClaimValidator;

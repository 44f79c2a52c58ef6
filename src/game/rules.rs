use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MahjongError, MahjongResult};
use crate::tile::Category;

/// 规则版本（决定牌墙的组成）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RuleSetVersion {
    /// 基础牌组：数牌 + 字牌，136 张
    Base,
    /// 香港麻将：基础牌组 + 8 张花牌，144 张
    #[default]
    HongKong,
}

impl RuleSetVersion {
    /// 该版本的总牌数
    pub fn tile_count(&self) -> usize {
        match self {
            RuleSetVersion::Base => 136,
            RuleSetVersion::HongKong => 144,
        }
    }

    /// 是否包含花牌
    pub fn has_bonus_tiles(&self) -> bool {
        matches!(self, RuleSetVersion::HongKong)
    }
}

/// 番数表
///
/// 替换番数表即可支持其他计分方式，拆牌算法不受影响。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTable {
    /// 平和：全部是顺子
    pub all_consecutive: u32,
    /// 对对和：全部是刻子/杠
    pub all_triplet: u32,
    /// 混一色
    pub semi_purity: u32,
    /// 清一色
    pub purity: u32,
    /// 字一色
    pub all_honors: u32,
    /// 小三元（两组三元牌刻子）
    pub small_dragons: u32,
    /// 大三元
    pub large_dragons: u32,
    /// 小四喜（三组风牌刻子）
    pub small_winds: u32,
    /// 大四喜
    pub large_winds: u32,
    /// 十三幺
    pub thirteen_orphans: u32,
    /// 十八罗汉（全部是杠）
    pub all_kongs: u32,
    /// 每组三元牌刻子
    pub dragon_meld: u32,
    /// 每组圈风刻子
    pub round_wind_meld: u32,
    /// 门前清
    pub concealed: u32,
    /// 每张本位花
    pub matching_bonus_tile: u32,
    /// 封顶番数（`None` 表示不封顶）
    pub limit: Option<u32>,
}

impl Default for ScoringTable {
    fn default() -> Self {
        Self::hong_kong()
    }
}

impl ScoringTable {
    /// 香港麻将番数表
    pub fn hong_kong() -> Self {
        Self {
            all_consecutive: 1,
            all_triplet: 3,
            semi_purity: 3,
            purity: 7,
            all_honors: 10,
            small_dragons: 5,
            large_dragons: 8,
            small_winds: 10,
            large_winds: 13,
            thirteen_orphans: 13,
            all_kongs: 13,
            dragon_meld: 1,
            round_wind_meld: 1,
            concealed: 1,
            matching_bonus_tile: 1,
            limit: None,
        }
    }

    /// 应用封顶
    #[inline]
    pub fn apply_limit(&self, total: u32) -> u32 {
        match self.limit {
            Some(limit) => total.min(limit),
            None => total,
        }
    }
}

/// 理牌权重表：类别 → 权重（越小越靠前）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortWeights(BTreeMap<Category, u8>);

impl Default for SortWeights {
    /// 筒、索、万、东南西北、中发白、花、季
    fn default() -> Self {
        Self(
            Category::all()
                .into_iter()
                .map(|category| (category, category.index() as u8))
                .collect(),
        )
    }
}

impl SortWeights {
    pub fn new(weights: BTreeMap<Category, u8>) -> MahjongResult<Self> {
        let weights = Self(weights);
        weights.validate()?;
        Ok(weights)
    }

    /// 类别的权重（表中缺失的类别排在最后）
    #[inline]
    pub fn weight(&self, category: Category) -> u8 {
        self.0.get(&category).copied().unwrap_or(u8::MAX)
    }

    /// 权重表必须覆盖全部类别
    pub fn validate(&self) -> MahjongResult<()> {
        match Category::all().into_iter().find(|c| !self.0.contains_key(c)) {
            Some(missing) => Err(MahjongError::Config(format!(
                "sort weights are missing {:?}",
                missing
            ))),
            None => Ok(()),
        }
    }
}

/// 完整的规则配置
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub version: RuleSetVersion,
    pub scoring: ScoringTable,
    pub sort_weights: SortWeights,
}

impl RuleSet {
    /// 香港麻将默认规则
    pub fn hong_kong() -> Self {
        Self::default()
    }

    /// 从 JSON 加载规则（未给出的字段使用香港麻将默认值）
    pub fn from_json_str(json: &str) -> MahjongResult<Self> {
        let rules: RuleSet =
            serde_json::from_str(json).map_err(|e| MahjongError::Config(e.to_string()))?;
        rules.validate()?;
        Ok(rules)
    }

    pub fn validate(&self) -> MahjongResult<()> {
        if self.scoring.limit == Some(0) {
            return Err(MahjongError::Config("scoring limit must be positive".to_string()));
        }
        self.sort_weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_hong_kong() {
        let rules = RuleSet::default();
        assert_eq!(rules.version, RuleSetVersion::HongKong);
        assert_eq!(rules.version.tile_count(), 144);
        assert_eq!(rules.scoring.purity, 7);
        assert_eq!(rules.scoring.limit, None);
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let rules = RuleSet::from_json_str(r#"{"scoring": {"purity": 6, "limit": 13}}"#).unwrap();
        assert_eq!(rules.scoring.purity, 6);
        assert_eq!(rules.scoring.semi_purity, 3);
        assert_eq!(rules.scoring.apply_limit(20), 13);
        assert_eq!(rules.version, RuleSetVersion::HongKong);
    }

    #[test]
    fn test_incomplete_weights_rejected() {
        let result = RuleSet::from_json_str(r#"{"sort_weights": {"Dots": 0}}"#);
        assert!(matches!(result, Err(MahjongError::Config(_))));
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(matches!(
            RuleSet::from_json_str("{"),
            Err(MahjongError::Config(_))
        ));
    }

    #[test]
    fn test_default_weights_order() {
        let weights = SortWeights::default();
        assert!(weights.weight(Category::Dots) < weights.weight(Category::Characters));
        assert!(weights.weight(Category::Characters) < weights.weight(Category::East));
        assert!(weights.weight(Category::WhiteDragon) < weights.weight(Category::Flower));
    }
}

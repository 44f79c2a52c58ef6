use hkmj_engine::tile::{BonusKind, Honor, Tile, TileCatalog, Wind};
use hkmj_engine::game::rules::{RuleSet, ScoringTable};
use hkmj_engine::game::scoring::{BonusPoint, HandPattern, PointValidator, WinningShape};
use hkmj_engine::game::structure::{HandContext, StructureValidator};

fn ids_to_tiles(ids: &[&str]) -> Vec<Tile> {
    ids.iter().map(|id| Tile::from_identity(id).unwrap()).collect()
}

fn open_context(seat: Wind) -> HandContext {
    HandContext::new(seat, Wind::East, false)
}

#[test]
fn test_triplet_purity_scores_ten() {
    // 对对和 3 + 清一色 7 = 10
    let tiles = ids_to_tiles(&[
        "1_DOT", "1_DOT", "2_DOT", "2_DOT", "2_DOT", "3_DOT", "3_DOT",
        "3_DOT", "4_DOT", "4_DOT", "4_DOT", "5_DOT", "5_DOT", "5_DOT",
    ]);
    let report = StructureValidator::decompose(&tiles, open_context(Wind::South)).unwrap();
    let sheet = PointValidator::default().score(&report, Wind::East);

    assert_eq!(sheet.all_hands.len(), report.valid.len());
    let best = sheet.largest_hand().unwrap();
    assert_eq!(best.pattern_points(), 10);
    assert_eq!(best.total, 10);
    assert!(best.has_pattern(HandPattern::AllTriplet));
    assert!(best.has_pattern(HandPattern::Purity));
}

#[test]
fn test_thirteen_orphans_scores_thirteen() {
    let mut tiles: Vec<Tile> = TileCatalog::terminals_and_honors().collect();
    tiles.push(Tile::honor(Honor::North));
    let report = StructureValidator::decompose(&tiles, open_context(Wind::West)).unwrap();
    assert!(report.is_thirteen_orphans());

    let sheet = PointValidator::default().score(&report, Wind::East);
    let best = sheet.largest_hand().unwrap();
    assert_eq!(best.total, 13);
    assert!(matches!(best.shape, WinningShape::ThirteenOrphans { .. }));
}

#[test]
fn test_tie_goes_to_first_decomposition() {
    // 11223344筒：雀头 1 拆成 234+234，雀头 4 拆成 123+123，番数相同
    let tiles = ids_to_tiles(&[
        "1_DOT", "1_DOT", "2_DOT", "2_DOT", "3_DOT", "3_DOT", "4_DOT",
        "4_DOT", "4_BAMBOO", "5_BAMBOO", "6_BAMBOO", "7_CHARACTER", "8_CHARACTER",
        "9_CHARACTER",
    ]);
    let report = StructureValidator::decompose(&tiles, open_context(Wind::South)).unwrap();
    assert_eq!(report.valid.len(), 2);

    let sheet = PointValidator::default().score(&report, Wind::East);
    assert_eq!(sheet.all_hands.len(), 2);
    assert_eq!(sheet.all_hands[0].total, sheet.all_hands[1].total);

    let best = sheet.largest_hand().unwrap();
    assert_eq!(best, &sheet.all_hands[0]);
    match &best.shape {
        WinningShape::Decomposed(hand) => {
            assert_eq!(hand.pair, Tile::from_identity("1_DOT").unwrap())
        }
        other => panic!("unexpected shape {:?}", other),
    }
}

#[test]
fn test_dragon_and_round_wind_bonuses() {
    // 中中中 西西西 234万 678万 99万，圈风西
    let tiles = ids_to_tiles(&[
        "RED_DRAGON", "RED_DRAGON", "RED_DRAGON", "WEST", "WEST", "WEST",
        "2_CHARACTER", "3_CHARACTER", "4_CHARACTER", "6_CHARACTER", "7_CHARACTER",
        "8_CHARACTER", "9_CHARACTER", "9_CHARACTER",
    ]);
    let context = HandContext::new(Wind::North, Wind::West, false)
        .with_exposed_pungs([Tile::honor(Honor::RedDragon)]);
    let report = StructureValidator::decompose(&tiles, context).unwrap();
    let sheet = PointValidator::default().score(&report, Wind::West);
    let best = sheet.largest_hand().unwrap();

    assert_eq!(
        best.patterns.as_slice(),
        &[(HandPattern::SemiPurity, 3)]
    );
    assert!(best
        .bonuses
        .contains(&(BonusPoint::DragonMeld(Tile::honor(Honor::RedDragon)), 1)));
    assert!(best
        .bonuses
        .contains(&(BonusPoint::RoundWindMeld(Tile::honor(Honor::West)), 1)));
    assert_eq!(best.total, 5);
}

#[test]
fn test_seat_wind_is_not_round_wind() {
    // 门风南的南刻子不算圈风
    let tiles = ids_to_tiles(&[
        "SOUTH", "SOUTH", "SOUTH", "1_DOT", "2_DOT", "3_DOT", "4_BAMBOO",
        "5_BAMBOO", "6_BAMBOO", "7_CHARACTER", "8_CHARACTER", "9_CHARACTER",
        "5_DOT", "5_DOT",
    ]);
    let report =
        StructureValidator::decompose(&tiles, HandContext::new(Wind::South, Wind::East, false))
            .unwrap();
    let sheet = PointValidator::default().score(&report, Wind::East);
    assert_eq!(sheet.best_total(), 0);
    assert!(sheet.is_win());
}

#[test]
fn test_matching_bonus_tiles_follow_flower_number() {
    let tiles = ids_to_tiles(&[
        "1_BAMBOO", "2_BAMBOO", "3_BAMBOO", "4_BAMBOO", "5_BAMBOO", "6_BAMBOO",
        "7_DOT", "8_DOT", "9_DOT", "1_CHARACTER", "2_CHARACTER", "3_CHARACTER",
        "8_DOT", "8_DOT",
    ]);
    let mut context = HandContext::new(Wind::West, Wind::East, true);
    context.bonus_tiles = vec![
        Tile::bonus(BonusKind::Flower, 3).unwrap(),
        Tile::bonus(BonusKind::Season, 3).unwrap(),
        Tile::bonus(BonusKind::Flower, 1).unwrap(),
    ];
    let report = StructureValidator::decompose(&tiles, context).unwrap();
    let best = PointValidator::default()
        .score(&report, Wind::East)
        .largest_hand()
        .cloned()
        .unwrap();

    // 平和 1 + 门前清 1 + 本位花 2（西家花位 3）
    assert!(best.has_pattern(HandPattern::AllConsecutive));
    assert!(best.bonuses.contains(&(BonusPoint::Concealed, 1)));
    assert_eq!(best.bonus_points(), 3);
    assert_eq!(best.total, 4);
}

#[test]
fn test_custom_scoring_table() {
    let rules = RuleSet::from_json_str(r#"{"scoring": {"purity": 6, "limit": 8}}"#).unwrap();
    let validator = PointValidator::new(rules.scoring.clone());
    assert_eq!(validator.table().all_triplet, ScoringTable::hong_kong().all_triplet);

    let tiles = ids_to_tiles(&[
        "1_DOT", "1_DOT", "2_DOT", "2_DOT", "2_DOT", "3_DOT", "3_DOT",
        "3_DOT", "4_DOT", "4_DOT", "4_DOT", "5_DOT", "5_DOT", "5_DOT",
    ]);
    let report = StructureValidator::decompose(&tiles, open_context(Wind::South)).unwrap();
    let best = validator.score(&report, Wind::East).largest_hand().cloned().unwrap();
    assert_eq!(best.pattern_points(), 9);
    assert_eq!(best.total, 8);
}

#[test]
fn test_exposed_large_dragons() {
    let tiles = ids_to_tiles(&[
        "RED_DRAGON", "RED_DRAGON", "RED_DRAGON", "GREEN_DRAGON", "GREEN_DRAGON",
        "GREEN_DRAGON", "WHITE_DRAGON", "WHITE_DRAGON", "WHITE_DRAGON",
        "1_DOT", "2_DOT", "3_DOT", "9_BAMBOO", "9_BAMBOO",
    ]);
    let context = open_context(Wind::East).with_exposed_pungs([
        Tile::honor(Honor::RedDragon),
        Tile::honor(Honor::GreenDragon),
        Tile::honor(Honor::WhiteDragon),
    ]);
    let report = StructureValidator::decompose(&tiles, context).unwrap();
    let best = PointValidator::default()
        .score(&report, Wind::South)
        .largest_hand()
        .cloned()
        .unwrap();
    assert!(best.has_pattern(HandPattern::LargeDragons));
    assert!(!best.has_pattern(HandPattern::SmallDragons));
    // 大三元 8 + 三组三元牌 3
    assert_eq!(best.total, 11);
}

#[test]
fn test_no_win_produces_empty_sheet() {
    let tiles = ids_to_tiles(&[
        "1_DOT", "1_DOT", "2_DOT", "3_DOT", "4_DOT", "5_DOT", "6_DOT",
        "7_DOT", "8_DOT", "8_DOT", "8_DOT", "9_CHARACTER", "EAST", "EAST",
    ]);
    let report = StructureValidator::decompose(&tiles, open_context(Wind::East)).unwrap();
    let sheet = PointValidator::default().score(&report, Wind::East);
    assert!(sheet.all_hands.is_empty());
    assert!(sheet.largest_hand().is_none());
    assert_eq!(sheet.best_total(), 0);
}

#[test]
fn test_concealed_large_dragons_skip_meld_bonus() {
    let tiles = ids_to_tiles(&[
        "RED_DRAGON", "RED_DRAGON", "RED_DRAGON", "GREEN_DRAGON", "GREEN_DRAGON",
        "GREEN_DRAGON", "WHITE_DRAGON", "WHITE_DRAGON", "WHITE_DRAGON",
        "1_DOT", "2_DOT", "3_DOT", "9_BAMBOO", "9_BAMBOO",
    ]);
    let report =
        StructureValidator::decompose(&tiles, HandContext::new(Wind::East, Wind::South, true))
            .unwrap();
    let best = PointValidator::default()
        .score(&report, Wind::South)
        .largest_hand()
        .cloned()
        .unwrap();
    // 大三元 8 + 门前清 1，暗刻的三元牌没有附加番
    assert_eq!(best.bonuses.as_slice(), &[(BonusPoint::Concealed, 1)]);
    assert_eq!(best.total, 9);
}

#[test]
fn test_huge_point_values_do_not_overflow() {
    let rules =
        RuleSet::from_json_str(r#"{"scoring": {"purity": 4294967295, "limit": 13}}"#).unwrap();
    let tiles = ids_to_tiles(&[
        "1_DOT", "1_DOT", "2_DOT", "2_DOT", "2_DOT", "3_DOT", "3_DOT",
        "3_DOT", "4_DOT", "4_DOT", "4_DOT", "5_DOT", "5_DOT", "5_DOT",
    ]);
    let report = StructureValidator::decompose(&tiles, open_context(Wind::South)).unwrap();

    let sheet = PointValidator::new(rules.scoring.clone()).score(&report, Wind::East);
    assert_eq!(sheet.best_total(), 13);

    let mut uncapped = rules.scoring;
    uncapped.limit = None;
    let sheet = PointValidator::new(uncapped).score(&report, Wind::East);
    assert_eq!(sheet.best_total(), u32::MAX);
}

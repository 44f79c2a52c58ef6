/// 可执行文件入口（用于演示和调试）
///
/// 用法：`hkmj-engine [种子]`

use hkmj_engine::{Hand, PointValidator, RuleSetVersion, StructureValidator, Tile, Wall, Wind};

fn main() {
    println!("香港麻将规则引擎");

    let seed = std::env::args().nth(1).and_then(|s| s.parse::<u64>().ok());
    let mut wall = match seed {
        Some(seed) => Wall::with_seed(RuleSetVersion::HongKong, seed),
        None => Wall::with_version(RuleSetVersion::HongKong),
    };
    println!("创建牌墙：{} 张牌", wall.total_count());

    // 四家起手
    let mut hands: Vec<Hand> = Wind::all().into_iter().map(Hand::new).collect();
    for hand in hands.iter_mut() {
        let dealt = match wall.deal_hand() {
            Ok(tiles) => tiles,
            Err(err) => {
                eprintln!("发牌失败：{err}");
                return;
            }
        };
        // 起手花牌从牌墙开头补
        let mut replacements = hand.receive_deal(dealt);
        while replacements > 0 {
            replacements -= 1;
            let Some(tile) = wall.draw_replacement() else {
                break;
            };
            if hand.collect_bonus(tile) {
                replacements += 1;
            } else {
                hand.receive_deal([tile]);
            }
        }
    }
    println!("发牌完成，剩余：{} 张", wall.remaining_count());

    for hand in &hands {
        println!("{:?} 家：{}", hand.seat_wind(), format_tiles(hand.concealed_tiles()));
        if !hand.bonus_tiles().is_empty() {
            println!("  花牌：{}", format_tiles(hand.bonus_tiles()));
        }
    }

    // 东家摸一张，判定是否自摸
    let east = &mut hands[0];
    let bonus_before = east.bonus_tiles().len();
    let Some(tile) = east.draw_from_wall(&mut wall) else {
        println!("牌墙已摸完");
        return;
    };
    if east.bonus_tiles().len() > bonus_before {
        println!("东家补花：{}", format_tiles(&east.bonus_tiles()[bonus_before..]));
    }
    println!("东家摸牌：{tile}");

    let tiles = east.winning_tiles(None);
    let report = match StructureValidator::decompose(&tiles, east.scoring_context(Wind::East)) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("拆牌失败：{err}");
            return;
        }
    };
    let sheet = PointValidator::default().score(&report, Wind::East);
    match sheet.largest_hand() {
        Some(best) => println!("和牌：{} 番", best.total),
        None => println!("未和牌（{} 个候选雀头均不成立）", report.invalid.len()),
    }
}

fn format_tiles(tiles: &[Tile]) -> String {
    tiles
        .iter()
        .map(Tile::identity)
        .collect::<Vec<_>>()
        .join(" ")
}

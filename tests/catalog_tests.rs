//! Sessions driven by custom catalogs

use std::sync::Arc;

use tower_quiz::adapter::ServerConfig;
use tower_quiz::core::{AchievementId, Catalog, CatalogError, ContentItem, GameSession, Reveal};
use tower_quiz::types::{
    BlockId, DifficultyTier, GamePhase, BLOCKS_PER_BAND, TIP_POINTS, TOTAL_BLOCKS,
};

fn tips_only() -> Vec<ContentItem> {
    DifficultyTier::ALL
        .into_iter()
        .flat_map(|tier| (0..BLOCKS_PER_BAND).map(move |n| (tier, n)))
        .enumerate()
        .map(|(i, (tier, n))| {
            ContentItem::tip(i as u32 + 1, "general", tier, &format!("{} tip {n}", tier.as_str()))
        })
        .collect()
}

fn questions_only() -> Vec<ContentItem> {
    tips_only()
        .into_iter()
        .map(|tip| {
            ContentItem::question(
                tip.id,
                &tip.category,
                tip.difficulty,
                &tip.body,
                &["yes", "no", "maybe"],
                0,
                "always yes",
            )
        })
        .collect()
}

#[test]
fn test_tip_catalog_completes_without_answers() {
    let catalog = Arc::new(Catalog::from_items(tips_only()).unwrap());
    let mut game = GameSession::with_catalog(catalog, 3, 0);

    for id in 0..TOTAL_BLOCKS as BlockId {
        let reveal = game.handle_block_click(id, id as u64).unwrap();
        assert!(matches!(reveal, Reveal::Tip { .. }));
    }

    assert_eq!(game.phase(), GamePhase::Completed);
    assert!(game.player().is_unlocked(AchievementId::Bookworm));
    assert!(game.player().is_unlocked(AchievementId::TierExplorer));
    assert!(!game.player().is_unlocked(AchievementId::FirstCorrect));

    let stats = game.statistics(1_000);
    assert_eq!(stats.tips_read, TOTAL_BLOCKS as u32);
    assert_eq!(stats.questions_answered, 0);
    assert_eq!(stats.accuracy_percent, None);
    assert_eq!(
        game.score(),
        TIP_POINTS * TOTAL_BLOCKS as u32 + game.player().totals.achievement_points
    );
}

#[test]
fn test_question_catalog_from_file() {
    let json = serde_json::to_string(
        &questions_only()
            .iter()
            .map(|q| {
                serde_json::json!({
                    "id": q.id,
                    "kind": "question",
                    "category": q.category,
                    "difficulty": q.difficulty.as_str(),
                    "body": q.body,
                    "options": q.options(),
                    "correct_index": 0,
                    "explanation": "always yes",
                })
            })
            .collect::<Vec<_>>(),
    )
    .unwrap();

    let path = std::env::temp_dir().join(format!("tower-quiz-catalog-{}.json", std::process::id()));
    std::fs::write(&path, json).unwrap();
    let config = ServerConfig {
        catalog_path: Some(path.clone()),
        ..ServerConfig::default()
    };
    let catalog = config.load_catalog();
    let _ = std::fs::remove_file(&path);
    let catalog = catalog.unwrap();

    assert_eq!(catalog.len(), TOTAL_BLOCKS);
    assert!(catalog.items().iter().all(ContentItem::is_question));

    let mut game = GameSession::with_catalog(Arc::new(catalog), 11, 0);
    let top = game.blocks().last().unwrap().id;
    game.handle_block_click(top, 0).unwrap();
    let result = game.handle_quiz_answer(top, 0, 2_000).unwrap();
    assert!(result.correct);
    assert_eq!(result.explanation.as_deref(), Some("always yes"));
    assert_eq!(result.points_awarded, DifficultyTier::Easy.correct_points());
}

#[test]
fn test_unbalanced_catalog_is_rejected() {
    let mut items = tips_only();
    items[0].difficulty = DifficultyTier::Hard;
    match Catalog::from_items(items) {
        Err(CatalogError::TierSizeMismatch { tier, found, .. }) => {
            assert_eq!(tier, DifficultyTier::Easy);
            assert_eq!(found, BLOCKS_PER_BAND - 1);
        }
        other => panic!("expected tier size mismatch, got {other:?}"),
    }
}

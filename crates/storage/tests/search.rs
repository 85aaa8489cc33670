mod common;

use common::{row, store};
use storage::{Discipline, RankingWeek, SearchIndex};

async fn indexed_store() -> SearchIndex {
    let store = store().await;
    store
        .ingest(
            RankingWeek::new(2026, 2),
            &[
                row("01-150083", "Max", "Mustermann", Discipline::MensSingles, 1, 198.256),
                row("06-153539", "Tom", "Beispiel", Discipline::MensSingles, 2, 150.0),
                row("02-200001", "Lena", "Neu", Discipline::WomensSingles, 1, 120.0),
                row("03-300001", "Jürgen", "Müller", Discipline::MensSingles, 5, 80.0),
            ],
        )
        .await
        .unwrap();
    SearchIndex::build(&store).await.unwrap()
}

#[tokio::test]
async fn token_order_does_not_change_the_winner() {
    let index = indexed_store().await;

    let forward = index.search("Max Mustermann", 5);
    let reversed = index.search("Mustermann Max", 5);

    assert_eq!(forward[0].player_id, "01-150083");
    assert_eq!(reversed[0].player_id, "01-150083");
    assert!((forward[0].score - reversed[0].score).abs() <= 5.0);
}

#[tokio::test]
async fn partial_and_misspelled_queries_still_match() {
    let index = indexed_store().await;

    let by_surname = index.search("Mustermann", 5);
    assert_eq!(by_surname[0].player_id, "01-150083");

    let misspelled = index.search("Musterman", 5);
    assert_eq!(misspelled[0].player_id, "01-150083");
}

#[tokio::test]
async fn diacritics_are_normalized() {
    let index = indexed_store().await;

    let plain = index.search("Jurgen Muller", 5);
    assert_eq!(plain[0].player_id, "03-300001");
    let digraph = index.search("Juergen Mueller", 5);
    assert_eq!(digraph[0].player_id, "03-300001");
}

#[tokio::test]
async fn empty_and_hopeless_queries_return_empty_not_an_error() {
    let index = indexed_store().await;
    assert!(index.search("", 5).is_empty());
    assert!(index.search("   ", 5).is_empty());
    assert!(index.search("qqqq wxyz", 5).is_empty());
}

#[tokio::test]
async fn results_carry_the_best_rank_and_respect_the_limit() {
    let index = indexed_store().await;

    let results = index.search("Max Mustermann", 1);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].best_discipline, Discipline::MensSingles);
    assert_eq!(results[0].best_rank, 1);
}

#[tokio::test]
async fn score_ties_break_by_best_rank_then_id() {
    let store = store().await;
    // two players with the same name; the better-ranked one must surface
    // first
    store
        .ingest(
            RankingWeek::new(2026, 2),
            &[
                row("07-700001", "Anna", "Becker", Discipline::WomensSingles, 9, 40.0),
                row("04-400001", "Anna", "Becker", Discipline::WomensSingles, 3, 70.0),
            ],
        )
        .await
        .unwrap();
    let index = SearchIndex::build(&store).await.unwrap();

    let results = index.search("Anna Becker", 5);
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].player_id, "04-400001");
    assert_eq!(results[1].player_id, "07-700001");
}

#[tokio::test]
async fn index_is_built_from_the_latest_week_only() {
    let store = store().await;
    store
        .ingest(
            RankingWeek::new(2025, 42),
            &[row("05-500001", "Old", "Timer", Discipline::MensSingles, 1, 90.0)],
        )
        .await
        .unwrap();
    store
        .ingest(
            RankingWeek::new(2026, 2),
            &[row("01-150083", "Max", "Mustermann", Discipline::MensSingles, 1, 198.256)],
        )
        .await
        .unwrap();

    let index = SearchIndex::build(&store).await.unwrap();
    assert_eq!(index.week(), RankingWeek::new(2026, 2));
    assert!(index.search("Old Timer", 5).is_empty());
    assert_eq!(index.search("Max Mustermann", 5)[0].player_id, "01-150083");
}

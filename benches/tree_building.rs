use std::hint::black_box;

use chrono::{Duration, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use trello_radar::models::{Badges, Board, Card, CardList};
use trello_radar::results::{ExpansionState, ResultTree};
use trello_radar::store::SortPreference;

/// Generate synthetic cards spread over a handful of boards and lists
fn generate_cards(num_cards: usize) -> Vec<Card> {
    (0..num_cards)
        .map(|i| {
            let board = i % 17;
            Card {
                id: format!("card-{}", i),
                name: format!("Card {} needing attention", i),
                url: format!("https://trello.com/c/{}", i),
                due: (i % 4 != 0).then(|| Utc::now() + Duration::days((i % 21) as i64 - 7)),
                due_complete: i % 9 == 0,
                labels: vec![],
                badges: Badges { check_items: (i % 5) as u32, check_items_checked: (i % 3) as u32 },
                board_id: format!("b{}", board),
                board: Some(Board {
                    id: format!("b{}", board),
                    name: format!("Board {}", board),
                    url: format!("https://trello.com/b/b{}", board),
                }),
                list: Some(CardList { id: format!("l{}", i % 6), name: format!("List {}", i % 6) }),
            }
        })
        .collect()
}

fn bench_build_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_tree");

    for size in [100, 1_000, 10_000].iter() {
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let cards = generate_cards(size);

            b.iter(|| ResultTree::build(black_box(cards.clone()), SortPreference::BoardThenList));
        });
    }

    group.finish();
}

fn bench_visible_rows(c: &mut Criterion) {
    let tree = ResultTree::build(generate_cards(10_000), SortPreference::ListThenBoard);
    let mut expansion = ExpansionState::default();
    for key in tree.category_keys().into_iter().step_by(3) {
        expansion.set_expanded(&key, false);
    }

    c.bench_function("visible_rows_10000", |b| b.iter(|| black_box(&tree).visible_rows(&expansion)));
}

criterion_group!(benches, bench_build_tree, bench_visible_rows);
criterion_main!(benches);

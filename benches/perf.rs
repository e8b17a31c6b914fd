use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use roster_terminal::players_fetch::parse_players_json;
use roster_terminal::state::{Player, SortKey, Sport, sort_players};

static PLAYERS_JSON: &str = include_str!("../tests/fixtures/players.json");

const POSITIONS: [&str; 6] = ["QB", "WR", "K", "PG", "SG", "C"];

fn sample_roster(len: usize) -> Vec<Player> {
    (0..len)
        .map(|idx| Player {
            id: format!("player-{idx}"),
            full_name: format!("Player {idx}"),
            position: POSITIONS[idx % POSITIONS.len()].to_string(),
            jersey_number: if idx % 13 == 0 {
                None
            } else {
                Some((idx % 99) as u32)
            },
            sport: if idx % 2 == 0 {
                Some(Sport::Football)
            } else {
                Some(Sport::Basketball)
            },
            team: Some("Bench FC".to_string()),
            bio: None,
            url: Some(format!("https://cdn.example.com/players/{idx}.png")),
        })
        .collect()
}

fn bench_players_parse(c: &mut Criterion) {
    c.bench_function("players_parse", |b| {
        b.iter(|| {
            let players = parse_players_json(black_box(PLAYERS_JSON)).unwrap();
            black_box(players.len());
        })
    });
}

fn bench_sort_views(c: &mut Criterion) {
    let roster = sample_roster(500);

    c.bench_function("sort_by_jersey", |b| {
        b.iter(|| {
            let view = sort_players(black_box(&roster), SortKey::Jersey);
            black_box(view.len());
        })
    });
    c.bench_function("sort_by_name", |b| {
        b.iter(|| {
            let view = sort_players(black_box(&roster), SortKey::Name);
            black_box(view.len());
        })
    });
    c.bench_function("sort_by_position", |b| {
        b.iter(|| {
            let view = sort_players(black_box(&roster), SortKey::Position);
            black_box(view.len());
        })
    });
}

criterion_group!(perf, bench_players_parse, bench_sort_views);
criterion_main!(perf);

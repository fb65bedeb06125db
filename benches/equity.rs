use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use poker_coach::cards::parse_cards;
use poker_coach::config::{EquityConfig, RangeConfig};
use poker_coach::equity::{EquityCalculator, Villain};
use poker_coach::evaluator::{evaluate_seven, SevenCardEvaluator};
use poker_coach::hand::{Board, HoleCards};
use poker_coach::range::{OpponentInfo, PostflopAction, RangeSampler};

fn bench_evaluate_seven(c: &mut Criterion) {
    let cards = parse_cards("As Ah Ks Qs Js Ts 9s").unwrap();
    let seven: [_; 7] = cards.try_into().unwrap();
    c.bench_function("evaluate_seven", |b| b.iter(|| evaluate_seven(black_box(&seven))));
}

fn bench_heads_up(c: &mut Criterion) {
    let mut g = c.benchmark_group("heads_up_equity");
    for iterations in [1_000usize, 10_000] {
        let calc = EquityCalculator::new(
            SevenCardEvaluator,
            EquityConfig::default().with_iterations(iterations).with_seed(42),
        );
        g.bench_with_input(BenchmarkId::new("preflop", iterations), &calc, |b, calc| {
            b.iter(|| {
                calc.calculate_equity_str(black_box(&[("a", "As Kc"), ("b", "Qd Qc")]), "").unwrap()
            })
        });
    }
    g.finish();
}

fn bench_vs_ranges(c: &mut Criterion) {
    let calc = EquityCalculator::new(
        SevenCardEvaluator,
        EquityConfig::default().with_iterations(5_000).with_seed(42),
    );
    let hero: HoleCards = "Ah Kh".parse().unwrap();
    let board: Board = "Qh Jd 4h".parse().unwrap();
    let dead = hero.card_set().union(board.card_set());
    let cfg = RangeConfig::default();
    let field: Vec<Villain> = ["CO", "BB"]
        .iter()
        .map(|pos| {
            let v = OpponentInfo::new(*pos, *pos).with_postflop_action(PostflopAction::Bet);
            Villain::Range(RangeSampler::for_opponent(&v, &dead, board.as_slice(), &cfg))
        })
        .collect();
    c.bench_function("vs_two_ranges_flop", |b| {
        b.iter(|| calc.equity_vs_field(black_box(&hero), &board, &field).unwrap())
    });
}

criterion_group!(benches, bench_evaluate_seven, bench_heads_up, bench_vs_ranges);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use bloomcheck_core::config::ScoringConfig;
use bloomcheck_core::model::AnalysisRequest;
use bloomcheck_core::scoring::aggregate;
use bloomcheck_core::{AnalysisEngine, EngineConfig};

const STEMS: [&str; 6] = [
    "Define the term {}.",
    "Explain how {} works in practice.",
    "Calculate the cost of {} for a network of ten nodes.",
    "Compare {} with its closest alternative, given that memory is limited.",
    "Design a new protocol that improves on {}.",
    "Evaluate whether {} is suitable for safety-critical systems and justify your answer.",
];

const TOPICS: [&str; 5] = ["routing", "caching", "hashing", "paging", "scheduling"];

fn make_paper(n: usize) -> AnalysisRequest {
    let questions: Vec<String> = (0..n)
        .map(|i| STEMS[i % STEMS.len()].replace("{}", TOPICS[i % TOPICS.len()]))
        .collect();
    AnalysisRequest::new(questions)
        .with_professor("Bench")
        .with_subject("Systems")
}

fn bench_analyze(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze");
    let engine = AnalysisEngine::new(EngineConfig::default()).unwrap();

    for n in [1usize, 10, 50, 200] {
        let paper = make_paper(n);
        group.bench_function(format!("{n}_questions"), |b| {
            b.iter(|| engine.analyze(black_box(&paper)))
        });
    }

    group.finish();
}

fn bench_question(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_question");
    let engine = AnalysisEngine::new(EngineConfig::default()).unwrap();

    group.bench_function("short", |b| {
        let paper = AnalysisRequest::new(["Define algorithm."]);
        b.iter(|| engine.analyze(black_box(&paper)))
    });

    group.bench_function("long_ambiguous", |b| {
        let paper = AnalysisRequest::new([
            "Discuss this and that, etc., and explain why several of them are not unusual, \
             wouldn't you agree, given that it is possibly true??",
        ]);
        b.iter(|| engine.analyze(black_box(&paper)))
    });

    group.finish();
}

fn bench_aggregate(c: &mut Criterion) {
    let engine = AnalysisEngine::new(EngineConfig::default()).unwrap();
    let questions = engine.analyze(&make_paper(200)).unwrap().paper.questions;
    let config = ScoringConfig::default();

    c.bench_function("aggregate_200", |b| {
        b.iter(|| aggregate(black_box(&questions), black_box(&config)))
    });
}

criterion_group!(benches, bench_analyze, bench_question, bench_aggregate);
criterion_main!(benches);

//! Criterion benchmarks for the timetable engine.
//!
//! Uses a fixed mid-size catalog (five subjects, two labs) to measure
//! the cost of one fitness evaluation and of full search runs at
//! different population sizes.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;

use u_timetable::engine::{EngineConfig, TimetableEngine};
use u_timetable::fitness::{ConstraintWeights, Evaluator, SoftRules};
use u_timetable::model::{
    Batch, Catalog, Day, Faculty, Room, RoomType, SessionRequirement, SessionType, Subject,
    TimeGrid,
};
use u_timetable::{Chromosome, TimetableProblem};

fn bench_catalog() -> Catalog {
    let mut catalog = Catalog::new(Batch::new("b-bench", "Bench Batch").with_strength(60))
        .with_faculty(
            Faculty::new("f-1", "Faculty One")
                .with_max_weekly_load(12)
                .qualified_for("r-0-th")
                .qualified_for("r-1-th")
                .qualified_for("r-0-lab"),
        )
        .with_faculty(
            Faculty::new("f-2", "Faculty Two")
                .with_max_weekly_load(12)
                .qualified_for("r-2-th")
                .qualified_for("r-3-th")
                .qualified_for("r-1-lab"),
        )
        .with_faculty(
            Faculty::new("f-3", "Faculty Three")
                .with_max_weekly_load(12)
                .qualified_for("r-4-th"),
        )
        .with_room(Room::new("rm-1", RoomType::Theory).with_capacity(60))
        .with_room(Room::new("rm-2", RoomType::Theory).with_capacity(60))
        .with_room(Room::new("lab-1", RoomType::Lab).with_capacity(60));

    for i in 0..5 {
        catalog = catalog
            .with_subject(Subject::new(
                format!("s-{i}"),
                format!("SUB-{i}"),
                format!("Subject {i}"),
            ))
            .with_requirement(
                SessionRequirement::new(format!("r-{i}-th"), format!("s-{i}"), SessionType::Theory)
                    .with_frequency(3),
            );
    }
    catalog
        .with_requirement(
            SessionRequirement::new("r-0-lab", "s-0", SessionType::Lab)
                .with_duration(2)
                .with_frequency(1)
                .with_avoid_day(Day::Friday),
        )
        .with_requirement(
            SessionRequirement::new("r-1-lab", "s-1", SessionType::Lab)
                .with_duration(2)
                .with_frequency(1),
        )
}

fn bench_evaluation(c: &mut Criterion) {
    let grid = TimeGrid::standard();
    let catalog = bench_catalog();
    let problem = TimetableProblem::new(&catalog, &grid).unwrap();
    let evaluator = Evaluator::new(&problem, ConstraintWeights::default(), SoftRules::default());
    let mut rng = StdRng::seed_from_u64(42);
    let chromosome = Chromosome::seed(&problem, &mut rng);

    c.bench_function("evaluate_one_chromosome", |b| {
        b.iter(|| evaluator.evaluate(black_box(&chromosome)))
    });
}

fn bench_seeding(c: &mut Criterion) {
    let grid = TimeGrid::standard();
    let catalog = bench_catalog();
    let problem = TimetableProblem::new(&catalog, &grid).unwrap();

    c.bench_function("seed_one_chromosome", |b| {
        let mut rng = StdRng::seed_from_u64(42);
        b.iter(|| Chromosome::seed(black_box(&problem), &mut rng))
    });
}

fn bench_full_run(c: &mut Criterion) {
    let grid = TimeGrid::standard();
    let catalog = bench_catalog();

    let mut group = c.benchmark_group("engine_run");
    group.sample_size(10);
    for population in [20usize, 50] {
        group.bench_with_input(
            BenchmarkId::from_parameter(population),
            &population,
            |b, &population| {
                let config = EngineConfig::default()
                    .with_population_size(population)
                    .with_max_generations(20)
                    .with_plateau_generations(0)
                    .with_seed(42)
                    .with_parallel(false);
                b.iter(|| TimetableEngine::run(&catalog, &grid, &config).unwrap())
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_evaluation, bench_seeding, bench_full_run);
criterion_main!(benches);

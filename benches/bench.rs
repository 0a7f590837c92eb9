use criterion::{
    black_box,
    criterion_group,
    criterion_main,
    Criterion,
};
use std::time::Duration;
use weekly_timetable::{
    build_model,
    solve,
    Catalog,
    CourseDescriptor,
    SolveConfig,
    SolveStatus,
};

criterion_group!(
    bench_solve,
    bench_build_model,
    bench_solve_feasible,
    bench_solve_infeasible,
);
criterion_main!(bench_solve);

/// Returns a catalog of `levels` levels with `courses` courses each.
fn catalog(levels: usize, courses: usize) -> Catalog {
    (0..levels).fold(Catalog::new(), |catalog, level| {
        catalog.with_level(
            format!("L{}", level),
            (0..courses).map(|course| {
                CourseDescriptor::new(format!("C{}{}", level, course))
                    .with_teacher(format!("T{}", course))
            }),
        )
    })
}

fn bench_build_model(c: &mut Criterion) {
    let catalog = catalog(8, 5);
    let config = SolveConfig::default();
    c.bench_function("build_model 8x5", |bencher| {
        bencher.iter(|| black_box(build_model(&catalog, &config).unwrap()))
    });
}

fn bench_solve_feasible(c: &mut Criterion) {
    let mut g = c.benchmark_group("solve (feasible)");
    g.sample_size(10);
    for (levels, courses) in [(1, 5), (4, 4), (8, 5)] {
        let model = build_model(&catalog(levels, courses), &SolveConfig::default()).unwrap();
        g.bench_function(format!("{}x{}", levels, courses), |bencher| {
            bencher.iter(|| {
                let result = black_box(solve(&model, Duration::from_secs(60)));
                assert_eq!(result.status(), SolveStatus::Optimal);
            })
        });
    }
}

fn bench_solve_infeasible(c: &mut Criterion) {
    let mut g = c.benchmark_group("solve (infeasible)");
    g.sample_size(10);
    let config = SolveConfig::default()
        .with_calendar(4, 3)
        .with_period_weights([3, 0, -3]);
    let model = build_model(&catalog(1, 5), &config).unwrap();
    g.bench_function("1x5 in 4x3", |bencher| {
        bencher.iter(|| {
            let result = black_box(solve(&model, Duration::from_secs(60)));
            assert_eq!(result.status(), SolveStatus::Infeasible);
        })
    });
}

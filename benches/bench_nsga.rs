use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;

use genetic_timetable::{
    breeding::{CrossoverMethod, CrossoverOperator, MutationOperator},
    evolution::EvolutionOptions,
    generator::Generator,
    genome::Genome,
    metrics::{Objectives, OBJECTIVE_DIRECTIONS},
    nsga::{non_dominated_sort, sorting::evaluate, Nsga2},
    rng::RandomNumberGenerator,
    timetable::{Chromosome, Configuration, Course, Room},
};

fn campus() -> Arc<Configuration> {
    Arc::new(
        Configuration::builder()
            .time_slots(0..15)
            .rooms((1..=7).map(|id| {
                (
                    id,
                    Room::new(-6.8915 + id as f64 * 0.0005, 107.6107 + id as f64 * 0.0002, 20 + 15 * id),
                )
            }))
            .courses(vec![
                Course::new(1, 2, 2),
                Course::new(2, 1, 2),
                Course::new(3, 3, 1),
                Course::new(4, 2, 1),
                Course::new(5, 1, 2),
                Course::new(6, 4, 1),
            ])
            .build()
            .unwrap(),
    )
}

fn population(config: &Arc<Configuration>, size: usize, rng: &mut RandomNumberGenerator) -> Vec<Genome> {
    (0..size)
        .map(|_| Genome::from_generator(Arc::clone(config), rng).unwrap())
        .collect()
}

fn bench_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("operators");
    let config = campus();
    let mut rng = RandomNumberGenerator::from_seed(1);
    let generator = Generator::new(&config);
    let a = generator.generate(&mut rng).unwrap();
    let b = generator.generate(&mut rng).unwrap();

    group.bench_function("generate", |bench| {
        bench.iter(|| generator.generate(black_box(&mut rng)).unwrap())
    });

    for method in [CrossoverMethod::ColumnBased, CrossoverMethod::RowBased] {
        let operator = CrossoverOperator::new(method, &config);
        group.bench_with_input(
            BenchmarkId::new("crossover", format!("{:?}", method)),
            &(a.clone(), b.clone()),
            |bench, (a, b)| bench.iter(|| operator.run(black_box(a), black_box(b), &mut rng).unwrap()),
        );
    }

    let mutation = MutationOperator::new(5, &config);
    group.bench_function("mutate", |bench| {
        bench.iter_batched(
            || a.clone(),
            |mut chromosome: Chromosome| mutation.mutate(&mut chromosome, &mut rng),
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluation");
    let config = campus();
    let mut rng = RandomNumberGenerator::from_seed(2);

    for size in [16, 64, 256].iter() {
        let genomes = population(&config, *size, &mut rng);

        // Fresh genomes each iteration so the metric cache starts empty.
        group.bench_with_input(BenchmarkId::new("sequential", size), &genomes, |bench, genomes| {
            bench.iter_batched(
                || genomes.iter().map(|g| g.offspring(g.chromosome().clone())).collect::<Vec<_>>(),
                |fresh| evaluate(black_box(&fresh), usize::MAX),
                criterion::BatchSize::SmallInput,
            )
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &genomes, |bench, genomes| {
            bench.iter_batched(
                || genomes.iter().map(|g| g.offspring(g.chromosome().clone())).collect::<Vec<_>>(),
                |fresh| evaluate(black_box(&fresh), 0),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_sorting(c: &mut Criterion) {
    let mut group = c.benchmark_group("non_dominated_sort");

    for size in [100, 1000].iter() {
        let objectives: Vec<Objectives> = (0..*size)
            .map(|i| [((i * 37) % 101) as f64, ((i * 53) % 97) as f64])
            .collect();

        group.bench_with_input(BenchmarkId::new("sequential", size), &objectives, |bench, objectives| {
            bench.iter(|| non_dominated_sort(black_box(objectives), &OBJECTIVE_DIRECTIONS, usize::MAX))
        });

        group.bench_with_input(BenchmarkId::new("parallel", size), &objectives, |bench, objectives| {
            bench.iter(|| non_dominated_sort(black_box(objectives), &OBJECTIVE_DIRECTIONS, 0))
        });
    }

    group.finish();
}

fn bench_generation(c: &mut Criterion) {
    let config = campus();
    let options = EvolutionOptions::builder()
        .population_size(32)
        .crossover_rate(0.8)
        .mutation_rate(0.3)
        .build();

    c.bench_function("nsga_generation", |bench| {
        bench.iter_batched(
            || {
                let mut rng = RandomNumberGenerator::from_seed(3);
                let nsga = Nsga2::new(Arc::clone(&config), options.clone(), &mut rng).unwrap();
                (nsga, rng)
            },
            |(mut nsga, mut rng)| nsga.evolve(&mut rng).unwrap(),
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(
    benches,
    bench_operators,
    bench_evaluation,
    bench_sorting,
    bench_generation
);
criterion_main!(benches);

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pal_align::{
    align_batch, AlignmentMode, GapPenalties, GlobalAlignment, LocalAlignment, OverlapAlignment,
    SeqRecord, SubstitutionMatrix,
};
use pal_core::Sequence;

fn random_dna(len: usize) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    // Deterministic pseudo-random for reproducibility
    let mut seq = Vec::with_capacity(len);
    let mut state: u64 = 42;
    for _ in 0..len {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        seq.push(bases[((state >> 33) % 4) as usize]);
    }
    seq
}

fn mutate_dna(seq: &[u8], rate: f64) -> Vec<u8> {
    let bases = [b'A', b'C', b'G', b'T'];
    let mut out = seq.to_vec();
    let mut state: u64 = 137;
    for b in out.iter_mut() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let r = (state >> 33) as f64 / (u32::MAX as f64);
        if r < rate {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
            *b = bases[((state >> 33) % 4) as usize];
        }
    }
    out
}

fn bench_modes(c: &mut Criterion) {
    let m = SubstitutionMatrix::new(1.0, -3.0);
    let mut group = c.benchmark_group("pairwise");

    for &len in &[100, 1000] {
        let q = SeqRecord::new("q", random_dna(len));
        let s = SeqRecord::new("s", mutate_dna(q.as_bytes(), 0.1));

        group.bench_with_input(BenchmarkId::new("global", len), &len, |b, _| {
            b.iter(|| {
                let mut a =
                    GlobalAlignment::new(black_box(&q), black_box(&s), &m, -5.0, -2.0).unwrap();
                a.align().unwrap();
                a.score()
            })
        });

        group.bench_with_input(BenchmarkId::new("overlap", len), &len, |b, _| {
            b.iter(|| {
                let mut a =
                    OverlapAlignment::new(black_box(&q), black_box(&s), &m, -5.0, -2.0).unwrap();
                a.align().unwrap();
                a.trim_query().unwrap();
                a.score()
            })
        });

        group.bench_with_input(BenchmarkId::new("local", len), &len, |b, _| {
            b.iter(|| {
                let mut a =
                    LocalAlignment::new(black_box(&q), black_box(&s), &m, -5.0, -2.0).unwrap();
                a.align().unwrap();
                a.score()
            })
        });
    }

    group.finish();
}

fn bench_suboptimal(c: &mut Criterion) {
    let m = SubstitutionMatrix::new(1.0, -3.0);
    let q = SeqRecord::new("q", random_dna(300));
    let s = SeqRecord::new("s", mutate_dna(q.as_bytes(), 0.2));

    c.bench_function("local_first_10", |b| {
        b.iter(|| {
            let mut a =
                LocalAlignment::new(black_box(&q), black_box(&s), &m, -5.0, -2.0).unwrap();
            let mut n = 0;
            while n < 10 && a.align().unwrap() {
                n += 1;
            }
            n
        })
    });
}

fn bench_batch(c: &mut Criterion) {
    let m = SubstitutionMatrix::new(1.0, -3.0);
    let pairs: Vec<(SeqRecord, SeqRecord)> = (0..64)
        .map(|i| {
            let q = random_dna(200 + i);
            let s = mutate_dna(&q, 0.1);
            (SeqRecord::new("q", q), SeqRecord::new("s", s))
        })
        .collect();

    c.bench_function("batch_global_64x200", |b| {
        b.iter(|| {
            align_batch(
                black_box(&pairs),
                AlignmentMode::Global,
                &m,
                GapPenalties::default(),
            )
        })
    });
}

criterion_group!(benches, bench_modes, bench_suboptimal, bench_batch);
criterion_main!(benches);

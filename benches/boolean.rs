use criterion::{black_box, criterion_group, criterion_main, Criterion};
use polysweep::{Op, Polygon};

type Contours = Vec<Vec<(f64, f64)>>;

fn squares((x0, y0): (f64, f64), size: f64, offset: f64, count: usize) -> Contours {
    let mut ret = Vec::new();
    for i in 0..count {
        let x = x0 + i as f64 * offset;
        for j in 0..count {
            let y = y0 + j as f64 * offset;
            ret.push(vec![
                (x, y),
                (x + size, y),
                (x + size, y + size),
                (x, y + size),
            ]);
        }
    }
    ret
}

fn checkerboard(n: usize) -> (Polygon, Polygon) {
    (
        Polygon::from(squares((0.0, 0.0), 30.0, 40.0, n)),
        Polygon::from(squares((20.0, 20.0), 30.0, 40.0, n - 1)),
    )
}

fn circle(cx: f64, cy: f64, r: f64, n: usize) -> Polygon {
    let points = (0..n)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / n as f64;
            (cx + r * theta.cos(), cy + r * theta.sin())
        })
        .collect::<Vec<_>>();
    Polygon::from(vec![points])
}

fn checkerboard_union(c: &mut Criterion) {
    let (a, b) = checkerboard(10);
    c.bench_function("checkerboard union", |bench| {
        bench.iter(|| black_box(a.construct(Op::Union, &b).unwrap()))
    });
}

fn checkerboard_xor(c: &mut Criterion) {
    let (a, b) = checkerboard(10);
    c.bench_function("checkerboard xor", |bench| {
        bench.iter(|| black_box(a.construct(Op::Xor, &b).unwrap()))
    });
}

fn rect_circle_ops(c: &mut Criterion) {
    let rect = Polygon::from(vec![vec![(0.0, 0.0), (12.0, 0.0), (12.0, 16.0), (0.0, 16.0)]]);
    let disc = circle(6.0, 8.0, 8.0, 512);
    c.bench_function("rect vs 512-gon intersection", |bench| {
        bench.iter(|| black_box(rect.construct(Op::Intersection, &disc).unwrap()))
    });
}

criterion_group!(benches, checkerboard_union, checkerboard_xor, rect_circle_ops);
criterion_main!(benches);

use std::alloc::{GlobalAlloc, Layout, System};
use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use chirpz::conv::{convolve_with, ConvolutionKernel};
use chirpz::fft::ScalarFftImpl;
use chirpz::Complex64;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

struct CountingAlloc;

static ALLOC: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = System.alloc(layout);
        if !ptr.is_null() {
            ALLOC.fetch_add(1, Ordering::Relaxed);
        }
        ptr
    }
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout);
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

fn ramp(n: usize) -> Vec<Complex64> {
    (0..n).map(|i| Complex64::new(i as f64, 1.0)).collect()
}

fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve");
    for &n in &[63usize, 500, 4000] {
        let a = ramp(n);
        let b = ramp(n / 2 + 1);
        let fft = ScalarFftImpl::<f64>::default();
        group.bench_with_input(BenchmarkId::new("one_shot", n), &n, |bench, _| {
            bench.iter(|| convolve_with(&fft, black_box(&a), &b).unwrap())
        });
        let kernel = ConvolutionKernel::new(&fft, &b, n).unwrap();
        group.bench_with_input(BenchmarkId::new("prepared_kernel", n), &n, |bench, _| {
            bench.iter(|| kernel.apply(&fft, black_box(&a)).unwrap())
        });
    }
    group.finish();
}

/// A warmed-up prepared kernel allocates only its output buffer per call.
fn bench_kernel_allocations(c: &mut Criterion) {
    let fft = ScalarFftImpl::<f64>::default();
    let a = ramp(1000);
    let kernel = ConvolutionKernel::new(&fft, &ramp(300), a.len()).unwrap();
    kernel.apply(&fft, &a).unwrap();
    c.bench_function("prepared_kernel_allocations", |b| {
        b.iter_custom(|iters| {
            let mut total = Duration::ZERO;
            for _ in 0..iters {
                ALLOC.store(0, Ordering::Relaxed);
                let start = Instant::now();
                let out = kernel.apply(&fft, black_box(&a)).unwrap();
                total += start.elapsed();
                assert_eq!(ALLOC.load(Ordering::Relaxed), 1);
                drop(out);
            }
            total
        })
    });
}

criterion_group!(benches, bench_convolve, bench_kernel_allocations);
criterion_main!(benches);

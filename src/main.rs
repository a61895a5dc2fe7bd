//! Memory harness: counts heap allocations per record scenario.
use clap::Parser;
use open_record::{OpenRecord, RecordError, Value};
use std::alloc::{GlobalAlloc, Layout, System};
use std::hint::black_box;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing_subscriber::EnvFilter;

// ─── Counting Allocator ─────────────────────────────────────────────────────

struct CountingAlloc;

static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);
static ALLOCATED_BYTES: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        ALLOCATED_BYTES.fetch_add(layout.size(), Ordering::Relaxed);
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        ALLOCATED_BYTES.fetch_add(new_size, Ordering::Relaxed);
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

// ─── Config ─────────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(version, about = "Heap allocations of common OpenRecord operations")]
struct Args {
    /// Repetitions per scenario.
    #[arg(long, default_value_t = HarnessConfig::default().iterations)]
    iterations: NonZeroUsize,
    /// Field count of the large-record scenarios.
    #[arg(long, default_value_t = HarnessConfig::default().large_field_count)]
    large_fields: usize,
}

/// Settings for one harness run.
pub struct HarnessConfig {
    /// How many times each scenario body runs.
    ///
    /// Default: 1 000.
    pub iterations: NonZeroUsize,
    /// Number of fields (`key_0` .. `key_{n-1}`) in the large record.
    ///
    /// Default: 101.
    pub large_field_count: usize,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            iterations: NonZeroUsize::new(1_000).unwrap_or(NonZeroUsize::MIN),
            large_field_count: 101,
        }
    }
}

impl From<Args> for HarnessConfig {
    fn from(args: Args) -> Self {
        Self {
            iterations: args.iterations,
            large_field_count: args.large_fields,
        }
    }
}

// ─── Measurement ────────────────────────────────────────────────────────────

struct Report {
    label: &'static str,
    allocations: usize,
    bytes: usize,
}

fn measure<F>(label: &'static str, iterations: NonZeroUsize, mut body: F) -> Result<Report, RecordError>
where
    F: FnMut() -> Result<(), RecordError>,
{
    let allocs_before = ALLOCATIONS.load(Ordering::Relaxed);
    let bytes_before = ALLOCATED_BYTES.load(Ordering::Relaxed);
    for _ in 0..iterations.get() {
        body()?;
    }
    let report = Report {
        label,
        allocations: ALLOCATIONS.load(Ordering::Relaxed) - allocs_before,
        bytes: ALLOCATED_BYTES.load(Ordering::Relaxed) - bytes_before,
    };
    println!(
        "{:>28}  {:>10} allocs  {:>12} bytes",
        report.label, report.allocations, report.bytes
    );
    Ok(report)
}

fn large_pairs(n: usize) -> Vec<(String, Value)> {
    (0..n).map(|i| (format!("key_{i}"), Value::from(i as i64))).collect()
}

fn run(config: &HarnessConfig) -> Result<Vec<Report>, RecordError> {
    let n = config.iterations;
    let large = large_pairs(config.large_field_count);
    let probe = OpenRecord::from_pairs([("k", 123i64)]);
    let symbol_key = Value::from("k");
    let large_record = OpenRecord::from_pairs(large.iter().cloned());

    let mut reports = Vec::new();
    reports.push(measure("creation,   0 fields", n, || {
        black_box(OpenRecord::new());
        Ok(())
    })?);
    reports.push(measure("creation,   1 field ", n, || {
        black_box(OpenRecord::from_pairs([("k0", 0i64)]));
        Ok(())
    })?);
    reports.push(measure("creation,   2 fields", n, || {
        black_box(OpenRecord::from_pairs([("k0", 0i64), ("k1", 1)]));
        Ok(())
    })?);
    reports.push(measure("creation,   3 fields", n, || {
        black_box(OpenRecord::from_pairs([("k0", 0i64), ("k1", 1), ("k2", 2)]));
        Ok(())
    })?);
    reports.push(measure("creation, large record", n, || {
        black_box(OpenRecord::from_pairs(large.iter().cloned()));
        Ok(())
    })?);
    reports.push(measure("attribute access", n, || {
        black_box(probe.get(black_box("k")));
        Ok(())
    })?);
    reports.push(measure("key lookup by string", n, || {
        black_box(&probe[black_box("k")]);
        Ok(())
    })?);
    reports.push(measure("key lookup by symbol", n, || {
        black_box(probe.try_get(black_box(&symbol_key))?);
        Ok(())
    })?);
    reports.push(measure("json dump, large record", n, || {
        black_box(large_record.to_json()?);
        Ok(())
    })?);
    Ok(reports)
}

fn main() -> Result<(), RecordError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = HarnessConfig::from(Args::parse());
    if open_record::is_optimized() {
        println!("open_record {}, with explicit field table", open_record::VERSION);
    } else {
        println!("open_record {}", open_record::VERSION);
    }
    tracing::debug!(
        iterations = config.iterations.get(),
        large_fields = config.large_field_count,
        "starting memory harness"
    );

    let mut reports = run(&config)?;

    println!("\nComparison:");
    reports.sort_by_key(|r| r.bytes);
    let baseline = reports.first().map_or(0, |r| r.bytes);
    for r in &reports {
        if r.bytes == baseline || baseline == 0 {
            println!("{:>28}: {:>12} allocated", r.label, r.bytes);
        } else {
            println!(
                "{:>28}: {:>12} allocated - {:.2}x more",
                r.label,
                r.bytes,
                r.bytes as f64 / baseline as f64
            );
        }
    }
    Ok(())
}

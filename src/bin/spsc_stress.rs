//! spsc-ring Stress Binary
//!
//! Dua thread (producer dan consumer) menukar sequence integer lewat satu
//! ring. Consumer memverifikasi urutan FIFO tanpa drop atau duplikat.
//!
//! Usage:
//!   cargo run --release --bin spsc_stress -- [OPTIONS]
//!
//! Exit code non-zero jika ditemukan pelanggaran urutan.

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_utils::Backoff;
use spsc_ring::{destroy, Consumer, Producer, Ring, RingError, Value};

/// Stress configuration
#[derive(Debug, Parser)]
#[command(name = "spsc_stress", about = "Two-thread stress run for the SPSC ring")]
struct StressConfig {
    /// Ring capacity (power of two, at least 2)
    #[arg(short, long, default_value_t = 1024, value_parser = parse_capacity)]
    capacity: usize,

    /// Number of values to transfer (at most 2^32 - 1)
    #[arg(
        short = 'n',
        long,
        default_value_t = 10_000_000,
        value_parser = clap::value_parser!(u64).range(..=u64::from(u32::MAX))
    )]
    count: u64,

    /// Pin producer thread to this CPU (Linux only)
    #[arg(long, value_parser = parse_core)]
    producer_core: Option<usize>,

    /// Pin consumer thread to this CPU (Linux only)
    #[arg(long, value_parser = parse_core)]
    consumer_core: Option<usize>,

    /// Print full/empty spin counters
    #[arg(short, long)]
    verbose: bool,
}

/// Batas index CPU yang bisa dimasukkan ke `cpu_set_t`
#[cfg(target_os = "linux")]
const MAX_CPUS: usize = libc::CPU_SETSIZE as usize;
#[cfg(not(target_os = "linux"))]
const MAX_CPUS: usize = usize::MAX;

/// Capacity 1 tidak punya slot efektif, producer akan spin selamanya
fn parse_capacity(arg: &str) -> Result<usize, String> {
    let capacity: usize = arg.parse().map_err(|e| format!("invalid capacity: {}", e))?;
    if capacity < 2 {
        return Err(format!(
            "capacity {} has no usable slot, need at least 2",
            capacity
        ));
    }
    if !capacity.is_power_of_two() {
        return Err(RingError::NotPowerOfTwo(capacity).to_string());
    }
    Ok(capacity)
}

fn parse_core(arg: &str) -> Result<usize, String> {
    let core: usize = arg.parse().map_err(|e| format!("invalid CPU index: {}", e))?;
    if core >= MAX_CPUS {
        return Err(format!("CPU {} out of range, must be below {}", core, MAX_CPUS));
    }
    Ok(core)
}

/// Hasil dari sisi producer
#[derive(Debug, Default)]
struct ProducerReport {
    pushed: u64,
    full_spins: u64,
}

/// Hasil dari sisi consumer
#[derive(Debug, Default)]
struct ConsumerReport {
    popped: u64,
    empty_spins: u64,
    violations: u64,
    first_violation: Option<(u64, Value)>,
}

/// Sequence ke-i yang dikirim producer.
///
/// `count` dibatasi `u32::MAX`, jadi setiap sequence unik setelah cast.
#[inline(always)]
fn value_at(i: u64) -> Value {
    i as Value
}

fn run_producer(mut tx: Producer<'_>, count: u64, core: Option<usize>) -> ProducerReport {
    pin_current_thread(core);

    let mut report = ProducerReport::default();
    let backoff = Backoff::new();

    for i in 0..count {
        loop {
            match tx.push(value_at(i)) {
                Ok(()) => {
                    backoff.reset();
                    break;
                }
                Err(RingError::Full) => {
                    report.full_spins += 1;
                    backoff.snooze();
                }
                Err(_) => unreachable!("push only reports Full"),
            }
        }
        report.pushed += 1;
    }

    report
}

fn run_consumer(mut rx: Consumer<'_>, count: u64, core: Option<usize>) -> ConsumerReport {
    pin_current_thread(core);

    let mut report = ConsumerReport::default();
    let backoff = Backoff::new();

    while report.popped < count {
        match rx.pop() {
            Ok(value) => {
                backoff.reset();
                if value != value_at(report.popped) {
                    report.violations += 1;
                    if report.first_violation.is_none() {
                        report.first_violation = Some((report.popped, value));
                    }
                }
                report.popped += 1;
            }
            Err(_) => {
                report.empty_spins += 1;
                backoff.snooze();
            }
        }
    }

    report
}

#[cfg(target_os = "linux")]
fn pin_current_thread(core: Option<usize>) {
    let Some(core) = core else {
        return;
    };
    if core >= MAX_CPUS {
        eprintln!("⚠️ CPU {} out of range, thread not pinned", core);
        return;
    }

    // SAFETY: cpu_set_t adalah plain data, zeroed = set kosong
    let result = unsafe {
        let mut set: libc::cpu_set_t = std::mem::zeroed();
        libc::CPU_SET(core, &mut set);
        libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set)
    };

    if result != 0 {
        eprintln!(
            "⚠️ Failed to pin thread to CPU {}: {}",
            core,
            std::io::Error::last_os_error()
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn pin_current_thread(core: Option<usize>) {
    if let Some(core) = core {
        eprintln!("⚠️ CPU pinning not supported on this platform (core {})", core);
    }
}

fn run_stress(config: &StressConfig) -> Result<bool, RingError> {
    let mut handle = Some(Ring::new(config.capacity)?);
    let Some(ring) = handle.as_mut() else {
        return Ok(false);
    };

    println!("🔄 Stress run");
    println!("   Capacity:  {} ({} usable)", ring.capacity(), ring.usable_capacity());
    println!("   Values:    {}", config.count);

    let count = config.count;
    let start = Instant::now();
    let (tx, rx) = ring.split();

    let (producer, consumer) = thread::scope(|s| {
        let producer = s.spawn(|| run_producer(tx, count, config.producer_core));
        let consumer = s.spawn(|| run_consumer(rx, count, config.consumer_core));

        (
            producer.join().expect("producer thread panicked"),
            consumer.join().expect("consumer thread panicked"),
        )
    });
    let elapsed = start.elapsed();

    let drained = ring.is_empty();
    destroy(&mut handle);

    print_report(config, &producer, &consumer, elapsed);

    Ok(consumer.violations == 0 && producer.pushed == consumer.popped && drained)
}

fn print_report(
    config: &StressConfig,
    producer: &ProducerReport,
    consumer: &ConsumerReport,
    elapsed: Duration,
) {
    let rate = consumer.popped as f64 / elapsed.as_secs_f64();
    let ns_per_op = elapsed.as_nanos() as f64 / consumer.popped.max(1) as f64;

    println!("\n📊 STRESS RESULTS");
    println!("=================");
    println!("   Duration:    {:.3}s", elapsed.as_secs_f64());
    println!("   Pushed:      {}", producer.pushed);
    println!("   Popped:      {}", consumer.popped);
    println!("   Throughput:  {:.2} M values/sec", rate / 1_000_000.0);
    println!("   Per value:   {:.2} ns", ns_per_op);

    if config.verbose {
        println!("   Full spins:  {}", producer.full_spins);
        println!("   Empty spins: {}", consumer.empty_spins);
    }

    match consumer.first_violation {
        None => println!("\n✅ FIFO order preserved, no drops or duplicates"),
        Some((index, value)) => println!(
            "\n❌ {} ordering violations (first at #{}: got {}, expected {})",
            consumer.violations,
            index,
            value,
            value_at(index)
        ),
    }
}

fn main() -> ExitCode {
    spsc_ring::trace::init_tracing();
    let config = StressConfig::parse();

    match run_stress(&config) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("❌ Stress error: {}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<StressConfig, clap::Error> {
        StressConfig::try_parse_from(std::iter::once("spsc_stress").chain(args.iter().copied()))
    }

    #[test]
    fn test_rejects_capacity_without_usable_slot() {
        assert!(parse(&["--capacity", "1", "--count", "5"]).is_err());
        assert!(parse(&["--capacity", "0"]).is_err());
        assert!(parse(&["--capacity", "6"]).is_err());
        assert_eq!(parse(&["--capacity", "2"]).unwrap().capacity, 2);
    }

    #[test]
    fn test_rejects_out_of_range_core() {
        let too_big = MAX_CPUS.saturating_add(1).max(5000).to_string();
        if MAX_CPUS != usize::MAX {
            assert!(parse(&["--producer-core", &too_big]).is_err());
            assert!(parse(&["--consumer-core", &MAX_CPUS.to_string()]).is_err());
        }
        let config = parse(&["--producer-core", "0", "--consumer-core", "0"]).unwrap();
        assert_eq!(config.producer_core, Some(0));
        assert_eq!(config.consumer_core, Some(0));
    }

    #[test]
    fn test_count_limited_to_unique_sequence() {
        let max = u64::from(u32::MAX);
        assert_eq!(parse(&["--count", &max.to_string()]).unwrap().count, max);
        assert!(parse(&["--count", &(max + 1).to_string()]).is_err());
        assert_ne!(value_at(0), value_at(max));
        assert_eq!(value_at(1), 1);
    }

    #[test]
    fn test_smallest_ring_completes() {
        let config = parse(&["--capacity", "2", "--count", "10000"]).unwrap();
        assert_eq!(run_stress(&config), Ok(true));
    }
}

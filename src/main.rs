//! spsc-ring demo
//!
//! Menjalankan skenario dasar ring buffer (push sampai penuh, pop semua,
//! drain tanpa output, destroy) lalu menjalankan cycle wrap-around penuh.
//!
//! Usage:
//!   cargo run --release
//!   cargo run --release --features tracing   (dengan log lifecycle)

use std::process::ExitCode;
use std::time::Instant;

use spsc_ring::{destroy, Ring, RingError, Value};

fn main() -> ExitCode {
    spsc_ring::trace::init_tracing();

    println!("🚀 spsc-ring - Lock-Free SPSC Ring Buffer");
    println!("==========================================\n");

    if let Err(e) = walkthrough() {
        eprintln!("❌ Failed to initialize ring buffer: {}", e);
        return ExitCode::FAILURE;
    }

    wrap_cycles();

    println!("\n✅ Demo complete!");
    println!("\nTo run two-thread stress: cargo run --release --bin spsc_stress");
    ExitCode::SUCCESS
}

fn walkthrough() -> Result<(), RingError> {
    println!("📦 Walkthrough (capacity 8, usable 7)");
    println!("-------------------------------------");

    let mut handle = Some(Ring::new(8)?);
    let Some(ring) = handle.as_mut() else {
        return Ok(());
    };

    // Push 10 value ke ring dengan 7 slot efektif, 3 terakhir ditolak
    for i in 0..10 {
        if let Err(e) = ring.push(i + 42) {
            println!("  Push {} rejected: {}", i + 42, e);
        }
    }

    if ring.is_full() {
        println!("  Ring buffer is full after pushing 10 elements.");
    } else {
        println!("  Ring buffer is not full after pushing 10 elements.");
    }

    for _ in 0..10 {
        match ring.pop() {
            Ok(value) => println!("  Popped value: {}", value),
            Err(_) => println!("  Failed to pop value, ring buffer is empty."),
        }
    }

    ring.push(52)?;
    ring.push(53)?;

    // Drain tanpa membaca value; pop ketiga gagal karena kosong
    for _ in 0..3 {
        if ring.pop_into(None).is_err() {
            println!("  Drain found ring empty.");
        }
    }

    if ring.is_empty() {
        println!("  Ring buffer is empty after operations.");
    } else {
        println!("  Ring buffer still has elements.");
    }

    destroy(&mut handle);
    println!("  Ring destroyed: handle cleared = {}\n", handle.is_none());

    Ok(())
}

/// Fill-to-full lalu drain-to-empty berulang kali untuk beberapa kapasitas.
///
/// Setiap cycle memverifikasi urutan dan melaporkan biaya per value.
fn wrap_cycles() {
    println!("📊 Wrap-around cycles (fill to full, drain to empty)");
    println!("---------------------------------------------------");
    println!("  {:>8} {:>8} {:>12} {:>10}", "capacity", "cycles", "values", "ns/value");

    const VALUES_PER_RUN: usize = 2_000_000;

    for capacity in [4usize, 64, 4096] {
        let mut ring = match Ring::new(capacity) {
            Ok(ring) => ring,
            Err(e) => {
                eprintln!("  Skipped capacity {}: {}", capacity, e);
                continue;
            }
        };

        let cycles = VALUES_PER_RUN / ring.usable_capacity();
        let mut next_push: Value = 0;
        let mut next_pop: Value = 0;
        let mut out_of_order = 0u64;

        let start = Instant::now();
        for _ in 0..cycles {
            while ring.push(next_push).is_ok() {
                next_push = next_push.wrapping_add(1);
            }
            while let Ok(value) = ring.pop() {
                if value != next_pop {
                    out_of_order += 1;
                }
                next_pop = next_pop.wrapping_add(1);
            }
        }
        let elapsed = start.elapsed();

        let values = cycles * ring.usable_capacity();
        println!(
            "  {:>8} {:>8} {:>12} {:>10.2}",
            capacity,
            cycles,
            values,
            elapsed.as_nanos() as f64 / values.max(1) as f64
        );

        if out_of_order > 0 || next_push != next_pop {
            println!("  ❌ {} values out of order", out_of_order);
        }
    }
}

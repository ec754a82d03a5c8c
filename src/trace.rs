//! Tracing untuk lifecycle ring buffer
//!
//! Aktif dengan `--features tracing`. Tanpa feature, semua macro jadi no-op
//! sehingga tidak ada overhead sama sekali.

/// Inisialisasi tracing subscriber.
///
/// Filter diambil dari `RUST_LOG`, default `spsc_ring=debug`.
/// Tidak melakukan apa-apa jika feature `tracing` tidak aktif.
#[cfg(feature = "tracing")]
pub fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("spsc_ring=debug"));

    // try_init: aman dipanggil berkali-kali (misalnya dari beberapa test)
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_names(true)
                .with_timer(fmt::time::uptime()),
        )
        .with(filter)
        .try_init();
}

#[cfg(not(feature = "tracing"))]
pub const fn init_tracing() {}

#[cfg(feature = "tracing")]
pub(crate) use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
macro_rules! debug_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
macro_rules! warn_noop {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub(crate) use debug_noop as debug;
#[cfg(not(feature = "tracing"))]
pub(crate) use warn_noop as warn;

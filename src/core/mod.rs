//! Core module: Lock-Free SPSC Ring Buffer
//!
//! Prinsip desain:
//! - Lock-Free: Hanya atomic load/store, tidak ada Mutex/RwLock
//! - Non-Blocking: Full/empty langsung dilaporkan, tidak pernah menunggu
//! - No-Allocation: Slot storage pre-allocated saat init

mod error;
mod ring;
mod sync;

pub use error::{Result, RingError};
pub use ring::{destroy, Consumer, Producer, Ring, Value};

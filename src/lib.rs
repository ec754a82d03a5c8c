//! spsc-ring - Lock-Free Single-Producer Single-Consumer Ring Buffer
//!
//! Arsitektur:
//! - Fixed capacity: power of 2, satu slot dikorbankan untuk deteksi penuh
//! - Lock-Free: cursor baca/tulis atomic dengan Acquire/Release
//! - Type-safe roles: `Ring::split` menghasilkan satu `Producer` dan satu `Consumer`
//!
//! ```
//! use spsc_ring::{Ring, RingError};
//!
//! let mut ring = Ring::new(4).unwrap();
//! ring.push(11).unwrap();
//! assert_eq!(ring.pop(), Ok(11));
//! assert_eq!(ring.pop(), Err(RingError::Empty));
//! ```

pub mod core;
pub mod trace;

pub use crate::core::{destroy, Consumer, Producer, Result, Ring, RingError, Value};

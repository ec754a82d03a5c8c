//! Error type untuk ring buffer
//!
//! Hanya ada dua kelompok kegagalan: parameter konstruksi yang tidak valid,
//! dan kondisi full/empty yang normal terjadi saat operasi.

use thiserror::Error;

/// Error dari operasi ring buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RingError {
    /// Kapasitas 0 tidak diizinkan
    #[error("ring capacity must be greater than zero")]
    ZeroCapacity,

    /// Kapasitas harus power of 2 agar masking bisa dipakai
    #[error("ring capacity {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// Alokasi slot storage gagal
    #[error("failed to allocate {0} ring slots")]
    AllocFailed(usize),

    /// Push ditolak, buffer penuh
    #[error("ring is full")]
    Full,

    /// Pop ditolak, buffer kosong
    #[error("ring is empty")]
    Empty,
}

impl RingError {
    /// `true` untuk error saat konstruksi (tidak ada instance yang dibuat)
    pub const fn is_capacity(&self) -> bool {
        matches!(
            self,
            Self::ZeroCapacity | Self::NotPowerOfTwo(_) | Self::AllocFailed(_)
        )
    }
}

/// Result alias untuk operasi ring
pub type Result<T> = std::result::Result<T, RingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_classification() {
        assert!(RingError::ZeroCapacity.is_capacity());
        assert!(RingError::NotPowerOfTwo(3).is_capacity());
        assert!(RingError::AllocFailed(1 << 20).is_capacity());
        assert!(!RingError::Full.is_capacity());
        assert!(!RingError::Empty.is_capacity());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            RingError::NotPowerOfTwo(6).to_string(),
            "ring capacity 6 is not a power of two"
        );
        assert_eq!(RingError::Full.to_string(), "ring is full");
    }
}

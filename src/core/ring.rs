//! Lock-Free Single-Producer Single-Consumer (SPSC) Ring Buffer
//!
//! Lamport queue untuk nilai integer dengan kapasitas tetap (power of 2).
//! Satu slot sengaja dikorbankan: `read == write` berarti kosong,
//! `write + 1 == read` (setelah masking) berarti penuh. Tidak perlu counter
//! atau flag tambahan.
//!
//! Memory ordering:
//! - Cursor milik sendiri dibaca `Relaxed`
//! - Cursor milik thread lain dibaca `Acquire`
//! - Cursor milik sendiri dipublish dengan `Release`

use crossbeam_utils::CachePadded;

use super::error::{Result, RingError};
use super::sync::{AtomicUsize, Ordering, UnsafeCell};
use crate::trace;

/// Payload ring buffer (integer fixed-width, misalnya file descriptor)
pub type Value = i32;

/// Lock-Free SPSC Ring Buffer
///
/// Cursor baca dan tulis berada di cache line terpisah untuk menghindari
/// false sharing antara producer dan consumer.
///
/// Dari satu thread, `push`/`pop` bisa dipanggil langsung (`&mut self`).
/// Untuk dua thread, gunakan [`Ring::split`].
pub struct Ring {
    // Consumer side - hanya consumer yang menulis
    read: CachePadded<AtomicUsize>,
    // Producer side - hanya producer yang menulis
    write: CachePadded<AtomicUsize>,
    // Pre-allocated slot storage - tidak ada alokasi setelah init
    slots: Box<[UnsafeCell<Value>]>,
    // capacity - 1, untuk wrapping cursor
    mask: usize,
}

// SAFETY: Ring aman untuk Send/Sync karena:
// - Lewat `&Ring` hanya predicate atomic (is_empty/is_full/len) yang bisa dipanggil
// - Slot hanya ditulis lewat `&mut Ring` atau `Producer`, dan hanya dibaca lewat
//   `&mut Ring` atau `Consumer`; `split` meminjam ring secara eksklusif sehingga
//   paling banyak ada satu producer dan satu consumer
// - Release/Acquire pada cursor menjamin visibility isi slot
unsafe impl Send for Ring {}
unsafe impl Sync for Ring {}

impl Ring {
    /// Membuat ring buffer baru. `capacity` HARUS power of 2 dan > 0.
    ///
    /// Alokasi hanya terjadi sekali di sini. Kapasitas efektif adalah
    /// `capacity - 1` karena satu slot dikorbankan untuk membedakan
    /// penuh dan kosong.
    ///
    /// # Errors
    /// - [`RingError::ZeroCapacity`] jika `capacity == 0`
    /// - [`RingError::NotPowerOfTwo`] jika bukan power of 2
    /// - [`RingError::AllocFailed`] jika slot storage gagal dialokasi
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            trace::warn!("rejected ring capacity 0");
            return Err(RingError::ZeroCapacity);
        }
        if !capacity.is_power_of_two() {
            trace::warn!(capacity, "rejected ring capacity: not a power of two");
            return Err(RingError::NotPowerOfTwo(capacity));
        }

        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| RingError::AllocFailed(capacity))?;
        slots.extend((0..capacity).map(|_| UnsafeCell::new(0)));

        trace::debug!(capacity, "ring created");

        Ok(Self {
            read: CachePadded::new(AtomicUsize::new(0)),
            write: CachePadded::new(AtomicUsize::new(0)),
            slots: slots.into_boxed_slice(),
            mask: capacity - 1,
        })
    }

    /// Push value ke buffer (single-thread).
    ///
    /// Returns [`RingError::Full`] jika buffer penuh; value dibuang.
    #[inline(always)]
    pub fn push(&mut self, value: Value) -> Result<()> {
        self.produce(value)
    }

    /// Pop value dari buffer (single-thread).
    ///
    /// Returns [`RingError::Empty`] jika buffer kosong.
    #[inline(always)]
    pub fn pop(&mut self) -> Result<Value> {
        let mut value = 0;
        self.consume(Some(&mut value))?;
        Ok(value)
    }

    /// Pop dengan output opsional.
    ///
    /// `None` membuang value tapi tetap memajukan cursor baca.
    /// Jika kosong, `out` tidak disentuh.
    #[inline(always)]
    pub fn pop_into(&mut self, out: Option<&mut Value>) -> Result<()> {
        self.consume(out)
    }

    /// Cek apakah buffer kosong (perspektif consumer)
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);
        self.empty(read, write)
    }

    /// Cek apakah buffer penuh (perspektif producer)
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        let read = self.read.load(Ordering::Acquire);
        let write = self.write.load(Ordering::Relaxed);
        self.full(read, write)
    }

    /// Jumlah elemen dalam buffer (snapshot)
    #[inline(always)]
    pub fn len(&self) -> usize {
        let write = self.write.load(Ordering::Acquire);
        let read = self.read.load(Ordering::Acquire);
        write.wrapping_sub(read)
    }

    /// Kapasitas buffer (jumlah slot)
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.mask + 1
    }

    /// Jumlah value yang bisa ditampung sekaligus: `capacity - 1`
    #[inline(always)]
    pub const fn usable_capacity(&self) -> usize {
        self.mask
    }

    /// Memecah ring menjadi handle producer dan consumer.
    ///
    /// Ring dipinjam secara eksklusif selama kedua handle hidup, jadi
    /// tidak mungkin ada producer/consumer kedua, dan ring tidak bisa
    /// di-destroy sebelum kedua thread selesai.
    pub fn split(&mut self) -> (Producer<'_>, Consumer<'_>) {
        trace::debug!(capacity = self.capacity(), len = self.len(), "ring split");
        let ring: &Ring = self;
        (Producer { ring }, Consumer { ring })
    }

    #[inline(always)]
    fn empty(&self, read: usize, write: usize) -> bool {
        (read & self.mask) == (write & self.mask)
    }

    #[inline(always)]
    fn full(&self, read: usize, write: usize) -> bool {
        (write.wrapping_add(1) & self.mask) == (read & self.mask)
    }

    /// Producer path. Caller harus satu-satunya producer yang aktif.
    #[inline(always)]
    fn produce(&self, value: Value) -> Result<()> {
        let write = self.write.load(Ordering::Relaxed);
        let read = self.read.load(Ordering::Acquire);

        if self.full(read, write) {
            return Err(RingError::Full);
        }

        // SAFETY: slot ini di luar jangkauan consumer sampai cursor tulis dipublish
        self.slots[write & self.mask].with_mut(|slot| unsafe { slot.write(value) });

        // Release: tulisan slot di atas visible sebelum cursor tulis berubah
        self.write.store(write.wrapping_add(1), Ordering::Release);

        Ok(())
    }

    /// Consumer path. Caller harus satu-satunya consumer yang aktif.
    #[inline(always)]
    fn consume(&self, out: Option<&mut Value>) -> Result<()> {
        let read = self.read.load(Ordering::Relaxed);
        let write = self.write.load(Ordering::Acquire);

        if self.empty(read, write) {
            return Err(RingError::Empty);
        }

        if let Some(out) = out {
            // SAFETY: Acquire di atas menjamin slot sudah ditulis penuh oleh producer,
            // dan producer tidak menyentuhnya lagi sampai cursor baca maju
            *out = self.slots[read & self.mask].with(|slot| unsafe { slot.read() });
        }

        // Release: slot boleh dipakai ulang producer setelah ini
        self.read.store(read.wrapping_add(1), Ordering::Release);

        Ok(())
    }
}

impl std::fmt::Debug for Ring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ring")
            .field("capacity", &self.capacity())
            .field("read", &self.read.load(Ordering::Relaxed))
            .field("write", &self.write.load(Ordering::Relaxed))
            .finish()
    }
}

/// Membebaskan ring dan mengosongkan handle milik caller.
///
/// Handle yang sudah `None` tidak melakukan apa-apa. Karena `split`
/// meminjam ring, fungsi ini hanya bisa dipanggil setelah producer dan
/// consumer selesai.
pub fn destroy(ring: &mut Option<Ring>) {
    if let Some(ring) = ring.take() {
        trace::debug!(capacity = ring.capacity(), len = ring.len(), "ring destroyed");
        drop(ring);
    }
}

/// Handle producer - satu-satunya yang boleh push selama split aktif
#[derive(Debug)]
pub struct Producer<'a> {
    ring: &'a Ring,
}

// Tanpa is_empty: cursor baca milik consumer
#[allow(clippy::len_without_is_empty)]
impl Producer<'_> {
    /// Push value. Returns [`RingError::Full`] jika buffer penuh.
    #[inline(always)]
    pub fn push(&mut self, value: Value) -> Result<()> {
        self.ring.produce(value)
    }

    /// Cek penuh dari sisi producer (read `Acquire`, write `Relaxed`)
    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.ring.is_full()
    }

    /// Snapshot jumlah elemen; consumer bisa mengurangi nilainya kapan saja
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Jumlah slot ring
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.ring.capacity()
    }
}

/// Handle consumer - satu-satunya yang boleh pop selama split aktif
#[derive(Debug)]
pub struct Consumer<'a> {
    ring: &'a Ring,
}

impl Consumer<'_> {
    /// Pop value. Returns [`RingError::Empty`] jika buffer kosong.
    #[inline(always)]
    pub fn pop(&mut self) -> Result<Value> {
        let mut value = 0;
        self.ring.consume(Some(&mut value))?;
        Ok(value)
    }

    /// Pop dengan output opsional, lihat [`Ring::pop_into`]
    #[inline(always)]
    pub fn pop_into(&mut self, out: Option<&mut Value>) -> Result<()> {
        self.ring.consume(out)
    }

    /// Cek kosong dari sisi consumer (read `Relaxed`, write `Acquire`)
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Snapshot jumlah elemen; producer bisa menambah nilainya kapan saja
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.ring.len()
    }

    /// Jumlah slot ring
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.ring.capacity()
    }
}

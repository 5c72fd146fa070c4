//! # **MemoryPool Module** - *Pluggable, 64-byte aligned allocation*
//!
//! All array storage in Minicol is carved out of pool allocations, so the
//! allocator is injectable end to end: buffer construction and the
//! conversion engine both accept an explicit pool, and fall back to the
//! process-wide default otherwise.
//!
//! ## Behaviour
//! - Every allocation is 64-byte aligned for predictable SIMD performance
//!   downstream. This is a hard guarantee of the pool contract, not a
//!   best-effort hint.
//! - `SystemPool` zero-initialises by default; an uninitialised variant is
//!   available for callers that overwrite every byte before publishing.
//! - Allocation failure surfaces as `MinicolError::OutOfMemory` on the
//!   requesting operation. It is never globally fatal.
//! - `CappedPool` wraps any pool with a byte budget, which is the easiest
//!   way to exercise the out-of-memory path deterministically in tests.

use std::alloc::{self, Layout};
use std::fmt;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

use crate::enums::error::MinicolError;

/// Alignment, in bytes, of every pool allocation.
pub const ALIGNMENT: usize = 64;

/// Injectable allocator used for all buffer storage.
///
/// Implementations must be thread-safe: buffers are reference-counted and
/// the final release (and therefore `deallocate`) can happen on any thread.
pub trait MemoryPool: Send + Sync + fmt::Debug {
    /// Allocates `n_bytes` of 64-byte aligned memory.
    ///
    /// Whether the region is zero-initialised is a property of the pool.
    fn allocate(&self, n_bytes: usize) -> Result<NonNull<u8>, MinicolError>;

    /// Releases a region previously returned by `allocate` on this pool.
    fn deallocate(&self, ptr: NonNull<u8>, n_bytes: usize);

    /// Bytes currently allocated and not yet released.
    fn bytes_allocated(&self) -> usize;
}

#[inline]
fn layout_for(n_bytes: usize) -> Layout {
    // Size 0 never reaches the system allocator; see Region::new.
    Layout::from_size_align(n_bytes, ALIGNMENT).expect("allocation size overflows layout")
}

/// # SystemPool
///
/// Default pool over the system allocator with an atomic byte counter.
#[derive(Debug)]
pub struct SystemPool {
    zeroed: bool,
    allocated: AtomicUsize,
}

impl SystemPool {
    /// Zero-initialising pool.
    pub fn new() -> Self {
        Self {
            zeroed: true,
            allocated: AtomicUsize::new(0),
        }
    }

    /// Pool returning uninitialised regions. Callers must write every byte
    /// they later read.
    pub fn uninitialised() -> Self {
        Self {
            zeroed: false,
            allocated: AtomicUsize::new(0),
        }
    }
}

impl Default for SystemPool {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPool for SystemPool {
    fn allocate(&self, n_bytes: usize) -> Result<NonNull<u8>, MinicolError> {
        let layout = layout_for(n_bytes);
        let raw = unsafe {
            if self.zeroed {
                alloc::alloc_zeroed(layout)
            } else {
                alloc::alloc(layout)
            }
        };
        match NonNull::new(raw) {
            Some(ptr) => {
                self.allocated.fetch_add(n_bytes, Ordering::Relaxed);
                Ok(ptr)
            }
            None => Err(MinicolError::OutOfMemory {
                requested: n_bytes,
            }),
        }
    }

    fn deallocate(&self, ptr: NonNull<u8>, n_bytes: usize) {
        unsafe { alloc::dealloc(ptr.as_ptr(), layout_for(n_bytes)) };
        self.allocated.fetch_sub(n_bytes, Ordering::Relaxed);
    }

    fn bytes_allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }
}

/// # CappedPool
///
/// Wraps another pool with a hard byte budget. Requests that would push the
/// outstanding total past the cap fail with `OutOfMemory` without touching
/// the inner pool.
#[derive(Debug)]
pub struct CappedPool {
    inner: Arc<dyn MemoryPool>,
    cap: usize,
    used: AtomicUsize,
}

impl CappedPool {
    pub fn new(inner: Arc<dyn MemoryPool>, cap: usize) -> Self {
        Self {
            inner,
            cap,
            used: AtomicUsize::new(0),
        }
    }

    /// Capped view over the process-wide default pool.
    pub fn with_cap(cap: usize) -> Self {
        Self::new(global_pool(), cap)
    }
}

impl MemoryPool for CappedPool {
    fn allocate(&self, n_bytes: usize) -> Result<NonNull<u8>, MinicolError> {
        let prior = self.used.fetch_add(n_bytes, Ordering::SeqCst);
        if prior + n_bytes > self.cap {
            self.used.fetch_sub(n_bytes, Ordering::SeqCst);
            return Err(MinicolError::OutOfMemory {
                requested: n_bytes,
            });
        }
        match self.inner.allocate(n_bytes) {
            Ok(ptr) => Ok(ptr),
            Err(e) => {
                self.used.fetch_sub(n_bytes, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    fn deallocate(&self, ptr: NonNull<u8>, n_bytes: usize) {
        self.inner.deallocate(ptr, n_bytes);
        self.used.fetch_sub(n_bytes, Ordering::SeqCst);
    }

    fn bytes_allocated(&self) -> usize {
        self.used.load(Ordering::SeqCst)
    }
}

static GLOBAL_POOL: OnceLock<Arc<dyn MemoryPool>> = OnceLock::new();

/// Process-wide default pool. Overridable per call via the `*_in`
/// constructors on buffers and the conversion engine.
pub fn global_pool() -> Arc<dyn MemoryPool> {
    GLOBAL_POOL
        .get_or_init(|| Arc::new(SystemPool::new()))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_pool_allocates_aligned_and_zeroed() {
        let pool = SystemPool::new();
        let ptr = pool.allocate(256).unwrap();
        assert_eq!(ptr.as_ptr() as usize % ALIGNMENT, 0);
        let bytes = unsafe { std::slice::from_raw_parts(ptr.as_ptr(), 256) };
        assert!(bytes.iter().all(|&b| b == 0));
        assert_eq!(pool.bytes_allocated(), 256);
        pool.deallocate(ptr, 256);
        assert_eq!(pool.bytes_allocated(), 0);
    }

    #[test]
    fn test_capped_pool_enforces_budget() {
        let pool = CappedPool::new(Arc::new(SystemPool::new()), 128);
        let a = pool.allocate(64).unwrap();
        let err = pool.allocate(128).unwrap_err();
        assert_eq!(err, MinicolError::OutOfMemory { requested: 128 });
        // Releasing frees budget again.
        pool.deallocate(a, 64);
        let b = pool.allocate(128).unwrap();
        pool.deallocate(b, 128);
        assert_eq!(pool.bytes_allocated(), 0);
    }

    #[test]
    fn test_global_pool_is_shared() {
        let a = global_pool();
        let b = global_pool();
        assert!(Arc::ptr_eq(&a, &b));
    }
}

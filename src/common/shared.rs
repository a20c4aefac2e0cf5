//! Shared, mutable record handles.
//!
//! Drawing records live in a container tree, while anchors and other
//! higher-level views hold on to individual records and write through to them.
//! Every holder of a [`SharedRecord`] sees the same storage: a write through one
//! handle is visible through all the others.
//!
//! # Thread Safety
//!
//! Uses Arc and parking_lot RwLock so handles are Send + Sync. Each read or
//! write of a single record is atomic; multi-field updates that must appear
//! atomic to other threads need external serialization.

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::Arc;

/// A cloneable handle to a record stored in a drawing container tree.
pub struct SharedRecord<T> {
    inner: Arc<RwLock<T>>,
}

impl<T> SharedRecord<T> {
    /// Allocate a new record and return the only handle to it.
    #[inline]
    pub fn new(record: T) -> Self {
        Self {
            inner: Arc::new(RwLock::new(record)),
        }
    }

    /// Lock the record for reading.
    #[inline]
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.inner.read()
    }

    /// Lock the record for writing.
    #[inline]
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.inner.write()
    }

    /// Apply `f` to the record under a write lock.
    #[inline]
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Whether both handles refer to the same record.
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<T: Copy> SharedRecord<T> {
    /// Copy the current field values out of the record.
    #[inline]
    pub fn snapshot(&self) -> T {
        *self.inner.read()
    }
}

impl<T> Clone for SharedRecord<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for SharedRecord<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedRecord<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SharedRecord").field(&*self.read()).finish()
    }
}

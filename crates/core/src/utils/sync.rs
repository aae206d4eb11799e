//! Lock helpers that recover from poisoning instead of panicking.
//!
//! Guarded state in this crate is always replaced wholesale, so a writer that
//! panicked cannot leave a half-built value behind.

use std::sync::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::warn;

pub fn lock<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        warn!("{} lock was poisoned; recovering", what);
        poisoned.into_inner()
    })
}

pub fn read<'a, T>(lock: &'a RwLock<T>, what: &str) -> RwLockReadGuard<'a, T> {
    lock.read().unwrap_or_else(|poisoned| {
        warn!("{} read lock was poisoned; recovering", what);
        poisoned.into_inner()
    })
}

pub fn write<'a, T>(lock: &'a RwLock<T>, what: &str) -> RwLockWriteGuard<'a, T> {
    lock.write().unwrap_or_else(|poisoned| {
        warn!("{} write lock was poisoned; recovering", what);
        poisoned.into_inner()
    })
}

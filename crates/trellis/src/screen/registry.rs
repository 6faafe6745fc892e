//! Process-wide registry of live screens.
//!
//! Every [`Screen`](super::Screen) registers its native window handle on
//! construction and removes it on drop. Platform backends look handles up
//! here to decide whether input for a native window still has a receiver.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use trellis_core::logging::targets;

/// Global registry instance.
static SCREEN_REGISTRY: OnceLock<ScreenRegistry> = OnceLock::new();

/// Handles issued by [`NativeWindowHandle::unique`] start here, far above
/// anything a windowing backend is likely to hand out.
static NEXT_HEADLESS: AtomicU64 = AtomicU64::new(1 << 48);

/// Opaque identifier of a native window, as issued by the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeWindowHandle(u64);

impl NativeWindowHandle {
    /// Wrap a backend handle.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// A fresh handle for a screen without a native window.
    pub fn unique() -> Self {
        Self(NEXT_HEADLESS.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// What the registry knows about a live screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    pub caption: String,
}

/// Map from native window handle to live screen.
pub struct ScreenRegistry {
    screens: RwLock<HashMap<NativeWindowHandle, RegistryEntry>>,
}

impl ScreenRegistry {
    fn new() -> Self {
        Self {
            screens: RwLock::new(HashMap::new()),
        }
    }

    /// The global registry, created on first use.
    pub fn global() -> &'static ScreenRegistry {
        SCREEN_REGISTRY.get_or_init(ScreenRegistry::new)
    }

    /// Record a screen for `handle`, replacing any previous entry.
    pub fn register(&self, handle: NativeWindowHandle, entry: RegistryEntry) {
        let previous = self.screens.write().insert(handle, entry);
        if previous.is_some() {
            tracing::warn!(target: targets::SCREEN, ?handle, "native window registered twice");
        }
        tracing::debug!(target: targets::SCREEN, ?handle, "screen registered");
    }

    /// Remove the entry for `handle`.
    pub fn unregister(&self, handle: NativeWindowHandle) -> Option<RegistryEntry> {
        let entry = self.screens.write().remove(&handle);
        if entry.is_some() {
            tracing::debug!(target: targets::SCREEN, ?handle, "screen unregistered");
        }
        entry
    }

    pub fn contains(&self, handle: NativeWindowHandle) -> bool {
        self.screens.read().contains_key(&handle)
    }

    pub fn get(&self, handle: NativeWindowHandle) -> Option<RegistryEntry> {
        self.screens.read().get(&handle).cloned()
    }

    /// Number of live screens.
    pub fn count(&self) -> usize {
        self.screens.read().len()
    }

    pub fn handles(&self) -> Vec<NativeWindowHandle> {
        self.screens.read().keys().copied().collect()
    }
}

static_assertions::assert_impl_all!(ScreenRegistry: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_unregister() {
        let registry = ScreenRegistry::new();
        let handle = NativeWindowHandle::new(7);
        registry.register(
            handle,
            RegistryEntry {
                caption: "main".into(),
            },
        );
        assert!(registry.contains(handle));
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.get(handle).map(|e| e.caption), Some("main".to_owned()));

        assert!(registry.unregister(handle).is_some());
        assert!(!registry.contains(handle));
        assert!(registry.unregister(handle).is_none());
    }

    #[test]
    fn test_global_instance() {
        let a = ScreenRegistry::global();
        let b = ScreenRegistry::global();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_unique_handles_differ() {
        assert_ne!(NativeWindowHandle::unique(), NativeWindowHandle::unique());
    }
}

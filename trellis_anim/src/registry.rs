// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The animation registry: keyed interpolations evaluated against a clock.

use core::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::{Equivalent, HashMap};
use parking_lot::Mutex;

use crate::clock::{Clock, MonotonicClock};
use crate::easing::{Easing, lerp};

/// Opaque token for an animation started with [`Animations::start`].
///
/// Handles are unique per registry, so two independent callers can never
/// collide on the same entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnimHandle(u64);

/// Owned map key.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Key {
    Handle(u64),
    Named { namespace: Box<str>, name: Box<str> },
}

/// Borrowed lookup key; hashes identically to [`Key`].
#[derive(Copy, Clone, Debug)]
enum KeyRef<'a> {
    Handle(u64),
    Named(&'a str, &'a str),
}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Handle(id) => KeyRef::Handle(*id).hash(state),
            Self::Named { namespace, name } => KeyRef::Named(namespace, name).hash(state),
        }
    }
}

impl Hash for KeyRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match *self {
            Self::Handle(id) => {
                state.write_u8(0);
                id.hash(state);
            }
            Self::Named(namespace, name) => {
                state.write_u8(1);
                namespace.hash(state);
                name.hash(state);
            }
        }
    }
}

impl Equivalent<Key> for KeyRef<'_> {
    fn equivalent(&self, key: &Key) -> bool {
        match (*self, key) {
            (Self::Handle(a), Key::Handle(b)) => a == *b,
            (Self::Named(ns, n), Key::Named { namespace, name }) => {
                ns == &**namespace && n == &**name
            }
            _ => false,
        }
    }
}

impl KeyRef<'_> {
    fn to_owned_key(self) -> Key {
        match self {
            Self::Handle(id) => Key::Handle(id),
            Self::Named(namespace, name) => Key::Named {
                namespace: namespace.into(),
                name: name.into(),
            },
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Phase {
    Running,
    /// Elapsed time passed the duration on a previous tick; removed on the next one.
    Expiring,
}

#[derive(Clone, Debug)]
struct Entry {
    from: f64,
    to: f64,
    start_ms: u64,
    duration_ms: u64,
    easing: Easing,
    phase: Phase,
}

impl Entry {
    fn elapsed(&self, now: u64) -> u64 {
        now.saturating_sub(self.start_ms)
    }

    fn finished(&self, now: u64) -> bool {
        self.elapsed(now) > self.duration_ms
    }

    fn progress(&self, now: u64) -> f64 {
        if self.duration_ms == 0 {
            return 1.0;
        }
        (self.elapsed(now) as f64 / self.duration_ms as f64).clamp(0.0, 1.0)
    }

    fn value(&self, now: u64) -> f64 {
        lerp(self.from, self.to, self.easing.apply(self.progress(now)))
    }
}

/// Registry of in-flight interpolations.
///
/// Values are computed from elapsed clock time on every read rather than
/// accumulated per frame, so they are frame-rate independent and reading the
/// same key twice in one frame yields the same value.
///
/// All methods take `&self`; the map sits behind a mutex so a registry can be
/// ticked on a simulation thread while a render thread reads it.
///
/// ## Lifecycle
///
/// Call [`Animations::tick`] once per simulation step. An entry whose elapsed
/// time has exceeded its duration is marked for removal on one tick and
/// removed on the next, so its terminal value stays readable for at least
/// one full render pass.
///
/// ```
/// use std::sync::Arc;
/// use trellis_anim::{Animations, Easing, ManualClock};
///
/// let clock = Arc::new(ManualClock::new(0));
/// let anims = Animations::with_clock(Arc::clone(&clock));
///
/// let fade = anims.start(0.0, 100.0, 400, Easing::Linear);
/// clock.advance(200);
/// assert_eq!(anims.get(fade, -1.0), 50.0);
///
/// clock.advance(300);
/// anims.tick(); // marked
/// assert_eq!(anims.get(fade, -1.0), 100.0);
/// anims.tick(); // removed
/// assert_eq!(anims.get(fade, -1.0), -1.0);
/// ```
pub struct Animations<C: Clock = MonotonicClock> {
    clock: C,
    entries: Mutex<HashMap<Key, Entry>>,
    next_handle: AtomicU64,
}

impl<C: Clock> core::fmt::Debug for Animations<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Animations")
            .field("len", &self.len())
            .field("now_ms", &self.clock.now_ms())
            .finish_non_exhaustive()
    }
}

impl Animations {
    /// Create a registry driven by a fresh [`MonotonicClock`].
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock::new())
    }
}

impl Default for Animations {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> Animations<C> {
    /// Create a registry driven by `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            entries: Mutex::new(HashMap::new()),
            next_handle: AtomicU64::new(1),
        }
    }

    /// The clock this registry reads.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Start a new animation from `from` to `to` over `duration_ms`.
    pub fn start(&self, from: f64, to: f64, duration_ms: u64, easing: Easing) -> AnimHandle {
        let handle = AnimHandle(self.next_handle.fetch_add(1, Ordering::Relaxed));
        self.insert(KeyRef::Handle(handle.0), from, to, duration_ms, easing);
        handle
    }

    /// Replace the animation behind `handle`, restarting it from now.
    ///
    /// This works whether or not the previous entry has expired.
    pub fn restart(
        &self,
        handle: AnimHandle,
        from: f64,
        to: f64,
        duration_ms: u64,
        easing: Easing,
    ) {
        self.insert(KeyRef::Handle(handle.0), from, to, duration_ms, easing);
    }

    /// Current value of `handle`, or `default` if it is not registered.
    pub fn get(&self, handle: AnimHandle, default: f64) -> f64 {
        self.value(KeyRef::Handle(handle.0), default)
    }

    /// Current value of `handle` clamped to `[0, 1]`, or `0` if it is not registered.
    ///
    /// Convenient for alpha and progress fractions.
    pub fn get01(&self, handle: AnimHandle) -> f64 {
        self.get(handle, 0.0).clamp(0.0, 1.0)
    }

    /// Whether `handle` is registered and its duration has not yet been exceeded.
    pub fn is_active(&self, handle: AnimHandle) -> bool {
        self.active(KeyRef::Handle(handle.0))
    }

    /// Whether `handle` is registered at all, including entries pending removal.
    pub fn contains(&self, handle: AnimHandle) -> bool {
        self.entries.lock().contains_key(&KeyRef::Handle(handle.0))
    }

    /// Remove `handle` immediately. Returns whether an entry was removed.
    pub fn cancel(&self, handle: AnimHandle) -> bool {
        self.remove(KeyRef::Handle(handle.0))
    }

    /// Remove every entry immediately, without a terminal-value grace period.
    pub fn cancel_all(&self) {
        let mut entries = self.entries.lock();
        tracing::debug!(count = entries.len(), "cancelling all animations");
        entries.clear();
    }

    /// A view over this registry whose string keys all live under `namespace`.
    pub fn scope<'a>(&'a self, namespace: &'a str) -> Scope<'a, C> {
        Scope {
            anims: self,
            namespace,
        }
    }

    /// Number of registered entries, including those pending removal.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether no entries are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Per-step maintenance: two-phase expiry.
    ///
    /// Entries marked on a previous tick are removed; running entries whose
    /// elapsed time exceeds their duration are marked. Returns the number of
    /// entries removed.
    pub fn tick(&self) -> usize {
        let now = self.clock.now_ms();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| match entry.phase {
            Phase::Expiring => false,
            Phase::Running => {
                if entry.finished(now) {
                    entry.phase = Phase::Expiring;
                }
                true
            }
        });
        let removed = before - entries.len();
        if removed > 0 {
            tracing::trace!(removed, remaining = entries.len(), "expired animations");
        }
        removed
    }

    fn insert(&self, key: KeyRef<'_>, from: f64, to: f64, duration_ms: u64, easing: Easing) {
        let entry = Entry {
            from,
            to,
            start_ms: self.clock.now_ms(),
            duration_ms,
            easing,
            phase: Phase::Running,
        };
        tracing::debug!(?key, from, to, duration_ms, "starting animation");
        self.entries.lock().insert(key.to_owned_key(), entry);
    }

    fn value(&self, key: KeyRef<'_>, default: f64) -> f64 {
        let now = self.clock.now_ms();
        self.entries
            .lock()
            .get(&key)
            .map_or(default, |entry| entry.value(now))
    }

    fn active(&self, key: KeyRef<'_>) -> bool {
        let now = self.clock.now_ms();
        self.entries
            .lock()
            .get(&key)
            .is_some_and(|entry| !entry.finished(now))
    }

    fn remove(&self, key: KeyRef<'_>) -> bool {
        let removed = self.entries.lock().remove(&key).is_some();
        if removed {
            tracing::debug!(?key, "cancelled animation");
        }
        removed
    }
}

/// Namespaced string-keyed view of an [`Animations`] registry.
///
/// Two scopes with different namespaces never see each other's entries,
/// even when they use the same names.
#[derive(Debug)]
pub struct Scope<'a, C: Clock = MonotonicClock> {
    anims: &'a Animations<C>,
    namespace: &'a str,
}

impl<C: Clock> Scope<'_, C> {
    /// The namespace this scope prefixes its keys with.
    pub fn namespace(&self) -> &str {
        self.namespace
    }

    /// Start, or replace, the animation called `name`.
    pub fn start(&self, name: &str, from: f64, to: f64, duration_ms: u64, easing: Easing) {
        self.anims.insert(self.key(name), from, to, duration_ms, easing);
    }

    /// Current value of `name`, or `default` if it is not registered.
    pub fn get(&self, name: &str, default: f64) -> f64 {
        self.anims.value(self.key(name), default)
    }

    /// Current value of `name` clamped to `[0, 1]`, or `0` if it is not registered.
    pub fn get01(&self, name: &str) -> f64 {
        self.get(name, 0.0).clamp(0.0, 1.0)
    }

    /// Whether `name` is registered and its duration has not yet been exceeded.
    pub fn is_active(&self, name: &str) -> bool {
        self.anims.active(self.key(name))
    }

    /// Whether `name` is registered at all.
    pub fn contains(&self, name: &str) -> bool {
        self.anims.entries.lock().contains_key(&self.key(name))
    }

    /// Remove `name` immediately. Returns whether an entry was removed.
    pub fn cancel(&self, name: &str) -> bool {
        self.anims.remove(self.key(name))
    }

    /// Remove every entry in this namespace immediately.
    pub fn cancel_all(&self) {
        let namespace = self.namespace;
        self.anims.entries.lock().retain(|key, _| {
            !matches!(key, Key::Named { namespace: ns, .. } if &**ns == namespace)
        });
        tracing::debug!(namespace, "cancelled namespaced animations");
    }

    fn key<'k>(&'k self, name: &'k str) -> KeyRef<'k> {
        KeyRef::Named(self.namespace, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::sync::Arc;

    fn registry() -> (Arc<ManualClock>, Animations<Arc<ManualClock>>) {
        let clock = Arc::new(ManualClock::new(1_000));
        let anims = Animations::with_clock(Arc::clone(&clock));
        (clock, anims)
    }

    #[test]
    fn linear_interpolation_boundaries() {
        let (clock, anims) = registry();
        let scope = anims.scope("test");
        scope.start("k", 0.0, 100.0, 400, Easing::Linear);
        assert_eq!(scope.get("k", -1.0), 0.0);
        clock.advance(200);
        assert!((scope.get("k", -1.0) - 50.0).abs() < 1e-9);
        clock.advance(200);
        assert_eq!(scope.get("k", -1.0), 100.0);
        clock.advance(1_000);
        assert_eq!(scope.get("k", -1.0), 100.0);
    }

    #[test]
    fn missing_key_returns_default() {
        let (_clock, anims) = registry();
        assert_eq!(anims.scope("ns").get("absent", 42.0), 42.0);
        assert_eq!(anims.scope("ns").get01("absent"), 0.0);
    }

    #[test]
    fn reads_are_stable_within_a_frame() {
        let (clock, anims) = registry();
        let h = anims.start(10.0, 20.0, 100, Easing::EaseInOut);
        clock.advance(37);
        let a = anims.get(h, 0.0);
        let b = anims.get(h, 0.0);
        assert_eq!(a, b);
    }

    #[test]
    fn eased_value_uses_curve() {
        let (clock, anims) = registry();
        let h = anims.start(0.0, 1.0, 100, Easing::EaseOut);
        clock.advance(50);
        assert!((anims.get(h, 0.0) - 0.875).abs() < 1e-9);
    }

    #[test]
    fn two_phase_expiry() {
        let (clock, anims) = registry();
        let h = anims.start(0.0, 1.0, 100, Easing::Linear);

        clock.advance(100);
        assert_eq!(anims.tick(), 0);
        assert!(anims.is_active(h), "elapsed == duration is still active");

        clock.advance(1);
        assert_eq!(anims.tick(), 0, "first tick past the end only marks");
        assert!(!anims.is_active(h));
        assert!(anims.contains(h));
        assert_eq!(anims.get(h, -1.0), 1.0, "terminal value stays readable");

        assert_eq!(anims.tick(), 1);
        assert!(!anims.contains(h));
        assert_eq!(anims.get(h, -1.0), -1.0);
    }

    #[test]
    fn restarting_a_key_replaces_it() {
        let (clock, anims) = registry();
        let scope = anims.scope("menu");
        scope.start("slide", 0.0, 10.0, 100, Easing::Linear);
        clock.advance(80);
        scope.start("slide", 100.0, 200.0, 100, Easing::Linear);
        assert_eq!(anims.len(), 1);
        assert_eq!(scope.get("slide", 0.0), 100.0);
        clock.advance(50);
        assert!((scope.get("slide", 0.0) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn restart_revives_an_expiring_handle() {
        let (clock, anims) = registry();
        let h = anims.start(0.0, 1.0, 10, Easing::Linear);
        clock.advance(20);
        anims.tick();
        anims.restart(h, 5.0, 6.0, 10, Easing::Linear);
        anims.tick();
        assert!(anims.contains(h));
        assert_eq!(anims.get(h, 0.0), 5.0);
    }

    #[test]
    fn namespaces_do_not_collide() {
        let (_clock, anims) = registry();
        anims.scope("a").start("x", 1.0, 1.0, 100, Easing::Linear);
        anims.scope("b").start("x", 2.0, 2.0, 100, Easing::Linear);
        assert_eq!(anims.scope("a").get("x", 0.0), 1.0);
        assert_eq!(anims.scope("b").get("x", 0.0), 2.0);

        anims.scope("a").cancel_all();
        assert!(!anims.scope("a").contains("x"));
        assert!(anims.scope("b").contains("x"));
    }

    #[test]
    fn handles_are_unique() {
        let (_clock, anims) = registry();
        let a = anims.start(0.0, 1.0, 10, Easing::Linear);
        let b = anims.start(0.0, 1.0, 10, Easing::Linear);
        assert_ne!(a, b);
        assert_eq!(anims.len(), 2);
    }

    #[test]
    fn cancel_is_immediate() {
        let (_clock, anims) = registry();
        let h = anims.start(0.0, 1.0, 1_000, Easing::Linear);
        let scope = anims.scope("ui");
        scope.start("fade", 0.0, 1.0, 1_000, Easing::Linear);

        assert!(anims.cancel(h));
        assert!(!anims.cancel(h));
        assert!(scope.cancel("fade"));
        assert!(anims.is_empty());

        anims.start(0.0, 1.0, 1_000, Easing::Linear);
        scope.start("fade", 0.0, 1.0, 1_000, Easing::Linear);
        anims.cancel_all();
        assert!(anims.is_empty());
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let (_clock, anims) = registry();
        let h = anims.start(3.0, 9.0, 0, Easing::EaseIn);
        assert_eq!(anims.get(h, 0.0), 9.0);
    }

    #[test]
    fn get01_clamps_overshoot() {
        let (clock, anims) = registry();
        let h = anims.start(0.0, 1.0, 100, Easing::EaseOutBack);
        clock.advance(70);
        assert!(anims.get(h, 0.0) > 1.0);
        assert_eq!(anims.get01(h), 1.0);
    }

    #[test]
    fn concurrent_tick_and_read() {
        let clock = Arc::new(ManualClock::new(0));
        let anims = Arc::new(Animations::with_clock(Arc::clone(&clock)));
        let handles: Vec<_> = (0..64)
            .map(|i| anims.start(0.0, f64::from(i), 10, Easing::Linear))
            .collect();
        clock.advance(50);

        let ticker = {
            let anims = Arc::clone(&anims);
            std::thread::spawn(move || {
                for _ in 0..4 {
                    anims.tick();
                }
            })
        };
        for h in &handles {
            let v = anims.get(*h, -1.0);
            assert!(v >= -1.0);
        }
        ticker.join().unwrap();
        assert!(anims.is_empty());
    }
}

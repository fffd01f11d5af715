//! Process-wide allocation counters for wrapper and closure construction.
//!
//! Counters only ever increase; `snapshot` reads them relaxed. Useful for
//! asserting that a workload constructs the expected number of wrappers and
//! for spotting runaway memo caches in long-lived hosts.
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub host_closures: usize,
    pub unary_adapters: usize,
    pub once_guards: usize,
    pub memo_caches: usize,
    pub memo_entries: usize,
}

static HOST_CLOSURES: AtomicUsize = AtomicUsize::new(0);
static UNARY_ADAPTERS: AtomicUsize = AtomicUsize::new(0);
static ONCE_GUARDS: AtomicUsize = AtomicUsize::new(0);
static MEMO_CACHES: AtomicUsize = AtomicUsize::new(0);
static MEMO_ENTRIES: AtomicUsize = AtomicUsize::new(0);

pub fn record_host_closure() {
    HOST_CLOSURES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_unary_adapter() {
    UNARY_ADAPTERS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_once_guard() {
    ONCE_GUARDS.fetch_add(1, Ordering::Relaxed);
}

pub fn record_memo_cache() {
    MEMO_CACHES.fetch_add(1, Ordering::Relaxed);
}

pub fn record_memo_entry() {
    MEMO_ENTRIES.fetch_add(1, Ordering::Relaxed);
}

pub fn snapshot() -> StatsSnapshot {
    StatsSnapshot {
        host_closures: HOST_CLOSURES.load(Ordering::Relaxed),
        unary_adapters: UNARY_ADAPTERS.load(Ordering::Relaxed),
        once_guards: ONCE_GUARDS.load(Ordering::Relaxed),
        memo_caches: MEMO_CACHES.load(Ordering::Relaxed),
        memo_entries: MEMO_ENTRIES.load(Ordering::Relaxed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::value::Value;

    #[test]
    fn test_counters_advance_on_construction() {
        let before = snapshot();
        let _f = Value::host_fn("probe", 1, |_ctx, _recv, mut args| Ok(args.remove(0)));
        let after = snapshot();
        assert!(after.host_closures > before.host_closures);
    }
}

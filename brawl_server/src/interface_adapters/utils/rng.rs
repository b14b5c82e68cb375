use std::{
    sync::{
        OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

/// Process-unique id for connections and the players they create.
///
/// Seeded from the clock once so ids differ between restarts, then counted up so two
/// sessions accepted in the same instant never collide.
pub fn rand_id() -> u64 {
    static NEXT: OnceLock<AtomicU64> = OnceLock::new();
    let next = NEXT.get_or_init(|| {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_micros() as u64)
            .unwrap_or(1);
        AtomicU64::new(seed)
    });
    next.fetch_add(1, Ordering::Relaxed)
}

// Cycle orchestration: per-pair fan-out, candle memo and the poll loop
pub mod cycle;
pub mod pair_cache;
pub mod scheduler;

pub use cycle::{CycleReport, CycleRunner, FetchParams, PairOutcome};
pub use pair_cache::{CacheEntry, EvictionPolicy, PairCache};
pub use scheduler::{Delay, Scheduler, TokioDelay};

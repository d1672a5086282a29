use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

/// How often a candidate's shadow ray was traced and how often it got through.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LightStatistics {
    pub sampled: u32,
    pub hit: u32,
}

impl LightStatistics {
    /// Fraction of traced shadow rays that reached the light, if any were traced.
    pub fn hit_rate(&self) -> Option<f32> {
        if self.sampled == 0 {
            None
        } else {
            Some(self.hit as f32 / self.sampled as f32)
        }
    }

    fn pack(self) -> u64 {
        ((self.sampled as u64) << 32) | self.hit as u64
    }

    fn unpack(value: u64) -> Self {
        Self {
            sampled: (value >> 32) as u32,
            hit: value as u32,
        }
    }
}

/// Increments produced for one candidate by one estimator call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StatisticsDelta {
    pub sampled: bool,
    pub hit: bool,
}

/// Per-candidate counters shared by every shading point of a render.
///
/// Both counters of an entry live in one atomic word, so lock-free readers
/// always see a pair with `hit <= sampled`. Writers are serialized by a single
/// lock that is held for the duration of one batch only. Counters stop at
/// `u32::MAX`.
pub struct LightStatisticsStore {
    entries: Vec<AtomicU64>,
    batches: Mutex<u64>,
}

impl LightStatisticsStore {
    pub fn new(num_candidates: usize) -> Self {
        Self {
            entries: (0..num_candidates).map(|_| AtomicU64::new(0)).collect(),
            batches: Mutex::new(0),
        }
    }

    pub fn get(&self, index: usize) -> LightStatistics {
        LightStatistics::unpack(self.entries[index].load(Ordering::Relaxed))
    }

    pub fn snapshot(&self) -> Vec<LightStatistics> {
        (0..self.entries.len()).map(|i| self.get(i)).collect()
    }

    /// Applies the increments of one estimator call.
    pub fn apply<I: IntoIterator<Item = (usize, StatisticsDelta)>>(&self, deltas: I) {
        let mut batches = match self.batches.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (index, delta) in deltas {
            // a hit is only ever counted together with its sample
            if !delta.sampled {
                continue;
            }
            // writers hold the lock, so load and store can't interleave
            let entry = &self.entries[index];
            let mut stats = LightStatistics::unpack(entry.load(Ordering::Relaxed));
            stats.sampled = stats.sampled.saturating_add(1);
            if delta.hit {
                stats.hit = stats.hit.saturating_add(1);
            }
            entry.store(stats.pack(), Ordering::Relaxed);
        }
        *batches += 1;
    }

    /// Number of batches applied so far.
    pub fn batches(&self) -> u64 {
        match self.batches.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    pub fn totals(&self) -> LightStatistics {
        self.snapshot()
            .iter()
            .fold(LightStatistics::default(), |acc, stats| LightStatistics {
                sampled: acc.sampled.saturating_add(stats.sampled),
                hit: acc.hit.saturating_add(stats.hit),
            })
    }
}

use crate::error::CounterError;

/// Default number of 8-bit counters a [`CounterMap`] hands out
pub const DEFAULT_MAX_COUNTERS: usize = 1 << 16;

/// The engine's edge counter storage as seen by instrumented code
pub trait CoverageCounters {
    /// Reserves a fresh counter and returns its id
    fn next_counter(&mut self) -> Result<usize, CounterError>;

    fn increment_counter(&mut self, id: usize);

    fn read_counter(&self, id: usize) -> u8;
}

/// In-process table of 8-bit hit counters, laid out the way
/// `-fsanitize-coverage=inline-8bit-counters` lays them out.
#[derive(Debug, Clone)]
pub struct CounterMap {
    counters: Vec<u8>,
    capacity: usize,
}

impl Default for CounterMap {
    fn default() -> Self {
        CounterMap::with_capacity(DEFAULT_MAX_COUNTERS)
    }
}

impl CounterMap {
    pub fn with_capacity(capacity: usize) -> Self {
        CounterMap {
            counters: Vec::new(),
            capacity,
        }
    }

    /// Number of counters handed out so far
    pub fn len(&self) -> usize {
        self.counters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counters.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.counters
    }

    /// Zeroes every counter but keeps the allocated ids
    pub fn reset(&mut self) {
        self.counters.fill(0);
    }
}

impl CoverageCounters for CounterMap {
    fn next_counter(&mut self) -> Result<usize, CounterError> {
        if self.counters.len() >= self.capacity {
            return Err(CounterError::Exhausted {
                capacity: self.capacity,
            });
        }

        self.counters.push(0);
        Ok(self.counters.len() - 1)
    }

    /// Bumps the counter, skipping zero on overflow so a hit edge never
    /// looks unhit. Unknown ids are ignored.
    fn increment_counter(&mut self, id: usize) {
        if let Some(counter) = self.counters.get_mut(id) {
            *counter = match counter.wrapping_add(1) {
                0 => 1,
                value => value,
            };
        }
    }

    fn read_counter(&self, id: usize) -> u8 {
        self.counters.get(id).copied().unwrap_or(0)
    }
}

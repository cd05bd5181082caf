//! Snowflake ID Generator
//!
//! Time-ordered unique ids for friend relations and chat messages.
//!
//! Layout (most significant first): 41 bits of milliseconds since the
//! configured epoch, 5 bits machine id, 5 bits node id, 12 bits sequence.

use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;

const SEQUENCE_MASK: u64 = 0xFFF;

/// Snowflake ID generator
pub struct SnowflakeGenerator {
    epoch: u64,
    machine_id: u64,
    node_id: u64,
    /// (last timestamp, sequence within that millisecond)
    state: Mutex<(u64, u64)>,
}

impl SnowflakeGenerator {
    /// Create a new snowflake generator
    pub fn new(epoch: u64, machine_id: u64, node_id: u64) -> Self {
        Self {
            epoch,
            machine_id: machine_id & 0x1F, // 5 bits
            node_id: node_id & 0x1F,       // 5 bits
            state: Mutex::new((0, 0)),
        }
    }

    /// Generate a new snowflake ID
    pub fn generate(&self) -> i64 {
        let mut state = self.state.lock();
        let mut timestamp = current_timestamp().max(state.0);

        if timestamp == state.0 {
            state.1 = (state.1 + 1) & SEQUENCE_MASK;
            if state.1 == 0 {
                // Sequence exhausted for this millisecond; borrow the next one.
                timestamp += 1;
            }
        } else {
            state.1 = 0;
        }
        state.0 = timestamp;

        let id = (timestamp.saturating_sub(self.epoch) << 22)
            | (self.machine_id << 17)
            | (self.node_id << 12)
            | state.1;

        id as i64
    }

    /// Extract the creation time (unix millis) of an id produced by this generator
    pub fn timestamp_of(&self, snowflake: i64) -> u64 {
        ((snowflake as u64) >> 22) + self.epoch
    }
}

fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Parse snowflake from its decimal string form
pub fn parse(s: &str) -> Option<i64> {
    s.parse::<i64>().ok().filter(|id| *id >= 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    const EPOCH: u64 = 1672531200000;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let generator = SnowflakeGenerator::new(EPOCH, 1, 0);
        let mut last = 0;
        for _ in 0..10_000 {
            let id = generator.generate();
            assert!(id > last);
            last = id;
        }
    }

    #[test]
    fn test_unique_across_threads() {
        let generator = Arc::new(SnowflakeGenerator::new(EPOCH, 1, 0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let generator = generator.clone();
                std::thread::spawn(move || (0..2_000).map(|_| generator.generate()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
    }

    #[test]
    fn test_timestamp_roundtrip() {
        let generator = SnowflakeGenerator::new(EPOCH, 3, 1);
        let before = current_timestamp();
        let id = generator.generate();
        assert!(generator.timestamp_of(id) >= before);
    }

    #[test]
    fn test_parse() {
        assert_eq!(parse("42"), Some(42));
        assert_eq!(parse("-1"), None);
        assert_eq!(parse("abc"), None);
    }
}

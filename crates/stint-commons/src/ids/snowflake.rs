// Snowflake ID generator
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Snowflake ID generator for time-ordered unique identifiers.
///
/// Format (64 bits):
/// - 41 bits: timestamp in milliseconds since custom epoch
/// - 10 bits: node ID
/// - 12 bits: sequence number
pub struct SnowflakeGenerator {
    /// Node ID (0-1023)
    node_id: u16,

    /// Custom epoch (milliseconds since Unix epoch)
    epoch: u64,

    /// State protected by mutex
    state: Mutex<GeneratorState>,
}

struct GeneratorState {
    last_timestamp: u64,
    sequence: u16,
}

impl SnowflakeGenerator {
    /// Custom epoch: 2024-01-01 00:00:00 UTC
    pub const DEFAULT_EPOCH: u64 = 1704067200000;

    /// Maximum node ID
    pub const MAX_NODE_ID: u16 = 1023;

    /// Maximum sequence number
    const MAX_SEQUENCE: u16 = 4095;

    /// Create a new Snowflake ID generator
    pub fn new(node_id: u16) -> Self {
        Self::with_epoch(node_id, Self::DEFAULT_EPOCH)
    }

    /// Create a new Snowflake ID generator with custom epoch
    pub fn with_epoch(node_id: u16, epoch: u64) -> Self {
        assert!(
            node_id <= Self::MAX_NODE_ID,
            "node_id must be <= {}",
            Self::MAX_NODE_ID
        );

        Self {
            node_id,
            epoch,
            state: Mutex::new(GeneratorState {
                last_timestamp: 0,
                sequence: 0,
            }),
        }
    }

    /// Generate the next Snowflake ID
    pub fn next_id(&self) -> Result<i64, String> {
        let mut state = self
            .state
            .lock()
            .map_err(|e| format!("id generator lock poisoned: {}", e))?;

        let mut timestamp = self.current_timestamp()?;

        // Refuse to generate rather than risk duplicate IDs
        if timestamp < state.last_timestamp {
            return Err(format!(
                "Clock moved backwards. Refusing to generate id for {} milliseconds",
                state.last_timestamp - timestamp
            ));
        }

        if timestamp == state.last_timestamp {
            // Same millisecond - increment sequence
            state.sequence = (state.sequence + 1) & Self::MAX_SEQUENCE;

            if state.sequence == 0 {
                // Sequence overflow - wait for next millisecond
                timestamp = self.wait_next_millis(state.last_timestamp)?;
            }
        } else {
            // New millisecond - reset sequence
            state.sequence = 0;
        }

        state.last_timestamp = timestamp;

        let id = ((timestamp - self.epoch) << 22)
            | ((self.node_id as u64) << 12)
            | (state.sequence as u64);

        Ok(id as i64)
    }

    /// Get current timestamp in milliseconds
    fn current_timestamp(&self) -> Result<u64, String> {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .map_err(|e| format!("Failed to get current timestamp: {}", e))
    }

    /// Busy-wait until the clock advances past `last_timestamp`
    fn wait_next_millis(&self, last_timestamp: u64) -> Result<u64, String> {
        let mut timestamp = self.current_timestamp()?;
        while timestamp <= last_timestamp {
            std::hint::spin_loop();
            timestamp = self.current_timestamp()?;
        }
        Ok(timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let gen = SnowflakeGenerator::new(1);
        let mut prev = gen.next_id().unwrap();
        for _ in 0..1000 {
            let next = gen.next_id().unwrap();
            assert!(next > prev, "expected {} > {}", next, prev);
            prev = next;
        }
    }

    #[test]
    fn test_node_id_is_embedded() {
        let gen = SnowflakeGenerator::new(42);
        let id = gen.next_id().unwrap() as u64;
        assert_eq!((id >> 12) & 0x3FF, 42);
    }

    #[test]
    #[should_panic(expected = "node_id must be <=")]
    fn test_node_id_out_of_range_panics() {
        SnowflakeGenerator::new(1024);
    }
}

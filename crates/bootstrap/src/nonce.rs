//! Process-local nonce sequencer.

use alloy_primitives::Address;

use crate::error::Result;
use crate::rpc::ChainClient;

/// Single-writer counter that hands out transaction nonces.
///
/// Seeded from the chain's reported transaction count so externally-mined
/// transactions prior to the run are accounted for. Strictly increasing by
/// exactly one per issued nonce; there is no rollback. If a later stage
/// fails, the run must be restarted with a freshly seeded sequencer.
#[derive(Debug)]
pub struct NonceSequencer {
    next: u64,
    issued: u64,
}

impl NonceSequencer {
    /// Seed the sequencer from the account's current transaction count.
    pub async fn seed(client: &ChainClient, account: Address) -> Result<Self> {
        let count = client.transaction_count(account).await?;
        tracing::debug!(account = %account, start_nonce = count, "Nonce sequencer seeded");
        Ok(Self::starting_at(count))
    }

    /// Create a sequencer starting at a known count.
    pub fn starting_at(count: u64) -> Self {
        Self {
            next: count,
            issued: 0,
        }
    }

    /// Return the nonce to use for the next transaction and advance the
    /// counter.
    pub fn current(&mut self) -> u64 {
        let nonce = self.next;
        self.next += 1;
        self.issued += 1;
        nonce
    }

    /// Number of nonces handed out since seeding.
    pub fn issued(&self) -> u64 {
        self.issued
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_strictly_increasing() {
        let mut seq = NonceSequencer::starting_at(5);
        assert_eq!(seq.current(), 5);
        assert_eq!(seq.current(), 6);
        assert_eq!(seq.current(), 7);
        assert_eq!(seq.issued(), 3);
    }

    #[test]
    fn test_fresh_sequencer_has_issued_nothing() {
        let seq = NonceSequencer::starting_at(0);
        assert_eq!(seq.issued(), 0);
    }

    #[test]
    fn test_nonce_equals_seed_plus_offset() {
        // For transaction i (1-based), the nonce must equal seed + i - 1.
        let seed = 42;
        let mut seq = NonceSequencer::starting_at(seed);
        for i in 1..=10u64 {
            assert_eq!(seq.current(), seed + i - 1);
        }
    }
}

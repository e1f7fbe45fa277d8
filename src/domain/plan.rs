//! Plan: the recurrence descriptor attached 1:1 to a card.

use super::{CardId, DomainError, PlanId};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The smallest recurrence interval the engine accepts, in seconds.
pub const MIN_PLAN_INTERVAL_SECONDS: i64 = 5 * 60;

/// The smallest recurrence interval the engine accepts.
#[must_use]
pub fn min_plan_interval() -> Duration {
    Duration::seconds(MIN_PLAN_INTERVAL_SECONDS)
}

/// Recurrence descriptor for one card.
///
/// `last_created_at` marks the most recent occurrence that was materialized
/// into a card row; the trigger engine advances it by whole intervals while
/// catching up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Plan identifier.
    pub id: PlanId,
    /// The card this plan regenerates.
    pub card_id: CardId,
    /// Recurrence interval, at least [`min_plan_interval`].
    #[serde(with = "serde_seconds")]
    pub interval: Duration,
    /// Timestamp of the most recent materialized occurrence.
    pub last_created_at: DateTime<Utc>,
}

impl Plan {
    /// Validates a recurrence interval against [`min_plan_interval`].
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::IntervalTooShort`] when the interval is below
    /// the floor.
    pub fn validate_interval(interval: Duration) -> Result<(), DomainError> {
        if interval.num_seconds() < MIN_PLAN_INTERVAL_SECONDS {
            return Err(DomainError::IntervalTooShort {
                minimum_minutes: MIN_PLAN_INTERVAL_SECONDS / 60,
                got_seconds: interval.num_seconds(),
            });
        }
        Ok(())
    }
}

/// Serde representation of a [`Duration`] as whole seconds.
pub mod serde_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serializes a duration as its whole-second count.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        value.num_seconds().serialize(serializer)
    }

    /// Deserializes a duration from a whole-second count.
    ///
    /// # Errors
    ///
    /// Propagates deserializer failures.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        i64::deserialize(deserializer).map(Duration::seconds)
    }
}

/// Serde representation of an `Option<Duration>` as optional whole seconds.
pub mod serde_opt_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serializes an optional duration as an optional whole-second count.
    ///
    /// # Errors
    ///
    /// Propagates serializer failures.
    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.map(|d| d.num_seconds()).serialize(serializer)
    }

    /// Deserializes an optional duration from an optional whole-second count.
    ///
    /// # Errors
    ///
    /// Propagates deserializer failures.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<i64>::deserialize(deserializer)?.map(Duration::seconds))
    }
}

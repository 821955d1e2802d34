//! Non-overlapping fixed-duration bucket counts

use super::{check_ordering, AnalyzeError};
use crate::config::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub start: i64,
    pub count: u64,
}

pub struct FixedBucketAggregator {
    bucket_secs: i64,
}

impl FixedBucketAggregator {
    pub fn new(bucket_secs: i64) -> Result<Self, ConfigError> {
        if bucket_secs <= 0 {
            return Err(ConfigError::InvalidValue(format!(
                "bucket duration must be positive, got {}s",
                bucket_secs
            )));
        }
        Ok(Self { bucket_secs })
    }

    /// Partition the raw (non-collapsed) timestamp sequence into
    /// consecutive buckets. The first bucket starts at the first
    /// timestamp; a new bucket starts at the first timestamp at least
    /// `bucket_secs` past the current start. Single forward pass, no
    /// lookback.
    ///
    /// Empty input has no defined first bucket and is always an error.
    pub fn buckets(&self, timestamps: &[i64]) -> Result<Vec<Bucket>, AnalyzeError> {
        if timestamps.is_empty() {
            return Err(AnalyzeError::EmptyInput);
        }
        check_ordering(timestamps.iter().copied())?;

        let mut buckets = Vec::new();
        let mut current = Bucket {
            start: timestamps[0],
            count: 0,
        };
        for &timestamp in timestamps {
            if timestamp - current.start < self.bucket_secs {
                current.count += 1;
            } else {
                buckets.push(current);
                current = Bucket {
                    start: timestamp,
                    count: 1,
                };
            }
        }
        buckets.push(current);

        Ok(buckets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINUTE: i64 = 60;

    #[test]
    fn test_buckets_at_sixty_minutes() {
        // Timestamps at 0, 10 and 70 minutes with 60-minute buckets.
        let timestamps = vec![0, 10 * MINUTE, 70 * MINUTE];
        let aggregator = FixedBucketAggregator::new(60 * MINUTE).unwrap();

        let buckets = aggregator.buckets(&timestamps).unwrap();
        assert_eq!(
            buckets,
            vec![
                Bucket { start: 0, count: 2 },
                Bucket { start: 70 * MINUTE, count: 1 },
            ]
        );
    }

    #[test]
    fn test_boundary_timestamp_opens_new_bucket() {
        // A timestamp exactly bucket_secs past the start belongs to the
        // next bucket.
        let timestamps = vec![0, 59, 60];
        let aggregator = FixedBucketAggregator::new(60).unwrap();

        let buckets = aggregator.buckets(&timestamps).unwrap();
        assert_eq!(
            buckets,
            vec![Bucket { start: 0, count: 2 }, Bucket { start: 60, count: 1 }]
        );
    }

    #[test]
    fn test_every_record_counts() {
        // Duplicates are not collapsed for bucketing.
        let timestamps = vec![5, 5, 5, 5];
        let aggregator = FixedBucketAggregator::new(60).unwrap();

        let buckets = aggregator.buckets(&timestamps).unwrap();
        assert_eq!(buckets, vec![Bucket { start: 5, count: 4 }]);
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let aggregator = FixedBucketAggregator::new(60).unwrap();
        assert_eq!(aggregator.buckets(&[]), Err(AnalyzeError::EmptyInput));
    }

    #[test]
    fn test_out_of_order_input_rejected() {
        let aggregator = FixedBucketAggregator::new(60).unwrap();
        assert!(matches!(
            aggregator.buckets(&[100, 50]),
            Err(AnalyzeError::OrderingViolation { .. })
        ));
    }

    #[test]
    fn test_non_positive_duration_rejected() {
        assert!(FixedBucketAggregator::new(0).is_err());
        assert!(FixedBucketAggregator::new(-60).is_err());
    }
}

use serde::Serialize;

/// Conversion reporting for created vs accepted offers.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConversionStats {
    pub total: u64,
    pub accepted_within_validity: u64,
    pub conversion_rate_percent: f64,
    pub period_description: String,
}

impl ConversionStats {
    /// Derive the rate from raw repository counts. The rate is a reporting
    /// value, so plain f64 division is fine here.
    pub fn from_counts(total: u64, accepted_within_validity: u64, valid_days: i64) -> Self {
        let conversion_rate_percent = if total == 0 {
            0.0
        } else {
            accepted_within_validity as f64 * 100.0 / total as f64
        };
        Self {
            total,
            accepted_within_validity,
            conversion_rate_percent,
            period_description: format!("{valid_days} days"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_offers_yield_zero_rate() {
        let stats = ConversionStats::from_counts(0, 0, 30);
        assert_eq!(stats.conversion_rate_percent, 0.0);
        assert_eq!(stats.period_description, "30 days");
    }

    #[test]
    fn rate_is_percentage_of_total() {
        let stats = ConversionStats::from_counts(4, 1, 14);
        assert_eq!(stats.conversion_rate_percent, 25.0);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.accepted_within_validity, 1);
        assert_eq!(stats.period_description, "14 days");
    }
}

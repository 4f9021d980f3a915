//! Engine configuration

use shared::{AppError, AppResult};

/// Default platform fee, percent of the discounted order amount
pub const DEFAULT_PLATFORM_FEE_PERCENT: i64 = 10;

/// Engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Platform fee withheld from sellers, as an integer percentage 0-100.
    /// Applied to `gross_amount - discount_amount` with floor division.
    pub platform_fee_percent: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            platform_fee_percent: DEFAULT_PLATFORM_FEE_PERCENT,
        }
    }
}

impl EngineConfig {
    /// Create a config with a validated fee percentage
    pub fn new(platform_fee_percent: i64) -> AppResult<Self> {
        if !(0..=100).contains(&platform_fee_percent) {
            return Err(AppError::validation(format!(
                "platform_fee_percent must be 0-100, got {platform_fee_percent}"
            )));
        }
        Ok(Self {
            platform_fee_percent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fee() {
        assert_eq!(EngineConfig::default().platform_fee_percent, 10);
    }

    #[test]
    fn test_fee_bounds() {
        assert!(EngineConfig::new(0).is_ok());
        assert!(EngineConfig::new(100).is_ok());
        assert!(EngineConfig::new(101).is_err());
        assert!(EngineConfig::new(-1).is_err());
    }
}

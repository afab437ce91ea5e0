//! Input validation limits for search configuration

/// Longest path, in hops, a search may be configured to look for (64)
pub const MAX_SEARCH_DEPTH: u32 = 64;

/// Maximum per-lookup timeout (5 minutes)
pub const MAX_LOOKUP_TIMEOUT_MS: u64 = 5 * 60 * 1000;

/// Validation error type
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    SearchDepthTooLarge { depth: u32, max: u32 },
    ZeroSearchDepth,
    LookupTimeoutTooLarge { timeout_ms: u64, max: u64 },
    ZeroLookupTimeout,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SearchDepthTooLarge { depth, max } => {
                write!(f, "Search depth too large: {} hops (max {})", depth, max)
            }
            Self::ZeroSearchDepth => write!(f, "Search depth must be at least 1"),
            Self::LookupTimeoutTooLarge { timeout_ms, max } => {
                write!(f, "Lookup timeout too large: {}ms (max {}ms)", timeout_ms, max)
            }
            Self::ZeroLookupTimeout => write!(f, "Lookup timeout must be non-zero"),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Validate the configured search depth
pub fn validate_search_depth(depth: u32) -> Result<(), ValidationError> {
    if depth == 0 {
        return Err(ValidationError::ZeroSearchDepth);
    }
    if depth > MAX_SEARCH_DEPTH {
        return Err(ValidationError::SearchDepthTooLarge {
            depth,
            max: MAX_SEARCH_DEPTH,
        });
    }
    Ok(())
}

/// Validate the configured lookup timeout
pub fn validate_lookup_timeout(timeout_ms: u64) -> Result<(), ValidationError> {
    if timeout_ms == 0 {
        return Err(ValidationError::ZeroLookupTimeout);
    }
    if timeout_ms > MAX_LOOKUP_TIMEOUT_MS {
        return Err(ValidationError::LookupTimeoutTooLarge {
            timeout_ms,
            max: MAX_LOOKUP_TIMEOUT_MS,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_search_depth() {
        assert!(validate_search_depth(1).is_ok());
        assert!(validate_search_depth(MAX_SEARCH_DEPTH).is_ok());
        assert_eq!(validate_search_depth(0), Err(ValidationError::ZeroSearchDepth));
        assert!(validate_search_depth(MAX_SEARCH_DEPTH + 1).is_err());
    }

    #[test]
    fn test_validate_lookup_timeout() {
        assert!(validate_lookup_timeout(250).is_ok());
        assert!(validate_lookup_timeout(0).is_err());
        assert!(validate_lookup_timeout(MAX_LOOKUP_TIMEOUT_MS + 1).is_err());
    }
}

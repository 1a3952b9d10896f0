use std::sync::OnceLock;

use regex::Regex;

use crate::errors::AppError;

fn ticker_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Covers plain symbols plus class/suffix forms like BRK.B, BTC-USD, ^GSPC, EURUSD=X
    PATTERN.get_or_init(|| Regex::new(r"^[A-Z0-9^][A-Z0-9.\-=^]{0,14}$").expect("valid ticker regex"))
}

/// Trim and uppercase a client-supplied ticker, rejecting anything that
/// cannot be an exchange symbol.
pub fn normalize(raw: &str) -> Result<String, AppError> {
    let ticker = raw.trim().to_uppercase();

    if ticker.is_empty() {
        return Err(AppError::Validation("Ticker cannot be empty".into()));
    }
    if !ticker_pattern().is_match(&ticker) {
        return Err(AppError::Validation(format!("Invalid ticker: {}", raw.trim())));
    }
    Ok(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_uppercases_and_trims() {
        assert_eq!(normalize(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize("brk.b").unwrap(), "BRK.B");
        assert_eq!(normalize("^gspc").unwrap(), "^GSPC");
        assert_eq!(normalize("btc-usd").unwrap(), "BTC-USD");
    }

    #[test]
    fn test_normalize_rejects_malformed() {
        assert!(matches!(normalize("   "), Err(AppError::Validation(_))));
        assert!(matches!(normalize("AA PL"), Err(AppError::Validation(_))));
        assert!(matches!(normalize("../etc"), Err(AppError::Validation(_))));
        assert!(matches!(normalize("ABCDEFGHIJKLMNOP"), Err(AppError::Validation(_))));
    }
}

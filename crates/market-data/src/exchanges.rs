//! Exchange variants tried by multi-exchange search.
//!
//! Indian listings are quoted by the provider with an exchange suffix
//! (`INFY.NS`, `INFY.BO`); everything else is looked up bare.

/// A provider exchange suffix and how it is shown to users.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExchangeVariant {
    /// Suffix appended to the base ticker (e.g., ".NS")
    pub suffix: &'static str,
    /// Short exchange code (e.g., "NSE")
    pub code: &'static str,
    /// Display name (e.g., "National Stock Exchange")
    pub full_name: &'static str,
}

/// Suffixed variants, in the order search tries them.
pub const EXCHANGE_VARIANTS: &[ExchangeVariant] = &[
    ExchangeVariant {
        suffix: ".NS",
        code: "NSE",
        full_name: "National Stock Exchange",
    },
    ExchangeVariant {
        suffix: ".BO",
        code: "BSE",
        full_name: "Bombay Stock Exchange",
    },
];

/// Exchange code for the bare (unsuffixed) lookup.
pub const INTERNATIONAL_CODE: &str = "INTL";

/// Removes one trailing known exchange suffix, ignoring case.
///
/// Unknown dotted symbols such as `BRK.B` are returned unchanged.
pub fn strip_exchange_suffix(symbol: &str) -> &str {
    for variant in EXCHANGE_VARIANTS {
        let suffix_len = variant.suffix.len();
        if symbol.len() > suffix_len {
            let split = symbol.len() - suffix_len;
            if symbol.is_char_boundary(split)
                && symbol[split..].eq_ignore_ascii_case(variant.suffix)
            {
                return &symbol[..split];
            }
        }
    }
    symbol
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_known_suffixes() {
        assert_eq!(strip_exchange_suffix("INFY.NS"), "INFY");
        assert_eq!(strip_exchange_suffix("RELIANCE.BO"), "RELIANCE");
        assert_eq!(strip_exchange_suffix("tcs.ns"), "tcs");
        assert_eq!(strip_exchange_suffix("Tcs.Bo"), "Tcs");
    }

    #[test]
    fn test_strip_preserves_other_symbols() {
        assert_eq!(strip_exchange_suffix("AAPL"), "AAPL");
        assert_eq!(strip_exchange_suffix("BRK.B"), "BRK.B");
        assert_eq!(strip_exchange_suffix("SHOP.TO"), "SHOP.TO");
        assert_eq!(strip_exchange_suffix(".NS"), ".NS");
    }

    #[test]
    fn test_variant_order() {
        let codes: Vec<&str> = EXCHANGE_VARIANTS.iter().map(|v| v.code).collect();
        assert_eq!(codes, vec!["NSE", "BSE"]);
    }
}

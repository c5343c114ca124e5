//! Macro for implementing Display and FromStr for status enums
//!
//! Status enums that are stored as text columns (log status, failure kind)
//! share a single implementation for both traits. Parsing is
//! case-insensitive; output is always the canonical lowercase label.
//!
//! # Example
//!
//! ```rust
//! use ordersync_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum PassStatus {
//!     Success,
//!     Partial,
//! }
//!
//! impl_domain_status_conversions!(PassStatus {
//!     Success => "success",
//!     Partial => "partial",
//! });
//!
//! assert_eq!(PassStatus::Partial.to_string(), "partial");
//! assert_eq!("SUCCESS".parse::<PassStatus>(), Ok(PassStatus::Success));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// Labels must be lowercase literals; `FromStr` lowercases its input before
/// matching.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical lowercase label.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestStatus {
        Success,
        Partial,
    }

    impl_domain_status_conversions!(TestStatus {
        Success => "success",
        Partial => "partial",
    });

    #[test]
    fn display_uses_label() {
        assert_eq!(TestStatus::Success.to_string(), "success");
        assert_eq!(TestStatus::Partial.as_str(), "partial");
    }

    #[test]
    fn parsing_is_case_insensitive() {
        assert_eq!(TestStatus::from_str("PARTIAL").unwrap(), TestStatus::Partial);
        assert_eq!(TestStatus::from_str("Success").unwrap(), TestStatus::Success);
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = TestStatus::from_str("failed").unwrap_err();
        assert!(err.contains("Invalid TestStatus: failed"));
    }
}

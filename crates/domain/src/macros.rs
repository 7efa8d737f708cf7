//! Macro for implementing Display and FromStr for wire-value enums
//!
//! Ticketing payloads carry statuses, priorities and scores as lowercase
//! strings. The macro keeps the string mapping in one place for both
//! directions, with case-insensitive parsing.
//!
//! # Example
//!
//! ```rust
//! use prepdesk_domain::impl_wire_value_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Visibility {
//!     Public,
//!     Internal,
//! }
//!
//! impl_wire_value_conversions!(Visibility {
//!     Public => "public",
//!     Internal => "internal",
//! });
//!
//! assert_eq!(Visibility::Internal.to_string(), "internal");
//! assert_eq!("PUBLIC".parse::<Visibility>(), Ok(Visibility::Public));
//! ```

/// Implements Display and FromStr traits for wire-value enums
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their wire strings
#[macro_export]
macro_rules! impl_wire_value_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl $enum_name {
            /// Wire representation of the value.
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

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
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
    enum Severity {
        Low,
        NotGood,
    }

    impl_wire_value_conversions!(Severity {
        Low => "low",
        NotGood => "not_good",
    });

    #[test]
    fn display_uses_wire_string() {
        assert_eq!(Severity::Low.to_string(), "low");
        assert_eq!(Severity::NotGood.to_string(), "not_good");
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(Severity::from_str("LOW").unwrap(), Severity::Low);
        assert_eq!(Severity::from_str(" Not_Good ").unwrap(), Severity::NotGood);
    }

    #[test]
    fn parsing_rejects_unknown_values() {
        let result = Severity::from_str("urgent");
        assert!(result.unwrap_err().contains("Invalid Severity: urgent"));
        assert!(Severity::from_str("").is_err());
    }
}

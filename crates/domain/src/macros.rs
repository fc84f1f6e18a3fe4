//! Macro for implementing Display and FromStr for lowercase-keyed enums
//!
//! Used for config switches (`OrphanPolicy`, `ImportMode`, `SecretSource`)
//! and pipeline stages, which are parsed from environment variables and CLI
//! flags and written to logs.
//!
//! # Example
//!
//! ```rust
//! use roombook_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Policy {
//!     Keep,
//!     Delete,
//! }
//!
//! impl_domain_status_conversions!(Policy {
//!     Keep => "keep",
//!     Delete => "delete",
//! });
//!
//! assert_eq!("DELETE".parse::<Policy>().unwrap(), Policy::Delete);
//! ```

/// Implements Display and FromStr traits for unit enums
///
/// - Display writes the given lowercase string
/// - FromStr parses case-insensitively and reports the enum name on failure
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:literal),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => write!(f, $str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => ::std::result::Result::Ok(Self::$variant),)+
                    _ => ::std::result::Result::Err(::std::format!(
                        "Invalid {}: {}",
                        stringify!($enum_name),
                        s
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Switch {
        On,
        Off,
    }

    impl_domain_status_conversions!(Switch {
        On => "on",
        Off => "off",
    });

    #[test]
    fn display_uses_lowercase_key() {
        assert_eq!(Switch::On.to_string(), "on");
        assert_eq!(Switch::Off.to_string(), "off");
    }

    #[test]
    fn parsing_ignores_case_and_padding() {
        assert_eq!(Switch::from_str(" ON ").unwrap(), Switch::On);
        assert_eq!(Switch::from_str("Off").unwrap(), Switch::Off);
    }

    #[test]
    fn unknown_value_names_the_enum() {
        let err = Switch::from_str("maybe").unwrap_err();
        assert!(err.contains("Invalid Switch: maybe"));
    }

    /// Callers often import a one-argument `Result` alias next to the macro.
    mod with_result_alias {
        use std::str::FromStr;

        #[allow(unused_imports)]
        use crate::errors::Result;

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Phase {
            Start,
            Stop,
        }

        impl_domain_status_conversions!(Phase {
            Start => "start",
            Stop => "stop",
        });

        #[test]
        fn expands_next_to_a_result_alias() {
            assert_eq!(Phase::from_str("STOP").unwrap(), Phase::Stop);
            assert_eq!(Phase::Start.to_string(), "start");
        }
    }
}

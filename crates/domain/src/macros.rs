//! Macro for string conversions of fieldless domain enums
//!
//! Ledger channels and scheduler decisions are written to log fields and
//! parsed back from CLI input and JSON, so each of them needs the same
//! `as_str` / `Display` / `FromStr` triple.
//!
//! # Example
//!
//! ```rust
//! use ticketmail_domain::impl_domain_str_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum MailKind {
//!     Status,
//!     Invoice,
//! }
//!
//! impl_domain_str_conversions!(MailKind {
//!     Status => "status",
//!     Invoice => "invoice",
//! });
//!
//! assert_eq!(MailKind::Invoice.as_str(), "invoice");
//! assert_eq!("STATUS".parse::<MailKind>(), Ok(MailKind::Status));
//! ```

/// Implements `as_str`, `Display` and `FromStr` for a fieldless enum
///
/// # Arguments
///
/// * `$enum_name` - The name of the enum type
/// * `$variant => $str` - Mapping of enum variants to their lowercase string
///   representations
///
/// Parsing ignores surrounding whitespace and ASCII case.
#[macro_export]
macro_rules! impl_domain_str_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Stable lowercase name of the variant.
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
                match s.trim().to_ascii_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}

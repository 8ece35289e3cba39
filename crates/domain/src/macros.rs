//! Macro for implementing Display and FromStr for stored enums
//!
//! Booking enums are persisted as their canonical upper-case names
//! (`SCHEDULED`, `GOOGLE_MEET_AND_CALENDAR`, ...). The macro keeps the
//! Display output and the accepted spellings in one table.
//!
//! # Example
//!
//! ```rust
//! use slotwise_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum LinkState {
//!     Linked,
//!     Unlinked,
//! }
//!
//! impl_domain_status_conversions!(LinkState {
//!     Linked => "LINKED",
//!     Unlinked => "UNLINKED",
//! });
//!
//! assert_eq!(LinkState::Linked.to_string(), "LINKED");
//! assert_eq!("unlinked".parse::<LinkState>(), Ok(LinkState::Unlinked));
//! ```

/// Implements Display, FromStr and `as_str` for enums stored as strings.
///
/// Parsing is case-insensitive; Display always emits the canonical form.
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Canonical string form used in storage and on the wire.
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
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(format!("Invalid {}: {}", stringify!($enum_name), s))
            }
        }
    };
}

//! Attribute tables and value domains
//!
//! Every ev3dev device class is described by a static table of
//! [`AttributeSpec`]s: the name of the sysfs file, whether it may be read
//! and/or written, and what kind of text it holds.
//!
//! The typed accessor traits in [`crate::class`] are generated from these
//! tables by the `attributes!` macro, so the table and the methods can never
//! disagree.
use crate::{error::DeviceError, Result};
use std::collections::BTreeSet;

/// A set of tokens, as read from attributes like `commands` or `modes`.
pub type ModeSet = BTreeSet<String>;

/// Access direction of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    /// Read-only
    Read,

    /// Write-only
    Write,

    /// Read and write
    ReadWrite,
}

impl Access {
    /// Whether the attribute can be read
    pub const fn readable(self) -> bool {
        matches!(self, Self::Read | Self::ReadWrite)
    }

    /// Whether the attribute can be written
    pub const fn writable(self) -> bool {
        matches!(self, Self::Write | Self::ReadWrite)
    }
}

/// The kind of text an attribute holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Free-form text
    Text,

    /// A decimal integer
    Integer,

    /// Exactly one of the listed tokens
    Enumerated(&'static [&'static str]),

    /// A space separated list of tokens
    List,
}

impl Domain {
    /// Whether `value` can be expressed in this domain.
    ///
    /// This is not range checking, the kernel is the authority on that.
    pub fn admits(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Self::Text | Self::List => true,
            Self::Integer => value.parse::<i64>().is_ok(),
            Self::Enumerated(tokens) => tokens.contains(&value),
        }
    }
}

/// One row of a device attribute table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeSpec {
    /// File name, relative to the device directory.
    ///
    /// May contain a `/`, as in `speed_pid/Kp`.
    pub name: &'static str,

    /// Access direction
    pub access: Access,

    /// Value domain
    pub domain: Domain,
}

impl AttributeSpec {
    pub const fn new(name: &'static str, access: Access, domain: Domain) -> Self {
        Self {
            name,
            access,
            domain,
        }
    }
}

/// A type that attribute contents can be converted to and from.
pub trait Value: Sized {
    /// Domain of attributes holding this type
    const DOMAIN: Domain;

    /// Parse the contents of `attribute`.
    ///
    /// # Errors
    ///
    /// - [`DeviceError::Parse`] if `raw` isn't valid for this type.
    fn parse(attribute: &str, raw: &str) -> Result<Self>;

    /// The text to write to the attribute file.
    fn render(&self) -> String;
}

pub(crate) fn parse_error(attribute: &str, raw: &str) -> DeviceError {
    DeviceError::Parse {
        attribute: attribute.to_owned(),
        value: raw.to_owned(),
    }
}

impl Value for i32 {
    const DOMAIN: Domain = Domain::Integer;

    fn parse(attribute: &str, raw: &str) -> Result<Self> {
        raw.trim().parse().map_err(|_| parse_error(attribute, raw))
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl Value for String {
    const DOMAIN: Domain = Domain::Text;

    fn parse(_: &str, raw: &str) -> Result<Self> {
        Ok(raw.trim().to_owned())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

/// Lists mark the current selection with brackets, `none [timer] heartbeat`.
///
/// The brackets are stripped, use [`selected`] to find the marked token.
impl Value for ModeSet {
    const DOMAIN: Domain = Domain::List;

    fn parse(_: &str, raw: &str) -> Result<Self> {
        Ok(raw
            .split_whitespace()
            .map(|t| t.trim_start_matches('[').trim_end_matches(']').to_owned())
            .collect())
    }

    fn render(&self) -> String {
        self.iter().map(String::as_str).collect::<Vec<_>>().join(" ")
    }
}

/// The bracketed token of a list attribute, if any.
pub fn selected(raw: &str) -> Option<&str> {
    raw.split_whitespace()
        .find(|t| t.starts_with('[') && t.ends_with(']') && t.len() > 1)
        .map(|t| &t[1..t.len() - 1])
}

/// Declare an enum over the kernel tokens of an enumerated attribute.
///
/// Generates [`std::fmt::Display`], [`std::str::FromStr`] and [`Value`].
/// Parsing an unknown token is [`DeviceError::InvalidValue`].
macro_rules! value_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident($attr:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident = $token:literal,
            )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                $variant,
            )+
        }

        impl $name {
            /// Every valid kernel token
            pub const TOKENS: &'static [&'static str] = &[$($token),+];

            /// The kernel token for this value
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $token,)+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::DeviceError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s.trim() {
                    $($token => Ok(Self::$variant),)+
                    _ => Err($crate::error::DeviceError::InvalidValue {
                        attribute: $attr.to_owned(),
                        value: s.to_owned(),
                    }),
                }
            }
        }

        impl $crate::attribute::Value for $name {
            const DOMAIN: $crate::attribute::Domain =
                $crate::attribute::Domain::Enumerated(Self::TOKENS);

            fn parse(attribute: &str, raw: &str) -> $crate::Result<Self> {
                raw.parse()
                    .map_err(|_| $crate::attribute::parse_error(attribute, raw))
            }

            fn render(&self) -> String {
                self.as_str().to_owned()
            }
        }
    };
}

/// Declare an attribute table as a trait of typed accessors.
///
/// Each row is one of
///
/// - `read getter: Type = "file";`
/// - `write setter: Type = "file";`
/// - `read_write getter, setter: Type = "file";`
///
/// The trait gets an `ATTRIBUTES` table, and a default method per
/// direction that goes through [`crate::class::DeviceHandle`].
///
/// Anything after the last row is copied into the trait as-is.
macro_rules! attributes {
    (@table [$($acc:tt)*]) => {
        &[$($acc)*]
    };
    (@table [$($acc:tt)*]
        $(#[$doc:meta])* read $get:ident: $ty:ty = $attr:literal; $($rest:tt)*
    ) => {
        attributes!(@table [$($acc)*
            $crate::attribute::AttributeSpec::new(
                $attr,
                $crate::attribute::Access::Read,
                <$ty as $crate::attribute::Value>::DOMAIN,
            ),
        ] $($rest)*)
    };
    (@table [$($acc:tt)*]
        $(#[$doc:meta])* write $set:ident: $ty:ty = $attr:literal; $($rest:tt)*
    ) => {
        attributes!(@table [$($acc)*
            $crate::attribute::AttributeSpec::new(
                $attr,
                $crate::attribute::Access::Write,
                <$ty as $crate::attribute::Value>::DOMAIN,
            ),
        ] $($rest)*)
    };
    (@table [$($acc:tt)*]
        $(#[$doc:meta])* read_write $get:ident, $set:ident: $ty:ty = $attr:literal; $($rest:tt)*
    ) => {
        attributes!(@table [$($acc)*
            $crate::attribute::AttributeSpec::new(
                $attr,
                $crate::attribute::Access::ReadWrite,
                <$ty as $crate::attribute::Value>::DOMAIN,
            ),
        ] $($rest)*)
    };
    (@table [$($acc:tt)*] $($helpers:tt)+) => {
        &[$($acc)*]
    };

    (@methods) => {};
    (@methods
        $(#[$doc:meta])* read $get:ident: $ty:ty = $attr:literal; $($rest:tt)*
    ) => {
        $(#[$doc])*
        fn $get(&self) -> $crate::Result<$ty> {
            self.handle().get::<$ty>($attr)
        }

        attributes!(@methods $($rest)*);
    };
    (@methods
        $(#[$doc:meta])* write $set:ident: $ty:ty = $attr:literal; $($rest:tt)*
    ) => {
        $(#[$doc])*
        fn $set(&self, value: impl Into<$ty>) -> $crate::Result<()> {
            self.handle().set::<$ty>($attr, &value.into())
        }

        attributes!(@methods $($rest)*);
    };
    (@methods
        $(#[$doc:meta])* read_write $get:ident, $set:ident: $ty:ty = $attr:literal; $($rest:tt)*
    ) => {
        $(#[$doc])*
        fn $get(&self) -> $crate::Result<$ty> {
            self.handle().get::<$ty>($attr)
        }

        $(#[$doc])*
        fn $set(&self, value: impl Into<$ty>) -> $crate::Result<()> {
            self.handle().set::<$ty>($attr, &value.into())
        }

        attributes!(@methods $($rest)*);
    };
    (@methods $($helpers:tt)+) => {
        $($helpers)+
    };

    (
        $(#[$meta:meta])*
        pub trait $name:ident: $super:path { $($rows:tt)* }
    ) => {
        $(#[$meta])*
        pub trait $name: $super {
            /// Attributes declared by this trait
            const ATTRIBUTES: &'static [$crate::attribute::AttributeSpec] =
                attributes!(@table [] $($rows)*);

            attributes!(@methods $($rows)*);
        }
    };
}

/// Declare a device type bound to one ev3dev class directory.
///
/// Generates the struct, a `new(&Registry, Port)` constructor, the
/// [`crate::class::Device`] impl, and impls of the listed attribute traits.
/// `drivers`, when not empty, restricts discovery to devices whose
/// `driver_name` is one of them.
macro_rules! device {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            class: $class:literal,
            pattern: $pattern:literal,
            drivers: [$($driver:expr),* $(,)?],
            attributes: [$($table:ident),+ $(,)?] $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug)]
        pub struct $name {
            handle: $crate::class::DeviceHandle,
        }

        impl $name {
            /// Directory under the class root holding these devices
            pub const CLASS: &'static str = $class;

            /// Name pattern used for [`Port::Auto`][crate::registry::Port::Auto]
            pub const PATTERN: &'static str = $pattern;

            /// Accepted `driver_name`s, any if empty
            pub const DRIVERS: &'static [&'static str] = &[$($driver),*];

            /// Claim the first matching device not already claimed from
            /// `registry`.
            ///
            /// # Errors
            ///
            /// - [`DeviceNotFound`][crate::error::DeviceError::DeviceNotFound]
            ///   if there is no such device
            pub fn new(
                registry: &$crate::registry::Registry,
                port: $crate::registry::Port,
            ) -> $crate::Result<Self> {
                let handle = registry.find(Self::CLASS, Self::PATTERN, Self::DRIVERS, &port)?;
                Ok(Self { handle })
            }
        }

        impl $crate::class::imp::Sealed for $name {}

        impl $crate::class::Device for $name {
            const TABLES: &'static [&'static [$crate::attribute::AttributeSpec]] =
                &[$(<$name as $table>::ATTRIBUTES),+];

            fn handle(&self) -> &$crate::class::DeviceHandle {
                &self.handle
            }
        }

        $(impl $table for $name {})+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists() -> Result<()> {
        let set = ModeSet::parse("trigger", "none [timer] heartbeat\n")?;
        assert!(set.contains("timer"));
        assert!(set.contains("none"));
        assert_eq!(set.len(), 3);
        assert_eq!(selected("none [timer] heartbeat"), Some("timer"));
        assert_eq!(selected("none timer"), None);
        assert!(ModeSet::parse("state", "")?.is_empty());
        Ok(())
    }

    #[test]
    fn integers() {
        assert_eq!(i32::parse("speed", "-120\n").ok(), Some(-120));
        assert!(matches!(
            i32::parse("speed", "fast"),
            Err(DeviceError::Parse { .. })
        ));
    }

    #[test]
    fn domains() {
        assert!(Domain::Integer.admits("50"));
        assert!(Domain::Integer.admits("-100\n"));
        assert!(!Domain::Integer.admits("fifty"));
        assert!(Domain::Enumerated(&["normal", "inversed"]).admits("inversed"));
        assert!(!Domain::Enumerated(&["normal", "inversed"]).admits("sideways"));
        assert!(Domain::Text.admits("anything"));
    }

    #[test]
    fn access() {
        assert!(Access::Read.readable() && !Access::Read.writable());
        assert!(!Access::Write.readable() && Access::Write.writable());
        assert!(Access::ReadWrite.readable() && Access::ReadWrite.writable());
    }
}

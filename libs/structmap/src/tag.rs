use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::schema::FieldDescriptor;

pub const OPTION_IGNORE: &str = "-";
pub const OPTION_OMITEMPTY: &str = "omitempty";
pub const OPTION_DIVE: &str = "dive";
pub const OPTION_WILDCARD: &str = "wildcard";
pub const OPTION_DOTTED: &str = "dotted";

/// Set of mapping options parsed from a tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Flags = Flags(0);
    pub const IGNORE: Flags = Flags(1 << 0);
    pub const OMIT_EMPTY: Flags = Flags(1 << 1);
    pub const DIVE: Flags = Flags(1 << 2);
    pub const WILDCARD: Flags = Flags(1 << 3);
    pub const DOTTED: Flags = Flags(1 << 4);

    const NAMES: [(Flags, &'static str); 5] = [
        (Flags::IGNORE, OPTION_IGNORE),
        (Flags::OMIT_EMPTY, OPTION_OMITEMPTY),
        (Flags::DIVE, OPTION_DIVE),
        (Flags::WILDCARD, OPTION_WILDCARD),
        (Flags::DOTTED, OPTION_DOTTED),
    ];

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Flag for a reserved option word. Matching is case-sensitive.
    pub fn from_option(token: &str) -> Option<Flags> {
        Self::NAMES
            .iter()
            .find(|(_, name)| *name == token)
            .map(|(flag, _)| *flag)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        Flags(self.0 | rhs.0)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name) in Self::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Mapping directive of one field for one namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    /// Output key. May be empty.
    pub key: &'a str,
    pub flags: Flags,
}

impl<'a> Directive<'a> {
    pub const IGNORED: Directive<'static> = Directive {
        key: "",
        flags: Flags::IGNORE,
    };

    /// Parse a raw tag value of the form `name,opt1,opt2`.
    ///
    /// Every token is checked against the option words, the first one
    /// included, so a bare `-` ignores the field. Unknown tokens are dropped.
    pub fn parse(raw: &'a str) -> Self {
        let mut tokens = raw.split(',');
        let key = tokens.next().unwrap_or_default();

        let mut flags = Flags::NONE;
        for token in std::iter::once(key).chain(tokens) {
            if let Some(flag) = Flags::from_option(token) {
                flags |= flag;
            }
        }

        Self { key, flags }
    }

    pub fn is_ignored(&self) -> bool {
        self.flags.contains(Flags::IGNORE)
    }

    pub fn omit_empty(&self) -> bool {
        self.flags.contains(Flags::OMIT_EMPTY)
    }

    pub fn dive(&self) -> bool {
        self.flags.contains(Flags::DIVE)
    }

    pub fn wildcard(&self) -> bool {
        self.flags.contains(Flags::WILDCARD)
    }

    pub fn dotted(&self) -> bool {
        self.flags.contains(Flags::DOTTED)
    }
}

/// Read the directive of `field` under `namespace`.
///
/// A field without a tag in that namespace is ignored. Never fails.
pub fn parse_tag(field: &FieldDescriptor, namespace: &str) -> Directive<'static> {
    match field.lookup(namespace) {
        Some(raw) => Directive::parse(raw),
        None => Directive::IGNORED,
    }
}

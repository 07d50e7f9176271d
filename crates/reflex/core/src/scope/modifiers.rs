// Dotlanth
// Copyright (C) 2025 Synerthink

// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.

// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

//! Entity modifiers of members (access, storage, function qualifiers)

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Bit set of C++ entity descriptors
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u32 {
        const PUBLIC = 1 << 0;
        const PROTECTED = 1 << 1;
        const PRIVATE = 1 << 2;
        const STATIC = 1 << 4;
        const CONSTRUCTOR = 1 << 5;
        const DESTRUCTOR = 1 << 6;
        const EXPLICIT = 1 << 7;
        const OPERATOR = 1 << 10;
        const INLINE = 1 << 11;
        const CONST = 1 << 15;
        const VOLATILE = 1 << 16;
        const ABSTRACT = 1 << 18;
        const VIRTUAL = 1 << 19;
        const TRANSIENT = 1 << 20;
        const ARTIFICIAL = 1 << 21;
    }
}

const KEYWORDS: [(Modifiers, &str); 15] = [
    (Modifiers::PUBLIC, "public"),
    (Modifiers::PROTECTED, "protected"),
    (Modifiers::PRIVATE, "private"),
    (Modifiers::STATIC, "static"),
    (Modifiers::CONSTRUCTOR, "constructor"),
    (Modifiers::DESTRUCTOR, "destructor"),
    (Modifiers::EXPLICIT, "explicit"),
    (Modifiers::OPERATOR, "operator"),
    (Modifiers::INLINE, "inline"),
    (Modifiers::CONST, "const"),
    (Modifiers::VOLATILE, "volatile"),
    (Modifiers::ABSTRACT, "abstract"),
    (Modifiers::VIRTUAL, "virtual"),
    (Modifiers::TRANSIENT, "transient"),
    (Modifiers::ARTIFICIAL, "artificial"),
];

impl Modifiers {
    /// Modifier for a lowercase keyword such as `"virtual"`
    pub fn parse(name: &str) -> Option<Modifiers> {
        KEYWORDS.iter().find(|(_, keyword)| *keyword == name).map(|(modifier, _)| *modifier)
    }

    /// Combine keywords, returning the first unknown keyword on failure
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Modifiers, &'a str> {
        names.into_iter().try_fold(Modifiers::empty(), |acc, name| Modifiers::parse(name).map(|m| acc | m).ok_or(name))
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = KEYWORDS.iter().filter(|(modifier, _)| self.contains(*modifier)).map(|(_, name)| *name).collect();
        write!(f, "{}", names.join(" "))
    }
}

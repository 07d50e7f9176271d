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

//! Runtime values produced by dynamic lookup or evaluation
//!
//! A value is tagged with the catalog handle of its type and owns its data,
//! either as an inline scalar or as raw bytes.

use crate::builders::FundamentalClass;
use crate::catalog::{TypeEntry, TypeHandle, TypeKind};

/// Scalar payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Signed(i64),
    Unsigned(u64),
    F32(f32),
    F64(f64),
    Address(u64),
}

impl Scalar {
    pub fn as_i64(self) -> Option<i64> {
        match self {
            Scalar::Bool(b) => Some(b as i64),
            Scalar::Signed(v) => Some(v),
            Scalar::Unsigned(v) | Scalar::Address(v) => i64::try_from(v).ok(),
            Scalar::F32(_) | Scalar::F64(_) => None,
        }
    }

    pub fn as_u64(self) -> Option<u64> {
        match self {
            Scalar::Bool(b) => Some(b as u64),
            Scalar::Signed(v) => u64::try_from(v).ok(),
            Scalar::Unsigned(v) | Scalar::Address(v) => Some(v),
            Scalar::F32(_) | Scalar::F64(_) => None,
        }
    }

    pub fn as_f64(self) -> Option<f64> {
        match self {
            Scalar::F32(v) => Some(v as f64),
            Scalar::F64(v) => Some(v),
            Scalar::Signed(v) => Some(v as f64),
            Scalar::Unsigned(v) => Some(v as f64),
            Scalar::Bool(_) | Scalar::Address(_) => None,
        }
    }
}

/// Data of a [`Value`]
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Inline(Scalar),
    Storage(Box<[u8]>),
}

/// A typed runtime datum
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    ty: TypeHandle,
    payload: Payload,
}

impl Value {
    pub fn new(ty: TypeHandle, payload: Payload) -> Self {
        Self { ty, payload }
    }

    pub fn scalar(ty: TypeHandle, scalar: Scalar) -> Self {
        Self::new(ty, Payload::Inline(scalar))
    }

    pub fn bytes(ty: TypeHandle, bytes: impl Into<Box<[u8]>>) -> Self {
        Self::new(ty, Payload::Storage(bytes.into()))
    }

    /// A value without data, as produced for `void`
    pub fn empty(ty: TypeHandle) -> Self {
        Self::new(ty, Payload::Storage(Box::default()))
    }

    /// Decode little-endian `bytes` of type `entry`. Fundamentals and pointers
    /// whose width matches become scalars; anything else is kept as raw bytes.
    /// Enums stay raw since their signedness lives in the underlying type;
    /// decode those with the underlying entry instead.
    pub fn from_bytes(entry: &TypeEntry, bytes: &[u8]) -> Self {
        match decode_scalar(entry, bytes) {
            Some(scalar) => Self::scalar(entry.handle(), scalar),
            None => Self::bytes(entry.handle(), bytes),
        }
    }

    pub fn ty(&self) -> TypeHandle {
        self.ty
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn as_scalar(&self) -> Option<Scalar> {
        match &self.payload {
            Payload::Inline(scalar) => Some(*scalar),
            Payload::Storage(_) => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match &self.payload {
            Payload::Storage(bytes) => Some(bytes),
            Payload::Inline(_) => None,
        }
    }

    pub fn into_payload(self) -> Payload {
        self.payload
    }
}

fn decode_scalar(entry: &TypeEntry, bytes: &[u8]) -> Option<Scalar> {
    if bytes.len() != entry.size() {
        return None;
    }
    let class = match entry.kind() {
        TypeKind::Fundamental => FundamentalClass::classify(entry.name())?,
        TypeKind::Pointer => return read_unsigned(bytes).map(Scalar::Address),
        _ => return None,
    };
    match class {
        FundamentalClass::Void => None,
        FundamentalClass::Bool => Some(Scalar::Bool(bytes.iter().any(|b| *b != 0))),
        FundamentalClass::Character if FundamentalClass::is_unsigned_character(entry.name()) => read_unsigned(bytes).map(Scalar::Unsigned),
        FundamentalClass::Signed | FundamentalClass::Character => read_signed(bytes).map(Scalar::Signed),
        FundamentalClass::Unsigned => read_unsigned(bytes).map(Scalar::Unsigned),
        FundamentalClass::Floating => match bytes.len() {
            4 => Some(Scalar::F32(f32::from_le_bytes(bytes.try_into().ok()?))),
            8 => Some(Scalar::F64(f64::from_le_bytes(bytes.try_into().ok()?))),
            _ => None,
        },
    }
}

fn read_unsigned(bytes: &[u8]) -> Option<u64> {
    if bytes.is_empty() || bytes.len() > 8 {
        return None;
    }
    let mut buf = [0u8; 8];
    buf[..bytes.len()].copy_from_slice(bytes);
    Some(u64::from_le_bytes(buf))
}

fn read_signed(bytes: &[u8]) -> Option<i64> {
    let raw = read_unsigned(bytes)?;
    let shift = 64 - 8 * bytes.len() as u32;
    Some(((raw << shift) as i64) >> shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeKey;

    fn entry(kind: TypeKind, size: usize, name: &str) -> TypeEntry {
        TypeEntry::new(TypeHandle(0), TypeKey::named(name), kind, size, name.to_string())
    }

    #[test]
    fn test_decode_fundamentals() {
        let int = entry(TypeKind::Fundamental, 4, "int");
        assert_eq!(Value::from_bytes(&int, &(-7i32).to_le_bytes()).as_scalar(), Some(Scalar::Signed(-7)));

        let uchar = entry(TypeKind::Fundamental, 1, "unsigned char");
        assert_eq!(Value::from_bytes(&uchar, &[200]).as_scalar(), Some(Scalar::Unsigned(200)));

        let schar = entry(TypeKind::Fundamental, 1, "signed char");
        assert_eq!(Value::from_bytes(&schar, &[200]).as_scalar(), Some(Scalar::Signed(-56)));

        let double = entry(TypeKind::Fundamental, 8, "double");
        assert_eq!(Value::from_bytes(&double, &3.5f64.to_le_bytes()).as_scalar(), Some(Scalar::F64(3.5)));
    }

    #[test]
    fn test_undecodable_bytes_are_kept() {
        let point = entry(TypeKind::Class, 2, "Point");
        let value = Value::from_bytes(&point, &[0x0a, 0x0b]);
        assert_eq!(value.as_bytes(), Some(&[0x0a, 0x0b][..]));

        let long_double = entry(TypeKind::Fundamental, 16, "long double");
        assert!(Value::from_bytes(&long_double, &[0; 16]).as_scalar().is_none());

        let short_read = entry(TypeKind::Fundamental, 4, "int");
        assert!(Value::from_bytes(&short_read, &[1, 2]).as_scalar().is_none());

        let level = entry(TypeKind::Enum, 1, "Level");
        assert_eq!(Value::from_bytes(&level, &[200]).as_bytes(), Some(&[200u8][..]));
    }

    #[test]
    fn test_scalar_conversions() {
        assert_eq!(Scalar::Unsigned(u64::MAX).as_i64(), None);
        assert_eq!(Scalar::Signed(-1).as_u64(), None);
        assert_eq!(Scalar::Bool(true).as_i64(), Some(1));
        assert_eq!(Scalar::F32(1.5).as_f64(), Some(1.5));
    }
}

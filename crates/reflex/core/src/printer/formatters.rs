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

//! Built-in formatters and the generic fallback

use super::PrintContext;
use crate::builders::FundamentalClass;
use crate::value::{Payload, Scalar, Value};
use std::fmt::{self, Write};

/// Scalar view of the value, decoding raw bytes when they match the type
fn scalar_of(ctx: &PrintContext<'_>) -> Option<Scalar> {
    match ctx.value.payload() {
        Payload::Inline(scalar) => Some(*scalar),
        Payload::Storage(bytes) => Value::from_bytes(ctx.entry, bytes).as_scalar(),
    }
}

fn write_scalar(out: &mut dyn Write, scalar: Scalar) -> fmt::Result {
    match scalar {
        Scalar::Bool(b) => write!(out, "{}", b),
        Scalar::Signed(v) => write!(out, "{}", v),
        Scalar::Unsigned(v) => write!(out, "{}", v),
        Scalar::F32(v) => write!(out, "{}", v),
        Scalar::F64(v) => write!(out, "{}", v),
        Scalar::Address(v) => write!(out, "0x{:x}", v),
    }
}

pub(crate) fn fundamental(ctx: &PrintContext<'_>, out: &mut dyn Write) -> fmt::Result {
    let class = FundamentalClass::classify(ctx.entry.simple_name());
    if class == Some(FundamentalClass::Void) {
        return write!(out, "({})", ctx.entry.name());
    }
    let Some(scalar) = scalar_of(ctx) else {
        return fallback(ctx, out);
    };

    write!(out, "({}) ", ctx.entry.name())?;
    match (class, scalar) {
        (Some(FundamentalClass::Bool), scalar) => write!(out, "{}", scalar.as_i64().is_some_and(|v| v != 0)),
        (Some(FundamentalClass::Character), scalar) => match scalar.as_i64().and_then(|v| u32::try_from(v).ok()).and_then(char::from_u32) {
            Some(c) => write!(out, "'{}'", c.escape_default()),
            None => write_scalar(out, scalar),
        },
        (_, scalar) => write_scalar(out, scalar),
    }
}

pub(crate) fn enumeration(ctx: &PrintContext<'_>, out: &mut dyn Write) -> fmt::Result {
    let Some(entry) = ctx.catalog.enum_entry(ctx.entry.handle()) else {
        return fallback(ctx, out);
    };
    let underlying = ctx.catalog.by_handle(entry.underlying);
    let scalar = match ctx.value.payload() {
        Payload::Inline(scalar) => Some(*scalar),
        Payload::Storage(bytes) => underlying.as_deref().and_then(|ty| Value::from_bytes(ty, bytes).as_scalar()),
    };
    let Some(value) = scalar.and_then(Scalar::as_i64) else {
        return fallback(ctx, out);
    };
    let underlying = underlying.map(|ty| ty.name().to_string()).unwrap_or_else(|| "int".to_string());

    write!(out, "({}) ", ctx.entry.name())?;
    if let Some(enumerator) = ctx.catalog.enumerators(&entry).into_iter().find(|e| e.value == value) {
        write!(out, "({}) : ", enumerator.name)?;
    }
    write!(out, "({}) {}", underlying, value)
}

pub(crate) fn pointer(ctx: &PrintContext<'_>, out: &mut dyn Write) -> fmt::Result {
    let address = match scalar_of(ctx) {
        Some(Scalar::Address(address)) => address,
        Some(other) => match other.as_u64() {
            Some(address) => address,
            None => return fallback(ctx, out),
        },
        None => return fallback(ctx, out),
    };
    if address == 0 { write!(out, "({}) nullptr", ctx.entry.name()) } else { write!(out, "({}) 0x{:x}", ctx.entry.name(), address) }
}

/// `(<kind> <name>) <data>`, used when nothing more specific is registered
pub(crate) fn fallback(ctx: &PrintContext<'_>, out: &mut dyn Write) -> fmt::Result {
    write!(out, "({} {}) ", ctx.entry.kind(), ctx.entry.name())?;
    match ctx.value.payload() {
        Payload::Inline(scalar) => write_scalar(out, *scalar),
        Payload::Storage(bytes) if bytes.is_empty() => out.write_str("<no data>"),
        Payload::Storage(bytes) => {
            write!(out, "[{} bytes]", bytes.len())?;
            for byte in bytes.iter() {
                write!(out, " {:02x}", byte)?;
            }
            Ok(())
        }
    }
}

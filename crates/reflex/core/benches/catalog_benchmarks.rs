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

//! Catalog benchmarks
//!
//! Registration throughput, key and name lookup, and hierarchical resolution
//! from a deeply nested scope.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use reflex_core::{Catalog, ScopeKind, ScopeMember, TypeKey, TypeKind};

fn populated(types: usize) -> Catalog {
    let catalog = Catalog::new("bench");
    catalog.register_builtin_fundamentals().unwrap();
    for i in 0..types {
        let name = format!("ns::Type{}", i);
        catalog.register(TypeKey::mangled(format!("_ZN2ns4Type{}E", i)), TypeKind::Class, 8, &name).unwrap();
    }
    catalog
}

fn bench_registration(c: &mut Criterion) {
    let mut group = c.benchmark_group("registration");
    for count in [100usize, 1_000] {
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("register", count), &count, |b, &count| b.iter(|| populated(black_box(count))));
    }

    let catalog = populated(1_000);
    group.throughput(Throughput::Elements(1));
    group.bench_function("register_existing", |b| {
        b.iter(|| catalog.register(black_box(TypeKey::mangled("_ZN2ns4Type500E")), TypeKind::Class, 8, "ns::Type500").unwrap())
    });
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let catalog = populated(10_000);
    let key = TypeKey::mangled("_ZN2ns4Type5000E");

    let mut group = c.benchmark_group("lookup");
    group.throughput(Throughput::Elements(1));
    group.bench_function("by_key", |b| b.iter(|| catalog.lookup(black_box(&key))));
    group.bench_function("by_name", |b| b.iter(|| catalog.lookup_name(black_box("ns::Type5000"))));
    group.bench_function("by_name_missing", |b| b.iter(|| catalog.lookup_name(black_box("ns::Nothing"))));
    group.finish();
}

fn bench_resolution(c: &mut Criterion) {
    let catalog = populated(0);
    let int = catalog.lookup_name("int").unwrap();
    catalog.add_member(catalog.global_scope(), "x", ScopeMember::Type(int.handle())).unwrap();

    let mut scope = catalog.global_scope();
    for level in 0..32 {
        scope = catalog.declare_scope(scope, &format!("level{}", level), ScopeKind::Namespace).unwrap();
    }

    let mut group = c.benchmark_group("resolution");
    group.bench_function("outward_32_levels", |b| b.iter(|| catalog.resolve(black_box(scope), black_box("x"))));
    group.bench_function("qualified", |b| b.iter(|| catalog.resolve_qualified(catalog.global_scope(), black_box("::level0::level1::level2::level3"))));
    group.finish();
}

criterion_group!(benches, bench_registration, bench_lookup, bench_resolution);
criterion_main!(benches);

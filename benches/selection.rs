use criterion::{criterion_group, criterion_main, Criterion};
use catsel::catalog::{Ellipse, QuantityDescriptor};
use catsel::{Catalog, CatalogInfo};

fn make_catalog(rows: usize) -> Catalog {
    let mut ra = Vec::with_capacity(rows);
    let mut dec = Vec::with_capacity(rows);
    let mut flux = Vec::with_capacity(rows);
    let mut class = Vec::with_capacity(rows);
    for i in 0..rows {
        ra.push((i as f64 * 0.37) % 360.0);
        dec.push(((i as f64 * 0.11) % 180.0) - 90.0);
        flux.push(if i % 97 == 0 { f64::NAN } else { (i % 1000) as f64 });
        class.push(["AGN", "QSO", "BLLac", "star"][i % 4].to_string());
    }
    Catalog::from_columns(
        CatalogInfo::default(),
        vec![
            QuantityDescriptor::numeric("RAJ2000").with_ucd("POS_EQ_RA_MAIN"),
            QuantityDescriptor::numeric("DEJ2000").with_ucd("POS_EQ_DEC_MAIN"),
            QuantityDescriptor::numeric("flux"),
            QuantityDescriptor::string("class"),
        ],
        vec![ra, dec, flux],
        vec![class],
    )
    .unwrap()
}

fn bench_cut_application(c: &mut Criterion) {
    let mut cat = make_catalog(44_000);
    let mut lower = 0.0;
    c.bench_function("set_lower_cut_44k", |b| {
        b.iter(|| {
            lower = if lower == 0.0 { 250.0 } else { 0.0 };
            cat.set_lower_cut("flux", lower).unwrap();
        })
    });
}

fn bench_region(c: &mut Criterion) {
    let mut cat = make_catalog(44_000);
    let mut radius = 5.0;
    c.bench_function("set_region_44k", |b| {
        b.iter(|| {
            radius = if radius == 5.0 { 10.0 } else { 5.0 };
            cat.set_region(Ellipse::circle(180.0, 0.0, radius)).unwrap();
        })
    });
}

fn bench_compaction(c: &mut Criterion) {
    let mut base = make_catalog(44_000);
    base.use_only_strings("class", ["agn", "qso"], true).unwrap();
    c.bench_function("retain_selected_44k", |b| {
        b.iter(|| {
            let mut cat = base.clone();
            cat.retain_selected(true).unwrap();
        })
    });
}

criterion_group!(benches, bench_cut_application, bench_region, bench_compaction);
criterion_main!(benches);

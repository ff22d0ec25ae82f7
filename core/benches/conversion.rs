use atomconv_core::{
    dump::Backends, simbox::SimulationBox, source::AtomSource, symbols::SymbolTable,
    system::System,
};
use std::error::Error;

use criterion::{criterion_group, criterion_main, Criterion};
use nalgebra::Vector3;
use rand::{rngs::StdRng, Rng, SeedableRng};

const SYMBOLS: [&str; 4] = ["Fe", "Ni", "Cr", "O"];

/// Random atoms in a 50 Å cube with a per-atom charge
fn random_system(natoms: usize) -> Result<System, Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(natoms as u64);

    let atypes = (0..natoms)
        .map(|_| rng.gen_range(1..=SYMBOLS.len()))
        .collect();
    let positions = (0..natoms)
        .map(|_| Vector3::from_fn(|_, _| rng.gen_range(0.0..50.0)))
        .collect();

    let mut system = System::new(
        SimulationBox::orthorhombic(50.0, 50.0, 50.0),
        [true; 3],
        atypes,
        positions,
    )?
    .with_symbols(SymbolTable::from_symbols(SYMBOLS));

    let charges = (0..natoms)
        .map(|_| rng.gen_range(-1.0..1.0))
        .collect::<Vec<f64>>();
    system.add_property("charge", charges)?;

    Ok(system)
}

fn bench_conversion(c: &mut Criterion) -> Result<(), Box<dyn Error>> {
    let backends = Backends::detect();
    let phonopy = backends.phonopy()?;
    let pymatgen = backends.pymatgen()?;

    for natoms in [1_000, 100_000] {
        let system = random_system(natoms)?;
        let table = SymbolTable::from_symbols(SYMBOLS);

        c.bench_function(&format!("Expand symbols {natoms}"), |b| {
            b.iter(|| table.expand(system.atypes()))
        });

        c.bench_function(&format!("Phonopy {natoms}"), |b| {
            b.iter(|| phonopy.dump_with_properties(&system, None))
        });

        c.bench_function(&format!("Pymatgen {natoms}"), |b| {
            b.iter(|| pymatgen.dump(&system, None))
        });
    }

    Ok(())
}

fn bench_all(c: &mut Criterion) {
    bench_conversion(c).unwrap();
}

criterion_group!(benches, bench_all);
criterion_main!(benches);

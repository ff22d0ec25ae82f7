use atomconv_core::{
    config::ConfigSystem,
    dump::{Backends, Format},
    prototype::{apply_lattice_parameters, LatticeParameters},
    source::AtomSource,
    symbols::SymbolTable,
    system::System,
    tools::identify_family,
};
use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand, ValueEnum};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: ConvCommand,

    /// Log conversion steps (ignored when RUST_LOG is set)
    #[arg(long, short, action = ArgAction::SetTrue, global = true)]
    verbose: bool,

    /// Treat a target format as unavailable
    #[arg(long, value_enum, global = true)]
    disable: Vec<TargetFormat>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum TargetFormat {
    Phonopy,
    Pymatgen,
}

impl From<TargetFormat> for Format {
    fn from(value: TargetFormat) -> Self {
        match value {
            TargetFormat::Phonopy => Format::Phonopy,
            TargetFormat::Pymatgen => Format::Pymatgen,
        }
    }
}

#[derive(ClapArgs, Debug)]
struct Input {
    /// A path to the JSON system file
    #[arg(long, short)]
    system: PathBuf,
    /// Comma separated element symbols for atom types 1, 2, ... Overrides the
    /// symbols stored in the system file
    #[arg(long)]
    symbols: Option<SymbolTable>,
}

#[derive(Subcommand, Debug)]
enum ConvCommand {
    /// Convert a system into phonopy atoms
    Phonopy {
        #[command(flatten)]
        input: Input,
        /// Also write the extra per-atom properties
        #[arg(long)]
        properties: bool,
        /// Where to write the JSON output, stdout if not given
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Convert a system into a pymatgen structure
    Pymatgen {
        #[command(flatten)]
        input: Input,
        /// Where to write the JSON output, stdout if not given
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the crystal family of the system's box
    Family {
        #[arg(long, short)]
        system: PathBuf,
        #[arg(long, default_value_t = 1e-5)]
        rtol: f64,
        #[arg(long, default_value_t = 1e-8)]
        atol: f64,
    },
    /// Print the reduced composition of the system
    Composition {
        #[command(flatten)]
        input: Input,
    },
    /// Rescale a prototype unit cell, keeping fractional positions
    Rescale {
        #[command(flatten)]
        input: Input,
        #[arg(long)]
        a: Option<f64>,
        #[arg(long)]
        b: Option<f64>,
        #[arg(long)]
        c: Option<f64>,
        #[arg(long)]
        alpha: Option<f64>,
        #[arg(long)]
        beta: Option<f64>,
        #[arg(long)]
        gamma: Option<f64>,
        /// Where to write the rescaled system, stdout if not given
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let args: Args = Args::parse();
    init_logging(args.verbose);

    let backends = args
        .disable
        .iter()
        .fold(Backends::detect(), |backends, &format| {
            backends.with_enabled(format.into(), false)
        });

    match args.command {
        ConvCommand::Phonopy {
            input,
            properties,
            output,
        } => {
            let converter = backends.phonopy()?;
            let system = load_system(&input.system)?;

            if properties {
                let (atoms, properties) = converter
                    .dump_with_properties(&system, input.symbols.as_ref())
                    .context("converting to phonopy atoms")?;
                log::info!("converted {} atoms", atoms.natoms());
                write_json(
                    output.as_deref(),
                    &serde_json::json!({ "atoms": atoms, "properties": properties }),
                )?;
            } else {
                let atoms = converter
                    .dump(&system, input.symbols.as_ref())
                    .context("converting to phonopy atoms")?;
                log::info!("converted {} atoms", atoms.natoms());
                write_json(output.as_deref(), &atoms)?;
            }
        }

        ConvCommand::Pymatgen { input, output } => {
            let converter = backends.pymatgen()?;
            let system = load_system(&input.system)?;

            let structure = converter
                .dump(&system, input.symbols.as_ref())
                .context("converting to pymatgen structure")?;
            log::info!(
                "converted {} sites with {} site properties",
                structure.num_sites(),
                structure.site_properties().len()
            );
            write_json(output.as_deref(), &structure)?;
        }

        ConvCommand::Family { system, rtol, atol } => {
            let system = load_system(&system)?;
            match identify_family(system.simulation_box(), rtol, atol) {
                Some(family) => println!("{family}"),
                None => bail!("box is not in a standard orientation"),
            }
        }

        ConvCommand::Composition { input } => {
            let mut system = load_system(&input.system)?;
            if input.symbols.is_some() {
                system.set_symbols(input.symbols);
            }
            match system.composition() {
                Some(composition) => println!("{composition}"),
                None => bail!("symbols needed for all atypes"),
            }
        }

        ConvCommand::Rescale {
            input,
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
            output,
        } => {
            let mut ucell = load_system(&input.system)?;
            if input.symbols.is_some() {
                ucell.set_symbols(input.symbols);
            }

            let params = LatticeParameters {
                a,
                b,
                c,
                alpha,
                beta,
                gamma,
            };
            apply_lattice_parameters(&mut ucell, &params)
                .context("applying lattice parameters")?;

            match output {
                Some(path) => ucell
                    .save(&path)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => write_json(None, &ConfigSystem::from(&ucell))?,
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) if verbose => {
            builder.filter_level(log::LevelFilter::Debug);
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Warn);
        }
    }
    builder.init();
}

fn load_system(path: &Path) -> anyhow::Result<System> {
    let system =
        System::load(path).with_context(|| format!("loading system {}", path.display()))?;
    log::info!(
        "loaded {} atoms of {} types from {}",
        system.natoms(),
        system.natypes(),
        path.display()
    );
    Ok(system)
}

fn write_json(path: Option<&Path>, value: &impl Serialize) -> anyhow::Result<()> {
    let mut writer: Box<dyn Write> = match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

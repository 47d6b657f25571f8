mod error;
mod job;
mod report;
mod setup;

use clap::{Args, Parser, Subcommand};
use error::{CliError, CliResult};
use job::{Job, parse_formalisms};
use mc_activity::{ActivityOptions, SolventMode};
use mc_elements::{Composition, PhaseState};
use mc_liquidus::{FusionOverride, LiquidusSolver};
use mc_miedema::{Conditions, GeoModel, ModelOptions, OrderState};
use mc_tdb::ThermoDatabase;
use report::{ActivityReport, Format, InteractionReport, LiquidusReport, MixingReport, TdbReport, emit};
use setup::ModelSetup;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meltcalc")]
#[command(about = "meltcalc - activity coefficients and liquidus temperatures of metallic melts", long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every model-based subcommand.
#[derive(Args, Clone)]
struct ModelArgs {
    /// Temperature [K]
    #[arg(short, long, default_value_t = 1873.0)]
    temperature: f64,
    /// Phase state: liquid or solid
    #[arg(long, default_value = "liquid")]
    state: PhaseState,
    /// Geometric model: uem1, uem2, uem2-gc or gsm
    #[arg(long, default_value = "uem1")]
    geo: GeoModel,
    /// Short-range order preset
    #[arg(long, value_parser = parse_order)]
    order: Option<OrderState>,
    /// Scale interactions by the excess-entropy factor
    #[arg(long)]
    excess_entropy: bool,
    /// YAML element overrides merged over the built-in table
    #[arg(long)]
    elements: Option<PathBuf>,
    /// YAML table of literature interaction coefficients (used when present)
    #[arg(long)]
    references: Option<PathBuf>,
    /// Solvent ln γ from the Gibbs–Duhem integral instead of the closed form.
    /// Needed for the solvent or the liquidus to differ between formalisms.
    #[arg(long)]
    accurate: bool,
}

impl ModelArgs {
    fn conditions(&self) -> CliResult<Conditions> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(CliError::InvalidArg(format!("temperature {} K", self.temperature)));
        }
        Ok(Conditions::liquid(self.temperature).with_state(self.state))
    }

    fn setup(&self) -> ModelSetup {
        let mut model = ModelOptions::default().with_excess_entropy(self.excess_entropy);
        if let Some(order) = self.order {
            model = model.with_order(order);
        }
        ModelSetup {
            geo: self.geo,
            model,
            activity: ActivityOptions {
                prefer_references: self.references.is_some(),
                solvent_mode: if self.accurate {
                    SolventMode::GibbsDuhem
                } else {
                    SolventMode::ClosedForm
                },
                ..ActivityOptions::default()
            },
            elements: self.elements.clone(),
            references: self.references.clone(),
        }
    }
}

fn parse_order(s: &str) -> Result<OrderState, String> {
    match s.to_ascii_lowercase().as_str() {
        "disordered" => Ok(OrderState::Disordered),
        "amorphous" => Ok(OrderState::Amorphous),
        "ordered" => Ok(OrderState::Ordered),
        other => Err(format!("unknown order state '{other}'")),
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Activity coefficients of the components of a melt
    Activity {
        /// Solvent element
        solvent: String,
        /// Solute formula, e.g. Mn0.01Si0.005
        solutes: String,
        /// Components to report (default: all)
        #[arg(long = "target")]
        targets: Vec<String>,
        /// Formalisms: wagner, pelton, elliott or all
        #[arg(short, long = "formalism", default_value = "all")]
        formalisms: Vec<String>,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// First- and second-order interaction coefficients of a triple
    Interaction {
        solvent: String,
        i: String,
        j: String,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Binary mixing enthalpy across composition
    Mixing {
        a: String,
        b: String,
        /// Number of composition points
        #[arg(long, default_value_t = 11)]
        points: usize,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Liquidus temperature of the solvent
    Liquidus {
        solvent: String,
        solutes: String,
        /// Thermodynamic database supplying the fusion enthalpy
        #[arg(long)]
        tdb: Option<PathBuf>,
        /// Melting point override [K]
        #[arg(long)]
        tm: Option<f64>,
        /// Fusion enthalpy override [J/mol]
        #[arg(long)]
        fusion_enthalpy: Option<f64>,
        #[arg(short, long = "formalism", default_value = "all")]
        formalisms: Vec<String>,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Inspect a thermodynamic database
    Tdb {
        path: PathBuf,
        /// Function to evaluate
        #[arg(long)]
        function: Option<String>,
        /// Element whose fusion enthalpy to derive (needs --temperature = Tm)
        #[arg(long)]
        fusion: Option<String>,
        /// Temperature [K]
        #[arg(short, long, default_value_t = 298.15)]
        temperature: f64,
    },
    /// Run a YAML job file
    Run { job: PathBuf },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let format = cli.format;
    match cli.command {
        Commands::Activity {
            solvent,
            solutes,
            targets,
            formalisms,
            model,
        } => {
            let comp = Composition::with_solvent(&solvent, &solutes)?;
            let engine = model.setup().engine()?;
            let formalisms = parse_formalisms(&formalisms)?;
            let report = ActivityReport::compute(&engine, &comp, &solvent, &targets, &formalisms, &model.conditions()?);
            emit(format, &report)
        }
        Commands::Interaction { solvent, i, j, model } => {
            let engine = model.setup().engine()?;
            let coefficients = engine.interaction_coefficients(&solvent, &i, &j, &model.conditions()?);
            emit(format, &InteractionReport(coefficients))
        }
        Commands::Mixing { a, b, points, model } => {
            let engine = model.setup().engine()?;
            let cond = model.conditions()?;
            let curve = engine
                .model()
                .pair()
                .mixing_curve(&engine.element(&a), &engine.element(&b), points, &cond);
            emit(
                format,
                &MixingReport {
                    a,
                    b,
                    t_k: cond.t_k(),
                    state: cond.state,
                    curve,
                },
            )
        }
        Commands::Liquidus {
            solvent,
            solutes,
            tdb,
            tm,
            fusion_enthalpy,
            formalisms,
            model,
        } => {
            let comp = Composition::with_solvent(&solvent, &solutes)?;
            let engine = model.setup().engine()?;
            let database = tdb.as_deref().map(ThermoDatabase::load).transpose()?;
            let mut solver = LiquidusSolver::new(&engine).accurate(model.accurate);
            if let Some(db) = &database {
                solver = solver.with_database(db);
            }
            let overrides = FusionOverride {
                tm_k: tm,
                enthalpy: fusion_enthalpy,
            };
            let result = solver.solve_all(&comp, &solvent, &parse_formalisms(&formalisms)?, overrides)?;
            emit(format, &LiquidusReport(result))
        }
        Commands::Tdb {
            path,
            function,
            fusion,
            temperature,
        } => {
            let db = ThermoDatabase::load(&path)?;
            let report = match (function, fusion) {
                (Some(name), _) => TdbReport::Value {
                    g: db.evaluate(&name, temperature)?,
                    function: name,
                    t_k: temperature,
                },
                (None, Some(element)) => TdbReport::Fusion(db.fusion_enthalpy(&element, temperature)?),
                (None, None) => {
                    let mut names: Vec<String> = db.function_names().map(str::to_string).collect();
                    names.sort();
                    TdbReport::Functions(names)
                }
            };
            emit(format, &report)
        }
        Commands::Run { job } => {
            let loaded = Job::load(&job)?;
            let report = loaded.run(job.parent())?;
            emit(format, &report)
        }
    }
}

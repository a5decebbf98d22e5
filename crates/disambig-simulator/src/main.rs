//! `disambig-sim`: run disambiguation steps and simulations over JSON fixtures

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use disambig_core::{
    DisambiguationEngine, DisambiguationMode, PrefixTreeRenderer, SelectionInfo, SelectionPriority, StepOptions,
    StepRequest,
};
use disambig_plan::{LandmarkCategory, PlanningTask};
use disambig_policy::{EdgeSelectionType, PolicyRegistry};
use disambig_simulator::{SimulationFixture, SimulationInput, SimulationRunner};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

fn fixture_arg() -> Arg {
    Arg::new("fixture")
        .long("fixture")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("JSON file with plans and landmarks")
}

fn view_arg() -> Arg {
    Arg::new("view")
        .long("view")
        .help("select, build_forward or build_backward")
}

fn priority_arg() -> Arg {
    Arg::new("priority")
        .long("priority")
        .help("MAX_PLANS, MIN_PLANS, RANDOM, INIT_FORWARD or GOAL_BACKWARD")
}

fn cli() -> Command {
    Command::new("disambig-sim")
        .version(disambig_simulator::VERSION)
        .about("Plan disambiguation simulator")
        .subcommand_required(true)
        .subcommand(
            Command::new("simulate")
                .about("Run replicated automated disambiguation")
                .arg(fixture_arg())
                .arg(
                    Arg::new("config")
                        .long("config")
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML simulation setting; flags override it"),
                )
                .arg(view_arg())
                .arg(priority_arg())
                .arg(Arg::new("policy").long("policy").help("Edge selection policy name"))
                .arg(Arg::new("category").long("category").help("Landmark category"))
                .arg(
                    Arg::new("replicates")
                        .long("replicates")
                        .value_parser(value_parser!(usize))
                        .help("Number of replicates"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .value_parser(value_parser!(u64))
                        .help("Random seed for reproducibility"),
                )
                .arg(
                    Arg::new("max-steps")
                        .long("max-steps")
                        .value_parser(value_parser!(usize))
                        .help("Selections after which a replicate gives up"),
                )
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Directory for raw output and metrics JSON"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print the summary as JSON"),
                ),
        )
        .subcommand(
            Command::new("step")
                .about("Run one disambiguation step and print its report")
                .arg(fixture_arg())
                .arg(
                    Arg::new("history")
                        .long("history")
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON list of selections made so far"),
                )
                .arg(view_arg())
                .arg(priority_arg())
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .default_value("42")
                        .value_parser(value_parser!(u64))
                        .help("Seed for the RANDOM priority"),
                ),
        )
        .subcommand(Command::new("policies").about("List edge selection policies"))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("simulate", args)) => simulate(args),
        Some(("step", args)) => step(args),
        Some(("policies", _)) => {
            for name in PolicyRegistry::with_defaults().names() {
                println!("{name}");
            }
            Ok(())
        }
        _ => anyhow::bail!("a subcommand is required"),
    }
}

fn load_fixture(path: &Path) -> Result<SimulationFixture> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading fixture {}", path.display()))?;
    SimulationFixture::from_json_str(&text).with_context(|| format!("parsing fixture {}", path.display()))
}

fn parsed<T>(args: &ArgMatches, id: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    args.get_one::<String>(id)
        .map(|raw| raw.parse::<T>().with_context(|| format!("--{id}")))
        .transpose()
}

fn simulation_input(args: &ArgMatches, fixture: &SimulationFixture) -> Result<SimulationInput> {
    let mut input = match args.get_one::<PathBuf>("config") {
        Some(path) => {
            let text =
                std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
            let mut input = SimulationInput::from_toml_str(&text)?;
            if input.task == PlanningTask::default() {
                input.task = fixture.task.clone();
            }
            input
        }
        None => SimulationInput::new(fixture.task.clone()),
    };

    if let Some(view) = parsed::<DisambiguationMode>(args, "view")? {
        input = input.with_view(view);
    }
    if let Some(priority) = parsed::<SelectionPriority>(args, "priority")? {
        input = input.with_priority(priority);
    }
    if let Some(policy) = parsed::<EdgeSelectionType>(args, "policy")? {
        input = input.with_edge_selection(policy);
    }
    if let Some(category) = parsed::<LandmarkCategory>(args, "category")? {
        input = input.with_landmark_category(category);
    }
    if let Some(replicates) = args.get_one::<usize>("replicates") {
        input = input.with_replicates(*replicates);
    }
    if let Some(seed) = args.get_one::<u64>("seed") {
        input = input.with_seed(*seed);
    }
    if let Some(max_steps) = args.get_one::<usize>("max-steps") {
        input = input.with_max_steps(*max_steps);
    }
    Ok(input)
}

fn simulate(args: &ArgMatches) -> Result<()> {
    let fixture_path = args
        .get_one::<PathBuf>("fixture")
        .context("--fixture is required")?;
    let fixture = load_fixture(fixture_path)?;
    let input = simulation_input(args, &fixture)?;

    let (plans, landmarks) = fixture.sources();
    let output = SimulationRunner::new(plans, landmarks, PrefixTreeRenderer).run(&input)?;

    if let Some(dir) = args.get_one::<PathBuf>("out") {
        std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let raw_path = dir.join(format!("{}.json", input.name()));
        let metrics_path = dir.join(format!("{}_metrics.json", input.name()));
        std::fs::write(&raw_path, serde_json::to_string_pretty(&output)?)
            .with_context(|| format!("writing {}", raw_path.display()))?;
        std::fs::write(&metrics_path, serde_json::to_string_pretty(&output.metrics())?)
            .with_context(|| format!("writing {}", metrics_path.display()))?;
        tracing::info!(raw = %raw_path.display(), metrics = %metrics_path.display(), "wrote simulation output");
    }

    if args.get_flag("json") {
        println!("{}", serde_json::to_string_pretty(&output.summary())?);
    } else {
        print!("{}", output.report_text());
    }
    Ok(())
}

fn step(args: &ArgMatches) -> Result<()> {
    let fixture_path = args
        .get_one::<PathBuf>("fixture")
        .context("--fixture is required")?;
    let fixture = load_fixture(fixture_path)?;

    let history: Vec<SelectionInfo> = match args.get_one::<PathBuf>("history") {
        Some(path) => {
            let text =
                std::fs::read_to_string(path).with_context(|| format!("reading history {}", path.display()))?;
            serde_json::from_str(&text).with_context(|| format!("parsing history {}", path.display()))?
        }
        None => Vec::new(),
    };

    let mut options = StepOptions::new();
    if let Some(view) = parsed::<DisambiguationMode>(args, "view")? {
        options = options.with_mode(view);
    }
    if let Some(priority) = parsed::<SelectionPriority>(args, "priority")? {
        options = options.with_priority(priority);
    }
    let seed = args.get_one::<u64>("seed").copied().unwrap_or(42);

    let request = StepRequest {
        task: &fixture.task,
        plans: &fixture.plans,
        landmarks: &fixture.landmarks,
        history: &history,
        options,
    };
    let output = DisambiguationEngine::new(PrefixTreeRenderer).step(&request, &mut StdRng::seed_from_u64(seed))?;
    println!("{}", serde_json::to_string_pretty(&output.report())?);
    Ok(())
}

use clap::{Parser, ValueEnum};
use ecosim_core::{
    CellType, DiurnalCycle, EnvironmentSignals, FireConfig, IgnitionCause, Simulation,
    SimulationConfig, WeatherPattern,
};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Weather selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Weather {
    Clear,
    Cloudy,
    LightRain,
    HeavyRain,
    Storm,
    Heatwave,
}

impl From<Weather> for WeatherPattern {
    fn from(weather: Weather) -> Self {
        match weather {
            Weather::Clear => Self::Clear,
            Weather::Cloudy => Self::Cloudy,
            Weather::LightRain => Self::LightRain,
            Weather::HeavyRain => Self::HeavyRain,
            Weather::Storm => Self::Storm,
            Weather::Heatwave => Self::Heatwave,
        }
    }
}

/// Fire parameter preset
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Season {
    Default,
    Dry,
    Wet,
}

/// Ecosystem simulation demo with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "ecosim-demo")]
#[command(about = "Headless meadow ecosystem and wildfire demo", long_about = None)]
struct Args {
    /// Grid width in cells
    #[arg(long, default_value_t = 200)]
    width: usize,

    /// Grid height in cells
    #[arg(long, default_value_t = 120)]
    height: usize,

    /// Number of ticks to run
    #[arg(short, long, default_value_t = 500)]
    ticks: u64,

    /// Random seed
    #[arg(short, long, default_value_t = 0x5EED)]
    seed: u64,

    /// Daily minimum temperature
    #[arg(long, default_value_t = 15.0)]
    min_temperature: f32,

    /// Daily maximum temperature
    #[arg(long, default_value_t = 40.0)]
    max_temperature: f32,

    /// Simulated hours per tick
    #[arg(long, default_value_t = 0.1)]
    hours_per_tick: f32,

    /// Weather pattern
    #[arg(short, long, value_enum, default_value_t = Weather::Clear)]
    weather: Weather,

    /// Fire parameter preset
    #[arg(short = 'p', long, value_enum, default_value_t = Season::Default)]
    season: Season,

    /// Number of foliage cells to ignite at the start (0 = none)
    #[arg(short = 'i', long, default_value_t = 3)]
    ignite_count: usize,

    /// Report interval in ticks
    #[arg(short, long, default_value_t = 50)]
    report_interval: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    println!("=== Ecosystem Simulation Demo ===\n");

    let fire = match args.season {
        Season::Default => FireConfig::default(),
        Season::Dry => FireConfig::dry_season(),
        Season::Wet => FireConfig::wet_season(),
    };
    let config = SimulationConfig::new(args.width, args.height)
        .with_seed(args.seed)
        .with_fire(fire);

    let mut sim = match Simulation::new(config) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("Invalid configuration: {err}");
            std::process::exit(2);
        }
    };
    println!(
        "Created {}x{} grid, {} chunks",
        args.width,
        args.height,
        sim.scheduler().chunk_count()
    );

    let surface = sim.populate_meadow();
    let stats = sim.get_stats();
    println!(
        "Meadow: surface row {}, {} plant cells, {} water, {} worms, {} insects",
        surface, stats.plants, stats.water, stats.worms, stats.insects
    );

    let mut cycle = DiurnalCycle::new(args.min_temperature, args.max_temperature, args.hours_per_tick);
    cycle.set_weather(args.weather.into());
    println!(
        "Weather: {}, {:.0}-{:.0} degrees, {} h/tick\n",
        WeatherPattern::from(args.weather),
        args.min_temperature,
        args.max_temperature,
        args.hours_per_tick
    );

    ignite_foliage(&mut sim, args.ignite_count, args.seed);

    println!("Running simulation...\n");
    println!("  Tick | Hour  | Temp  | Chunks | Fires | Peak | Burned | Plants | Seeds | Insects");
    println!("-------|-------|-------|--------|-------|------|--------|--------|-------|--------");

    for _ in 0..args.ticks {
        sim.tick(&cycle);
        cycle.advance();

        if sim.current_tick() % args.report_interval.max(1) == 0 {
            let s = sim.get_stats();
            println!(
                "{:6} | {:5.1} | {:5.1} | {:6} | {:5} | {:4} | {:6} | {:6} | {:5} | {:7}",
                s.tick,
                cycle.time_of_day(),
                cycle.ambient_temperature(),
                s.active_chunks,
                s.active_fires,
                s.peak_fires,
                s.cells_consumed,
                s.plants,
                s.seeds,
                s.insects
            );
        }
    }

    let stats = sim.get_stats();
    let fire = sim.fire().stats();
    println!("\n=== Simulation Complete ===");
    println!("Ticks: {}", stats.tick);
    println!("Cells burned out: {}", stats.cells_consumed);
    println!("Peak simultaneous fires: {}", stats.peak_fires);
    println!("Embers thrown: {}", fire.embers_thrown);
    println!("Lightning strikes: {}", fire.lightning_strikes);
    println!("Ignitions by cause:");
    for cause in IgnitionCause::ALL {
        let name = cause.to_string();
        println!("  {:<12} {}", name, fire.ignitions(cause));
    }
    println!(
        "Census: {} plant, {} seed, {} insect, {} worm, {} dead matter, {} soil",
        stats.plants,
        stats.seeds,
        stats.insects,
        stats.worms,
        stats.dead_matter,
        sim.grid().count(CellType::Soil)
    );
}

/// Set a random selection of plant cells alight
fn ignite_foliage(sim: &mut Simulation, count: usize, seed: u64) {
    if count == 0 {
        return;
    }
    let grid = sim.grid();
    let foliage: Vec<usize> = (0..grid.len())
        .filter(|&idx| {
            grid.cell_type(idx) == CellType::Plant && grid.sub_state(idx).organ().is_some()
        })
        .collect();
    if foliage.is_empty() {
        warn!("No plants to ignite");
        return;
    }

    let mut rng = StdRng::seed_from_u64(seed ^ 0xF1BE);
    let mut ignited = 0;
    for &idx in foliage.choose_multiple(&mut rng, count) {
        if sim.start_fire_at_index(idx) {
            ignited += 1;
        }
    }
    info!("Ignited {} of {} requested plant cells", ignited, count);
}

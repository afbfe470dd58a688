use std::path::{ Path, PathBuf };
use std::time::Instant;

use clap::Parser;
use log::{ info, LevelFilter };

use prism_tracer::camera::{ Camera, RenderMode };
use prism_tracer::canvas::Canvas;
use prism_tracer::consts::RECURSION_DEPTH;
use prism_tracer::model;
use prism_tracer::scene::Scene;
use prism_tracer::world::World;

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Mode {
    Flat,
    Recursive,
    Dispersion,
}

impl From<Mode> for RenderMode {
    fn from(mode: Mode) -> RenderMode {
        match mode {
            Mode::Flat => RenderMode::Flat,
            Mode::Recursive => RenderMode::Recursive,
            Mode::Dispersion => RenderMode::Dispersive,
        }
    }
}

#[derive(Copy, Clone, Debug, clap::ValueEnum)]
enum Fixture {
    Cornell,
    Prism,
}

#[derive(Parser)]
#[clap(name = "prism-tracer")]
#[clap(about = "A Whitted-style triangle ray tracer with chromatic dispersion")]
struct Args {
    /// Built-in scene to render
    #[clap(long, value_enum, default_value = "prism")]
    fixture: Fixture,

    /// JSON scene description; overrides --fixture
    #[clap(long)]
    scene: Option<PathBuf>,

    /// Transport driver
    #[clap(long, value_enum, default_value = "dispersion")]
    mode: Mode,

    /// Maximum recursion depth
    #[clap(long, default_value_t = RECURSION_DEPTH)]
    depth: u32,

    /// Screen width in pixels (fixture scenes only)
    #[clap(long, default_value_t = 200)]
    width: usize,

    /// Screen height in pixels (fixture scenes only)
    #[clap(long, default_value_t = 200)]
    height: usize,

    /// Output image path; .ppm and .png are supported
    #[clap(short, long, default_value = "out.ppm")]
    output: PathBuf,

    /// Log per-frame details
    #[clap(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let (world, camera) = load(&args);
    info!("scene: {} triangles, {} materials",
        world.triangles.len(), world.materials.len());
    info!("rendering {}x{} ({:?}, depth {})",
        camera.width, camera.height, args.mode, args.depth);

    let started = Instant::now();
    let canvas = camera.render(&world, args.mode.into(), args.depth);
    info!("render time: {} ms", started.elapsed().as_millis());

    save(&canvas, &args.output);
    info!("saved render to {}", args.output.display());
}

fn load(args: &Args) -> (World, Camera) {
    match &args.scene {
        Some(path) => {
            let scene = Scene::load(path).expect("scene description should load");
            (scene.world, scene.camera)
        }
        None => {
            let world = match args.fixture {
                Fixture::Cornell => model::cornell_box(),
                Fixture::Prism => model::triangular_prism(),
            };
            (world, model::default_camera(args.width, args.height))
        }
    }
}

fn save(canvas: &Canvas, path: &Path) {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => canvas.save_png(path).expect("PNG output should save"),
        _ => canvas.save_ppm(path).expect("PPM output should save"),
    }
}

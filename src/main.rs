//! Animated walk through the Gram-Schmidt process.
//!
//! Plays one of the scripted scenes (or the same script over a random basis)
//! in an SDL2 window: base vectors, their normalization, each projection with
//! its right-angle marker, and the residuals that become the orthonormal
//! vectors.

mod axes;
mod items;

use crate::axes::Axes;
use clap::Parser;
use gsviz::DomainError;
use gsviz::elbow::DEFAULT_ARM_LENGTH;
use gsviz::scene::{Scene, SceneKind};
use gsviz::timeline::Shape;
use log::LevelFilter;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;
use sdl2::pixels::Color;
use sdl2::rect::Rect;
use sdl2::render::{BlendMode, Canvas};
use sdl2::ttf::Font;
use sdl2::video::Window;
use std::time::{Duration, Instant};

/// Window title displayed in the title bar
const TITLE: &str = "Gram-Schmidt";
/// Default window width in pixels
const WINDOW_WIDTH: u32 = 1280;
/// Default window height in pixels
const WINDOW_HEIGHT: u32 = 720;
/// Background color for the canvas
const BACKGROUND: Color = Color::BLACK;
/// Path to the font used for captions and labels
const FONT_PATH: &str = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf";
/// Frames per second the loop aims for
const FPS: u32 = 60;
/// Top-left corner of the caption frame
const CAPTION_ORIGIN: (i32, i32) = (24, 24);

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("SDL error: {0}")]
    Sdl(String),

    #[error("cannot load font {path}: {reason}")]
    Font { path: String, reason: String },

    #[error("invalid scene: {0}")]
    Domain(#[from] DomainError),
}

impl From<String> for ViewerError {
    fn from(err: String) -> Self {
        ViewerError::Sdl(err)
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
#[command(next_line_help = true)]
struct Args {
    /// Scene to play: plane2d, span2d-in3d or span3d.
    #[arg(long, default_value = "plane2d")]
    scene: SceneKind,
    /// Replaces the scene's base vectors with random ones.
    #[arg(long)]
    random: bool,
    /// Seed for --random.
    #[arg(long, requires = "random")]
    seed: Option<u64>,
    /// Arm length of the right-angle markers, in scene units.
    #[arg(long, default_value_t = DEFAULT_ARM_LENGTH, value_parser = positive_finite)]
    arm_length: f64,
    /// Playback rate.
    #[arg(long, default_value_t = 1.0, value_parser = positive_finite)]
    speed: f64,
    /// Window width in pixels.
    #[arg(long, default_value_t = WINDOW_WIDTH)]
    width: u32,
    /// Window height in pixels.
    #[arg(long, default_value_t = WINDOW_HEIGHT)]
    height: u32,
    /// TrueType font for captions and labels.
    #[arg(long, default_value = FONT_PATH)]
    font: String,
    /// Starts over once the scene ends instead of holding the last frame.
    #[arg(long = "loop")]
    repeat: bool,
    /// Raises the log level; repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Parses a float that must be finite and greater than zero.
fn positive_finite(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("`{s}` is not a number: {e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("`{s}` must be a finite number greater than zero"))
    }
}

/// Initialises logging; `RUST_LOG` still overrides the level picked here.
fn setup_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::builder().filter_level(level).parse_default_env().init();
}

/// Builds the scene to play, either a preset or its script over a random basis.
///
/// # Arguments
///
/// * `args` - Parsed command line; `scene`, `random`, `seed` and `arm_length` are read
fn load_scene(args: &Args) -> Result<Scene, DomainError> {
    if !args.random {
        return Scene::preset(args.scene, args.arm_length);
    }
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    Scene::random(args.scene, args.arm_length, &mut rng)
}

/// Clears the canvas and draws the scene as it stands at `t` seconds.
///
/// # Arguments
///
/// * `canvas` - SDL2 canvas for rendering
/// * `axes` - Mapping from scene coordinates to window pixels
/// * `font` - Font for captions and labels
/// * `scene` - The scene whose timeline is sampled
/// * `caption_frame` - Box the captions are drawn in
/// * `t` - Playback time in seconds
fn draw_frame(
    canvas: &mut Canvas<Window>,
    axes: &Axes,
    font: &Font,
    scene: &Scene,
    caption_frame: Rect,
    t: f64,
) -> Result<(), ViewerError> {
    canvas.set_draw_color(BACKGROUND);
    canvas.clear();

    axes.draw(canvas)?;
    for (name, at) in axes.labels() {
        items::draw_text(canvas, font, name, at, Color::WHITE, 1.0)?;
    }
    items::draw_caption_frame(canvas, caption_frame)?;

    let mut frame = scene.timeline.frame(t);
    // Planes go underneath everything else
    frame.sort_by_key(|drawn| !matches!(drawn.shape, Shape::Plane { .. }));
    let caption_at = (
        caption_frame.x() + items::CAPTION_PADDING,
        caption_frame.y() + items::CAPTION_PADDING,
    );
    for drawn in &frame {
        items::draw(canvas, axes, font, caption_at, drawn)?;
    }
    Ok(())
}

/// Opens the window and plays the scene until the user quits.
///
/// # Arguments
///
/// * `args` - Parsed command line selecting the scene, window size, font and playback
fn run(args: &Args) -> Result<(), ViewerError> {
    let scene = load_scene(args)?;
    log::info!(
        "Playing '{}' over {:?} ({:.1}s)",
        scene.kind.title(),
        scene.basis,
        scene.duration()
    );

    let sdl_context = sdl2::init()?;
    let video_subsystem = sdl_context.video()?;
    let ttf_context = sdl2::ttf::init().map_err(|e| e.to_string())?;

    let window = video_subsystem
        .window(&format!("{TITLE}: {}", scene.kind.title()), args.width, args.height)
        .position_centered()
        .build()
        .map_err(|e| e.to_string())?;
    let font = ttf_context
        .load_font(&args.font, 22)
        .map_err(|reason| ViewerError::Font { path: args.font.clone(), reason })?;

    let mut canvas = window.into_canvas().build().map_err(|e| e.to_string())?;
    canvas.set_blend_mode(BlendMode::Blend);

    let axes = Axes::new(scene.axes, scene.camera, args.width, args.height);

    // Size the caption frame for the widest caption
    let mut widest = (0, 0);
    for caption in &scene.captions {
        let (w, h) = font.size_of(caption).map_err(|e| e.to_string())?;
        widest = (widest.0.max(w), widest.1.max(h));
    }
    let padding = items::CAPTION_PADDING as u32 * 2;
    let caption_frame = Rect::new(
        CAPTION_ORIGIN.0,
        CAPTION_ORIGIN.1,
        widest.0 + padding,
        widest.1 + padding,
    );

    let mut last_frame_time = Instant::now();
    let mut time: f64 = 0.0;
    let mut paused = false;
    let mut event_pump = sdl_context.event_pump()?;

    'running: loop {
        for event in event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown { keycode: Some(Keycode::Escape), .. } => break 'running,
                Event::KeyDown { keycode: Some(Keycode::Space), .. } => {
                    paused = !paused;
                    log::debug!("{} at {:.2}s", if paused { "paused" } else { "resumed" }, time);
                }
                Event::KeyDown { keycode: Some(Keycode::R), .. } => {
                    log::debug!("restart");
                    time = 0.0;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame_time).as_secs_f64();
        last_frame_time = now;
        if !paused {
            time += dt * args.speed;
        }
        if time > scene.duration() {
            if args.repeat {
                time = 0.0;
            } else {
                time = scene.duration();
            }
        }

        draw_frame(&mut canvas, &axes, &font, &scene, caption_frame, time)?;
        canvas.present();
        ::std::thread::sleep(Duration::new(0, 1_000_000_000u32 / FPS));
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);
    if let Err(err) = run(&args) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

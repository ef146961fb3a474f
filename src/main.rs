// src/main.rs
use anyhow::{Context, Result};
use clap::Parser;
use nannou::image::DynamicImage;
use nannou::prelude::*;
use nannou::wgpu;
use std::path::PathBuf;
use std::sync::OnceLock;
use tracing::{error, info, warn, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use imagesaver::{
    args::{normalize_legacy_args, Cli, Command},
    config::Config,
    constants::image::MAX_BACKGROUND_EXTENT,
    editor::run_configure,
    models::{BackgroundMode, ScreensaverConfiguration},
    render::{load_image, ItemRenderer, TextureLibrary},
    services::ConfigurationStore,
    views::{BackgroundManager, Bounds, ScreensaverScene},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SaverMode {
    // fullscreen, exits on input
    Run,
    // preview window
    Window,
}

// everything the nannou model needs, prepared before the event loop starts
struct Launch {
    mode: SaverMode,
    config: Config,
    settings: ScreensaverConfiguration,
}

static LAUNCH: OnceLock<Launch> = OnceLock::new();

struct Model {
    mode: SaverMode,

    // Core components:
    scene: ScreensaverScene,
    background: BackgroundManager,

    // Rendering components:
    library: TextureLibrary,
    renderer: ItemRenderer,

    // Input
    mouse_move_threshold: f32,
    mouse_origin: Option<Point2>,

    // FPS
    fps: f32,
    debug_flag: bool,
}

fn main() -> Result<()> {
    init_logging()?;

    let mut cli = Cli::parse_from(normalize_legacy_args(std::env::args()));
    let config = Config::load().context("Failed to load config.toml")?;
    let store = open_store(cli.store.take(), &config)?;

    let mode = match cli.take_command() {
        Command::Configure { command } => {
            return run_configure(store, command).context("Configure failed");
        }
        Command::Run => SaverMode::Run,
        Command::Window => SaverMode::Window,
    };

    let settings = store.load().context("Failed to load settings")?;
    info!(
        images = settings.images.len(),
        behaviors = settings.enabled_behaviors().count(),
        ?mode,
        "Starting screensaver"
    );

    if LAUNCH.set(Launch { mode, config, settings }).is_err() {
        anyhow::bail!("screensaver already started");
    }

    nannou::app(model).update(update).run();
    Ok(())
}

fn init_logging() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set up logging")?;
    Ok(())
}

fn open_store(cli_root: Option<PathBuf>, config: &Config) -> Result<ConfigurationStore> {
    let root = match cli_root.or_else(|| config.resolve_store_directory()) {
        Some(root) => root,
        None => ConfigurationStore::default_root().context("Failed to locate the settings store")?,
    };
    ConfigurationStore::open(&root, config.store.store_options())
        .with_context(|| format!("Failed to open settings store at {}", root.display()))
}

fn model(app: &App) -> Model {
    let launch = LAUNCH
        .get()
        .expect("launch options are set before the app starts");
    let config = &launch.config;
    let settings = &launch.settings;

    // Decode the background image; it is uploaded once the window exists
    let background_image = settings
        .background_image
        .as_ref()
        .filter(|_| settings.background_mode == BackgroundMode::Image)
        .and_then(|item| match load_image(item.file_path(), MAX_BACKGROUND_EXTENT) {
            Ok(image) => Some(image),
            Err(e) => {
                warn!(path = %item.file_path().display(), error = %e, "Background image unavailable");
                None
            }
        });

    // Create window
    let transparent =
        BackgroundManager::needs_transparent_window(settings, background_image.is_some());
    let builder = app
        .new_window()
        .title(&config.window.title)
        .transparent(transparent)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_moved(mouse_moved)
        .resized(resized);
    let builder = match launch.mode {
        SaverMode::Run => builder.fullscreen().decorations(false),
        SaverMode::Window => builder.size(config.window.width, config.window.height),
    };
    let window_id = builder.build().expect("Failed to build window");
    if launch.mode == SaverMode::Run {
        if let Some(window) = app.window(window_id) {
            window.set_cursor_visible(false);
        }
    }

    // Load item images
    let library = TextureLibrary::load(
        app,
        settings.images.iter().map(|item| item.file_path()),
        config.rendering.max_item_extent,
    );

    let background_texture = background_image
        .map(|image| wgpu::Texture::from_image(app, &DynamicImage::ImageRgba8(image)));

    let background = BackgroundManager::new(
        settings,
        background_texture,
        config.animation.background_fade_in,
        app.time,
    );
    let scene = ScreensaverScene::new(settings, Bounds::from_rect(app.window_rect()), library.len());

    Model {
        mode: launch.mode,
        scene,
        background,
        library,
        renderer: ItemRenderer::new(config.rendering.tint_levels, config.rendering.tint_cache_size),
        mouse_move_threshold: config.input.mouse_move_threshold,
        mouse_origin: None,
        fps: 0.0,
        debug_flag: false,
    }
}

fn key_pressed(app: &App, model: &mut Model, key: Key) {
    match key {
        Key::F1 => model.debug_flag = !model.debug_flag,
        Key::Escape => app.quit(),
        _ if model.mode == SaverMode::Run => app.quit(),
        _ => (),
    }
}

fn mouse_pressed(app: &App, model: &mut Model, _button: MouseButton) {
    if model.mode == SaverMode::Run {
        app.quit();
    }
}

fn mouse_moved(app: &App, model: &mut Model, position: Point2) {
    if model.mode != SaverMode::Run {
        return;
    }
    // the first event only records where the cursor rests
    match model.mouse_origin {
        None => model.mouse_origin = Some(position),
        Some(origin) if origin.distance(position) > model.mouse_move_threshold => app.quit(),
        Some(_) => (),
    }
}

fn resized(_app: &App, model: &mut Model, size: Vec2) {
    model.scene.set_bounds(Bounds::new(size.x, size.y));
}

fn update(app: &App, model: &mut Model, update: Update) {
    let dt = update.since_last.as_secs_f32();
    // FPS calculation
    if model.debug_flag && dt > 0.0 {
        model.fps = 1.0 / dt;
    }

    model.scene.update(app.time, dt);
    model.renderer.prepare(app, &model.scene, &model.library);
}

// Draw the state of Model into the given Frame
fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();

    model.background.draw(&draw, window_rect, app.time);
    model
        .renderer
        .draw(&draw, window_rect, &model.scene, &model.library);

    if model.debug_flag {
        draw_debug_overlay(&draw, window_rect, model);
    }

    if let Err(e) = draw.to_frame(app, &frame) {
        error!("Failed to render frame: {:?}", e);
    }
}

fn draw_debug_overlay(draw: &Draw, window_rect: Rect, model: &Model) {
    let text = format!(
        "FPS: {:.1}\nitems: {}\nemitted: {}\ntinted textures: {}",
        model.fps,
        model.scene.live_count(),
        model.scene.total_emitted(),
        model.renderer.cached_textures(),
    );
    let area = Rect::from_w_h(240.0, 80.0).top_left_of(window_rect.pad(20.0));
    draw.rect().xy(area.xy()).wh(area.wh()).color(rgba(0.0, 0.0, 0.0, 0.6));
    draw.text(&text)
        .xy(area.xy())
        .wh(area.pad(8.0).wh())
        .left_justify()
        .align_text_top()
        .color(WHITE);
}

// src/editor/commands.rs
//
// The `configure` command surface. Each subcommand opens a settings session,
// applies its edits through the session's setters, and saves if anything
// changed.

use clap::{Args, Subcommand, ValueEnum};
use std::fmt::Write as _;
use std::path::PathBuf;

use super::{BehaviorValue, EditorError, Result, SettingsSession};
use crate::animation::EasingType;
use crate::models::{
    BackgroundMode, BackgroundScaleMode, Color, ConfigurationBehaviorType, EmitLocation,
};
use crate::services::ConfigurationStore;

const DEFAULT_END_DURATION: f32 = 1.0;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigureCommand {
    /// Print the current settings
    Show,
    /// Choose what is drawn behind the images
    Background {
        #[command(subcommand)]
        command: BackgroundCommand,
    },
    /// Emission rate, population cap and emit location
    Emit(EmitArgs),
    /// How long each image stays on screen
    Lifetime(LifetimeArgs),
    /// Manage the emitted images
    Image {
        #[command(subcommand)]
        command: ImageCommand,
    },
    /// Edit one behavior (color, alpha, scale, rotation)
    Behavior(BehaviorArgs),
    /// Restore the default settings and delete all stored images
    Reset,
    /// Delete stored image files no longer referenced by the settings
    Prune,
}

#[derive(Subcommand, Debug, Clone)]
pub enum BackgroundCommand {
    /// Show the live desktop
    Desktop,
    /// Solid color, e.g. "#203040"
    Color { color: Color },
    /// Static image
    Image {
        path: PathBuf,
        #[arg(long)]
        scale: Option<BackgroundScaleMode>,
    },
    /// How a background image is fitted to the screen
    Scale { mode: BackgroundScaleMode },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationKind {
    Random,
    Center,
    Custom,
}

#[derive(Args, Debug, Clone, Default)]
pub struct EmitArgs {
    /// Images emitted per second
    #[arg(long)]
    pub rate: Option<f32>,
    /// Maximum number of images on screen
    #[arg(long)]
    pub max: Option<u32>,
    #[arg(long, value_enum)]
    pub location: Option<LocationKind>,
    /// Custom location, pixels from the left edge
    #[arg(long)]
    pub x: Option<u32>,
    /// Custom location, pixels from the top edge
    #[arg(long)]
    pub y: Option<u32>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LifetimeArgs {
    /// Images stay until replaced by newer ones
    #[arg(long, conflicts_with = "seconds")]
    pub infinite: bool,
    /// Images disappear after this many seconds
    #[arg(long)]
    pub seconds: Option<f32>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ImageCommand {
    /// Copy one or more images into the settings store
    Add {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Remove the image at INDEX (see `image list`)
    Remove { index: usize },
    List,
}

#[derive(Args, Debug, Clone)]
pub struct BehaviorArgs {
    /// color, alpha, scale or rotation
    pub kind: ConfigurationBehaviorType,
    #[arg(long, conflicts_with = "disable")]
    pub enable: bool,
    #[arg(long)]
    pub disable: bool,
    /// Starting value (hex color for color, a number otherwise)
    #[arg(long, allow_hyphen_values = true)]
    pub start: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub end: Option<String>,
    /// Seconds from start to end
    #[arg(long)]
    pub duration: Option<f32>,
    /// linear, ease-in, ease-out or ease-in-out
    #[arg(long)]
    pub easing: Option<EasingType>,
    /// Value to move towards while an image is being retired
    #[arg(long, allow_hyphen_values = true, conflicts_with = "no_end_transition")]
    pub end_to: Option<String>,
    #[arg(long)]
    pub end_duration: Option<f32>,
    #[arg(long)]
    pub no_end_transition: bool,
    /// Drop the behavior entirely
    #[arg(long, conflicts_with_all = ["enable", "disable", "start", "end", "duration", "easing", "end_to", "no_end_transition"])]
    pub remove: bool,
}

pub fn run_configure(store: ConfigurationStore, command: ConfigureCommand) -> Result<()> {
    let mut session = SettingsSession::open(store)?;

    match command {
        ConfigureCommand::Show => {
            print!("{}", describe(&session));
            return Ok(());
        }
        ConfigureCommand::Background { command } => apply_background(&mut session, command)?,
        ConfigureCommand::Emit(args) => apply_emit(&mut session, args)?,
        ConfigureCommand::Lifetime(args) => apply_lifetime(&mut session, args)?,
        ConfigureCommand::Image { command } => match command {
            ImageCommand::Add { paths } => {
                for path in paths {
                    let index = session.add_image(&path)?;
                    println!("added [{}] {}", index, path.display());
                }
            }
            ImageCommand::Remove { index } => {
                let entry = session.remove_image(index)?;
                println!("removed [{}] {}", index, entry.original_file_name());
            }
            ImageCommand::List => {
                print!("{}", describe_images(&session));
                return Ok(());
            }
        },
        ConfigureCommand::Behavior(args) => apply_behavior(&mut session, args)?,
        ConfigureCommand::Reset => session.reset(),
        ConfigureCommand::Prune => {
            let removed = session.store().prune_orphans(session.configuration())?;
            println!("removed {} unreferenced image file(s)", removed);
            return Ok(());
        }
    }

    if session.is_dirty() {
        session.save()?;
        println!("settings saved to {}", session.store().settings_path().display());
    }
    Ok(())
}

fn apply_background(session: &mut SettingsSession, command: BackgroundCommand) -> Result<()> {
    match command {
        BackgroundCommand::Desktop => session.set_background_desktop(),
        BackgroundCommand::Color { color } => session.set_background_color(color),
        BackgroundCommand::Image { path, scale } => {
            session.set_background_image(&path)?;
            if let Some(mode) = scale {
                session.set_background_scale_mode(mode);
            }
        }
        BackgroundCommand::Scale { mode } => session.set_background_scale_mode(mode),
    }
    Ok(())
}

fn apply_emit(session: &mut SettingsSession, args: EmitArgs) -> Result<()> {
    if let Some(rate) = args.rate {
        session.set_emit_rate(rate)?;
    }
    if let Some(max) = args.max {
        session.set_max_emit_count(max);
    }

    let has_coordinates = args.x.is_some() || args.y.is_some();
    match (args.location, has_coordinates) {
        (Some(LocationKind::Random), _) => session.set_emit_location(EmitLocation::Random),
        (Some(LocationKind::Center), _) => session.set_emit_location(EmitLocation::Center),
        (Some(LocationKind::Custom), _) | (None, true) => {
            let (current_x, current_y) = match session.configuration().emit_location {
                EmitLocation::Custom { x, y } => (Some(x), Some(y)),
                _ => (None, None),
            };
            match (args.x.or(current_x), args.y.or(current_y)) {
                (Some(x), Some(y)) => session.set_custom_emit_location(x, y),
                _ => {
                    return Err(EditorError::InvalidValue(
                        "a custom emit location needs both --x and --y".to_string(),
                    ))
                }
            }
        }
        (None, false) => {}
    }
    Ok(())
}

fn apply_lifetime(session: &mut SettingsSession, args: LifetimeArgs) -> Result<()> {
    if args.infinite {
        session.set_infinite_lifetime(true);
    } else if let Some(seconds) = args.seconds {
        session.set_lifetime_seconds(seconds)?;
    }
    Ok(())
}

fn apply_behavior(session: &mut SettingsSession, args: BehaviorArgs) -> Result<()> {
    let kind = args.kind;
    if args.remove {
        if !session.remove_behavior(kind) {
            println!("{} was not configured", kind);
        }
        return Ok(());
    }

    let mut editor = session.behavior_editor(kind);
    if args.enable {
        editor.set_enabled(true);
    }
    if args.disable {
        editor.set_enabled(false);
    }
    if let Some(start) = &args.start {
        editor.set_start(BehaviorValue::parse(kind, start)?)?;
    }
    if let Some(end) = &args.end {
        editor.set_end(BehaviorValue::parse(kind, end)?)?;
    }
    if let Some(duration) = args.duration {
        editor.set_duration(duration);
    }
    if let Some(easing) = args.easing {
        editor.set_easing(easing);
    }
    if args.no_end_transition {
        editor.set_end_transition(None)?;
    } else if let Some(destination) = &args.end_to {
        let destination = BehaviorValue::parse(kind, destination)?;
        let duration = args.end_duration.unwrap_or(DEFAULT_END_DURATION);
        editor.set_end_transition(Some((destination, duration)))?;
    }

    println!("{}", editor.behavior().summary());
    session.apply_behavior(editor);
    Ok(())
}

/// Human-readable dump of a session's settings
pub fn describe(session: &SettingsSession) -> String {
    let config = session.configuration();
    let mut out = String::new();

    let background = match config.background_mode {
        BackgroundMode::Desktop => "desktop".to_string(),
        BackgroundMode::SolidColor => format!("solid color {}", config.background_color),
        BackgroundMode::Image => format!(
            "image {} ({:?})",
            session
                .background_image()
                .map(|entry| entry.original_file_name())
                .unwrap_or("<none>"),
            config.background_scale_mode
        ),
    };
    let _ = writeln!(out, "background:     {}", background);
    let _ = writeln!(out, "emit rate:      {} per second", config.image_emit_rate);
    let _ = writeln!(out, "max on screen:  {}", config.max_emit_count);
    let _ = writeln!(out, "emit location:  {}", config.emit_location);
    match config.lifetime() {
        Some(seconds) => {
            let _ = writeln!(out, "lifetime:       {} seconds", seconds);
        }
        None => {
            let _ = writeln!(out, "lifetime:       infinite");
        }
    }

    let _ = writeln!(out, "images:");
    out.push_str(&describe_images(session));

    let _ = writeln!(out, "behaviors:");
    if config.behaviors.is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for kind in ConfigurationBehaviorType::ALL {
        if let Some(behavior) = config.behavior(kind) {
            let _ = writeln!(out, "  {}", behavior.summary());
        }
    }
    out
}

fn describe_images(session: &SettingsSession) -> String {
    let mut out = String::new();
    if session.images().is_empty() {
        let _ = writeln!(out, "  (none)");
    }
    for (index, entry) in session.images().iter().enumerate() {
        let _ = writeln!(out, "  [{}] {}", index, entry.original_file_name());
    }
    out
}

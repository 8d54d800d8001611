//! Stagetris: stage-based falling-block puzzle game in the terminal.

mod app;
mod game;
mod grid;
mod input;
mod piece;
mod rng;
mod theme;
mod ui;

use anyhow::{Result, ensure};
use app::App;
use clap::{Parser, ValueEnum};
use std::time::Duration;

/// Options derived from CLI that affect game behaviour (fall speed, shape seed, frame cap).
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Baseline time per automatic descent; stage advances reset to this.
    pub fall_interval: Duration,
    /// Seed for the shape source; entropy when `None`.
    pub seed: Option<u64>,
    /// Minimum wall time per frame of the loop.
    pub frame_duration: Duration,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fall_interval: Duration::from_secs(1),
            seed: None,
            frame_duration: Duration::from_secs_f64(1.0 / 60.0),
        }
    }
}

impl GameConfig {
    fn from_args(args: &Args) -> Result<Self> {
        ensure!(
            args.frame_rate.is_finite() && args.frame_rate > 0.0,
            "--frame-rate must be a positive number, got {}",
            args.frame_rate
        );
        ensure!(
            args.fall_interval > 0.0,
            "--fall-interval must be positive, got {}",
            args.fall_interval
        );
        Ok(Self {
            fall_interval: Duration::try_from_secs_f64(args.fall_interval)?,
            seed: args.seed,
            frame_duration: Duration::try_from_secs_f64(1.0 / args.frame_rate)?,
        })
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_default();
    let config = GameConfig::from_args(&args)?;
    let mut app = App::new(&config, theme);
    app.run()?;
    println!("{}", app::summary(&app.snapshot()));
    Ok(())
}

/// Stage-based falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "stagetris",
    version,
    about = "Stage-based falling-block puzzle in the terminal. Clear a line to advance a stage; finish stage 10 to win.",
    long_about = "Stagetris is a terminal falling-block puzzle played over ten stages.\n\n\
        Steer the falling tetromino and complete horizontal rows. Each clear scores 100 \
        points per row and advances one stage. Meeting the goal on stage 10 wins; a piece \
        that cannot spawn ends the game.\n\n\
        CONTROLS:\n  Left/Right or h/l  Move     Up or k     Rotate CW   Down or j  Soft drop\n  \
        Space/Enter        Hard drop  P          Pause       R          Restart   Q / Esc  Quit\n\n\
        Use --theme to load a btop-style theme with piece_i .. piece_z colour keys."
)]
pub struct Args {
    /// Path to theme file (btop-style theme[key]=\"value\"). Uses the classic palette if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<std::path::PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Seed for the piece sequence, for reproducible games.
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Seconds per automatic one-row descent.
    #[arg(long, default_value = "1.0", value_name = "SECS")]
    pub fall_interval: f64,

    /// Target render frames per second.
    #[arg(long, default_value = "60.0", value_name = "RATE")]
    pub frame_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

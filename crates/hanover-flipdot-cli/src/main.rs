//! Hanover Flip-Dot Control Tool
//!
//! CLI for drawing on a Hanover flip-dot display over a serial port.

mod config;
mod life;
mod point;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hanover_flipdot_hw::protocol::{buffer_packet, format_hex};
use hanover_flipdot_hw::{Flipdot, PixelBuffer, SerialFlipdot};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use config::Config;
use life::{Life, GLIDER};
use point::Point;

#[derive(Parser)]
#[command(name = "flipdotctl")]
#[command(about = "Control tool for Hanover flip-dot displays")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file
    #[arg(short, long, default_value = "flipdot.toml")]
    config: PathBuf,

    /// Serial port (overrides configuration)
    #[arg(long)]
    port: Option<String>,

    /// Baud rate (overrides configuration)
    #[arg(long)]
    baud: Option<u32>,

    /// Display bus address (overrides configuration)
    #[arg(long)]
    address: Option<u8>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Turn every dot off
    Clear,
    /// Turn every visible dot on
    Fill,
    /// Light the given pixels, all others off
    Draw {
        /// Pixels as x,y
        #[arg(required = true)]
        pixels: Vec<Point>,
    },
    /// Print the frame for the given pixels without sending it
    Dump {
        /// Pixels as x,y
        pixels: Vec<Point>,
    },
    /// Run Conway's Game of Life
    Life {
        /// Stop after this many generations (runs until Ctrl-C if omitted)
        #[arg(long)]
        steps: Option<u64>,

        /// Delay between generations in milliseconds (overrides configuration)
        #[arg(long)]
        interval_ms: Option<u64>,

        /// Initial live cells as x,y (a glider if omitted)
        pixels: Vec<Point>,
    },
    /// Write a configuration file with default values
    InitConfig {
        /// Output path (defaults to --config)
        path: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Commands::InitConfig { path } = &cli.command {
        let path = path.as_ref().unwrap_or(&cli.config);
        Config::default().save(path)?;
        println!("Configuration written to: {}", path.display());
        return Ok(());
    }

    let mut config = Config::load_or_default(&cli.config)?;
    if let Some(port) = cli.port {
        config.serial.port = port;
    }
    if let Some(baud) = cli.baud {
        config.serial.baud = baud;
    }
    if let Some(address) = cli.address {
        config.display.address = address;
    }

    match cli.command {
        Commands::Clear => handle_clear(&config).await,
        Commands::Fill => handle_fill(&config).await,
        Commands::Draw { pixels } => handle_draw(&config, &pixels).await,
        Commands::Dump { pixels } => handle_dump(&config, &pixels),
        Commands::Life {
            steps,
            interval_ms,
            pixels,
        } => {
            let interval = interval_ms.unwrap_or(config.life.interval_ms);
            handle_life(&config, steps, interval, &pixels).await
        }
        Commands::InitConfig { .. } => Ok(()),
    }
}

fn open(config: &Config) -> Result<SerialFlipdot> {
    Flipdot::open_with_baud(
        &config.serial.port,
        config.serial.baud,
        config.display.address,
        config.display.rows,
        config.display.columns,
    )
    .with_context(|| format!("Failed to open flip-dot on {}", config.serial.port))
}

fn light(buffer: &mut PixelBuffer, pixels: &[Point]) -> Result<()> {
    for p in pixels {
        buffer
            .set(p.x, p.y, true)
            .with_context(|| format!("Cannot set pixel {}", p))?;
    }
    Ok(())
}

async fn handle_clear(config: &Config) -> Result<()> {
    let mut flipdot = open(config)?;
    flipdot.clear();
    flipdot.send().await?;
    flipdot.stop().await?;
    println!("Display cleared");
    Ok(())
}

async fn handle_fill(config: &Config) -> Result<()> {
    let mut flipdot = open(config)?;
    flipdot.fill(true);
    flipdot.send().await?;
    flipdot.stop().await?;
    println!("Display filled");
    Ok(())
}

async fn handle_draw(config: &Config, pixels: &[Point]) -> Result<()> {
    let mut flipdot = open(config)?;
    for p in pixels {
        flipdot
            .set(p.x, p.y, true)
            .with_context(|| format!("Cannot set pixel {}", p))?;
    }
    let written = flipdot.send().await?;
    flipdot.stop().await?;
    println!("Drew {} pixel(s), {} bytes sent", pixels.len(), written);
    Ok(())
}

fn handle_dump(config: &Config, pixels: &[Point]) -> Result<()> {
    let mut buffer = PixelBuffer::new(
        config.display.rows,
        config.display.columns,
        config.display.address,
    )?;
    light(&mut buffer, pixels)?;

    let packet = buffer_packet(&buffer)?;
    println!("Frame ({} bytes):", packet.len());
    println!("{}", format_hex(&packet));
    Ok(())
}

async fn handle_life(
    config: &Config,
    steps: Option<u64>,
    interval_ms: u64,
    pixels: &[Point],
) -> Result<()> {
    let mut flipdot = open(config)?;
    let buffer = flipdot.buffer();
    let mut life = Life::new(buffer.columns(), buffer.visible_rows());

    let seed: &[Point] = if pixels.is_empty() { &GLIDER } else { pixels };
    for p in seed {
        if p.x >= life.width() || p.y >= life.height() {
            anyhow::bail!(
                "Cell {} is outside the {}x{} grid",
                p,
                life.width(),
                life.height()
            );
        }
        life.set(p.x, p.y, true);
    }

    let interval = Duration::from_millis(interval_ms);
    let mut generation: u64 = 0;
    info!(
        "Running Game of Life on {}x{} (population {})",
        life.width(),
        life.height(),
        life.population()
    );

    loop {
        for (x, y, alive) in life.cells() {
            flipdot.set(x, y, alive)?;
        }
        flipdot.send().await?;
        debug!(
            "Generation {} sent (population {})",
            generation,
            life.population()
        );

        if steps.is_some_and(|limit| generation >= limit) {
            break;
        }

        tokio::select! {
            _ = tokio::time::sleep(interval) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, stopping");
                break;
            }
        }

        life.step();
        generation += 1;
    }

    flipdot.stop().await?;
    println!("Stopped after {} generation(s)", generation);
    Ok(())
}

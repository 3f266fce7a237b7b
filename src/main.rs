//! CLI entry point for linker-hand
//!
//! Inspect limit tables, convert between raw actuator values and joint
//! angles, and drive a hand over the simulated bus.
//!
//! # Usage
//!
//! ```bash
//! linker-hand limits --model L10 --hand left
//! linker-hand raw-to-angle --model L7 --hand right 0 128 255 64 64 64 64
//! linker-hand angle-to-raw --model L6 --hand left -- 0.5 -0.1 0.2 0.2 0.2 0.2
//! linker-hand simulate --model L25 --hand right --transport ethercat
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use linker_hand::core::conversion::{self, RAW_MAX, RAW_MIN};
use linker_hand::core::{resolve_limit_table, HandModel, HandSettings, Handedness, TransportKind};
use linker_hand::drivers::protocol::SENSOR_COMMANDS;
use linker_hand::hardware::HandFactory;
use linker_hand::mock::SimulatedBus;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "linker-hand")]
#[command(about = "LinkerHand dexterous hand toolkit", long_about = None)]
struct Cli {
    /// Optional hand settings file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the joint limit table of a model
    Limits {
        #[arg(long)]
        model: HandModel,
        #[arg(long, default_value = "left")]
        hand: Handedness,
    },

    /// Convert raw actuator values (0-255) to joint angles in radians
    RawToAngle {
        #[arg(long)]
        model: HandModel,
        #[arg(long, default_value = "left")]
        hand: Handedness,
        /// One value per joint; out-of-range values are clamped
        #[arg(allow_negative_numbers = true, required = true)]
        raw: Vec<i64>,
    },

    /// Convert joint angles in radians to raw actuator values
    AngleToRaw {
        #[arg(long)]
        model: HandModel,
        #[arg(long, default_value = "left")]
        hand: Handedness,
        /// One angle per joint
        #[arg(allow_negative_numbers = true, required = true)]
        angles: Vec<f64>,
    },

    /// Build a hand on the simulated bus, send a pose and read it back
    Simulate {
        #[arg(long)]
        model: HandModel,
        #[arg(long, default_value = "left")]
        hand: Handedness,
        #[arg(long, default_value = "can0")]
        transport: TransportKind,
        /// Target angles; defaults to the center of every joint
        #[arg(allow_negative_numbers = true)]
        angles: Vec<f64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Limits { model, hand } => print_limits(model, hand),
        Commands::RawToAngle { model, hand, raw } => {
            let raw: Vec<u8> = raw
                .into_iter()
                .map(|v| v.clamp(i64::from(RAW_MIN), i64::from(RAW_MAX)) as u8)
                .collect();
            let angles = conversion::raw_to_angle(model, hand, &raw)?;
            println!("{}", format_values(&angles));
            Ok(())
        }
        Commands::AngleToRaw {
            model,
            hand,
            angles,
        } => {
            let raw = conversion::angle_to_raw(model, hand, &angles)?;
            println!("{}", format_values(&raw));
            Ok(())
        }
        Commands::Simulate {
            model,
            hand,
            transport,
            angles,
        } => simulate(cli.config, model, hand, transport, angles).await,
    }
}

fn print_limits(model: HandModel, hand: Handedness) -> Result<()> {
    let table = resolve_limit_table(model, hand)?;
    println!("{model} {hand}: {} joints", table.joint_count());
    println!("{:>3}  {:<18} {:>9} {:>9}  direction", "#", "joint", "min", "max");
    for (index, joint) in table.iter().enumerate() {
        let note = if conversion::should_skip_joint(model, index) {
            "  (reserved)"
        } else {
            ""
        };
        println!(
            "{index:>3}  {:<18} {:>9.4} {:>9.4}  {:?}{note}",
            joint.name, joint.min_angle, joint.max_angle, joint.direction
        );
    }
    Ok(())
}

async fn simulate(
    config: Option<PathBuf>,
    model: HandModel,
    hand: Handedness,
    transport: TransportKind,
    angles: Vec<f64>,
) -> Result<()> {
    let settings = HandSettings::load(config.as_deref()).context("loading hand settings")?;

    let bus = SimulatedBus::new();
    for (offset, command) in SENSOR_COMMANDS.into_iter().enumerate() {
        let base = (offset as u8) * 50;
        let readings: Vec<u8> = (0..5u8).map(|finger| base + finger * 10).collect();
        bus.seed_default(command, &readings);
    }

    let factory = HandFactory::new(Arc::new(bus.clone()), settings);
    let mut device = factory
        .create_hand(model, hand.hand_id(), transport)
        .await
        .with_context(|| format!("creating {model} {hand} on {transport}"))?;

    let target = if angles.is_empty() {
        device.limits().iter().map(|joint| joint.center()).collect()
    } else {
        angles
    };
    device.set_joint_angles(&target).await?;
    let raw = device.read_joint_raw().await?;
    let read_back = device.read_joint_angles().await?;

    println!("hand:     {}", device.identity());
    println!("target:   {}", format_values(&target));
    println!("raw:      {}", format_values(&raw));
    println!("readback: {}", format_values(&read_back));

    match device.read_sensors().await {
        Ok(snapshot) => {
            for finger in snapshot.fingers() {
                println!(
                    "{:<7} normal={:>3} tangential={:>3} direction={:>3} proximity={:>3}",
                    finger.name,
                    finger.normal_force,
                    finger.tangential_force,
                    finger.tangential_direction,
                    finger.proximity
                );
            }
        }
        Err(err) => tracing::warn!(%err, "sensor read failed"),
    }

    println!("frames:   {}", bus.sent_frames().len());
    device.disconnect().await?;
    Ok(())
}

fn format_values<T: std::fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(|v| format!("{v:.4}"))
        .collect::<Vec<_>>()
        .join(" ")
}

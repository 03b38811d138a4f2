//! Runs one rig headless and prints the composed pose of every frame as a
//! JSON line.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use glam::Vec2;
use serde_json::json;

use rigmotion::{
    ActionLibrary, Bone, FrameInputs, LocomotionConfigs, LocomotionState, Pose, RigAnimator,
    Skeleton,
};

#[derive(Parser)]
#[command(name = "pose_dump")]
#[command(about = "Dump composed rig poses as JSON lines", long_about = None)]
#[command(version)]
struct Cli {
    /// Locomotion config JSON (missing knobs use defaults)
    #[arg(long)]
    configs: Option<PathBuf>,

    /// JSON array of action clips
    #[arg(long)]
    actions: Option<PathBuf>,

    /// Base locomotion state
    #[arg(long, value_enum, default_value_t = StateArg::Idle)]
    state: StateArg,

    /// Number of frames to simulate
    #[arg(long, default_value_t = 60)]
    frames: u32,

    /// Seconds per frame
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Movement intent as `x,y` (lateral, forward); implies moving
    #[arg(long, value_parser = parse_intent)]
    intent: Option<Vec2>,

    /// Trigger an attack on this frame
    #[arg(long)]
    attack_at: Option<u32>,

    /// Output the rest pose regardless of inputs
    #[arg(long)]
    rest: bool,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum StateArg {
    Idle,
    Walk,
    Run,
    Attack,
}

impl From<StateArg> for LocomotionState {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Idle => LocomotionState::Idle,
            StateArg::Walk => LocomotionState::Walk,
            StateArg::Run => LocomotionState::Run,
            StateArg::Attack => LocomotionState::Attack,
        }
    }
}

fn parse_intent(s: &str) -> std::result::Result<Vec2, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got '{s}'"))?;
    let x: f32 = x.trim().parse().map_err(|e| format!("bad x: {e}"))?;
    let y: f32 = y.trim().parse().map_err(|e| format!("bad y: {e}"))?;
    Ok(Vec2::new(x, y))
}

fn pose_json(frame: u32, time: f32, pose: &Pose) -> serde_json::Value {
    let rotations: serde_json::Map<String, serde_json::Value> = pose
        .iter()
        .map(|(bone, r)| (bone.name().to_string(), json!([r.x, r.y, r.z])))
        .collect();
    let t = pose.root_translation();
    json!({
        "frame": frame,
        "time": time,
        "rotations": rotations,
        "rootTranslation": [t.x, t.y, t.z],
        "root": Bone::ROOT.name(),
    })
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let configs = match &cli.configs {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open configs {}", path.display()))?;
            LocomotionConfigs::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse configs {}", path.display()))?
        }
        None => LocomotionConfigs::default(),
    };
    let library = match &cli.actions {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open actions {}", path.display()))?;
            ActionLibrary::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse actions {}", path.display()))?
        }
        None => ActionLibrary::new(),
    };
    configs.warn_unresolved_links(&library);

    let intent = cli.intent.unwrap_or(Vec2::ZERO);
    let moving = cli.intent.is_some_and(|v| v.length_squared() > 0.0);
    let state: LocomotionState = cli.state.into();

    let mut rig = RigAnimator::new(Skeleton::humanoid());
    rig.state_mut().force_rest_pose = cli.rest;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut last_attack = None;

    for frame in 0..cli.frames {
        if cli.attack_at == Some(frame) {
            last_attack = Some(f64::from(frame));
        }
        let inputs = FrameInputs::new(&configs, &library)
            .with_state(state)
            .with_movement(intent, moving)
            .with_last_attack_time(last_attack);
        let pose = *rig.update(cli.dt, &inputs);
        let line = pose_json(frame, rig.state().clock.now(), &pose);
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    log::info!("Wrote {} frames", cli.frames);
    Ok(())
}

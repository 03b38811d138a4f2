//! Locomotion and attack knobs.
//!
//! Configs arrive from asset tooling as partial JSON objects. Every knob is
//! optional on the wire; [`PartialLocomotionConfig::resolve`] fills each
//! missing field from the state's defaults, so the generator never sees a
//! missing or non-finite number.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::animation::ActionLibrary;
use crate::errors::Result;
use crate::sanitize::{lenient_f32, lenient_section, lenient_string};

/// Base locomotion state supplied by gameplay/editor logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LocomotionState {
    #[default]
    Idle,
    Walk,
    Run,
    Attack,
}

impl LocomotionState {
    /// Speed at which a linked clip plays at its authored rate.
    #[must_use]
    pub const fn reference_speed(self) -> f32 {
        match self {
            LocomotionState::Idle => IDLE_SPEED,
            LocomotionState::Walk | LocomotionState::Attack => WALK_SPEED,
            LocomotionState::Run => RUN_SPEED,
        }
    }
}

const IDLE_SPEED: f32 = 2.0;
const WALK_SPEED: f32 = 8.0;
const RUN_SPEED: f32 = 12.0;

/// Fully populated knobs for idle, walk or run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocomotionConfig {
    /// Angular frequency of the cycle, radians per second.
    pub speed: f32,
    /// Idle breathing / head bob amplitude.
    pub amplitude: f32,
    /// Idle hip sway.
    pub sway: f32,
    /// Vertical root bounce while moving.
    pub bounciness: f32,
    pub leg_amplitude: f32,
    pub arm_amplitude: f32,
    pub knee_bend: f32,
    /// Outward flare subtracted from the base arm rotation.
    pub arm_span: f32,
    /// Base rotation bringing the arms down from the rest T-pose.
    pub arm_rotation: f32,
    /// Oscillating chest yaw while running.
    pub spine_rotation: f32,
    pub step_width: f32,
    pub linked_action: Option<String>,
}

impl LocomotionConfig {
    #[must_use]
    pub fn defaults_for(state: LocomotionState) -> Self {
        match state {
            LocomotionState::Idle => Self {
                speed: IDLE_SPEED,
                amplitude: 0.05,
                sway: 0.03,
                bounciness: 0.0,
                leg_amplitude: 0.0,
                arm_amplitude: 0.0,
                knee_bend: 0.0,
                arm_span: 0.1,
                arm_rotation: 1.2,
                spine_rotation: 0.0,
                step_width: 0.0,
                linked_action: None,
            },
            LocomotionState::Walk | LocomotionState::Attack => Self {
                speed: WALK_SPEED,
                amplitude: 0.05,
                sway: 0.03,
                bounciness: 0.05,
                leg_amplitude: 0.6,
                arm_amplitude: 0.4,
                knee_bend: 0.5,
                arm_span: 0.1,
                arm_rotation: 1.2,
                spine_rotation: 0.0,
                step_width: 0.05,
                linked_action: None,
            },
            LocomotionState::Run => Self {
                speed: RUN_SPEED,
                amplitude: 0.05,
                sway: 0.03,
                bounciness: 0.1,
                leg_amplitude: 0.9,
                arm_amplitude: 0.7,
                knee_bend: 1.0,
                arm_span: 0.15,
                arm_rotation: 1.1,
                spine_rotation: 0.15,
                step_width: 0.05,
                linked_action: None,
            },
        }
    }
}

/// Wire form of [`LocomotionConfig`]; any field may be absent or malformed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialLocomotionConfig {
    #[serde(deserialize_with = "lenient_f32")]
    pub speed: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub amplitude: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub sway: Option<f32>,
    #[serde(deserialize_with = "lenient_f32", alias = "bounce")]
    pub bounciness: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub leg_amplitude: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub arm_amplitude: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub knee_bend: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub arm_span: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub arm_rotation: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub spine_rotation: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub step_width: Option<f32>,
    #[serde(deserialize_with = "lenient_string")]
    pub linked_action: Option<String>,
}

impl PartialLocomotionConfig {
    /// Field-level merge with the defaults of `state`.
    #[must_use]
    pub fn resolve(self, state: LocomotionState) -> LocomotionConfig {
        let d = LocomotionConfig::defaults_for(state);
        LocomotionConfig {
            speed: self.speed.unwrap_or(d.speed),
            amplitude: self.amplitude.unwrap_or(d.amplitude),
            sway: self.sway.unwrap_or(d.sway),
            bounciness: self.bounciness.unwrap_or(d.bounciness),
            leg_amplitude: self.leg_amplitude.unwrap_or(d.leg_amplitude),
            arm_amplitude: self.arm_amplitude.unwrap_or(d.arm_amplitude),
            knee_bend: self.knee_bend.unwrap_or(d.knee_bend),
            arm_span: self.arm_span.unwrap_or(d.arm_span),
            arm_rotation: self.arm_rotation.unwrap_or(d.arm_rotation),
            spine_rotation: self.spine_rotation.unwrap_or(d.spine_rotation),
            step_width: self.step_width.unwrap_or(d.step_width),
            linked_action: self.linked_action.filter(|id| !id.is_empty()),
        }
    }
}

// ============================================================================
// Attack
// ============================================================================

/// Seconds an attack lasts at a speed multiplier of 1.
pub const BASE_ATTACK_DURATION: f32 = 0.6;

// Lower bounds that keep durations finite.
const MIN_SPEED_MULTIPLIER: f32 = 0.05;
const MIN_DECAY: f32 = 0.05;

/// Fully populated attack overlay knobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttackConfig {
    pub speed_multiplier: f32,
    /// Fraction of the attack spent cocking the arm, in [0, 1].
    pub windup_ratio: f32,
    pub intensity: f32,
    /// Recovery takes `duration / decay` seconds.
    pub decay: f32,
    pub recoil: f32,
    pub leg_spread: f32,
    pub crouch: f32,
    pub linked_action: Option<String>,
}

impl Default for AttackConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            windup_ratio: 0.3,
            intensity: 1.0,
            decay: 1.0,
            recoil: 0.1,
            leg_spread: 0.3,
            crouch: 0.1,
            linked_action: None,
        }
    }
}

impl AttackConfig {
    /// Strike duration in seconds.
    #[must_use]
    pub fn duration(&self) -> f32 {
        BASE_ATTACK_DURATION / self.speed_multiplier
    }

    /// Recovery duration in seconds.
    #[must_use]
    pub fn recovery_time(&self) -> f32 {
        self.duration() / self.decay
    }
}

/// Wire form of [`AttackConfig`].
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PartialAttackConfig {
    #[serde(deserialize_with = "lenient_f32")]
    pub speed_multiplier: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub windup_ratio: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub intensity: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub decay: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub recoil: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub leg_spread: Option<f32>,
    #[serde(deserialize_with = "lenient_f32")]
    pub crouch: Option<f32>,
    #[serde(deserialize_with = "lenient_string")]
    pub linked_action: Option<String>,
}

impl PartialAttackConfig {
    #[must_use]
    pub fn resolve(self) -> AttackConfig {
        let d = AttackConfig::default();
        AttackConfig {
            speed_multiplier: self
                .speed_multiplier
                .unwrap_or(d.speed_multiplier)
                .max(MIN_SPEED_MULTIPLIER),
            windup_ratio: self.windup_ratio.unwrap_or(d.windup_ratio).clamp(0.0, 1.0),
            intensity: self.intensity.unwrap_or(d.intensity),
            decay: self.decay.unwrap_or(d.decay).max(MIN_DECAY),
            recoil: self.recoil.unwrap_or(d.recoil),
            leg_spread: self.leg_spread.unwrap_or(d.leg_spread),
            crouch: self.crouch.unwrap_or(d.crouch),
            linked_action: self.linked_action.filter(|id| !id.is_empty()),
        }
    }
}

// ============================================================================
// Config set
// ============================================================================

/// Resolved knobs for every state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocomotionConfigs {
    pub idle: LocomotionConfig,
    pub walk: LocomotionConfig,
    pub run: LocomotionConfig,
    pub attack: AttackConfig,
}

impl Default for LocomotionConfigs {
    fn default() -> Self {
        PartialLocomotionConfigs::default().resolve()
    }
}

impl LocomotionConfigs {
    /// Knobs driving the base locomotion of `state`. Attack has no gait of
    /// its own and borrows walk's.
    #[must_use]
    pub fn for_state(&self, state: LocomotionState) -> &LocomotionConfig {
        match state {
            LocomotionState::Idle => &self.idle,
            LocomotionState::Walk | LocomotionState::Attack => &self.walk,
            LocomotionState::Run => &self.run,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let partial: PartialLocomotionConfigs = serde_json::from_str(json)?;
        Ok(partial.resolve())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let partial: PartialLocomotionConfigs = serde_json::from_reader(reader)?;
        Ok(partial.resolve())
    }

    /// Logs every linked-action id that does not resolve in `library`.
    /// Returns the number of dangling links.
    pub fn warn_unresolved_links(&self, library: &ActionLibrary) -> usize {
        let links = [
            ("idle", self.idle.linked_action.as_deref()),
            ("walk", self.walk.linked_action.as_deref()),
            ("run", self.run.linked_action.as_deref()),
            ("attack", self.attack.linked_action.as_deref()),
        ];
        let mut dangling = 0;
        for (state, link) in links {
            if let Some(id) = link
                && !library.contains(id)
            {
                log::warn!("{state} config links unknown action '{id}'; falling back to procedural");
                dangling += 1;
            }
        }
        dangling
    }
}

/// Wire form of [`LocomotionConfigs`]; whole states may be missing, null or
/// malformed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PartialLocomotionConfigs {
    #[serde(deserialize_with = "lenient_section")]
    pub idle: PartialLocomotionConfig,
    #[serde(deserialize_with = "lenient_section")]
    pub walk: PartialLocomotionConfig,
    #[serde(deserialize_with = "lenient_section")]
    pub run: PartialLocomotionConfig,
    #[serde(deserialize_with = "lenient_section")]
    pub attack: PartialAttackConfig,
}

impl PartialLocomotionConfigs {
    #[must_use]
    pub fn resolve(self) -> LocomotionConfigs {
        LocomotionConfigs {
            idle: self.idle.resolve(LocomotionState::Idle),
            walk: self.walk.resolve(LocomotionState::Walk),
            run: self.run.resolve(LocomotionState::Run),
            attack: self.attack.resolve(),
        }
    }
}

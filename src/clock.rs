//! Animation Clock
//!
//! Per-rig time keeping. The host advances the clock once per render tick;
//! time only accumulates while the rig is neither paused nor frozen.

/// Accumulated animation time with pause/freeze controls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationClock {
    elapsed: f32,
    /// Seconds added by the last [`advance`](Self::advance)
    pub delta: f32,
    /// Number of advances that actually moved time
    pub frame_count: u64,
    paused: bool,
    frozen: bool,
    freeze_time: f32,
}

impl AnimationClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances by `dt` seconds unless paused or frozen. Negative and
    /// non-finite steps are ignored.
    pub fn advance(&mut self, dt: f32) {
        if self.paused || self.frozen || !dt.is_finite() || dt <= 0.0 {
            self.delta = 0.0;
            return;
        }
        self.delta = dt;
        self.elapsed += dt;
        self.frame_count += 1;
    }

    /// Time every pose source samples at this frame.
    #[inline]
    #[must_use]
    pub fn now(&self) -> f32 {
        if self.frozen {
            self.freeze_time
        } else {
            self.elapsed
        }
    }

    /// Accumulated time, ignoring any freeze.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    #[inline]
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Stops accumulation and pins [`now`](Self::now) to the freeze instant.
    pub fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }

    /// Sets the instant reported while frozen.
    pub fn freeze_at(&mut self, time: f32) {
        self.freeze_time = if time.is_finite() { time } else { 0.0 };
    }

    /// Rewinds to zero. Pause and freeze flags are left as they are.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.delta = 0.0;
        self.frame_count = 0;
    }
}

/// Edge detector for the externally supplied "last attack" timestamp.
///
/// The host only reports when the last attack was requested; an attack
/// starts whenever that value differs from the one seen on the previous
/// frame, and its local timeline begins at the accumulated clock time of
/// that frame. Freezing the clock holds that timeline in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttackTrigger {
    observed: Option<f64>,
    started_at: Option<f32>,
}

impl AttackTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records this frame's trigger value. Returns `true` when a new attack
    /// started.
    pub fn observe(&mut self, trigger: Option<f64>, now: f32) -> bool {
        if trigger.map(f64::to_bits) == self.observed.map(f64::to_bits) {
            return false;
        }
        self.observed = trigger;
        if trigger.is_some() {
            self.started_at = Some(now);
            log::debug!("Attack triggered at local time {now:.3}");
            true
        } else {
            false
        }
    }

    /// Local time the running attack began, if one is in flight.
    #[inline]
    #[must_use]
    pub fn started_at(&self) -> Option<f32> {
        self.started_at
    }

    #[must_use]
    pub fn time_since(&self, now: f32) -> Option<f32> {
        self.started_at.map(|start| (now - start).max(0.0))
    }

    /// Marks the running attack as fully recovered.
    pub fn finish(&mut self) {
        if self.started_at.take().is_some() {
            log::debug!("Attack recovery complete");
        }
    }
}

/// Everything the compositor mutates between frames, owned by one rig.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimatorState {
    pub clock: AnimationClock,
    pub attack: AttackTrigger,
    /// Snap every bone to its rest rotation, bypassing all sources.
    pub force_rest_pose: bool,
}

impl AnimatorState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

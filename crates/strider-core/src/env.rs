//! Headless environment harness
//!
//! Drives the agent against scripted kinematics instead of a real physics
//! engine: joints relax toward their commanded targets and the body drifts
//! under a crude thrust model. Runs identically everywhere and is good
//! enough to exercise the full perception/action/reward contract in demos
//! and integration tests; it is not a physics simulation.

use glam::{EulerRot, Quat, Vec3};
use strider_agent::{AgentConfig, AgentError, LocomotionAgent};
use strider_rig::{RagdollRig, RigAccess, SegmentId};

use crate::gameplay::{DamageVolume, DoorMechanism, FloorTrigger, KeyObject};
use crate::health::PlayerHealth;

const TICK_DT: f32 = 1.0 / 60.0;
/// Velocity carried over between ticks
const DRIFT_DAMPING: f32 = 0.9;
/// Thrust per unit of mean commanded strength
const THRUST_SCALE: f32 = 30.0;
/// Per-tick blend factor of joints toward their commanded targets
const JOINT_BLEND: f32 = 0.2;

/// Result of one environment step
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub chasing: bool,
}

/// Full walker scene: rig, agent, player, and peripherals.
pub struct WalkerEnv {
    rig: RagdollRig,
    agent: LocomotionAgent,
    player_position: Option<Vec3>,
    pub player_health: PlayerHealth,
    pub door: DoorMechanism,
    trigger: FloorTrigger,
    damage_volume: DamageVolume,
    hips_velocity: Vec3,
    tick: u64,
}

impl WalkerEnv {
    /// Assemble the scene with the hips at `spawn`. The trigger volume spans
    /// an 16x16 area around the spawn; the door sits beyond it with three
    /// keys.
    pub fn new(
        config: AgentConfig,
        spawn: Vec3,
        player: Option<Vec3>,
    ) -> Result<Self, AgentError> {
        let mut rig = RagdollRig::new(40_000.0);
        let mut agent = LocomotionAgent::new(config);
        agent.initialize(&mut rig, spawn, player)?;

        let trigger = FloorTrigger::new(
            spawn + Vec3::new(-8.0, -2.0, -8.0),
            spawn + Vec3::new(8.0, 4.0, 8.0),
            agent.chase_sender(),
        );
        let door = DoorMechanism::new(
            spawn + Vec3::new(0.0, 0.0, 20.0),
            vec![KeyObject::default(), KeyObject::default(), KeyObject::default()],
        );

        Ok(Self {
            rig,
            agent,
            player_position: player,
            player_health: PlayerHealth::default(),
            door,
            trigger,
            damage_volume: DamageVolume::default(),
            hips_velocity: Vec3::ZERO,
            tick: 0,
        })
    }

    /// Start a fresh episode and return the first observation
    pub fn reset(&mut self) -> Result<Vec<f32>, AgentError> {
        self.agent.begin_episode(&mut self.rig)?;
        self.hips_velocity = Vec3::ZERO;
        self.agent.observe(&self.rig)
    }

    /// Move (or remove) the tracked player for subsequent ticks
    pub fn set_player_position(&mut self, position: Option<Vec3>) {
        self.player_position = position;
    }

    /// Observation for the current tick without advancing time
    pub fn observe(&self) -> Result<Vec<f32>, AgentError> {
        self.agent.observe(&self.rig)
    }

    /// Current behavior state of the agent
    pub fn agent_state(&self) -> strider_agent::AgentState {
        self.agent.state()
    }

    /// Advance one tick: actuate, integrate, run peripherals, score.
    pub fn step(&mut self, action: &[f32]) -> Result<StepOutcome, AgentError> {
        self.agent.apply_action(&mut self.rig, action)?;
        self.integrate()?;

        self.trigger.update(self.player_position);
        if let Some(player) = self.player_position {
            let positions: Vec<(SegmentId, Vec3)> = SegmentId::ALL
                .iter()
                .filter_map(|&id| self.rig.segment(id).map(|s| (id, s.position)))
                .collect();
            self.damage_volume
                .update(&positions, player, &mut self.player_health);
        }
        self.door.update();

        self.agent.set_player_position(self.player_position);
        let reward = self.agent.step(&mut self.rig)?;
        let observation = self.agent.observe(&self.rig)?;
        self.tick += 1;

        Ok(StepOutcome {
            observation,
            reward,
            chasing: self.agent.state().chasing,
        })
    }

    /// Scripted kinematics: thrust the hips by the mean commanded strength,
    /// drag the rest of the topology along, and relax joints toward their
    /// targets.
    fn integrate(&mut self) -> Result<(), AgentError> {
        let hips = self
            .rig
            .segment(SegmentId::Hips)
            .ok_or(AgentError::SegmentUnavailable(SegmentId::Hips))?;
        let hips_rotation = hips.local_rotation;
        let hips_forward = hips.forward();
        let max_strength = self.rig.max_joint_strength();

        let mean_strength: f32 = SegmentId::ALL
            .iter()
            .filter(|id| id.has_actuated_joint())
            .filter_map(|&id| self.rig.segment(id))
            .map(|s| s.current_strength / max_strength)
            .sum::<f32>()
            / 13.0;

        self.hips_velocity = self.hips_velocity * DRIFT_DAMPING
            + hips_forward * (mean_strength * THRUST_SCALE * TICK_DT);
        let hips_position = hips.position + self.hips_velocity * TICK_DT;

        for id in SegmentId::ALL {
            let rotation = if id == SegmentId::Hips {
                hips_rotation
            } else {
                let current = self
                    .rig
                    .segment(id)
                    .ok_or(AgentError::SegmentUnavailable(id))?
                    .local_rotation;
                match self.rig.joint_target(id) {
                    Some(target) => {
                        let goal =
                            Quat::from_euler(EulerRot::XYZ, target.x, target.y, target.z);
                        current.slerp(goal, JOINT_BLEND)
                    }
                    None => current,
                }
            };

            let position = hips_position + hips_rotation * id.rig_offset();
            self.rig.set_kinematic_state(
                id,
                position,
                self.hips_velocity,
                Vec3::ZERO,
                rotation,
            )?;
        }

        // No gravity in this harness: the feet stay planted
        self.rig.set_ground_contact(SegmentId::FootL, true)?;
        self.rig.set_ground_contact(SegmentId::FootR, true)?;

        Ok(())
    }
}

//! The locomotion agent
//!
//! Runs once per fixed physics tick, synchronously: drain pending chase
//! events, re-anchor the orientation frame on the current goal, score the
//! step, and advance the patrol cycle. Observation and action calls share
//! the same tick boundary and the same frame.

use glam::{Quat, Vec3};
use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use strider_rig::{OrientationFrame, RigAccess, RigControl, SegmentId};

use crate::action;
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::events::{chase_channel, ChaseEvent, ChaseReceiver, ChaseSender};
use crate::observation;
use crate::patrol::PatrolPath;
use crate::reward;

/// Snapshot of the behavior state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentState {
    pub chasing: bool,
    pub patrol_index: usize,
}

/// Embodied walker agent: perception, actuation, reward, and the
/// patrol-vs-chase state machine.
pub struct LocomotionAgent {
    config: AgentConfig,
    target_speed: f32,
    patrol: PatrolPath,
    frame: OrientationFrame,
    chasing: bool,
    /// Live position of the tracked player; non-owning, refreshed by the
    /// surrounding simulation each tick. None means degraded mode.
    player: Option<Vec3>,
    chase_tx: ChaseSender,
    chase_rx: ChaseReceiver,
    rng: Xoshiro256PlusPlus,
}

impl LocomotionAgent {
    /// Create an agent; call [`initialize`](Self::initialize) before stepping.
    pub fn new(config: AgentConfig) -> Self {
        let (chase_tx, chase_rx) = chase_channel();
        let rng = Xoshiro256PlusPlus::seed_from_u64(config.seed);
        let patrol = PatrolPath::circle(Vec3::ZERO, config.patrol_radius, config.patrol_point_count);
        Self {
            target_speed: config.target_speed,
            config,
            patrol,
            frame: OrientationFrame::new(),
            chasing: false,
            player: None,
            chase_tx,
            chase_rx,
            rng,
        }
    }

    /// Bind to the rig: register every body segment from the fixed topology
    /// with the hips at `spawn`, lay out the patrol circle around it, and
    /// resolve the tracked player.
    ///
    /// A missing player is reported and execution continues in a degraded
    /// mode where chase-target resolution falls back to the patrol cycle.
    pub fn initialize(
        &mut self,
        rig: &mut impl RigControl,
        spawn: Vec3,
        player: Option<Vec3>,
    ) -> Result<(), AgentError> {
        for id in SegmentId::ALL {
            rig.register_segment(id, spawn + id.rig_offset(), Quat::IDENTITY)?;
        }

        self.patrol = PatrolPath::circle(spawn, self.config.patrol_radius, self.config.patrol_point_count);

        self.player = player;
        if player.is_none() {
            log::error!("tracked player not found; chase-target resolution will be degraded");
        }

        self.frame.update(spawn, self.patrol.current_point());
        log::info!(
            "agent initialized: {} segments, patrol radius {}",
            SegmentId::ALL.len(),
            self.config.patrol_radius
        );
        Ok(())
    }

    /// Reset for a new episode: every segment back to its registered pose,
    /// hips yaw re-randomized, patrol and chase state cleared.
    ///
    /// Idempotent on state and callable at any tick boundary.
    pub fn begin_episode(&mut self, rig: &mut impl RigControl) -> Result<(), AgentError> {
        for id in SegmentId::ALL {
            rig.reset_segment(id)?;
        }

        let yaw = self.rng.random_range(0.0..std::f32::consts::TAU);
        rig.set_segment_rotation(SegmentId::Hips, Quat::from_rotation_y(yaw))?;

        if self.config.randomize_speed_each_episode {
            self.target_speed = self
                .config
                .clamp_speed(self.rng.random_range(0.1..self.config.max_speed));
        }

        self.patrol.reset();
        self.chasing = false;

        let hips = rig
            .segment(SegmentId::Hips)
            .ok_or(AgentError::SegmentUnavailable(SegmentId::Hips))?
            .position;
        self.frame.update(hips, self.goal_position());

        log::debug!("episode reset: yaw {:.2} rad, target speed {:.2}", yaw, self.target_speed);
        Ok(())
    }

    /// Refresh the tracked player's live position for this tick
    pub fn set_player_position(&mut self, position: Option<Vec3>) {
        self.player = position;
    }

    /// Publisher handle for trigger volumes
    pub fn chase_sender(&self) -> ChaseSender {
        self.chase_tx.clone()
    }

    /// Current behavior state
    pub fn state(&self) -> AgentState {
        AgentState {
            chasing: self.chasing,
            patrol_index: self.patrol.current_index(),
        }
    }

    /// Current target walking speed
    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    /// Set the target walking speed, clamped to the valid range
    pub fn set_target_speed(&mut self, speed: f32) {
        self.target_speed = self.config.clamp_speed(speed);
    }

    /// Flip into chase mode. Idempotent; the transition back is never taken
    /// internally.
    pub fn start_chasing(&mut self) {
        if !self.chasing {
            log::info!("start chasing player");
            if self.player.is_none() {
                log::warn!("chasing requested but no player is tracked");
            }
        }
        self.chasing = true;
    }

    /// Flip back to patrol mode. Idempotent; exposed for collaborators,
    /// never invoked from inside the agent.
    pub fn stop_chasing(&mut self) {
        self.chasing = false;
    }

    /// The point the agent is currently walking toward
    pub fn goal_position(&self) -> Vec3 {
        match (self.chasing, self.player) {
            (true, Some(player)) => player,
            _ => self.patrol.current_point(),
        }
    }

    /// Build the observation vector for the current tick
    pub fn observe(&self, rig: &impl RigAccess) -> Result<Vec<f32>, AgentError> {
        observation::build_observation(rig, &self.frame, self.goal_position(), self.target_speed)
    }

    /// Decode and forward the policy's action vector to the rig
    pub fn apply_action(
        &self,
        rig: &mut impl RigControl,
        action: &[f32],
    ) -> Result<(), AgentError> {
        action::apply_action(rig, action)
    }

    /// Per-tick update: applies pending chase events, re-anchors the
    /// orientation frame, computes the shaped step reward, and advances the
    /// patrol cycle on arrival.
    pub fn step(&mut self, rig: &mut impl RigControl) -> Result<f32, AgentError> {
        // Tick boundary: apply externally requested behavior changes first
        let pending: Vec<ChaseEvent> = self.chase_rx.try_iter().collect();
        for event in pending {
            match event {
                ChaseEvent::Start => self.start_chasing(),
                ChaseEvent::Stop => self.stop_chasing(),
            }
        }

        let hips = rig
            .segment(SegmentId::Hips)
            .ok_or(AgentError::SegmentUnavailable(SegmentId::Hips))?;
        let hips_position = hips.position;
        let hips_forward = hips.forward();
        let hips_up = hips.up();

        self.frame.update(hips_position, self.goal_position());

        let avg_velocity = observation::average_velocity(rig)?;
        let mut step_reward = 0.0;

        if let (true, Some(player)) = (self.chasing, self.player) {
            // Intentionally NaN-prone for a zero-length direction: that is a
            // degenerate configuration and must surface as an error
            let offset = player - hips_position;
            let to_player = offset / offset.length();

            let balance = reward::check_finite(reward::balance_reward(hips_up), "balance")?;
            step_reward += balance * self.config.balance_weight;

            let match_speed = reward::check_finite(
                reward::matching_velocity_reward(
                    to_player * self.target_speed,
                    avg_velocity,
                    self.target_speed,
                ),
                "match_speed",
            )?;
            step_reward += match_speed;

            // Heading alignment is tracked but does not gate movement
            let heading = hips_forward.angle_between(to_player).to_degrees();
            if heading < self.config.chase_alignment_threshold_deg {
                log::debug!("aligned with player ({heading:.1} deg)");
            }
        } else {
            let forward = self.frame.forward();

            let match_speed = reward::check_finite(
                reward::matching_velocity_reward(
                    forward * self.target_speed,
                    avg_velocity,
                    self.target_speed,
                ),
                "match_speed",
            )?;

            let head = rig
                .segment(SegmentId::Head)
                .ok_or(AgentError::SegmentUnavailable(SegmentId::Head))?;
            let look_at =
                reward::check_finite(reward::look_at_reward(forward, head.forward()), "look_at")?;

            step_reward += match_speed * look_at;

            if self
                .patrol
                .advance_if_reached(hips_position, self.config.arrival_threshold)
            {
                log::debug!("patrol point reached, next index {}", self.patrol.current_index());
            }
        }

        Ok(step_reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_rig::RagdollRig;

    fn agent_and_rig() -> (LocomotionAgent, RagdollRig) {
        let mut agent = LocomotionAgent::new(AgentConfig::default());
        let mut rig = RagdollRig::new(40_000.0);
        agent
            .initialize(&mut rig, Vec3::new(0.0, 1.0, 0.0), Some(Vec3::new(20.0, 1.0, 0.0)))
            .unwrap();
        (agent, rig)
    }

    #[test]
    fn test_initialize_registers_topology() {
        let (_, rig) = agent_and_rig();
        assert_eq!(rig.segment_count(), 16);
        let hips = rig.segment(SegmentId::Hips).unwrap();
        assert_eq!(hips.position, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_initialize_without_player_degrades() {
        let mut agent = LocomotionAgent::new(AgentConfig::default());
        let mut rig = RagdollRig::new(40_000.0);
        agent.initialize(&mut rig, Vec3::ZERO, None).unwrap();

        // Chase target falls back to the patrol cycle
        agent.start_chasing();
        assert_eq!(agent.goal_position(), agent.patrol.current_point());
        // And stepping still works
        assert!(agent.step(&mut rig).is_ok());
    }

    #[test]
    fn test_patrol_circle_centered_on_spawn() {
        let mut agent = LocomotionAgent::new(AgentConfig::default());
        let mut rig = RagdollRig::new(40_000.0);
        agent.initialize(&mut rig, Vec3::ZERO, None).unwrap();

        let points = agent.patrol.points();
        assert_eq!(points.len(), 4);
        assert!((points[0] - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-4);
        assert!((points[1] - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);
        assert!((points[2] - Vec3::new(-5.0, 0.0, 0.0)).length() < 1e-4);
        assert!((points[3] - Vec3::new(0.0, 0.0, -5.0)).length() < 1e-4);
    }

    #[test]
    fn test_chase_transitions_are_idempotent() {
        let (mut agent, _) = agent_and_rig();
        assert!(!agent.state().chasing);

        agent.start_chasing();
        agent.start_chasing();
        assert!(agent.state().chasing);

        agent.stop_chasing();
        agent.stop_chasing();
        assert!(!agent.state().chasing);
    }

    #[test]
    fn test_chase_events_applied_at_step() {
        let (mut agent, mut rig) = agent_and_rig();
        let sender = agent.chase_sender();

        sender.send(ChaseEvent::Start).unwrap();
        assert!(!agent.state().chasing, "event must not apply before the tick");

        agent.step(&mut rig).unwrap();
        assert!(agent.state().chasing);

        sender.send(ChaseEvent::Stop).unwrap();
        agent.step(&mut rig).unwrap();
        assert!(!agent.state().chasing);
    }

    #[test]
    fn test_goal_switches_with_chase_flag() {
        let (mut agent, _) = agent_and_rig();
        let patrol_goal = agent.goal_position();
        assert_eq!(patrol_goal, agent.patrol.current_point());

        agent.start_chasing();
        assert_eq!(agent.goal_position(), Vec3::new(20.0, 1.0, 0.0));

        agent.stop_chasing();
        assert_eq!(agent.goal_position(), patrol_goal);
    }

    #[test]
    fn test_episode_reset_is_idempotent() {
        let (mut agent, mut rig) = agent_and_rig();
        agent.start_chasing();
        agent.patrol.advance();

        agent.begin_episode(&mut rig).unwrap();
        assert_eq!(
            agent.state(),
            AgentState {
                chasing: false,
                patrol_index: 0
            }
        );

        agent.begin_episode(&mut rig).unwrap();
        assert_eq!(
            agent.state(),
            AgentState {
                chasing: false,
                patrol_index: 0
            }
        );
    }

    #[test]
    fn test_speed_randomization_stays_in_range() {
        let mut config = AgentConfig::default();
        config.randomize_speed_each_episode = true;
        config.seed = 7;
        let mut agent = LocomotionAgent::new(config);
        let mut rig = RagdollRig::new(40_000.0);
        agent.initialize(&mut rig, Vec3::ZERO, None).unwrap();

        for _ in 0..32 {
            agent.begin_episode(&mut rig).unwrap();
            let speed = agent.target_speed();
            assert!((0.1..=10.0).contains(&speed));
        }
    }

    #[test]
    fn test_observation_and_action_roundtrip_through_rig() {
        let (agent, mut rig) = agent_and_rig();
        let obs = agent.observe(&rig).unwrap();
        assert_eq!(obs.len(), crate::observation::OBSERVATION_LEN);

        let action = vec![0.1; crate::action::ACTION_LEN];
        agent.apply_action(&mut rig, &action).unwrap();

        let bad = vec![0.1; 3];
        assert!(matches!(
            agent.apply_action(&mut rig, &bad),
            Err(AgentError::InvalidAction { .. })
        ));
    }

    #[test]
    fn test_patrol_step_reward_is_finite_and_bounded() {
        let (mut agent, mut rig) = agent_and_rig();
        let reward = agent.step(&mut rig).unwrap();
        // match_speed * look_at, both in [0, 1]
        assert!((0.0..=1.0).contains(&reward));
    }

    #[test]
    fn test_chase_reward_includes_balance_term() {
        let (mut agent, mut rig) = agent_and_rig();
        agent.start_chasing();
        let reward = agent.step(&mut rig).unwrap();
        // Upright at rest: balance term contributes 0.2, match term 0
        assert!((reward - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_chase_with_player_on_hips_is_fatal() {
        let (mut agent, mut rig) = agent_and_rig();
        // Player exactly at the hips: zero-length chase direction
        agent.set_player_position(Some(Vec3::new(0.0, 1.0, 0.0)));
        agent.start_chasing();
        let result = agent.step(&mut rig);
        assert!(matches!(result, Err(AgentError::NonFiniteReward { .. })));
    }

    #[test]
    fn test_patrol_advances_when_hips_reach_waypoint() {
        let (mut agent, mut rig) = agent_and_rig();
        // Teleport the hips next to the first patrol point (5, 1, 0)
        rig.set_kinematic_state(
            SegmentId::Hips,
            Vec3::new(4.5, 1.0, 0.0),
            Vec3::ZERO,
            Vec3::ZERO,
            Quat::IDENTITY,
        )
        .unwrap();

        agent.step(&mut rig).unwrap();
        assert_eq!(agent.state().patrol_index, 1);
    }
}

//! Headless rollout of the walker environment with a random policy

use clap::Parser;
use glam::Vec3;
use rand::Rng;
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use strider_agent::{AgentConfig, ACTION_LEN};
use strider_core::WalkerEnv;

#[derive(Parser, Debug)]
#[command(name = "strider", about = "Headless walker rollout with a random policy")]
struct Args {
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 1000)]
    steps: u64,

    /// Seed for the agent and the random policy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Walk the player into the trigger volume after this many ticks
    #[arg(long)]
    chase_after: Option<u64>,

    /// Redraw the target walking speed each episode
    #[arg(long)]
    randomize_speed: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = AgentConfig {
        seed: args.seed,
        randomize_speed_each_episode: args.randomize_speed,
        ..AgentConfig::default()
    };

    let spawn = Vec3::new(0.0, 1.0, 0.0);
    // Player starts well outside the trigger volume
    let player_start = Vec3::new(30.0, 1.0, 0.0);
    let mut env = WalkerEnv::new(config, spawn, Some(player_start))?;
    let mut policy_rng = Xoshiro256PlusPlus::seed_from_u64(args.seed);

    env.reset()?;
    log::info!("rollout: {} steps, seed {}", args.steps, args.seed);

    let mut total_reward = 0.0_f64;
    let mut chase_ticks = 0_u64;

    for tick in 0..args.steps {
        if args.chase_after == Some(tick) {
            // Step inside the trigger volume around the spawn
            env.set_player_position(Some(spawn + Vec3::new(4.0, 0.0, 0.0)));
            log::info!("player entered the trigger volume at tick {tick}");
        }

        let action: Vec<f32> = (0..ACTION_LEN)
            .map(|_| policy_rng.random_range(-1.0..1.0))
            .collect();

        let outcome = env.step(&action)?;
        total_reward += f64::from(outcome.reward);
        if outcome.chasing {
            chase_ticks += 1;
        }

        if tick % 200 == 199 {
            log::info!(
                "tick {}: cumulative reward {:.3}, chasing={}",
                tick + 1,
                total_reward,
                outcome.chasing
            );
        }
    }

    println!("steps:         {}", args.steps);
    println!("total reward:  {total_reward:.3}");
    println!(
        "mean reward:   {:.5}",
        total_reward / args.steps.max(1) as f64
    );
    println!("chase ticks:   {chase_ticks}");
    println!("player health: {:.0}", env.player_health.current());

    Ok(())
}

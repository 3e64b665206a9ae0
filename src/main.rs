//! Headless demo entry point
//!
//! Drives the runner down the corridor at constant speed, standing in for
//! the environment: it feeds the pose each tick, fakes gate collisions when
//! the head reaches a gate, and logs trail stats once a second.

use glam::Vec3;
use trail_runner::SimConfig;
use trail_runner::consts::SIM_DT;
use trail_runner::sim::{SimState, TickInput, tick};

fn main() {
    env_logger::init();

    let config = SimConfig::default();
    let mut state = match SimState::new(config) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("config error: {err}");
            std::process::exit(1);
        }
    };

    let speed = 5.0;
    let seconds = 60;
    let mut z = 0.0_f32;

    for tick_index in 0..(seconds * 60) {
        z += speed * SIM_DT;
        let position = Vec3::new(0.0, 0.0, z);

        // Stand-in for the physics layer: trigger any gate the head reaches
        let gate_triggers: Vec<u32> = state
            .world
            .active_gates()
            .iter()
            .filter(|gate| gate.is_active() && (gate.position.z - z).abs() < speed * SIM_DT)
            .map(|gate| gate.id)
            .collect();

        let input = TickInput {
            position,
            gate_triggers,
            ..TickInput::default()
        };
        tick(&mut state, &input, SIM_DT);

        if tick_index % 60 == 0 {
            log::info!(
                "t={:>3}s z={:>6.1} arc={:>6.2} target={:>5.2} segments={} gates={} projectiles={}",
                tick_index / 60,
                z,
                state.trail.arc_length(),
                state.trail.target_length(),
                state.world.active_segments().len(),
                state.world.active_gates().len(),
                state.launcher.projectiles().len(),
            );
        }
    }

    // Dump the final trail for inspection
    let points: Vec<_> = state.trail_points().collect();
    match serde_json::to_string_pretty(&points) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("failed to serialize trail: {err}"),
    }
}

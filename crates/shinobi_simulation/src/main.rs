//! Headless симуляция Shinobi
//!
//! Цель ходит по кругу через detection volume, игрок периодически попадает по Shinobi.
//! Первый аргумент: опциональный путь к JSON конфигу.

use bevy::prelude::*;
use shinobi_simulation::logger::{set_log_level, LogLevel};
use shinobi_simulation::*;

fn main() {
    let seed = 42;

    let config = match std::env::args().nth(1) {
        Some(path) => match ShinobiConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load config {}: {}", path, err);
                std::process::exit(1);
            }
        },
        None => ShinobiConfig::default(),
    };

    println!("Starting Shinobi headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    set_log_level(LogLevel::Info);
    app.add_plugins(SimulationPlugin);

    let target = app
        .world_mut()
        .spawn(Transform::from_translation(orbit(0)))
        .id();
    let shinobi = match Shinobi::new(config, Vec3::ZERO, orbit(0)) {
        Ok(shinobi) => shinobi,
        Err(err) => {
            eprintln!("Invalid shinobi config: {}", err);
            std::process::exit(1);
        }
    };
    let agent = app
        .world_mut()
        .spawn(ai::shinobi_bundle(shinobi, target))
        .id();

    // 1000 тиков симуляции (≈16.7s при 60Hz)
    for tick in 0..1000 {
        if let Some(mut transform) = app.world_mut().get_mut::<Transform>(target) {
            transform.translation = orbit(tick);
        }

        // Попадание игрока каждые 5 секунд
        if tick > 0 && tick % 300 == 0 {
            app.world_mut().send_event(DamageIntent::hit(agent));
        }

        app.update();

        if tick % 60 == 0 {
            match app.world().get::<Shinobi>(agent) {
                Some(shinobi) => println!(
                    "Tick {}: {} | distance {:.2} | hp {}",
                    tick,
                    shinobi.state(),
                    shinobi.context().distance_to_target(),
                    shinobi.health().current
                ),
                None => {
                    println!("Tick {}: shinobi destroyed", tick);
                    break;
                }
            }
        }
    }

    println!("Simulation complete!");
}

/// Цель на эллиптической орбите: то внутри 7.75, то снаружи
fn orbit(tick: usize) -> Vec3 {
    let angle = tick as f32 / 60.0 * 0.6;
    Vec3::new(angle.cos() * 10.0, 0.0, angle.sin() * 4.0)
}

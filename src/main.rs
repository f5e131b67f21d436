//! Native demo: a scripted session against the engine at 60 fps

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use blockfall::GameConfig;
    use blockfall::engine::{Command, FrameEvent};
    use blockfall::{Engine, consts};

    env_logger::init();
    log::info!("Blockfall (native) starting...");

    let config = GameConfig::default();
    let frame_ms = config.frame_interval_ms();
    let mut engine = Engine::new(config, 0xB10C).expect("default config is valid");
    engine.start();

    // one scripted minute: nudge, rotate, and drop on a fixed cadence
    let mut now_ms = 0.0;
    let mut runs = 1u32;
    for frame in 0..consts::MAX_FPS * 60 {
        match frame % 180 {
            30 => engine.push_command(Command::Left),
            75 => engine.push_command(Command::Rotate),
            120 => engine.push_command(Command::Right),
            165 => engine.push_command(Command::HardDrop),
            _ => {}
        }
        now_ms += frame_ms;
        match engine.frame(now_ms) {
            FrameEvent::Running(field) => {
                if frame % consts::MAX_FPS == consts::MAX_FPS - 1 {
                    log::info!(
                        "t={:6.0}ms score={:5} level={}",
                        now_ms,
                        field.score,
                        field.level
                    );
                }
            }
            FrameEvent::GameOver(field) => {
                log::info!("run {runs} over at {} points", field.score);
                runs += 1;
                engine.click();
            }
            FrameEvent::Idle => {}
        }
    }

    let field = engine.snapshot();
    log::info!(
        "demo finished: {} run(s), {} points, level {}",
        runs,
        field.score,
        field.level
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM hosts construct BlockfallGame through the bindings instead
}

//! Pixel Invaders - headless demo
//!
//! Runs the simulation on autopilot for a while and prints a summary.
//! Usage: `pixel-invaders [seconds] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use pixel_invaders::audio::LogAudio;
    use pixel_invaders::consts::SIM_DT;
    use pixel_invaders::sim::{GamePhase, SimRng, TickInput};
    use pixel_invaders::{Session, Settings, platform};

    platform::init_logging();
    log::info!("Pixel Invaders (native) starting...");

    let mut args = std::env::args().skip(1);
    let seconds: f32 = args
        .next()
        .and_then(|a| a.parse().ok())
        .unwrap_or(120.0);
    let rng = match args.next().and_then(|a| a.parse().ok()) {
        Some(seed) => SimRng::new(seed),
        None => SimRng::from_entropy(),
    };
    let seed = rng.seed();

    let storage = platform::default_storage();
    let settings = Settings::load(&storage);
    let mut session = Session::new(rng, LogAudio::default(), storage);
    session.apply_settings(&settings);

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let frames = (seconds / SIM_DT).ceil() as u64;
    let mut games = 0u32;
    let mut best_score = 0u32;
    let mut best_level = 1u32;
    let mut last_phase = session.state().phase;

    for _ in 0..frames {
        session.update(SIM_DT, &input);
        let state = session.state();
        best_level = best_level.max(state.level);
        if state.phase != last_phase {
            if state.phase == GamePhase::GameOver {
                games += 1;
                best_score = best_score.max(state.score);
            }
            last_phase = state.phase;
        }
    }

    let state = session.state();
    best_score = best_score.max(state.score);
    println!("Seed:          {seed}");
    println!("Simulated:     {seconds:.0}s ({frames} frames)");
    println!("Games over:    {games}");
    println!("Best score:    {best_score}");
    println!("Best level:    {best_level}");
    println!("High score:    {}", state.high_score);
    println!("Audio cues:    {}", session.audio().played);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::start` in the library, this is just to satisfy the compiler
}

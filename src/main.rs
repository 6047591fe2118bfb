//! Mole Rush entry point
//!
//! Native build runs a headless demo match: the auto-player plays one match
//! on logical time and every game event is reported through the log.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use mole_rush::sim::{AutoPlayer, GameEvent, GameObserver, GameSession, PcgSource};
    use mole_rush::error::Result;
    use mole_rush::{BestScoreStore, JsonBestScores, Settings};

    const SETTINGS_PATH: &str = "mole-rush.json";
    const BEST_SCORES_PATH: &str = "mole-rush-best.json";

    /// Stand-in for the rendering/audio layer: narrates events to the log
    #[derive(Default)]
    struct ConsolePresenter {
        hits: u32,
        misses: u32,
    }

    impl GameObserver for ConsolePresenter {
        fn on_event(&mut self, event: &GameEvent) {
            match event {
                GameEvent::Started {
                    tier,
                    time_remaining,
                } => log::info!("{} match, {}s on the clock", tier, time_remaining),
                GameEvent::TargetSpawned { slot, kind } => {
                    log::debug!("{:?} up in hole {}", kind, slot)
                }
                GameEvent::TargetExpired { slot, .. } => {
                    self.misses += 1;
                    log::debug!("hole {} went down untouched", slot)
                }
                GameEvent::TargetHit {
                    slot,
                    kind,
                    points,
                    combo,
                    score,
                    ..
                } => {
                    self.hits += 1;
                    log::debug!(
                        "whacked {:?} in hole {}: {:+} (combo {}, score {})",
                        kind,
                        slot,
                        points,
                        combo,
                        score
                    )
                }
                GameEvent::ComboReset { cause } => log::debug!("combo broken: {:?}", cause),
                GameEvent::Tick { time_remaining } => {
                    if time_remaining % 10 == 0 {
                        log::info!("{}s left", time_remaining);
                    }
                }
                GameEvent::SessionEnded(summary) => log::info!(
                    "final score {}, max combo {}{}",
                    summary.final_score,
                    summary.max_combo,
                    if summary.is_new_best { " - NEW BEST!" } else { "" }
                ),
            }
        }
    }

    pub fn run() -> Result<()> {
        let settings = Settings::load(SETTINGS_PATH)?;
        let store = JsonBestScores::load(BEST_SCORES_PATH)?;
        let seed = settings.resolve_seed();
        log::info!("Seed {}", seed);

        let mut session = GameSession::new(
            PcgSource::new(seed),
            Box::new(store),
            settings.session_config(),
        );
        let bot = AutoPlayer::from(settings.autoplay);
        let mut presenter = ConsolePresenter::default();

        session.start(settings.difficulty);
        let frame_ms = settings.autoplay.frame_ms.max(1);
        let mut now = session.now();
        while session.is_running() {
            now += frame_ms;
            let triggers = bot.choose(&session, now);
            session.frame(now, &triggers);
            session.dispatch(&mut presenter);
        }
        session.dispatch(&mut presenter);

        if let Some(summary) = session.summary() {
            println!(
                "{}: score {} | max combo {} | hits {} | misses {} | best {}{}",
                summary.tier,
                summary.final_score,
                summary.max_combo,
                presenter.hits,
                presenter.misses,
                session.best_scores().read(summary.tier),
                if summary.is_new_best { " (new)" } else { "" }
            );
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mole Rush (native demo) starting...");
    if let Err(err) = demo::run() {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No native loop on wasm; a host page drives GameSession directly
}

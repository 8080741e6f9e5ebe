//! Brewhop entry point
//!
//! Runs the built-in campaign headless with a scripted input source and
//! reports the session at the end. Usage: `brewhop [tuning.json]`

use std::sync::Arc;

use brewhop::Tuning;
use brewhop::levels::CAMPAIGN;
use brewhop::run::{Campaign, InputTracker, Key, Progress};

const FRAME_DT: f32 = 1.0 / 60.0;
const MAX_FRAMES: usize = 60 * 60 * 5;

/// Hold right and hop at a steady rhythm
fn script(frame: usize, input: &mut InputTracker) {
    if frame == 0 {
        input.key_down(Key::Right);
    }
    match frame % 40 {
        0 => input.key_down(Key::Up),
        12 => input.key_up(Key::Up),
        _ => {}
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Brewhop (headless) starting...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => Tuning::load(path)?,
        None => Tuning::default(),
    };

    let mut campaign = Campaign::new(&CAMPAIGN, Arc::new(tuning))?;
    let mut input = InputTracker::new();
    let mut progress = Progress::Running;

    for frame in 0..MAX_FRAMES {
        script(frame, &mut input);
        progress = campaign.frame(FRAME_DT, &input.snapshot());
        match progress {
            Progress::Running => {}
            Progress::LevelWon { index } => log::info!("Cleared level {} at frame {}", index, frame),
            Progress::LevelLost { index } => log::info!("Died on level {} at frame {}", index, frame),
            Progress::Completed | Progress::GameOver => break,
        }
    }

    if !progress.is_finished() {
        log::warn!(
            "Stopped after {} frames on level {}/{}",
            MAX_FRAMES,
            campaign.level_index() + 1,
            campaign.level_count()
        );
    }

    println!("{:?}", progress);
    println!("{}", serde_json::to_string_pretty(campaign.session())?);
    Ok(())
}

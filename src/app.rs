//! Fixed-rate game loop.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use rand::Rng;

use crate::controller::Session;
use crate::persistence::ScoreStore;
use crate::platform::{AudioPlayer, Cue, InputSource, Renderer};

/// Run until the input source asks to quit.
///
/// Each tick polls input once, steps the session with the frame budget as
/// the elapsed game time, plays sound cues, renders, and sleeps off whatever
/// is left of `frame`.
pub fn run<S, R, I, D, A>(
    session: &mut Session<S, R>,
    input: &mut I,
    renderer: &mut D,
    audio: &mut A,
    frame: Duration,
) -> io::Result<()>
where
    S: ScoreStore,
    R: Rng,
    I: InputSource,
    D: Renderer,
    A: AudioPlayer,
{
    renderer.render(session.state())?;

    loop {
        let frame_start = Instant::now();

        let frame_input = input.poll();
        if frame_input.quit {
            log::info!("Quit requested");
            return Ok(());
        }

        for event in session.step(&frame_input, frame) {
            log::trace!("{event:?}");
            if let Some(cue) = Cue::for_event(&event) {
                audio.play(cue);
            }
        }

        renderer.render(session.state())?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

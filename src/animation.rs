//! Playback of the intermediate snapshots the backend sends with a move.
//!
//! The sequencer is an explicit state machine polled once per rendered
//! frame. A single repeating [`Ticker`] spaces the steps; nothing sleeps and
//! nothing reschedules itself.

use std::time::{Duration, Instant};

use crate::cube::{AnimationFrame, CubePiece, CubeState, FaceGrid};

/// Default spacing between two animation steps.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Fires at most once per poll, at least `interval` after the previous firing.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    interval: Duration,
    next_due: Instant,
}

impl Ticker {
    /// Starts a ticker whose first firing is one interval after `now`.
    pub fn start(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    /// Returns `true` if the ticker fired.
    ///
    /// Missed intervals are not caught up on: the next firing is scheduled
    /// relative to `now`, so a slow caller sees every step, just later.
    pub fn poll(&mut self, now: Instant) -> bool {
        if now < self.next_due {
            return false;
        }
        self.next_due = now + self.interval;
        true
    }
}

/// What a sequencer step put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shown {
    /// The intermediate snapshot at this index.
    Frame(usize),
    /// The authoritative state of the response.
    Final,
}

#[derive(Debug)]
enum Playback {
    Idle,
    Playing {
        frames: Vec<AnimationFrame>,
        /// Index of the next frame to show; `frames.len()` means the target
        /// is next.
        index: usize,
        target: CubeState,
        ticker: Ticker,
    },
}

/// Owns the displayed cube state and replays animations into it.
///
/// Faces change only when a target state is committed, so the flat net and
/// the 3D pieces never show data from two different responses at rest.
#[derive(Debug)]
pub struct Sequencer {
    interval: Duration,
    faces: Vec<FaceGrid>,
    pieces: Vec<CubePiece>,
    playback: Playback,
}

impl Sequencer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            faces: Vec::new(),
            pieces: Vec::new(),
            playback: Playback::Idle,
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.playback, Playback::Playing { .. })
    }

    /// Faces of the last committed state.
    pub fn faces(&self) -> &[FaceGrid] {
        &self.faces
    }

    /// Pieces currently on screen: an animation frame or the committed state.
    pub fn pieces(&self) -> &[CubePiece] {
        &self.pieces
    }

    /// Starts showing a response.
    ///
    /// Without frames the target is committed at once and [`Shown::Final`] is
    /// returned. Otherwise playback starts and the first frame is shown by a
    /// later [`tick`](Self::tick). Any playback already running is dropped;
    /// the new target supersedes its target.
    pub fn play(
        &mut self,
        frames: Vec<AnimationFrame>,
        target: CubeState,
        now: Instant,
    ) -> Option<Shown> {
        if self.is_playing() {
            tracing::warn!("new state arrived during playback; dropping remaining frames");
        }

        if frames.is_empty() {
            self.commit(target);
            return Some(Shown::Final);
        }

        tracing::debug!(frames = frames.len(), "starting playback");
        self.playback = Playback::Playing {
            frames,
            index: 0,
            target,
            ticker: Ticker::start(self.interval, now),
        };
        None
    }

    /// Advances playback by at most one step.
    pub fn tick(&mut self, now: Instant) -> Option<Shown> {
        let Playback::Playing {
            frames,
            index,
            ticker,
            ..
        } = &mut self.playback
        else {
            return None;
        };

        if !ticker.poll(now) {
            return None;
        }

        if let Some(frame) = frames.get(*index) {
            let shown = Shown::Frame(*index);
            self.pieces = frame.clone();
            *index += 1;
            return Some(shown);
        }

        let Playback::Playing { target, .. } =
            std::mem::replace(&mut self.playback, Playback::Idle)
        else {
            unreachable!("playback was checked above");
        };
        self.commit(target);
        Some(Shown::Final)
    }

    fn commit(&mut self, target: CubeState) {
        self.faces = target.faces;
        self.pieces = target.pieces;
        self.playback = Playback::Idle;
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::fixtures::{solved_faces, solved_state};
    use crate::cube::RotationMatrix;

    const INTERVAL: Duration = Duration::from_millis(50);

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// A one-piece frame tagged by its x position.
    fn frame(tag: f32) -> AnimationFrame {
        vec![CubePiece {
            position: [tag, 0.0, 0.0],
            rotation: RotationMatrix::IDENTITY,
            faces: vec![],
        }]
    }

    /// Runs playback to completion, polling every `step`, and records what
    /// was on screen after each change.
    fn record(
        sequencer: &mut Sequencer,
        start: Instant,
        step: Duration,
    ) -> Vec<(Duration, Vec<CubePiece>)> {
        let mut shown = Vec::new();
        let mut elapsed = Duration::ZERO;
        while sequencer.is_playing() {
            elapsed += step;
            if sequencer.tick(start + elapsed).is_some() {
                shown.push((elapsed, sequencer.pieces().to_vec()));
            }
            assert!(elapsed < Duration::from_secs(60), "playback never finished");
        }
        shown
    }

    #[test]
    fn test_ticker_fires_once_per_interval() {
        let start = Instant::now();
        let mut ticker = Ticker::start(INTERVAL, start);
        assert!(!ticker.poll(start));
        assert!(!ticker.poll(start + ms(49)));
        assert!(ticker.poll(start + ms(50)));
        assert!(!ticker.poll(start + ms(99)));
        assert!(ticker.poll(start + ms(100)));
    }

    #[test]
    fn test_ticker_does_not_burst_after_a_stall() {
        let start = Instant::now();
        let mut ticker = Ticker::start(INTERVAL, start);
        assert!(ticker.poll(start + ms(500)));
        assert!(!ticker.poll(start + ms(500)));
        assert!(!ticker.poll(start + ms(549)));
        assert!(ticker.poll(start + ms(550)));
    }

    #[test]
    fn test_frames_then_final_in_order() {
        let start = Instant::now();
        let mut sequencer = Sequencer::new(INTERVAL);
        let frames: Vec<AnimationFrame> = (0..5).map(|i| frame(i as f32)).collect();
        let target = solved_state();

        assert_eq!(sequencer.play(frames.clone(), target.clone(), start), None);
        let shown: Vec<_> = record(&mut sequencer, start, ms(10))
            .into_iter()
            .map(|(_, pieces)| pieces)
            .collect();

        let mut expected = frames;
        expected.push(target.pieces.clone());
        assert_eq!(shown, expected);
        assert_eq!(sequencer.faces(), target.faces.as_slice());
        assert!(!sequencer.is_playing());
    }

    #[test]
    fn test_three_frame_move_shows_four_states_at_fifty_ms() {
        let start = Instant::now();
        let mut sequencer = Sequencer::new(INTERVAL);
        let frames = vec![frame(0.1), frame(0.2), frame(0.3)];
        sequencer.play(frames, solved_state(), start);

        let times: Vec<Duration> = record(&mut sequencer, start, ms(1))
            .into_iter()
            .map(|(at, _)| at)
            .collect();
        assert_eq!(times, [ms(50), ms(100), ms(150), ms(200)]);
    }

    #[test]
    fn test_shown_reports_indices_then_final() {
        let start = Instant::now();
        let mut sequencer = Sequencer::new(INTERVAL);
        sequencer.play(vec![frame(1.0), frame(2.0)], solved_state(), start);

        assert_eq!(sequencer.tick(start + ms(20)), None);
        assert_eq!(sequencer.tick(start + ms(50)), Some(Shown::Frame(0)));
        assert_eq!(sequencer.tick(start + ms(100)), Some(Shown::Frame(1)));
        assert_eq!(sequencer.tick(start + ms(150)), Some(Shown::Final));
        assert_eq!(sequencer.tick(start + ms(200)), None);
    }

    #[test]
    fn test_slow_polling_skips_no_frame() {
        let start = Instant::now();
        let mut sequencer = Sequencer::new(INTERVAL);
        let frames: Vec<AnimationFrame> = (0..4).map(|i| frame(i as f32)).collect();
        sequencer.play(frames.clone(), solved_state(), start);

        let shown = record(&mut sequencer, start, ms(170));
        assert_eq!(shown.len(), 5);
        for (index, expected) in frames.iter().enumerate() {
            assert_eq!(&shown[index].1, expected);
        }
    }

    #[test]
    fn test_no_frames_commits_immediately() {
        let start = Instant::now();
        let mut sequencer = Sequencer::new(INTERVAL);
        let target = solved_state();

        assert_eq!(
            sequencer.play(vec![], target.clone(), start),
            Some(Shown::Final)
        );
        assert!(!sequencer.is_playing());
        assert_eq!(sequencer.pieces(), target.pieces.as_slice());
        assert_eq!(sequencer.tick(start + ms(500)), None);
    }

    #[test]
    fn test_faces_wait_for_the_final_state() {
        let start = Instant::now();
        let mut sequencer = Sequencer::new(INTERVAL);
        sequencer.play(vec![], CubeState::default(), start);
        assert!(sequencer.faces().is_empty());

        sequencer.play(vec![frame(0.5)], solved_state(), start);
        sequencer.tick(start + ms(50));
        assert!(sequencer.faces().is_empty());
        sequencer.tick(start + ms(100));
        assert_eq!(sequencer.faces(), solved_faces().as_slice());
    }

    #[test]
    fn test_new_response_during_playback_snaps() {
        let start = Instant::now();
        let mut sequencer = Sequencer::new(INTERVAL);
        sequencer.play(vec![frame(1.0), frame(2.0)], CubeState::default(), start);
        sequencer.tick(start + ms(50));

        let target = solved_state();
        sequencer.play(vec![], target.clone(), start + ms(60));
        assert!(!sequencer.is_playing());
        assert_eq!(sequencer.pieces(), target.pieces.as_slice());
    }
}

//! Coordinates backend requests with playback.
//!
//! Moves pressed while a request is outstanding or an animation is playing
//! are queued and sent one at a time, in order, once the display is idle.

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use crate::animation::{Sequencer, Shown};
use crate::cube::{CubeMove, CubePiece, CubeResponse, FaceGrid};
use crate::error::Result;

/// Something to ask the backend for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// `GET /get_cube`
    Fetch,
    /// `POST /apply_move/{move}`
    Move(CubeMove),
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Request::Fetch => write!(f, "fetch"),
            Request::Move(cube_move) => write!(f, "move {cube_move}"),
        }
    }
}

/// Display state plus the queue of requests waiting to be sent.
#[derive(Debug)]
pub struct Session {
    sequencer: Sequencer,
    queue: VecDeque<Request>,
    in_flight: Option<Request>,
}

impl Session {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            sequencer: Sequencer::new(frame_interval),
            queue: VecDeque::new(),
            in_flight: None,
        }
    }

    pub fn enqueue(&mut self, request: Request) {
        tracing::debug!(%request, queued = self.queue.len(), "request queued");
        self.queue.push_back(request);
    }

    /// Number of requests waiting behind the one in flight.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn in_flight(&self) -> Option<Request> {
        self.in_flight
    }

    /// Takes the next request to send, if the display is ready for one.
    pub fn next_request(&mut self) -> Option<Request> {
        if self.in_flight.is_some() || self.sequencer.is_playing() {
            return None;
        }
        let request = self.queue.pop_front()?;
        self.in_flight = Some(request);
        Some(request)
    }

    /// Feeds the outcome of the request in flight back in.
    ///
    /// A failure is logged and leaves the display as it was.
    pub fn handle_response(
        &mut self,
        result: Result<CubeResponse>,
        now: Instant,
    ) -> Option<Shown> {
        let request = self.in_flight.take();
        match result {
            Ok(response) => {
                let (state, frames) = response.into_parts();
                tracing::info!(
                    request = ?request,
                    pieces = state.pieces.len(),
                    frames = frames.len(),
                    "state received"
                );
                self.sequencer.play(frames, state, now)
            }
            Err(err) => {
                tracing::error!(request = ?request, "request failed: {err}");
                None
            }
        }
    }

    /// Advances playback; see [`Sequencer::tick`].
    pub fn tick(&mut self, now: Instant) -> Option<Shown> {
        self.sequencer.tick(now)
    }

    pub fn is_playing(&self) -> bool {
        self.sequencer.is_playing()
    }

    pub fn faces(&self) -> &[FaceGrid] {
        self.sequencer.faces()
    }

    pub fn pieces(&self) -> &[CubePiece] {
        self.sequencer.pieces()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::fixtures::{solved_faces, solved_pieces};
    use crate::error::CubeViewError;

    const INTERVAL: Duration = Duration::from_millis(50);

    fn response(frames: usize) -> CubeResponse {
        CubeResponse {
            faces: solved_faces(),
            pieces: solved_pieces(),
            animation: vec![solved_pieces(); frames],
        }
    }

    #[test]
    fn test_requests_go_out_one_at_a_time() {
        let mut session = Session::new(INTERVAL);
        session.enqueue(Request::Fetch);
        session.enqueue(Request::Move(CubeMove::U));

        assert_eq!(session.next_request(), Some(Request::Fetch));
        assert_eq!(session.next_request(), None);
        assert_eq!(session.in_flight(), Some(Request::Fetch));
        assert_eq!(session.pending(), 1);

        session.handle_response(Ok(response(0)), Instant::now());
        assert_eq!(session.next_request(), Some(Request::Move(CubeMove::U)));
    }

    #[test]
    fn test_moves_wait_for_playback_to_finish() {
        let start = Instant::now();
        let mut session = Session::new(INTERVAL);
        session.enqueue(Request::Move(CubeMove::U));
        session.enqueue(Request::Move(CubeMove::RPrime));

        assert_eq!(session.next_request(), Some(Request::Move(CubeMove::U)));
        assert_eq!(session.handle_response(Ok(response(2)), start), None);
        assert!(session.is_playing());
        assert_eq!(session.next_request(), None);

        assert_eq!(session.tick(start + INTERVAL), Some(Shown::Frame(0)));
        assert_eq!(session.tick(start + INTERVAL * 2), Some(Shown::Frame(1)));
        assert_eq!(session.next_request(), None);
        assert_eq!(session.tick(start + INTERVAL * 3), Some(Shown::Final));
        assert_eq!(
            session.next_request(),
            Some(Request::Move(CubeMove::RPrime))
        );
    }

    #[test]
    fn test_move_without_animation_shows_final_at_once() {
        let mut session = Session::new(INTERVAL);
        session.enqueue(Request::Move(CubeMove::R2));
        session.next_request();

        let shown = session.handle_response(Ok(response(0)), Instant::now());
        assert_eq!(shown, Some(Shown::Final));
        assert_eq!(session.pieces(), solved_pieces().as_slice());
        assert_eq!(session.faces(), solved_faces().as_slice());
    }

    #[test]
    fn test_failure_keeps_state_and_drains_queue() {
        let mut session = Session::new(INTERVAL);
        session.enqueue(Request::Fetch);
        session.enqueue(Request::Move(CubeMove::F));
        session.next_request();
        session.handle_response(Ok(response(0)), Instant::now());

        session.enqueue(Request::Move(CubeMove::U));
        assert_eq!(session.next_request(), Some(Request::Move(CubeMove::F)));
        let failure = Err(CubeViewError::Status {
            url: "http://localhost:8000/apply_move/F".into(),
            status: 500,
        });
        assert_eq!(session.handle_response(failure, Instant::now()), None);
        assert_eq!(session.pieces(), solved_pieces().as_slice());
        assert_eq!(session.in_flight(), None);
        assert_eq!(session.next_request(), Some(Request::Move(CubeMove::U)));
        assert_eq!(session.pending(), 0);
    }

    #[test]
    fn test_empty_state_before_first_response() {
        let session = Session::new(INTERVAL);
        assert!(session.faces().is_empty());
        assert!(session.pieces().is_empty());
    }
}

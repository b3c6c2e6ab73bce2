//! Interactive 3D view of the cube using kiss3d.

use std::time::Instant;

use kiss3d::prelude::*;

use cubeview::cube::{sticker_tally, CubeMove, CubePiece, Side, StickerColor, Turn};
use cubeview::net::format_net;
use cubeview::scene::{
    compose, PieceModel, PIECE_RGB, PIECE_SIZE, STICKER_DEPTH, STICKER_SIZE,
};
use cubeview::{AppConfig, BackendClient, Dispatcher, Request, Session, Shown};

const TITLE: &str =
    "cubeview - [U/D/L/R/F/B] turn, hold [Shift] prime, [Ctrl] double, [Space] reload";

fn color([r, g, b]: [f32; 3]) -> Color {
    Color::new(r, g, b, 1.0)
}

fn sticker_color(sticker: StickerColor) -> Color {
    color(sticker.rgb())
}

/// Modifier keys currently held down.
#[derive(Debug, Default, Clone, Copy)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

fn face_key(side: Side) -> kiss3d::event::Key {
    use kiss3d::event::Key;
    match side {
        Side::Up => Key::U,
        Side::Down => Key::D,
        Side::Left => Key::L,
        Side::Right => Key::R,
        Side::Front => Key::F,
        Side::Back => Key::B,
    }
}

/// The move a key press triggers. Ctrl wins over Shift.
pub fn key_move(key: kiss3d::event::Key, modifiers: Modifiers) -> Option<CubeMove> {
    let side = Side::ALL.into_iter().find(|&side| face_key(side) == key)?;
    let turn = if modifiers.ctrl {
        Turn::Double
    } else if modifiers.shift {
        Turn::CounterClockwise
    } else {
        Turn::Clockwise
    };
    Some(CubeMove::new(side, turn))
}

/// Human-readable key binding of a move.
pub fn binding(cube_move: CubeMove) -> String {
    let key = format!("{:?}", face_key(cube_move.side()));
    match cube_move.turn() {
        Turn::Clockwise => key,
        Turn::CounterClockwise => format!("Shift+{key}"),
        Turn::Double => format!("Ctrl+{key}"),
    }
}

/// Scene nodes of one piece: the body and its stickers.
struct RenderedPiece {
    body: SceneNode3d,
    stickers: Vec<SceneNode3d>,
    model: PieceModel,
}

impl RenderedPiece {
    fn build(scene: &mut SceneNode3d, model: PieceModel) -> Self {
        let mut body = scene
            .add_cube(PIECE_SIZE, PIECE_SIZE, PIECE_SIZE)
            .set_color(color(PIECE_RGB))
            .set_position(model.position);
        body.set_rotation(model.rotation);

        let stickers = model
            .stickers
            .iter()
            .map(|sticker| {
                let mut node = scene
                    .add_cube(STICKER_SIZE, STICKER_SIZE, STICKER_DEPTH)
                    .set_color(sticker_color(sticker.color))
                    .set_position(model.sticker_center(sticker));
                node.set_rotation(model.sticker_rotation(sticker));
                node
            })
            .collect();

        Self {
            body,
            stickers,
            model,
        }
    }

    /// Moves existing nodes; the sticker layout must be unchanged.
    fn update(&mut self, model: PieceModel) {
        self.body.set_position(model.position);
        self.body.set_rotation(model.rotation);
        for (node, sticker) in self.stickers.iter_mut().zip(&model.stickers) {
            node.set_position(model.sticker_center(sticker));
            node.set_rotation(model.sticker_rotation(sticker));
        }
        self.model = model;
    }

    fn remove(mut self) {
        self.body.remove();
        for mut node in self.stickers.drain(..) {
            node.remove();
        }
    }
}

/// All piece nodes currently in the scene.
#[derive(Default)]
struct PieceNodes {
    pieces: Vec<RenderedPiece>,
}

impl PieceNodes {
    /// Brings the scene in line with `pieces`.
    ///
    /// Pieces keep their stickers from move to move, so usually only
    /// transforms change; nodes are rebuilt when the layout differs.
    fn sync(&mut self, scene: &mut SceneNode3d, pieces: &[CubePiece]) {
        let models = compose(pieces);
        let reusable = models.len() == self.pieces.len()
            && models
                .iter()
                .zip(&self.pieces)
                .all(|(model, rendered)| model.same_stickers(&rendered.model));

        if reusable {
            for (rendered, model) in self.pieces.iter_mut().zip(models) {
                rendered.update(model);
            }
            return;
        }

        tracing::debug!(pieces = models.len(), "rebuilding piece nodes");
        for rendered in self.pieces.drain(..) {
            rendered.remove();
        }
        self.pieces = models
            .into_iter()
            .map(|model| RenderedPiece::build(scene, model))
            .collect();
    }
}

/// Whether the ground and gizmo belong on screen for `pieces`.
fn stage_visible(pieces: &[CubePiece]) -> bool {
    !pieces.is_empty()
}

/// Static parts of the scene. The ground slab is only present while
/// there are pieces to stand on it.
#[derive(Default)]
struct Stage {
    ground: Option<SceneNode3d>,
}

impl Stage {
    /// Height of the ground slab, just under the bottom layer.
    const GROUND_Y: f32 = -1.8;
    /// Edge length of the ground slab.
    const GROUND_SIZE: f32 = 6.0;

    fn build(scene: &mut SceneNode3d) -> Self {
        scene
            .add_light(Light::point(100.0))
            .set_position(Vec3::new(4.0, 5.0, 10.0));
        Self::default()
    }

    fn sync(&mut self, scene: &mut SceneNode3d, pieces: &[CubePiece]) {
        match (stage_visible(pieces), self.ground.take()) {
            (true, None) => {
                self.ground = Some(
                    scene
                        .add_cube(Self::GROUND_SIZE, 0.02, Self::GROUND_SIZE)
                        .set_color(Color::new(0.75, 0.75, 0.78, 1.0))
                        .set_position(Vec3::new(0.0, Self::GROUND_Y, 0.0)),
                );
            }
            (false, Some(mut ground)) => ground.remove(),
            (_, ground) => self.ground = ground,
        }
    }
}

/// XYZ axis gizmo drawn next to the cube.
fn axis_gizmo() -> Vec<Polyline3d> {
    let origin = Vec3::new(-2.5, -1.7, -2.5);
    [
        (Vec3::X, Color::new(1.0, 0.1, 0.1, 1.0)),
        (Vec3::Y, Color::new(0.1, 0.8, 0.1, 1.0)),
        (Vec3::Z, Color::new(0.1, 0.3, 1.0, 1.0)),
    ]
    .into_iter()
    .map(|(axis, axis_color)| {
        Polyline3d::new(vec![origin, origin + axis])
            .with_color(axis_color)
            .with_width(4.0)
    })
    .collect()
}

/// Prints the flat net of a freshly committed state.
fn report_state(session: &Session) {
    let net = format_net(session.faces());
    if !net.is_empty() {
        println!("{net}");
    }
    tracing::debug!(tally = ?sticker_tally(session.pieces()), "state committed");
}

/// Opens the viewer and runs until the window is closed.
pub fn display(config: &AppConfig) -> cubeview::Result<()> {
    pollster::block_on(display_async(config))
}

async fn display_async(config: &AppConfig) -> cubeview::Result<()> {
    /// Distance of the orbit camera from the cube's center.
    const CAMERA_DISTANCE: f32 = 12.0;

    let mut dispatcher = Dispatcher::new(BackendClient::new(&config.server)?)?;
    let mut session = Session::new(config.animation.frame_interval());
    session.enqueue(Request::Fetch);

    let mut window = Window::new(TITLE).await;
    window.set_background_color(Color::new(0.93, 0.93, 0.95, 1.0));

    let mut camera = OrbitCamera3d::default();
    camera.set_dist(CAMERA_DISTANCE);

    let mut scene = SceneNode3d::empty();
    let mut stage = Stage::build(&mut scene);
    let gizmo = axis_gizmo();

    let mut piece_nodes = PieceNodes::default();
    let mut modifiers = Modifiers::default();

    loop {
        for event in window.events().iter() {
            if let kiss3d::event::WindowEvent::Key(key, action, _) = event.value {
                use kiss3d::event::{Action, Key};
                let pressed = action == Action::Press;
                match key {
                    Key::LShift | Key::RShift => modifiers.shift = pressed,
                    Key::LControl | Key::RControl => modifiers.ctrl = pressed,
                    Key::Space if pressed => session.enqueue(Request::Fetch),
                    _ if pressed => {
                        if let Some(cube_move) = key_move(key, modifiers) {
                            session.enqueue(Request::Move(cube_move));
                        }
                    }
                    _ => {}
                }
            }
        }

        if let Some(request) = session.next_request() {
            dispatcher.send(request);
        }

        let now = Instant::now();
        let mut shown = None;
        while let Some(result) = dispatcher.poll() {
            shown = session.handle_response(result, now).or(shown);
        }
        if let Some(step) = session.tick(now) {
            shown = Some(step);
        }

        if let Some(step) = shown {
            piece_nodes.sync(&mut scene, session.pieces());
            stage.sync(&mut scene, session.pieces());
            if step == Shown::Final {
                report_state(&session);
            }
        }

        if stage_visible(session.pieces()) {
            for axis in &gizmo {
                window.draw_polyline(axis);
            }
        }

        if !window.render_3d(&mut scene, &mut camera).await {
            break;
        }
    }

    Ok(())
}

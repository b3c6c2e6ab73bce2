//! The flat, unfolded view of the six faces.
//!
//! Faces are laid out as a cross, four faces wide and three tall:
//!
//! ```text
//!     U
//!   L F R B
//!     D
//! ```

use crate::cube::{FaceGrid, Side, FACE_DIM};

/// Face order of the backend's face list.
pub const FACE_ORDER: [Side; 6] = [
    Side::Up,
    Side::Left,
    Side::Front,
    Side::Right,
    Side::Back,
    Side::Down,
];

/// Columns of faces in the cross.
const NET_COLUMNS: usize = 4;

/// Rows of faces in the cross.
const NET_ROWS: usize = 3;

/// Cell `(column, row)` of the cross occupied by a face.
pub fn net_cell(side: Side) -> (usize, usize) {
    match side {
        Side::Up => (1, 0),
        Side::Left => (0, 1),
        Side::Front => (1, 1),
        Side::Right => (2, 1),
        Side::Back => (3, 1),
        Side::Down => (1, 2),
    }
}

/// Renders the faces as text, one letter per sticker.
///
/// An empty face list renders as an empty string.
pub fn format_net(faces: &[FaceGrid]) -> String {
    if faces.is_empty() {
        return String::new();
    }

    let mut cells: [[Option<&FaceGrid>; NET_COLUMNS]; NET_ROWS] =
        [[None; NET_COLUMNS]; NET_ROWS];
    for (side, face) in FACE_ORDER.into_iter().zip(faces) {
        let (column, row) = net_cell(side);
        cells[row][column] = Some(face);
    }

    let mut output = String::new();
    for face_row in &cells {
        // the widest occupied column decides where the line may stop
        let last_column = face_row.iter().rposition(Option::is_some);
        for sticker_row in 0..FACE_DIM {
            let mut line = String::new();
            for (column, cell) in face_row.iter().enumerate() {
                if Some(column) > last_column {
                    break;
                }
                if column > 0 {
                    line.push(' ');
                }
                match cell.and_then(|face| face.get(sticker_row)) {
                    Some(stickers) => line.extend(stickers.iter().map(|color| color.letter())),
                    None => line.push_str(&" ".repeat(FACE_DIM)),
                }
            }
            output.push_str(&line);
            output.push('\n');
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::fixtures::solved_faces;
    use crate::cube::StickerColor;

    #[test]
    fn test_empty_faces_render_nothing() {
        assert_eq!(format_net(&[]), "");
    }

    #[test]
    fn test_cross_cells_are_distinct() {
        let mut cells: Vec<_> = FACE_ORDER.into_iter().map(net_cell).collect();
        cells.sort();
        cells.dedup();
        assert_eq!(cells.len(), 6);
        assert!(cells.iter().all(|&(column, row)| column < NET_COLUMNS && row < NET_ROWS));
    }

    #[test]
    fn test_solved_net_snapshot() {
        insta::assert_snapshot!(format_net(&solved_faces()));
    }

    #[test]
    fn test_sticker_lands_in_its_face() {
        let mut faces = solved_faces();
        // top-left sticker of the Right face
        faces[3][0][0] = StickerColor::White;
        let net = format_net(&faces);
        let fourth_line = net.lines().nth(3).unwrap();
        assert_eq!(fourth_line, "OOO GGG WRR BBB");
    }
}

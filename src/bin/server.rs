//! Room-based two-player chess server.
//!
//! A host opens a room and waits; a guest joins and the game starts with the
//! host playing White. Clients then poll the room state and post moves. Each
//! room owns exactly one `Game`, and the room table lock serializes move
//! application per match. Rejected moves are answered only to the client
//! that sent them.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use chess_rooms::game::{Game, GameState};
use chess_rooms::types::{Color, MoveError, PieceKind, Position};

const MAX_ROOMS: usize = 1000;
const ROOM_TTL: Duration = Duration::from_secs(48 * 60 * 60); // 48 hours

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Serve room-based two-player chess over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Directory of static client files to serve at /
    #[arg(long, default_value = "public")]
    public_dir: String,
}

struct Room {
    host: String,
    /// None while the host is waiting for a guest.
    game: Option<Game>,
    created_at: SystemTime,
}

#[derive(Clone)]
struct AppState {
    rooms: Arc<RwLock<HashMap<String, Room>>>,
}

#[derive(Serialize)]
struct CellDto {
    kind: PieceKind,
    side: Color,
}

#[derive(Serialize)]
struct PieceMovesDto {
    position: [u8; 2],
    moves: Vec<[u8; 2]>,
}

#[derive(Serialize)]
struct RoomSummary {
    room_id: String,
    host: String,
}

#[derive(Serialize)]
struct RoomView {
    room_id: String,
    host: String,
    guest: Option<String>,
    /// Occupied cells only; `[row][col]`, `[0, 0]` being White's far corner.
    board: Option<[[Option<CellDto>; 8]; 8]>,
    side_to_move: Option<Color>,
    /// Whether the side to move is currently in check.
    check: bool,
    /// Legal moves for the side to move, as sent to the player whose turn
    /// it is.
    legal_moves: Option<Vec<PieceMovesDto>>,
    /// Terminal result tag, e.g. "white wins".
    result: Option<String>,
}

#[derive(Deserialize)]
struct CreateRoomRequest {
    host: String,
}

#[derive(Serialize)]
struct CreateRoomResponse {
    room_id: String,
}

#[derive(Deserialize)]
struct JoinRoomRequest {
    guest: String,
}

#[derive(Deserialize)]
struct MoveRequest {
    player: String,
    from: [u8; 2],
    to: [u8; 2],
}

#[derive(Serialize)]
struct MoveResponse {
    from: [u8; 2],
    to: [u8; 2],
    /// The rook relocation to mirror when the move castled.
    castling: Option<CastlingDto>,
    /// Whether the opponent is now in check.
    check: bool,
    result: Option<String>,
    board: [[Option<CellDto>; 8]; 8],
    /// Legal moves for the side now on turn; empty when the game ended.
    legal_moves: Vec<PieceMovesDto>,
}

#[derive(Serialize)]
struct CastlingDto {
    rook_from: [u8; 2],
    rook_to: [u8; 2],
}

type ApiError = (StatusCode, String);

fn generate_room_id() -> String {
    let bytes: [u8; 16] = rand::thread_rng().gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn cleanup_rooms(rooms: &mut HashMap<String, Room>) {
    let now = SystemTime::now();

    rooms.retain(|_, room| {
        now.duration_since(room.created_at)
            .map(|age| age < ROOM_TTL)
            .unwrap_or(true)
    });

    while rooms.len() > MAX_ROOMS {
        if let Some(oldest_id) = rooms
            .iter()
            .min_by_key(|(_, r)| r.created_at)
            .map(|(id, _)| id.clone())
        {
            rooms.remove(&oldest_id);
        } else {
            break;
        }
    }
}

fn board_dto(game: &Game) -> [[Option<CellDto>; 8]; 8] {
    game.board()
        .snapshot()
        .map(|row| row.map(|cell| cell.map(|(kind, side)| CellDto { kind, side })))
}

fn legal_moves_dto(game: &mut Game, side: Color) -> Vec<PieceMovesDto> {
    game.legal_moves_for_side(side)
        .into_iter()
        .map(|piece_moves| PieceMovesDto {
            position: [piece_moves.position.row, piece_moves.position.col],
            moves: piece_moves
                .moves
                .iter()
                .map(|m| [m.to.row, m.to.col])
                .collect(),
        })
        .collect()
}

fn result_tag(game: &Game) -> Option<String> {
    match game.state() {
        GameState::Checkmate(Color::White) => Some("White wins".to_string()),
        GameState::Checkmate(Color::Black) => Some("Black wins".to_string()),
        GameState::AwaitingMove(_) => None,
    }
}

fn parse_square(raw: [u8; 2]) -> Result<Position, ApiError> {
    if raw[0] > 7 || raw[1] > 7 {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("square [{}, {}] is off the board", raw[0], raw[1]),
        ));
    }
    Ok(Position::new(raw[0], raw[1]))
}

fn room_view(room_id: &str, room: &mut Room) -> RoomView {
    match room.game.as_mut() {
        None => RoomView {
            room_id: room_id.to_string(),
            host: room.host.clone(),
            guest: None,
            board: None,
            side_to_move: None,
            check: false,
            legal_moves: None,
            result: None,
        },
        Some(game) => {
            let side_to_move = game.side_to_move();
            let check = side_to_move.is_some_and(|side| game.is_in_check(side));
            let legal_moves = side_to_move.map(|side| legal_moves_dto(game, side));
            RoomView {
                room_id: room_id.to_string(),
                host: game.player_name(Color::White).to_string(),
                guest: Some(game.player_name(Color::Black).to_string()),
                board: Some(board_dto(game)),
                side_to_move,
                check,
                legal_moves,
                result: result_tag(game),
            }
        }
    }
}

/// Rooms still waiting for a guest, the server's lobby listing.
async fn list_rooms(State(state): State<AppState>) -> Json<Vec<RoomSummary>> {
    let rooms = state.rooms.read().unwrap_or_else(|e| e.into_inner());
    Json(
        rooms
            .iter()
            .filter(|(_, room)| room.game.is_none())
            .map(|(id, room)| RoomSummary {
                room_id: id.clone(),
                host: room.host.clone(),
            })
            .collect(),
    )
}

async fn create_room(
    State(state): State<AppState>,
    Json(req): Json<CreateRoomRequest>,
) -> Result<Json<CreateRoomResponse>, ApiError> {
    if req.host.trim().is_empty() {
        return Err((StatusCode::UNPROCESSABLE_ENTITY, "host name is empty".into()));
    }
    let mut rooms = state.rooms.write().unwrap_or_else(|e| e.into_inner());
    cleanup_rooms(&mut rooms);

    // names stay unique across live rooms, matching the lobby rules
    let name_taken = rooms.values().any(|room| {
        room.host == req.host
            || room
                .game
                .as_ref()
                .is_some_and(|g| g.side_of(&req.host).is_some())
    });
    if name_taken {
        return Err((
            StatusCode::CONFLICT,
            format!("name {} is already in use", req.host),
        ));
    }

    let room_id = generate_room_id();
    rooms.insert(
        room_id.clone(),
        Room {
            host: req.host,
            game: None,
            created_at: SystemTime::now(),
        },
    );
    Ok(Json(CreateRoomResponse { room_id }))
}

async fn join_room(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(req): Json<JoinRoomRequest>,
) -> Result<Json<RoomView>, ApiError> {
    let mut rooms = state.rooms.write().unwrap_or_else(|e| e.into_inner());
    let room = rooms
        .get_mut(&room_id)
        .ok_or((StatusCode::NOT_FOUND, "room not found".to_string()))?;
    if room.game.is_some() {
        return Err((StatusCode::CONFLICT, "room is already full".into()));
    }
    if req.guest == room.host || req.guest.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            "guest name is empty or taken by the host".into(),
        ));
    }

    // host plays White, the joining player Black
    room.game = Some(Game::new(room.host.clone(), req.guest));
    Ok(Json(room_view(&room_id, room)))
}

async fn room_state(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
) -> Result<Json<RoomView>, ApiError> {
    let mut rooms = state.rooms.write().unwrap_or_else(|e| e.into_inner());
    let room = rooms
        .get_mut(&room_id)
        .ok_or((StatusCode::NOT_FOUND, "room not found".to_string()))?;
    Ok(Json(room_view(&room_id, room)))
}

async fn make_move(
    State(state): State<AppState>,
    Path(room_id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    // the write lock is held across validation and application, so moves
    // against one room can never interleave
    let mut rooms = state.rooms.write().unwrap_or_else(|e| e.into_inner());
    let room = rooms
        .get_mut(&room_id)
        .ok_or((StatusCode::NOT_FOUND, "room not found".to_string()))?;
    let game = room.game.as_mut().ok_or((
        StatusCode::CONFLICT,
        "the game has not started yet".to_string(),
    ))?;

    let player_side = game.side_of(&req.player).ok_or((
        StatusCode::FORBIDDEN,
        "you are not playing in this room".to_string(),
    ))?;
    if game.side_to_move() != Some(player_side) {
        return Err((StatusCode::CONFLICT, "it's not your turn".to_string()));
    }

    let from = parse_square(req.from)?;
    let to = parse_square(req.to)?;

    let outcome = game.player_move(from, to).map_err(|err| match err {
        MoveError::IllegalMove { .. } => (StatusCode::UNPROCESSABLE_ENTITY, err.to_string()),
        MoveError::GameAlreadyEnded => (StatusCode::CONFLICT, err.to_string()),
    })?;

    let legal_moves = match game.side_to_move() {
        Some(side) => legal_moves_dto(game, side),
        None => Vec::new(),
    };
    Ok(Json(MoveResponse {
        from: req.from,
        to: req.to,
        castling: outcome.rook_shift.map(|(rook_from, rook_to)| CastlingDto {
            rook_from: [rook_from.row, rook_from.col],
            rook_to: [rook_to.row, rook_to.col],
        }),
        check: outcome.check,
        result: result_tag(game),
        board: board_dto(game),
        legal_moves,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_tag_names_the_winner_capitalized() {
        let mut game = Game::new("a".to_string(), "b".to_string());
        assert_eq!(result_tag(&game), None);

        // fool's mate
        game.player_move(Position::new(6, 5), Position::new(5, 5))
            .unwrap();
        game.player_move(Position::new(1, 4), Position::new(3, 4))
            .unwrap();
        game.player_move(Position::new(6, 6), Position::new(4, 6))
            .unwrap();
        game.player_move(Position::new(0, 3), Position::new(4, 7))
            .unwrap();

        assert_eq!(result_tag(&game), Some("Black wins".to_string()));
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let state = AppState {
        rooms: Arc::new(RwLock::new(HashMap::new())),
    };

    let app = Router::new()
        .route("/api/rooms", get(list_rooms).post(create_room))
        .route("/api/rooms/:room_id", get(room_state))
        .route("/api/rooms/:room_id/join", post(join_room))
        .route("/api/rooms/:room_id/move", post(make_move))
        .nest_service("/", ServeDir::new(&args.public_dir))
        .layer(CorsLayer::new())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .unwrap();

    println!("chess room server listening on port {}...", args.port);

    axum::serve(listener, app).await.unwrap();
}

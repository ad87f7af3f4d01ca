//! Conversion logic between DTOs and domain entities.

use crate::domain::entity::{Player, Room};
use crate::infrastructure::dto::http::RoomSummaryDto;
use crate::infrastructure::dto::websocket as dto;

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&Player> for dto::PlayerDto {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.to_string(),
            name: player.name.as_str().to_string(),
            is_owner: player.is_owner,
            wpm: player.wpm,
            progress: player.progress,
            is_finished: player.is_finished,
        }
    }
}

impl From<&Room> for dto::RoomDto {
    fn from(room: &Room) -> Self {
        Self {
            code: room.code.as_str().to_string(),
            name: room.name.as_str().to_string(),
            is_private: room.is_private,
            owner_id: room.owner_id.to_string(),
            players: room.players.iter().map(dto::PlayerDto::from).collect(),
            game_state: room.phase.as_str().to_string(),
            current_text: room.current_text.clone(),
            game_start_time: room.game_start_time.map(|t| t.value()),
        }
    }
}

impl From<&Room> for RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            code: room.code.as_str().to_string(),
            name: room.name.as_str().to_string(),
            is_private: room.is_private,
            player_count: room.players.len(),
            game_state: room.phase.as_str().to_string(),
        }
    }
}

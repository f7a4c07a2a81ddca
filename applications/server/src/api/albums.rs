/// Albums API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use albumstore_storage::albums::{self, Album, AlbumId, CreateAlbum};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

/// Create body. Omitted fields default to empty strings; the store
/// accepts any attribute as empty.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateAlbumRequest {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub year: String,
}

/// Partial update. Only fields present in the body overwrite the record;
/// omitted fields keep their stored values.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AlbumPatch {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    pub year: Option<String>,
}

impl AlbumPatch {
    fn apply(self, album: &mut Album) {
        if let Some(title) = self.title {
            album.title = title;
        }
        if let Some(artist) = self.artist {
            album.artist = artist;
        }
        if let Some(genre) = self.genre {
            album.genre = genre;
        }
        if let Some(year) = self.year {
            album.year = year;
        }
    }
}

/// POST /albums
pub async fn create_album(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateAlbumRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Album>)> {
    let Json(req) = payload.map_err(invalid_payload)?;

    let album = albums::create(
        state.pool(),
        CreateAlbum {
            title: req.title,
            artist: req.artist,
            genre: req.genre,
            year: req.year,
        },
    )
    .await?;

    tracing::info!("Created album {}", album.id);
    Ok((StatusCode::CREATED, Json(album)))
}

/// GET /albums/:id
pub async fn get_album(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Album>> {
    let id = parse_id(&id)?;

    let album = albums::get_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Album not found".to_string()))?;

    Ok(Json(album))
}

/// GET /albums
pub async fn list_albums(State(state): State<AppState>) -> Result<Json<Vec<Album>>> {
    let all = albums::get_all(state.pool()).await?;
    Ok(Json(all))
}

/// PUT/PATCH /albums/:id
///
/// The record is fetched before the body is examined, so a missing id
/// yields 404 even when the body is malformed.
pub async fn update_album(
    Path(id): Path<String>,
    State(state): State<AppState>,
    payload: std::result::Result<Json<AlbumPatch>, JsonRejection>,
) -> Result<Json<Album>> {
    let id = parse_id(&id)?;

    let mut album = albums::get_by_id(state.pool(), id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Album not found".to_string()))?;

    let Json(patch) = payload.map_err(invalid_payload)?;
    patch.apply(&mut album);

    let album = albums::update(state.pool(), &album).await?;

    tracing::info!("Updated album {}", album.id);
    Ok(Json(album))
}

/// DELETE /albums/:id
pub async fn delete_album(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let id = parse_id(&id)?;

    albums::delete(state.pool(), id).await?;

    tracing::info!("Deleted album {}", id);
    Ok(Json(serde_json::json!({ "result": "success" })))
}

fn parse_id(raw: &str) -> Result<AlbumId> {
    match raw.parse::<AlbumId>() {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(ServerError::BadRequest("Invalid ID".to_string())),
    }
}

fn invalid_payload(rejection: JsonRejection) -> ServerError {
    tracing::debug!("Rejected request body: {}", rejection);
    ServerError::BadRequest("Invalid request payload".to_string())
}

use crate::{
    render::{
        CanvasSize, DrawCommand, Point, RenderOptions, RenderOptionsUpdate, Viewport,
        ViewportUpdate, to_svg,
    },
    ring::{Angle, EntryId, OwnershipRange, RingAssignment, RingEntry, RingFull},
    server::AppState,
};
use actix_web::{
    Error, HttpResponse,
    error::{ErrorBadRequest, ErrorConflict, ErrorInternalServerError, ErrorNotFound},
    get, post,
    web::{Data, Json, Query},
};
use log::{error, warn};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_actix_web::{scope, service_config::ServiceConfig};

pub fn configure_routes(config: &mut ServiceConfig) {
    config.service(
        scope::scope("/ring")
            .service(get_ring)
            .service(get_owner)
            .service(add_node)
            .service(reset_ring)
            .service(get_options)
            .service(update_options)
            .service(get_viewport)
            .service(update_viewport)
            .service(zoom_viewport)
            .service(reset_viewport)
            .service(draw_ring)
            .service(draw_ring_svg),
    );
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RingSnapshot {
    /// Sorted by position
    pub entries: Vec<RingEntry>,
    pub assignment: RingAssignment,
    pub physical_nodes: usize,
    pub options: RenderOptions,
    pub viewport: Viewport,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OwnerQuery {
    /// Position on the ring in degrees, wrapped into [0, 360)
    pub angle: Angle,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OwnerLookup {
    pub angle: Angle,
    pub owner: RingEntry,
    pub range: OwnershipRange,
    /// Entries holding a replica of the owner's partition
    pub replica_holders: Vec<EntryId>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CanvasQuery {
    /// Canvas width in pixels (optional, defaults to the configured canvas)
    pub width: Option<u32>,
    /// Canvas height in pixels (optional, defaults to the configured canvas)
    pub height: Option<u32>,
    /// Overrides the stored viewport zoom for this drawing only
    pub zoom: Option<f64>,
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
}

impl CanvasQuery {
    fn canvas(&self, default: CanvasSize) -> Result<CanvasSize, Error> {
        CanvasSize::new(
            self.width.unwrap_or(default.width),
            self.height.unwrap_or(default.height),
        )
        .map_err(ErrorBadRequest)
    }

    fn viewport(&self, current: Viewport) -> Result<Viewport, Error> {
        current
            .updated(ViewportUpdate {
                zoom: self.zoom,
                offset_x: self.offset_x,
                offset_y: self.offset_y,
            })
            .map_err(ErrorBadRequest)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ZoomRequest {
    /// Multiplier applied to the current zoom, above 1 zooms in
    pub factor: f64,
    /// Focus point in canvas pixels
    pub x: f64,
    pub y: f64,
    /// Size of the canvas the focus point belongs to (optional, defaults to the configured canvas)
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Drawing {
    pub canvas: CanvasSize,
    /// In painting order
    pub commands: Vec<DrawCommand>,
}

#[utoipa::path(
    summary = "Get ring state",
    description = "Entries, ownership ranges, hosted replicas and display options",
    responses(
        (status = 200, description = "Current ring", body = RingSnapshot)
    ),
    tags = ["ring"],
    operation_id = "getRing"
)]
#[get("")]
async fn get_ring(app_state: Data<AppState>) -> Result<Json<RingSnapshot>, Error> {
    let ring = app_state.ring.lock().await;

    Ok(Json(RingSnapshot {
        entries: ring.entries().to_vec(),
        assignment: ring.assignment(),
        physical_nodes: ring.physical_node_count(),
        options: ring.options(),
        viewport: ring.viewport(),
    }))
}

#[utoipa::path(
    summary = "Find the owner of a position",
    description = "Entry owning the angle and the entries replicating its partition",
    params(
        ("angle" = f64, Query, description = "Position in degrees, wrapped into [0, 360)"),
    ),
    responses(
        (status = 200, description = "Owning entry", body = OwnerLookup),
        (status = 400, description = "Invalid angle"),
        (status = 404, description = "The ring is empty")
    ),
    tags = ["ring"],
    operation_id = "getOwner"
)]
#[get("/owner")]
async fn get_owner(
    query: Query<OwnerQuery>,
    app_state: Data<AppState>,
) -> Result<Json<OwnerLookup>, Error> {
    if !query.angle.is_finite() {
        return Err(ErrorBadRequest("Angle must be a finite number"));
    }

    let angle = query.angle.rem_euclid(360.0);
    let ring = app_state.ring.lock().await;
    let assignment = ring.assignment();

    let (owner, range) = assignment
        .owner_of(angle)
        .and_then(|owner_id| {
            let owner = ring.entries().iter().find(|entry| entry.id == owner_id)?;
            Some((owner, assignment.range_of(owner_id)?))
        })
        .ok_or_else(|| ErrorNotFound("The ring is empty"))?;

    let replica_holders = assignment
        .replicas
        .iter()
        .filter(|(_, hosted)| hosted.contains(&owner.partition_id))
        .map(|(holder_id, _)| *holder_id)
        .collect();

    Ok(Json(OwnerLookup {
        angle,
        owner: owner.clone(),
        range: *range,
        replica_holders,
    }))
}

#[utoipa::path(
    summary = "Add a node",
    description = "Adds a physical node and two virtual entries, each in the largest free gap",
    responses(
        (status = 200, description = "Entries created for the node", body = Vec<RingEntry>),
        (status = 409, description = "Maximum number of physical nodes reached"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["ring"],
    operation_id = "addNode"
)]
#[post("/nodes")]
async fn add_node(app_state: Data<AppState>) -> Result<Json<Vec<RingEntry>>, Error> {
    let created = app_state.ring.lock().await.add_node().map_err(|e| {
        if e.downcast_ref::<RingFull>().is_some() {
            warn!("Rejected node: {e}");
            return ErrorConflict("Ring is full");
        }

        error!("Failed to add node: {e:#}");
        ErrorInternalServerError(e)
    })?;

    Ok(Json(created))
}

#[utoipa::path(
    summary = "Reset the ring",
    description = "Removes every node and forgets assigned colors",
    responses(
        (status = 200, description = "Ring cleared")
    ),
    tags = ["ring"],
    operation_id = "resetRing"
)]
#[post("/reset")]
async fn reset_ring(app_state: Data<AppState>) -> HttpResponse {
    app_state.ring.lock().await.reset();

    HttpResponse::Ok().json(serde_json::json!({ "message": "Ring reset" }))
}

#[utoipa::path(
    summary = "Get display options",
    responses(
        (status = 200, description = "Current options", body = RenderOptions)
    ),
    tags = ["ring"],
    operation_id = "getOptions"
)]
#[get("/options")]
async fn get_options(app_state: Data<AppState>) -> Json<RenderOptions> {
    Json(app_state.ring.lock().await.options())
}

#[utoipa::path(
    summary = "Update display options",
    description = "Fields left out of the body keep their current value",
    request_body = RenderOptionsUpdate,
    responses(
        (status = 200, description = "Updated options", body = RenderOptions),
        (status = 400, description = "Invalid body")
    ),
    tags = ["ring"],
    operation_id = "updateOptions"
)]
#[post("/options")]
async fn update_options(
    body: Json<RenderOptionsUpdate>,
    app_state: Data<AppState>,
) -> Json<RenderOptions> {
    let options = app_state
        .ring
        .lock()
        .await
        .update_options(body.into_inner());

    Json(options)
}

#[utoipa::path(
    summary = "Get the viewport",
    responses(
        (status = 200, description = "Current zoom and offset", body = Viewport)
    ),
    tags = ["ring"],
    operation_id = "getViewport"
)]
#[get("/viewport")]
async fn get_viewport(app_state: Data<AppState>) -> Json<Viewport> {
    Json(app_state.ring.lock().await.viewport())
}

#[utoipa::path(
    summary = "Update the viewport",
    description = "Missing fields keep their current value, the zoom is clamped to [0.5, 3]",
    request_body = ViewportUpdate,
    responses(
        (status = 200, description = "Updated viewport", body = Viewport),
        (status = 400, description = "Invalid body or non finite value")
    ),
    tags = ["ring"],
    operation_id = "updateViewport"
)]
#[post("/viewport")]
async fn update_viewport(
    body: Json<ViewportUpdate>,
    app_state: Data<AppState>,
) -> Result<Json<Viewport>, Error> {
    let viewport = app_state
        .ring
        .lock()
        .await
        .update_viewport(body.into_inner())
        .map_err(ErrorBadRequest)?;

    Ok(Json(viewport))
}

#[utoipa::path(
    summary = "Zoom toward a point",
    description = "Multiplies the zoom by the factor and pans toward the focus point",
    request_body = ZoomRequest,
    responses(
        (status = 200, description = "Updated viewport", body = Viewport),
        (status = 400, description = "Invalid factor, focus or canvas size")
    ),
    tags = ["ring"],
    operation_id = "zoomViewport"
)]
#[post("/viewport/zoom")]
async fn zoom_viewport(
    body: Json<ZoomRequest>,
    app_state: Data<AppState>,
) -> Result<Json<Viewport>, Error> {
    let canvas = CanvasSize::new(
        body.width.unwrap_or(app_state.default_canvas.width),
        body.height.unwrap_or(app_state.default_canvas.height),
    )
    .map_err(ErrorBadRequest)?;

    if !(body.x.is_finite() && body.y.is_finite()) {
        return Err(ErrorBadRequest("Focus point must be finite"));
    }

    let viewport = app_state
        .ring
        .lock()
        .await
        .zoom_viewport(body.factor, Point::new(body.x, body.y), canvas)
        .map_err(ErrorBadRequest)?;

    Ok(Json(viewport))
}

#[utoipa::path(
    summary = "Reset the viewport",
    description = "Back to zoom 1 with no offset. Nodes are kept",
    responses(
        (status = 200, description = "Default viewport", body = Viewport)
    ),
    tags = ["ring"],
    operation_id = "resetViewport"
)]
#[post("/viewport/reset")]
async fn reset_viewport(app_state: Data<AppState>) -> Json<Viewport> {
    Json(app_state.ring.lock().await.reset_viewport())
}

#[utoipa::path(
    summary = "Draw the ring",
    description = "Draw commands for a canvas of the given size, to be replayed in order",
    params(
        ("width" = Option<u32>, Query, description = "Canvas width in pixels (1 to 8192)"),
        ("height" = Option<u32>, Query, description = "Canvas height in pixels (1 to 8192)"),
        ("zoom" = Option<f64>, Query, description = "Zoom for this drawing, clamped to [0.5, 3]"),
        ("offset_x" = Option<f64>, Query, description = "Horizontal offset for this drawing"),
        ("offset_y" = Option<f64>, Query, description = "Vertical offset for this drawing"),
    ),
    responses(
        (status = 200, description = "Draw commands", body = Drawing),
        (status = 400, description = "Invalid canvas size or viewport")
    ),
    tags = ["ring"],
    operation_id = "drawRing"
)]
#[get("/draw")]
async fn draw_ring(
    query: Query<CanvasQuery>,
    app_state: Data<AppState>,
) -> Result<Json<Drawing>, Error> {
    let canvas = query.canvas(app_state.default_canvas)?;
    let mut ring = app_state.ring.lock().await;
    let viewport = query.viewport(ring.viewport())?;
    let commands = ring.render(canvas, viewport);

    Ok(Json(Drawing { canvas, commands }))
}

#[utoipa::path(
    summary = "Draw the ring as SVG",
    params(
        ("width" = Option<u32>, Query, description = "Canvas width in pixels (1 to 8192)"),
        ("height" = Option<u32>, Query, description = "Canvas height in pixels (1 to 8192)"),
        ("zoom" = Option<f64>, Query, description = "Zoom for this drawing, clamped to [0.5, 3]"),
        ("offset_x" = Option<f64>, Query, description = "Horizontal offset for this drawing"),
        ("offset_y" = Option<f64>, Query, description = "Vertical offset for this drawing"),
    ),
    responses(
        (status = 200, description = "SVG document", content_type = "image/svg+xml", body = String),
        (status = 400, description = "Invalid canvas size or viewport"),
        (status = 500, description = "Internal server error")
    ),
    tags = ["ring"],
    operation_id = "drawRingSvg"
)]
#[get("/svg")]
async fn draw_ring_svg(
    query: Query<CanvasQuery>,
    app_state: Data<AppState>,
) -> Result<HttpResponse, Error> {
    let canvas = query.canvas(app_state.default_canvas)?;
    let mut ring = app_state.ring.lock().await;
    let viewport = query.viewport(ring.viewport())?;
    let commands = ring.render(canvas, viewport);
    drop(ring);

    let svg = to_svg(&commands, canvas).map_err(|e| {
        error!("Failed to export SVG: {e:#}");
        ErrorInternalServerError(e)
    })?;

    Ok(HttpResponse::Ok().content_type("image/svg+xml").body(svg))
}

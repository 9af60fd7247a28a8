//! Asynchronous texture, teapot and font loads
//!
//! Every load is tagged with a [`RequestId`] when it starts. Completions are
//! checked against [`AssetRequests`] before touching the scene, so a late
//! result never replaces a newer edit to the same slot.

use bevy::asset::LoadState;
use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;
use meshtext::{MeshGenerator, MeshText, QualitySettings, TextSection};
use std::sync::{Arc, Mutex};

use vitrine_core::factory::{build_geometry, build_text_geometry};
use vitrine_core::settings::{ShapeKind, TextParams};
use vitrine_core::{AssetLoadError, AssetSlot, Completion, MaterialSpec, RequestId};

use crate::mesh;
use crate::object::ObjectBuilder;
use crate::types::{AssetRequests, GizmoState, Notifications, PrimaryScene, ViewerAssets, ViewerSettings};

/// Result slot shared with an in-flight fetch
type FetchSlot = Arc<Mutex<Option<Result<Vec<u8>, String>>>>;

/// Loaded inputs for geometry that is not procedural
#[derive(Resource, Default)]
pub struct MeshSources {
    /// First primitive of the teapot glTF, once requested
    pub teapot: Option<Handle<Mesh>>,
    /// Raw font file, kept for the lifetime of the app
    pub font: Option<&'static [u8]>,
}

impl MeshSources {
    pub fn teapot_mesh<'a>(&self, meshes: &'a Assets<Mesh>) -> Option<&'a Mesh> {
        self.teapot.as_ref().and_then(|handle| meshes.get(handle))
    }

    /// Extruded, centered mesh for `text`; `None` until the font has arrived
    pub fn text_mesh(&self, text: &str, params: &TextParams) -> Option<Mesh> {
        let font = self.font?;
        Some(match build_text_vertices(font, text, params) {
            Ok(vertices) => mesh::centered_triangle_mesh(&vertices),
            Err(e) => {
                tracing::warn!("Failed to mesh text {:?}: {}", text, e);
                mesh::centered_triangle_mesh(&[])
            }
        })
    }
}

fn build_text_vertices(font: &'static [u8], text: &str, params: &TextParams) -> Result<Vec<f32>, String> {
    let steps = params.curve_segments.round().max(1.0) as u32;
    let mut generator = MeshGenerator::new_with_quality(
        font,
        QualitySettings {
            quad_interpolation_steps: steps,
            cubic_interpolation_steps: steps,
        },
    );

    // Glyphs are generated one unit high and one unit deep
    let transform = Mat4::from_scale(Vec3::new(params.size, params.size, params.height)).to_cols_array();
    let section: MeshText = generator
        .generate_section(text, false, Some(&transform))
        .map_err(|e| e.to_string())?;
    Ok(section.vertices)
}

/// Geometry waiting on an asset
#[derive(Debug, Clone)]
enum PendingGeometry {
    Teapot,
    Text { text: String, params: TextParams },
}

#[derive(Debug, Clone)]
struct PendingTexture {
    id: RequestId,
    url: String,
    handle: Handle<Image>,
}

/// Loads started but not yet applied; a newer request for a slot replaces
/// the older one
#[derive(Resource, Default)]
pub struct PendingLoads {
    geometry: Option<(RequestId, PendingGeometry)>,
    material: Option<PendingTexture>,
    font_fetch: Option<FetchSlot>,
}

impl PendingLoads {
    pub fn is_loading(&self, slot: AssetSlot) -> bool {
        match slot {
            AssetSlot::Geometry => self.geometry.is_some(),
            AssetSlot::Material => self.material.is_some(),
        }
    }
}

pub struct LoaderPlugin;

impl Plugin for LoaderPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MeshSources>()
            .init_resource::<PendingLoads>()
            .add_systems(Update, (receive_font, poll_asset_loads).chain());
    }
}

/// Start loading the teapot mesh
pub fn request_teapot(
    requests: &mut AssetRequests,
    pending: &mut PendingLoads,
    builder: &mut ObjectBuilder,
    assets: &ViewerAssets,
) -> RequestId {
    let id = requests.issue(AssetSlot::Geometry);
    if builder.sources.teapot.is_none() {
        let path = GltfAssetLabel::Primitive { mesh: 0, primitive: 0 }.from_asset(assets.teapot.clone());
        builder.sources.teapot = Some(builder.asset_server.load(path));
        tracing::info!("Loading teapot from {}", assets.teapot);
    }
    pending.geometry = Some((id, PendingGeometry::Teapot));
    id
}

/// Start generating text, fetching the font first if needed
pub fn request_text(
    requests: &mut AssetRequests,
    pending: &mut PendingLoads,
    builder: &ObjectBuilder,
    assets: &ViewerAssets,
    text: &str,
    params: TextParams,
) -> RequestId {
    let id = requests.issue(AssetSlot::Geometry);
    if builder.sources.font.is_none() && pending.font_fetch.is_none() {
        let slot = FetchSlot::default();
        tracing::info!("Fetching font from {}", assets.font);
        fetch_bytes(&assets.font, slot.clone());
        pending.font_fetch = Some(slot);
    }
    pending.geometry = Some((
        id,
        PendingGeometry::Text {
            text: text.to_string(),
            params,
        },
    ));
    id
}

/// Start loading a texture image from `url`
pub fn request_texture(
    requests: &mut AssetRequests,
    pending: &mut PendingLoads,
    asset_server: &AssetServer,
    url: &str,
) -> RequestId {
    let id = requests.issue(AssetSlot::Material);
    tracing::info!("Loading texture from {}", url);
    pending.material = Some(PendingTexture {
        id,
        url: url.to_string(),
        handle: asset_server.load(url.to_string()),
    });
    id
}

/// Move a finished font fetch into [`MeshSources`]
fn receive_font(
    mut pending: ResMut<PendingLoads>,
    mut sources: ResMut<MeshSources>,
    mut notifications: ResMut<Notifications>,
    assets: Res<ViewerAssets>,
) {
    let Some(slot) = pending.font_fetch.as_ref() else {
        return;
    };

    // Take the result and release the lock before acting on it
    let result = match slot.try_lock() {
        Ok(mut result) => result.take(),
        Err(_) => None,
    };
    let Some(result) = result else {
        return;
    };
    pending.font_fetch = None;

    match result {
        Ok(bytes) => {
            tracing::info!("Font loaded ({} bytes)", bytes.len());
            sources.font = Some(Box::leak(bytes.into_boxed_slice()));
        }
        Err(reason) => {
            notifications.push(AssetLoadError::new(AssetSlot::Geometry, assets.font.clone(), reason));
            if matches!(pending.geometry, Some((_, PendingGeometry::Text { .. }))) {
                pending.geometry = None;
            }
        }
    }
}

/// Apply loads that have finished, dropping superseded ones
#[allow(clippy::too_many_arguments)]
fn poll_asset_loads(
    mut builder: ObjectBuilder,
    mut pending: ResMut<PendingLoads>,
    mut scene: ResMut<PrimaryScene>,
    mut gizmo: ResMut<GizmoState>,
    mut settings: ResMut<ViewerSettings>,
    mut notifications: ResMut<Notifications>,
    requests: Res<AssetRequests>,
    assets: Res<ViewerAssets>,
) {
    if let Some((id, geometry)) = pending.geometry.clone() {
        let ready = match &geometry {
            PendingGeometry::Teapot => {
                let state = builder
                    .sources
                    .teapot
                    .as_ref()
                    .and_then(|handle| builder.asset_server.get_load_state(handle.id()));
                match state {
                    Some(LoadState::Loaded) => Some(build_geometry(ShapeKind::Teapot)),
                    Some(LoadState::Failed(err)) => {
                        // Allow a later request to retry
                        builder.sources.teapot = None;
                        pending.geometry = None;
                        if requests.check(id) == Completion::Current {
                            notifications.push(AssetLoadError::new(
                                AssetSlot::Geometry,
                                assets.teapot.clone(),
                                err.to_string(),
                            ));
                            // Startup teapot never arrived: show a cube instead of nothing
                            if scene.object().is_none() {
                                settings.geometry.shape = ShapeKind::Cube;
                                scene.replace_geometry(&mut builder, &mut gizmo, &mut settings, build_geometry(ShapeKind::Cube));
                            }
                        }
                        None
                    }
                    _ => None,
                }
            }
            PendingGeometry::Text { text, params } => builder
                .sources
                .font
                .is_some()
                .then(|| build_text_geometry(text, *params)),
        };

        if let Some(spec) = ready {
            pending.geometry = None;
            if requests.check(id) == Completion::Current {
                scene.replace_geometry(&mut builder, &mut gizmo, &mut settings, spec);
            }
        }
    }

    if let Some(texture) = pending.material.clone() {
        match builder.asset_server.get_load_state(texture.handle.id()) {
            Some(LoadState::Loaded) => {
                pending.material = None;
                if requests.check(texture.id) == Completion::Current {
                    let material = MaterialSpec::Textured { url: texture.url };
                    scene.replace_material(&mut builder, &mut gizmo, &mut settings, material);
                }
            }
            Some(LoadState::Failed(err)) => {
                pending.material = None;
                if requests.check(texture.id) == Completion::Current {
                    notifications.push(AssetLoadError::new(AssetSlot::Material, texture.url, err.to_string()));
                }
            }
            _ => {}
        }
    }
}

/// Fetch a file's bytes (async via wasm_bindgen_futures)
#[cfg(target_arch = "wasm32")]
fn fetch_bytes(url: &str, pending_result: FetchSlot) {
    use wasm_bindgen::JsCast;

    let url = url.to_string();
    wasm_bindgen_futures::spawn_local(async move {
        let result = async {
            let window = web_sys::window().ok_or("No window")?;

            let resp = wasm_bindgen_futures::JsFuture::from(window.fetch_with_str(&url))
                .await
                .map_err(|e| format!("Fetch failed: {:?}", e))?;

            let resp: web_sys::Response = resp.dyn_into().map_err(|_| "Response cast failed")?;

            if !resp.ok() {
                return Err(format!("HTTP {}: {}", resp.status(), resp.status_text()));
            }

            let buffer = wasm_bindgen_futures::JsFuture::from(
                resp.array_buffer().map_err(|_| "Failed to get body")?
            )
                .await
                .map_err(|e| format!("Body read failed: {:?}", e))?;

            Ok(js_sys::Uint8Array::new(&buffer).to_vec())
        }.await;

        if let Ok(mut pending) = pending_result.lock() {
            *pending = Some(result);
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn fetch_bytes(path: &str, pending_result: FetchSlot) {
    let result = std::fs::read(path).map_err(|e| format!("{}: {}", path, e));
    if let Ok(mut pending) = pending_result.lock() {
        *pending = Some(result);
    }
}

use std::sync::Arc;

use tokio::runtime::Runtime;
use treasure_hunt_core::{
    PositionSender, PositionSourceKind, PositionSubscription, Session, SessionConfig,
    SessionHandle, ShapeRegistry, TracerView, position_channel, submitter_for,
};

use crate::records::{HuntConfig, HuntSnapshot, LatLng, LocationFailure, TreasureHuntError};

/// One player's hunt, fed by the host's location listener or map touch
/// handler.
#[derive(uniffi::Object)]
pub struct TreasureHunt {
    session: SessionHandle,
    positions: PositionSender,
    #[allow(dead_code)] // Kept alive to keep positions flowing
    subscription: PositionSubscription,
    future_points: usize,
    runtime: Runtime,
}

#[uniffi::export]
impl TreasureHunt {
    #[uniffi::constructor]
    pub fn new(config: HuntConfig) -> Result<Arc<Self>, TreasureHuntError> {
        let mut registry = ShapeRegistry::builtin();
        if let Some(source) = &config.custom_shapes_geojson {
            registry.extend(ShapeRegistry::from_geojson(source)?);
        }

        let kind = PositionSourceKind::from(config.position_input);
        let tracer = config.tracer_config();
        let session_config = SessionConfig {
            shape: config.shape.as_str().into(),
            tracer,
            position_source: kind,
            nickname: config.nickname,
            endpoint: config.endpoint,
        };

        let runtime = Runtime::new().map_err(|e| TreasureHuntError::Runtime(e.to_string()))?;
        let (session, positions, subscription) = {
            let _guard = runtime.enter();
            let submitter = submitter_for(session_config.endpoint.as_deref());
            let session = Session::spawn(session_config, &registry, submitter)?;
            let (positions, source) = position_channel(kind);
            let subscription = session.attach(source)?;
            (session, positions, subscription)
        };

        Ok(Arc::new(Self {
            session,
            positions,
            subscription,
            future_points: tracer.future_points,
            runtime,
        }))
    }

    /// Forward a fix from the device's location listener.
    pub fn location_updated(&self, position: LatLng) {
        self.feed(PositionSourceKind::Geolocation, position);
    }

    /// Forward a pointer position over the map.
    pub fn pointer_moved(&self, position: LatLng) {
        self.feed(PositionSourceKind::Pointer, position);
    }

    /// The location listener gave up. The hunt keeps its progress but
    /// stops advancing.
    pub fn location_failed(&self, failure: LocationFailure) {
        if self.session.position_source() == PositionSourceKind::Geolocation {
            self.positions.fail(failure.into());
        }
    }

    pub async fn start(&self) -> Result<bool, TreasureHuntError> {
        Ok(self.session.start().await?)
    }

    pub async fn finish(&self) -> Result<bool, TreasureHuntError> {
        Ok(self.session.finish().await?)
    }

    /// The shape's waypoints on the map.
    pub fn waypoints(&self) -> Vec<LatLng> {
        let shape = self.session.shape();
        shape
            .waypoints()
            .iter()
            .map(|&p| LatLng::from_point(shape.frame().unproject(p)))
            .collect()
    }

    pub fn snapshot(&self) -> HuntSnapshot {
        let shape = self.session.shape();
        let frame = shape.frame();
        let snapshot = self.session.snapshot();
        let view = TracerView::build(shape, &snapshot, self.future_points);
        let tracer = snapshot.tracer;

        HuntSnapshot {
            phase: tracer.phase.into(),
            target_index: tracer.target_index as u32,
            waypoint_count: shape.len() as u32,
            traced_path: tracer
                .recorded_path
                .iter()
                .map(|&p| LatLng::from_point(frame.unproject(p)))
                .collect(),
            drawing: tracer.drawing,
            was_near_start: tracer.was_near_start,
            last_position: tracer
                .last_position
                .map(|p| LatLng::from_point(frame.unproject(p))),
            completed: tracer.completed,
            location_error: snapshot.position_error.map(|e| e.to_string()),
            banners: view.banners.iter().map(|b| b.as_str().to_owned()).collect(),
        }
    }

    /// Map layers as a GeoJSON FeatureCollection string.
    pub fn view_geojson(&self) -> Result<String, TreasureHuntError> {
        serde_json::to_string(&self.session.view().to_geojson())
            .map_err(|e| TreasureHuntError::Runtime(e.to_string()))
    }
}

impl TreasureHunt {
    fn feed(&self, kind: PositionSourceKind, position: LatLng) {
        if kind != self.session.position_source() {
            tracing::trace!(?kind, "ignoring position from a disabled source");
            return;
        }

        let playfield = self.session.shape().frame().project(position.to_point());
        if !self.positions.send(playfield) {
            tracing::debug!("position subscription has ended, dropping sample");
        }
    }
}

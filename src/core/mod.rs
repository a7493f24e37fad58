//! Core-Domänentypen: Entities, Namenskonventionen, GeoJSON-Geometrie, Metriken.

pub mod area;
pub mod entity;
pub mod equipment;
pub mod event;
/// GeoJSON-Parsing und -Serialisierung
pub mod geometry;
pub mod metrics;
pub mod naming;
pub mod picture;
pub mod point;
pub mod route_path;
pub mod security_zone;

pub use area::Area;
pub use entity::Entity;
pub use equipment::Equipment;
pub use event::{Event, EventStatus};
pub use geometry::GeometryType;
pub use picture::Picture;
pub use point::Point;
pub use route_path::{PathRole, RoutePath};
pub use security_zone::{SecurityZone, TeamRole};

pub mod activity;
pub mod archetype;
pub mod elevation;
pub mod geometry;
pub mod ornaments;
pub mod palette;
pub mod settings;
pub mod shape;
pub mod spec;
pub mod streams;
pub mod territory;

pub use activity::TerritoryActivity;
pub use archetype::{Archetype, ReliefFeature, UnknownArchetype};
pub use elevation::{height, is_on_surface, snap_to_surface, ReliefProfile};
pub use ornaments::{
    decode_special_structures, encode_special_structures, ornament_config, GroupName,
    OrnamentCategory, OrnamentConfig, OrnamentDetail, OrnamentGroups, OrnamentInstance,
    PlacementError, PlacementReport, SpecialStructure, SpecialStructureError,
};
pub use palette::{generate_color_scheme, ColorScheme, PALETTES};
pub use settings::GenerationSettings;
pub use shape::{shape_for, Landmass, ShapeDescriptor};
pub use spec::{RawTerritorySpec, SpecIssue, TerritorySpec, MAX_FUSION_LEVEL, MIN_FUSION_LEVEL};
pub use territory::{BaseSurface, TerritoryGenerator, TerritoryModel};

//! Stream offsets for sub-seeds.
//!
//! Each generation stage draws from its own generator seeded with
//! `sub_seed(visual_seed, OFFSET)`, so a stage can be regenerated on its own and
//! changing one stage's draw count never shifts another stage's output.

pub const PALETTE: u32 = 1;
pub const SHAPE: u32 = 2;
pub const CONFIG: u32 = 3;
pub const BUILDINGS: u32 = 4;
pub const TREES: u32 = 5;
pub const TREASURE: u32 = 6;
pub const PATHS: u32 = 7;
pub const FEATURES: u32 = 8;
pub const BRIDGES: u32 = 9;
pub const SPECIAL: u32 = 10;

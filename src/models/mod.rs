mod market_side;
mod mover;
mod snapshot;

pub use market_side::MarketSide;
pub use mover::{launch_link, parse_percentage, Mover};
pub use snapshot::{partition_by_side, SnapshotRecord};

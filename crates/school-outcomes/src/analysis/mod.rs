mod ranking;
mod scatter;

pub use ranking::{rank, RankDirection, RankedEntry};
pub use scatter::{scatter_points, ScatterPoint};

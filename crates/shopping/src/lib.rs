mod command;
mod lock;
mod merge;
mod model;
mod normalize;
mod quantity;
mod query;
mod reconcile;
mod store;

pub mod unit;

pub use command::*;
pub use lock::*;
pub use merge::*;
pub use model::*;
pub use normalize::*;
pub use quantity::*;
pub use query::Query;
pub use reconcile::*;
pub use store::*;

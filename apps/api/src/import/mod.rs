// CSV import pipeline.
// decoder -> schema -> normalize/dates -> dedup -> coordinator (persistence + summary).

pub mod coordinator;
pub mod dates;
pub mod decoder;
pub mod dedup;
pub mod handlers;
pub mod models;
pub mod normalize;
pub mod schema;

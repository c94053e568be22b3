pub mod delivery;

pub use delivery::{DeliveryRecord, FlowMap, HistoryEntry, Progress, Stage, StageFilter};

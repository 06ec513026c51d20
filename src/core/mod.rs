pub mod catalog;
pub mod composer;
pub mod lookup;
pub mod write_plan;

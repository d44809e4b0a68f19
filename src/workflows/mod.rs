pub mod appraisal;
pub mod roster;

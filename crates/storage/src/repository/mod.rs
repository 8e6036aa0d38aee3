pub mod competition;
pub mod inventory;
pub mod roster;

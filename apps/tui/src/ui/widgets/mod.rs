pub mod cards;
pub mod charts;
pub mod palette;
pub mod popup;
pub mod tables;

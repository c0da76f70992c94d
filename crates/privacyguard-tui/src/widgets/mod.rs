pub mod charts;
pub mod toast;

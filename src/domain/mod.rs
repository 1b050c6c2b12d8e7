pub mod device;
pub mod track;

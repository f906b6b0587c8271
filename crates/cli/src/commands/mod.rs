pub mod ask;
pub mod event;
pub mod replay;

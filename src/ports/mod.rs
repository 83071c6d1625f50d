//! Ports - trait boundaries between the learning core and its collaborators

pub mod observer;
pub mod repository;

pub use observer::Observer;
pub use repository::QTableRepository;

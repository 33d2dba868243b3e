pub mod backup;
pub mod core;
pub mod grades;
pub mod periods;
pub mod subjects;
pub mod summary;
pub mod view;

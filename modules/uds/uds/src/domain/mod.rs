pub mod keys;
pub mod locks;
pub mod selection;
pub mod service;

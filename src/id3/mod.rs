pub mod header;
pub mod mime;
pub mod specs;
pub mod frames;
pub mod tags;
pub mod writer;

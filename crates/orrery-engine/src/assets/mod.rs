pub mod manifest;
pub mod loading;

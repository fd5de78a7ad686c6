pub mod loading;
pub mod navbar;

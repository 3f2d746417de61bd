pub mod components;
pub mod routes;
pub mod state;

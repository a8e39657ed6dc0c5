pub mod backend;
mod handlers;

pub mod paths {
    pub const HEALTH: &str = "/health";
    pub const PUT: &str = "/put/";
    pub const GET: &str = "/get/:commitment";
}

pub mod handlers;
pub mod header;
pub mod live_camera;
pub mod results;
pub mod sections;
pub mod upload_section;
pub mod utils;

pub mod region;
pub mod status;
pub mod stop;
pub mod timeline;
pub mod trip;

pub use region::*;
pub use status::*;
pub use stop::*;
pub use trip::*;

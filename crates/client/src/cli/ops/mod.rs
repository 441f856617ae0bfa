pub mod download;
pub mod init;
pub mod ls;
pub mod recipients;
pub mod upload;
pub mod version;

pub use download::Download;
pub use init::Init;
pub use upload::Upload;
pub use version::Version;

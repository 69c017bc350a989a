//! # Gatewayエンドポイント

pub mod download_link;
pub mod info;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use download_link::handle_get_download_link;
pub use info::handle_info;
pub use upload::handle_upload;

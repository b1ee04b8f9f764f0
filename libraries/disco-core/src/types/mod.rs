mod album;
mod catalog;
mod patch;
mod rating;
mod status;
mod user;

pub use album::{Album, AlbumId, CommunityAlbum, CreateAlbum, MetadataPatch, NewAlbum, UpdateAlbum};
pub use catalog::{AlbumInfo, CatalogAlbum};
pub use patch::Patch;
pub use rating::Rating;
pub use status::AlbumStatus;
pub use user::{User, UserId};

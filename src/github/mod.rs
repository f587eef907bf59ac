pub mod dto;
pub(crate) mod helpers;
pub mod implementation;

pub use dto::{
    ApiErrorBody, ApiResponse, ContainerMetadata, Package, PackageMetadata, PackageOwner,
    PackageVersion, PackageVisibility,
};
pub use implementation::{GitHubApi, GitHubClient};

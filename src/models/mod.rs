//! Data models for backend entities.
//!
//! Each entity has an `Api*` wire type matching the backend's JSON and
//! a denormalized projection used for table display:
//!
//! - `User`, `Role`: accounts and role-based access
//! - `Faq`, `CmsPage`: editable site content
//! - `Customer`: storefront customers (read-only here)
//! - `SiteSettings`: singleton settings document
//! - `Pagination`, `ListQuery`: list-endpoint plumbing

pub mod common;
pub mod content;
pub mod customer;
pub mod role;
pub mod settings;
pub mod user;

pub use common::{
    DeleteRequest, ListQuery, Pagination, SequenceEntry, SequenceUpdate, StatusUpdate,
};
pub use content::{ApiCmsPage, ApiFaq, CmsInput, CmsPage, CmsPayload, Faq, FaqInput, FaqsPayload};
pub use customer::{ApiCustomer, Customer, CustomersPayload};
pub use role::{ApiRole, Role, RoleInput, RolesPayload};
pub use settings::SiteSettings;
pub use user::{
    ApiUser, ApiUserRole, ChangePasswordInput, ProfileInput, User, UserInput, UsersPayload,
};

//! Account domain entities shared by all three actor types.

pub mod model;
pub mod realm;
pub mod role;
pub mod token;

pub use model::{Account, AccountProfile, LoginAttemptState, NewAccount};
pub use realm::{AdminRealm, CompanyRealm, Realm, UndergraduateRealm};
pub use role::Role;
pub use token::RefreshTokenRecord;

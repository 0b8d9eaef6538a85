//! POS back-office client library.
//!
//! State and data layer for the back-office administration screens:
//! paginated list/CRUD controllers for customers, billers, suppliers,
//! stores, warehouses, categories, sub-categories, units, brands and variant
//! attributes, plus the login/registration/password-reset flows. A UI binds
//! to a [`ListController`] per page and re-renders from its `watch` channel.
//!
//! ```no_run
//! use pos_backoffice::{entities::Customer, init_logging, Backoffice};
//!
//! # async fn demo() -> pos_backoffice::Result<()> {
//! let backoffice = Backoffice::from_env()?;
//! let _guard = init_logging(backoffice.config());
//!
//! let customers = backoffice.controller::<Customer>();
//! customers.set_search("acme");
//! customers.sync().await;
//! for row in customers.snapshot().items {
//!     println!("{} {}", row.id, row.name);
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod backoffice;
pub mod client;
pub mod config;
pub mod controller;
pub mod endpoints;
pub mod entities;
pub mod entity;
pub mod error;
pub mod logging;
pub mod page;
pub mod query;
pub mod session;
pub mod storage;
pub mod validation;

pub use auth::{AuthService, LoginForm, RegisterForm, ResetPasswordForm, VerifyOtpForm};
pub use backoffice::{Backoffice, RestController};
pub use client::ApiClient;
pub use config::BackofficeConfig;
pub use controller::{FetchOutcome, ListController, ListState};
pub use endpoints::{EntityEndpoints, RestEndpoints};
pub use entity::{Entity, EntityStatus, Resource, StatusCasing};
pub use error::{BackofficeError, Result};
pub use logging::init_logging;
pub use page::{PageEnvelope, PageMeta};
pub use query::{QueryState, SortDir, StatusFilter};
pub use session::{AccessToken, AuthStatus, Session, SessionUser};
pub use storage::{CredentialStore, KeyringStore, MemoryStore};

#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # stratum
//!
//! A library for resolving layered configuration.
//!
//! Starting from a handful of initial property sources, stratum follows
//! `config.import` declarations, loads the imported resources, computes the
//! active profiles and then activates profile-specific and profile-gated
//! sources. The result is an ordered list of property sources, highest
//! precedence first.
//!
//! ## Core Types
//!
//! - [`ConfigEnvironment`] and [`ResolvedEnvironment`]: the resolution entry point and its result
//! - [`PropertySource`] and [`ConfigurationBundle`]: named key/value maps and loaded resources
//! - [`ImportLocation`] and [`ResolvedLocation`]: import declarations and concrete resources
//! - [`Importer`], [`LocationResolver`] and [`Loader`]: how locations become sources
//! - [`ProfileSet`] and [`ExplicitProfiles`]: profile computation
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use stratum::{ConfigEnvironment, ExplicitProfiles, Importer, Logger, NotFoundAction, PropertySource};
//!
//! let initial = PropertySource::new("defaults")
//!     .with_property("app.name", "demo")
//!     .with_property("app.greeting", "hello from ${app.name}");
//!
//! let environment = ConfigEnvironment::new(Importer::new(NotFoundAction::Fail, Logger::quiet()));
//! let resolved = environment
//!     .resolve(vec![initial], &ExplicitProfiles::default())
//!     .unwrap();
//!
//! assert_eq!(resolved.get("app.greeting").unwrap().as_deref(), Some("hello from demo"));
//! assert_eq!(resolved.profiles().accepted(), ["default"]);
//! ```

pub mod activation;
pub mod binder;
pub mod bundle;
pub mod contributor;
pub mod driver;
pub mod environment;
pub mod error;
pub mod import;
pub mod keys;
pub mod location;
pub mod logging;
pub mod path;
pub mod profiles;
pub mod settings;
pub mod source;

// Re-export key types at crate root for convenience
pub use activation::{ActivationContext, ImportPhase};
pub use binder::{BinderOptions, CompositeBinder};
pub use bundle::ConfigurationBundle;
pub use contributor::{Contributor, ContributorKind, ContributorTree};
pub use driver::ResolutionDriver;
pub use environment::{
    ConfigEnvironment, EffectiveProperty, EnvironmentSummary, Provenance, ResolvedEnvironment,
    SourceSummary,
};
pub use error::{Error, Result};
pub use import::{
    Importer, LoadedResource, Loader, LocationResolver, NotFoundAction, PropertiesLoader,
    ResolverContext, StandardLocationResolver, YamlLoader,
};
pub use location::{ImportLocation, ResolvedLocation};
pub use logging::{init_logger, LogLevel, Logger};
pub use profiles::{ExplicitProfiles, ProfileExpression, ProfileSet};
pub use settings::{Settings, SettingsBuilder};
pub use source::{ConfigurationPropertySource, PropertySource};

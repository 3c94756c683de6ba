pub mod auth;
pub mod config;
pub mod insights;
pub mod library;

pub use auth::{
    create_authenticator, AuthError, AuthRequest, Authenticator, BasicAuthenticator, Identity,
    NoneAuthenticator,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, AuthMethod, Config,
    ConfigError, SanitizedConfig,
};
pub use insights::{compute_insights, load_insights, BookInsights};
pub use library::{
    Author, Book, Category, Library, LibraryCounts, LibraryError, LibraryStats, LibraryStore,
    NewAuthor, NewBook, NewCategory, SqliteLibrary,
};

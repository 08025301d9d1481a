// Command handlers module
pub mod once;
pub mod probe;
pub mod run;
pub mod version;

// Re-exports for cleaner imports
pub use once::execute as once;
pub use probe::execute as probe;
pub use run::execute as run;
pub use version::execute as version;

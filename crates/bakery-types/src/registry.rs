//! Registry trait for self-registering backends.

/// Implemented by every pluggable backend so it can be looked up by its configuration
/// name.
///
/// `NAME` matches the key under `implementations` in the TOML configuration, for
/// example `"memory"` for `[storage.implementations.memory]`.
pub trait ImplementationRegistry {
	/// The name used in configuration files to reference this implementation.
	const NAME: &'static str;

	/// The factory function type this implementation provides.
	type Factory;

	/// Get the factory function for this implementation.
	fn factory() -> Self::Factory;
}

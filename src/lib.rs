/// Constants shared across the router.
pub mod constants;

/// Named route contexts: URL building, page lookup, header/footer delegation.
pub mod context;

/// Defines custom error types.
pub mod error;

/// Pre and post render notification processing.
pub mod events;

/// Capability traits the embedding framework implements for the router.
pub mod host;

/// The route registry: context ownership, default selection, request resolution.
pub mod registry;

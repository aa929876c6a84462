/// Router Module Index
///
/// Routes are split by access level. The authenticated router is wrapped in the
/// auth guard as a whole by `create_router`, so a protected endpoint cannot be
/// registered without it.

/// Routes accessible to anonymous clients.
pub mod public;

/// Routes behind the `AuthUser` guard.
pub mod authenticated;
